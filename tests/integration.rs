//! Integration tests for drivetree

mod harness;

use drivetree::DirectoryEntry;
use harness::{TestDrive, run_drivetree, run_json};
use serde_json::json;

fn child_ids(node: &serde_json::Value) -> Vec<&str> {
    node["children"]
        .as_array()
        .map(|kids| kids.iter().filter_map(|k| k["id"].as_str()).collect())
        .unwrap_or_default()
}

#[test]
fn test_tree_output() {
    let drive = TestDrive::sample();
    let tree = run_json(&drive, &[]);

    assert_eq!(tree["id"], "root");
    assert_eq!(tree["name"], "(root)");
    assert_eq!(child_ids(&tree), vec!["A", "B"]);
    assert_eq!(child_ids(&tree["children"][0]), vec!["C"]);
}

#[test]
fn test_flat_list_output() {
    let drive = TestDrive::sample();
    let list = run_json(&drive, &["--operation", "list"]);

    assert_eq!(
        list,
        json!([
            {"id": "B", "name": "B.txt", "mimeType": "text/plain", "parents": ["root"]},
            {
                "id": "C",
                "name": "C.txt",
                "mimeType": "text/plain",
                "parents": ["A"],
                "properties": {"status": "done"}
            }
        ])
    );
}

#[test]
fn test_flat_list_with_folders() {
    let drive = TestDrive::sample();
    let list = run_json(&drive, &["-o", "list", "--include-folders"]);
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn test_property_filter_moves_entry_to_virtual_root() {
    let drive = TestDrive::sample();
    let tree = run_json(&drive, &["--property", "status=done"]);

    assert_eq!(tree["name"], "(root)");
    assert_eq!(child_ids(&tree), vec!["C"]);
}

#[test]
fn test_type_filter() {
    let drive = TestDrive::sample();
    let list = run_json(&drive, &["-o", "list", "--type", "folder", "--include-folders"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], "A");
}

#[test]
fn test_query_filter() {
    let drive = TestDrive::sample();
    let list = run_json(&drive, &["-o", "list", "--query", "name contains 'c.'"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], "C");
}

#[test]
fn test_start_folder_by_url() {
    let drive = TestDrive::sample();
    let tree = run_json(&drive, &["https://drive.google.com/drive/folders/A"]);
    assert_eq!(tree["id"], "A");
    assert_eq!(child_ids(&tree), vec!["C"]);
}

#[test]
fn test_split_emits_json_lines() {
    let drive = TestDrive::sample();
    let (stdout, _stderr, success) = run_drivetree(&drive, &["-o", "list", "--split"]);
    assert!(success);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["id"], "B");
}

#[test]
fn test_property_projection() {
    let drive = TestDrive::sample();
    let list = run_json(&drive, &["-o", "list", "--properties", "none"]);
    assert!(list[1].get("properties").is_none());
}

#[test]
fn test_batch_of_folders() {
    let drive = TestDrive::sample();
    let trees = run_json(&drive, &["root", "A"]);
    assert_eq!(trees.as_array().unwrap().len(), 2);
    assert_eq!(trees[1]["id"], "A");
}

#[test]
fn test_pretty_tree_view() {
    let drive = TestDrive::sample();
    let (stdout, _stderr, success) =
        run_drivetree(&drive, &["--format", "pretty", "--color", "never"]);
    assert!(success);

    let expected = "\
(root)
├── A
│   └── C.txt
└── B.txt

1 folders, 2 files
";
    assert_eq!(stdout, expected);
}

#[test]
fn test_download_writes_file() {
    let drive = TestDrive::with_content(
        json!([{"id": "f1", "name": "hello.txt", "mimeType": "text/plain"}]),
        json!({"f1": "hello world"}),
    );
    let out_dir = drive.path().join("out");
    let result = run_json(
        &drive,
        &[
            "-o",
            "download",
            "https://drive.google.com/file/d/f1/view",
            "--output-dir",
            out_dir.to_str().unwrap(),
        ],
    );

    assert_eq!(result["id"], "f1");
    assert_eq!(result["binary"]["data"]["fileName"], "hello.txt");
    assert_eq!(result["binary"]["data"]["size"], 11);
    let written = std::fs::read_to_string(out_dir.join("hello.txt")).unwrap();
    assert_eq!(written, "hello world");
}

#[test]
fn test_download_exports_workspace_document() {
    let drive = TestDrive::with_content(
        json!([{"id": "s1", "name": "Budget", "mimeType": "application/vnd.google-apps.spreadsheet"}]),
        json!({"s1": "a,b\n1,2\n"}),
    );
    let result = run_json(
        &drive,
        &["-o", "download", "s1", "--sheets-format", "csv", "--binary-property", "sheet"],
    );
    assert_eq!(result["binary"]["sheet"]["mimeType"], "text/csv");
    assert!(drive.path().join("Budget").exists());
}

#[test]
fn test_folder_search() {
    let drive = TestDrive::new(&[
        DirectoryEntry::folder("f1", "Reports").with_parent("root"),
        DirectoryEntry::folder("f2", "Archive").with_parent("root"),
        DirectoryEntry::new("x", "report.txt", "text/plain").with_parent("root"),
    ]);
    let results = run_json(&drive, &["-o", "search-folders"]);
    let names: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(names, vec!["My Drive", "Archive", "Reports"]);

    let results = run_json(&drive, &["-o", "search-folders", "rep", "--sort", "name-desc"]);
    assert_eq!(results, json!([{"name": "Reports", "value": "f1"}]));
}

#[test]
fn test_file_search() {
    let drive = TestDrive::sample();
    let results = run_json(&drive, &["-o", "search-files", "A"]);
    assert_eq!(results, json!([{"name": "C.txt", "value": "C"}]));
}
