//! JSON output formatting

use std::io::{self, Write};

use serde::Serialize;

/// Write records as JSON.
///
/// A single record is written as one pretty-printed value, several as a
/// pretty-printed array. With `split`, each record goes on its own line.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, records: &[T], split: bool) -> io::Result<()> {
    if split {
        for record in records {
            serde_json::to_writer(&mut *writer, record)?;
            writeln!(writer)?;
        }
        return Ok(());
    }

    match records {
        [single] => serde_json::to_writer_pretty(&mut *writer, single)?,
        _ => serde_json::to_writer_pretty(&mut *writer, records)?,
    }
    writeln!(writer)?;
    Ok(())
}

/// Print records as JSON to stdout.
pub fn print_json<T: Serialize>(records: &[T], split: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, records, split)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn render(records: &[Value], split: bool) -> String {
        let mut out = Vec::new();
        write_json(&mut out, records, split).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_record_is_not_wrapped() {
        let out = render(&[json!({"id": "a"})], false);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"id": "a"}));
    }

    #[test]
    fn test_several_records_form_an_array() {
        let out = render(&[json!({"id": "a"}), json!({"id": "b"})], false);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!([{"id": "a"}, {"id": "b"}]));
    }

    #[test]
    fn test_split_writes_one_line_per_record() {
        let out = render(&[json!({"id": "a"}), json!({"id": "b"})], true);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec![r#"{"id":"a"}"#, r#"{"id":"b"}"#]);
    }

    #[test]
    fn test_empty_split_writes_nothing() {
        assert_eq!(render(&[], true), "");
    }
}
