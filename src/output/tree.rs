//! Tree formatter for console output
//!
//! `TreeFormatter` renders an assembled `TreeNode` with box-drawing
//! connectors, folders highlighted, and a folder/file count footer.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::TreeNode;

use super::config::OutputConfig;

pub struct TreeFormatter {
    config: OutputConfig,
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render `node` to plain text.
    pub fn format(&self, node: &TreeNode) -> String {
        let mut buffer = Buffer::no_color();
        self.write_tree(&mut buffer, node)
            .expect("writing to an in-memory buffer cannot fail");
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    pub fn print(&self, node: &TreeNode) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_tree(&mut stdout, node)
    }

    fn write_tree<W: WriteColor>(&self, out: &mut W, node: &TreeNode) -> io::Result<()> {
        self.write_name(out, node)?;
        writeln!(out)?;
        self.write_children(out, node, "")?;

        let (folders, files) = node.count();
        writeln!(out)?;
        writeln!(out, "{} folders, {} files", folders, files)
    }

    fn write_children<W: WriteColor>(
        &self,
        out: &mut W,
        node: &TreeNode,
        prefix: &str,
    ) -> io::Result<()> {
        for (i, child) in node.children.iter().enumerate() {
            let is_last = i == node.children.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };
            write!(out, "{}{}", prefix, connector)?;
            self.write_name(out, child)?;
            writeln!(out)?;

            let child_prefix = if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            self.write_children(out, child, &child_prefix)?;
        }
        Ok(())
    }

    fn write_name<W: WriteColor>(&self, out: &mut W, node: &TreeNode) -> io::Result<()> {
        if node.is_folder() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
            write!(out, "{}", node.name)?;
            out.reset()?;
            return Ok(());
        }

        write!(out, "{}", node.name)?;
        if self.config.show_mime {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
            write!(out, "  {}", node.mime_type)?;
            out.reset()?;
        }
        Ok(())
    }
}
