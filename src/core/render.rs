use std::io::{self, Write};

use serde::Serialize;

use crate::models::{ShareEntry, TreeNode};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum JsonStyle {
    /// Single line, like a classic `json.dumps`.
    #[default]
    Compact,
    Pretty,
}

pub fn write_tree<W: Write>(
    writer: &mut W,
    nodes: &[TreeNode],
    style: JsonStyle,
) -> io::Result<()> {
    write_json(writer, nodes, style)
}

pub fn write_listing<W: Write>(
    writer: &mut W,
    entries: &[ShareEntry],
    style: JsonStyle,
) -> io::Result<()> {
    write_json(writer, entries, style)
}

pub fn write_shares<W: Write>(
    writer: &mut W,
    shares: &[String],
    style: JsonStyle,
) -> io::Result<()> {
    write_json(writer, shares, style)
}

/// Write `value` followed by a newline.
pub fn write_json<W, T>(writer: &mut W, value: &T, style: JsonStyle) -> io::Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    match style {
        JsonStyle::Compact => serde_json::to_writer(&mut *writer, value)?,
        JsonStyle::Pretty => serde_json::to_writer_pretty(&mut *writer, value)?,
    }
    writer.write_all(b"\n")
}
