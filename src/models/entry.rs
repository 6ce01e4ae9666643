use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One record from a single-directory enumeration call.
///
/// `size` is only meaningful for files; directory entries carry whatever the
/// remote reported and it is ignored by the crawler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareEntry {
    pub filename: String,
    pub kind: EntryKind,
    pub size: u64,
}

impl ShareEntry {
    pub fn file(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn directory(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// `.` and `..` are enumeration artifacts, not real children.
    pub fn is_dot_entry(&self) -> bool {
        matches!(self.filename.as_str(), "." | "..")
    }
}

impl Serialize for ShareEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ShareEntry", 3)?;
        state.serialize_field("filename", &self.filename)?;
        state.serialize_field("directory", &self.is_directory())?;
        state.serialize_field("size", &if self.is_directory() { 0 } else { self.size })?;
        state.end()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShareKind {
    DiskTree,
    PrintQueue,
    Device,
    Ipc,
}

/// A share as advertised by the remote host, before filtering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareInfo {
    pub name: String,
    pub kind: ShareKind,
    pub is_special: bool,
}

impl ShareInfo {
    pub fn disk(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ShareKind::DiskTree,
            is_special: false,
        }
    }

    /// Browsable disk shares only: administrative `$` shares and anything
    /// the host flags as special are excluded.
    pub fn is_browsable(&self) -> bool {
        self.kind == ShareKind::DiskTree && !self.is_special && !self.name.ends_with('$')
    }
}
