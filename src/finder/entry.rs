//! Visited filesystem entries and the metadata probe
//!
//! A [`FileEntry`] is created by the walker right before it is evaluated and is
//! dropped once evaluation (and, for directories, recursion) is finished.

use std::ffi::{OsStr, OsString};
use std::fs::{self, FileType, Metadata};
use std::os::unix::fs::{FileTypeExt, MetadataExt};

use crate::errors::{FindError, FindResult};
use super::options::RootSpec;
use super::path;

/// File categories distinguished by `-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Block device (`b`)
    BlockDevice,
    /// Character device (`c`)
    CharDevice,
    /// Directory (`d`)
    Directory,
    /// Regular file (`f`)
    Regular,
    /// Symbolic link (`l`)
    Symlink,
    /// Socket (`s`)
    Socket,
    /// Named pipe. Not selectable through `-type`.
    Fifo,
}

impl FileKind {
    /// Classify a file type as reported by `stat`/`lstat`
    pub fn of(file_type: FileType) -> Self {
        if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_block_device() {
            FileKind::BlockDevice
        } else if file_type.is_char_device() {
            FileKind::CharDevice
        } else if file_type.is_socket() {
            FileKind::Socket
        } else if file_type.is_fifo() {
            FileKind::Fifo
        } else {
            FileKind::Regular
        }
    }

    /// Parse a `-type` letter
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'b' => Some(FileKind::BlockDevice),
            'c' => Some(FileKind::CharDevice),
            'd' => Some(FileKind::Directory),
            'f' => Some(FileKind::Regular),
            'l' => Some(FileKind::Symlink),
            's' => Some(FileKind::Socket),
            _ => None,
        }
    }

    /// The letter find uses for this kind
    pub fn tag(self) -> char {
        match self {
            FileKind::BlockDevice => 'b',
            FileKind::CharDevice => 'c',
            FileKind::Directory => 'd',
            FileKind::Regular => 'f',
            FileKind::Symlink => 'l',
            FileKind::Socket => 's',
            FileKind::Fifo => 'p',
        }
    }
}

/// Read metadata for `path`, dereferencing symlinks only when `follow_links` is set.
pub fn probe(path: &OsStr, follow_links: bool) -> FindResult<Metadata> {
    let result = if follow_links {
        fs::metadata(path)
    } else {
        fs::symlink_metadata(path)
    };
    result.map_err(|err| FindError::from_io(err, path))
}

/// One visited filesystem object
#[derive(Debug)]
pub struct FileEntry {
    path: OsString,
    name: OsString,
    metadata: Option<Metadata>,
    /// Spelling typed by the user, set only for starting paths
    root: Option<OsString>,
}

impl FileEntry {
    /// Create an entry. `metadata` is `None` when the probe failed.
    pub fn new(path: impl Into<OsString>, name: impl Into<OsString>, metadata: Option<Metadata>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            metadata,
            root: None,
        }
    }

    /// Resolve a starting path.
    ///
    /// A directory root gets a trailing separator; anything else keeps the
    /// spelling it was given. When the probe fails, the separator-less form is
    /// probed again to tell "Not a directory" (`file.txt/`) apart from other
    /// failures.
    pub fn from_root(root: &RootSpec, follow_links: bool) -> FindResult<Self> {
        let original = root.original();
        match probe(original, follow_links) {
            Ok(metadata) => {
                let entry_path = if metadata.is_dir() {
                    path::with_trailing_separator(original)
                } else {
                    original.to_os_string()
                };
                let mut entry = Self::new(entry_path, path::base_name(original), Some(metadata));
                entry.root = Some(original.to_os_string());
                Ok(entry)
            }
            Err(err) => {
                let bare = path::strip_trailing_separator(original);
                if bare != original && probe(bare, follow_links).is_ok() {
                    Err(FindError::NotADirectory(original.into()))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Full path as built by the walker
    pub fn path(&self) -> &OsStr {
        &self.path
    }

    /// Leaf name used for `-name` matching
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// The starting path as typed, if this entry is a root
    pub fn root_spelling(&self) -> Option<&OsStr> {
        self.root.as_deref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// File kind, if the probe succeeded
    pub fn kind(&self) -> Option<FileKind> {
        self.metadata.as_ref().map(|m| FileKind::of(m.file_type()))
    }

    /// Modification time in whole seconds since the epoch
    pub fn mtime(&self) -> Option<i64> {
        self.metadata.as_ref().map(MetadataExt::mtime)
    }

    /// Whether the walker should descend into this entry.
    ///
    /// The probe already used `stat` or `lstat` according to the follow
    /// setting, so a symlink only looks like a directory when links are followed.
    pub fn is_dir(&self) -> bool {
        self.kind() == Some(FileKind::Directory)
    }

    /// Turn this entry into a directory entry whose path ends with one separator
    pub fn into_directory(mut self) -> Self {
        self.path = path::with_trailing_separator(&self.path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_kind_tags() {
        for tag in ['b', 'c', 'd', 'f', 'l', 's'] {
            let kind = FileKind::from_tag(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
        assert_eq!(FileKind::from_tag('p'), None);
        assert_eq!(FileKind::from_tag('x'), None);
    }

    #[test]
    fn test_probe_respects_follow_setting() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("target");
        std::fs::create_dir(&target)?;
        let link = temp_dir.path().join("link");
        symlink(&target, &link)?;

        let lstat = probe(link.as_os_str(), false)?;
        assert_eq!(FileKind::of(lstat.file_type()), FileKind::Symlink);

        let stat = probe(link.as_os_str(), true)?;
        assert_eq!(FileKind::of(stat.file_type()), FileKind::Directory);
        Ok(())
    }

    #[test]
    fn test_probe_dangling_link() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let link = temp_dir.path().join("dangling");
        symlink(temp_dir.path().join("nowhere"), &link)?;

        assert!(probe(link.as_os_str(), false).is_ok());
        assert!(matches!(
            probe(link.as_os_str(), true),
            Err(FindError::FileNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_root_directory_gets_separator() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let root = RootSpec::new(temp_dir.path());
        let entry = FileEntry::from_root(&root, false)?;

        assert!(entry.is_dir());
        assert!(path::has_trailing_separator(entry.path()));
        assert_eq!(entry.name(), temp_dir.path().file_name().unwrap());
        assert_eq!(entry.root_spelling(), Some(temp_dir.path().as_os_str()));
        Ok(())
    }

    #[test]
    fn test_root_failures_are_classified() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("file.txt");
        File::create(&file)?;

        let mut with_slash = file.clone().into_os_string();
        with_slash.push("/");
        let err = FileEntry::from_root(&RootSpec::new(with_slash), false).unwrap_err();
        assert!(matches!(err, FindError::NotADirectory(_)));

        let missing = temp_dir.path().join("missing");
        let err = FileEntry::from_root(&RootSpec::new(missing), false).unwrap_err();
        assert!(matches!(err, FindError::FileNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_entry_without_metadata() {
        let entry = FileEntry::new("dir/broken", "broken", None);
        assert_eq!(entry.kind(), None);
        assert_eq!(entry.mtime(), None);
        assert!(!entry.is_dir());
        assert_eq!(entry.root_spelling(), None);
    }
}
