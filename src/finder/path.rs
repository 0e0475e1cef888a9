//! Path utilities
//!
//! Byte-level helpers for the path spellings the walker builds. Directory
//! paths always carry exactly one trailing separator; printed paths never do,
//! except for roots (see [`super::format`]).

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};

/// The path separator
pub const SEPARATOR: u8 = b'/';

/// Whether `path` ends with a separator
pub fn has_trailing_separator(path: &OsStr) -> bool {
    path.as_bytes().last() == Some(&SEPARATOR)
}

/// Strip at most one trailing separator: `foo/` becomes `foo`, `foo//` becomes `foo/`.
pub fn strip_trailing_separator(path: &OsStr) -> &OsStr {
    match path.as_bytes().split_last() {
        Some((&SEPARATOR, rest)) => OsStr::from_bytes(rest),
        _ => path,
    }
}

/// The leaf component of `path`, ignoring one trailing separator.
///
/// `../dir/sub/` gives `sub`. A path with no leaf left (`/`) is returned as is.
pub fn base_name(path: &OsStr) -> &OsStr {
    let trimmed = strip_trailing_separator(path).as_bytes();
    let leaf = match trimmed.iter().rposition(|&b| b == SEPARATOR) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    };
    if leaf.is_empty() {
        path
    } else {
        OsStr::from_bytes(leaf)
    }
}

/// Join a directory and a leaf name with exactly one separator between them
pub fn join(directory: &OsStr, name: &OsStr) -> OsString {
    let mut joined = Vec::with_capacity(directory.len() + name.len() + 1);
    joined.extend_from_slice(directory.as_bytes());
    if !has_trailing_separator(directory) {
        joined.push(SEPARATOR);
    }
    joined.extend_from_slice(name.as_bytes());
    OsString::from_vec(joined)
}

/// Append a separator unless one is already there
pub fn with_trailing_separator(path: &OsStr) -> OsString {
    let mut owned = path.to_os_string();
    if !has_trailing_separator(path) {
        owned.push("/");
    }
    owned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    fn test_strip_trailing_separator() {
        assert_eq!(strip_trailing_separator(os("foo/")), os("foo"));
        assert_eq!(strip_trailing_separator(os("foo")), os("foo"));
        assert_eq!(strip_trailing_separator(os("foo//")), os("foo/"));
        assert_eq!(strip_trailing_separator(os("/")), os(""));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(os("../testdir/file.txt")), os("file.txt"));
        assert_eq!(base_name(os("./subdir/subsubdir/")), os("subsubdir"));
        assert_eq!(base_name(os("plain")), os("plain"));
        assert_eq!(base_name(os(".")), os("."));
        assert_eq!(base_name(os("/")), os("/"));
    }

    #[test]
    fn test_join() {
        assert_eq!(join(os("dir/"), os("file")), OsString::from("dir/file"));
        assert_eq!(join(os("dir"), os("file")), OsString::from("dir/file"));
        assert_eq!(join(os("/"), os("bin")), OsString::from("/bin"));
    }

    #[test]
    fn test_with_trailing_separator() {
        assert_eq!(with_trailing_separator(os("dir")), OsString::from("dir/"));
        assert_eq!(with_trailing_separator(os("dir/")), OsString::from("dir/"));
    }
}
