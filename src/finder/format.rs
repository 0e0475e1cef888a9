//! Output formatting for matched paths

use std::ffi::OsStr;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

use super::entry::FileEntry;
use super::path;

/// The spelling to print for `entry`.
///
/// A starting path prints exactly as it was typed, so `mydir/` stays `mydir/`
/// and the same directory given twice prints once per spelling. Every other
/// path loses its trailing separator.
pub fn format_for_print(entry: &FileEntry) -> &OsStr {
    entry
        .root_spelling()
        .unwrap_or_else(|| path::strip_trailing_separator(entry.path()))
}

/// Write the formatted path followed by a newline
pub fn write_line<W: Write>(out: &mut W, entry: &FileEntry) -> std::io::Result<()> {
    out.write_all(format_for_print(entry).as_bytes())?;
    out.write_all(b"\n")
}
