//! File filtering functionality
//!
//! This module provides the predicates an entry is tested against: name glob,
//! modification age, file type and command execution.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use glob::Pattern;
use log::{debug, warn};

use crate::errors::{FindError, FindResult};
use super::entry::{FileEntry, FileKind};

/// Seconds in one `-mtime` day
pub const SECS_PER_DAY: i64 = 86_400;

/// The placeholder replaced by the entry path in `-exec` templates
pub const PLACEHOLDER: &str = "{}";

/// Trait for file filters
pub trait FileFilter {
    /// Check if the entry matches the filter
    fn matches(&self, entry: &FileEntry) -> bool;

    /// Get the filter description
    fn description(&self) -> String;
}

/// Filter for matching file names against a pattern
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: Pattern,
    original_pattern: String,
}

impl NameFilter {
    /// Create a new NameFilter with the given pattern
    pub fn new(pattern: &str) -> FindResult<Self> {
        // glob 只接受独立成段的 `**`；文件名里不含分隔符，连续的 `*` 等价于一个
        let compiled_pattern = Pattern::new(&collapse_stars(pattern)).map_err(|e| FindError::PatternError {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            pattern: compiled_pattern,
            original_pattern: pattern.to_string(),
        })
    }

    /// Match a bare file name. Names that are not valid UTF-8 never match.
    pub fn matches_name(&self, name: &OsStr) -> bool {
        name.to_str()
            .map(|name| self.pattern.matches(name))
            .unwrap_or(false)
    }
}

/// Squash each run of `*` into a single `*`
fn collapse_stars(pattern: &str) -> String {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

impl FileFilter for NameFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        self.matches_name(entry.name())
    }

    fn description(&self) -> String {
        format!("name matches '{}'", self.original_pattern)
    }
}

/// Filter for files modified within one exact day bucket.
///
/// `-mtime N` matches when `N*86400 < now - mtime < (N+1)*86400`, both bounds
/// exclusive. This is narrower than the usual "within N days" reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeFilter {
    days: u64,
}

impl AgeFilter {
    pub fn new(days: u64) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u64 {
        self.days
    }

    /// Test a modification time against `now`, both in seconds since the epoch
    pub fn matches_at(&self, mtime: i64, now: i64) -> bool {
        let days = i64::try_from(self.days).unwrap_or(i64::MAX);
        let min_dif = days.saturating_mul(SECS_PER_DAY);
        let max_dif = days.saturating_add(1).saturating_mul(SECS_PER_DAY);
        let age = now.saturating_sub(mtime);
        min_dif < age && age < max_dif
    }
}

impl FileFilter for AgeFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        match entry.mtime() {
            Some(mtime) => self.matches_at(mtime, unix_now()),
            None => false,
        }
    }

    fn description(&self) -> String {
        format!("modified {} day(s) ago", self.days)
    }
}

/// Current time in whole seconds since the epoch
fn unix_now() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => -i64::try_from(before.duration().as_secs()).unwrap_or(i64::MAX),
    }
}

/// Filter for matching file types. An empty set accepts every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    accepted: HashSet<FileKind>,
}

impl TypeFilter {
    /// Create a TypeFilter accepting the given kinds
    pub fn new(kinds: impl IntoIterator<Item = FileKind>) -> Self {
        Self {
            accepted: kinds.into_iter().collect(),
        }
    }

    /// Parse a comma-separated list such as `f,d`
    pub fn parse(list: &str) -> FindResult<Self> {
        let mut accepted = HashSet::new();
        for item in list.split(',') {
            let mut chars = item.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(tag), None) => FileKind::from_tag(tag),
                _ => None,
            };
            match kind {
                Some(kind) => accepted.insert(kind),
                None => return Err(FindError::InvalidFileType(list.to_string())),
            };
        }
        Ok(Self { accepted })
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Whether an entry of `kind` is accepted. Unknown kinds only pass the empty set.
    pub fn accepts(&self, kind: Option<FileKind>) -> bool {
        if self.accepted.is_empty() {
            return true;
        }
        kind.map_or(false, |kind| self.accepted.contains(&kind))
    }
}

impl FileFilter for TypeFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        self.accepts(entry.kind())
    }

    fn description(&self) -> String {
        let mut tags: Vec<char> = self.accepted.iter().map(|kind| kind.tag()).collect();
        tags.sort_unstable();
        let tags: Vec<String> = tags.iter().map(char::to_string).collect();
        format!("type is one of [{}]", tags.join(","))
    }
}

/// Filter that runs a shell command per entry and matches on exit status zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecFilter {
    template: String,
}

impl ExecFilter {
    /// Assemble the template from the tokens between `-exec` and `;`.
    ///
    /// Every token is followed by a single space, so `echo {} {}` becomes `"echo {} {} "`.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let len: usize = tokens.iter().map(|t| t.as_ref().len() + 1).sum();
        let mut template = String::with_capacity(len);
        for token in tokens {
            template.push_str(token.as_ref());
            template.push(' ');
        }
        Self { template }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The command line for one entry
    pub fn command_for(&self, path: &OsStr) -> OsString {
        substitute(&self.template, path)
    }

    /// Run the command for `path` through `sh -c` and wait for it
    pub fn run(&self, path: &OsStr) -> bool {
        let command = self.command_for(path);
        debug!("Running command: {}", command.to_string_lossy());
        match Command::new("sh").arg("-c").arg(&command).status() {
            Ok(status) => status.success(),
            Err(e) => {
                warn!("Failed to run command '{}': {}", command.to_string_lossy(), e);
                false
            }
        }
    }
}

impl FileFilter for ExecFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        self.run(entry.path())
    }

    fn description(&self) -> String {
        format!("command '{}' succeeds", self.template.trim_end())
    }
}

/// Replace every `{}` in `template` with `path`, verbatim and without quoting.
///
/// The result is sized up front as
/// `len(template) + occurrences * (len(path) - 2)` and filled in a single
/// left-to-right pass.
pub fn substitute(template: &str, path: &OsStr) -> OsString {
    let occurrences = template.matches(PLACEHOLDER).count();
    let capacity = template.len() - occurrences * PLACEHOLDER.len() + occurrences * path.len();
    let mut command = OsString::with_capacity(capacity);

    let mut rest = template;
    while let Some(pos) = rest.find(PLACEHOLDER) {
        command.push(&rest[..pos]);
        command.push(path);
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    command.push(rest);
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn entry_for(dir: &TempDir, name: &str) -> FileEntry {
        let path = dir.path().join(name);
        let metadata = std::fs::symlink_metadata(&path).ok();
        FileEntry::new(path, name, metadata)
    }

    #[test]
    fn test_name_filter() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        File::create(temp_dir.path().join("test.txt"))?;
        let entry = entry_for(&temp_dir, "test.txt");

        assert!(NameFilter::new("*.txt")?.matches(&entry));
        assert!(!NameFilter::new("*.rs")?.matches(&entry));
        assert!(NameFilter::new("t?st.[tx]xt")?.matches(&entry));
        // 区分大小写
        assert!(!NameFilter::new("*.TXT")?.matches(&entry));
        Ok(())
    }

    #[test]
    fn test_name_filter_uses_leaf_only() -> Result<(), Box<dyn std::error::Error>> {
        let entry = FileEntry::new("some/dir/notes.md", "notes.md", None);
        assert!(NameFilter::new("notes.md")?.matches(&entry));
        assert!(!NameFilter::new("dir*")?.matches(&entry));
        assert!(NameFilter::new("*")?.matches_name(OsStr::new(".hidden")));
        Ok(())
    }

    #[test]
    fn test_repeated_stars() -> Result<(), Box<dyn std::error::Error>> {
        let filter = NameFilter::new("a**")?;
        assert!(filter.matches_name(OsStr::new("abc")));
        assert!(filter.matches_name(OsStr::new("a")));
        assert!(!filter.matches_name(OsStr::new("ba")));
        assert!(NameFilter::new("x***.rs")?.matches_name(OsStr::new("x_main.rs")));
        assert!(NameFilter::new("**")?.matches_name(OsStr::new("anything")));
        assert_eq!(filter.description(), "name matches 'a**'");
        Ok(())
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            NameFilter::new("["),
            Err(FindError::PatternError { .. })
        ));
    }

    #[test]
    fn test_age_window_bounds() {
        let filter = AgeFilter::new(2);
        let now = 1_000_000_000;

        assert!(filter.matches_at(now - 2 * SECS_PER_DAY - 1, now));
        assert!(!filter.matches_at(now - 2 * SECS_PER_DAY, now));
        assert!(filter.matches_at(now - 3 * SECS_PER_DAY + 1, now));
        assert!(!filter.matches_at(now - 3 * SECS_PER_DAY, now));
        assert!(!filter.matches_at(now - SECS_PER_DAY, now));
    }

    #[test]
    fn test_age_zero_days() {
        let filter = AgeFilter::new(0);
        let now = 1_000_000_000;

        assert!(filter.matches_at(now - 10, now));
        // 修改时间与当前时间相同时不匹配（下界不包含）
        assert!(!filter.matches_at(now, now));
        assert!(!filter.matches_at(now + 10, now));
    }

    #[test]
    fn test_age_filter_without_metadata() {
        let entry = FileEntry::new("x", "x", None);
        assert!(!AgeFilter::new(0).matches(&entry));
    }

    #[test]
    fn test_type_filter() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        File::create(temp_dir.path().join("test.txt"))?;
        std::fs::create_dir(temp_dir.path().join("testdir"))?;
        let file_entry = entry_for(&temp_dir, "test.txt");
        let dir_entry = entry_for(&temp_dir, "testdir");

        let file_filter = TypeFilter::parse("f")?;
        assert!(file_filter.matches(&file_entry));
        assert!(!file_filter.matches(&dir_entry));

        let both = TypeFilter::parse("d,f")?;
        assert!(both.matches(&file_entry));
        assert!(both.matches(&dir_entry));

        let any = TypeFilter::default();
        assert!(any.matches(&file_entry));
        assert!(any.matches(&FileEntry::new("x", "x", None)));
        assert!(!file_filter.matches(&FileEntry::new("x", "x", None)));
        Ok(())
    }

    #[test]
    fn test_type_filter_parse_errors() {
        for list in ["", "x", "p", "f,", "fd", "f;d"] {
            assert!(
                matches!(TypeFilter::parse(list), Err(FindError::InvalidFileType(_))),
                "{list:?} should be rejected"
            );
        }
        assert_eq!(TypeFilter::parse("l,s,b,c").unwrap().accepted.len(), 4);
    }

    #[test]
    fn test_exec_template_from_tokens() {
        let exec = ExecFilter::from_tokens(&["echo", "{}", "{}"]);
        assert_eq!(exec.template(), "echo {} {} ");
        assert_eq!(exec.command_for(OsStr::new("/a/b")), OsString::from("echo /a/b /a/b "));
    }

    #[test]
    fn test_substitute() {
        assert_eq!(substitute("ls", OsStr::new("x")), OsString::from("ls"));
        assert_eq!(substitute("{}", OsStr::new("")), OsString::from(""));
        assert_eq!(substitute("{}{}", OsStr::new("a")), OsString::from("aa"));
        assert_eq!(substitute("cat {} ", OsStr::new("dir/f")), OsString::from("cat dir/f "));
        // 单个花括号保持原样
        assert_eq!(substitute("{ } {", OsStr::new("p")), OsString::from("{ } {"));
    }

    #[test]
    fn test_exec_filter_exit_status() {
        let entry = FileEntry::new("anything", "anything", None);
        assert!(ExecFilter::from_tokens(&["true"]).matches(&entry));
        assert!(!ExecFilter::from_tokens(&["false"]).matches(&entry));
        assert!(ExecFilter::from_tokens(&["test", "{}", "=", "anything"]).matches(&entry));
    }
}
