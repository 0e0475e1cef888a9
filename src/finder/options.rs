//! Query options
//!
//! This module provides the query descriptor that configures a search: the
//! ordered predicate chain, the parameters of each predicate and the roots.
//! A descriptor is read-only for the whole traversal.

use std::ffi::{OsStr, OsString};

use crate::errors::FindResult;
use super::entry::FileKind;
use super::filter::{AgeFilter, ExecFilter, NameFilter, TypeFilter};

/// One element of the predicate/action chain, in command-line order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    /// `-name`
    Name,
    /// `-mtime`
    Age,
    /// `-type`
    Type,
    /// `-exec ... ;`
    Exec,
    /// `-print`
    Print,
}

/// A starting path exactly as the caller spelled it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSpec {
    original: OsString,
}

impl RootSpec {
    pub fn new(original: impl Into<OsString>) -> Self {
        Self {
            original: original.into(),
        }
    }

    /// The caller's spelling, byte for byte
    pub fn original(&self) -> &OsStr {
        &self.original
    }
}

/// Options for configuring a search
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    /// Predicates and actions in the order they were given. Duplicates allowed.
    pub predicates: Vec<PredicateKind>,

    /// Name glob for `-name`
    pub name: Option<NameFilter>,

    /// Day window for `-mtime`
    pub age: Option<AgeFilter>,

    /// Accepted kinds for `-type`; empty accepts anything
    pub types: TypeFilter,

    /// Command template for `-exec`
    pub exec: Option<ExecFilter>,

    /// Whether `-print` appeared in the chain
    pub explicit_print: bool,

    /// Whether to follow symbolic links
    pub follow_links: bool,

    /// Starting paths, in the order given
    pub roots: Vec<RootSpec>,
}

impl QueryDescriptor {
    /// Create an empty query: no predicates, no roots, links not followed
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            name: None,
            age: None,
            types: TypeFilter::default(),
            exec: None,
            explicit_print: false,
            follow_links: false,
            roots: Vec::new(),
        }
    }

    /// Add a starting path
    pub fn with_root(mut self, root: impl Into<OsString>) -> Self {
        self.roots.push(RootSpec::new(root));
        self
    }

    /// Append `-name pattern`
    pub fn with_name(mut self, pattern: &str) -> FindResult<Self> {
        self.name = Some(NameFilter::new(pattern)?);
        self.predicates.push(PredicateKind::Name);
        Ok(self)
    }

    /// Append `-mtime days`
    pub fn with_age(mut self, days: u64) -> Self {
        self.age = Some(AgeFilter::new(days));
        self.predicates.push(PredicateKind::Age);
        self
    }

    /// Append `-type` with the given kinds
    pub fn with_types(mut self, kinds: impl IntoIterator<Item = FileKind>) -> Self {
        self.types = TypeFilter::new(kinds);
        self.predicates.push(PredicateKind::Type);
        self
    }

    /// Append `-exec tokens... ;`
    pub fn with_exec<S: AsRef<str>>(mut self, tokens: &[S]) -> Self {
        self.exec = Some(ExecFilter::from_tokens(tokens));
        self.predicates.push(PredicateKind::Exec);
        self
    }

    /// Append `-print`
    pub fn with_print(mut self) -> Self {
        self.explicit_print = true;
        self.predicates.push(PredicateKind::Print);
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Whether printing happens at all: always, unless `-exec` was given without `-print`
    pub fn prints(&self) -> bool {
        self.exec.is_none() || self.explicit_print
    }
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::new()
    }
}
