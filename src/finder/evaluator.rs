//! Entry evaluation
//!
//! Runs the predicate/action chain for one entry, left to right, stopping at
//! the first predicate that does not match. Printing is the default action
//! unless `-exec` was given without `-print`.

use std::io::Write;

use log::debug;

use crate::errors::{FindError, FindResult};
use super::entry::FileEntry;
use super::filter::FileFilter;
use super::format;
use super::options::{PredicateKind, QueryDescriptor};

/// Final state of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A predicate rejected the entry; the rest of the chain was skipped
    Filtered,
    /// The whole chain ran
    Done,
}

/// Evaluates entries against a query
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    query: &'a QueryDescriptor,
}

impl<'a> Evaluator<'a> {
    pub fn new(query: &'a QueryDescriptor) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &'a QueryDescriptor {
        self.query
    }

    /// Evaluate `entry`, writing any printed path to `out`
    pub fn evaluate<W: Write>(&self, entry: &FileEntry, out: &mut W) -> FindResult<Verdict> {
        let query = self.query;
        let mut printed = false;

        for predicate in &query.predicates {
            let passed = match predicate {
                PredicateKind::Name => Self::check(query.name.as_ref(), entry),
                PredicateKind::Age => Self::check(query.age.as_ref(), entry),
                PredicateKind::Type => Self::check(Some(&query.types), entry),
                PredicateKind::Exec => match &query.exec {
                    Some(exec) => {
                        // the command shares our stdout
                        out.flush().map_err(FindError::Output)?;
                        Self::check(Some(exec), entry)
                    }
                    None => true,
                },
                PredicateKind::Print => {
                    if query.prints() {
                        Self::print(entry, out)?;
                    }
                    printed = true;
                    true
                }
            };

            if !passed {
                return Ok(Verdict::Filtered);
            }
        }

        if !printed && query.prints() {
            Self::print(entry, out)?;
        }
        Ok(Verdict::Done)
    }

    fn check<F: FileFilter>(filter: Option<&F>, entry: &FileEntry) -> bool {
        match filter {
            Some(filter) if !filter.matches(entry) => {
                debug!(
                    "{} rejected: {} does not hold",
                    entry.path().to_string_lossy(),
                    filter.description()
                );
                false
            }
            _ => true,
        }
    }

    fn print<W: Write>(entry: &FileEntry, out: &mut W) -> FindResult<()> {
        format::write_line(out, entry).map_err(FindError::Output)
    }
}
