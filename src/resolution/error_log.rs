//! Per-context store of resolution failures.

use crate::error::ResolutionFailure;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// The most recent failure per parameter name.
///
/// Recording a second failure for a name replaces the first: repeated
/// resolution of a parameter whose handler keeps failing leaves exactly one
/// entry. Interior mutability lets handlers that only hold
/// `&ResolutionContext` trigger nested recordings.
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: RefCell<BTreeMap<String, ResolutionFailure>>,
}

impl ErrorLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `failure` for `name`, returning the failure it replaced.
    pub fn record(&self, name: impl Into<String>, failure: ResolutionFailure) -> Option<ResolutionFailure> {
        self.entries.borrow_mut().insert(name.into(), failure)
    }

    /// Snapshot of every recorded failure.
    pub fn all(&self) -> BTreeMap<String, ResolutionFailure> {
        self.entries.borrow().clone()
    }

    pub fn get(&self, name: &str) -> Option<ResolutionFailure> {
        self.entries.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
