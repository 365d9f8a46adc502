//! # Results Register
//!
//! Keeps every decision made during the life of the process together with the
//! property table it was made from. Entries get dense sequence ids (first record
//! = 0) and may also carry a caller-supplied mixture name. Nothing is evicted or
//! persisted.
//!
//! The register is owned by the caller and shared by reference. An internal
//! `Mutex` serializes `record` calls, so ids stay unique and monotonic when
//! several mixtures are processed on different threads. Stored values are
//! `Arc`s: every read returns the very allocation that was recorded.
use crate::Chromatography::decision::Decision;
use crate::Chromatography::mixture_table::MixturePropertyTable;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegisterError {
    #[error("A result is already recorded for mixture '{0}'")]
    DuplicateName(String),
}

#[derive(Debug)]
pub struct RegisteredResult {
    pub id: RecordId,
    pub name: Option<String>,
    pub decision: Arc<Decision>,
    pub table: Arc<MixturePropertyTable>,
}

#[derive(Debug, Default)]
struct RegisterState {
    entries: Vec<Arc<RegisteredResult>>,
    names: HashMap<String, RecordId>,
}

impl RegisterState {
    fn push(
        &mut self,
        name: Option<String>,
        decision: Arc<Decision>,
        table: Arc<MixturePropertyTable>,
    ) -> RecordId {
        let id = RecordId(self.entries.len());
        if let Some(name) = &name {
            self.names.insert(name.clone(), id);
        }
        self.entries.push(Arc::new(RegisteredResult {
            id,
            name,
            decision,
            table,
        }));
        id
    }
}

#[derive(Debug, Default)]
pub struct ResultsRegister {
    state: Mutex<RegisterState>,
}

impl ResultsRegister {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RegisterState> {
        // entries are only ever appended whole, so a poisoned lock still guards consistent data
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a decision and its table under the next sequence id.
    pub fn record(
        &self,
        decision: impl Into<Arc<Decision>>,
        table: impl Into<Arc<MixturePropertyTable>>,
    ) -> RecordId {
        let id = self.state().push(None, decision.into(), table.into());
        debug!("result {} recorded", id);
        id
    }

    /// Like `record`, but also reachable by `name`. A name can be used once.
    pub fn record_named(
        &self,
        name: &str,
        decision: impl Into<Arc<Decision>>,
        table: impl Into<Arc<MixturePropertyTable>>,
    ) -> Result<RecordId, RegisterError> {
        let mut state = self.state();
        if state.names.contains_key(name) {
            return Err(RegisterError::DuplicateName(name.to_string()));
        }
        let id = state.push(Some(name.to_string()), decision.into(), table.into());
        debug!("result {} recorded for mixture '{}'", id, name);
        Ok(id)
    }

    pub fn get(&self, id: RecordId) -> Option<Arc<Decision>> {
        self.get_entry(id).map(|entry| Arc::clone(&entry.decision))
    }

    pub fn get_table(&self, id: RecordId) -> Option<Arc<MixturePropertyTable>> {
        self.get_entry(id).map(|entry| Arc::clone(&entry.table))
    }

    pub fn get_entry(&self, id: RecordId) -> Option<Arc<RegisteredResult>> {
        self.state().entries.get(id.0).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<RegisteredResult>> {
        let state = self.state();
        let id = state.names.get(name)?;
        state.entries.get(id.0).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    /// all entries in recording order
    pub fn snapshot(&self) -> Vec<Arc<RegisteredResult>> {
        self.state().entries.clone()
    }
}

/// Adds a new result to the register, under `mixture_id` when one is given.
pub fn update_results(
    register: &ResultsRegister,
    mixture_id: Option<&str>,
    decision: Decision,
    table: MixturePropertyTable,
) -> Result<RecordId, RegisterError> {
    match mixture_id {
        Some(name) => register.record_named(name, decision, table),
        None => Ok(register.record(decision, table)),
    }
}
