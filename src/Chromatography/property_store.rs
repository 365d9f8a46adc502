//! # Property Store Module
//!
//! ## Aim
//! Defines the seam between the decision core and whatever supplies raw physicochemical
//! properties (PubChem or a locally curated file). The core never talks to a database
//! directly: it is handed a `PropertyStore` capability at construction.
//!
//! ## Main Data Structures
//! - `CompoundId`: numeric compound identifier (PubChem CID)
//! - `FieldValue`: one retrieved value - number, text, list of text readings, or the
//!   explicit `Unknown` sentinel
//! - `PropertySet`: immutable, insertion-ordered field -> value mapping produced by one store call
//! - `PropertyStore` trait: the four fallible lookups the table builder relies on
//! - `OfflinePropertyStore`: `PropertyStore` backed by in-memory `CompoundRecord`s
//!   (filled from a task file, see `Utils::load_from_file`)
//!
//! ## Usage
//! ```rust, ignore
//! let mut store = OfflinePropertyStore::new();
//! store.insert("ethanol", record);
//! let cid = store.lookup_identifier("Ethanol")?;
//! let basic = store.get_basic_properties(cid)?;
//! ```
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// identifier assigned to a compound by the property store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompoundId(pub u64);

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CID {}", self.0)
    }
}

/// error types for property lookups
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    #[error("Not found in property store: {0}")]
    NotFound(String),
    #[error("Property store unavailable: {0}")]
    Unavailable(String),
}

/// One retrieved property value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// several readings of the same property (PubChem experimental sections)
    List(Vec<String>),
    /// value was not retrieved
    #[default]
    Unknown,
}

impl FieldValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldValue::Unknown)
    }

    /// Numeric view of the value. Numeric strings such as PubChem's `"46.07"`
    /// molecular weight count as numbers; non-finite values do not.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            FieldValue::Number(x) => *x,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::List(_) | FieldValue::Unknown => return None,
        };
        x.is_finite().then_some(x)
    }

    /// Textual readings carried by the value
    pub fn texts(&self) -> Vec<&str> {
        match self {
            FieldValue::Text(s) => vec![s.as_str()],
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
            FieldValue::Number(_) | FieldValue::Unknown => Vec::new(),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Unknown,
            Value::Number(n) => n.as_f64().map_or(FieldValue::Unknown, FieldValue::Number),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::Object(_) => FieldValue::Text(value.to_string()),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(x) => Number::from_f64(*x).map_or(Value::Null, Value::Number),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Unknown => Value::Null,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Number(x) => write!(f, "{}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "{}", items.join("; ")),
            FieldValue::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Immutable, insertion-ordered set of properties returned by a single store call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PropertySet {
    fields: Vec<(String, FieldValue)>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builds a set from `(field, value)` pairs. A repeated field keeps its first
    /// position and takes the last value.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        let mut fields: Vec<(String, FieldValue)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            match fields.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => fields.push((key, value)),
            }
        }
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// New set holding every field of `self` followed by the fields of `other`
    /// that `self` lacks. On a clash `self` wins.
    pub fn merged_with(&self, other: &PropertySet) -> PropertySet {
        let mut fields = self.fields.clone();
        for (key, value) in &other.fields {
            if self.get(key).is_none() {
                fields.push((key.clone(), value.clone()));
            }
        }
        PropertySet { fields }
    }
}

impl From<Map<String, Value>> for PropertySet {
    fn from(map: Map<String, Value>) -> Self {
        PropertySet::from_pairs(
            map.iter()
                .map(|(k, v)| (k.clone(), FieldValue::from_json(v))),
        )
    }
}

impl From<PropertySet> for Map<String, Value> {
    fn from(set: PropertySet) -> Self {
        set.fields
            .into_iter()
            .map(|(k, v)| {
                let value = v.to_json();
                (k, value)
            })
            .collect()
    }
}

/// Source of raw compound properties. Every lookup may fail; callers degrade
/// failures to unknown values instead of aborting.
pub trait PropertyStore {
    fn lookup_identifier(&self, name: &str) -> Result<CompoundId, LookupError>;
    fn get_basic_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError>;
    fn get_extended_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError>;
    /// Every dissociation constant the store knows for the compound; empty when none.
    fn lookup_dissociation_constant(
        &self,
        name: &str,
        id: Option<CompoundId>,
    ) -> Result<Vec<f64>, LookupError>;
}

impl<S: PropertyStore + ?Sized> PropertyStore for &S {
    fn lookup_identifier(&self, name: &str) -> Result<CompoundId, LookupError> {
        (**self).lookup_identifier(name)
    }
    fn get_basic_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError> {
        (**self).get_basic_properties(id)
    }
    fn get_extended_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError> {
        (**self).get_extended_properties(id)
    }
    fn lookup_dissociation_constant(
        &self,
        name: &str,
        id: Option<CompoundId>,
    ) -> Result<Vec<f64>, LookupError> {
        (**self).lookup_dissociation_constant(name, id)
    }
}

/// locally stored properties of one compound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub cid: u64,
    #[serde(default)]
    pub basic: PropertySet,
    #[serde(default)]
    pub extended: PropertySet,
    #[serde(default)]
    pub pka: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("'{name}' has CID {cid}, which '{existing}' already holds with different properties")]
    CidConflict {
        name: String,
        cid: u64,
        existing: String,
    },
    #[error("Compound '{0}' is listed more than once")]
    DuplicateName(String),
}

/// `PropertyStore` over compound records held in memory. Names are matched
/// case-insensitively; synonyms may share a CID only with identical records.
#[derive(Debug, Clone, Default)]
pub struct OfflinePropertyStore {
    records: HashMap<u64, CompoundRecord>,
    by_name: HashMap<String, u64>,
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl OfflinePropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from named records, in name order. Two names that only
    /// differ in case or surrounding whitespace are rejected.
    pub fn from_records(records: HashMap<String, CompoundRecord>) -> Result<Self, StoreError> {
        let mut entries: Vec<(String, CompoundRecord)> = records.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut store = Self::new();
        for (name, record) in entries {
            if store.by_name.contains_key(&normalize_name(&name)) {
                return Err(StoreError::DuplicateName(name));
            }
            store.insert(&name, record)?;
        }
        Ok(store)
    }

    /// Adds (or replaces) the record stored under `name`.
    pub fn insert(&mut self, name: &str, record: CompoundRecord) -> Result<(), StoreError> {
        let key = normalize_name(name);
        let cid = record.cid;
        if let Some(existing) = self
            .by_name
            .iter()
            .filter(|(other, other_cid)| **other_cid == cid && **other != key)
            .map(|(other, _)| other)
            .min()
        {
            if self.records.get(&cid) != Some(&record) {
                return Err(StoreError::CidConflict {
                    name: name.to_string(),
                    cid,
                    existing: existing.clone(),
                });
            }
        }
        if let Some(old_cid) = self.by_name.insert(key, cid) {
            if old_cid != cid && !self.by_name.values().any(|&c| c == old_cid) {
                self.records.remove(&old_cid);
            }
        }
        self.records.insert(cid, record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn record_by_cid(&self, id: CompoundId) -> Result<&CompoundRecord, LookupError> {
        self.records
            .get(&id.0)
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }
}

impl PropertyStore for OfflinePropertyStore {
    fn lookup_identifier(&self, name: &str) -> Result<CompoundId, LookupError> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&cid| CompoundId(cid))
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }

    fn get_basic_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError> {
        Ok(self.record_by_cid(id)?.basic.clone())
    }

    fn get_extended_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError> {
        Ok(self.record_by_cid(id)?.extended.clone())
    }

    fn lookup_dissociation_constant(
        &self,
        name: &str,
        id: Option<CompoundId>,
    ) -> Result<Vec<f64>, LookupError> {
        let record = match id {
            Some(id) => self.record_by_cid(id)?,
            None => {
                let id = self.lookup_identifier(name)?;
                self.record_by_cid(id)?
            }
        };
        Ok(record.pka.clone())
    }
}
