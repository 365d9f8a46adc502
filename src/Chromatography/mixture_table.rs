//! # Mixture Property Table
//!
//! ## Aim
//! Collects the properties of every compound of a mixture into one table: one row per
//! input name, in input order, with shared columns. A compound that cannot be looked
//! up still gets its row (all fields `Unknown`), so one bad name never costs the rest
//! of the mixture.
//!
//! ## Main Data Structures and Logic
//! - `Resolution<T>`: `Known(value)`, `Unresolved` (lookup worked, value could not be
//!   derived) or `Unknown` (lookup failed)
//! - `CompoundRow`: raw column values plus the resolved boiling point, pKa, molecular
//!   weight and logP of one compound
//! - `MixturePropertyTable`: the rows and the column list. Columns appear in discovery
//!   order: the first compound's fields first, unseen fields appended as later
//!   compounds bring them
//! - `TableBuilder<S>`: queries a `PropertyStore` for every name and runs the boiling
//!   point and dissociation resolvers
//!
//! ## Usage
//! ```rust, ignore
//! let builder = TableBuilder::new(&store);
//! let table = builder.build(&["ethanol".to_string(), "benzoic acid".to_string()])?;
//! table.pretty_print();
//! ```
use crate::Chromatography::ChromatoError;
use crate::Chromatography::boiling_point::{BoilingPoint, BoilingPointResolver};
use crate::Chromatography::pka::{Dissociation, DissociationResolver};
use crate::Chromatography::property_store::{
    CompoundId, FieldValue, PropertySet, PropertyStore,
};
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// molecular weight field (g/mol) as named by PubChem
pub const MOLECULAR_WEIGHT_FIELD: &str = "MolecularWeight";
/// octanol-water partition descriptor as named by PubChem
pub const LOGP_FIELD: &str = "XLogP";

static UNKNOWN: FieldValue = FieldValue::Unknown;

/// Resolution state of a single derived property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution<T> {
    Known(T),
    /// the compound was found but the value could not be obtained or derived
    Unresolved,
    /// the compound itself could not be looked up
    Unknown,
}

impl<T: Copy> Resolution<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Resolution::Known(v) => Some(*v),
            Resolution::Unresolved | Resolution::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Resolution::Known(_))
    }
}

impl<T: fmt::Display> fmt::Display for Resolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Resolution::Known(v) => write!(f, "{}", v),
            Resolution::Unresolved => write!(f, "unresolved"),
            Resolution::Unknown => write!(f, "unknown"),
        }
    }
}

/// One compound of the mixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundRow {
    pub name: String,
    pub cid: Option<CompoundId>,
    /// one value per table column
    pub values: Vec<FieldValue>,
    /// °C
    pub boiling_point: Resolution<f64>,
    pub boiling_point_readings: Vec<f64>,
    pub pka: Resolution<f64>,
    /// distinct pKa candidates, ascending
    pub pka_candidates: Vec<f64>,
    /// g/mol
    pub molecular_weight: Resolution<f64>,
    pub logp: Resolution<f64>,
}

impl CompoundRow {
    pub fn lookup_failed(&self) -> bool {
        self.cid.is_none()
    }

    /// nothing usable is known about the compound
    pub fn is_fully_unresolved(&self) -> bool {
        !(self.boiling_point.is_known()
            || self.pka.is_known()
            || self.molecular_weight.is_known()
            || self.logp.is_known())
    }
}

/// Property table of a whole mixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixturePropertyTable {
    columns: Vec<String>,
    rows: Vec<CompoundRow>,
}

impl MixturePropertyTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CompoundRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&CompoundRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.name.as_str()).collect()
    }

    /// Value of `column` in row `index`; `Unknown` for an unseen column or row.
    pub fn value(&self, index: usize, column: &str) -> &FieldValue {
        let Some(col) = self.columns.iter().position(|c| c == column) else {
            return &UNKNOWN;
        };
        self.rows
            .get(index)
            .and_then(|row| row.values.get(col))
            .unwrap_or(&UNKNOWN)
    }

    pub fn to_pretty_table(&self) -> Table {
        let mut table = Table::new();
        let mut header = vec![
            Cell::new("Compound"),
            Cell::new("CID"),
            Cell::new("Tb, °C"),
            Cell::new("pKa"),
        ];
        header.extend(self.columns.iter().map(|c| Cell::new(c)));
        table.add_row(Row::new(header));
        for row in &self.rows {
            let cid = row.cid.map_or("-".to_string(), |id| id.0.to_string());
            let mut cells = vec![
                Cell::new(&row.name),
                Cell::new(&cid),
                Cell::new(&row.boiling_point.to_string()),
                Cell::new(&row.pka.to_string()),
            ];
            cells.extend(row.values.iter().map(|v| Cell::new(&v.to_string())));
            table.add_row(Row::new(cells));
        }
        table
    }

    pub fn pretty_print(&self) {
        self.to_pretty_table().printstd();
    }
}

/// Everything learned about one compound before the columns are known.
#[derive(Debug, Clone)]
pub struct ResolvedCompound {
    pub name: String,
    pub cid: Option<CompoundId>,
    pub fields: PropertySet,
    pub boiling_point: BoilingPoint,
    pub dissociation: Dissociation,
}

impl ResolvedCompound {
    fn lookup_failed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cid: None,
            fields: PropertySet::new(),
            boiling_point: BoilingPoint::unknown(),
            dissociation: Dissociation::unknown(),
        }
    }

    fn numeric_field(&self, field: &str) -> Resolution<f64> {
        if self.cid.is_none() {
            return Resolution::Unknown;
        }
        match self.fields.get(field).and_then(FieldValue::as_number) {
            Some(x) => Resolution::Known(x),
            None => Resolution::Unresolved,
        }
    }

    fn into_row(self, columns: &[String]) -> CompoundRow {
        let values = columns
            .iter()
            .map(|c| self.fields.get(c).cloned().unwrap_or_default())
            .collect();
        let molecular_weight = self.numeric_field(MOLECULAR_WEIGHT_FIELD);
        let logp = self.numeric_field(LOGP_FIELD);
        CompoundRow {
            name: self.name,
            cid: self.cid,
            values,
            boiling_point: self.boiling_point.value,
            boiling_point_readings: self.boiling_point.readings,
            pka: self.dissociation.value,
            pka_candidates: self.dissociation.candidates,
            molecular_weight,
            logp,
        }
    }
}

/// Builds `MixturePropertyTable`s from a property store.
pub struct TableBuilder<S: PropertyStore> {
    store: S,
    boiling_point: BoilingPointResolver,
    dissociation: DissociationResolver,
}

impl<S: PropertyStore> TableBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            boiling_point: BoilingPointResolver::new(),
            dissociation: DissociationResolver::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One row per name, in input order. Fails only on an empty name list.
    pub fn build(&self, names: &[String]) -> Result<MixturePropertyTable, ChromatoError> {
        if names.is_empty() {
            return Err(ChromatoError::EmptyMixture);
        }
        let compounds: Vec<ResolvedCompound> =
            names.iter().map(|name| self.resolve_compound(name)).collect();

        let mut columns: Vec<String> = Vec::new();
        for compound in &compounds {
            for field in compound.fields.field_names() {
                if !columns.iter().any(|c| c == field) {
                    columns.push(field.to_string());
                }
            }
        }

        let failed = compounds.iter().filter(|c| c.cid.is_none()).count();
        let rows: Vec<CompoundRow> = compounds
            .into_iter()
            .map(|compound| compound.into_row(&columns))
            .collect();
        info!(
            "property table built: {} compounds ({} not found), {} columns",
            rows.len(),
            failed,
            columns.len()
        );
        Ok(MixturePropertyTable { columns, rows })
    }

    /// Looks up and resolves a single compound. Store failures are logged and
    /// degraded to missing data.
    pub fn resolve_compound(&self, name: &str) -> ResolvedCompound {
        let cid = match self.store.lookup_identifier(name) {
            Ok(cid) => cid,
            Err(e) => {
                warn!("identifier lookup failed for '{}': {}", name, e);
                return ResolvedCompound::lookup_failed(name);
            }
        };
        let basic = self.store.get_basic_properties(cid).unwrap_or_else(|e| {
            warn!("basic properties of '{}' ({}) not retrieved: {}", name, cid, e);
            PropertySet::new()
        });
        let extended = self.store.get_extended_properties(cid).unwrap_or_else(|e| {
            warn!("extended properties of '{}' ({}) not retrieved: {}", name, cid, e);
            PropertySet::new()
        });
        let raw_pka = self
            .store
            .lookup_dissociation_constant(name, Some(cid))
            .unwrap_or_else(|e| {
                warn!("pKa lookup failed for '{}' ({}): {}", name, cid, e);
                Vec::new()
            });

        let boiling_point = self.boiling_point.resolve(&basic, &extended);
        let dissociation = self.dissociation.resolve(&raw_pka, &extended);
        ResolvedCompound {
            name: name.to_string(),
            cid: Some(cid),
            fields: basic.merged_with(&extended),
            boiling_point,
            dissociation,
        }
    }
}
