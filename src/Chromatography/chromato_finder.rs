//! # ChromatoFinder
//!
//! Entry point of the crate: a `Mixture` of compound names goes in, a property table
//! and a chromatography `Decision` come out.
//!
//! ```rust, ignore
//! let mut mixture = Mixture::new();
//! mixture.add_molecule("ethanol");
//! mixture.add_molecule("benzoic acid");
//!
//! let finder = ChromatoFinder::new(&store);
//! let register = ResultsRegister::new();
//! let id = finder.run(&mixture, &register, Some("sample 1"))?;
//! register.get(id).unwrap().pretty_print();
//! ```
use crate::Chromatography::ChromatoError;
use crate::Chromatography::decision::{Decision, DecisionEngine};
use crate::Chromatography::decision_config::DecisionConfig;
use crate::Chromatography::mixture_table::{MixturePropertyTable, Resolution, TableBuilder};
use crate::Chromatography::property_store::PropertyStore;
use crate::Chromatography::results_register::{RecordId, ResultsRegister, update_results};
use serde::{Deserialize, Serialize};

/// Ordered list of compound names; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mixture {
    molecules: Vec<String>,
}

impl Mixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            molecules: names
                .into_iter()
                .map(|name| Into::<String>::into(name).trim().to_string())
                .collect(),
        }
    }

    /// Appends a compound and returns its row index.
    pub fn add_molecule(&mut self, name: &str) -> usize {
        self.molecules.push(name.trim().to_string());
        self.molecules.len() - 1
    }

    pub fn molecules(&self) -> &[String] {
        &self.molecules
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }
}

pub struct ChromatoFinder<S: PropertyStore> {
    builder: TableBuilder<S>,
    engine: DecisionEngine,
}

impl<S: PropertyStore> ChromatoFinder<S> {
    /// finder with the default decision thresholds
    pub fn new(store: S) -> Self {
        Self {
            builder: TableBuilder::new(store),
            engine: DecisionEngine::default(),
        }
    }

    pub fn with_config(store: S, config: DecisionConfig) -> Result<Self, ChromatoError> {
        Ok(Self {
            builder: TableBuilder::new(store),
            engine: DecisionEngine::new(config)?,
        })
    }

    pub fn config(&self) -> &DecisionConfig {
        self.engine.config()
    }

    /// representative pKa of a single compound
    pub fn find_pka(&self, name: &str) -> Resolution<f64> {
        self.builder.resolve_compound(name).dissociation.value
    }

    /// boiling point of a single compound, °C
    pub fn find_boiling_point(&self, name: &str) -> Resolution<f64> {
        self.builder.resolve_compound(name).boiling_point.value
    }

    pub fn get_properties_table(
        &self,
        mixture: &Mixture,
    ) -> Result<MixturePropertyTable, ChromatoError> {
        self.builder.build(mixture.molecules())
    }

    pub fn det_chromato(&self, table: &MixturePropertyTable) -> Result<Decision, ChromatoError> {
        self.engine.decide(table)
    }

    /// Builds the table, decides, and records both in `register`.
    pub fn run(
        &self,
        mixture: &Mixture,
        register: &ResultsRegister,
        mixture_id: Option<&str>,
    ) -> Result<RecordId, ChromatoError> {
        let table = self.get_properties_table(mixture)?;
        let decision = self.det_chromato(&table)?;
        Ok(update_results(register, mixture_id, decision, table)?)
    }
}
