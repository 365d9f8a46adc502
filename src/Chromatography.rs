/// source of raw compound properties: `PropertyStore` trait and the offline store
pub mod property_store;
/// boiling point derivation from numeric and free-text readings (°C, °F, K)
pub mod boiling_point;
/// one representative pKa from zero, one or many reported constants
pub mod pka;
/// per-mixture property table and its builder
pub mod mixture_table;
/// thresholds of the decision rules
pub mod decision_config;
/// rule-based choice of GC, ion-aware HPLC or reverse-phase HPLC
/// # Examples
/// ```
/// use Chrfinder::Chromatography::chromato_finder::{ChromatoFinder, Mixture};
/// use Chrfinder::Chromatography::decision::ChromatographyMethod;
/// use Chrfinder::Chromatography::property_store::{CompoundRecord, OfflinePropertyStore, PropertySet, FieldValue};
///
/// let mut store = OfflinePropertyStore::new();
/// store.insert(
///     "benzene",
///     CompoundRecord {
///         cid: 241,
///         basic: PropertySet::from_pairs(vec![("BoilingPoint", FieldValue::Number(80.1))]),
///         extended: PropertySet::new(),
///         pka: vec![],
///     },
/// )
/// .unwrap();
/// let mut mixture = Mixture::new();
/// mixture.add_molecule("benzene");
///
/// let finder = ChromatoFinder::new(&store);
/// let table = finder.get_properties_table(&mixture).unwrap();
/// let decision = finder.det_chromato(&table).unwrap();
/// assert_eq!(decision.method(), ChromatographyMethod::GasChromatography);
/// ```
pub mod decision;
/// process-lifetime register of decisions
pub mod results_register;
/// `Mixture` and the `ChromatoFinder` facade
pub mod chromato_finder;

#[cfg(test)]
mod mixture_table_tests;
#[cfg(test)]
mod results_register_tests;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChromatoError {
    #[error("Mixture is empty: at least one compound is required")]
    EmptyMixture,
    #[error(transparent)]
    InvalidConfig(#[from] decision_config::ConfigError),
    #[error(transparent)]
    Register(#[from] results_register::RegisterError),
}
