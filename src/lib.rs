#[allow(non_snake_case)]
pub mod Chromatography;
#[allow(non_snake_case)]
pub mod Utils;

pub use Chromatography::ChromatoError;
pub use Chromatography::chromato_finder::{ChromatoFinder, Mixture};
pub use Chromatography::decision::{
    Caveat, ChromatographyMethod, Confidence, Decision, DecisionEngine, Eluent, StationaryPhase,
};
pub use Chromatography::decision_config::{DecisionConfig, SeparationGoal};
pub use Chromatography::mixture_table::{
    CompoundRow, MixturePropertyTable, Resolution, TableBuilder,
};
pub use Chromatography::property_store::{
    CompoundId, CompoundRecord, FieldValue, LookupError, OfflinePropertyStore, PropertySet,
    PropertyStore, StoreError,
};
pub use Chromatography::results_register::{
    RecordId, RegisterError, ResultsRegister, update_results,
};
