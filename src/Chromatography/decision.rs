//! # Chromatography Decision Engine
//!
//! ## Aim
//! Chooses one chromatography family for a whole mixture from its resolved property
//! table, together with the operating parameters that family needs.
//!
//! ## Rules
//! Evaluated in order, the first match wins:
//! 1. every compound boils below the volatility threshold and none is ionizable
//!    -> gas chromatography
//! 2. some compound is ionizable and some compound is high-boiling or has no
//!    known boiling point -> ion-aware liquid chromatography, with a suggested pH
//!    taken from the pKa farthest from neutral
//! 3. anything else -> reverse-phase liquid chromatography
//!
//! "Volatile" and "ionizable" are judged with the thresholds of `DecisionConfig`.
//! Missing data never fails a decision. Each missing value becomes a `Caveat`, and
//! a mixture about which nothing is known gets the default family with
//! `Confidence::Low`.
use crate::Chromatography::ChromatoError;
use crate::Chromatography::decision_config::{DecisionConfig, SeparationGoal};
use crate::Chromatography::mixture_table::{CompoundRow, MixturePropertyTable, Resolution};
use log::info;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NEUTRAL_PH: f64 = 7.0;
const PH_RANGE: (f64, f64) = (0.0, 14.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChromatographyMethod {
    /// gas chromatography
    GasChromatography,
    /// ion-exchange / ion-pair HPLC
    IonAwareLiquid,
    /// reverse-phase HPLC
    ReversePhaseLiquid,
}

impl ChromatographyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChromatographyMethod::GasChromatography => "GC",
            ChromatographyMethod::IonAwareLiquid => "IEC",
            ChromatographyMethod::ReversePhaseLiquid => "RP-HPLC",
        }
    }
}

impl fmt::Display for ChromatographyMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationaryPhase {
    /// polar GC column (polyethylene glycol type)
    Polar,
    /// non-polar GC column (polydimethylsiloxane type)
    NonPolar,
    IonExchange,
    C18,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Eluent {
    /// inert carrier gas (He, N2 or H2)
    CarrierGas,
    AqueousBuffer { ph: f64 },
    /// water/acetonitrile gradient, starting water-rich when `polar_rich`
    WaterAcetonitrile { polar_rich: bool },
}

impl fmt::Display for Eluent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Eluent::CarrierGas => write!(f, "inert carrier gas"),
            Eluent::AqueousBuffer { ph } => write!(f, "aqueous buffer, pH {:.1}", ph),
            Eluent::WaterAcetonitrile { polar_rich: true } => {
                write!(f, "water/acetonitrile gradient, water-rich start")
            }
            Eluent::WaterAcetonitrile { polar_rich: false } => {
                write!(f, "water/acetonitrile gradient")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Normal,
    /// no property of any compound was known
    Low,
}

/// Missing or ambiguous data the decision was made around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Caveat {
    LookupFailed {
        compound: String,
    },
    BoilingPointUnresolved {
        compound: String,
    },
    PkaUnresolved {
        compound: String,
    },
    AmbiguousBoilingPoint {
        compound: String,
        readings: Vec<f64>,
        chosen: f64,
    },
    AmbiguousPka {
        compound: String,
        candidates: Vec<f64>,
        chosen: f64,
    },
    SizeExclusionAdvised {
        compound: String,
        molecular_weight: f64,
    },
}

impl fmt::Display for Caveat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Caveat::LookupFailed { compound } => {
                write!(f, "{}: not found, all properties unknown", compound)
            }
            Caveat::BoilingPointUnresolved { compound } => {
                write!(f, "{}: boiling point unresolved", compound)
            }
            Caveat::PkaUnresolved { compound } => write!(f, "{}: pKa unresolved", compound),
            Caveat::AmbiguousBoilingPoint {
                compound,
                readings,
                chosen,
            } => write!(
                f,
                "{}: {} boiling point readings {:?}, using median {} °C",
                compound,
                readings.len(),
                readings,
                chosen
            ),
            Caveat::AmbiguousPka {
                compound,
                candidates,
                chosen,
            } => write!(
                f,
                "{}: several pKa values {:?}, using the most acidic {}",
                compound, candidates, chosen
            ),
            Caveat::SizeExclusionAdvised {
                compound,
                molecular_weight,
            } => write!(
                f,
                "{}: molecular weight {} g/mol, consider size exclusion chromatography",
                compound, molecular_weight
            ),
        }
    }
}

/// Recommended separation for one mixture. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    method: ChromatographyMethod,
    stationary_phase: Option<StationaryPhase>,
    eluent: Option<Eluent>,
    suggested_ph: Option<f64>,
    driving_rows: Vec<usize>,
    caveats: Vec<Caveat>,
    confidence: Confidence,
}

impl Decision {
    pub fn method(&self) -> ChromatographyMethod {
        self.method
    }

    pub fn stationary_phase(&self) -> Option<StationaryPhase> {
        self.stationary_phase
    }

    pub fn eluent(&self) -> Option<Eluent> {
        self.eluent
    }

    pub fn suggested_ph(&self) -> Option<f64> {
        self.suggested_ph
    }

    /// indices of the table rows that triggered the chosen rule
    pub fn driving_rows(&self) -> &[usize] {
        &self.driving_rows
    }

    /// the rows behind `driving_rows`, looked up in the table the decision came from
    pub fn driving_compounds<'t>(&self, table: &'t MixturePropertyTable) -> Vec<&'t CompoundRow> {
        self.driving_rows
            .iter()
            .filter_map(|&i| table.row(i))
            .collect()
    }

    pub fn caveats(&self) -> &[Caveat] {
        &self.caveats
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Method"),
            Cell::new(self.method.as_str()),
        ]));
        if let Some(phase) = self.stationary_phase {
            table.add_row(Row::new(vec![
                Cell::new("Stationary phase"),
                Cell::new(&format!("{:?}", phase)),
            ]));
        }
        if let Some(eluent) = self.eluent {
            table.add_row(Row::new(vec![
                Cell::new("Eluent"),
                Cell::new(&eluent.to_string()),
            ]));
        }
        if let Some(ph) = self.suggested_ph {
            table.add_row(Row::new(vec![
                Cell::new("pH"),
                Cell::new(&format!("{:.1}", ph)),
            ]));
        }
        table.add_row(Row::new(vec![
            Cell::new("Confidence"),
            Cell::new(&format!("{:?}", self.confidence)),
        ]));
        for caveat in &self.caveats {
            table.add_row(Row::new(vec![
                Cell::new("Caveat"),
                Cell::new(&caveat.to_string()),
            ]));
        }
        table.printstd();
    }
}

/// Rule-based selection of a chromatography family.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Result<Self, ChromatoError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn decide(&self, table: &MixturePropertyTable) -> Result<Decision, ChromatoError> {
        if table.is_empty() {
            return Err(ChromatoError::EmptyMixture);
        }
        let rows = table.rows();
        let volatile: Vec<bool> = rows.iter().map(|r| self.is_volatile(r)).collect();
        let all_volatile = volatile.iter().all(|&v| v);
        let ionizable: Vec<usize> = (0..rows.len())
            .filter(|&i| self.is_ionizable(&rows[i]))
            .collect();

        let caveats = self.caveats(rows);
        let confidence = if rows.iter().all(CompoundRow::is_fully_unresolved) {
            Confidence::Low
        } else {
            Confidence::Normal
        };
        let polar = mean_logp(rows).is_some_and(|logp| logp < self.config.polar_logp_cutoff);

        let any_charged = rows.iter().any(|r| self.is_charged(r));

        let decision = if all_volatile && !any_charged {
            let phase = if polar {
                StationaryPhase::Polar
            } else {
                StationaryPhase::NonPolar
            };
            Decision {
                method: ChromatographyMethod::GasChromatography,
                stationary_phase: Some(phase),
                eluent: Some(Eluent::CarrierGas),
                suggested_ph: None,
                driving_rows: (0..rows.len()).collect(),
                caveats,
                confidence,
            }
        } else if !ionizable.is_empty() && !all_volatile {
            let (extreme_row, extreme_pka) = most_extreme_pka(rows, &ionizable);
            let ph = self.suggested_ph(extreme_pka);
            info!(
                "most extreme pKa {} ({}), suggested pH {:.1}",
                extreme_pka, rows[extreme_row].name, ph
            );
            Decision {
                method: ChromatographyMethod::IonAwareLiquid,
                stationary_phase: Some(StationaryPhase::IonExchange),
                eluent: Some(Eluent::AqueousBuffer { ph }),
                suggested_ph: Some(ph),
                driving_rows: ionizable,
                caveats,
                confidence,
            }
        } else {
            let driving_rows = if all_volatile {
                (0..rows.len()).collect()
            } else {
                (0..rows.len()).filter(|&i| !volatile[i]).collect()
            };
            Decision {
                method: ChromatographyMethod::ReversePhaseLiquid,
                stationary_phase: Some(StationaryPhase::C18),
                eluent: Some(Eluent::WaterAcetonitrile { polar_rich: polar }),
                suggested_ph: None,
                driving_rows,
                caveats,
                confidence,
            }
        };
        info!(
            "{} recommended for {:?} (confidence {:?}, {} caveats)",
            decision.method,
            table.names(),
            decision.confidence,
            decision.caveats.len()
        );
        Ok(decision)
    }

    fn is_volatile(&self, row: &CompoundRow) -> bool {
        row.boiling_point
            .value()
            .is_some_and(|bp| bp < self.config.volatility_threshold_c)
    }

    fn is_ionizable(&self, row: &CompoundRow) -> bool {
        let (low, high) = self.config.ionizable_band;
        row.pka.value().is_some_and(|p| low <= p && p <= high)
    }

    /// Ionizable, or an acid stronger than the band's lower bound.
    fn is_charged(&self, row: &CompoundRow) -> bool {
        row.pka
            .value()
            .is_some_and(|p| p <= self.config.ionizable_band.1)
    }

    /// pH two sides of the pKa: away from neutral suppresses ionization,
    /// towards neutral exploits it
    fn suggested_ph(&self, pka: f64) -> f64 {
        let acidic = pka < NEUTRAL_PH;
        let below = match self.config.separation_goal {
            SeparationGoal::SuppressIonization => acidic,
            SeparationGoal::ExploitIonization => !acidic,
        };
        let ph = if below {
            pka - self.config.ph_offset
        } else {
            pka + self.config.ph_offset
        };
        ph.clamp(PH_RANGE.0, PH_RANGE.1)
    }

    fn caveats(&self, rows: &[CompoundRow]) -> Vec<Caveat> {
        let mut caveats = Vec::new();
        for row in rows {
            let compound = row.name.clone();
            if row.lookup_failed() {
                caveats.push(Caveat::LookupFailed { compound });
                continue;
            }
            match row.boiling_point {
                Resolution::Known(chosen) if row.boiling_point_readings.len() > 1 => {
                    caveats.push(Caveat::AmbiguousBoilingPoint {
                        compound: compound.clone(),
                        readings: row.boiling_point_readings.clone(),
                        chosen,
                    })
                }
                Resolution::Known(_) => {}
                Resolution::Unresolved | Resolution::Unknown => {
                    caveats.push(Caveat::BoilingPointUnresolved {
                        compound: compound.clone(),
                    })
                }
            }
            match row.pka {
                Resolution::Known(chosen) if row.pka_candidates.len() > 1 => {
                    caveats.push(Caveat::AmbiguousPka {
                        compound: compound.clone(),
                        candidates: row.pka_candidates.clone(),
                        chosen,
                    })
                }
                Resolution::Known(_) => {}
                Resolution::Unresolved | Resolution::Unknown => {
                    caveats.push(Caveat::PkaUnresolved {
                        compound: compound.clone(),
                    })
                }
            }
            if let Some(mw) = row.molecular_weight.value() {
                if mw > self.config.size_exclusion_mw {
                    caveats.push(Caveat::SizeExclusionAdvised {
                        compound,
                        molecular_weight: mw,
                    });
                }
            }
        }
        caveats
    }
}

/// Row index and pKa farthest from neutral among `candidates`; the earliest row
/// wins a tie. `candidates` must be non-empty and hold rows with a known pKa.
fn most_extreme_pka(rows: &[CompoundRow], candidates: &[usize]) -> (usize, f64) {
    let mut best: Option<(usize, f64)> = None;
    for &i in candidates {
        let Some(pka) = rows[i].pka.value() else {
            continue;
        };
        match best {
            Some((_, b)) if (pka - NEUTRAL_PH).abs() <= (b - NEUTRAL_PH).abs() => {}
            _ => best = Some((i, pka)),
        }
    }
    best.unwrap_or((candidates[0], NEUTRAL_PH))
}

fn mean_logp(rows: &[CompoundRow]) -> Option<f64> {
    let known: Vec<f64> = rows.iter().filter_map(|r| r.logp.value()).collect();
    if known.is_empty() {
        None
    } else {
        Some(known.iter().sum::<f64>() / known.len() as f64)
    }
}
