//! Dissociation constant (pKa) resolution.
//!
//! Polyprotic acids and bases report several constants. The decision rules need
//! one per compound, so the resolver keeps every candidate and picks the
//! smallest one: the most acidic site, which is the first to ionize as the pH
//! rises. Candidates are compared with `f64::total_cmp`, so the pick does not
//! depend on the order the store returned them in.
use crate::Chromatography::mixture_table::Resolution;
use crate::Chromatography::property_store::PropertySet;
use log::debug;
use regex::Regex;

/// pKw of water at 25 °C, relating a base's pKb to its conjugate acid's pKa
const PKW: f64 = 14.0;

/// extended-set fields that may carry pKa readings
pub const PKA_FIELDS: [&str; 3] = ["pKa", "Dissociation Constants", "Dissociation Constant"];

/// Representative pKa plus all distinct candidates, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Dissociation {
    pub value: Resolution<f64>,
    pub candidates: Vec<f64>,
}

impl Dissociation {
    pub fn unknown() -> Self {
        Self {
            value: Resolution::Unknown,
            candidates: Vec::new(),
        }
    }

    /// more than one distinct constant was reported
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

pub struct DissociationResolver {
    pka_text: Regex,
}

impl Default for DissociationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DissociationResolver {
    pub fn new() -> Self {
        // an index digit ("pKa1", "pKa 2") is only taken as such when a separator follows it
        let pka_text = Regex::new(
            r"pK([ab])?(?:\s*\d\s*(?:=|:|~|of|is)|\s*(?:=|:|~|of|is)?)\s*(-?\d+(?:\.\d+)?)",
        )
        .expect("pKa regex is valid");
        Self { pka_text }
    }

    /// Combines the store's constants with the readings in the extended set.
    pub fn resolve(&self, raw: &[f64], extended: &PropertySet) -> Dissociation {
        let mut candidates: Vec<f64> = raw.iter().copied().filter(|x| x.is_finite()).collect();
        for field in PKA_FIELDS {
            if let Some(value) = extended.get(field) {
                if let Some(x) = value.as_number() {
                    candidates.push(x);
                }
                for text in value.texts() {
                    candidates.extend(self.parse_text(text));
                }
            }
        }
        candidates.sort_by(f64::total_cmp);
        candidates.dedup();

        let value = match select_representative(&candidates) {
            Some(pka) => Resolution::Known(pka),
            None => Resolution::Unresolved,
        };
        if candidates.len() > 1 {
            debug!("several pKa values {:?}, using {}", candidates, value);
        }
        Dissociation { value, candidates }
    }

    /// Every pKa mentioned in a free-text reading such as
    /// `"pKa1 = 2.15; pKa2 = 7.20 at 25 °C"`. A bare number is taken as a pKa,
    /// a `pKb` reading is converted to the pKa of the conjugate acid.
    pub fn parse_text(&self, text: &str) -> Vec<f64> {
        let found: Vec<f64> = self
            .pka_text
            .captures_iter(text)
            .filter_map(|caps| {
                let value = caps.get(2)?.as_str().parse::<f64>().ok()?;
                match caps.get(1).map(|m| m.as_str()) {
                    Some("b") => Some(PKW - value),
                    _ => Some(value),
                }
            })
            .filter(|x| x.is_finite())
            .collect();
        if !found.is_empty() {
            return found;
        }
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .into_iter()
            .collect()
    }
}

/// Smallest finite value; `None` when there is none.
pub fn select_representative(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .min_by(f64::total_cmp)
}
