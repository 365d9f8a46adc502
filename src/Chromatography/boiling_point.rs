//! Boiling point resolution.
//!
//! PubChem gives the boiling point either as a plain number (computed/curated
//! property) or as free-text experimental readings in assorted units:
//! `"78.2 °C"`, `"173.1 °F at 760 mm Hg"`, `"351.4 K"`, `"100-102 °C"`.
//! The resolver turns whatever was retrieved into one value in °C, or marks it
//! `Unresolved`.
use crate::Chromatography::mixture_table::Resolution;
use crate::Chromatography::property_store::{FieldValue, PropertySet};
use log::debug;
use regex::Regex;

/// field holding a curated numeric boiling point in the basic property set
pub const BOILING_POINT_FIELD: &str = "BoilingPoint";
/// fields that may carry boiling point readings in the extended property set
pub const SECONDARY_BOILING_POINT_FIELDS: [&str; 3] =
    ["BoilingPoint", "Boiling Point", "Normal Boiling Point"];

const KELVIN_OFFSET: f64 = 273.15;

/// Resolved boiling point together with the readings it came from (°C).
#[derive(Debug, Clone, PartialEq)]
pub struct BoilingPoint {
    pub value: Resolution<f64>,
    pub readings: Vec<f64>,
}

impl BoilingPoint {
    /// the compound itself could not be looked up
    pub fn unknown() -> Self {
        Self {
            value: Resolution::Unknown,
            readings: Vec::new(),
        }
    }
}

pub struct BoilingPointResolver {
    reading: Regex,
}

impl Default for BoilingPointResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BoilingPointResolver {
    pub fn new() -> Self {
        // value, optional upper bound of a range, unit
        let reading = Regex::new(
            r"(-?\d+(?:\.\d+)?)(?:\s*(?:-|to)\s*(\d+(?:\.\d+)?))?\s*(?:°|º|deg(?:rees)?\.?)?\s*([CFK])\b",
        )
        .expect("boiling point regex is valid");
        Self { reading }
    }

    /// Resolves the boiling point of a compound whose identifier lookup succeeded.
    pub fn resolve(&self, basic: &PropertySet, extended: &PropertySet) -> BoilingPoint {
        if let Some(FieldValue::Number(x)) = basic.get(BOILING_POINT_FIELD) {
            if x.is_finite() {
                return BoilingPoint {
                    value: Resolution::Known(*x),
                    readings: vec![*x],
                };
            }
        }

        let mut readings: Vec<f64> = Vec::new();
        if let Some(value) = basic.get(BOILING_POINT_FIELD) {
            readings.extend(self.readings_of(value));
        }
        for field in SECONDARY_BOILING_POINT_FIELDS {
            if let Some(value) = extended.get(field) {
                readings.extend(self.readings_of(value));
            }
        }

        match median(&readings) {
            Some(bp) => {
                let bp = (bp * 10.0).round() / 10.0;
                debug!("boiling point {} °C derived from {:?}", bp, readings);
                BoilingPoint {
                    value: Resolution::Known(bp),
                    readings,
                }
            }
            None => BoilingPoint {
                value: Resolution::Unresolved,
                readings,
            },
        }
    }

    fn readings_of(&self, value: &FieldValue) -> Vec<f64> {
        match value {
            // numbers outside the basic set are taken as °C
            FieldValue::Number(x) if x.is_finite() => vec![*x],
            _ => value
                .texts()
                .into_iter()
                .filter_map(|text| self.parse_reading(text))
                .collect(),
        }
    }

    /// Parses one free-text reading into °C. Readings reporting decomposition or
    /// sublimation instead of boiling give `None`; a range gives its midpoint.
    pub fn parse_reading(&self, text: &str) -> Option<f64> {
        let lower = text.to_lowercase();
        if lower.contains("decompos") || lower.contains("sublim") {
            return None;
        }
        let caps = self.reading.captures(text)?;
        let low: f64 = caps.get(1)?.as_str().parse().ok()?;
        let value = match caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok()) {
            Some(high) => (low + high) / 2.0,
            None => low,
        };
        let celsius = match caps.get(3)?.as_str() {
            "F" => (value - 32.0) * 5.0 / 9.0,
            "K" => value - KELVIN_OFFSET,
            _ => value,
        };
        celsius.is_finite().then_some(celsius)
    }
}

/// median of the values; `None` for an empty slice
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
