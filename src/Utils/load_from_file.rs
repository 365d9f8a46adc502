//! Task file loading.
//!
//! A task file is plain text split into sections by header lines:
//! ```text
//! SUBSTANCES
//! ethanol, benzoic acid
//! toluene
//! SUBSTANCES DATA
//! {
//!   "ethanol": {"cid": 702, "basic": {"MolecularWeight": "46.07", "XLogP": -0.1},
//!               "extended": {"Boiling Point": ["78.2 °C"]}, "pka": [15.9]}
//! }
//! SETTINGS
//! {"volatility_threshold_c": 280.0}
//! ```
//! A section runs until the next known header or the end of the file. `SETTINGS`
//! is optional; `SUBSTANCES DATA` may be absent, in which case no compound is
//! found and the decision is made with low confidence.
use crate::Chromatography::chromato_finder::Mixture;
use crate::Chromatography::decision_config::{ConfigError, DecisionConfig};
use crate::Chromatography::property_store::{CompoundRecord, OfflinePropertyStore, StoreError};
use log::{error, info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const SUBSTANCES_HEADERS: [&str; 2] = ["SUBSTANCES", "SUBSTANCES LIST"];
const DATA_HEADERS: [&str; 3] = ["SUBSTANCES DATA", "SUBS DATA", "SUBSTANCE DATA"];
const SETTINGS_HEADERS: [&str; 1] = ["SETTINGS"];

#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("File '{0}' does not exist")]
    NotFound(String),
    #[error("Failed to read file '{file}': {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("No '{header}' header found in file '{file}'")]
    MissingSection { header: String, file: String },
    #[error("Error parsing {section} at line {line}, column {column}: {message}")]
    Json {
        section: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("No substances found in file '{0}'")]
    EmptyMixture(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid substance data: {0}")]
    Store(#[from] StoreError),
}

/// everything needed to run one mixture through the decision pipeline
#[derive(Debug, Clone)]
pub struct MixtureTask {
    pub mixture: Mixture,
    pub store: OfflinePropertyStore,
    pub config: DecisionConfig,
}

fn read_lines(file_name: &str) -> Result<Vec<String>, TaskFileError> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(TaskFileError::NotFound(file_name.to_string()));
    }
    let file = File::open(path).map_err(|source| TaskFileError::Io {
        file: file_name.to_string(),
        source,
    })?;
    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<String>, _>>()
        .map_err(|source| TaskFileError::Io {
            file: file_name.to_string(),
            source,
        })
}

fn is_header(line: &str) -> bool {
    let trimmed = line.trim().to_uppercase();
    SUBSTANCES_HEADERS
        .iter()
        .chain(DATA_HEADERS.iter())
        .chain(SETTINGS_HEADERS.iter())
        .any(|h| *h == trimmed)
}

/// Line range `[start, end)` of the first section opened by one of `headers`.
fn find_section(lines: &[String], headers: &[&str]) -> Option<(usize, usize)> {
    let header_index = lines.iter().position(|line| {
        let trimmed = line.trim().to_uppercase();
        headers.iter().any(|h| *h == trimmed)
    })?;
    let start = header_index + 1;
    let end = lines[start..]
        .iter()
        .position(|line| is_header(line))
        .map_or(lines.len(), |offset| start + offset);
    Some((start, end))
}

/// Splits a comma/newline separated list of names, dropping blanks.
pub fn parse_substance_list(section: &str) -> Vec<String> {
    section
        .split(|c| c == ',' || c == '\n')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn substance_list_from_lines(
    lines: &[String],
    file_name: &str,
) -> Result<Vec<String>, TaskFileError> {
    let (start, end) =
        find_section(lines, &SUBSTANCES_HEADERS).ok_or_else(|| TaskFileError::MissingSection {
            header: "SUBSTANCES".to_string(),
            file: file_name.to_string(),
        })?;
    let molecules = parse_substance_list(&lines[start..end].join("\n"));
    if molecules.is_empty() {
        return Err(TaskFileError::EmptyMixture(file_name.to_string()));
    }
    Ok(molecules)
}

/// load from file list of substances
pub fn load_substance_list(file_name: &str) -> Result<Vec<String>, TaskFileError> {
    let lines = read_lines(file_name)?;
    substance_list_from_lines(&lines, file_name)
}

fn parse_json_section<T: serde::de::DeserializeOwned>(
    lines: &[String],
    start: usize,
    end: usize,
    section: &str,
) -> Result<T, TaskFileError> {
    let text = lines[start..end].join("\n");
    serde_json::from_str(&text).map_err(|e| {
        // serde counts lines from 1 within the section
        let line = start + e.line();
        error!(
            "Error parsing {} at line {}, column {}: {}",
            section,
            line,
            e.column(),
            e
        );
        if let Some(problem_line) = lines.get(line.saturating_sub(1)) {
            error!("Problematic line: {}", problem_line);
        }
        TaskFileError::Json {
            section: section.to_string(),
            line,
            column: e.column(),
            message: e.to_string(),
        }
    })
}

fn substance_data_from_lines(
    lines: &[String],
    file_name: &str,
) -> Result<HashMap<String, CompoundRecord>, TaskFileError> {
    let Some((start, end)) = find_section(lines, &DATA_HEADERS) else {
        warn!("No 'SUBSTANCES DATA' section in file '{}'", file_name);
        return Ok(HashMap::new());
    };
    let records: HashMap<String, CompoundRecord> =
        parse_json_section(lines, start, end, "SUBSTANCES DATA")?;
    if records.is_empty() {
        warn!("Substance data section of '{}' is empty", file_name);
    }
    for (name, record) in &records {
        if record.basic.is_empty() && record.extended.is_empty() && record.pka.is_empty() {
            warn!("Substance '{}' has no properties in '{}'", name, file_name);
        }
    }
    Ok(records)
}

/// compound records of the `SUBSTANCES DATA` section, keyed by name
pub fn load_substance_data(
    file_name: &str,
) -> Result<HashMap<String, CompoundRecord>, TaskFileError> {
    let lines = read_lines(file_name)?;
    substance_data_from_lines(&lines, file_name)
}

fn settings_from_lines(lines: &[String]) -> Result<DecisionConfig, TaskFileError> {
    match find_section(lines, &SETTINGS_HEADERS) {
        Some((start, end)) => {
            let config: DecisionConfig = parse_json_section(lines, start, end, "SETTINGS")?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(DecisionConfig::default()),
    }
}

/// Loads the mixture, the offline property records and the settings of a task file.
pub fn load_task(file_name: &str) -> Result<MixtureTask, TaskFileError> {
    let lines = read_lines(file_name)?;
    let molecules = substance_list_from_lines(&lines, file_name)?;
    let records = substance_data_from_lines(&lines, file_name)?;
    let config = settings_from_lines(&lines)?;

    for name in &molecules {
        if !records.keys().any(|k| k.trim().eq_ignore_ascii_case(name)) {
            warn!("No local data for '{}' in '{}'", name, file_name);
        }
    }
    info!(
        "Task '{}' loaded: {} substances, {} records",
        file_name,
        molecules.len(),
        records.len()
    );
    Ok(MixtureTask {
        mixture: Mixture::from_names(molecules),
        store: OfflinePropertyStore::from_records(records)?,
        config,
    })
}
