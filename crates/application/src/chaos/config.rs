//! Chaos configuration validation
//!
//! A chaos document is an ordered list of entries. Each entry may carry a
//! numeric `weight` (default [`DEFAULT_WEIGHT`]) and must name exactly one
//! fault kind:
//!
//! ```json
//! [
//!   {"weight": 5, "statusCode": {"code": 500, "body": "Something went wrong"}},
//!   {"weight": 5, "latency": {"latency": 10000, "jitter": 200}}
//! ]
//! ```
//!
//! Every problem found is collected; a document with any problem is rejected
//! as a whole.

use std::fmt;
use std::time::Duration;

use domain::{
    DEFAULT_WEIGHT, DomainError, FaultAction, LatencyFault, MAX_TOTAL_WEIGHT, StatusCodeFault,
    WeightedChaos, WeightedFault,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Entry key holding the weight
pub const WEIGHT_KEY: &str = "weight";

/// Top-level key of an object-shaped chaos document
pub const DOCUMENT_KEY: &str = "chaos";

/// Recognized fault kinds, as spelled in a chaos document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    StatusCode,
    Latency,
}

impl FaultKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusCode => "statusCode",
            Self::Latency => "latency",
        }
    }

    fn parse(key: &str) -> Option<Self> {
        match key {
            "statusCode" => Some(Self::StatusCode),
            "latency" => Some(Self::Latency),
            _ => None,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem found in a chaos document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChaosEntryError {
    #[error("chaos document must be a list of entries")]
    NotAList,

    #[error("entry {index}: must be a table, found {found}")]
    NotATable { index: usize, found: String },

    #[error("entry {index}: unable to interpret {value} as a weight")]
    InvalidWeight { index: usize, value: String },

    #[error("entry {index}: must have exactly 1 chaos; has {count}")]
    KindCount { index: usize, count: usize },

    #[error("entry {index}: unrecognized chaos type `{kind}`")]
    UnknownKind { index: usize, kind: String },

    #[error("entry {index}: invalid {kind} settings: {reason}")]
    InvalidSettings {
        index: usize,
        kind: FaultKind,
        reason: String,
    },

    #[error("sum of weights must be <= 100; is {0}")]
    WeightSum(f64),

    #[error(transparent)]
    Rejected(#[from] DomainError),
}

/// A rejected chaos document, with every problem found in it
#[derive(Debug, Clone, PartialEq)]
pub struct ChaosConfigError {
    errors: Vec<ChaosEntryError>,
}

impl ChaosConfigError {
    pub fn new(errors: Vec<ChaosEntryError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ChaosEntryError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<ChaosEntryError> for ChaosConfigError {
    fn from(error: ChaosEntryError) -> Self {
        Self::new(vec![error])
    }
}

impl fmt::Display for ChaosConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [single] => write!(f, "invalid chaos configuration: {single}"),
            errors => {
                write!(f, "invalid chaos configuration ({} errors): ", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{error}")?;
                }
                Ok(())
            },
        }
    }
}

impl std::error::Error for ChaosConfigError {}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StatusCodeSettings {
    code: u16,
    #[serde(default)]
    body: Option<String>,
}

/// Milliseconds
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LatencySettings {
    #[serde(default)]
    latency: u64,
    #[serde(default)]
    jitter: u64,
}

/// Validate a whole chaos document
///
/// Accepts a top-level list of entries, or an object whose only key is
/// `chaos` holding that list. An empty object is an empty list.
pub fn parse_chaos_document(document: &Value) -> Result<WeightedChaos, ChaosConfigError> {
    match document {
        Value::Array(entries) => parse_chaos_entries(entries),
        Value::Object(map) if map.is_empty() => Ok(WeightedChaos::none()),
        Value::Object(map) if map.len() == 1 => match map.get(DOCUMENT_KEY) {
            Some(Value::Array(entries)) => parse_chaos_entries(entries),
            _ => Err(ChaosEntryError::NotAList.into()),
        },
        _ => Err(ChaosEntryError::NotAList.into()),
    }
}

/// Validate a list of chaos entries, collecting every problem
pub fn parse_chaos_entries(entries: &[Value]) -> Result<WeightedChaos, ChaosConfigError> {
    let mut errors = Vec::new();
    let mut parsed = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        match parse_entry(index, entry) {
            Ok(fault) => parsed.push(fault),
            Err(error) => errors.push(error),
        }
    }

    let total: f64 = parsed.iter().map(|fault| fault.weight).sum();
    if total > MAX_TOTAL_WEIGHT {
        errors.push(ChaosEntryError::WeightSum(total));
    }

    if !errors.is_empty() {
        return Err(ChaosConfigError::new(errors));
    }

    WeightedChaos::new(parsed).map_err(|error| ChaosEntryError::from(error).into())
}

fn parse_entry(index: usize, entry: &Value) -> Result<WeightedFault, ChaosEntryError> {
    let Value::Object(map) = entry else {
        return Err(ChaosEntryError::NotATable {
            index,
            found: json_type_name(entry).to_string(),
        });
    };

    let weight = parse_weight(index, map.get(WEIGHT_KEY))?;

    let mut kinds = map.iter().filter(|(key, _)| key.as_str() != WEIGHT_KEY);
    let (key, settings) = match (kinds.next(), kinds.next()) {
        (Some(only), None) => only,
        _ => {
            let count = map.keys().filter(|key| key.as_str() != WEIGHT_KEY).count();
            return Err(ChaosEntryError::KindCount { index, count });
        },
    };

    let Some(kind) = FaultKind::parse(key) else {
        return Err(ChaosEntryError::UnknownKind {
            index,
            kind: key.clone(),
        });
    };

    let action = parse_action(kind, settings).map_err(|reason| ChaosEntryError::InvalidSettings {
        index,
        kind,
        reason,
    })?;

    Ok(WeightedFault::new(weight, action))
}

fn parse_weight(index: usize, value: Option<&Value>) -> Result<f64, ChaosEntryError> {
    let Some(value) = value else {
        return Ok(DEFAULT_WEIGHT);
    };
    value
        .as_f64()
        .filter(|weight| weight.is_finite() && *weight >= 0.0)
        .ok_or_else(|| ChaosEntryError::InvalidWeight {
            index,
            value: value.to_string(),
        })
}

fn parse_action(kind: FaultKind, settings: &Value) -> Result<FaultAction, String> {
    match kind {
        FaultKind::StatusCode => {
            let settings = StatusCodeSettings::deserialize(settings).map_err(|e| e.to_string())?;
            StatusCodeFault::new(settings.code, settings.body)
                .map(FaultAction::StatusCode)
                .map_err(|e| e.to_string())
        },
        FaultKind::Latency => {
            let settings = LatencySettings::deserialize(settings).map_err(|e| e.to_string())?;
            Ok(FaultAction::Latency(LatencyFault::new(
                Duration::from_millis(settings.latency),
                Duration::from_millis(settings.jitter),
            )))
        },
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}
