//! Input decoding and normalization.
//!
//! The input is a JSON object with a `statement` list. Each statement gives an
//! `action` and a `resource`, each either a single string or a list of strings:
//!
//! ```json
//! {"statement": [{"action": "s3:GetObject", "resource": ["arn:aws:s3:::a/*", "arn:aws:s3:::b/*"]}]}
//! ```

use log::debug;
use serde::Deserialize;
use std::io::Read;

use crate::error::{PolicySimError, PolicySimResult};
use crate::types::NormalizedCheck;

/// Raw input as read from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct Input {
    // Earlier releases called this field `simulates`.
    #[serde(alias = "simulates")]
    pub statement: Vec<CheckSpecification>,
}

/// One declared check before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckSpecification {
    // A missing key decodes to an empty list and is rejected by `normalize`.
    #[serde(default)]
    pub action: StringOrList,
    #[serde(default)]
    pub resource: StringOrList,
}

/// A JSON string or a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    Single(String),
    List(Vec<String>),
}

impl Default for StringOrList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl StringOrList {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(value) => vec![value],
            Self::List(values) => values,
        }
    }
}

/// Normalize one statement; `index` is its position in the input.
pub fn normalize(index: usize, spec: CheckSpecification) -> PolicySimResult<NormalizedCheck> {
    let actions = spec.action.into_vec();
    if actions.is_empty() {
        return Err(PolicySimError::EmptyField {
            index,
            field: "action",
        });
    }
    let resources = spec.resource.into_vec();
    if resources.is_empty() {
        return Err(PolicySimError::EmptyField {
            index,
            field: "resource",
        });
    }
    Ok(NormalizedCheck { actions, resources })
}

impl Input {
    /// Normalize every statement, stopping at the first invalid one.
    pub fn normalize(self) -> PolicySimResult<Vec<NormalizedCheck>> {
        if self.statement.is_empty() {
            return Err(PolicySimError::NoStatements);
        }
        self.statement
            .into_iter()
            .enumerate()
            .map(|(index, spec)| normalize(index, spec))
            .collect()
    }
}

/// Decode and normalize input from a JSON reader.
pub fn read_checks<R: Read>(reader: R) -> PolicySimResult<Vec<NormalizedCheck>> {
    let input: Input = serde_json::from_reader(reader)?;
    debug!("Input decoded: {} statements", input.statement.len());
    input.normalize()
}

/// Decode and normalize input from a JSON string.
pub fn parse_checks(json: &str) -> PolicySimResult<Vec<NormalizedCheck>> {
    read_checks(json.as_bytes())
}
