//! JSON documents exchanged with a host: the input array and the result array.
//!
//! Input data entries are kept as raw JSON values until validation so a
//! non-numeric entry is reported as its own error rather than a parse failure.
//! `NaN` determinants are written as `null`, infinities as `"inf"` and `"-inf"`.

use crate::batch::{BatchError, DeterminantArray, batch_determinants};
use crate::config::DeterminantConfig;
use crate::domain::{DetnError, DetnResult, ElementOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayDocument {
    pub shape: Vec<usize>,
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<ElementOrder>,
}

impl ArrayDocument {
    pub fn from_values(shape: Vec<usize>, data: &[f64], order: Option<ElementOrder>) -> Self {
        Self {
            shape,
            data: data.iter().map(|&value| Value::from(value)).collect(),
            order,
        }
    }

    /// Every entry must be a JSON number.
    pub fn numeric_data(&self) -> Result<Vec<f64>, BatchError> {
        self.data
            .iter()
            .enumerate()
            .map(|(index, value)| value.as_f64().ok_or(BatchError::NotFloatingPoint { index }))
            .collect()
    }

    /// Order declared by the document, else the configured one.
    pub fn resolved_order(&self, config: &DeterminantConfig) -> ElementOrder {
        self.order.unwrap_or(config.element_order)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeterminantDocument {
    pub shape: Vec<usize>,
    #[serde(with = "determinant_entries")]
    pub determinants: Vec<f64>,
    #[serde(default)]
    pub singular_indices: Vec<usize>,
}

impl DeterminantDocument {
    pub fn values(&self) -> &[f64] {
        &self.determinants
    }
}

impl From<&DeterminantArray> for DeterminantDocument {
    fn from(array: &DeterminantArray) -> Self {
        Self {
            shape: array.shape().to_vec(),
            determinants: array.values().to_vec(),
            singular_indices: array.singular_indices().to_vec(),
        }
    }
}

/// JSON has no non-finite numbers: `NaN` maps to `null` and the infinities
/// to the strings `format_determinant` prints for them.
mod determinant_entries {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub(super) fn serialize<S: Serializer>(
        values: &[f64],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|&value| encode(value))
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<f64>, D::Error> {
        Vec::<Value>::deserialize(deserializer)?
            .iter()
            .enumerate()
            .map(|(index, value)| {
                decode(value).ok_or_else(|| {
                    D::Error::custom(format!(
                        "determinants[{index}] must be a number, null, \"inf\" or \"-inf\", got {value}"
                    ))
                })
            })
            .collect()
    }

    fn encode(value: f64) -> Value {
        if value.is_nan() {
            Value::Null
        } else if value == f64::INFINITY {
            Value::from("inf")
        } else if value == f64::NEG_INFINITY {
            Value::from("-inf")
        } else {
            Value::from(value)
        }
    }

    fn decode(value: &Value) -> Option<f64> {
        match value {
            Value::Null => Some(f64::NAN),
            Value::Number(number) => number.as_f64(),
            Value::String(text) => match text.as_str() {
                "inf" => Some(f64::INFINITY),
                "-inf" => Some(f64::NEG_INFINITY),
                "NaN" => Some(f64::NAN),
                _ => None,
            },
            _ => None,
        }
    }
}

pub fn parse_array_document(source: &str) -> DetnResult<ArrayDocument> {
    serde_json::from_str(source).map_err(|error| {
        DetnError::input_validation(
            "INPUT.DOCUMENT_PARSE",
            format!("failed to parse array document: {error}"),
        )
    })
}

pub fn parse_determinant_document(source: &str) -> DetnResult<DeterminantDocument> {
    serde_json::from_str(source).map_err(|error| {
        DetnError::input_validation(
            "INPUT.DOCUMENT_PARSE",
            format!("failed to parse determinant document: {error}"),
        )
    })
}

/// Validates an input document and computes its determinants.
pub fn compute_document(
    document: &ArrayDocument,
    config: DeterminantConfig,
) -> DetnResult<DeterminantArray> {
    let data = document.numeric_data()?;
    let order = document.resolved_order(&config);
    if order != config.element_order {
        tracing::debug!(
            document_order = %order,
            configured_order = %config.element_order,
            "document element order overrides the configured order"
        );
    }
    let config = config.with_element_order(order);
    batch_determinants(&data, document.shape.clone(), config)
}

pub fn render_json_document<T: Serialize>(document: &T) -> DetnResult<String> {
    serde_json::to_string_pretty(document)
        .map(|rendered| normalize_text_artifact(&rendered))
        .map_err(|error| {
            DetnError::internal(
                "SYS.DOCUMENT_RENDER",
                format!("failed to render JSON document: {error}"),
            )
        })
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}
