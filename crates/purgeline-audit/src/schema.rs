// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defensive validation of raw classifier payloads.
//!
//! The classifier is an LLM, so its output is treated as untrusted: the
//! payload may be wrapped in prose or a markdown fence, and individual
//! entries may be missing fields. Each entry is checked against the audit
//! schema (`id`, `reason`, `riskLevel` in {Low, Medium, High}, `sentiment`)
//! and dropped on any mismatch. Only a payload with no recognizable JSON
//! array fails as a whole.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use purgeline_core::{AuditResult, PurgeError, RiskLevel};
use serde_json::Value;
use tracing::{debug, warn};

/// Locate the JSON array inside a possibly decorated response.
fn json_slice(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Pull the entry list out of the payload: a bare array, or an object with a `results` array.
fn entries(raw: &str) -> Result<Vec<Value>, PurgeError> {
    if let Ok(Value::Object(mut map)) = serde_json::from_str::<Value>(raw.trim())
        && let Some(Value::Array(items)) = map.remove("results")
    {
        return Ok(items);
    }

    match serde_json::from_str::<Value>(json_slice(raw)) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(other) => Err(PurgeError::audit_unavailable(format!(
            "classifier returned {} instead of an array",
            kind(&other)
        ))),
        Err(e) => {
            debug!(raw, "unparsable classifier payload");
            Err(PurgeError::AuditUnavailable {
                message: format!("classifier returned unparsable output: {e}"),
                source: Some(Box::new(e)),
            })
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate one entry, returning its id and typed result.
fn validate_entry(entry: &Value) -> Option<(String, AuditResult)> {
    let object = entry.as_object()?;
    let id = match object.get("id")? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let reason = object.get("reason")?.as_str()?.to_string();
    let risk_level = RiskLevel::from_str(object.get("riskLevel")?.as_str()?).ok()?;
    let sentiment = object.get("sentiment")?.as_str()?.to_string();

    Some((
        id,
        AuditResult {
            reason,
            risk_level,
            sentiment,
        },
    ))
}

/// Parse a raw classifier payload into a mapping restricted to `allowed_ids`.
///
/// Entries that fail validation, or name an id outside the batch, are
/// dropped. Later duplicates of an id overwrite earlier ones.
pub fn parse_audit_response(
    raw: &str,
    allowed_ids: &HashSet<&str>,
) -> Result<HashMap<String, AuditResult>, PurgeError> {
    let items = entries(raw)?;
    let total = items.len();

    let mut results = HashMap::with_capacity(total);
    for (index, item) in items.iter().enumerate() {
        match validate_entry(item) {
            Some((id, result)) if allowed_ids.contains(id.as_str()) => {
                results.insert(id, result);
            }
            Some((id, _)) => {
                warn!(index, id, "dropping audit entry for an id outside the batch");
            }
            None => {
                warn!(index, "dropping malformed audit entry");
            }
        }
    }

    debug!(total, accepted = results.len(), "audit payload validated");
    Ok(results)
}
