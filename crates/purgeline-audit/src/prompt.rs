// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt text for LLM-backed audit providers.

use purgeline_core::Record;
use serde_json::json;

/// System prompt pinning the response to the audit schema.
pub const AUDIT_SYSTEM_PROMPT: &str = "\
You review old social media posts for content their author may regret keeping public.
For every post you are given, assess professional, reputational and personal risk.
Respond with ONLY a JSON array, no prose and no code fences. Each element must be:
{\"id\": \"<post id>\", \"reason\": \"<one short sentence>\", \"riskLevel\": \"Low\" | \"Medium\" | \"High\", \"sentiment\": \"<one or two words>\"}
Include exactly one element per post id you were given and no other ids.";

/// Render the user turn for a batch: a JSON array of `{id, text}` objects.
pub fn build_audit_prompt(batch: &[Record]) -> String {
    let items: Vec<serde_json::Value> = batch
        .iter()
        .map(|r| json!({ "id": r.id(), "text": r.text() }))
        .collect();
    let payload = serde_json::Value::Array(items).to_string();
    format!("Audit these {} posts:\n{payload}", batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use purgeline_test_utils::fixtures::post;

    #[test]
    fn prompt_lists_ids_and_text_as_json() {
        let batch = vec![post("1", "hello \"world\""), post("2", "bye")];
        let prompt = build_audit_prompt(&batch);
        assert!(prompt.starts_with("Audit these 2 posts:\n"));

        let json_part = prompt.split_once('\n').map(|(_, rest)| rest).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(json_part).unwrap();
        assert_eq!(parsed[0]["id"], "1");
        assert_eq!(parsed[0]["text"], "hello \"world\"");
        assert_eq!(parsed[1]["id"], "2");
    }

    #[test]
    fn system_prompt_names_every_schema_field() {
        for field in ["\"id\"", "\"reason\"", "\"riskLevel\"", "\"sentiment\""] {
            assert!(AUDIT_SYSTEM_PROMPT.contains(field), "missing {field}");
        }
    }
}
