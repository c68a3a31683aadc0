use wards_models::ReasoningReply;

use crate::error::AgentError;

/// Extract the first JSON object from text that may contain surrounding
/// prose or a markdown code fence.
pub fn extract_json(text: &str) -> Result<String, AgentError> {
    let trimmed = text.trim();

    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    if let Some(candidate) = fenced_block(trimmed) {
        if serde_json::from_str::<serde_json::Value>(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    if let Some(candidate) = first_balanced_object(trimmed) {
        if serde_json::from_str::<serde_json::Value>(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    Err(AgentError::Parse(format!(
        "no JSON object found in response (length={})",
        text.len()
    )))
}

/// Parse one reasoning round-trip's raw output.
///
/// Accepts the tagged reply protocol, a bare object with `content` or
/// `calls`, or plain prose (treated as a finish signal with that content).
pub fn parse_reply(raw: &str) -> Result<ReasoningReply, AgentError> {
    match extract_json(raw) {
        Ok(json_str) => {
            if let Ok(reply) = serde_json::from_str::<ReasoningReply>(&json_str) {
                return Ok(reply);
            }
            let value: serde_json::Value = serde_json::from_str(&json_str)?;
            if let Some(calls) = value.get("calls").or_else(|| value.get("tool_calls")) {
                let calls = serde_json::from_value(calls.clone()).map_err(|e| {
                    AgentError::Parse(format!("malformed tool calls: {e}"))
                })?;
                return Ok(ReasoningReply::ToolCalls { calls });
            }
            if let Some(content) = value.get("content").and_then(|v| v.as_str()) {
                return Ok(ReasoningReply::Finish {
                    content: content.to_string(),
                });
            }
            Err(AgentError::Parse(format!(
                "JSON reply has neither calls nor content: {json_str}"
            )))
        }
        Err(_) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(AgentError::Parse("empty reasoning response".to_string()));
            }
            Ok(ReasoningReply::Finish {
                content: trimmed.to_string(),
            })
        }
    }
}

/// Contents of a ```json ... ``` (or bare ```) fence, if present.
fn fenced_block(text: &str) -> Option<String> {
    for marker in ["```json\n", "```json\r\n", "```\n", "```\r\n"] {
        if let Some(start) = text.find(marker) {
            let body_start = start + marker.len();
            if let Some(end) = text[body_start..].find("```") {
                return Some(text[body_start..body_start + end].trim().to_string());
            }
        }
    }
    None
}

/// First balanced `{ ... }` span, ignoring braces inside string literals.
fn first_balanced_object(text: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return start.map(|s| text[s..=i].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use wards_models::ToolCallRequest;

    #[test]
    fn parses_tagged_finish() {
        let raw = r#"{"type": "finish", "content": "Campaign recommended for tonight"}"#;
        let reply = parse_reply(raw).unwrap();
        assert_eq!(
            reply,
            ReasoningReply::Finish {
                content: "Campaign recommended for tonight".to_string()
            }
        );
    }

    #[test]
    fn parses_tagged_tool_calls_in_markdown_fence() {
        let raw = "Let me check the risk first:\n```json\n{\"type\": \"tool_calls\", \"calls\": [{\"name\": \"analyse_waste_risk\", \"arguments\": {\"items\": [], \"dayOfWeek\": \"sabato\"}}]}\n```";
        let reply = parse_reply(raw).unwrap();
        match reply {
            ReasoningReply::ToolCalls { calls } => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "analyse_waste_risk");
            }
            other => panic!("expected tool calls, got {other:?}"),
        }
    }

    #[test]
    fn parses_untagged_calls_field() {
        let raw = r#"{"calls": [{"name": "select_target_customers", "arguments": {"wasteItems": [], "customers": []}}]}"#;
        let reply = parse_reply(raw).unwrap();
        assert_eq!(
            reply,
            ReasoningReply::ToolCalls {
                calls: vec![ToolCallRequest {
                    name: "select_target_customers".to_string(),
                    arguments: serde_json::json!({"wasteItems": [], "customers": []}),
                }]
            }
        );
    }

    #[test]
    fn plain_prose_is_a_finish_signal() {
        let raw = "Send the campaign to regulars at 16:30.";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(
            reply,
            ReasoningReply::Finish {
                content: raw.to_string()
            }
        );
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(parse_reply("   \n").is_err());
    }

    #[test]
    fn extract_ignores_braces_inside_strings() {
        let raw = r#"{"content": "use {name} as placeholder", "type": "finish"}"#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted, raw);
    }

    #[test]
    fn extract_with_prefix_text() {
        let raw = "Here is the decision:\n{\"type\": \"finish\", \"content\": \"ok\"}";
        let extracted = extract_json(raw).unwrap();
        assert!(extracted.contains("\"content\""));
    }

    #[test]
    fn unbalanced_braces_fall_back_to_prose() {
        let raw = "} not json {";
        let reply = parse_reply(raw).unwrap();
        assert!(matches!(reply, ReasoningReply::Finish { .. }));
    }
}
