use crate::error::BidlensError;
use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid regex"));

/// Repair JSON text returned by a language model.
///
/// Handles:
/// - markdown code fences around the payload
/// - prose before or after the top-level object
/// - trailing commas before `}` / `]`
/// - output truncated mid-object (open strings and brackets are closed)
///
/// Returns the input unchanged (minus fences and surrounding whitespace) when it
/// already parses.
pub fn repair_json(input: &str) -> Result<String, BidlensError> {
    let mut cleaned = input.trim();
    if let Some(inner) = CODE_FENCE.captures(cleaned).and_then(|c| c.get(1)) {
        cleaned = inner.as_str().trim();
    }

    if serde_json::from_str::<serde_json::Value>(cleaned).is_ok() {
        return Ok(cleaned.to_string());
    }

    let start = cleaned
        .find('{')
        .ok_or_else(|| BidlensError::InvalidJson("no JSON object found in response".into()))?;
    let repaired = close_and_strip(&cleaned[start..]);

    match serde_json::from_str::<serde_json::Value>(&repaired) {
        Ok(_) => {
            tracing::debug!("repaired malformed JSON response");
            Ok(repaired)
        }
        Err(e) => Err(BidlensError::InvalidJson(format!("repair failed: {e}"))),
    }
}

/// Single pass over `s` (which starts at the top-level `{`): drops trailing commas,
/// stops after the top-level value closes, and closes whatever is still open at
/// the end of input.
fn close_and_strip(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' => {
                closers.push('}');
                out.push(c);
            }
            '[' => {
                closers.push(']');
                out.push(c);
            }
            '}' | ']' => {
                closers.pop();
                out.push(c);
                if closers.is_empty() {
                    return out;
                }
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']') | None) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    if in_string {
        out.push('"');
    }
    if out.trim_end().ends_with(':') {
        // value cut off after its key
        out.push_str("null");
    }
    while let Some(closer) = closers.pop() {
        out.push(closer);
    }
    out
}
