//! Best-effort JSON payload extraction from free-form model output.

/// Extract the JSON payload from text that may surround it with prose.
///
/// Scans for balanced `{...}` and `[...]` spans (string literals and escapes
/// are honored while matching brackets) and returns the longest span that
/// parses as a JSON object or array. Returns `None` when no span qualifies.
/// The caller decides what to do on `None`; this function performs no I/O.
pub fn extract_json(text: &str) -> Option<String> {
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for (i, c) in text.char_indices() {
        if c == '{' || c == '[' {
            if let Some(end) = balanced_end(text, i) {
                spans.push((i, end));
            }
        }
    }

    // Longest first; stable sort keeps earlier spans ahead on equal length.
    spans.sort_by_key(|(start, end)| std::cmp::Reverse(end - start));

    for (start, end) in spans {
        let candidate = &text[start..end];
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(candidate) {
            if value.is_object() || value.is_array() {
                return Some(candidate.to_string());
            }
        }
    }

    None
}

/// Byte offset one past the bracket that closes the span opening at `start`,
/// or `None` if the span never balances.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
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
            '"' => in_string = true,
            '{' | '[' => stack.push(c),
            '}' | ']' => {
                let open = stack.pop()?;
                let matches = (open == '{' && c == '}') || (open == '[' && c == ']');
                if !matches {
                    return None;
                }
                if stack.is_empty() {
                    return Some(start + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}
