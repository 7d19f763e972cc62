/// Strip markdown code fences from a model response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Extract a JSON array embedded in free text. Models asked for "ONLY JSON"
/// still occasionally wrap it in prose.
pub fn extract_json_array(response: &str) -> Option<&str> {
    extract_delimited(strip_code_blocks(response), '[', ']')
}

/// Extract a JSON object embedded in free text.
pub fn extract_json_object(response: &str) -> Option<&str> {
    extract_delimited(strip_code_blocks(response), '{', '}')
}

fn extract_delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}
