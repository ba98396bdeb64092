/// Strip a Markdown code fence wrapping the payload.
///
/// Generated documents frequently arrive as ```` ```json ... ``` ````
/// blocks. Returns the inner text, or None when no fence is present.
pub fn strip_code_fences(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return None;
    }

    let mut lines = trimmed.lines();
    lines.next(); // opening fence, with or without a language tag
    let mut body: Vec<&str> = lines.collect();
    if body.last().is_some_and(|l| l.trim() == "```") {
        body.pop();
    }
    Some(body.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fenced_payload() {
        let text = "```json\n{\"film_id\": \"F1\"}\n```";
        assert_eq!(strip_code_fences(text).unwrap(), "{\"film_id\": \"F1\"}");
    }

    #[test]
    fn test_strips_bare_fence() {
        let text = "```\n{}\n```";
        assert_eq!(strip_code_fences(text).unwrap(), "{}");
    }

    #[test]
    fn test_tolerates_missing_closing_fence() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(strip_code_fences(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_ignores_unfenced_text() {
        assert!(strip_code_fences("{\"a\": 1}").is_none());
    }
}
