/// Remove trailing commas before a closing bracket or brace.
///
/// Scans outside string literals only. Returns the corrected text, or None
/// when no trailing comma was found.
pub fn strip_trailing_commas(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut changed = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    changed = true; // drop the comma
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    changed.then_some(out)
}
