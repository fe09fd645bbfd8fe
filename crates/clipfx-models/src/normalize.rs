//! Cell normalization.
//!
//! Annotation cells arrive as text written by several tools (pandas, the
//! analysis stage, hand edits), so the same boolean can show up as `True`,
//! `1` or `yes`, and the same list as `['A', 'B']`, `["A","B"]` or `A, B`.
//! Every function here is total: unparsable input degrades to the field's
//! default instead of failing the row.

/// Cell values read as `true` (case-insensitive, trimmed).
pub const TRUTHY: &[&str] = &["true", "1", "yes", "y", "t"];

/// Cell values accepted as an explicit `false` when an operator types them.
pub const FALSY: &[&str] = &["false", "0", "no", "n", "f"];

/// Interpret a cell as a boolean. Anything outside [`TRUTHY`] is `false`.
pub fn to_bool(cell: &str) -> bool {
    let lowered = cell.trim().to_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

/// Interpret a cell as a count.
///
/// Accepts integers and floats (`"6.0"` is written by pandas when a column
/// ever held a NaN); floats are truncated toward zero. Anything else is 0.
pub fn to_count(cell: &str) -> i64 {
    let s = cell.trim();
    if let Ok(n) = s.parse::<i64>() {
        return n;
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// Interpret a cell as a number of seconds. Anything unparsable is 0.0.
pub fn to_seconds(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => f,
        _ => 0.0,
    }
}

/// Interpret a cell as an ordered list of tags.
///
/// Bracketed text is read as a JSON array or a Python-style list literal;
/// if it is neither, the cell is malformed and yields an empty list. Plain
/// text is split on commas. Items are trimmed and empty items dropped.
pub fn parse_list_like(cell: &str) -> Vec<String> {
    let text = cell.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if text.starts_with('[') {
        return parse_list_literal(text).unwrap_or_default();
    }

    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Canonical CSV encoding of a tag list: `"A, B, C"`, empty list as `""`.
pub fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let items = match serde_json::from_str::<Vec<serde_json::Value>>(text) {
        Ok(values) => values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Err(_) => parse_python_list(text)?,
    };

    Some(
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Parse `['a', "b", c]`. Returns `None` on unterminated quotes or stray
/// characters between items.
fn parse_python_list(text: &str) -> Option<Vec<String>> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };

        let item = if first == '\'' || first == '"' {
            chars.next();
            let mut s = String::new();
            loop {
                match chars.next()? {
                    '\\' => s.push(chars.next()?),
                    c if c == first => break,
                    c => s.push(c),
                }
            }
            s
        } else {
            let mut s = String::new();
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                s.push(c);
                chars.next();
            }
            let token = s.trim().to_string();
            if token.is_empty() {
                return None;
            }
            token
        };
        items.push(item);

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_vocabulary() {
        for cell in ["true", "True", "1", "yes", "Y", "t", "  TRUE  "] {
            assert!(to_bool(cell), "{cell:?} should be true");
        }
        for cell in ["false", "0", "no", "", "garbage", "2", "nope"] {
            assert!(!to_bool(cell), "{cell:?} should be false");
        }
    }

    #[test]
    fn test_to_count() {
        assert_eq!(to_count("6"), 6);
        assert_eq!(to_count(" 6.0 "), 6);
        assert_eq!(to_count("6.9"), 6);
        assert_eq!(to_count(""), 0);
        assert_eq!(to_count("nan"), 0);
        assert_eq!(to_count("many"), 0);
    }

    #[test]
    fn test_to_seconds() {
        assert_eq!(to_seconds("2.5"), 2.5);
        assert_eq!(to_seconds(""), 0.0);
        assert_eq!(to_seconds("inf"), 0.0);
    }

    #[test]
    fn test_parse_list_like_plain_text() {
        assert_eq!(
            parse_list_like("Transcript/Text on Screen, Specific Keywords"),
            vec!["Transcript/Text on Screen", "Specific Keywords"]
        );
        assert_eq!(parse_list_like(" Hook ,, "), vec!["Hook"]);
        assert!(parse_list_like("").is_empty());
    }

    #[test]
    fn test_parse_list_like_literals() {
        assert_eq!(
            parse_list_like(r#"["Hook", "Call to Action"]"#),
            vec!["Hook", "Call to Action"]
        );
        assert_eq!(
            parse_list_like("['Transcript', 'Specific Keywords']"),
            vec!["Transcript", "Specific Keywords"]
        );
        assert_eq!(parse_list_like("[GIF, MEME]"), vec!["GIF", "MEME"]);
        assert!(parse_list_like("[]").is_empty());
    }

    #[test]
    fn test_parse_list_like_malformed_is_empty() {
        assert!(parse_list_like("['Hook', 'Call to").is_empty());
        assert!(parse_list_like("['Hook' 'CTA']").is_empty());
        assert!(parse_list_like("[,]").is_empty());
    }

    #[test]
    fn test_join_list() {
        let items = vec!["Hook".to_string(), " CTA ".to_string(), "".to_string()];
        assert_eq!(join_list(&items), "Hook, CTA");
        assert_eq!(join_list(&[]), "");
    }
}
