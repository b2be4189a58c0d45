//! Placeholder substitution engine.
//!
//! Placeholders take the form `{{ key }}`, optionally written `{{.key}}`.
//! Keys are ASCII alphanumerics, `_`, `-` and `.`. A placeholder whose key is
//! absent from the data mapping is copied to the output verbatim.

use std::collections::HashMap;

use thiserror::Error;

use super::types::FieldValue;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Malformed template text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated { offset: usize },

    #[error("unexpected '}}}}' at byte {offset}")]
    UnexpectedClose { offset: usize },

    #[error("invalid placeholder '{placeholder}' at byte {offset}")]
    InvalidPlaceholder { offset: usize, placeholder: String },
}

/// A piece of parsed template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Placeholder { key: &'a str, raw: &'a str },
}

/// Split template text into literal text and placeholders
pub fn parse(text: &str) -> Result<Vec<Segment<'_>>, RenderError> {
    let mut segments = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    loop {
        let open = rest.find(OPEN);
        let close = rest.find(CLOSE);

        let start = match (open, close) {
            (None, None) => {
                if !rest.is_empty() {
                    segments.push(Segment::Text(rest));
                }
                return Ok(segments);
            }
            (None, Some(c)) => return Err(RenderError::UnexpectedClose { offset: offset + c }),
            (Some(o), Some(c)) if c < o => {
                return Err(RenderError::UnexpectedClose { offset: offset + c })
            }
            (Some(o), _) => o,
        };

        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }

        let inner_start = start + OPEN.len();
        let inner_len = rest[inner_start..]
            .find(CLOSE)
            .ok_or(RenderError::Unterminated {
                offset: offset + start,
            })?;
        let inner = &rest[inner_start..inner_start + inner_len];
        let end = inner_start + inner_len + CLOSE.len();
        let raw = &rest[start..end];

        if inner.contains(OPEN) {
            return Err(RenderError::Unterminated {
                offset: offset + start,
            });
        }

        let key = inner.trim();
        let key = key.strip_prefix('.').unwrap_or(key);
        if !is_valid_key(key) {
            return Err(RenderError::InvalidPlaceholder {
                offset: offset + start,
                placeholder: raw.to_string(),
            });
        }

        segments.push(Segment::Placeholder { key, raw });
        offset += end;
        rest = &rest[end..];
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Substitute every placeholder in `text` with its value from `data`
pub fn render(text: &str, data: &HashMap<String, FieldValue>) -> Result<String, RenderError> {
    let segments = parse(text)?;
    let mut output = String::with_capacity(text.len());

    for segment in segments {
        match segment {
            Segment::Text(t) => output.push_str(t),
            Segment::Placeholder { key, raw } => match data.get(key) {
                Some(value) => output.push_str(&value.to_string()),
                None => output.push_str(raw),
            },
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, FieldValue)]) -> HashMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_simple() {
        let vars = data(&[("Name", FieldValue::from("Alice"))]);
        assert_eq!(render("Hello, {{Name}}!", &vars).unwrap(), "Hello, Alice!");
    }

    #[test]
    fn test_render_dot_and_whitespace() {
        let vars = data(&[("Course", FieldValue::from("Rust"))]);
        assert_eq!(
            render("{{.Course}} / {{ Course }} / {{ .Course }}", &vars).unwrap(),
            "Rust / Rust / Rust"
        );
    }

    #[test]
    fn test_render_repeated_and_typed() {
        let vars = data(&[
            ("hours", FieldValue::Number(40.0)),
            ("honors", FieldValue::Boolean(false)),
        ]);
        assert_eq!(
            render("{{hours}}h, {{hours}}h, honors={{honors}}", &vars).unwrap(),
            "40h, 40h, honors=false"
        );
    }

    #[test]
    fn test_missing_key_left_verbatim() {
        let vars = data(&[("Name", FieldValue::from("Bob"))]);
        let text = "Dear {{Name}}, grade: {{ .Grade }}.";
        assert_eq!(render(text, &vars).unwrap(), "Dear Bob, grade: {{ .Grade }}.");
    }

    #[test]
    fn test_single_braces_are_text() {
        let text = "body { color: red; } {{Name}}";
        let vars = data(&[("Name", FieldValue::from("X"))]);
        assert_eq!(render(text, &vars).unwrap(), "body { color: red; } X");
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(
            render("abc {{Name", &HashMap::new()),
            Err(RenderError::Unterminated { offset: 4 })
        );
        assert!(matches!(
            render("{{a {{b}}", &HashMap::new()),
            Err(RenderError::Unterminated { offset: 0 })
        ));
    }

    #[test]
    fn test_stray_close() {
        assert_eq!(
            render("ab}} {{x}}", &HashMap::new()),
            Err(RenderError::UnexpectedClose { offset: 2 })
        );
    }

    #[test]
    fn test_invalid_placeholder() {
        assert!(matches!(
            render("{{}}", &HashMap::new()),
            Err(RenderError::InvalidPlaceholder { .. })
        ));
        assert!(matches!(
            render("{{ if .Name }}", &HashMap::new()),
            Err(RenderError::InvalidPlaceholder { .. })
        ));
    }

    #[test]
    fn test_parse_offsets_after_placeholder() {
        let err = parse("{{a}} text }}").unwrap_err();
        assert_eq!(err, RenderError::UnexpectedClose { offset: 11 });
    }
}
