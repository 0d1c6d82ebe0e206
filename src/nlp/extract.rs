//! Locating the JSON object inside a free-form model reply.

use clap::ValueEnum;
use serde_json::Value;

/// How the JSON candidate is cut out of the reply text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractStrategy {
    /// First balanced object, respecting string quoting.
    #[default]
    Balanced,
    /// Everything from the first `{` to the last `}`.
    BraceSpan,
}

impl ExtractStrategy {
    /// Candidate JSON text, or an empty string when nothing was found.
    pub fn extract<'a>(&self, text: &'a str) -> &'a str {
        match self {
            Self::Balanced => extract_balanced(text),
            Self::BraceSpan => extract_brace_span(text),
        }
    }
}

/// Slice from the first `{` to the last `}` inclusive.
///
/// Breaks on prose containing stray braces; the caller's parse is the only check.
pub fn extract_brace_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => "",
    }
}

/// First balanced `{...}` that parses as JSON, trying each opening brace in turn.
///
/// When no balanced candidate parses, the first balanced one is returned so
/// the caller's parse reports the error.
pub fn extract_balanced(text: &str) -> &str {
    let mut first_balanced = None;
    for (start, _) in text.match_indices('{') {
        if let Some(candidate) = balanced_from(text, start) {
            if serde_json::from_str::<Value>(candidate).is_ok() {
                return candidate;
            }
            first_balanced.get_or_insert(candidate);
        }
    }
    first_balanced.unwrap_or("")
}

fn balanced_from(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
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

    #[test]
    fn strips_surrounding_prose() {
        let reply = "Aqui está o resultado:\n{\"a\": {\"b\": 1}}\nEspero ter ajudado!";
        assert_eq!(extract_brace_span(reply), "{\"a\": {\"b\": 1}}");
        assert_eq!(extract_balanced(reply), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn missing_brace_yields_empty() {
        for text in ["sem json", "apenas {", "apenas }", "} invertido {"] {
            assert_eq!(extract_brace_span(text), "", "{text}");
            assert_eq!(extract_balanced(text), "", "{text}");
        }
    }

    #[test]
    fn balanced_ignores_braces_in_strings() {
        let reply = r#"{"comentario": "emoji :} e {", "n": 1} nota final }"#;
        assert_eq!(
            extract_balanced(reply),
            r#"{"comentario": "emoji :} e {", "n": 1}"#
        );
        assert_eq!(extract_brace_span(reply), reply);
    }

    #[test]
    fn balanced_skips_unclosed_prose_brace() {
        let reply = "Nota { incompleta\n{\"ok\": true}";
        assert_eq!(extract_balanced(reply), "{\"ok\": true}");
    }

    #[test]
    fn balanced_skips_prose_placeholder() {
        let reply = "Formato {label}: {\"Comentários por Tópicos\": {}}";
        assert_eq!(extract_balanced(reply), "{\"Comentários por Tópicos\": {}}");
    }

    #[test]
    fn balanced_falls_back_to_first_candidate() {
        assert_eq!(extract_balanced("veja {isto} e {aquilo}"), "{isto}");
    }

    #[test]
    fn balanced_handles_escaped_quotes() {
        let reply = r#"resposta: {"t": "ele disse \"}\" ontem"} fim"#;
        assert_eq!(extract_balanced(reply), r#"{"t": "ele disse \"}\" ontem"}"#);
    }

    #[test]
    fn strategy_dispatch() {
        let reply = "x {\"a\": 1} y";
        assert_eq!(ExtractStrategy::default(), ExtractStrategy::Balanced);
        assert_eq!(ExtractStrategy::BraceSpan.extract(reply), "{\"a\": 1}");
        assert_eq!(ExtractStrategy::Balanced.extract(reply), "{\"a\": 1}");
    }
}
