//! Signature inspector: ordered parameter names from callable signature text.
//!
//! Rust closures carry no parameter names at runtime, so the text is supplied
//! by the caller (for instance a task declared as `"(op1, op2) => ..."`).
//! Recognized shapes:
//! - bare arrow parameter: `op1 => ...`
//! - parenthesized list: `(op1, op2) => ...`
//! - function: `function name(op1, op2) { ... }`
//!
//! A leading `async` keyword is ignored.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::SignatureError;

fn comments() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)(//.*$)|(/\*[\s\S]*?\*/)").unwrap())
}

fn async_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^async\s+").unwrap())
}

fn bare_arrow() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^(]+?)=>").unwrap())
}

fn param_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^(]*\(\s*([^)]*)\)").unwrap())
}

/// Extract the ordered formal parameter names of `source`.
///
/// A parameter-less signature yields an empty list. Text matching none of
/// the shapes is an error rather than a guess.
pub fn parameter_names(source: &str) -> Result<Vec<String>, SignatureError> {
    let stripped = comments().replace_all(source, "");
    let text = stripped.trim();
    let text = async_prefix().replace(text, "");

    let captured = bare_arrow()
        .captures(&text)
        .or_else(|| param_list().captures(&text))
        .and_then(|c| c.get(1))
        .ok_or_else(|| SignatureError::Unrecognized(source.to_string()))?;

    Ok(captured
        .as_str()
        .split(',')
        .map(|p| p.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|p| !p.is_empty())
        .collect())
}
