//! Token-templated patterns.
//!
//! A pattern is literal text containing `{name}` or `{name:expression}`
//! placeholders. Compiling a pattern escapes the literal text and turns each
//! placeholder into a capture group constrained by its expression (or by the
//! default expression when it has none).
//!
//! Placeholder grammar: `name` is an ASCII identifier and `expression` is any
//! run of characters without braces. Text that does not fit the grammar,
//! such as `{}` or an unbalanced `{`, is literal.
//!
//! A token name may appear more than once in a pattern. Each occurrence gets
//! its own group and the rightmost participating occurrence supplies the value.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Token name to resolved value.
pub type Tokens = BTreeMap<String, String>;

static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::([^{}]*))?\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

/// One piece of a split pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Literal(&'a str),
    Placeholder {
        raw: &'a str,
        name: &'a str,
        expression: Option<&'a str>,
    },
}

/// How a placeholder is rendered into the generated expression.
pub(crate) enum Piece {
    /// A capture group with the given expression.
    Capture(String),
    /// Text matched literally.
    Literal(String),
}

/// Split a pattern into literal runs and placeholders, left to right.
pub(crate) fn segments(pattern: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER_PATTERN.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            result.push(Segment::Literal(&pattern[last..whole.start()]));
        }
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        // `{name:}` behaves like `{name}`
        let expression = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|expr| !expr.is_empty());
        result.push(Segment::Placeholder {
            raw: whole.as_str(),
            name,
            expression,
        });
        last = whole.end();
    }

    if last < pattern.len() {
        result.push(Segment::Literal(&pattern[last..]));
    }

    result
}

/// Placeholders of a pattern in order of appearance, duplicates included.
pub fn placeholders(pattern: &str) -> Vec<Placeholder> {
    segments(pattern)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder {
                name, expression, ..
            } => Some(Placeholder {
                name: name.to_string(),
                expression: expression.map(str::to_string),
            }),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Escape everything outside placeholders; placeholders pass through untouched.
pub fn sanitize(pattern: &str) -> String {
    segments(pattern)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(text) => regex::escape(text),
            Segment::Placeholder { raw, .. } => raw.to_string(),
        })
        .collect()
}

/// A pattern compiled into a reusable matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    regex: Regex,
    // (group name, token name) in pattern order
    groups: Vec<(String, String)>,
}

impl CompiledPattern {
    /// Match `candidate` and return the captured tokens, or `None` on no match.
    pub fn captures(&self, candidate: &str) -> Option<Tokens> {
        let caps = self.regex.captures(candidate)?;
        let mut tokens = Tokens::new();
        for (group, token) in &self.groups {
            if let Some(m) = caps.name(group) {
                tokens.insert(token.clone(), m.as_str().to_string());
            }
        }
        Some(tokens)
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// The generated regular expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// The pattern this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Distinct captured token names, first appearance order.
    pub fn token_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (_, token) in &self.groups {
            if !names.contains(&token.as_str()) {
                names.push(token);
            }
        }
        names
    }
}

/// Everything besides the pattern itself that shapes a compiled matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
    pub default_expression: String,
    /// Per-token expressions for placeholders without an inline one.
    pub expressions: BTreeMap<String, String>,
    pub match_start: bool,
    pub match_end: bool,
}

impl MatchRules {
    pub fn new(default_expression: impl Into<String>, match_start: bool, match_end: bool) -> Self {
        Self {
            default_expression: default_expression.into(),
            expressions: BTreeMap::new(),
            match_start,
            match_end,
        }
    }

    /// Expression a placeholder without an inline expression falls back to.
    pub fn expression_for(&self, token: &str) -> &str {
        self.expressions
            .get(token)
            .map(String::as_str)
            .unwrap_or(&self.default_expression)
    }

    pub fn compile(&self, pattern: &str) -> Result<CompiledPattern> {
        build(pattern, self.match_start, self.match_end, |name, expression| {
            let expression = match expression {
                Some(expression) => expression,
                None => {
                    let fallback = self.expression_for(name);
                    check_fragment(pattern, fallback)?;
                    fallback
                }
            };
            Ok(Piece::Capture(expression.to_string()))
        })
    }
}

/// Compile a pattern, giving each placeholder its own expression or `default_expression`.
pub fn compile(
    pattern: &str,
    default_expression: &str,
    match_start: bool,
    match_end: bool,
) -> Result<CompiledPattern> {
    MatchRules::new(default_expression, match_start, match_end).compile(pattern)
}

/// Shared builder: `render` decides how every placeholder is emitted.
pub(crate) fn build<F>(
    pattern: &str,
    match_start: bool,
    match_end: bool,
    mut render: F,
) -> Result<CompiledPattern>
where
    F: FnMut(&str, Option<&str>) -> Result<Piece>,
{
    let mut expr = String::new();
    let mut groups = Vec::new();

    if match_start {
        expr.push('^');
    }

    for segment in segments(pattern) {
        match segment {
            Segment::Literal(text) => expr.push_str(&regex::escape(text)),
            Segment::Placeholder {
                name, expression, ..
            } => {
                if let Some(fragment) = expression {
                    check_fragment(pattern, fragment)?;
                }
                match render(name, expression)? {
                    Piece::Capture(fragment) => {
                        let group = format!("t{}", groups.len());
                        expr.push_str(&format!("(?P<{}>{})", group, fragment));
                        groups.push((group, name.to_string()));
                    }
                    Piece::Literal(text) => expr.push_str(&regex::escape(&text)),
                }
            }
        }
    }

    if match_end {
        expr.push('$');
    }

    let regex =
        Regex::new(&expr).map_err(|e| Error::pattern_invalid(pattern, &expr, e.to_string()))?;

    Ok(CompiledPattern {
        pattern: pattern.to_string(),
        regex,
        groups,
    })
}

fn check_fragment(pattern: &str, fragment: &str) -> Result<()> {
    Regex::new(fragment)
        .map(|_| ())
        .map_err(|e| Error::pattern_invalid(pattern, fragment, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const DEFAULT: &str = r"[^/\\]+";

    #[test]
    fn sanitize_escapes_literals_only() {
        assert_eq!(
            sanitize("/^p@th./t0^/l*cation"),
            r"/\^p@th\./t0\^/l\*cation"
        );
        assert_eq!(
            sanitize(r"/a.b/{shot:sh\d+}/{name}"),
            r"/a\.b/{shot:sh\d+}/{name}"
        );
    }

    #[test]
    fn unbalanced_braces_are_literal() {
        assert_eq!(sanitize("{{shot}"), r"\{{shot}");
        assert_eq!(sanitize("{shot"), r"\{shot");
        assert_eq!(sanitize("{}"), r"\{\}");
        assert_eq!(sanitize("{2d}"), r"\{2d\}");
    }

    #[test]
    fn placeholders_in_order() {
        let found = placeholders(r"/{project}/{episode:ep\d+}/{shot:}");
        assert_eq!(
            found,
            vec![
                Placeholder {
                    name: "project".to_string(),
                    expression: None
                },
                Placeholder {
                    name: "episode".to_string(),
                    expression: Some(r"ep\d+".to_string())
                },
                Placeholder {
                    name: "shot".to_string(),
                    expression: None
                },
            ]
        );
    }

    #[test]
    fn literal_pattern_matches_itself_fully() {
        let literal = "/jobs/show (v2)/[comp]+final.nk";
        let compiled = compile(literal, DEFAULT, true, true).unwrap();
        let found = compiled.regex.find(literal).unwrap();
        assert_eq!((found.start(), found.end()), (0, literal.len()));
        assert_eq!(compiled.captures(literal), Some(Tokens::new()));
    }

    #[test]
    fn extracts_tokens_from_path() {
        let compiled = compile(
            r"/path/{project}/{episode:ep\d+}/{shot:sh\d+}/scripts",
            DEFAULT,
            true,
            true,
        )
        .unwrap();

        let tokens = compiled
            .captures("/path/my_project/ep002/sh003/scripts")
            .unwrap();
        assert_eq!(tokens["project"], "my_project");
        assert_eq!(tokens["episode"], "ep002");
        assert_eq!(tokens["shot"], "sh003");
        assert_eq!(tokens.len(), 3);

        assert!(compiled
            .captures("/path/my_project/build/character/scripts")
            .is_none());
    }

    #[test]
    fn expression_constrains_capture() {
        // braces are not allowed inside expressions, so the whole text is literal
        let literal = compile(r"{n:[a-c]{2}}", DEFAULT, true, true).unwrap();
        assert!(literal.is_match("{n:[a-c]{2}}"));
        assert!(!literal.is_match("ab"));
        assert!(literal.token_names().is_empty());

        let compiled = compile(r"{n:[a-c]+}", DEFAULT, true, true).unwrap();
        assert_eq!(compiled.captures("abcab").unwrap()["n"], "abcab");
        assert!(compiled.captures("abd").is_none());
        assert!(compiled.captures("").is_none());
    }

    #[test]
    fn anchors_are_strict() {
        let anchored = compile("{shot:sh[0-9]+}/scripts", DEFAULT, true, true).unwrap();
        assert!(anchored.captures("sh010/scripts").is_some());
        assert!(anchored.captures("/jobs/sh010/scripts").is_none());
        assert!(anchored.captures("sh010/scripts/old").is_none());

        let loose = compile("{shot:sh[0-9]+}/scripts", DEFAULT, false, false).unwrap();
        assert_eq!(
            loose.captures("/jobs/sh010/scripts/old").unwrap()["shot"],
            "sh010"
        );
    }

    #[test]
    fn duplicate_tokens_keep_rightmost() {
        let compiled = compile("{a}_{a}", "[a-z]+", true, true).unwrap();
        assert_eq!(compiled.captures("x_y").unwrap()["a"], "y");
        assert_eq!(compiled.token_names(), vec!["a"]);
    }

    #[test]
    fn invalid_expression_names_fragment() {
        let err = compile("{a:(}", DEFAULT, true, true).unwrap_err();
        assert_eq!(err.code, ErrorCode::PatternInvalid);
        assert_eq!(err.details["fragment"], "(");
    }

    #[test]
    fn invalid_default_expression_only_fails_when_used() {
        assert!(compile("/plain/path", "(", true, true).is_ok());
        assert!(compile("{shot:sh[0-9]+}", "(", true, true).is_ok());

        let err = compile("{shot}", "(", true, true).unwrap_err();
        assert_eq!(err.details["fragment"], "(");
    }

    #[test]
    fn empty_expression_uses_default() {
        let compiled = compile("{shot:}", "[0-9]+", true, true).unwrap();
        assert!(compiled.captures("010").is_some());
        assert!(compiled.captures("sh010").is_none());
    }

    #[test]
    fn per_token_expressions_override_default() {
        let mut rules = MatchRules::new("[a-z]+", true, true);
        rules
            .expressions
            .insert("shot".to_string(), "sh[0-9]{3}".to_string());

        let compiled = rules.compile("{seq}_{shot}").unwrap();
        let tokens = compiled.captures("abc_sh010").unwrap();
        assert_eq!(tokens["seq"], "abc");
        assert_eq!(tokens["shot"], "sh010");
        assert!(compiled.captures("abc_shot").is_none());

        // inline expressions still win over the per-token ones
        let inline = rules.compile("{seq}_{shot:[a-z]+}").unwrap();
        assert_eq!(inline.captures("abc_shot").unwrap()["shot"], "shot");
    }

    #[test]
    fn introspection() {
        let compiled = compile("{project}_{shot}", DEFAULT, true, false).unwrap();
        assert_eq!(compiled.pattern(), "{project}_{shot}");
        assert!(compiled.as_str().starts_with('^'));
        assert!(!compiled.as_str().ends_with('$'));
        assert_eq!(compiled.token_names(), vec!["project", "shot"]);
    }
}
