//! Ordered template matching.
//!
//! The first template whose path pattern matches the candidate wins; list
//! order is the only tie-break. Matching runs in two explicit passes: comp
//! templates against a location, then the matched comp template's outputs
//! against an output location.

use crate::error::Result;
use crate::pattern::{MatchRules, Tokens};
use crate::template::{CompTemplate, OutputTemplate, PatternRule};

/// Outcome of a matching pass. `template` is `None` when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a, T> {
    pub template: Option<&'a T>,
    pub tokens: Tokens,
}

impl<'a, T> MatchResult<'a, T> {
    pub fn none() -> Self {
        Self {
            template: None,
            tokens: Tokens::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.template.is_some()
    }
}

/// Strip trailing `/` and `\` unless the path is made only of separators.
pub fn normalize_candidate(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        path
    } else {
        trimmed
    }
}

/// Find the first template in `templates` whose path pattern matches `path`.
///
/// Templates compile with their own settings, falling back to `rules`. A
/// template whose pattern does not compile aborts the search with its error.
pub fn match_with_rules<'a, T: PatternRule>(
    path: &str,
    templates: &'a [T],
    rules: &MatchRules,
) -> Result<MatchResult<'a, T>> {
    let candidate = normalize_candidate(path);

    for template in templates {
        let compiled = template.compile_path(rules)?;
        if let Some(tokens) = compiled.captures(candidate) {
            return Ok(MatchResult {
                template: Some(template),
                tokens,
            });
        }
    }

    Ok(MatchResult::none())
}

pub fn match_templates<'a, T: PatternRule>(
    path: &str,
    templates: &'a [T],
    default_expression: &str,
    match_start: bool,
    match_end: bool,
) -> Result<MatchResult<'a, T>> {
    let rules = MatchRules::new(default_expression, match_start, match_end);
    match_with_rules(path, templates, &rules)
}

/// Outer pass: pick the comp template for a location.
pub fn match_comp<'a>(
    path: &str,
    templates: &'a [CompTemplate],
    rules: &MatchRules,
) -> Result<MatchResult<'a, CompTemplate>> {
    match_with_rules(path, templates, rules)
}

/// Inner pass: pick one of `parent`'s output templates for an output location.
///
/// On a match the returned tokens are `parent_tokens` with the output's own
/// tokens layered on top. No match yields an empty mapping.
pub fn match_output<'a>(
    path: &str,
    parent: &'a CompTemplate,
    parent_tokens: &Tokens,
    rules: &MatchRules,
) -> Result<MatchResult<'a, OutputTemplate>> {
    let parent_rules = parent.rules(rules);
    let result = match_with_rules(path, &parent.outputs, &parent_rules)?;

    if !result.is_match() {
        return Ok(result);
    }

    let mut tokens = parent_tokens.clone();
    tokens.extend(result.tokens);
    Ok(MatchResult {
        template: result.template,
        tokens,
    })
}
