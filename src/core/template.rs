//! Template configurations.
//!
//! Two tiers only: a [`CompTemplate`] names composition scripts and carries the
//! [`OutputTemplate`]s used for its render outputs. Output templates never nest.

use crate::error::Result;
use crate::pattern::{CompiledPattern, MatchRules};
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Matching settings shared by both template tiers.
///
/// Unset fields fall back to the caller-supplied [`MatchRules`].
pub trait PatternRule {
    fn id(&self) -> &str;
    /// Pattern matched against a candidate location.
    fn path(&self) -> &str;
    /// Pattern used to generate names.
    fn name(&self) -> &str;
    fn default_expression(&self) -> Option<&str>;
    fn expressions(&self) -> &BTreeMap<String, String>;
    fn match_start(&self) -> Option<bool>;
    fn match_end(&self) -> Option<bool>;

    /// Effective rules: this template's own settings over `fallback`.
    fn rules(&self, fallback: &MatchRules) -> MatchRules {
        let mut expressions = fallback.expressions.clone();
        expressions.extend(
            self.expressions()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        MatchRules {
            default_expression: self
                .default_expression()
                .unwrap_or(&fallback.default_expression)
                .to_string(),
            expressions,
            match_start: self.match_start().unwrap_or(fallback.match_start),
            match_end: self.match_end().unwrap_or(fallback.match_end),
        }
    }

    /// Compile the path pattern with trailing separators stripped, the same
    /// way candidates are normalized before matching.
    fn compile_path(&self, fallback: &MatchRules) -> Result<CompiledPattern> {
        self.rules(fallback)
            .compile(crate::matcher::normalize_candidate(self.path()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTemplate {
    pub id: String,
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expression: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expressions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_end: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompTemplate {
    pub id: String,
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expression: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expressions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_end: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputTemplate>,
}

macro_rules! impl_pattern_rule {
    ($ty:ty) => {
        impl PatternRule for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn path(&self) -> &str {
                &self.path
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn default_expression(&self) -> Option<&str> {
                self.default_expression.as_deref()
            }

            fn expressions(&self) -> &BTreeMap<String, String> {
                &self.expressions
            }

            fn match_start(&self) -> Option<bool> {
                self.match_start
            }

            fn match_end(&self) -> Option<bool> {
                self.match_end
            }
        }
    };
}

impl_pattern_rule!(CompTemplate);
impl_pattern_rule!(OutputTemplate);

impl CompTemplate {
    pub fn output(&self, id: &str) -> Option<&OutputTemplate> {
        self.outputs.iter().find(|o| o.id == id)
    }
}

/// Check ids and patterns of a template list before it is used.
///
/// Ids must be non-empty and unique among siblings, and every path and name
/// pattern must compile under its effective rules.
pub fn validate_templates(templates: &[CompTemplate], fallback: &MatchRules) -> Result<()> {
    validate_tier(templates, fallback, "id")?;
    for template in templates {
        validate_tier(
            &template.outputs,
            fallback,
            &format!("{}.outputs.id", template.id),
        )?;
    }
    Ok(())
}

fn validate_tier<T: PatternRule>(items: &[T], fallback: &MatchRules, field: &str) -> Result<()> {
    for item in items {
        validation::require_non_empty(item.id(), field, "Template id cannot be empty")?;
    }
    validation::require_unique(items.iter().map(|t| t.id()), field)?;

    for item in items {
        item.compile_path(fallback)?;
        item.rules(fallback).compile(item.name())?;
    }
    Ok(())
}
