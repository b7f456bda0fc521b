use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::local_files::{self, FileSystem};
use crate::naming::NameGenerator;
use crate::paths;
use crate::pattern::MatchRules;

/// Root configuration structure for compnamer.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompnamerConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via compnamer.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    /// Expression for placeholders that carry none and have no template override
    #[serde(default = "default_expression")]
    pub default_expression: String,

    #[serde(default = "default_true")]
    pub match_start: bool,

    #[serde(default = "default_true")]
    pub match_end: bool,

    /// Directory separator used when splitting output path patterns
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Container formats that never take a frame padding placeholder
    #[serde(default = "default_video_suffixes")]
    pub video_suffixes: Vec<String>,

    /// Frame padding notation substituted for `{padding}`
    #[serde(default = "default_padding")]
    pub padding: String,

    /// Minimum digits of a generated version
    #[serde(default = "default_version_padding")]
    pub version_padding: usize,

    #[serde(default = "default_scene_suffix")]
    pub scene_suffix: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            default_expression: default_expression(),
            match_start: default_true(),
            match_end: default_true(),
            separator: default_separator(),
            video_suffixes: default_video_suffixes(),
            padding: default_padding(),
            version_padding: default_version_padding(),
            scene_suffix: default_scene_suffix(),
        }
    }
}

impl Defaults {
    pub fn match_rules(&self) -> MatchRules {
        MatchRules::new(
            self.default_expression.clone(),
            self.match_start,
            self.match_end,
        )
    }

    pub fn name_generator(&self) -> NameGenerator {
        NameGenerator::new(self.separator, &self.video_suffixes)
    }

    /// Reject values that would only fail later, at match or naming time.
    pub fn validate(&self) -> crate::Result<()> {
        if let Err(e) = regex::Regex::new(&self.default_expression) {
            return Err(crate::Error::config_invalid_value(
                "defaults.defaultExpression",
                Some(self.default_expression.clone()),
                e.to_string(),
            ));
        }
        if self.scene_suffix.trim_start_matches('.').is_empty() {
            return Err(crate::Error::config_invalid_value(
                "defaults.sceneSuffix",
                Some(self.scene_suffix.clone()),
                "Scene suffix cannot be empty",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_expression() -> String {
    r"[^/\\]+".to_string()
}

fn default_true() -> bool {
    true
}

fn default_separator() -> char {
    '/'
}

fn default_video_suffixes() -> Vec<String> {
    ["mov", "mp4", "mxf", "avi", "mkv", "webm"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_padding() -> String {
    "####".to_string()
}

fn default_version_padding() -> usize {
    3
}

fn default_scene_suffix() -> String {
    "nk".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If compnamer.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full compnamer.json config, falling back to defaults on any error.
pub fn load_config() -> CompnamerConfig {
    paths::compnamer_json()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Load a config file explicitly. Unlike [`load_config`], errors are returned.
pub fn load_config_from(path: &Path) -> crate::Result<CompnamerConfig> {
    let content = local_files::local().read(path)?;

    let config: CompnamerConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;
    config.defaults.validate()?;
    Ok(config)
}

/// Get the path to compnamer.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::compnamer_json()?.display().to_string())
}

/// Check if compnamer.json file exists
pub fn config_exists() -> bool {
    paths::compnamer_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
