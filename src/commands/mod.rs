use clap::Args;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

use compnamer::defaults::{self, Defaults};
use compnamer::log_status;
use compnamer::paths;
use compnamer::pattern::Tokens;
use compnamer::template::{validate_templates, CompTemplate};
use compnamer::token;

pub type CmdResult<T> = compnamer::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit config file from `--config`
    pub config: Option<String>,
}

impl GlobalArgs {
    /// Effective defaults: the explicit `--config` file when given (errors
    /// surface), otherwise compnamer.json with silent fallback.
    pub fn defaults(&self) -> compnamer::Result<Defaults> {
        match &self.config {
            Some(path) => {
                let path = paths::expand(path);
                Ok(defaults::load_config_from(Path::new(&path))?.defaults)
            }
            None => Ok(defaults::load_defaults()),
        }
    }
}

/// Repeatable `--token key=value` arguments.
#[derive(Args, Default, Debug)]
pub struct TokenArgs {
    /// Token value (repeatable, e.g. --token shot=sh010)
    #[arg(long = "token", value_name = "KEY=VALUE")]
    pub tokens: Vec<String>,
}

impl TokenArgs {
    pub fn parse(&self) -> compnamer::Result<Tokens> {
        token::parse_assignments(&self.tokens)
    }
}

// ============================================================================
// JSON Input Parsing (CLI layer)
// ============================================================================

/// Read JSON spec from string, file (@path), or stdin (-).
fn read_json_spec_to_string(spec: &str) -> compnamer::Result<String> {
    use std::io::IsTerminal;

    if spec.trim() == "-" {
        let mut buf = String::new();
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(compnamer::Error::validation_invalid_argument(
                "json",
                "Cannot read JSON from stdin when stdin is a TTY",
                None,
                None,
            ));
        }
        stdin.read_to_string(&mut buf).map_err(|e| {
            compnamer::Error::internal_io(e.to_string(), Some("read stdin".to_string()))
        })?;
        return Ok(buf);
    }

    if let Some(path) = spec.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(compnamer::Error::validation_invalid_argument(
                "json",
                "Invalid JSON spec '@' (missing file path)",
                None,
                None,
            ));
        }
        let path = paths::expand(path);
        return std::fs::read_to_string(Path::new(&path)).map_err(|e| {
            compnamer::Error::internal_io(e.to_string(), Some(format!("read {}", path)))
        });
    }

    Ok(spec.to_string())
}

/// Parse a JSON spec (inline, @file or -) into `T`.
pub fn parse_json_spec<T: DeserializeOwned>(spec: &str, context: &str) -> compnamer::Result<T> {
    let raw = read_json_spec_to_string(spec)?;
    serde_json::from_str(&raw)
        .map_err(|e| compnamer::Error::validation_invalid_json(e, Some(context.to_string())))
}

/// Parse and validate a comp template list.
pub fn load_templates(spec: &str, defaults: &Defaults) -> compnamer::Result<Vec<CompTemplate>> {
    let templates: Vec<CompTemplate> = parse_json_spec(spec, "parse templates")?;
    validate_templates(&templates, &defaults.match_rules())?;
    log_status!("templates", "Loaded {} template(s)", templates.len());
    Ok(templates)
}

pub mod config;
pub mod matching;
pub mod output;
pub mod resolve;
pub mod scene;
pub mod version;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (compnamer::Result<serde_json::Value>, i32) {
    crate::tty::status("compnamer is working...");

    match command {
        crate::Commands::Match(args) => dispatch!(args, global, matching),
        crate::Commands::Scene(args) => dispatch!(args, global, scene),
        crate::Commands::Output(args) => dispatch!(args, global, output),
        crate::Commands::Version(args) => dispatch!(args, global, version),
        crate::Commands::Resolve(args) => dispatch!(args, global, resolve),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn json_spec_inline_and_file() {
        let inline: Vec<CompTemplate> =
            parse_json_spec(r#"[{"id": "a", "path": "/x/{shot}", "name": "{shot}"}]"#, "t")
                .unwrap();
        assert_eq!(inline[0].id, "a");

        let dir = tempdir().unwrap();
        let path = dir.path().join("templates.json");
        fs::write(&path, r#"[{"id": "b", "path": "/y", "name": "n"}]"#).unwrap();
        let from_file: Vec<CompTemplate> =
            parse_json_spec(&format!("@{}", path.display()), "t").unwrap();
        assert_eq!(from_file[0].id, "b");
    }

    #[test]
    fn json_spec_errors() {
        let err = parse_json_spec::<Vec<CompTemplate>>("@", "t").unwrap_err();
        assert_eq!(err.code, compnamer::ErrorCode::ValidationInvalidArgument);

        let err = parse_json_spec::<Vec<CompTemplate>>("[{", "t").unwrap_err();
        assert_eq!(err.code, compnamer::ErrorCode::ValidationInvalidJson);
    }

    #[test]
    fn load_templates_validates() {
        let err = load_templates(
            r#"[{"id": "a", "path": "/x/{shot:(}", "name": "{shot}"}]"#,
            &Defaults::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, compnamer::ErrorCode::PatternInvalid);
    }

    #[test]
    fn explicit_config_is_strict() {
        let dir = tempdir().unwrap();
        let global = GlobalArgs {
            config: Some(dir.path().join("missing.json").display().to_string()),
        };
        assert!(global.defaults().is_err());

        let path = dir.path().join("compnamer.json");
        fs::write(&path, r#"{"defaults": {"versionPadding": 4}}"#).unwrap();
        let global = GlobalArgs {
            config: Some(path.display().to_string()),
        };
        assert_eq!(global.defaults().unwrap().version_padding, 4);
    }
}
