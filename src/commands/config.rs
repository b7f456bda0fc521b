use clap::{Args, Subcommand};
use serde::Serialize;

use compnamer::defaults::{self, Defaults};
use compnamer::paths;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display effective defaults (built-in merged with compnamer.json)
    Show {
        /// Show only built-in defaults (ignore compnamer.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Show the path to compnamer.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    path: String,
    exists: bool,
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin, global),
        ConfigCommand::Path => path(global),
    }
}

fn show(builtin: bool, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let effective = if builtin {
        defaults::builtin_defaults()
    } else {
        global.defaults()?
    };
    let (path, exists) = location(global)?;

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            defaults: Some(effective),
            path,
            exists,
        },
        0,
    ))
}

fn path(global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let (path, exists) = location(global)?;

    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            defaults: None,
            path,
            exists,
        },
        0,
    ))
}

/// The `--config` file when given, otherwise the global compnamer.json.
fn location(global: &GlobalArgs) -> compnamer::Result<(String, bool)> {
    match &global.config {
        Some(explicit) => {
            let path = paths::expand(explicit);
            let exists = std::path::Path::new(&path).exists();
            Ok((path, exists))
        }
        None => Ok((defaults::config_path()?, defaults::config_exists())),
    }
}
