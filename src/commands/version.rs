use clap::Args;
use serde::Serialize;
use std::path::Path;

use compnamer::log_status;
use compnamer::paths;
use compnamer::version::{format_version, next_version};

use super::{CmdResult, GlobalArgs, TokenArgs};

#[derive(Args)]
pub struct VersionArgs {
    /// Directory to scan for existing versions
    pub directory: String,

    /// Name pattern containing {version}
    #[arg(long)]
    pub pattern: String,

    // Values for every other token of the pattern
    #[command(flatten)]
    pub tokens: TokenArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionOutput {
    command: String,
    directory: String,
    next_version: u32,
    /// Zero-padded to the configured width
    version: String,
}

pub fn run(args: VersionArgs, global: &GlobalArgs) -> CmdResult<VersionOutput> {
    let defaults = global.defaults()?;
    let tokens = args.tokens.parse()?;
    let directory = paths::expand(&args.directory);

    log_status!("version", "Scanning {}", directory);
    let next = next_version(Path::new(&directory), &args.pattern, &tokens)?;
    log_status!("version", "Next version is {}", next);

    Ok((
        VersionOutput {
            command: "version".to_string(),
            directory,
            next_version: next,
            version: format_version(next, defaults.version_padding),
        },
        0,
    ))
}
