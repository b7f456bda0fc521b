use clap::Args;
use serde::Serialize;

use compnamer::naming::generate_scene_name;

use super::{CmdResult, GlobalArgs, TokenArgs};

#[derive(Args)]
pub struct SceneArgs {
    /// Base-name pattern (e.g. "{project}_{shot}_v{version}")
    #[arg(long)]
    pub pattern: String,

    /// File extension (defaults to the configured scene suffix)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Append _{username} before the extension
    #[arg(long)]
    pub username: bool,

    #[command(flatten)]
    pub tokens: TokenArgs,
}

#[derive(Debug, Serialize)]
pub struct SceneOutput {
    command: String,
    name: String,
}

pub fn run(args: SceneArgs, global: &GlobalArgs) -> CmdResult<SceneOutput> {
    let defaults = global.defaults()?;
    let tokens = args.tokens.parse()?;
    let suffix = args.suffix.as_deref().unwrap_or(&defaults.scene_suffix);

    let name = generate_scene_name(&args.pattern, suffix, args.username, &tokens)?;

    Ok((
        SceneOutput {
            command: "scene".to_string(),
            name,
        },
        0,
    ))
}
