use clap::Args;
use serde::Serialize;

use compnamer::naming::{OutputNameOptions, PADDING_TOKEN};

use super::{CmdResult, GlobalArgs, TokenArgs};

#[derive(Args)]
pub struct OutputArgs {
    /// Output path pattern; the last segment is the file stem
    #[arg(long)]
    pub pattern: String,

    /// File extension (video formats get no frame padding)
    #[arg(long)]
    pub suffix: String,

    /// Append _{passname} to the parent directory
    #[arg(long)]
    pub subfolder_passname: bool,

    /// Append _{passname} to the file stem
    #[arg(long)]
    pub passname: bool,

    /// Append _{colorspace} to the file stem
    #[arg(long)]
    pub colorspace: bool,

    /// Append _{username} to the file stem
    #[arg(long)]
    pub username: bool,

    /// Append the multi-view marker (_%V)
    #[arg(long)]
    pub multi_views: bool,

    // Token values; `padding` defaults to the configured padding
    #[command(flatten)]
    pub tokens: TokenArgs,
}

#[derive(Debug, Serialize)]
pub struct OutputNameOutput {
    command: String,
    name: String,
}

pub fn run(args: OutputArgs, global: &GlobalArgs) -> CmdResult<OutputNameOutput> {
    let defaults = global.defaults()?;
    let mut tokens = args.tokens.parse()?;
    tokens
        .entry(PADDING_TOKEN.to_string())
        .or_insert_with(|| defaults.padding.clone());

    let options = OutputNameOptions {
        append_passname_to_subfolder: args.subfolder_passname,
        append_passname: args.passname,
        append_colorspace: args.colorspace,
        append_username: args.username,
        multi_views: args.multi_views,
    };

    let name = defaults.name_generator().generate_output_name(
        &args.pattern,
        &args.suffix,
        options,
        &tokens,
    )?;

    Ok((
        OutputNameOutput {
            command: "output".to_string(),
            name,
        },
        0,
    ))
}
