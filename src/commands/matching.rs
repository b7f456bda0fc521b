use clap::Args;
use serde::Serialize;

use compnamer::log_status;
use compnamer::matcher::{match_comp, match_output};
use compnamer::paths;
use compnamer::pattern::Tokens;

use super::{load_templates, CmdResult, GlobalArgs, TokenArgs};

#[derive(Args)]
pub struct MatchArgs {
    /// Candidate location (e.g. the directory a scene is saved in)
    pub path: String,

    /// Comp templates as JSON (inline, @file, or - for stdin)
    #[arg(long, value_name = "JSON")]
    pub templates: String,

    /// Also match this output candidate against the matched template's outputs
    #[arg(long, value_name = "PATH")]
    pub output: Option<String>,

    // Seed tokens layered under the matched tokens for the output pass
    #[command(flatten)]
    pub tokens: TokenArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutput {
    command: String,
    template_id: Option<String>,
    tokens: Tokens,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<OutputMatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMatch {
    template_id: Option<String>,
    tokens: Tokens,
}

pub fn run(args: MatchArgs, global: &GlobalArgs) -> CmdResult<MatchOutput> {
    let defaults = global.defaults()?;
    let rules = defaults.match_rules();
    let templates = load_templates(&args.templates, &defaults)?;
    let path = paths::expand(&args.path);

    let matched = match_comp(&path, &templates, &rules)?;
    let Some(template) = matched.template else {
        log_status!("match", "No template matched {}", path);
        return Ok((
            MatchOutput {
                command: "match".to_string(),
                template_id: None,
                tokens: Tokens::new(),
                output: None,
            },
            0,
        ));
    };
    log_status!("match", "Template '{}' matched {}", template.id, path);

    let output = match &args.output {
        Some(candidate) => {
            let mut parent_tokens = args.tokens.parse()?;
            parent_tokens.extend(matched.tokens.clone());

            let inner = match_output(&paths::expand(candidate), template, &parent_tokens, &rules)?;
            Some(OutputMatch {
                template_id: inner.template.map(|t| t.id.clone()),
                tokens: inner.tokens,
            })
        }
        None => None,
    };

    Ok((
        MatchOutput {
            command: "match".to_string(),
            template_id: Some(template.id.clone()),
            tokens: matched.tokens,
            output,
        },
        0,
    ))
}
