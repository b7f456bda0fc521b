use clap::Args;
use serde::Serialize;

use compnamer::context::{
    resolve_outputs, resolve_scene, OutputRequest, OutputResolution, SceneRequest,
    SceneResolution,
};
use compnamer::local_files;
use compnamer::log_status;
use compnamer::paths;
use compnamer::Error;

use super::{load_templates, parse_json_spec, CmdResult, GlobalArgs, TokenArgs};

/// Suffix for `--output` specs that do not name one.
const DEFAULT_OUTPUT_SUFFIX: &str = "exr";

#[derive(Args)]
pub struct ResolveArgs {
    /// Directory the scene will be saved in
    pub location: String,

    /// Comp templates as JSON (inline, @file, or - for stdin)
    #[arg(long, value_name = "JSON")]
    pub templates: String,

    /// Scene extension (defaults to the configured scene suffix)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Append _{username} to the scene name
    #[arg(long)]
    pub username: bool,

    /// Output to name, as passname[:colorspace[:suffix]] (repeatable)
    #[arg(long = "output", value_name = "SPEC")]
    pub outputs: Vec<String>,

    /// Full output requests as a JSON array (inline, @file, or -)
    #[arg(long = "outputs-json", value_name = "JSON")]
    pub outputs_json: Option<String>,

    // Seed tokens such as username
    #[command(flatten)]
    pub tokens: TokenArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutput {
    command: String,
    #[serde(flatten)]
    scene: SceneResolution,
    outputs: Vec<OutputResolution>,
}

pub fn run(args: ResolveArgs, global: &GlobalArgs) -> CmdResult<ResolveOutput> {
    let defaults = global.defaults()?;
    let templates = load_templates(&args.templates, &defaults)?;

    let mut requests: Vec<OutputRequest> = match &args.outputs_json {
        Some(spec) => parse_json_spec(spec, "parse output requests")?,
        None => Vec::new(),
    };
    for spec in &args.outputs {
        requests.push(parse_output_spec(spec)?);
    }

    let request = SceneRequest {
        location: paths::expand(&args.location),
        tokens: args.tokens.parse()?,
        suffix: args.suffix,
        append_username: args.username,
    };

    let scene = resolve_scene(&request, &templates, &defaults, &local_files::local())?;

    let template = scene
        .template_id
        .as_deref()
        .and_then(|id| templates.iter().find(|t| t.id == id));

    let outputs = match template {
        Some(template) => {
            log_status!(
                "resolve",
                "Template '{}' matched, next version {:?}",
                template.id,
                scene.version
            );
            resolve_outputs(&scene, &requests, template, &defaults)?
        }
        None => {
            log_status!("resolve", "No template matched {}", request.location);
            Vec::new()
        }
    };

    Ok((
        ResolveOutput {
            command: "resolve".to_string(),
            scene,
            outputs,
        },
        0,
    ))
}

/// Parse `passname[:colorspace[:suffix]]`. An empty colorspace means none.
fn parse_output_spec(spec: &str) -> compnamer::Result<OutputRequest> {
    let mut parts = spec.splitn(3, ':');
    let passname = parts.next().unwrap_or_default().trim();
    if passname.is_empty() {
        return Err(Error::validation_invalid_argument(
            "output",
            format!("Output spec '{}' has no passname", spec),
            None,
            None,
        ));
    }

    let colorspace = parts
        .next()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    let suffix = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_OUTPUT_SUFFIX);

    Ok(OutputRequest {
        colorspace,
        ..OutputRequest::new(passname, suffix)
    })
}
