//! Location to names in one call: pick the comp template for a location,
//! compute the next version, then name the scene and each enabled output.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::defaults::Defaults;
use crate::error::Result;
use crate::local_files::FileSystem;
use crate::matcher::{match_comp, match_output};
use crate::naming::{
    generate_scene_name, OutputNameOptions, COLORSPACE_TOKEN, PADDING_TOKEN, PASSNAME_TOKEN,
    VERSION_TOKEN,
};
use crate::pattern::{placeholders, Tokens};
use crate::template::CompTemplate;
use crate::version::{fetch_next_version, format_version};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRequest {
    /// Directory the scene will be saved in
    pub location: String,
    /// Seed tokens such as `username`; matched tokens take precedence.
    #[serde(default)]
    pub tokens: Tokens,
    /// Falls back to `Defaults::scene_suffix`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default)]
    pub append_username: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneResolution {
    pub location: String,
    pub template_id: Option<String>,
    pub tokens: Tokens,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub name: Option<String>,
    pub path: Option<String>,
}

impl SceneResolution {
    fn unmatched(location: &str) -> Self {
        Self {
            location: location.to_string(),
            template_id: None,
            tokens: Tokens::new(),
            version: None,
            name: None,
            path: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.template_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRequest {
    pub passname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorspace: Option<String>,
    pub suffix: String,
    /// Candidate for the output pass; the scene location when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub options: OutputNameOptions,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl OutputRequest {
    pub fn new(passname: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            passname: passname.into(),
            colorspace: None,
            suffix: suffix.into(),
            location: None,
            options: OutputNameOptions::default(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputResolution {
    pub passname: String,
    pub template_id: Option<String>,
    pub tokens: Tokens,
    pub name: Option<String>,
}

/// Match `request.location` against `templates` and name the next scene version.
///
/// A location that no template matches is not an error: the resolution simply
/// carries no template and no name. The version scan is skipped for name
/// patterns without a `{version}` placeholder.
pub fn resolve_scene<F: FileSystem + ?Sized>(
    request: &SceneRequest,
    templates: &[CompTemplate],
    defaults: &Defaults,
    fs: &F,
) -> Result<SceneResolution> {
    let rules = defaults.match_rules();
    let matched = match_comp(&request.location, templates, &rules)?;
    let Some(template) = matched.template else {
        return Ok(SceneResolution::unmatched(&request.location));
    };

    let mut tokens = request.tokens.clone();
    tokens.extend(matched.tokens);

    let location = Path::new(&request.location);
    let version = if has_version(&template.name) {
        let next = fetch_next_version(fs, location, &template.name, &tokens)?;
        tokens.insert(
            VERSION_TOKEN.to_string(),
            format_version(next, defaults.version_padding),
        );
        Some(next)
    } else {
        None
    };

    let suffix = request
        .suffix
        .as_deref()
        .unwrap_or(&defaults.scene_suffix);
    let name = generate_scene_name(&template.name, suffix, request.append_username, &tokens)?;
    let path = location.join(&name).display().to_string();

    Ok(SceneResolution {
        location: request.location.clone(),
        template_id: Some(template.id.clone()),
        tokens,
        version,
        name: Some(name),
        path: Some(path),
    })
}

/// Name every enabled output of a resolved scene.
///
/// `template` is the comp template the scene matched. Tokens layer as scene
/// tokens, then output-pass tokens, then `passname`, `colorspace` and
/// `padding` from the request and defaults.
pub fn resolve_outputs(
    scene: &SceneResolution,
    requests: &[OutputRequest],
    template: &CompTemplate,
    defaults: &Defaults,
) -> Result<Vec<OutputResolution>> {
    let rules = defaults.match_rules();
    let generator = defaults.name_generator();
    let mut resolved = Vec::new();

    for request in requests.iter().filter(|r| r.enabled) {
        let candidate = request.location.as_deref().unwrap_or(&scene.location);
        let matched = match_output(candidate, template, &scene.tokens, &rules)?;

        let Some(output) = matched.template else {
            resolved.push(OutputResolution {
                passname: request.passname.clone(),
                template_id: None,
                tokens: Tokens::new(),
                name: None,
            });
            continue;
        };

        let mut tokens = matched.tokens;
        tokens.insert(PASSNAME_TOKEN.to_string(), request.passname.clone());
        if let Some(colorspace) = &request.colorspace {
            tokens.insert(COLORSPACE_TOKEN.to_string(), colorspace.clone());
        }
        tokens.insert(PADDING_TOKEN.to_string(), defaults.padding.clone());

        let name =
            generator.generate_output_name(&output.name, &request.suffix, request.options, &tokens)?;

        resolved.push(OutputResolution {
            passname: request.passname.clone(),
            template_id: Some(output.id.clone()),
            tokens,
            name: Some(name),
        });
    }

    Ok(resolved)
}

fn has_version(pattern: &str) -> bool {
    placeholders(pattern).iter().any(|p| p.name == VERSION_TOKEN)
}
