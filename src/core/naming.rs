//! File name generation from name patterns and resolved tokens.
//!
//! Appended output segments follow a fixed order that defines the on-disk
//! convention: colorspace, username, passname, multi-view marker, padding,
//! extension.

use crate::error::{Error, Result};
use crate::pattern::{segments, Segment, Tokens};
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const VERSION_TOKEN: &str = "version";
pub const USERNAME_TOKEN: &str = "username";
pub const PASSNAME_TOKEN: &str = "passname";
pub const COLORSPACE_TOKEN: &str = "colorspace";
pub const PADDING_TOKEN: &str = "padding";

/// View-name wildcard expanded by the host's render pipeline.
pub const MULTI_VIEW_MARKER: &str = "%V";

/// Strip inline expressions: `{shot:sh\d+}` becomes `{shot}`.
pub fn simplify(pattern: &str) -> String {
    segments(pattern)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(text) => text.to_string(),
            Segment::Placeholder { name, .. } => format!("{{{}}}", name),
        })
        .collect()
}

/// Substitute every placeholder of `pattern` from `tokens`.
///
/// Fails with a missing-token error naming the leftmost token without a value.
pub fn resolve(pattern: &str, tokens: &Tokens) -> Result<String> {
    let mut result = String::with_capacity(pattern.len());

    for segment in segments(pattern) {
        match segment {
            Segment::Literal(text) => result.push_str(text),
            Segment::Placeholder { name, .. } => {
                let value = tokens
                    .get(name)
                    .ok_or_else(|| Error::name_missing_token(name, pattern))?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}

/// Name for a composition script: `pattern[_{username}].suffix`.
pub fn generate_scene_name(
    pattern: &str,
    suffix: &str,
    append_username: bool,
    tokens: &Tokens,
) -> Result<String> {
    let suffix = normalize_suffix(suffix)?;
    let mut full = pattern.to_string();
    if append_username {
        push_token(&mut full, USERNAME_TOKEN);
    }
    full.push('.');
    full.push_str(suffix);

    resolve(&full, tokens)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputNameOptions {
    #[serde(default)]
    pub append_passname_to_subfolder: bool,
    #[serde(default)]
    pub append_passname: bool,
    #[serde(default)]
    pub append_colorspace: bool,
    #[serde(default)]
    pub append_username: bool,
    #[serde(default)]
    pub multi_views: bool,
}

/// Output name generation for one target platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGenerator {
    separator: char,
    video_suffixes: BTreeSet<String>,
}

impl NameGenerator {
    /// `video_suffixes` lists container formats that hold every frame and so
    /// never take a padding placeholder.
    pub fn new<I, S>(separator: char, video_suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            separator,
            video_suffixes: video_suffixes
                .into_iter()
                .map(|s| canonical_suffix(s.as_ref()))
                .collect(),
        }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn is_video(&self, suffix: &str) -> bool {
        self.video_suffixes.contains(&canonical_suffix(suffix))
    }

    pub fn generate_scene_name(
        &self,
        pattern: &str,
        suffix: &str,
        append_username: bool,
        tokens: &Tokens,
    ) -> Result<String> {
        generate_scene_name(pattern, suffix, append_username, tokens)
    }

    /// Full output path from a path pattern whose last segment is the file stem.
    pub fn generate_output_name(
        &self,
        pattern: &str,
        suffix: &str,
        options: OutputNameOptions,
        tokens: &Tokens,
    ) -> Result<String> {
        let suffix = normalize_suffix(suffix)?;
        let mut parts = split_segments(pattern, self.separator);

        if parts.len() > 1 && options.append_passname_to_subfolder {
            let parent = parts.len() - 2;
            push_token(&mut parts[parent], PASSNAME_TOKEN);
        }

        let last = parts.len() - 1;
        let stem = &mut parts[last];
        if stem.is_empty() {
            return Err(Error::validation_invalid_argument(
                "pattern",
                format!("Output pattern '{}' must end with a file name", pattern),
                None,
                None,
            ));
        }
        if options.append_colorspace {
            push_token(stem, COLORSPACE_TOKEN);
        }
        if options.append_username {
            push_token(stem, USERNAME_TOKEN);
        }
        if options.append_passname {
            push_token(stem, PASSNAME_TOKEN);
        }
        if options.multi_views {
            stem.push('_');
            stem.push_str(MULTI_VIEW_MARKER);
        }
        if !self.is_video(suffix) {
            stem.push_str(&format!(".{{{}}}", PADDING_TOKEN));
        }
        stem.push('.');
        stem.push_str(suffix);

        let full = parts.join(&self.separator.to_string());
        resolve(&full, tokens)
    }
}

fn push_token(target: &mut String, token: &str) {
    target.push_str(&format!("_{{{}}}", token));
}

fn normalize_suffix(suffix: &str) -> Result<&str> {
    let trimmed = suffix.trim().trim_start_matches('.');
    validation::require_non_empty(trimmed, "suffix", "File suffix cannot be empty")
}

fn canonical_suffix(suffix: &str) -> String {
    suffix.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Split on `separator`, leaving placeholder text intact.
fn split_segments(pattern: &str, separator: char) -> Vec<String> {
    let mut parts = vec![String::new()];

    for segment in segments(pattern) {
        match segment {
            Segment::Literal(text) => {
                let mut pieces = text.split(separator);
                if let Some(first) = pieces.next() {
                    push_last(&mut parts, first);
                }
                for piece in pieces {
                    parts.push(piece.to_string());
                }
            }
            Segment::Placeholder { raw, .. } => push_last(&mut parts, raw),
        }
    }

    parts
}

fn push_last(parts: &mut [String], text: &str) {
    if let Some(last) = parts.last_mut() {
        last.push_str(text);
    }
}
