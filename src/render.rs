// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Markdown rendering for dependency and artifact badges.
//!
//! Rendering is pure string assembly against a fixed badge host. URLs mix
//! two encodings: path segments follow the URI component alphabet, while
//! query strings are form-urlencoded (spaces become `+`). Badge path labels
//! use the host's underscore convention instead of percent escapes.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::form_urlencoded;

use crate::{
    config::{ArtifactReference, BadgeStyle, DockerMetric},
    variant::{ArtifactMap, BadgeVariant, VariantMap}
};

/// Badge host every URL is built against.
pub const BADGE_HOST: &str = "https://img.shields.io";

/// URI component alphabet: everything except alphanumerics and `-_.!~*'()`
/// is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Badge path labels replace every character outside `[A-Za-z0-9]` with an
/// underscore, so the result needs no percent escapes.
fn encode_label(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

/// Badge messages read a leading caret as `v`; the rest is
/// component-encoded.
fn encode_message(value: &str) -> String {
    match value.strip_prefix('^') {
        Some(rest) => encode_component(&format!("v{rest}")),
        None => encode_component(value)
    }
}

fn append_logo(
    query: &mut form_urlencoded::Serializer<'_, String>,
    logo_svg: Option<&str>,
    named_logo: Option<&str>
) {
    if let Some(svg) = logo_svg {
        query.append_pair(
            "logo",
            &format!("data:image/svg+xml;utf8,{}", encode_component(svg))
        );
    } else if let Some(named) = named_logo {
        query.append_pair("logo", named);
    }
}

fn style_query(variant: &BadgeVariant) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("labelColor", &variant.label_color);
    if variant.is_error == Some(true) {
        query.append_pair("isError", "true");
    }
    append_logo(
        &mut query,
        variant.logo_svg.as_deref(),
        variant.named_logo.as_deref()
    );
    if let Some(logo_color) = &variant.logo_color {
        query.append_pair("logoColor", logo_color);
    }
    if let Some(logo_width) = variant.logo_width {
        query.append_pair("logoWidth", &logo_width.to_string());
    }
    if let Some(style) = variant.style {
        query.append_pair("style", style.as_str());
    }
    if let Some(cache_seconds) = variant.cache_seconds {
        query.append_pair("cacheSeconds", &cache_seconds.to_string());
    }
    query.finish()
}

fn join_query(mut url: String, query: String) -> String {
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Renders one dependency badge as markdown.
///
/// The image URL follows the badge host's
/// `/badge/<label>-<message>-<color>.svg` convention with the package name
/// as label. A configured link wraps the image in a clickable form.
pub fn render_dependency_badge(package: &str, variant: &BadgeVariant) -> String {
    let url = join_query(
        format!(
            "{BADGE_HOST}/badge/{}-{}-{}.svg",
            encode_label(package),
            encode_message(&variant.message),
            encode_component(&variant.color)
        ),
        style_query(variant)
    );

    match &variant.link {
        Some(link) => format!("[![{package}]({url})]({link})"),
        None => format!("![{package}]({url})")
    }
}

/// Renders one artifact badge as markdown.
///
/// Style overrides are looked up under the source tag; a configured link
/// wraps the image in a clickable form, as for dependency badges. Returns
/// `None` for source tags this build does not recognize; those entries
/// vanish from the output without raising an error.
pub fn render_artifact_badge(reference: &ArtifactReference, style: &BadgeStyle) -> Option<String> {
    let source = reference.source()?;
    let custom = style
        .variants
        .get(source.as_str())
        .cloned()
        .unwrap_or_default();

    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(label_color) = &custom.label_color {
        query.append_pair("labelColor", label_color);
    }
    if custom.is_error == Some(true) {
        query.append_pair("isError", "true");
    }
    append_logo(
        &mut query,
        custom.logo_svg.as_deref(),
        custom.named_logo.as_deref()
    );
    if let Some(logo_color) = &custom.logo_color {
        query.append_pair("logoColor", logo_color);
    }
    if let Some(logo_width) = custom.logo_width {
        query.append_pair("logoWidth", &logo_width.to_string());
    }
    if let Some(visual) = custom.style.or(style.style) {
        query.append_pair("style", visual.as_str());
    }
    if let Some(cache_seconds) = custom.cache_seconds {
        query.append_pair("cacheSeconds", &cache_seconds.to_string());
    }
    if let Some(color) = &custom.color {
        query.append_pair("color", color);
    }

    let path = match reference {
        ArtifactReference::Github {
            artifact, ..
        } => {
            if let Some(branch) = &artifact.branch {
                query.append_pair("branch", branch);
            }
            format!(
                "github/{}/{}/{}",
                artifact.metric.as_str(),
                encode_label(&artifact.user),
                encode_label(&artifact.repo)
            )
        }
        ArtifactReference::Docker {
            artifact, ..
        } => {
            let metric = artifact.resolved_metric();
            if let Some(tag) = &artifact.tag
                && metric == DockerMetric::Version
            {
                query.append_pair("tag", tag);
            }
            format!(
                "docker/{}/{}/{}",
                metric.as_str(),
                encode_label(artifact.resolved_user()),
                encode_label(&artifact.image)
            )
        }
        ArtifactReference::Codecov {
            artifact, ..
        } => {
            if let Some(branch) = &artifact.branch {
                query.append_pair("branch", branch);
            }
            format!(
                "codecov/{}/{}/{}/{}",
                encode_label(artifact.resolved_flag()),
                encode_label(&artifact.provider),
                encode_label(&artifact.user),
                encode_label(&artifact.repo)
            )
        }
        ArtifactReference::Unknown => return None
    };

    let url = join_query(format!("{BADGE_HOST}/{path}"), query.finish());
    let label = reference.label().unwrap_or(source.as_str());
    Some(match &custom.link {
        Some(link) => format!("[![{label}]({url})]({link})"),
        None => format!("![{label}]({url})")
    })
}

/// Rendered badge lines grouped under section labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownSections {
    /// Label and badge-line pairs in rendering order.
    pub sections: Vec<(String, Vec<String>)>
}

impl MarkdownSections {
    /// Returns `true` when no section carries any line.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|(_, lines)| lines.is_empty())
    }
}

/// Renders every dependency badge into per-section markdown lines.
pub fn render_badge_sections(map: &VariantMap) -> MarkdownSections {
    let sections = map
        .sections
        .iter()
        .map(|section| {
            let lines = section
                .entries
                .iter()
                .flat_map(|entry| {
                    entry
                        .variants
                        .iter()
                        .map(|variant| render_dependency_badge(&entry.package, variant))
                })
                .collect();
            (section.label.clone(), lines)
        })
        .collect();

    MarkdownSections {
        sections
    }
}

/// Renders every artifact badge under a single `artifacts` section.
pub fn render_artifact_sections(map: &ArtifactMap, style: &BadgeStyle) -> MarkdownSections {
    let lines: Vec<String> = map
        .groups
        .iter()
        .flat_map(|group| {
            group
                .items
                .iter()
                .filter_map(|reference| render_artifact_badge(reference, style))
        })
        .collect();

    if lines.is_empty() {
        return MarkdownSections::default();
    }
    MarkdownSections {
        sections: vec![("artifacts".to_owned(), lines)]
    }
}

/// Formats sections into a markdown body.
///
/// Each section contributes an optional `# <label>` heading followed by its
/// badge lines joined with newlines; the concatenation is trimmed.
pub fn render_sectioned_body(sections: &MarkdownSections, section_header: bool) -> String {
    let mut body = String::new();
    for (label, lines) in &sections.sections {
        if section_header {
            body.push_str("\n\n# ");
            body.push_str(label);
        }
        body.push_str("\n\n");
        body.push_str(&lines.join("\n"));
    }
    body.trim().to_owned()
}

/// Wraps a markdown block in a centered container when requested.
///
/// Empty blocks stay empty so callers never inject bare wrappers.
pub fn apply_centering(body: &str, center: bool) -> String {
    if center && !body.is_empty() {
        format!("<div align=\"center\">\n\n{body}\n\n</div>")
    } else {
        body.to_owned()
    }
}

/// Builds the combined document injected into the target: artifact block
/// first, dependency block second, joined by a blank line, centered per
/// style. Empty blocks are dropped.
pub fn render_target_document(
    badges: &MarkdownSections,
    artifacts: &MarkdownSections,
    style: &BadgeStyle
) -> String {
    let artifact_body = render_sectioned_body(artifacts, style.section_header);
    let badge_body = render_sectioned_body(badges, style.section_header);
    let blocks: Vec<&str> = [artifact_body.as_str(), badge_body.as_str()]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect();

    apply_centering(&blocks.join("\n\n"), style.center)
}

/// Renders one preview document: sectioned body with centering applied.
pub fn render_preview_document(sections: &MarkdownSections, style: &BadgeStyle) -> String {
    apply_centering(
        &render_sectioned_body(sections, style.section_header),
        style.center
    )
}
