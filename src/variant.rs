// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Overlay of configured style overrides onto derived and theme defaults.
//!
//! The builder turns every resolved package into a fully specified
//! [`BadgeVariant`] so the renderer never consults the configuration again.
//! Variants travel in singleton sequences: the map shape leaves room for
//! multiple badges per package without changing consumers.

use serde::Serialize;

use crate::{
    color::color_for,
    config::{ArtifactReference, ArtifactSource, BadgeStyle, DependencyDeclaration, VisualStyle},
    resolver::ResolvedDependencies
};

/// Fully resolved badge styling for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeVariant {
    /// Badge color, explicit or derived from the package name.
    pub color:         String,
    /// Label background color, explicit or the theme default.
    pub label_color:   String,
    /// Badge message, the resolved version string verbatim.
    pub message:       String,
    /// Error badge marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error:      Option<bool>,
    /// Logo name from the badge host's built-in set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_logo:    Option<String>,
    /// Inline SVG logo taking precedence over the named logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_svg:      Option<String>,
    /// Logo tint color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_color:    Option<String>,
    /// Logo width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_width:    Option<u32>,
    /// Visual style, per-badge or global.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style:         Option<VisualStyle>,
    /// Cache lifetime, per-badge or global.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_seconds: Option<u32>,
    /// Destination the rendered badge links to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link:          Option<String>
}

/// Ordered badge variants grouped by section label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMap {
    /// Sections in resolver order.
    pub sections: Vec<VariantSection>
}

/// One labelled group of badge variant entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSection {
    /// Grouping label shown as the section heading.
    pub label:   String,
    /// Entries in resolver order.
    pub entries: Vec<VariantEntry>
}

/// Badge variants registered for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantEntry {
    /// Package name.
    pub package:  String,
    /// Singleton sequence of fully resolved variants.
    pub variants: Vec<BadgeVariant>
}

/// Builds the ordered variant map for every resolved package.
pub fn build_badge_map(resolved: &ResolvedDependencies, style: &BadgeStyle) -> VariantMap {
    let sections = resolved
        .sections
        .iter()
        .map(|section| VariantSection {
            label:   section.label.clone(),
            entries: section
                .packages
                .iter()
                .map(|package| VariantEntry {
                    package:  package.name.clone(),
                    variants: vec![build_variant(&package.name, &package.version, style)]
                })
                .collect()
        })
        .collect();

    VariantMap {
        sections
    }
}

fn build_variant(package: &str, version: &str, style: &BadgeStyle) -> BadgeVariant {
    let custom = style.variants.get(package).cloned().unwrap_or_default();

    BadgeVariant {
        color:         custom
            .color
            .unwrap_or_else(|| color_for(package).to_string()),
        label_color:   custom
            .label_color
            .unwrap_or_else(|| style.theme.label_color().to_owned()),
        message:       version.to_owned(),
        is_error:      custom.is_error,
        named_logo:    custom.named_logo,
        logo_svg:      custom.logo_svg,
        logo_color:    custom.logo_color,
        logo_width:    custom.logo_width,
        style:         custom.style.or(style.style),
        cache_seconds: custom.cache_seconds.or(style.cache_seconds),
        link:          custom.link
    }
}

/// Artifact references grouped by source tag.
#[derive(Debug, Clone)]
pub struct ArtifactMap {
    /// Groups in first-appearance order.
    pub groups: Vec<ArtifactGroup>
}

impl ArtifactMap {
    /// Total number of grouped artifact references.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }
}

/// Artifact references sharing one source tag.
#[derive(Debug, Clone)]
pub struct ArtifactGroup {
    /// Source tag shared by the grouped references.
    pub source: ArtifactSource,
    /// References in declaration order.
    pub items:  Vec<ArtifactReference>
}

/// Groups artifact references by source tag, declaration order within each
/// group. Unrecognized source tags are excluded without error.
pub fn build_artifact_map(declarations: &[DependencyDeclaration]) -> ArtifactMap {
    let mut groups: Vec<ArtifactGroup> = Vec::new();

    for declaration in declarations {
        let DependencyDeclaration::Artifact(reference) = declaration else {
            continue;
        };
        let Some(source) = reference.source() else {
            continue;
        };
        match groups.iter_mut().find(|group| group.source == source) {
            Some(group) => group.items.push(reference.clone()),
            None => groups.push(ArtifactGroup {
                source,
                items: vec![reference.clone()]
            })
        }
    }

    ArtifactMap {
        groups
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{build_artifact_map, build_badge_map};
    use crate::{
        config::{ArtifactSource, BadgeStyle, DependencyDeclaration, Theme, VisualStyle},
        resolver::{ResolvedDependencies, ResolvedPackage, ResolvedSection}
    };

    fn base_style(theme: Theme) -> BadgeStyle {
        BadgeStyle {
            theme,
            center: false,
            section_header: false,
            style: None,
            cache_seconds: None,
            variants: BTreeMap::new()
        }
    }

    fn resolved_single(name: &str, version: &str) -> ResolvedDependencies {
        ResolvedDependencies {
            sections: vec![ResolvedSection {
                label:    "runtime".to_owned(),
                packages: vec![ResolvedPackage {
                    name:    name.to_owned(),
                    version: version.to_owned()
                }]
            }]
        }
    }

    #[test]
    fn unstyled_package_receives_derived_and_theme_defaults() {
        let map = build_badge_map(
            &resolved_single("left-pad", "1.3.0"),
            &base_style(Theme::Dark)
        );

        let variant = &map.sections[0].entries[0].variants[0];
        assert_eq!(variant.color, "hsl(293,73%,53%)");
        assert_eq!(variant.label_color, "#222222");
        assert_eq!(variant.message, "1.3.0");
        assert_eq!(variant.style, None);
        assert_eq!(variant.cache_seconds, None);
        assert_eq!(variant.link, None);
    }

    #[test]
    fn white_theme_uses_light_label_background() {
        let map = build_badge_map(
            &resolved_single("serde", "1.0.219"),
            &base_style(Theme::White)
        );

        let variant = &map.sections[0].entries[0].variants[0];
        assert_eq!(variant.label_color, "rgb(233, 234, 241)");
    }

    #[test]
    fn override_fields_take_precedence() {
        let mut style = base_style(Theme::Dark);
        style.style = Some(VisualStyle::Flat);
        style.cache_seconds = Some(3600);
        style.variants.insert(
            "serde".to_owned(),
            crate::config::VariantOverride {
                color: Some("orange".to_owned()),
                label_color: Some("black".to_owned()),
                style: Some(VisualStyle::ForTheBadge),
                cache_seconds: Some(60),
                link: Some("https://serde.rs".to_owned()),
                ..Default::default()
            }
        );

        let map = build_badge_map(&resolved_single("serde", "1.0.219"), &style);
        let variant = &map.sections[0].entries[0].variants[0];
        assert_eq!(variant.color, "orange");
        assert_eq!(variant.label_color, "black");
        assert_eq!(variant.style, Some(VisualStyle::ForTheBadge));
        assert_eq!(variant.cache_seconds, Some(60));
        assert_eq!(variant.link.as_deref(), Some("https://serde.rs"));
    }

    #[test]
    fn global_style_and_cache_fill_missing_overrides() {
        let mut style = base_style(Theme::Dark);
        style.style = Some(VisualStyle::FlatSquare);
        style.cache_seconds = Some(7200);

        let map = build_badge_map(&resolved_single("clap", "4.5.32"), &style);
        let variant = &map.sections[0].entries[0].variants[0];
        assert_eq!(variant.style, Some(VisualStyle::FlatSquare));
        assert_eq!(variant.cache_seconds, Some(7200));
    }

    #[test]
    fn version_message_is_verbatim() {
        let map = build_badge_map(
            &resolved_single("left-pad", "^1.3.0"),
            &base_style(Theme::Dark)
        );
        assert_eq!(map.sections[0].entries[0].variants[0].message, "^1.3.0");
    }

    #[test]
    fn every_entry_wraps_exactly_one_variant() {
        let resolved = ResolvedDependencies {
            sections: vec![ResolvedSection {
                label:    "runtime".to_owned(),
                packages: vec![
                    ResolvedPackage {
                        name:    "serde".to_owned(),
                        version: "1.0.219".to_owned()
                    },
                    ResolvedPackage {
                        name:    "clap".to_owned(),
                        version: "4.5.32".to_owned()
                    },
                ]
            }]
        };

        let map = build_badge_map(&resolved, &base_style(Theme::Dark));
        for section in &map.sections {
            for entry in &section.entries {
                assert_eq!(entry.variants.len(), 1, "entry {}", entry.package);
            }
        }
    }

    #[test]
    fn artifacts_group_by_source_in_first_appearance_order() {
        let declarations: Vec<DependencyDeclaration> = serde_yaml::from_str(
            r#"
- source: docker
  artifact:
    image: nginx
- source: github
  artifact:
    metric: stars
    user: octocat
    repo: hello-world
- source: docker
  artifact:
    image: redis
"#
        )
        .expect("expected declarations to parse");

        let map = build_artifact_map(&declarations);
        assert_eq!(map.groups.len(), 2);
        assert_eq!(map.groups[0].source, ArtifactSource::Docker);
        assert_eq!(map.groups[0].items.len(), 2);
        assert_eq!(map.groups[1].source, ArtifactSource::Github);
        assert_eq!(map.item_count(), 3);
    }

    #[test]
    fn unknown_sources_and_package_selections_are_excluded() {
        let declarations: Vec<DependencyDeclaration> = serde_yaml::from_str(
            r#"
- source: gitlab
  artifact:
    anything: goes
- source: dependencies
  packages: [serde]
"#
        )
        .expect("expected declarations to parse");

        let map = build_artifact_map(&declarations);
        assert!(map.groups.is_empty());
    }
}
