//! Configuration document types for the badge materialization pipeline.
//!
//! The types in this module mirror the structure of the YAML document
//! (`depbadgerc.yml`) consumed by the CLI. Optional values stay flexible so
//! user-supplied overrides can be applied selectively, while closed enums
//! keep the dispatchable surface (themes, visual styles, artifact sources,
//! output kinds) exhaustive at compile time.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Root configuration document driving a materialization run.
///
/// # Examples
///
/// ```
/// use depbadge::BadgeConfig;
///
/// let yaml = r#"
/// target: README.md
/// provider: shieldio
/// manifest: package.json
/// badgeStyle:
///   theme: dark
/// dependencies:
///   - source: dependencies
///     packages:
///       - serde
/// "#;
/// let config: BadgeConfig = serde_yaml::from_str(yaml).expect("valid configuration");
/// assert_eq!(config.dependencies.len(), 1);
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BadgeConfig {
    /// Fingerprint of the state the badges were last materialized from.
    ///
    /// Serialized as `null` when absent so the field always participates in
    /// fingerprint input with a stable shape.
    #[serde(default)]
    pub integrity:    Option<String>,
    /// File whose marker region receives the rendered markdown.
    pub target:       String,
    /// Badge provider label carried into the state fingerprint.
    pub provider:     String,
    /// Manifest file name the package selections are resolved against.
    pub manifest:     String,
    /// Side outputs requested in addition to target injection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output:       Option<Vec<OutputKind>>,
    /// Styling defaults and per-name overrides.
    pub badge_style:  BadgeStyle,
    /// Ordered dependency declarations.
    #[serde(default)]
    pub dependencies: Vec<DependencyDeclaration>
}

impl BadgeConfig {
    /// Returns `true` when the requested side outputs include `kind`.
    pub fn emits(&self, kind: OutputKind) -> bool {
        self.output
            .as_deref()
            .is_some_and(|kinds| kinds.contains(&kind))
    }
}

/// Side outputs the pipeline can emit in addition to target injection.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Write one JSON document per badge variant.
    Json,
    /// Write markdown preview files for badges and artifacts.
    Markdown
}

/// Styling defaults applied to every badge plus per-name overrides.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BadgeStyle {
    /// Color theme driving the default label background.
    pub theme:          Theme,
    /// Wraps the injected markdown in a centered block when set.
    #[serde(default)]
    pub center:         bool,
    /// Emits a heading per dependency section when set.
    #[serde(default)]
    pub section_header: bool,
    /// Default visual style forwarded to the badge host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style:          Option<VisualStyle>,
    /// Default cache lifetime in seconds forwarded to the badge host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_seconds:  Option<u32>,
    /// Overrides keyed by package name or artifact source tag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants:       BTreeMap<String, VariantOverride>
}

/// Visual style presets supported by the badge host.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum VisualStyle {
    /// Default flat appearance.
    Flat,
    /// Flat preset with square corners.
    FlatSquare,
    /// Glossy plastic preset.
    Plastic,
    /// Large uppercase preset.
    ForTheBadge,
    /// Rounded preset used for social buttons.
    Social
}

impl VisualStyle {
    /// Query parameter value understood by the badge host.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::FlatSquare => "flat-square",
            Self::Plastic => "plastic",
            Self::ForTheBadge => "for-the-badge",
            Self::Social => "social"
        }
    }
}

/// Per-badge styling overrides.
///
/// Every field is optional; absent fields fall back to the global style or,
/// for colors, to derived and theme-dependent defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariantOverride {
    /// Explicit badge color replacing the derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color:         Option<String>,
    /// Label background color replacing the theme default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color:   Option<String>,
    /// Marks the badge as an error badge on the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error:      Option<bool>,
    /// Logo name from the badge host's built-in set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_logo:    Option<String>,
    /// Inline SVG markup taking precedence over the named logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_svg:      Option<String>,
    /// Logo tint color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_color:    Option<String>,
    /// Logo width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_width:    Option<u32>,
    /// Visual style replacing the global default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style:         Option<VisualStyle>,
    /// Cache lifetime replacing the global default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_seconds: Option<u32>,
    /// Destination the rendered badge links to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link:          Option<String>
}

/// Single entry of the `dependencies` sequence.
///
/// A declaration either selects packages from a manifest section or
/// references an externally tracked artifact. A mapping carrying both or
/// neither of the two discriminating keys is rejected during
/// deserialization.
#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum DependencyDeclaration {
    /// Package selection resolved against the manifest.
    Packages(PackageSelection),
    /// Externally tracked artifact reference.
    Artifact(ArtifactReference)
}

impl<'de> Deserialize<'de> for DependencyDeclaration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>
    {
        use serde::de::Error as _;

        let value = serde_yaml::Value::deserialize(deserializer)?;
        let mapping = value
            .as_mapping()
            .ok_or_else(|| D::Error::custom("dependency declaration must be a mapping"))?;

        let has_key =
            |name: &str| mapping.iter().any(|(key, _)| key.as_str() == Some(name));
        let has_packages = has_key("packages");
        let has_artifact = has_key("artifact");

        match (has_packages, has_artifact) {
            (true, true) => Err(D::Error::custom(
                "dependency declaration cannot carry both packages and artifact"
            )),
            (false, false) => Err(D::Error::custom(
                "dependency declaration must carry either packages or artifact"
            )),
            (true, false) => serde_yaml::from_value::<PackageSelection>(value)
                .map(Self::Packages)
                .map_err(D::Error::custom),
            (false, true) => serde_yaml::from_value::<ArtifactReference>(value)
                .map(Self::Artifact)
                .map_err(D::Error::custom)
        }
    }
}

/// Selection of packages resolved against one manifest section.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PackageSelection {
    /// Manifest section the packages are versioned in.
    pub source:   String,
    /// Section label override used for grouping and headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label:    Option<String>,
    /// Package names looked up in the section, in rendering order.
    pub packages: Vec<String>
}

impl PackageSelection {
    /// Grouping label for this selection, falling back to the section name.
    pub fn resolved_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.source)
    }
}

/// Externally tracked artifact rendered alongside dependency badges.
///
/// Unrecognized source tags parse into [`ArtifactReference::Unknown`] and
/// are excluded from every output; configurations may carry provider tags
/// this build does not know yet.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ArtifactReference {
    /// GitHub repository metric.
    Github {
        /// Alt-text override for the rendered badge.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label:    Option<String>,
        /// Metric coordinates.
        artifact: GithubArtifact
    },
    /// Docker Hub image metric.
    Docker {
        /// Alt-text override for the rendered badge.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label:    Option<String>,
        /// Metric coordinates.
        artifact: DockerArtifact
    },
    /// Codecov coverage metric.
    Codecov {
        /// Alt-text override for the rendered badge.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label:    Option<String>,
        /// Coverage coordinates.
        artifact: CodecovArtifact
    },
    /// Source tag this build does not recognize.
    #[serde(other)]
    Unknown
}

impl ArtifactReference {
    /// Source tag used for grouping, or `None` for unrecognized sources.
    pub fn source(&self) -> Option<ArtifactSource> {
        match self {
            Self::Github {
                ..
            } => Some(ArtifactSource::Github),
            Self::Docker {
                ..
            } => Some(ArtifactSource::Docker),
            Self::Codecov {
                ..
            } => Some(ArtifactSource::Codecov),
            Self::Unknown => None
        }
    }

    /// Configured alt-text label, when any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Github {
                label, ..
            }
            | Self::Docker {
                label, ..
            }
            | Self::Codecov {
                label, ..
            } => label.as_deref(),
            Self::Unknown => None
        }
    }
}

/// Known artifact source tags.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactSource {
    /// GitHub repository metrics.
    Github,
    /// Docker Hub image metrics.
    Docker,
    /// Codecov coverage metrics.
    Codecov
}

impl ArtifactSource {
    /// Tag string used for grouping, alt text and override lookup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Docker => "docker",
            Self::Codecov => "codecov"
        }
    }
}

/// GitHub metric coordinates.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GithubArtifact {
    /// Metric rendered for the repository.
    pub metric: GithubMetric,
    /// Account owning the repository.
    pub user:   String,
    /// Repository name.
    pub repo:   String,
    /// Branch the metric is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>
}

/// Metrics supported for GitHub repositories.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GithubMetric {
    /// Star count.
    Stars,
    /// Detected license.
    License
}

impl GithubMetric {
    /// URL path segment for the metric.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::License => "license"
        }
    }
}

/// Docker Hub metric coordinates.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DockerArtifact {
    /// Metric rendered for the image; the version metric when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<DockerMetric>,
    /// Docker Hub namespace; the official `library` namespace when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user:   Option<String>,
    /// Image name.
    pub image:  String,
    /// Tag appended when the version metric is rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag:    Option<String>
}

impl DockerArtifact {
    /// Effective metric after applying the version default.
    pub fn resolved_metric(&self) -> DockerMetric {
        self.metric.unwrap_or(DockerMetric::Version)
    }

    /// Effective namespace after applying the `library` default.
    pub fn resolved_user(&self) -> &str {
        self.user.as_deref().unwrap_or("library")
    }
}

/// Metrics supported for Docker Hub images.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DockerMetric {
    /// Pull count.
    Pulls,
    /// Star count.
    Stars,
    /// Latest version.
    #[serde(rename = "v")]
    Version
}

impl DockerMetric {
    /// URL path segment for the metric.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pulls => "pulls",
            Self::Stars => "stars",
            Self::Version => "v"
        }
    }
}

/// Codecov coverage coordinates.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CodecovArtifact {
    /// Account owning the repository.
    pub user:     String,
    /// Repository name.
    pub repo:     String,
    /// Git hosting provider recognized by Codecov.
    pub provider: String,
    /// Branch the coverage is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch:   Option<String>,
    /// Coverage flag; the whole-project flag `c` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag:     Option<String>
}

impl CodecovArtifact {
    /// Effective coverage flag after applying the whole-project default.
    pub fn resolved_flag(&self) -> &str {
        self.flag.as_deref().unwrap_or("c")
    }
}

/// Loads the configuration document from the provided path.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or the document violates invariants.
pub fn load_config(path: &Path) -> Result<BadgeConfig, Error> {
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_config(&contents)
}

/// Parses the configuration document from YAML text.
///
/// This function is suitable for unit tests and higher-level callers that
/// already obtained the document contents.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the YAML cannot be decoded
/// and [`Error::Validation`](Error::Validation) when required names are
/// blank.
pub fn parse_config(contents: &str) -> Result<BadgeConfig, Error> {
    let config: BadgeConfig = serde_yaml::from_str(contents)?;
    if config.target.trim().is_empty() {
        return Err(Error::validation("configuration must name a target file"));
    }
    if config.manifest.trim().is_empty() {
        return Err(Error::validation("configuration must name a manifest file"));
    }
    Ok(config)
}

/// Color themes driving label background defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark label background for dark documents.
    Dark,
    /// Light label background matching the badge host's subtle gray.
    White
}

impl Theme {
    /// Default label background applied when no override is configured.
    pub fn label_color(self) -> &'static str {
        match self {
            Self::Dark => "#222222",
            Self::White => "rgb(233, 234, 241)"
        }
    }
}
