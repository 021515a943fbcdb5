//! Dependency badge materialization for `package.json` projects.
//!
//! The library loads a YAML configuration document, resolves declared
//! package selections against the project manifest, derives deterministic
//! badge colors, renders shields.io markdown, and injects the result into a
//! marker-delimited region of a target file. A SHA-256 fingerprint over the
//! effective state decides when side outputs are emitted and when the
//! stored integrity value is rewritten. All public APIs document their
//! error semantics and ship with minimal examples.

mod color;
mod config;
mod error;
mod inject;
mod integrity;
mod locate;
mod manifest;
mod output;
mod pipeline;
mod render;
mod resolver;
mod variant;

pub use color::{HslColor, color_for};
pub use config::{
    ArtifactReference, ArtifactSource, BadgeConfig, BadgeStyle, CodecovArtifact,
    DependencyDeclaration, DockerArtifact, DockerMetric, GithubArtifact, GithubMetric, OutputKind,
    PackageSelection, Theme, VariantOverride, VisualStyle, load_config, parse_config
};
pub use error::{Error, io_error, manifest_parse_error, output_io_error};
pub use inject::{
    InjectOutcome, MARKER_END, MARKER_START, inject_into_target, rewrite_config_integrity
};
pub use integrity::{compute_fingerprint, fingerprint_changed};
pub use locate::find_upwards;
pub use manifest::{ManifestSnapshot, load_manifest, parse_manifest};
pub use output::{
    ARTIFACTS_PREVIEW_FILE, BADGES_PREVIEW_FILE, write_badge_json, write_markdown_previews
};
pub use pipeline::{MaterializeOptions, MaterializeReport, materialize, preview};
pub use render::{
    BADGE_HOST, MarkdownSections, apply_centering, render_artifact_badge,
    render_artifact_sections, render_badge_sections, render_dependency_badge,
    render_preview_document, render_sectioned_body, render_target_document
};
pub use resolver::{ResolvedDependencies, ResolvedPackage, ResolvedSection, resolve_dependencies};
pub use variant::{
    ArtifactGroup, ArtifactMap, BadgeVariant, VariantEntry, VariantMap, VariantSection,
    build_artifact_map, build_badge_map
};
