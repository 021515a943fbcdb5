// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Pipeline orchestration.
//!
//! The orchestrator sequences the pure computation modules and the
//! side-effect modules into one linear run: load, gate, resolve, build,
//! render, fingerprint, emit, inject, write back. All file I/O flows
//! through the dedicated side-effect modules.

use std::{
    env,
    path::{Path, PathBuf}
};

use tracing::{debug, info};

use crate::{
    config::{self, OutputKind},
    error::Error,
    inject::{self, InjectOutcome},
    integrity, locate, manifest, output,
    render::{self, MarkdownSections},
    resolver::{self, ResolvedDependencies},
    variant::{self, VariantMap}
};

/// Manifest file name the pipeline can resolve against.
const SUPPORTED_MANIFEST: &str = "package.json";

/// Inputs controlling a materialization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Configuration document driving the run.
    pub config_path:   PathBuf,
    /// Directory receiving requested side outputs.
    pub output_dir:    PathBuf,
    /// Treat a missing target file as a failure instead of a no-op.
    pub strict_target: bool
}

/// Summary of a completed materialization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Fingerprint computed over the effective state.
    pub fingerprint:   String,
    /// Whether the state differed from the stored integrity value.
    pub changed:       bool,
    /// What happened to the target file.
    pub injection:     InjectOutcome,
    /// Located target path, when one was found.
    pub target_path:   Option<PathBuf>,
    /// Side-output files written during the run.
    pub written:       Vec<PathBuf>,
    /// Number of resolved packages across all sections.
    pub package_count: usize
}

struct Prepared {
    config:            config::BadgeConfig,
    config_dir:        PathBuf,
    resolved:          ResolvedDependencies,
    manifest:          manifest::ManifestSnapshot,
    badge_map:         VariantMap,
    badge_sections:    MarkdownSections,
    artifact_sections: MarkdownSections,
    document:          String
}

/// Runs the full materialization pipeline.
///
/// The run fails before touching the manifest when the configured manifest
/// format is unsupported. Requested side outputs are emitted on every run,
/// skipping files whose content is already current; only the integrity
/// write-back is gated on the computed fingerprint differing from the
/// stored one. Target injection is always attempted and skips the write
/// when the marker region already carries the rendered document.
///
/// # Errors
///
/// Returns [`Error::UnsupportedManifest`](Error::UnsupportedManifest) for
/// manifest formats other than `package.json`, and the underlying error
/// when loading, resolution or any filesystem step fails. With
/// `strict_target` set, a missing target file fails the run.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
///
/// use depbadge::{MaterializeOptions, materialize};
///
/// # fn main() -> Result<(), depbadge::Error> {
/// let report = materialize(&MaterializeOptions {
///     config_path:   PathBuf::from("depbadgerc.yml"),
///     output_dir:    PathBuf::from(".depbadge"),
///     strict_target: false
/// })?;
/// println!("changed: {}", report.changed);
/// # Ok(())
/// # }
/// ```
pub fn materialize(options: &MaterializeOptions) -> Result<MaterializeReport, Error> {
    let prepared = prepare(&options.config_path)?;

    let fingerprint =
        integrity::compute_fingerprint(&prepared.config, &prepared.resolved, &prepared.manifest)?;
    let changed =
        integrity::fingerprint_changed(prepared.config.integrity.as_deref(), &fingerprint);
    info!(
        "Materialized {} packages, fingerprint {}changed",
        prepared.resolved.package_count(),
        if changed { "" } else { "un" }
    );

    let mut written = Vec::new();
    if prepared.config.emits(OutputKind::Json) {
        written.extend(output::write_badge_json(
            &prepared.badge_map,
            &options.output_dir
        )?);
    }
    if prepared.config.emits(OutputKind::Markdown) {
        let badge_preview = render::render_preview_document(
            &prepared.badge_sections,
            &prepared.config.badge_style
        );
        let artifact_preview = render::render_preview_document(
            &prepared.artifact_sections,
            &prepared.config.badge_style
        );
        written.extend(output::write_markdown_previews(
            &badge_preview,
            &artifact_preview,
            &options.output_dir
        )?);
    }
    if !written.is_empty() {
        debug!("Wrote {} side output files", written.len());
    }

    let target_path = locate::find_upwards(&prepared.config.target, &prepared.config_dir);
    let injection = match &target_path {
        Some(path) => inject::inject_into_target(path, &prepared.document)?,
        None => InjectOutcome::TargetMissing
    };
    if options.strict_target && injection == InjectOutcome::TargetMissing {
        return Err(Error::service(format!(
            "target '{}' not found near {}",
            prepared.config.target,
            prepared.config_dir.display()
        )));
    }

    if changed {
        inject::rewrite_config_integrity(&options.config_path, &fingerprint)?;
    }

    Ok(MaterializeReport {
        fingerprint,
        changed,
        injection,
        target_path,
        written,
        package_count: prepared.resolved.package_count()
    })
}

/// Renders the combined badge document without touching any file.
///
/// # Errors
///
/// Fails under the same conditions as [`materialize`] up to the rendering
/// step; nothing is written.
pub fn preview(config_path: &Path) -> Result<String, Error> {
    Ok(prepare(config_path)?.document)
}

fn prepare(config_path: &Path) -> Result<Prepared, Error> {
    let config = config::load_config(config_path)?;
    if config.manifest != SUPPORTED_MANIFEST {
        return Err(Error::unsupported_manifest(&config.manifest));
    }

    let config_dir = containing_dir(config_path)?;
    let manifest_path =
        locate::find_upwards(&config.manifest, &config_dir).ok_or_else(|| {
            Error::validation(format!(
                "manifest '{}' not found near {}",
                config.manifest,
                config_dir.display()
            ))
        })?;
    debug!("Resolved manifest at {}", manifest_path.display());
    let manifest = manifest::load_manifest(&manifest_path)?;

    let resolved = resolver::resolve_dependencies(&config.dependencies, &manifest);
    let badge_map = variant::build_badge_map(&resolved, &config.badge_style);
    let artifact_map = variant::build_artifact_map(&config.dependencies);
    info!(
        "Resolved {} packages and {} artifacts from {}",
        resolved.package_count(),
        artifact_map.item_count(),
        manifest.name
    );

    let badge_sections = render::render_badge_sections(&badge_map);
    let artifact_sections = render::render_artifact_sections(&artifact_map, &config.badge_style);
    let document =
        render::render_target_document(&badge_sections, &artifact_sections, &config.badge_style);

    Ok(Prepared {
        config,
        config_dir,
        resolved,
        manifest,
        badge_map,
        badge_sections,
        artifact_sections,
        document
    })
}

fn containing_dir(path: &Path) -> Result<PathBuf, Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => env::current_dir()
            .map_err(|e| Error::service(format!("failed to determine working directory: {e}")))
    }
}
