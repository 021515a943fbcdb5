// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Side output emission.
//!
//! Besides target injection the pipeline can emit the computed badge data
//! as JSON documents and the rendered markdown as preview files. Both land
//! under a caller-chosen output directory whose hierarchy is created on
//! demand.

use std::{
    fs,
    path::{Path, PathBuf}
};

use crate::{
    error::{self, Error},
    variant::{BadgeVariant, VariantMap}
};

/// File name of the dependency badge markdown preview.
pub const BADGES_PREVIEW_FILE: &str = "BADGES.md";
/// File name of the artifact badge markdown preview.
pub const ARTIFACTS_PREVIEW_FILE: &str = "ARTIFACTS.md";

/// Writes one JSON document per badge under `output_dir`.
///
/// Documents land at `<output_dir>/<section label>/<package>.json`. Scoped
/// package names contain a separator, so their documents nest one level
/// deeper; the directory hierarchy is created as needed. Documents whose
/// content is already current are left untouched and excluded from the
/// returned list.
///
/// # Errors
///
/// Returns [`Error::OutputIo`](Error::OutputIo) when directories or files
/// cannot be created and [`Error::Serialize`](Error::Serialize) if a badge
/// cannot be encoded.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use depbadge::{
///     build_badge_map, load_config, load_manifest, resolve_dependencies, write_badge_json
/// };
///
/// # fn main() -> Result<(), depbadge::Error> {
/// let config = load_config(Path::new("depbadgerc.yml"))?;
/// let manifest = load_manifest(Path::new("package.json"))?;
/// let resolved = resolve_dependencies(&config.dependencies, &manifest);
/// let map = build_badge_map(&resolved, &config.badge_style);
///
/// let written = write_badge_json(&map, Path::new(".depbadge"))?;
/// println!("wrote {} badge documents", written.len());
/// # Ok(())
/// # }
/// ```
pub fn write_badge_json(map: &VariantMap, output_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut written = Vec::new();
    for section in &map.sections {
        let section_dir = output_dir.join(&section.label);
        for entry in &section.entries {
            let Some(variant) = entry.variants.first() else {
                continue;
            };
            let path = section_dir.join(format!("{}.json", entry.package));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|source| error::output_io_error(parent, source))?;
            }
            if write_variant_document(&path, variant)? {
                written.push(path);
            }
        }
    }
    Ok(written)
}

/// Writes markdown preview files for the rendered documents.
///
/// The dependency preview is always emitted; the artifact preview only
/// when its document is non-empty. Previews whose content is already
/// current are left untouched and excluded from the returned list.
///
/// # Errors
///
/// Returns [`Error::OutputIo`](Error::OutputIo) when the directory or a
/// preview file cannot be created.
pub fn write_markdown_previews(
    badge_document: &str,
    artifact_document: &str,
    output_dir: &Path
) -> Result<Vec<PathBuf>, Error> {
    fs::create_dir_all(output_dir).map_err(|source| error::output_io_error(output_dir, source))?;

    let mut written = Vec::new();
    let badges_path = output_dir.join(BADGES_PREVIEW_FILE);
    if write_preview(&badges_path, badge_document)? {
        written.push(badges_path);
    }

    if !artifact_document.is_empty() {
        let artifacts_path = output_dir.join(ARTIFACTS_PREVIEW_FILE);
        if write_preview(&artifacts_path, artifact_document)? {
            written.push(artifacts_path);
        }
    }
    Ok(written)
}

fn write_variant_document(path: &Path, variant: &BadgeVariant) -> Result<bool, Error> {
    let mut document = serde_json::to_string_pretty(variant)?;
    document.push('\n');
    write_if_changed(path, &document)
}

fn write_preview(path: &Path, document: &str) -> Result<bool, Error> {
    write_if_changed(path, &format!("{document}\n"))
}

fn write_if_changed(path: &Path, contents: &str) -> Result<bool, Error> {
    if let Ok(existing) = fs::read_to_string(path)
        && existing == contents
    {
        return Ok(false);
    }
    fs::write(path, contents).map_err(|source| error::output_io_error(path, source))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;
    use tempfile::tempdir;

    use super::*;
    use crate::variant::{VariantEntry, VariantSection};

    fn sample_variant(message: &str) -> BadgeVariant {
        BadgeVariant {
            color:         "hsl(10,60%,40%)".to_owned(),
            label_color:   "#222222".to_owned(),
            message:       message.to_owned(),
            is_error:      None,
            named_logo:    None,
            logo_svg:      None,
            logo_color:    None,
            logo_width:    None,
            style:         None,
            cache_seconds: None,
            link:          None
        }
    }

    fn sample_map(package: &str) -> VariantMap {
        VariantMap {
            sections: vec![VariantSection {
                label:   "dependencies".to_owned(),
                entries: vec![VariantEntry {
                    package:  package.to_owned(),
                    variants: vec![sample_variant("1.3.0")]
                }]
            }]
        }
    }

    #[test]
    fn badge_documents_land_under_section_directories() {
        let directory = tempdir().expect("failed to create temp dir");
        let output_dir = directory.path().join("out");

        let written = write_badge_json(&sample_map("left-pad"), &output_dir)
            .expect("expected json output to succeed");

        assert_eq!(written.len(), 1);
        assert_eq!(
            written[0],
            output_dir.join("dependencies").join("left-pad.json")
        );

        let contents = fs::read_to_string(&written[0]).expect("expected document to be readable");
        assert!(contents.ends_with('\n'));
        let value: Value = serde_json::from_str(&contents).expect("expected valid JSON");
        assert_eq!(value["color"], "hsl(10,60%,40%)");
        assert_eq!(value["labelColor"], "#222222");
        assert_eq!(value["message"], "1.3.0");
        assert!(value.get("namedLogo").is_none());
    }

    #[test]
    fn scoped_packages_nest_one_directory_deeper() {
        let directory = tempdir().expect("failed to create temp dir");
        let output_dir = directory.path().join("out");

        let written = write_badge_json(&sample_map("@types/node"), &output_dir)
            .expect("expected json output to succeed");

        assert_eq!(
            written[0],
            output_dir
                .join("dependencies")
                .join("@types")
                .join("node.json")
        );
        assert!(written[0].exists());
    }

    #[test]
    fn previews_skip_the_artifact_file_when_empty() {
        let directory = tempdir().expect("failed to create temp dir");
        let output_dir = directory.path().join("out");

        let written = write_markdown_previews("![a](u)", "", &output_dir)
            .expect("expected preview output to succeed");

        assert_eq!(written.len(), 1);
        assert_eq!(written[0], output_dir.join(BADGES_PREVIEW_FILE));
        assert!(!output_dir.join(ARTIFACTS_PREVIEW_FILE).exists());

        let contents = fs::read_to_string(&written[0]).expect("expected preview to be readable");
        assert_eq!(contents, "![a](u)\n");
    }

    #[test]
    fn previews_include_artifacts_when_rendered() {
        let directory = tempdir().expect("failed to create temp dir");
        let output_dir = directory.path().join("out");

        let written = write_markdown_previews("![a](u)", "![art](v)", &output_dir)
            .expect("expected preview output to succeed");

        assert_eq!(written.len(), 2);
        let contents = fs::read_to_string(output_dir.join(ARTIFACTS_PREVIEW_FILE))
            .expect("expected preview to be readable");
        assert_eq!(contents, "![art](v)\n");
    }

    #[test]
    fn directory_errors_surface_the_failing_path() {
        let directory = tempdir().expect("failed to create temp dir");
        let blocked = directory.path().join("blocked");
        fs::write(&blocked, "").expect("failed to create placeholder file");

        let error =
            write_badge_json(&sample_map("left-pad"), &blocked).expect_err("expected io failure");

        match error {
            Error::OutputIo {
                path, ..
            } => {
                assert_eq!(path, blocked.join("dependencies"));
            }
            other => panic!("unexpected error variant: {other:?}")
        }
    }

    #[test]
    fn current_documents_are_skipped_and_stale_ones_rewritten() {
        let directory = tempdir().expect("failed to create temp dir");
        let output_dir = directory.path().join("out");

        let first = write_badge_json(&sample_map("left-pad"), &output_dir)
            .expect("expected json output to succeed");
        assert_eq!(first.len(), 1);

        let second = write_badge_json(&sample_map("left-pad"), &output_dir)
            .expect("expected json output to succeed");
        assert!(second.is_empty());

        fs::write(&first[0], "{}\n").expect("failed to overwrite document");
        let third = write_badge_json(&sample_map("left-pad"), &output_dir)
            .expect("expected json output to succeed");
        assert_eq!(third, first);
    }

    #[test]
    fn current_previews_are_skipped() {
        let directory = tempdir().expect("failed to create temp dir");
        let output_dir = directory.path().join("out");

        write_markdown_previews("![a](u)", "![art](v)", &output_dir)
            .expect("expected preview output to succeed");
        let written = write_markdown_previews("![a](u)", "![art](v)", &output_dir)
            .expect("expected preview output to succeed");

        assert!(written.is_empty());
    }

    #[test]
    fn empty_variant_lists_produce_no_documents() {
        let directory = tempdir().expect("failed to create temp dir");
        let output_dir = directory.path().join("out");

        let map = VariantMap {
            sections: vec![VariantSection {
                label:   "dependencies".to_owned(),
                entries: vec![VariantEntry {
                    package:  "ghost".to_owned(),
                    variants: Vec::new()
                }]
            }]
        };

        let written = write_badge_json(&map, &output_dir).expect("expected json output to succeed");
        assert!(written.is_empty());
    }
}
