// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Marker-based document injection and configuration write-back.
//!
//! The rendered badge document lands between two HTML comment markers in
//! the target file. Everything outside the marker region is preserved
//! byte for byte, and files are only rewritten when their content would
//! actually change.

use std::{fs, io::ErrorKind, path::Path};

use masterror::AppError;
use regex::Regex;
use tracing::{debug, info};

/// Opening marker of the managed region.
pub const MARKER_START: &str = "<!-- DEPBADGE:START -->";
/// Closing marker of the managed region.
pub const MARKER_END: &str = "<!-- DEPBADGE:END -->";

/// Result of a target injection attempt.
///
/// Missing files and missing markers are ordinary outcomes here; whether
/// they terminate the run is the caller's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The marker region was rewritten with new content.
    Updated,
    /// The target already carried the rendered document.
    Unchanged,
    /// The target file does not exist.
    TargetMissing,
    /// The target exists but carries no marker pair.
    MarkersMissing
}

/// Splices the rendered document into the target's marker region.
///
/// The region between [`MARKER_START`] and [`MARKER_END`] is replaced by a
/// newline, the document, and a newline. Bytes outside the region are
/// preserved exactly, and the file is left untouched when the spliced
/// result matches the current content.
///
/// # Arguments
///
/// * `target_path` - File carrying the marker region.
/// * `document` - Rendered markdown to place between the markers.
///
/// # Errors
///
/// Returns [`AppError`] when the target cannot be read or written. A
/// missing file or marker pair is reported through [`InjectOutcome`]
/// instead.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use depbadge::inject_into_target;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = inject_into_target(Path::new("README.md"), "![serde](https://img.shields.io)")?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
pub fn inject_into_target(target_path: &Path, document: &str) -> Result<InjectOutcome, AppError> {
    debug!("Reading target from {}", target_path.display());
    let content = match fs::read_to_string(target_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Target {} does not exist", target_path.display());
            return Ok(InjectOutcome::TargetMissing);
        }
        Err(e) => {
            return Err(AppError::service(format!(
                "failed to read target at {}: {e}",
                target_path.display()
            )));
        }
    };

    let Some(start_idx) = content.find(MARKER_START) else {
        info!("Target {} carries no start marker", target_path.display());
        return Ok(InjectOutcome::MarkersMissing);
    };
    let search_from = start_idx + MARKER_START.len();
    let Some(end_offset) = content[search_from..].find(MARKER_END) else {
        info!("Target {} carries no end marker", target_path.display());
        return Ok(InjectOutcome::MarkersMissing);
    };
    let end_idx = search_from + end_offset;

    let mut updated = String::with_capacity(content.len() + document.len());
    updated.push_str(&content[..search_from]);
    updated.push('\n');
    updated.push_str(document);
    updated.push('\n');
    updated.push_str(&content[end_idx..]);

    if updated == content {
        info!("No changes to target {}", target_path.display());
        return Ok(InjectOutcome::Unchanged);
    }

    info!("Writing updated target to {}", target_path.display());
    fs::write(target_path, updated).map_err(|e| {
        AppError::service(format!(
            "failed to write target to {}: {e}",
            target_path.display()
        ))
    })?;
    Ok(InjectOutcome::Updated)
}

/// Rewrites the `integrity` entry of the configuration document in place.
///
/// The first top-level `integrity:` line is replaced with the fresh
/// fingerprint; documents without one get the line prepended. The rest of
/// the document is preserved exactly, comments included. A missing file is
/// a no-op.
///
/// # Arguments
///
/// * `config_path` - Configuration document to rewrite.
/// * `fingerprint` - Fingerprint to store.
///
/// # Errors
///
/// Returns [`AppError`] when the file cannot be read or written.
pub fn rewrite_config_integrity(config_path: &Path, fingerprint: &str) -> Result<(), AppError> {
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Configuration {} does not exist", config_path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(AppError::service(format!(
                "failed to read configuration at {}: {e}",
                config_path.display()
            )));
        }
    };

    let pattern = Regex::new(r"(?m)^integrity: .*$")
        .map_err(|e| AppError::validation(format!("invalid integrity pattern: {e}")))?;
    let replacement = format!("integrity: {fingerprint}");
    let updated = if pattern.is_match(&content) {
        pattern.replace(&content, replacement.as_str()).into_owned()
    } else {
        format!("{replacement}\n{content}")
    };

    if updated == content {
        debug!("Stored integrity already current in {}", config_path.display());
        return Ok(());
    }

    info!("Writing integrity to {}", config_path.display());
    fs::write(config_path, updated).map_err(|e| {
        AppError::service(format!(
            "failed to write configuration to {}: {e}",
            config_path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn target_with(body: &str) -> String {
        format!("# Title\n\n{MARKER_START}{body}{MARKER_END}\n\nTail text.\n")
    }

    #[test]
    fn injection_replaces_only_the_marker_region() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");
        fs::write(&path, target_with("\nold badges\n")).expect("failed to write target");

        let outcome = inject_into_target(&path, "![a](u)").expect("injection failed");
        assert_eq!(outcome, InjectOutcome::Updated);

        let updated = fs::read_to_string(&path).expect("failed to read target");
        assert_eq!(updated, target_with("\n![a](u)\n"));
    }

    #[test]
    fn repeated_injection_reports_unchanged() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");
        fs::write(&path, target_with("\nold badges\n")).expect("failed to write target");

        inject_into_target(&path, "![a](u)").expect("injection failed");
        let outcome = inject_into_target(&path, "![a](u)").expect("injection failed");
        assert_eq!(outcome, InjectOutcome::Unchanged);
    }

    #[test]
    fn missing_target_is_an_outcome_not_an_error() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");

        let outcome = inject_into_target(&path, "![a](u)").expect("injection failed");
        assert_eq!(outcome, InjectOutcome::TargetMissing);
        assert!(!path.exists());
    }

    #[test]
    fn target_without_markers_is_left_untouched() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");
        fs::write(&path, "# Title\n\nNo markers here.\n").expect("failed to write target");

        let outcome = inject_into_target(&path, "![a](u)").expect("injection failed");
        assert_eq!(outcome, InjectOutcome::MarkersMissing);

        let content = fs::read_to_string(&path).expect("failed to read target");
        assert_eq!(content, "# Title\n\nNo markers here.\n");
    }

    #[test]
    fn end_marker_before_start_counts_as_missing() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("README.md");
        fs::write(&path, format!("{MARKER_END}\n{MARKER_START}\n"))
            .expect("failed to write target");

        let outcome = inject_into_target(&path, "![a](u)").expect("injection failed");
        assert_eq!(outcome, InjectOutcome::MarkersMissing);
    }

    #[test]
    fn integrity_rewrite_replaces_the_existing_line() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("depbadgerc.yml");
        fs::write(&path, "integrity: old\ntarget: README.md\n").expect("failed to write config");

        rewrite_config_integrity(&path, "fresh").expect("rewrite failed");

        let content = fs::read_to_string(&path).expect("failed to read config");
        assert_eq!(content, "integrity: fresh\ntarget: README.md\n");
    }

    #[test]
    fn integrity_rewrite_prepends_when_absent() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("depbadgerc.yml");
        fs::write(&path, "target: README.md\n").expect("failed to write config");

        rewrite_config_integrity(&path, "fresh").expect("rewrite failed");

        let content = fs::read_to_string(&path).expect("failed to read config");
        assert_eq!(content, "integrity: fresh\ntarget: README.md\n");
    }

    #[test]
    fn integrity_rewrite_preserves_comments_and_order() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("depbadgerc.yml");
        fs::write(
            &path,
            "# managed by depbadge\ntarget: README.md\nintegrity: old\nmanifest: package.json\n"
        )
        .expect("failed to write config");

        rewrite_config_integrity(&path, "fresh").expect("rewrite failed");

        let content = fs::read_to_string(&path).expect("failed to read config");
        assert_eq!(
            content,
            "# managed by depbadge\ntarget: README.md\nintegrity: fresh\nmanifest: package.json\n"
        );
    }

    #[test]
    fn integrity_rewrite_skips_missing_files() {
        let temp = tempdir().expect("failed to create tempdir");
        let path = temp.path().join("depbadgerc.yml");

        rewrite_config_integrity(&path, "fresh").expect("rewrite failed");
        assert!(!path.exists());
    }
}
