// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Content fingerprinting for change detection.
//!
//! The fingerprint digests the effective configuration together with the
//! resolved dependency versions and the manifest version. Any change on
//! either side yields a new digest, which is what decides whether the
//! target gets reinjected and the stored integrity value rewritten.

use sha2::{Digest, Sha256};

use crate::{
    config::BadgeConfig, error::Error, manifest::ManifestSnapshot, resolver::ResolvedDependencies
};

/// Separator between the configuration and resolution halves of the digest
/// input.
const FINGERPRINT_SEPARATOR: &str = " --- ";

/// Computes the hex-encoded SHA-256 fingerprint of the materialization
/// inputs.
///
/// The stored `integrity` value never feeds back into the digest: the
/// configuration is serialized with that field cleared, so rewriting it
/// after a run keeps the fingerprint stable.
///
/// # Parameters
///
/// * `config` - Effective configuration document.
/// * `resolved` - Dependency resolution produced from the manifest.
/// * `manifest` - Manifest snapshot the resolution was computed against.
///
/// # Errors
///
/// Returns [`Error::Service`] when either digest half fails to serialize.
pub fn compute_fingerprint(
    config: &BadgeConfig,
    resolved: &ResolvedDependencies,
    manifest: &ManifestSnapshot
) -> Result<String, Error> {
    let mut fingerprint_config = config.clone();
    fingerprint_config.integrity = None;

    let config_yaml = serde_yaml::to_string(&fingerprint_config).map_err(|e| {
        Error::service(format!(
            "failed to serialize configuration for fingerprinting: {e}"
        ))
    })?;
    let resolution = serde_json::to_string(&(resolved, &manifest.version)).map_err(|e| {
        Error::service(format!(
            "failed to serialize resolution for fingerprinting: {e}"
        ))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(config_yaml.as_bytes());
    hasher.update(FINGERPRINT_SEPARATOR.as_bytes());
    hasher.update(resolution.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Reports whether the stored integrity value is missing or stale.
///
/// Only an exact match counts as unchanged.
pub fn fingerprint_changed(stored: Option<&str>, fresh: &str) -> bool {
    stored != Some(fresh)
}
