// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Manifest snapshot types for `package.json` projects.
//!
//! Only the fields the pipeline consumes are modelled: the project
//! coordinates and the three dependency section tables. Unknown manifest
//! fields are ignored so arbitrary real-world documents load cleanly.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Parsed view of a `package.json` document.
///
/// # Examples
///
/// ```
/// use depbadge::ManifestSnapshot;
///
/// let json = r#"{
///   "name": "demo",
///   "version": "1.0.0",
///   "dependencies": { "serde": "1.0.219" }
/// }"#;
/// let manifest: ManifestSnapshot = serde_json::from_str(json).expect("valid manifest");
/// assert_eq!(manifest.version, "1.0.0");
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSnapshot {
    /// Project name.
    pub name:              String,
    /// Project version carried into the state fingerprint.
    pub version:           String,
    /// Declared license identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license:           Option<String>,
    /// Runtime dependency versions keyed by package name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies:      BTreeMap<String, String>,
    /// Development dependency versions keyed by package name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies:  BTreeMap<String, String>,
    /// Peer dependency versions keyed by package name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub peer_dependencies: BTreeMap<String, String>
}

impl ManifestSnapshot {
    /// Returns the version table for a section name, or `None` for names the
    /// manifest format does not define.
    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match name {
            "dependencies" => Some(&self.dependencies),
            "devDependencies" => Some(&self.dev_dependencies),
            "peerDependencies" => Some(&self.peer_dependencies),
            _ => None
        }
    }
}

/// Loads the manifest from the provided path.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read or the JSON cannot be
/// decoded.
pub fn load_manifest(path: &Path) -> Result<ManifestSnapshot, Error> {
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_manifest(&contents)
}

/// Parses the manifest from JSON text.
///
/// # Errors
///
/// Propagates [`Error::ManifestParse`](Error::ManifestParse) when the JSON
/// cannot be decoded.
pub fn parse_manifest(contents: &str) -> Result<ManifestSnapshot, Error> {
    serde_json::from_str(contents).map_err(error::manifest_parse_error)
}
