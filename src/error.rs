#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the badge pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

use std::path::{Path, PathBuf};

/// Unified error type returned by the configuration loader and CLI.
///
/// Each variant captures sufficient context for diagnostics while avoiding
/// accidental exposure of sensitive data. Instances are typically constructed
/// through the [`io_error`] helper or by converting from serde error types via
/// the provided `From` implementations.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON decoding errors raised while reading the manifest.
    #[error("failed to parse manifest: {source}")]
    ManifestParse {
        /// Source decoding error from serde_json.
        source: serde_json::Error
    },
    /// Returned when the configuration violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when producing badge output.
    #[error("failed to serialize badges: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing badge output files.
    #[error("failed to write badge output at {path:?}: {source}")]
    OutputIo {
        /// Location of the output file being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Returned when the configured manifest format has no pipeline support.
    #[error("unsupported manifest '{manifest}': only package.json projects are supported")]
    UnsupportedManifest {
        /// Manifest file name taken from the configuration document.
        manifest: String
    },
    /// Errors raised by the filesystem side-effect modules.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Constructs the terminal error for manifest formats the pipeline does
    /// not understand.
    ///
    /// # Parameters
    ///
    /// * `manifest` - Manifest file name taken from the configuration.
    pub fn unsupported_manifest<M>(manifest: M) -> Self
    where
        M: Into<String>
    {
        Self::UnsupportedManifest {
            manifest: manifest.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Service {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::OutputIo`] variant capturing the failing path and
/// source.
///
/// # Parameters
///
/// * `path` - Location of the badge output file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn output_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::OutputIo {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ManifestParse`] variant from a JSON decoding error.
///
/// # Parameters
///
/// * `source` - Decoding error reported by serde_json.
pub fn manifest_parse_error(source: serde_json::Error) -> Error {
    Error::ManifestParse {
        source
    }
}
