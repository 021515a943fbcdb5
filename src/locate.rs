// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Upward filesystem discovery for named project files.

use std::path::{Path, PathBuf};

/// Walks from `start_dir` toward the filesystem root looking for a file
/// named `name` and returns the closest match.
///
/// Only regular files count; a directory carrying the name is skipped.
pub fn find_upwards(name: &str, start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;
    loop {
        let candidate = current.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}
