// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Resolution of configured package selections against the manifest.
//!
//! The resolver pairs every selected package with the version recorded in
//! its manifest section and drops everything the manifest does not know.
//! Output order is a contract: sections enumerate in declaration order and
//! packages in package-list order, so rendered badge sequences are stable
//! across runs.

use serde::Serialize;

use crate::{config::DependencyDeclaration, manifest::ManifestSnapshot};

/// Ordered result of resolving all package selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedDependencies {
    /// Labelled sections in declaration order.
    pub sections: Vec<ResolvedSection>
}

impl ResolvedDependencies {
    /// Total number of resolved packages across all sections.
    pub fn package_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.packages.len())
            .sum()
    }
}

/// One labelled group of resolved packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSection {
    /// Grouping label shown as the section heading.
    pub label:    String,
    /// Resolved packages in selection order.
    pub packages: Vec<ResolvedPackage>
}

impl ResolvedSection {
    fn merge(&mut self, package: ResolvedPackage) {
        match self
            .packages
            .iter_mut()
            .find(|existing| existing.name == package.name)
        {
            Some(existing) => existing.version = package.version,
            None => self.packages.push(package)
        }
    }
}

/// A package paired with the version its manifest section records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    /// Package name as declared.
    pub name:    String,
    /// Version string taken verbatim from the manifest.
    pub version: String
}

/// Resolves the declared package selections against the manifest.
///
/// Artifact references are skipped entirely; they never touch the manifest.
/// A selection with an empty package list, or whose packages all miss their
/// section, contributes nothing. Unknown section names behave as empty
/// tables. Selections sharing a label merge: a repeated package keeps its
/// original position and takes the later version, new packages append.
pub fn resolve_dependencies(
    declarations: &[DependencyDeclaration],
    manifest: &ManifestSnapshot
) -> ResolvedDependencies {
    let mut sections: Vec<ResolvedSection> = Vec::new();

    for declaration in declarations {
        let DependencyDeclaration::Packages(selection) = declaration else {
            continue;
        };
        if selection.packages.is_empty() {
            continue;
        }

        let table = manifest.section(&selection.source);
        let resolved: Vec<ResolvedPackage> = selection
            .packages
            .iter()
            .filter_map(|name| {
                table
                    .and_then(|versions| versions.get(name))
                    .map(|version| ResolvedPackage {
                        name:    name.clone(),
                        version: version.clone()
                    })
            })
            .collect();

        if resolved.is_empty() {
            continue;
        }

        let label = selection.resolved_label();
        match sections.iter_mut().find(|section| section.label == label) {
            Some(section) => {
                for package in resolved {
                    section.merge(package);
                }
            }
            None => sections.push(ResolvedSection {
                label:    label.to_owned(),
                packages: resolved
            })
        }
    }

    ResolvedDependencies {
        sections
    }
}
