//! kustomize
//!
//! Per-directory resource-list accumulation.
//!
//! # Overview
//!
//! Every output directory carries a `kustomization.yaml` naming the
//! manifests the orchestration platform should apply. Waves append to it
//! over time, so the merge must be idempotent: rerunning a wave leaves
//! the document byte-for-byte unchanged, and a new wave only appends the
//! names it actually introduced.
//!
//! # Merge rules
//!
//! - Missing document: start from defaults (fixed apiVersion/kind, no
//!   namespace, empty resources). A malformed existing document aborts
//!   the run; silently resetting it would orphan deployed manifests.
//! - Resource names dedupe by exact string match, existing order stays,
//!   new names append in first-seen order.
//! - The namespace is stamped only when the document has none and the
//!   caller supplied a hint; it is never overwritten or cleared.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name used in every output directory.
pub const FILE_NAME: &str = "kustomization.yaml";

/// apiVersion written to fresh documents.
pub const API_VERSION: &str = "kustomize.config.k8s.io/v1beta1";

/// kind written to fresh documents.
pub const KIND: &str = "Kustomization";

/// Errors from reading, parsing, or writing kustomization documents.
#[derive(Debug, Error)]
pub enum KustomizeError {
    #[error("failed to read kustomization '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed kustomization '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize kustomization for '{path}': {source}")]
    Serialize {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to write kustomization '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The persisted resource-list document.
///
/// Parsing is permissive about absent fields so hand-edited documents
/// load; serialization skips empty fields to keep the files minimal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KustomizationDoc {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

impl KustomizationDoc {
    /// True when the document carries a non-empty namespace.
    pub fn has_namespace(&self) -> bool {
        matches!(self.namespace.as_deref(), Some(ns) if !ns.is_empty())
    }

    /// Fill in the fixed apiVersion/kind when absent.
    fn apply_defaults(&mut self) {
        if self.api_version.is_empty() {
            self.api_version = API_VERSION.to_string();
        }
        if self.kind.is_empty() {
            self.kind = KIND.to_string();
        }
    }

    /// Append the names not already present, preserving order. Returns
    /// how many were added.
    fn absorb(&mut self, names: &[String]) -> usize {
        let mut added = 0;
        for name in names {
            if !self.resources.iter().any(|r| r == name) {
                self.resources.push(name.clone());
                added += 1;
            }
        }
        added
    }
}

/// Drop empty entries and duplicates from `names`, trimming whitespace.
/// First occurrence wins, order otherwise preserved.
fn clean(names: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !cleaned.iter().any(|c| c == trimmed) {
            cleaned.push(trimmed.to_string());
        }
    }
    cleaned
}

/// Merge `new_files` into the kustomization document of `dir`.
///
/// A no-op (without touching the file) when `new_files` is empty after
/// cleaning. Otherwise reads the existing document if present, applies
/// the merge rules, and writes the result back; with nothing genuinely
/// new the rewrite is byte-identical.
///
/// # Errors
///
/// Fails when the existing document cannot be read or parsed, or when
/// the updated document cannot be written.
pub fn merge(dir: &Path, new_files: &[String], namespace_hint: &str) -> Result<(), KustomizeError> {
    let cleaned = clean(new_files);
    if cleaned.is_empty() {
        return Ok(());
    }

    let path = dir.join(FILE_NAME);
    let mut doc = match fs::read_to_string(&path) {
        Ok(text) => {
            serde_yaml::from_str::<KustomizationDoc>(&text).map_err(|e| KustomizeError::Parse {
                path: path.clone(),
                source: e,
            })?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => KustomizationDoc::default(),
        Err(e) => {
            return Err(KustomizeError::Read {
                path,
                source: e,
            })
        }
    };

    doc.apply_defaults();
    if !doc.has_namespace() && !namespace_hint.is_empty() {
        doc.namespace = Some(namespace_hint.to_string());
    }
    doc.absorb(&cleaned);

    let yaml = serde_yaml::to_string(&doc).map_err(|e| KustomizeError::Serialize {
        path: path.clone(),
        source: e,
    })?;
    fs::write(&path, yaml).map_err(|e| KustomizeError::Write { path, source: e })
}
