//! Single-file JSON persistence for the legal knowledge base.
//!
//! The whole corpus lives in one pretty-printed document so it can be edited
//! and reviewed by hand. Writes go through a sibling temp file plus rename so
//! a crashed write never leaves a half-document behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use legal_advisor_core::Corpus;
use ulid::Ulid;

pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    /// Load the corpus document. A missing file reads as an empty corpus so a
    /// fresh data directory works without a seeding step.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed, or validated.
    pub fn load_corpus(&self) -> Result<Corpus> {
        if !self.path.exists() {
            return Ok(Corpus::default());
        }

        let bytes = fs::read(&self.path)
            .with_context(|| format!("failed to read corpus file {}", self.path.display()))?;
        let corpus: Corpus = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse corpus JSON {}", self.path.display()))?;
        corpus.validate().map_err(|err| anyhow!("corpus validation failed: {err}"))?;
        Ok(corpus)
    }

    /// Replace the stored corpus document atomically.
    ///
    /// # Errors
    /// Returns an error when validation fails or the document cannot be written.
    pub fn replace_corpus(&self, corpus: &Corpus) -> Result<()> {
        corpus.validate().map_err(|err| anyhow!("corpus validation failed: {err}"))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create corpus directory {}", parent.display())
                })?;
            }
        }

        let json =
            serde_json::to_vec_pretty(corpus).context("failed to serialize corpus document")?;
        let temp_path = self.path.with_extension(format!("tmp-{}", Ulid::new()));
        fs::write(&temp_path, json)
            .with_context(|| format!("failed to write temp file {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("failed to move corpus document into place at {}", self.path.display())
        })?;
        Ok(())
    }
}
