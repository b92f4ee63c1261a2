//! "Has the user seen the guided tour?" as one persisted boolean.
//! Skipping or finishing the tour marks it seen; "restart tour" resets it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

pub mod handlers;

const SEEN_MARKER: &str = "true";

#[async_trait]
pub trait OnboardingStore: Send + Sync {
    async fn has_seen(&self) -> Result<bool>;
    async fn mark_seen(&self) -> Result<()>;
    async fn reset(&self) -> Result<()>;
}

/// Stores the flag as a marker file; a missing file means "not seen".
#[derive(Debug, Clone)]
pub struct FileOnboardingStore {
    path: PathBuf,
}

impl FileOnboardingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OnboardingStore for FileOnboardingStore {
    async fn has_seen(&self) -> Result<bool> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents.trim() == SEEN_MARKER),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read onboarding flag {:?}", self.path)),
        }
    }

    async fn mark_seen(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {parent:?}"))?;
        }
        tokio::fs::write(&self.path, SEEN_MARKER)
            .await
            .with_context(|| format!("Failed to write onboarding flag {:?}", self.path))?;
        debug!("Onboarding marked as seen");
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Onboarding flag cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to clear onboarding flag {:?}", self.path)),
        }
    }
}
