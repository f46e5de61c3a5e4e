//! Local-directory source fetcher.

use super::SourceFetcher;
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads source files from a directory on disk
#[derive(Debug, Clone)]
pub struct FileSourceFetcher {
    dir: PathBuf,
}

impl FileSourceFetcher {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SourceFetcher for FileSourceFetcher {
    async fn fetch(&self, source: &str) -> Result<Value, SourceError> {
        let path = self.dir.join(source);
        debug!(path = %path.display(), "Reading source file");

        let bytes = tokio::fs::read(&path).await.map_err(|error| SourceError::Io {
            source_name: source.to_string(),
            error,
        })?;

        serde_json::from_slice(&bytes).map_err(|error| SourceError::Parse {
            source_name: source.to_string(),
            error,
        })
    }
}
