//! Where a retrieved quote ends up.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quote_common::Result;
use quote_common::quote::render_output_line;

/// Destination for the retrieved quote.
#[async_trait]
pub trait QuoteSink: Send + Sync {
    /// Store `value`, replacing whatever was there before.
    async fn write(&self, value: &str) -> Result<()>;
}

/// Overwrites a text file with `Dólar: <value>`.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuoteSink for FileSink {
    async fn write(&self, value: &str) -> Result<()> {
        tokio::fs::write(&self.path, render_output_line(value)).await?;
        Ok(())
    }
}
