use sitestack_core::{Context, Result};

/// A local file whose content becomes a blob's payload.
///
/// The file is read through the context's [`FileRead`] seam, so tests can
/// run without touching the real filesystem.
///
/// [`FileRead`]: sitestack_core::FileRead
#[derive(Debug, Clone)]
pub struct FileAsset {
    path: String,
}

impl FileAsset {
    /// An asset backed by the file at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Path the asset reads from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read the file content entirely.
    pub async fn read(&self, ctx: &Context) -> Result<Vec<u8>> {
        ctx.file_read(&self.path).await
    }
}
