use std::path::Path;

use async_trait::async_trait;

#[async_trait]
pub trait CoverExtractor: Send + Sync {
    /// Writes a single JPEG frame of `video` to `dest`.
    async fn extract(&self, video: &Path, dest: &Path) -> anyhow::Result<()>;
}
