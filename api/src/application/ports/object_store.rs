use std::path::Path;

use async_trait::async_trait;

use crate::domain::resources::resource::BucketKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_file(
        &self,
        bucket: BucketKind,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> anyhow::Result<StoredObject>;
    async fn remove(&self, object: &StoredObject) -> anyhow::Result<()>;
}
