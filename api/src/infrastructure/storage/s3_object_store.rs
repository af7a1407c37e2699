use std::path::Path;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, error::SdkError};

use crate::application::ports::object_store::{ObjectStore, StoredObject};
use crate::bootstrap::config::S3Config;
use crate::domain::resources::resource::BucketKind;

pub struct S3ObjectStore {
    client: Client,
    public_url: String,
    video_bucket: String,
    pic_bucket: String,
    file_bucket: String,
}

impl S3ObjectStore {
    /// Builds the client and makes sure the three resource buckets exist.
    pub async fn new(cfg: &S3Config) -> anyhow::Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let (Some(access), Some(secret)) = (&cfg.access_key, &cfg.secret_key) {
            let creds = Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "lms-s3-static",
            );
            builder = builder.credentials_provider(creds);
        }
        if let Some(endpoint) = &cfg.endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }
        if cfg.force_path_style {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        let store = Self {
            client,
            public_url: cfg.public_url.trim_end_matches('/').to_string(),
            video_bucket: cfg.video_bucket.clone(),
            pic_bucket: cfg.pic_bucket.clone(),
            file_bucket: cfg.file_bucket.clone(),
        };
        for bucket in [&store.video_bucket, &store.pic_bucket, &store.file_bucket] {
            ensure_bucket(&store.client, bucket).await?;
            if let Err(err) = allow_public_read(&store.client, bucket).await {
                tracing::warn!(error = ?err, bucket = %bucket, "bucket_policy_not_applied");
            }
        }
        Ok(store)
    }

    fn bucket_name(&self, bucket: BucketKind) -> &str {
        match bucket {
            BucketKind::Video => &self.video_bucket,
            BucketKind::Picture => &self.pic_bucket,
            BucketKind::File => &self.file_bucket,
        }
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, bucket, key)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(
        &self,
        bucket: BucketKind,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> anyhow::Result<StoredObject> {
        let bucket = self.bucket_name(bucket).to_string();
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.client
            .put_object()
            .bucket(&bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .with_context(|| format!("failed to upload object {bucket}/{key}"))?;
        tracing::debug!(bucket = %bucket, key, "object_uploaded");
        Ok(StoredObject {
            url: self.object_url(&bucket, key),
            bucket,
            key: key.to_string(),
        })
    }

    async fn remove(&self, object: &StoredObject) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .with_context(|| format!("failed to delete object {}/{}", object.bucket, object.key))?;
        Ok(())
    }
}

async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(service_err)) => {
            if !matches!(service_err.err(), HeadBucketError::NotFound(_)) {
                return Err(anyhow!(service_err.err().to_string()));
            }
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    }

    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => {
            tracing::info!(bucket, "bucket_created");
            Ok(())
        }
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            CreateBucketError::BucketAlreadyOwnedByYou(_) => Ok(()),
            CreateBucketError::BucketAlreadyExists(_) => Ok(()),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}

fn public_read_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {"AWS": ["*"]},
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }]
    })
    .to_string()
}

/// Resource URLs are handed to browsers as-is, so objects must be anonymously readable.
async fn allow_public_read(client: &Client, bucket: &str) -> anyhow::Result<()> {
    client
        .put_bucket_policy()
        .bucket(bucket)
        .policy(public_read_policy(bucket))
        .send()
        .await
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_grants_get_on_bucket_objects() {
        let policy: serde_json::Value = serde_json::from_str(&public_read_policy("pics")).unwrap();
        let stmt = &policy["Statement"][0];
        assert_eq!(stmt["Action"][0], "s3:GetObject");
        assert_eq!(stmt["Resource"][0], "arn:aws:s3:::pics/*");
    }
}
