use std::path::Path;

use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::application::access::Caller;
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::cover_extractor::CoverExtractor;
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::application::ports::object_store::{ObjectStore, StoredObject};
use crate::application::ports::resource_repository::ResourceRepository;
use crate::domain::accounts::account::UserType;
use crate::domain::knowledge::node::NodeKind;
use crate::domain::resources::resource::{
    NewResource, RawResourceForm, ResourceDraft, ResourceKind, ResourceSource, UploadTarget,
    classify_upload,
    cover_target, validate_link,
};

pub struct UploadResource<'a, G, R, O, C>
where
    G: KnowledgeGraphStore + ?Sized,
    R: ResourceRepository + ?Sized,
    O: ObjectStore + ?Sized,
    C: CoverExtractor + ?Sized,
{
    pub graph: &'a G,
    pub repo: &'a R,
    pub objects: &'a O,
    pub covers: &'a C,
    pub tmp_dir: &'a Path,
    pub default_cover_url: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct UploadResourceRequest {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub resource_type: String,
    pub point_name: String,
    pub resource_link: Option<String>,
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadedResource {
    pub id: i64,
    pub kind: ResourceKind,
    pub point_id: i64,
    pub url: String,
    pub cover_url: String,
}

/// Objects pushed to the store during one upload; removed again if a later step fails.
#[derive(Default)]
struct Rollback {
    objects: Vec<StoredObject>,
}

impl Rollback {
    fn track(&mut self, obj: &StoredObject) {
        self.objects.push(obj.clone());
    }

    async fn run<O: ObjectStore + ?Sized>(self, store: &O) {
        for obj in self.objects {
            if let Err(err) = store.remove(&obj).await {
                tracing::warn!(error = ?err, bucket = %obj.bucket, key = %obj.key, "upload_rollback_remove_failed");
            } else {
                tracing::info!(bucket = %obj.bucket, key = %obj.key, "upload_rollback_removed");
            }
        }
    }
}

impl<'a, G, R, O, C> UploadResource<'a, G, R, O, C>
where
    G: KnowledgeGraphStore + ?Sized,
    R: ResourceRepository + ?Sized,
    O: ObjectStore + ?Sized,
    C: CoverExtractor + ?Sized,
{
    /// Stores a resource for the named knowledge point, either as an external link or
    /// as an uploaded file. A non-empty link takes precedence over a file. Local scratch
    /// files never outlive the call.
    pub async fn execute(
        &self,
        caller: &Caller,
        req: UploadResourceRequest,
    ) -> ServiceResult<UploadedResource> {
        caller.require(UserType::Teacher)?;
        let draft = ResourceDraft::parse(RawResourceForm {
            title: &req.title,
            description: req.description.as_deref(),
            difficulty: req.difficulty.as_deref(),
            resource_type: &req.resource_type,
            point_name: &req.point_name,
        })?;
        let link = req
            .resource_link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());
        // A link wins over any file part sent alongside it.
        let source = match (link, req.file) {
            (Some(link), file) => {
                if file.is_some() {
                    tracing::debug!("resource_link_overrides_file");
                }
                ResourceSource::Link(validate_link(link)?)
            }
            (None, Some(file)) => ResourceSource::File {
                filename: file.filename,
                bytes: file.bytes,
            },
            (None, None) => return Err(ServiceError::MissingParam("data".into())),
        };
        let point = self
            .graph
            .find_node(NodeKind::Point, &draft.point_name)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(format!("knowledge point {} not found", draft.point_name))
            })?;

        match source {
            ResourceSource::Link(link) => {
                let row = new_row(&draft, point.id, link, String::new());
                let id = self.insert_row(&row).await?;
                tracing::info!(kind = %draft.kind, id, point_id = point.id, "resource_link_saved");
                Ok(UploadedResource {
                    id,
                    kind: draft.kind,
                    point_id: point.id,
                    url: row.url,
                    cover_url: row.cover_url,
                })
            }
            ResourceSource::File { filename, bytes } => {
                let target = classify_upload(draft.kind, filename.as_deref())?;
                if bytes.is_empty() {
                    return Err(ServiceError::invalid("uploaded file is empty"));
                }
                let mut rollback = Rollback::default();
                match self
                    .upload_file(&draft, point.id, &target, &bytes, &mut rollback)
                    .await
                {
                    Ok(done) => Ok(done),
                    Err(err) => {
                        tracing::error!(error = %err, kind = %draft.kind, point_id = point.id, "resource_upload_failed");
                        rollback.run(self.objects).await;
                        Err(err)
                    }
                }
            }
        }
    }

    async fn upload_file(
        &self,
        draft: &ResourceDraft,
        point_id: i64,
        target: &UploadTarget,
        bytes: &[u8],
        rollback: &mut Rollback,
    ) -> ServiceResult<UploadedResource> {
        let staged = self.stage(&target.extension).await?;
        tokio::fs::write(staged.path(), bytes)
            .await
            .map_err(anyhow::Error::from)?;

        let key = object_key(point_id, &target.extension);
        let stored = self
            .objects
            .put_file(target.bucket, &key, staged.path(), &target.content_type)
            .await?;
        rollback.track(&stored);

        let cover_url = if draft.kind == ResourceKind::Video {
            match self.upload_cover(staged.path(), point_id).await {
                Ok(cover) => {
                    rollback.track(&cover);
                    cover.url
                }
                Err(err) => {
                    tracing::warn!(error = ?err, point_id, "video_cover_fallback");
                    self.default_cover_url.to_string()
                }
            }
        } else {
            String::new()
        };

        let row = new_row(draft, point_id, stored.url.clone(), cover_url);
        let id = self.insert_row(&row).await?;
        tracing::info!(kind = %draft.kind, id, point_id, bucket = %stored.bucket, key = %stored.key, "resource_file_saved");
        Ok(UploadedResource {
            id,
            kind: draft.kind,
            point_id,
            url: row.url,
            cover_url: row.cover_url,
        })
    }

    async fn upload_cover(&self, video: &Path, point_id: i64) -> anyhow::Result<StoredObject> {
        let target = cover_target();
        let frame = self.stage(&target.extension).await?;
        self.covers.extract(video, frame.path()).await?;
        let key = object_key(point_id, &target.extension);
        self.objects
            .put_file(target.bucket, &key, frame.path(), &target.content_type)
            .await
    }

    /// Scratch file with a random prefix; deleted when the handle drops.
    async fn stage(&self, extension: &str) -> anyhow::Result<NamedTempFile> {
        tokio::fs::create_dir_all(self.tmp_dir).await?;
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(extension)
            .tempfile_in(self.tmp_dir)?;
        Ok(file)
    }

    async fn insert_row(&self, row: &NewResource) -> anyhow::Result<i64> {
        match row.kind {
            ResourceKind::Video => self.repo.insert_video(row).await,
            ResourceKind::Courseware => self.repo.insert_courseware(row).await,
            ResourceKind::Exercise => self.repo.insert_exercise(row).await,
        }
    }
}

fn object_key(point_id: i64, extension: &str) -> String {
    format!("{}_{}{}", point_id, Uuid::new_v4().simple(), extension)
}

fn new_row(draft: &ResourceDraft, point_id: i64, url: String, cover_url: String) -> NewResource {
    NewResource {
        kind: draft.kind,
        title: draft.title.clone(),
        url,
        cover_url,
        description: draft.description.clone(),
        difficulty: draft.difficulty,
        point_id,
    }
}
