use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::cover_extractor::CoverExtractor;
use crate::application::ports::group_repository::GroupRepository;
use crate::application::ports::knowledge_graph_store::KnowledgeGraphStore;
use crate::application::ports::object_store::ObjectStore;
use crate::application::ports::resource_repository::ResourceRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    pool: PgPool,
    user_repo: Arc<dyn UserRepository>,
    group_repo: Arc<dyn GroupRepository>,
    graph_store: Arc<dyn KnowledgeGraphStore>,
    resource_repo: Arc<dyn ResourceRepository>,
    object_store: Arc<dyn ObjectStore>,
    cover_extractor: Arc<dyn CoverExtractor>,
}

impl AppServices {
    pub fn new(
        pool: PgPool,
        user_repo: Arc<dyn UserRepository>,
        group_repo: Arc<dyn GroupRepository>,
        graph_store: Arc<dyn KnowledgeGraphStore>,
        resource_repo: Arc<dyn ResourceRepository>,
        object_store: Arc<dyn ObjectStore>,
        cover_extractor: Arc<dyn CoverExtractor>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            group_repo,
            graph_store,
            resource_repo,
            object_store,
            cover_extractor,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn pool(&self) -> PgPool {
        self.services.pool.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn group_repo(&self) -> Arc<dyn GroupRepository> {
        self.services.group_repo.clone()
    }

    pub fn graph_store(&self) -> Arc<dyn KnowledgeGraphStore> {
        self.services.graph_store.clone()
    }

    pub fn resource_repo(&self) -> Arc<dyn ResourceRepository> {
        self.services.resource_repo.clone()
    }

    pub fn object_store(&self) -> Arc<dyn ObjectStore> {
        self.services.object_store.clone()
    }

    pub fn cover_extractor(&self) -> Arc<dyn CoverExtractor> {
        self.services.cover_extractor.clone()
    }

    pub fn upload_tmp_dir(&self) -> PathBuf {
        PathBuf::from(&self.cfg.upload_tmp_dir)
    }
}
