pub mod cover_extractor;
pub mod group_repository;
pub mod knowledge_graph_store;
pub mod object_store;
pub mod resource_repository;
pub mod user_repository;
