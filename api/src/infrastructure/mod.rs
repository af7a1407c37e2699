pub mod db;
pub mod graph;
pub mod media;
pub mod storage;
