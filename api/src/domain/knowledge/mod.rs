pub mod analysis;
pub mod graph;
pub mod import;
pub mod node;
pub mod relation;
