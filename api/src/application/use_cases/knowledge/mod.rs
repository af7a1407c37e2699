pub mod add_link;
pub mod add_node;
pub mod auto_construct;
pub mod connection_analysis;
pub mod delete_link;
pub mod delete_node;
pub mod graph_views;
pub mod learning_difficulty;
pub mod path_recommend;
pub mod relations_between;
pub mod search_nodes;
pub mod update_link;
pub mod update_node;
