use neo4rs::{Graph, query};

use crate::domain::knowledge::node::NodeKind;

pub mod knowledge_store_neo4j;

pub async fn connect_graph(uri: &str, user: &str, password: &str) -> anyhow::Result<Graph> {
    let graph = Graph::new(uri, user, password).await?;
    Ok(graph)
}

/// Node names are unique per label; the store relies on this for MATCH-by-name.
pub async fn ensure_constraints(graph: &Graph) -> anyhow::Result<()> {
    for kind in NodeKind::ALL {
        let label = kind.label();
        let stmt = format!(
            "CREATE CONSTRAINT {label}_name_unique IF NOT EXISTS FOR (n:{label}) REQUIRE n.name IS UNIQUE"
        );
        graph.run(query(&stmt)).await?;
    }
    tracing::debug!("graph_constraints_ready");
    Ok(())
}
