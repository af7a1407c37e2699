// Module layout
// - bootstrap: configuration and shared application context
// - infrastructure: Postgres, Neo4j, S3 and ffmpeg adapters
// - presentation: HTTP handlers and routing
// - application: ports, access rules and use cases
// - domain: core models and validation

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
