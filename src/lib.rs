//! Wayfarer: a road-network routing server.
//!
//! Two halves share this crate:
//!
//! - the offline pipeline (`wayfarer-prepare`) reads a node-based road
//!   graph plus turn restrictions, expands it into an edge-based graph in
//!   which permitted turns are the edges, and writes the result with a
//!   CRC32 integrity guard;
//! - the server (`wayfarer-routed`) loads the expanded graph, answers
//!   `GET /{service}` requests over HTTP/1.1 and renders routes as JSON,
//!   JSONP or GPX, optionally gzip/deflate compressed.
//!
//! The edge-based graph is the single source of truth for routing: turn
//! restrictions and turn penalties live in its edge weights, so the query
//! side is a plain Dijkstra over a frozen CSR structure.

pub mod descriptors;
pub mod error;
pub mod expand;
pub mod facade;
pub mod formats;
pub mod geo;
pub mod graph;
pub mod plugins;
pub mod profile;
pub mod query;
pub mod server;
pub mod spatial;
pub mod types;

pub use error::Error;
pub use facade::DataFacade;
pub use types::{NodeID, INVALID_EDGE_WEIGHT, INVALID_NODE};
