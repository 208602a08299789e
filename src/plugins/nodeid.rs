//! Resolves a coordinate to the nearest internal graph node.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use crate::facade::DataFacade;
use crate::server::params::RouteParameters;
use crate::server::reply::{Reply, StatusCode};

use super::Plugin;

pub struct NodeIdPlugin {
    facade: Arc<DataFacade>,
}

impl NodeIdPlugin {
    pub fn new(facade: Arc<DataFacade>) -> Self {
        Self { facade }
    }
}

impl Plugin for NodeIdPlugin {
    fn descriptor(&self) -> &str {
        "nodeid"
    }

    fn handle(&self, params: &RouteParameters, reply: &mut Reply) -> Result<()> {
        if params.coordinates.len() != 1 || !params.coordinates[0].is_valid() {
            *reply = Reply::stock(StatusCode::BadRequest);
            return Ok(());
        }

        let body = match self.facade.nearest_graph_node(params.coordinates[0]) {
            Some((node_id, entry)) => json!({
                "status": 0,
                "node_id": node_id,
                "external_id": entry.external_id,
                "mapped_coordinate": [
                    entry.coordinate.lat_degrees(),
                    entry.coordinate.lon_degrees(),
                ],
            }),
            None => json!({
                "status": 207,
                "status_message": "Cannot find node near coordinate",
            }),
        };
        serde_json::to_writer(&mut reply.content, &body)?;
        Ok(())
    }
}
