//! One-to-one shortest path between a pair of coordinates.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use crate::descriptors;
use crate::facade::DataFacade;
use crate::query::SearchEngine;
use crate::server::params::RouteParameters;
use crate::server::reply::{Reply, StatusCode};
use crate::types::{PhantomNodes, RawRoute};

use super::Plugin;

pub struct BaseRoutePlugin {
    facade: Arc<DataFacade>,
    engine: SearchEngine,
}

impl BaseRoutePlugin {
    pub fn new(facade: Arc<DataFacade>) -> Self {
        let engine = SearchEngine::new(facade.clone());
        Self { facade, engine }
    }
}

impl Plugin for BaseRoutePlugin {
    fn descriptor(&self) -> &str {
        "baseroute"
    }

    fn handle(&self, params: &RouteParameters, reply: &mut Reply) -> Result<()> {
        if params.coordinates.len() != 2
            || !params.coordinates[0].is_valid()
            || !params.coordinates[1].is_valid()
        {
            *reply = Reply::stock(StatusCode::BadRequest);
            return Ok(());
        }

        let source = self.facade.nearest_phantom(params.coordinates[0]);
        let target = self.facade.nearest_phantom(params.coordinates[1]);

        let route = match (source, target) {
            (Some(source), Some(target)) => {
                let ends = PhantomNodes { source, target };
                self.engine.shortest_path(&ends, params.uturns)
            }
            _ => {
                // nothing to snap to, treat like an unreachable target
                let body = json!({
                    "status": 207,
                    "status_message": "Cannot find route between points",
                });
                serde_json::to_writer(&mut reply.content, &body)?;
                return Ok(());
            }
        };

        if !route.is_valid() {
            tracing::debug!("single path not found");
        }
        self.render(params, &route, reply)
    }
}

impl BaseRoutePlugin {
    fn render(&self, params: &RouteParameters, route: &RawRoute, reply: &mut Reply) -> Result<()> {
        let mut descriptor = descriptors::by_format(params.output_format.as_deref());
        descriptor.set_config(params);
        descriptor.render(&self.facade, route, &mut reply.content)
    }
}
