//! Diagnostic plugin answering with build and graph information.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use crate::facade::DataFacade;
use crate::server::params::RouteParameters;
use crate::server::reply::Reply;

use super::Plugin;

pub struct HelloPlugin {
    facade: Arc<DataFacade>,
}

impl HelloPlugin {
    pub fn new(facade: Arc<DataFacade>) -> Self {
        Self { facade }
    }
}

impl Plugin for HelloPlugin {
    fn descriptor(&self) -> &str {
        "hello"
    }

    fn handle(&self, _params: &RouteParameters, reply: &mut Reply) -> Result<()> {
        let body = json!({
            "title": "Hello, World!",
            "server": concat!("wayfarer ", env!("CARGO_PKG_VERSION")),
            "node_count": self.facade.node_count(),
            "edge_count": self.facade.edge_count(),
            "check_sum": self.facade.check_sum(),
        });
        serde_json::to_writer(&mut reply.content, &body)?;
        Ok(())
    }
}
