//! Service plugins and their registry.
//!
//! A plugin owns nothing but a shared borrow of the data facade and is
//! dispatched by the lowercase service name in the request path. Handling
//! errors bubble up as results; the router turns them into a stock 500.

pub mod baseroute;
pub mod hello;
pub mod nodeid;

use std::collections::HashMap;

use anyhow::Result;

use crate::server::params::RouteParameters;
use crate::server::reply::{Reply, StatusCode};

pub use baseroute::BaseRoutePlugin;
pub use hello::HelloPlugin;
pub use nodeid::NodeIdPlugin;

pub trait Plugin: Send + Sync {
    fn descriptor(&self) -> &str;

    /// Fills `reply` for the given parameters. Malformed parameters set a
    /// stock 400 and return Ok; only genuine failures return Err.
    fn handle(&self, params: &RouteParameters, reply: &mut Reply) -> Result<()>;
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin under its descriptor, replacing any previous
    /// plugin with the same name.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        tracing::info!("loaded plugin: {}", plugin.descriptor());
        self.plugins.insert(plugin.descriptor().to_string(), plugin);
    }

    /// Dispatches to the plugin named by the request; unknown services get
    /// a stock 400.
    pub fn run_query(&self, params: &RouteParameters, reply: &mut Reply) -> Result<()> {
        match self.plugins.get(&params.service) {
            Some(plugin) => {
                reply.status = StatusCode::Ok;
                plugin.handle(params, reply)
            }
            None => {
                *reply = Reply::stock(StatusCode::BadRequest);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
