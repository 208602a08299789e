//! Parsed request data the router cares about.

use std::net::IpAddr;

#[derive(Debug, Clone, Default)]
pub struct Request {
    pub uri: String,
    pub agent: String,
    pub referrer: String,
    pub endpoint: Option<IpAddr>,
}
