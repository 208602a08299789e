//! Request router: URI decoding, parameter grammar, plugin dispatch and
//! response header selection.

use anyhow::Result;
use serde_json::json;

use crate::plugins::PluginRegistry;

use super::params::{self, RouteParameters};
use super::reply::{Header, Reply, StatusCode};
use super::request::Request;

pub struct RequestHandler {
    registry: PluginRegistry,
}

impl RequestHandler {
    pub fn new(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    /// Never fails outward: anything the pipeline below throws is folded
    /// into a stock 500 and logged with the offending URI.
    pub fn handle_request(&self, request: &Request) -> Reply {
        match self.try_handle(request) {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!("[server error] {:#}, uri: {}", error, request.uri);
                Reply::stock(StatusCode::InternalServerError)
            }
        }
    }

    fn try_handle(&self, request: &Request) -> Result<Reply> {
        let decoded = match uri_decode(&request.uri) {
            Ok(decoded) => decoded,
            Err(position) => return Ok(malformed_reply(position)),
        };

        let endpoint = request
            .endpoint
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "-".to_string());
        tracing::info!(
            "{} {} {} {}",
            endpoint,
            if request.referrer.is_empty() {
                "-"
            } else {
                request.referrer.as_str()
            },
            if request.agent.is_empty() {
                "-"
            } else {
                request.agent.as_str()
            },
            decoded
        );

        let params = match params::parse(&decoded) {
            Ok(params) => params,
            Err(position) => return Ok(malformed_reply(position)),
        };

        let mut reply = Reply::ok();
        self.registry.run_query(&params, &mut reply)?;

        if reply.status != StatusCode::Ok {
            return Ok(reply);
        }

        if !params.jsonp_parameter.is_empty() {
            let mut wrapped = Vec::with_capacity(reply.content.len() + params.jsonp_parameter.len() + 2);
            wrapped.extend_from_slice(params.jsonp_parameter.as_bytes());
            wrapped.push(b'(');
            wrapped.extend_from_slice(&reply.content);
            wrapped.push(b')');
            reply.content = wrapped;
        }

        reply.set_content_length(reply.content.len());
        apply_content_headers(&mut reply, &params);
        Ok(reply)
    }
}

/// Content type and disposition by output format, with jsonp overriding
/// plain json.
fn apply_content_headers(reply: &mut Reply, params: &RouteParameters) {
    if params.output_format.as_deref() == Some("gpx") {
        reply.headers.push(Header::new(
            "Content-Type",
            "application/gpx+xml; charset=UTF-8",
        ));
        reply.headers.push(Header::new(
            "Content-Disposition",
            "attachment; filename=\"route.gpx\"",
        ));
    } else if params.jsonp_parameter.is_empty() {
        reply
            .headers
            .push(Header::new("Content-Type", "application/json; charset=UTF-8"));
        reply.headers.push(Header::new(
            "Content-Disposition",
            "inline; filename=\"response.json\"",
        ));
    } else {
        reply
            .headers
            .push(Header::new("Content-Type", "text/javascript; charset=UTF-8"));
        reply.headers.push(Header::new(
            "Content-Disposition",
            "inline; filename=\"response.js\"",
        ));
    }
}

/// The 400 body names the byte offset of the first rejected character.
fn malformed_reply(position: usize) -> Reply {
    let mut reply = Reply::stock(StatusCode::BadRequest);
    reply.content.clear();
    let body = json!({
        "status": 400,
        "status_message": format!("Query string malformed close to position {position}"),
    });
    reply.content = serde_json::to_vec(&body).unwrap_or_default();
    reply.set_content_length(reply.content.len());
    reply
}

/// Percent-decodes a request URI. `+` is preserved as-is. Returns the byte
/// offset of the first broken escape on failure.
pub fn uri_decode(input: &str) -> std::result::Result<String, usize> {
    let bytes = input.as_bytes();
    let mut decoded = String::with_capacity(input.len());
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'%' => {
                let hex = bytes.get(index + 1..index + 3).ok_or(index)?;
                let high = hex_value(hex[0]).ok_or(index)?;
                let low = hex_value(hex[1]).ok_or(index)?;
                decoded.push((high * 16 + low) as char);
                index += 3;
            }
            byte if byte.is_ascii() => {
                decoded.push(byte as char);
                index += 1;
            }
            _ => return Err(index),
        }
    }
    Ok(decoded)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
