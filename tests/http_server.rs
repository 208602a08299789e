//! Live-socket tests of the HTTP front-end: negotiation, headers, error
//! replies.

mod common;

use std::io::Read;
use std::sync::Arc;

use common::line_facade;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use wayfarer::plugins::{BaseRoutePlugin, HelloPlugin, NodeIdPlugin, PluginRegistry};
use wayfarer::server::{RequestHandler, RoutingServer};

/// Binds a server on an OS-assigned port and returns its address.
async fn spawn_server() -> std::net::SocketAddr {
    let facade = Arc::new(line_facade());
    let mut registry = PluginRegistry::new();
    registry.register(Box::new(HelloPlugin::new(facade.clone())));
    registry.register(Box::new(NodeIdPlugin::new(facade.clone())));
    registry.register(Box::new(BaseRoutePlugin::new(facade.clone())));
    let handler = Arc::new(RequestHandler::new(registry));

    let server = RoutingServer::bind("127.0.0.1", 0, handler).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.run().await });
    addr
}

/// Sends one raw request and reads until the server closes the socket.
async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let boundary = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header block");
    let head = String::from_utf8_lossy(&raw[..boundary]).to_string();
    (head, raw[boundary + 4..].to_vec())
}

#[tokio::test]
async fn test_hello_plain_json() {
    let addr = spawn_server().await;
    let raw = roundtrip(addr, "GET /hello HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_response(&raw);

    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains("Content-Type: application/json; charset=UTF-8"));
    assert!(head.contains("Content-Disposition: inline; filename=\"response.json\""));
    assert!(!head.contains("Content-Encoding"));

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["title"], "Hello, World!");
    assert_eq!(value["node_count"], 4);
}

#[tokio::test]
async fn test_gzip_negotiation() {
    let addr = spawn_server().await;
    let raw = roundtrip(
        addr,
        "GET /hello HTTP/1.1\r\nHost: x\r\nAccept-Encoding: gzip, deflate\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&raw);

    assert!(head.contains("Content-Encoding: gzip"));
    let length: usize = head
        .lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(length, body.len());

    let mut decoder = flate2::read::GzDecoder::new(body.as_slice());
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
    assert_eq!(value["title"], "Hello, World!");
}

#[tokio::test]
async fn test_deflate_negotiation() {
    let addr = spawn_server().await;
    let raw = roundtrip(
        addr,
        "GET /hello HTTP/1.1\r\nHost: x\r\nAccept-Encoding: deflate\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&raw);

    assert!(head.contains("Content-Encoding: deflate"));
    let mut decoder = flate2::read::DeflateDecoder::new(body.as_slice());
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).unwrap();
    assert!(serde_json::from_slice::<serde_json::Value>(&decoded).is_ok());
}

#[tokio::test]
async fn test_baseroute_found() {
    let addr = spawn_server().await;
    let raw = roundtrip(
        addr,
        "GET /baseroute?coords=50.0,8.0&coords=50.0,8.0035 HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&raw);

    assert!(head.starts_with("HTTP/1.1 200 OK"));
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], 0);
    assert_eq!(value["route_summary"]["total_distance"], 3);
    assert!(value["route_geometry"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn test_malformed_query_names_byte_offset() {
    let addr = spawn_server().await;
    let raw = roundtrip(
        addr,
        "GET /baseroute?coords=abc HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&raw);

    assert!(head.starts_with("HTTP/1.1 400 Bad Request"));
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], 400);
    let message = value["status_message"].as_str().unwrap();
    assert!(message.contains("position 18"), "message was {message}");
}

#[tokio::test]
async fn test_jsonp_wrapping_and_content_type() {
    let addr = spawn_server().await;
    let raw = roundtrip(
        addr,
        "GET /hello?jsonp=my_cb HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&raw);

    assert!(head.contains("Content-Type: text/javascript; charset=UTF-8"));
    assert!(head.contains("Content-Disposition: inline; filename=\"response.js\""));
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("my_cb("));
    assert!(text.ends_with(')'));
}

#[tokio::test]
async fn test_gpx_headers() {
    let addr = spawn_server().await;
    let raw = roundtrip(
        addr,
        "GET /baseroute/gpx?coords=50.0,8.0&coords=50.0,8.0035 HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&raw);

    assert!(head.contains("Content-Type: application/gpx+xml; charset=UTF-8"));
    assert!(head.contains("Content-Disposition: attachment; filename=\"route.gpx\""));
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("<gpx"));
    assert!(text.contains("rtept"));
}

#[tokio::test]
async fn test_unknown_service_is_400() {
    let addr = spawn_server().await;
    let raw = roundtrip(addr, "GET /teleport HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, _) = split_response(&raw);
    assert!(head.starts_with("HTTP/1.1 400 Bad Request"));
}

#[tokio::test]
async fn test_unparsable_request_is_400() {
    let addr = spawn_server().await;
    let raw = roundtrip(addr, "NOT-HTTP\r\n\r\n").await;
    let (head, _) = split_response(&raw);
    assert!(head.starts_with("HTTP/1.1 400 Bad Request"));
}

#[tokio::test]
async fn test_nodeid_resolves_coordinate() {
    let addr = spawn_server().await;
    let raw = roundtrip(
        addr,
        "GET /nodeid?coords=50.0,8.0001 HTTP/1.1\r\nHost: x\r\n\r\n",
    )
    .await;
    let (head, body) = split_response(&raw);

    assert!(head.starts_with("HTTP/1.1 200 OK"));
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], 0);
    assert_eq!(value["node_id"], 0);
    assert_eq!(value["external_id"], 100);
}
