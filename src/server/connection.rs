//! Per-connection state machine.
//!
//! One task owns each accepted socket from the first read to the final
//! write, so reads, handling and writes are naturally serialized without
//! any locking on connection state. The task reads until the parser has a
//! verdict, runs the handler synchronously, optionally compresses the
//! body, writes headers then body and half-closes the socket.

use std::io::Write;
use std::net::IpAddr;
use std::sync::Arc;

use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::handler::RequestHandler;
use super::parser::{CompressionType, ParseState, RequestParser};
use super::reply::{Header, Reply, StatusCode};

pub struct Connection {
    socket: TcpStream,
    peer: Option<IpAddr>,
    handler: Arc<RequestHandler>,
}

impl Connection {
    pub fn new(socket: TcpStream, peer: Option<IpAddr>, handler: Arc<RequestHandler>) -> Self {
        Self {
            socket,
            peer,
            handler,
        }
    }

    pub async fn process(mut self) {
        let mut parser = RequestParser::new();
        let mut buffer = [0u8; 8192];

        let (reply, compression) = loop {
            let read = match self.socket.read(&mut buffer).await {
                Ok(0) => return,
                Ok(read) => read,
                Err(_) => return,
            };

            match parser.consume(&buffer[..read]) {
                ParseState::Indeterminate => continue,
                ParseState::Bad => {
                    break (Reply::stock(StatusCode::BadRequest), CompressionType::None)
                }
                ParseState::Done => {
                    let (mut request, compression) = std::mem::take(&mut parser).into_parts();
                    request.endpoint = self.peer;
                    let reply = self.handler.handle_request(&request);
                    break (reply, compression);
                }
            }
        };

        if self.write_reply(reply, compression).await.is_ok() {
            // graceful closure; a write error just drops the socket
            let _ = self.socket.shutdown().await;
        }
    }

    async fn write_reply(
        &mut self,
        mut reply: Reply,
        compression: CompressionType,
    ) -> std::io::Result<()> {
        let body = match compression {
            CompressionType::Gzip => {
                reply
                    .headers
                    .insert(0, Header::new("Content-Encoding", "gzip"));
                let body = compress_buffer(&reply.content, compression);
                reply.set_content_length(body.len());
                body
            }
            CompressionType::Deflate => {
                reply
                    .headers
                    .insert(0, Header::new("Content-Encoding", "deflate"));
                let body = compress_buffer(&reply.content, compression);
                reply.set_content_length(body.len());
                body
            }
            CompressionType::None => {
                reply.set_content_length(reply.content.len());
                std::mem::take(&mut reply.content)
            }
        };

        self.socket.write_all(&reply.header_block()).await?;
        self.socket.write_all(&body).await?;
        self.socket.flush().await
    }
}

/// Compresses a reply body. Level is tuned for speed over size; responses
/// are small and latency matters more.
pub fn compress_buffer(data: &[u8], compression: CompressionType) -> Vec<u8> {
    match compression {
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
            encoder.write_all(data).expect("writing into a Vec");
            encoder.finish().expect("finishing an in-memory stream")
        }
        CompressionType::Deflate => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::fast());
            encoder.write_all(data).expect("writing into a Vec");
            encoder.finish().expect("finishing an in-memory stream")
        }
        CompressionType::None => data.to_vec(),
    }
}
