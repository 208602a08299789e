//! HTTP reply assembly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    InternalServerError,
}

impl StatusCode {
    pub fn status_line(&self) -> &'static str {
        match self {
            StatusCode::Ok => "HTTP/1.1 200 OK\r\n",
            StatusCode::BadRequest => "HTTP/1.1 400 Bad Request\r\n",
            StatusCode::InternalServerError => "HTTP/1.1 500 Internal Server Error\r\n",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: Vec<Header>,
    pub content: Vec<u8>,
}

impl Reply {
    /// Canned reply for a status code, used whenever request handling
    /// cannot produce anything better.
    pub fn stock(status: StatusCode) -> Self {
        let (code, message) = match status {
            StatusCode::Ok => (200, "OK"),
            StatusCode::BadRequest => (400, "Bad Request"),
            StatusCode::InternalServerError => (500, "Internal Server Error"),
        };
        let content = format!("{{\"status\":{code},\"status_message\":\"{message}\"}}");
        let mut reply = Reply {
            status,
            headers: Vec::new(),
            content: content.into_bytes(),
        };
        reply.set_content_length(reply.content.len());
        reply
    }

    pub fn ok() -> Self {
        Reply {
            status: StatusCode::Ok,
            headers: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Updates or inserts the Content-Length header.
    pub fn set_content_length(&mut self, size: usize) {
        let value = size.to_string();
        if let Some(header) = self
            .headers
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case("Content-Length"))
        {
            header.value = value;
        } else {
            self.headers.push(Header::new("Content-Length", value));
        }
    }

    /// Status line and header block, terminated by the blank line. The
    /// body is written separately so it can be swapped for its compressed
    /// form.
    pub fn header_block(&self) -> Vec<u8> {
        let mut block = Vec::with_capacity(128);
        block.extend_from_slice(self.status_line().as_bytes());
        for header in &self.headers {
            block.extend_from_slice(header.name.as_bytes());
            block.extend_from_slice(b": ");
            block.extend_from_slice(header.value.as_bytes());
            block.extend_from_slice(b"\r\n");
        }
        block.extend_from_slice(b"\r\n");
        block
    }

    fn status_line(&self) -> &'static str {
        self.status.status_line()
    }
}
