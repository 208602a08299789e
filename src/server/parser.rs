//! Incremental HTTP/1.1 request parser.
//!
//! Consumes whatever bytes the socket produced and reports whether the
//! request is complete, still incomplete or hopeless. Only the request
//! line and the headers of interest are kept; bodies are not expected on
//! this API.

use super::request::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// More bytes are needed.
    Indeterminate,
    /// A full request was parsed.
    Done,
    /// The bytes cannot form a valid request.
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    None,
    Gzip,
    Deflate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MethodStart,
    Method,
    Uri,
    VersionH,
    VersionT1,
    VersionT2,
    VersionP,
    VersionSlash,
    VersionMajor,
    VersionDot,
    VersionMinor,
    ExpectingNewline1,
    HeaderLineStart,
    HeaderName,
    SpaceBeforeHeaderValue,
    HeaderValue,
    ExpectingNewline2,
    ExpectingNewline3,
}

#[derive(Debug)]
pub struct RequestParser {
    state: State,
    request: Request,
    header_name: String,
    header_value: String,
    compression: CompressionType,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: State::MethodStart,
            request: Request::default(),
            header_name: String::new(),
            header_value: String::new(),
            compression: CompressionType::None,
        }
    }

    /// Feeds a chunk of input. Parsing picks up where the previous chunk
    /// stopped; the verdict refers to the request as a whole.
    pub fn consume(&mut self, input: &[u8]) -> ParseState {
        for &byte in input {
            match self.consume_byte(byte) {
                ParseState::Indeterminate => continue,
                terminal => return terminal,
            }
        }
        ParseState::Indeterminate
    }

    /// Hands out the parsed request and the negotiated compression.
    pub fn into_parts(self) -> (Request, CompressionType) {
        (self.request, self.compression)
    }

    fn consume_byte(&mut self, byte: u8) -> ParseState {
        match self.state {
            State::MethodStart => {
                if !byte.is_ascii_uppercase() {
                    return ParseState::Bad;
                }
                self.state = State::Method;
                ParseState::Indeterminate
            }
            State::Method => match byte {
                b' ' => {
                    self.state = State::Uri;
                    ParseState::Indeterminate
                }
                b if b.is_ascii_uppercase() => ParseState::Indeterminate,
                _ => ParseState::Bad,
            },
            State::Uri => match byte {
                b' ' => {
                    self.state = State::VersionH;
                    ParseState::Indeterminate
                }
                b if b.is_ascii_control() => ParseState::Bad,
                _ => {
                    self.request.uri.push(byte as char);
                    ParseState::Indeterminate
                }
            },
            State::VersionH => self.expect(byte, b'H', State::VersionT1),
            State::VersionT1 => self.expect(byte, b'T', State::VersionT2),
            State::VersionT2 => self.expect(byte, b'T', State::VersionP),
            State::VersionP => self.expect(byte, b'P', State::VersionSlash),
            State::VersionSlash => self.expect(byte, b'/', State::VersionMajor),
            State::VersionMajor => {
                if !byte.is_ascii_digit() {
                    return ParseState::Bad;
                }
                self.state = State::VersionDot;
                ParseState::Indeterminate
            }
            State::VersionDot => match byte {
                b'.' => {
                    self.state = State::VersionMinor;
                    ParseState::Indeterminate
                }
                b if b.is_ascii_digit() => ParseState::Indeterminate,
                _ => ParseState::Bad,
            },
            State::VersionMinor => match byte {
                b'\r' => {
                    self.state = State::ExpectingNewline1;
                    ParseState::Indeterminate
                }
                b if b.is_ascii_digit() => ParseState::Indeterminate,
                _ => ParseState::Bad,
            },
            State::ExpectingNewline1 => self.expect(byte, b'\n', State::HeaderLineStart),
            State::HeaderLineStart => match byte {
                b'\r' => {
                    self.state = State::ExpectingNewline3;
                    ParseState::Indeterminate
                }
                b if is_header_name_byte(b) => {
                    self.header_name.clear();
                    self.header_value.clear();
                    self.header_name.push(byte as char);
                    self.state = State::HeaderName;
                    ParseState::Indeterminate
                }
                _ => ParseState::Bad,
            },
            State::HeaderName => match byte {
                b':' => {
                    self.state = State::SpaceBeforeHeaderValue;
                    ParseState::Indeterminate
                }
                b if is_header_name_byte(b) => {
                    self.header_name.push(byte as char);
                    ParseState::Indeterminate
                }
                _ => ParseState::Bad,
            },
            State::SpaceBeforeHeaderValue => match byte {
                b' ' => {
                    self.state = State::HeaderValue;
                    ParseState::Indeterminate
                }
                b'\r' => {
                    self.finish_header();
                    self.state = State::ExpectingNewline2;
                    ParseState::Indeterminate
                }
                b if b.is_ascii_control() => ParseState::Bad,
                _ => {
                    self.header_value.push(byte as char);
                    self.state = State::HeaderValue;
                    ParseState::Indeterminate
                }
            },
            State::HeaderValue => match byte {
                b'\r' => {
                    self.finish_header();
                    self.state = State::ExpectingNewline2;
                    ParseState::Indeterminate
                }
                b if b.is_ascii_control() => ParseState::Bad,
                _ => {
                    self.header_value.push(byte as char);
                    ParseState::Indeterminate
                }
            },
            State::ExpectingNewline2 => self.expect(byte, b'\n', State::HeaderLineStart),
            State::ExpectingNewline3 => {
                if byte == b'\n' {
                    ParseState::Done
                } else {
                    ParseState::Bad
                }
            }
        }
    }

    fn expect(&mut self, byte: u8, expected: u8, next: State) -> ParseState {
        if byte == expected {
            self.state = next;
            ParseState::Indeterminate
        } else {
            ParseState::Bad
        }
    }

    /// A completed header line; picks out the few headers the router and
    /// the response writer care about. Gzip wins over deflate when the
    /// client accepts both.
    fn finish_header(&mut self) {
        if self.header_name.eq_ignore_ascii_case("Accept-Encoding") {
            let value = self.header_value.to_ascii_lowercase();
            if value.contains("gzip") {
                self.compression = CompressionType::Gzip;
            } else if value.contains("deflate") && self.compression == CompressionType::None {
                self.compression = CompressionType::Deflate;
            }
        } else if self.header_name.eq_ignore_ascii_case("User-Agent") {
            self.request.agent = self.header_value.clone();
        } else if self.header_name.eq_ignore_ascii_case("Referer") {
            self.request.referrer = self.header_value.clone();
        }
    }
}

fn is_header_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_get() {
        let mut parser = RequestParser::new();
        let state = parser.consume(b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n");
        assert_eq!(state, ParseState::Done);
        let (request, compression) = parser.into_parts();
        assert_eq!(request.uri, "/hello");
        assert_eq!(compression, CompressionType::None);
    }

    #[test]
    fn test_byte_at_a_time() {
        let raw = b"GET /baseroute?coords=1,2 HTTP/1.0\r\nUser-Agent: curl/8.0\r\n\r\n";
        let mut parser = RequestParser::new();
        for (i, byte) in raw.iter().enumerate() {
            let state = parser.consume(std::slice::from_ref(byte));
            if i + 1 == raw.len() {
                assert_eq!(state, ParseState::Done);
            } else {
                assert_eq!(state, ParseState::Indeterminate, "byte {i}");
            }
        }
        let (request, _) = parser.into_parts();
        assert_eq!(request.uri, "/baseroute?coords=1,2");
        assert_eq!(request.agent, "curl/8.0");
    }

    #[test]
    fn test_gzip_preferred_over_deflate() {
        let mut parser = RequestParser::new();
        let state =
            parser.consume(b"GET / HTTP/1.1\r\nAccept-Encoding: gzip, deflate\r\n\r\n");
        assert_eq!(state, ParseState::Done);
        assert_eq!(parser.into_parts().1, CompressionType::Gzip);
    }

    #[test]
    fn test_deflate_only() {
        let mut parser = RequestParser::new();
        parser.consume(b"GET / HTTP/1.1\r\nAccept-Encoding: deflate\r\n\r\n");
        assert_eq!(parser.into_parts().1, CompressionType::Deflate);
    }

    #[test]
    fn test_referer_recorded() {
        let mut parser = RequestParser::new();
        parser.consume(b"GET / HTTP/1.1\r\nReferer: http://example.com/map\r\n\r\n");
        assert_eq!(parser.into_parts().0.referrer, "http://example.com/map");
    }

    #[test]
    fn test_garbage_is_bad() {
        let mut parser = RequestParser::new();
        assert_eq!(parser.consume(b"\x01\x02\x03"), ParseState::Bad);

        let mut parser = RequestParser::new();
        assert_eq!(parser.consume(b"get / HTTP/1.1\r\n\r\n"), ParseState::Bad);

        let mut parser = RequestParser::new();
        assert_eq!(parser.consume(b"GET / FTP/1.1\r\n\r\n"), ParseState::Bad);
    }

    #[test]
    fn test_incomplete_is_indeterminate() {
        let mut parser = RequestParser::new();
        assert_eq!(
            parser.consume(b"GET /hello HTTP/1.1\r\nHost: local"),
            ParseState::Indeterminate
        );
        assert_eq!(parser.consume(b"host\r\n\r\n"), ParseState::Done);
    }
}
