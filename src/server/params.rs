//! Decoded request parameters and the URI grammar.
//!
//! The grammar is fixed:
//!
//! ```text
//! /{service}[/{format}][?coords=lat,lon&coords=lat,lon...]
//!                       [&instructions=bool][&jsonp=ident][&uturns=bool]
//! ```
//!
//! On failure the parser reports the byte offset of the first rejected
//! character, which the router echoes back in the 400 body.

use crate::types::FixedPointCoordinate;

#[derive(Debug, Clone, Default)]
pub struct RouteParameters {
    pub service: String,
    pub output_format: Option<String>,
    pub coordinates: Vec<FixedPointCoordinate>,
    pub print_instructions: bool,
    pub jsonp_parameter: String,
    pub uturns: bool,
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn take_while<F: Fn(u8) -> bool>(&mut self, accept: F) -> &'a str {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if !accept(byte) {
                break;
            }
            self.pos += 1;
        }
        // the input is checked ASCII by the decoder, slicing is safe
        std::str::from_utf8(&self.input[start..self.pos]).unwrap_or("")
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'_'
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$' || byte == b'.'
}

fn is_number_byte(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b'.' || byte == b'-'
}

/// Parses a decoded request path. Returns the parameters or the byte
/// offset of the first character the grammar rejects.
pub fn parse(input: &str) -> Result<RouteParameters, usize> {
    let mut cursor = Cursor::new(input);
    let mut params = RouteParameters::default();

    if !cursor.eat(b'/') {
        return Err(cursor.pos);
    }
    params.service = cursor.take_while(is_name_byte).to_string();
    if params.service.is_empty() {
        return Err(cursor.pos);
    }

    if cursor.eat(b'/') {
        let format = cursor.take_while(is_name_byte).to_string();
        if format.is_empty() {
            return Err(cursor.pos);
        }
        params.output_format = Some(format);
    }

    if cursor.eat(b'?') {
        loop {
            let key_start = cursor.pos;
            let key = cursor.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
            if !cursor.eat(b'=') {
                return Err(cursor.pos);
            }
            match key {
                "coords" => {
                    let lat = parse_number(&mut cursor)?;
                    if !cursor.eat(b',') {
                        return Err(cursor.pos);
                    }
                    let lon = parse_number(&mut cursor)?;
                    params
                        .coordinates
                        .push(FixedPointCoordinate::from_degrees(lat, lon));
                }
                "instructions" => params.print_instructions = parse_bool(&mut cursor)?,
                "uturns" => params.uturns = parse_bool(&mut cursor)?,
                "jsonp" => {
                    let start = cursor.pos;
                    let ident = cursor.take_while(is_ident_byte);
                    if ident.is_empty() || ident.as_bytes()[0].is_ascii_digit() {
                        return Err(start);
                    }
                    params.jsonp_parameter = ident.to_string();
                }
                _ => return Err(key_start),
            }
            if !cursor.eat(b'&') {
                break;
            }
        }
    }

    if !cursor.at_end() {
        return Err(cursor.pos);
    }
    Ok(params)
}

fn parse_number(cursor: &mut Cursor) -> Result<f64, usize> {
    let start = cursor.pos;
    let text = cursor.take_while(is_number_byte);
    text.parse::<f64>().map_err(|_| start)
}

fn parse_bool(cursor: &mut Cursor) -> Result<bool, usize> {
    let start = cursor.pos;
    let text = cursor.take_while(|b| b.is_ascii_alphanumeric());
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_only() {
        let params = parse("/hello").unwrap();
        assert_eq!(params.service, "hello");
        assert!(params.output_format.is_none());
        assert!(params.coordinates.is_empty());
    }

    #[test]
    fn test_full_route_request() {
        let params =
            parse("/baseroute/gpx?coords=52.5,13.4&coords=52.6,13.5&instructions=true&uturns=false")
                .unwrap();
        assert_eq!(params.service, "baseroute");
        assert_eq!(params.output_format.as_deref(), Some("gpx"));
        assert_eq!(params.coordinates.len(), 2);
        assert_eq!(params.coordinates[0].lat, 52_500_000);
        assert_eq!(params.coordinates[1].lon, 13_500_000);
        assert!(params.print_instructions);
        assert!(!params.uturns);
    }

    #[test]
    fn test_jsonp_parameter() {
        let params = parse("/baseroute?coords=1,2&jsonp=my_callback").unwrap();
        assert_eq!(params.jsonp_parameter, "my_callback");
    }

    #[test]
    fn test_negative_coordinates() {
        let params = parse("/baseroute?coords=-33.86,151.21").unwrap();
        assert_eq!(params.coordinates[0].lat, -33_860_000);
    }

    #[test]
    fn test_malformed_coordinate_position() {
        // the 'a' of "abc" sits at byte 18
        let err = parse("/baseroute?coords=abc").unwrap_err();
        assert_eq!(err, 18);
    }

    #[test]
    fn test_unknown_key_position() {
        let err = parse("/baseroute?bogus=1").unwrap_err();
        assert_eq!(err, 11);
    }

    #[test]
    fn test_missing_service() {
        assert_eq!(parse("/").unwrap_err(), 1);
        assert_eq!(parse("").unwrap_err(), 0);
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let err = parse("/hello%").unwrap_err();
        assert_eq!(err, 6);
    }
}
