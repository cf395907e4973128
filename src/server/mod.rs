use std::io::{Read, Write};
use std::net::TcpListener;

use crate::config::AppConfig;
use crate::data::data_registry::DataRegistry;
use crate::error::DataError;

pub mod api;
pub mod routes;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load data: {0}")]
    Data(#[from] DataError),

    #[error("failed to bind: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the registry once and serve requests sequentially until the listener fails.
pub fn run_server(config: &AppConfig) -> Result<(), ServerError> {
    let registry = DataRegistry::load(config)?;
    let listener = TcpListener::bind(&config.bind_addr)?;
    tracing::info!(addr = %config.bind_addr, "illuvilytics server listening on http://{}", config.bind_addr);

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, &registry) {
                    tracing::warn!(error = %err, "request error");
                }
            }
            Err(err) => tracing::warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

/// Upper bound on header plus body bytes accepted from one request.
const MAX_REQUEST_BYTES: usize = 1 << 20;

#[derive(Debug, PartialEq, Eq)]
struct RawRequest {
    method: String,
    path: String,
    body: String,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Header length and body offset, once the blank line has arrived.
fn header_end(buffer: &[u8]) -> Option<(usize, usize)> {
    if let Some(at) = find(buffer, b"\r\n\r\n") {
        return Some((at, at + 4));
    }
    find(buffer, b"\n\n").map(|at| (at, at + 2))
}

fn header<'a>(headers: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, value)| value)
}

fn too_large() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, "request exceeds size limit")
}

/// Reads one request: headers up to the blank line, then `Content-Length`
/// bytes of body, however many segments they arrive in. Without a
/// `Content-Length` the body is whatever arrived with the headers.
fn read_request<S: Read + Write>(stream: &mut S) -> std::io::Result<Option<RawRequest>> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 16_384];

    let (head_len, body_start) = loop {
        if let Some(split) = header_end(&buffer) {
            break split;
        }
        let bytes_read = stream.read(&mut chunk)?;
        if bytes_read == 0 {
            if buffer.is_empty() {
                return Ok(None);
            }
            break (buffer.len(), buffer.len());
        }
        buffer.extend_from_slice(&chunk[..bytes_read]);
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(too_large());
        }
    };

    let head = String::from_utf8_lossy(&buffer[..head_len]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();
    let headers: Vec<(&str, &str)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect();

    let content_length = match header(&headers, "content-length") {
        Some(value) => value.parse::<usize>().unwrap_or(0),
        None => buffer.len() - body_start,
    };
    if content_length > MAX_REQUEST_BYTES {
        return Err(too_large());
    }
    let body_end = body_start + content_length;

    let expects_continue =
        header(&headers, "expect").is_some_and(|value| value.eq_ignore_ascii_case("100-continue"));
    if expects_continue && buffer.len() < body_end {
        stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n")?;
        stream.flush()?;
    }

    while buffer.len() < body_end {
        let bytes_read = stream.read(&mut chunk)?;
        if bytes_read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..bytes_read]);
    }

    let body_end = body_end.min(buffer.len());
    let body = String::from_utf8_lossy(&buffer[body_start..body_end]).into_owned();
    Ok(Some(RawRequest { method, path, body }))
}

fn handle_connection<S: Read + Write>(stream: &mut S, registry: &DataRegistry) -> std::io::Result<()> {
    let Some(request) = read_request(stream)? else {
        return Ok(());
    };

    let response = routes::route_request(&request.method, &request.path, &request.body, registry);
    tracing::debug!(
        method = %request.method,
        path = %request.path,
        status = response.status_code,
        "handled request"
    );
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Delivers one scripted segment per `read` and records what is written.
    #[derive(Default)]
    struct SegmentedStream {
        segments: VecDeque<Vec<u8>>,
        written: Vec<u8>,
    }

    impl SegmentedStream {
        fn new(segments: &[&str]) -> Self {
            Self {
                segments: segments.iter().map(|s| s.as_bytes().to_vec()).collect(),
                written: Vec::new(),
            }
        }
    }

    impl Read for SegmentedStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let Some(mut segment) = self.segments.pop_front() else {
                return Ok(0);
            };
            let n = segment.len().min(buf.len());
            buf[..n].copy_from_slice(&segment[..n]);
            if n < segment.len() {
                self.segments.push_front(segment.split_off(n));
            }
            Ok(n)
        }
    }

    impl Write for SegmentedStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn body_in_a_later_segment_is_read_to_content_length() {
        let body = r#"{"team":["a","b"]}"#;
        let head = format!(
            "POST /api/breakdown HTTP/1.1\r\nHost: x\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        let mut stream = SegmentedStream::new(&[head.as_str(), &body[..5], &body[5..]]);
        let request = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/breakdown");
        assert_eq!(request.body, body);
        assert!(stream.written.is_empty());
    }

    #[test]
    fn expect_continue_gets_an_interim_response_before_the_body() {
        let body = r#"{"team":[],"id":"a"}"#;
        let head = format!(
            "POST /api/team/add HTTP/1.1\r\nexpect: 100-continue\r\ncontent-length: {}\r\n\r\n",
            body.len()
        );
        let mut stream = SegmentedStream::new(&[head.as_str(), body]);
        let request = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(request.body, body);
        assert_eq!(stream.written, b"HTTP/1.1 100 Continue\r\n\r\n");
    }

    #[test]
    fn headers_split_across_segments_and_no_length_means_buffered_body() {
        let mut stream = SegmentedStream::new(&["GET /api/hea", "lth HTTP/1.1\r\n\r\n"]);
        let request = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(request.path, "/api/health");
        assert_eq!(request.body, "");
    }

    #[test]
    fn body_is_truncated_to_content_length() {
        let mut stream = SegmentedStream::new(&["POST /x HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}trailing"]);
        let request = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(request.body, "{}");
    }

    #[test]
    fn closed_connection_yields_no_request() {
        let mut stream = SegmentedStream::default();
        assert_eq!(read_request(&mut stream).unwrap(), None);
    }

    #[test]
    fn oversized_content_length_is_rejected() {
        let head = format!("POST /x HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_REQUEST_BYTES + 1);
        let mut stream = SegmentedStream::new(&[head.as_str()]);
        assert!(read_request(&mut stream).is_err());
    }
}
