//! Parse HTTP response header lines into a ResponseHead.

/// The parts of a response head the fetcher acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code from the status line, if one was seen.
    pub status: Option<u32>,
    /// Raw `Content-Type` value.
    pub content_type: Option<String>,
    /// `Content-Length`, if present and a valid integer.
    pub content_length: Option<u64>,
}

impl ResponseHead {
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}

/// True for a status line such as `HTTP/1.1 200 OK` or `HTTP/2 404`.
pub(crate) fn is_status_line(line: &str) -> bool {
    line.starts_with("HTTP/")
}

/// Parse collected header lines into a ResponseHead.
///
/// Expects lines of a single response; the caller resets its buffer on each
/// status line so that only the final response of a redirect chain is seen.
pub(crate) fn parse_head(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_status_line(line) {
            head.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse::<u32>().ok());
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                head.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                head.content_length = value.parse::<u64>().ok();
            }
        }
    }

    head
}
