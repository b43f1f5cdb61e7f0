use super::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => return None,
        })
    }
}

/// Request line and the headers the portal cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHead<'a> {
    pub method: HttpMethod,
    /// Path without the query string.
    pub path: &'a str,
    pub content_length: usize,
}

/// Position just past the blank line ending the head, if it is in `buf`.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

/// Parse the request head. `head` must not include body bytes.
pub fn parse_request_head(head: &[u8]) -> Result<RequestHead<'_>, Error> {
    let head = core::str::from_utf8(head).map_err(|_| Error::Parse)?;
    let mut lines = head.split("\r\n");

    let mut request_line = lines.next().ok_or(Error::Parse)?.split_whitespace();
    let method = request_line
        .next()
        .and_then(HttpMethod::parse)
        .ok_or(Error::Parse)?;
    let target = request_line.next().ok_or(Error::Parse)?;
    let path = target.split_once('?').map_or(target, |(path, _)| path);

    let mut content_length = 0;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            content_length = value.trim().parse().map_err(|_| Error::Parse)?;
        }
    }

    Ok(RequestHead {
        method,
        path,
        content_length,
    })
}
