use core::fmt::Write;

pub type StatusCode = u16;

pub fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Request Entity Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    TextHtml,
    TextPlain,
}

impl ContentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ContentType::TextHtml => "text/html",
            ContentType::TextPlain => "text/plain",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContentHeaders {
    content_type: ContentType,
    content_length: Option<usize>,
}

impl ContentHeaders {
    pub const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            content_length: None,
        }
    }

    #[must_use]
    pub const fn with_length(mut self, length: usize) -> Self {
        self.content_length = Some(length);
        self
    }

    fn write_to(&self, writer: &mut impl Write) -> core::fmt::Result {
        write!(writer, "Content-Type: {}; charset=utf-8\r\n", self.content_type.as_str())?;
        if let Some(length) = self.content_length {
            write!(writer, "Content-Length: {}\r\n", length)?;
        }
        Ok(())
    }
}

/// Status line and headers of a response. Connections are always closed
/// after one exchange.
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeaders {
    status: StatusCode,
    content: Option<ContentHeaders>,
}

impl ResponseHeaders {
    pub const fn from_code(status: StatusCode) -> Self {
        Self {
            status,
            content: None,
        }
    }

    #[must_use]
    pub const fn with_content(mut self, content: ContentHeaders) -> Self {
        self.content = Some(content);
        self
    }

    pub fn write_to(&self, writer: &mut impl Write) -> core::fmt::Result {
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status))?;
        if let Some(content) = &self.content {
            content.write_to(writer)?;
        }
        writer.write_str("Connection: close\r\n\r\n")
    }
}
