//! Minimal HTTP/1.1 framing for the provisioning portal.

mod headers;
mod request;

pub use headers::{ContentHeaders, ContentType, ResponseHeaders, StatusCode, reason_phrase};
pub use request::{HttpMethod, RequestHead, find_head_end, parse_request_head};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The peer went away before a full request arrived.
    Closed,
    /// The request head is not valid HTTP.
    Parse,
    /// The request does not fit into the receive buffer.
    TooLarge,
    /// The response head does not fit into the send buffer.
    FormatHeaders,
}

impl From<core::fmt::Error> for Error {
    fn from(_error: core::fmt::Error) -> Self {
        Error::FormatHeaders
    }
}

/// A complete response ready to be written out, plus what to do afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: ContentType,
    pub body: &'static [u8],
    /// Restart the device once the reply has been sent.
    pub restart: bool,
}

impl Reply {
    pub const fn new(status: StatusCode, content_type: ContentType, body: &'static [u8]) -> Self {
        Self {
            status,
            content_type,
            body,
            restart: false,
        }
    }

    #[must_use]
    pub const fn then_restart(mut self) -> Self {
        self.restart = true;
        self
    }

    pub const fn headers(&self) -> ResponseHeaders {
        ResponseHeaders::from_code(self.status)
            .with_content(ContentHeaders::new(self.content_type).with_length(self.body.len()))
    }
}
