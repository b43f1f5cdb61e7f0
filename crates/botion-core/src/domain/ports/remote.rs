/// Version header value the Notion API is pinned to.
pub const PROTOCOL_VERSION: &str = "2022-06-28";
pub const PROTOCOL_VERSION_HEADER: &str = "Notion-Version";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Post,
    Patch,
}

/// A JSON request to the remote store.
///
/// Transports send `Authorization: Bearer <api_key>`, the protocol version
/// header and `Content-Type: application/json` with every request.
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    pub method: ApiMethod,
    pub url: &'a str,
    pub api_key: &'a str,
    pub body: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Name resolution or TCP connect failed.
    Connect,
    /// TLS handshake failed.
    Tls,
    /// The exchange broke off midway.
    Io,
    /// The response did not fit into the receive buffer.
    BufferTooSmall,
    /// The request could not be assembled.
    Request,
}

/// HTTPS request/response exchange.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// Send `request` and hand the status code and the complete body to
    /// `on_response`. Non-2xx statuses are not errors at this level.
    async fn send<R>(
        &mut self,
        request: &ApiRequest<'_>,
        on_response: impl FnOnce(u16, &[u8]) -> R,
    ) -> Result<R, TransportError>;
}
