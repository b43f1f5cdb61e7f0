//! HTTPS transport for the Notion API over the station stack.

use core::fmt::Write as _;

use botion_core::domain::entity::CREDENTIAL_LEN;
use botion_core::domain::ports::{
    ApiMethod, ApiRequest, HttpTransport, PROTOCOL_VERSION, PROTOCOL_VERSION_HEADER,
    TransportError,
};
use embassy_net::Stack;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use heapless::String;
use log::{debug, warn};
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::headers::ContentType;
use reqwless::request::{Method, RequestBuilder};

use super::wifi::random_seed;
use crate::mk_static;

const TCP_BUFFER_SIZE: usize = 4096;
/// One full TLS record plus overhead.
const TLS_BUFFER_SIZE: usize = 16_640;
/// Query responses carry whole page objects.
const RESPONSE_BUFFER_SIZE: usize = 32_768;

type ClientState = TcpClientState<1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>;

pub struct HttpsTransport {
    stack: Stack<'static>,
    tcp_state: &'static ClientState,
    tls_read: &'static mut [u8; TLS_BUFFER_SIZE],
    tls_write: &'static mut [u8; TLS_BUFFER_SIZE],
    response: &'static mut [u8; RESPONSE_BUFFER_SIZE],
}

impl HttpsTransport {
    /// Must be called at most once; the buffers are statically allocated.
    pub fn new(stack: Stack<'static>) -> Self {
        Self {
            stack,
            tcp_state: mk_static!(ClientState, ClientState::new()),
            tls_read: mk_static!([u8; TLS_BUFFER_SIZE], [0; TLS_BUFFER_SIZE]),
            tls_write: mk_static!([u8; TLS_BUFFER_SIZE], [0; TLS_BUFFER_SIZE]),
            response: mk_static!([u8; RESPONSE_BUFFER_SIZE], [0; RESPONSE_BUFFER_SIZE]),
        }
    }
}

impl HttpTransport for HttpsTransport {
    async fn send<R>(
        &mut self,
        request: &ApiRequest<'_>,
        on_response: impl FnOnce(u16, &[u8]) -> R,
    ) -> Result<R, TransportError> {
        let tcp = TcpClient::new(self.stack, self.tcp_state);
        let dns = DnsSocket::new(self.stack);
        let tls = TlsConfig::new(
            random_seed(),
            &mut self.tls_read[..],
            &mut self.tls_write[..],
            // Certificate validation needs a trust store the device does not carry.
            TlsVerify::None,
        );
        let mut client = HttpClient::new_with_tls(&tcp, &dns, tls);

        let mut authorization: String<{ CREDENTIAL_LEN + 8 }> = String::new();
        write!(authorization, "Bearer {}", request.api_key)
            .map_err(|_| TransportError::Request)?;
        let headers = [
            ("Authorization", authorization.as_str()),
            (PROTOCOL_VERSION_HEADER, PROTOCOL_VERSION),
        ];
        let method = match request.method {
            ApiMethod::Post => Method::POST,
            ApiMethod::Patch => Method::PATCH,
        };

        debug!("https: {:?} {}", request.method, request.url);
        let mut handle = client
            .request(method, request.url)
            .await
            .map_err(transport_error)?
            .headers(&headers)
            .content_type(ContentType::ApplicationJson)
            .body(request.body);
        let response = handle
            .send(&mut self.response[..])
            .await
            .map_err(transport_error)?;

        let status = response.status.0;
        let body = response
            .body()
            .read_to_end()
            .await
            .map_err(transport_error)?;
        debug!("https: status {}, {} bytes", status, body.len());
        Ok(on_response(status, body))
    }
}

fn transport_error(error: reqwless::Error) -> TransportError {
    warn!("https: {:?}", error);
    match error {
        reqwless::Error::Dns => TransportError::Connect,
        reqwless::Error::Network(_) | reqwless::Error::ConnectionAborted => TransportError::Io,
        reqwless::Error::Tls(_) => TransportError::Tls,
        reqwless::Error::BufferTooSmall => TransportError::BufferTooSmall,
        reqwless::Error::InvalidUrl(_) | reqwless::Error::AlreadySent => TransportError::Request,
        _ => TransportError::Io,
    }
}
