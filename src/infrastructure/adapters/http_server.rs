//! One-connection-at-a-time HTTP server for the provisioning portal.
//!
//! Each connection carries exactly one request. The response is written with
//! `Connection: close` and the socket is shut down afterwards.

use core::fmt::Write as _;

use botion_core::net::http::{
    ContentType, Error, Reply, RequestHead, find_head_end, parse_request_head,
};
use embassy_net::Stack;
use embassy_net::tcp::TcpSocket;
use embassy_time::Duration;
use embedded_io_async::Write as _;
use heapless::String;
use log::{debug, warn};

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 4096;
/// Largest request head plus body the server accepts.
const REQUEST_BUFFER_SIZE: usize = 4096;
const HEADER_BUFFER_SIZE: usize = 160;

pub trait HttpHandler {
    fn handle(&mut self, head: &RequestHead<'_>, body: &[u8]) -> Reply;
}

/// Serve requests on `port` until a reply asks for a restart.
///
/// This allocates roughly 10KB of buffers on the caller's stack.
pub async fn run_http_server<H: HttpHandler>(stack: Stack<'static>, port: u16, handler: &mut H) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let mut request = [0u8; REQUEST_BUFFER_SIZE];

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(30)));
        if let Err(e) = socket.accept(port).await {
            warn!("http_server: accept failed: {:?}", e);
            continue;
        }

        let reply = match read_request(&mut socket, &mut request, handler).await {
            Ok(reply) => Some(reply),
            Err(Error::TooLarge) => Some(Reply::new(
                413,
                ContentType::TextPlain,
                b"Payload too large",
            )),
            Err(Error::Parse) => Some(Reply::new(400, ContentType::TextPlain, b"Bad request")),
            Err(e) => {
                debug!("http_server: dropped connection: {:?}", e);
                None
            }
        };

        let restart = reply.is_some_and(|reply| reply.restart);
        if let Some(reply) = reply {
            if let Err(e) = write_reply(&mut socket, &reply).await {
                warn!("http_server: could not send reply: {:?}", e);
            }
        }
        socket.close();
        // Let the FIN go out before the buffers are reused.
        let _ = socket.flush().await;

        if restart {
            return;
        }
    }
}

async fn read_request<H: HttpHandler>(
    socket: &mut TcpSocket<'_>,
    buf: &mut [u8],
    handler: &mut H,
) -> Result<Reply, Error> {
    let mut filled = 0;
    let head_end = loop {
        if let Some(end) = find_head_end(&buf[..filled]) {
            break end;
        }
        if filled == buf.len() {
            return Err(Error::TooLarge);
        }
        filled += read_some(socket, &mut buf[filled..]).await?;
    };

    let (head_bytes, rest) = buf.split_at_mut(head_end);
    let head = parse_request_head(head_bytes)?;
    let body_len = head.content_length;
    if body_len > rest.len() {
        return Err(Error::TooLarge);
    }

    let mut received = (filled - head_end).min(body_len);
    while received < body_len {
        received += read_some(socket, &mut rest[received..body_len]).await?;
    }

    debug!("http_server: {:?} {} ({} bytes)", head.method, head.path, body_len);
    Ok(handler.handle(&head, &rest[..body_len]))
}

async fn read_some(socket: &mut TcpSocket<'_>, buf: &mut [u8]) -> Result<usize, Error> {
    match socket.read(buf).await {
        Ok(0) | Err(_) => Err(Error::Closed),
        Ok(n) => Ok(n),
    }
}

async fn write_reply(socket: &mut TcpSocket<'_>, reply: &Reply) -> Result<(), Error> {
    let mut head: String<HEADER_BUFFER_SIZE> = String::new();
    reply.headers().write_to(&mut head)?;

    socket
        .write_all(head.as_bytes())
        .await
        .map_err(|_| Error::Closed)?;
    socket
        .write_all(reply.body)
        .await
        .map_err(|_| Error::Closed)?;
    socket.flush().await.map_err(|_| Error::Closed)
}
