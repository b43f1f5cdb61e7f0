//! Address assignment for clients of the provisioning access point.

use core::net::Ipv4Addr;

use botion_core::net::dhcp::{DhcpPool, REPLY_SIZE, parse_request};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Ipv4Address, Stack};
use log::{debug, info, warn};

const DHCP_SERVER_PORT: u16 = 67;
const DHCP_CLIENT_PORT: u16 = 68;
/// Minimum datagram size every DHCP host must accept.
const MAX_PACKET_SIZE: usize = 576;

#[embassy_executor::task]
pub async fn dhcp_server_task(stack: Stack<'static>, server: Ipv4Addr) {
    let pool = DhcpPool::new(server);

    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; 1024];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; 1024];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(e) = socket.bind(DHCP_SERVER_PORT) {
        warn!("dhcp: bind to port {} failed: {:?}", DHCP_SERVER_PORT, e);
        return;
    }
    info!("dhcp: serving {} clients from {}", pool.host_count, server);

    let mut packet = [0u8; MAX_PACKET_SIZE];
    let mut reply = [0u8; REPLY_SIZE];
    loop {
        let len = match socket.recv_from(&mut packet).await {
            Ok((len, _remote)) => len,
            Err(e) => {
                warn!("dhcp: receive failed: {:?}", e);
                continue;
            }
        };

        let Some(request) = parse_request(&packet[..len]) else {
            debug!("dhcp: ignoring {} byte datagram", len);
            continue;
        };
        let Some(reply_len) = pool.write_reply(&request, &mut reply) else {
            debug!("dhcp: no reply to {:?}", request.message_type);
            continue;
        };
        debug!(
            "dhcp: {:?} from {:02x?} -> {}",
            request.message_type,
            request.client_mac,
            pool.allocate(&request.client_mac)
        );

        let destination = (Ipv4Address::BROADCAST, DHCP_CLIENT_PORT);
        if let Err(e) = socket.send_to(&reply[..reply_len], destination).await {
            warn!("dhcp: send failed: {:?}", e);
        }
    }
}
