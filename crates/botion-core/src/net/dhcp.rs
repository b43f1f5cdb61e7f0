//! Stateless DHCP responder for the provisioning access point.
//!
//! Every client gets an address derived from its MAC, so no lease table is
//! kept. Only DISCOVER and REQUEST are answered.

use core::net::Ipv4Addr;

const BOOTREQUEST: u8 = 1;
const BOOTREPLY: u8 = 2;
const HTYPE_ETHERNET: u8 = 1;
const HLEN_ETHERNET: u8 = 6;
const BROADCAST_FLAG: [u8; 2] = [0x80, 0x00];
const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

const OPTIONS_OFFSET: usize = 240;

/// Space needed for a reply: fixed header plus the options written here.
pub const REPLY_SIZE: usize = OPTIONS_OFFSET + 3 + 5 * 6 + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum OptionCode {
    Pad = 0,
    SubnetMask = 1,
    Router = 3,
    DomainServer = 6,
    LeaseTime = 51,
    MessageType = 53,
    ServerId = 54,
    End = 255,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Discover,
    Offer,
    Request,
    Ack,
    Other(u8),
}

impl MessageType {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Discover,
            2 => Self::Offer,
            3 => Self::Request,
            5 => Self::Ack,
            other => Self::Other(other),
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            Self::Discover => 1,
            Self::Offer => 2,
            Self::Request => 3,
            Self::Ack => 5,
            Self::Other(other) => other,
        }
    }

    /// Message type a server sends back, if any.
    pub fn reply(self) -> Option<Self> {
        match self {
            Self::Discover => Some(Self::Offer),
            Self::Request => Some(Self::Ack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpRequest {
    pub xid: [u8; 4],
    pub client_mac: [u8; 6],
    pub message_type: MessageType,
}

/// Parse a client message. Anything that is not a well-formed BOOTREQUEST
/// with a message type option yields `None`.
pub fn parse_request(packet: &[u8]) -> Option<DhcpRequest> {
    if packet.len() < OPTIONS_OFFSET
        || packet[0] != BOOTREQUEST
        || packet[236..OPTIONS_OFFSET] != MAGIC_COOKIE
    {
        return None;
    }

    let message_type = find_option(&packet[OPTIONS_OFFSET..], OptionCode::MessageType)
        .and_then(|data| data.first().copied())
        .map(MessageType::from_u8)?;

    let mut xid = [0u8; 4];
    xid.copy_from_slice(&packet[4..8]);
    let mut client_mac = [0u8; 6];
    client_mac.copy_from_slice(&packet[28..34]);

    Some(DhcpRequest {
        xid,
        client_mac,
        message_type,
    })
}

fn find_option(mut options: &[u8], wanted: OptionCode) -> Option<&[u8]> {
    while let Some((&code, rest)) = options.split_first() {
        if code == OptionCode::End as u8 {
            return None;
        }
        if code == OptionCode::Pad as u8 {
            options = rest;
            continue;
        }
        let (&len, rest) = rest.split_first()?;
        let value = rest.get(..usize::from(len))?;
        if code == wanted as u8 {
            return Some(value);
        }
        options = &rest[usize::from(len)..];
    }
    None
}

/// Address plan of the access point network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpPool {
    /// Device address; also handed out as router and DNS server.
    pub server: Ipv4Addr,
    pub netmask: Ipv4Addr,
    /// Last octet of the first client address.
    pub first_host: u8,
    pub host_count: u8,
    pub lease_secs: u32,
}

impl DhcpPool {
    pub const fn new(server: Ipv4Addr) -> Self {
        Self {
            server,
            netmask: Ipv4Addr::new(255, 255, 255, 0),
            first_host: 2,
            host_count: 49,
            lease_secs: 3600,
        }
    }

    /// Client address, stable for a given MAC.
    pub fn allocate(&self, mac: &[u8; 6]) -> Ipv4Addr {
        let [a, b, c, _] = self.server.octets();
        let host = self.first_host + mac[5] % self.host_count.max(1);
        Ipv4Addr::new(a, b, c, host)
    }

    /// Write the reply to `request` into `buf` and return its length.
    /// Returns `None` for message types that get no answer, or when `buf`
    /// is shorter than [`REPLY_SIZE`].
    pub fn write_reply(&self, request: &DhcpRequest, buf: &mut [u8]) -> Option<usize> {
        let reply_type = request.message_type.reply()?;
        let buf = buf.get_mut(..REPLY_SIZE)?;
        buf.fill(0);

        buf[..4].copy_from_slice(&[BOOTREPLY, HTYPE_ETHERNET, HLEN_ETHERNET, 0]);
        buf[4..8].copy_from_slice(&request.xid);
        buf[10..12].copy_from_slice(&BROADCAST_FLAG);
        buf[16..20].copy_from_slice(&self.allocate(&request.client_mac).octets());
        buf[20..24].copy_from_slice(&self.server.octets());
        buf[28..34].copy_from_slice(&request.client_mac);
        buf[236..OPTIONS_OFFSET].copy_from_slice(&MAGIC_COOKIE);

        let server = self.server.octets();
        let mut options = OptionWriter {
            buf: &mut buf[OPTIONS_OFFSET..],
            len: 0,
        };
        options.put(OptionCode::MessageType, &[reply_type.as_u8()]);
        options.put(OptionCode::ServerId, &server);
        options.put(OptionCode::LeaseTime, &self.lease_secs.to_be_bytes());
        options.put(OptionCode::SubnetMask, &self.netmask.octets());
        options.put(OptionCode::Router, &server);
        options.put(OptionCode::DomainServer, &server);
        let len = options.finish();

        Some(OPTIONS_OFFSET + len)
    }
}

struct OptionWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl OptionWriter<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn put(&mut self, code: OptionCode, value: &[u8]) {
        let start = self.len;
        self.buf[start] = code as u8;
        self.buf[start + 1] = value.len() as u8;
        self.buf[start + 2..start + 2 + value.len()].copy_from_slice(value);
        self.len += 2 + value.len();
    }

    fn finish(self) -> usize {
        self.buf[self.len] = OptionCode::End as u8;
        self.len + 1
    }
}
