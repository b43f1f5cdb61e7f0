//! Seams between the core and the hardware.

mod display;
mod network;
mod remote;
mod storage;

pub use display::{DisplaySurface, Ink, TextSize};
pub use network::NetworkLink;
pub use remote::{
    ApiMethod, ApiRequest, HttpTransport, PROTOCOL_VERSION, PROTOCOL_VERSION_HEADER,
    TransportError,
};
pub use storage::{CredentialStore, StorageError};
