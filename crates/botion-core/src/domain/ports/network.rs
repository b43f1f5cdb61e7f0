use core::fmt::Debug;
use core::net::Ipv4Addr;

/// The radio link, as seen by the boot gate.
#[allow(async_fn_in_trait)]
pub trait NetworkLink {
    type Error: Debug;

    /// Start joining the named network. Returns once the attempt is under way
    /// or has failed outright; association and addressing are observed
    /// through [`NetworkLink::is_joined`]. Time spent here counts against the
    /// caller's join bound.
    async fn begin_join(&mut self, name: &str, secret: &str) -> Result<(), Self::Error>;

    /// Whether the station is associated and has an address.
    fn is_joined(&mut self) -> bool;

    /// Broadcast an open network named `name` and return the device address on it.
    async fn start_access_point(&mut self, name: &str) -> Result<Ipv4Addr, Self::Error>;
}
