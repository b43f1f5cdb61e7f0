use core::net::Ipv4Addr;
use core::pin::pin;

use embassy_futures::select::{Either, select};
use embedded_hal_async::delay::DelayNs;
use log::{info, warn};

use crate::domain::entity::{Credentials, DeviceMode};
use crate::domain::ports::NetworkLink;

#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Longest wait for the station to come up.
    pub join_timeout_ms: u32,
    pub poll_interval_ms: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            join_timeout_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug)]
pub enum JoinError<E> {
    /// Network name or secret is empty.
    MissingCredentials,
    Link(E),
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootDecision {
    pub mode: DeviceMode,
    /// Device address on the provisioning network, when it came up.
    pub access_point: Option<Ipv4Addr>,
}

/// Decides once per boot between normal operation and provisioning.
pub struct CredentialGate<L: NetworkLink, D: DelayNs> {
    link: L,
    delay: D,
    config: GateConfig,
}

impl<L: NetworkLink, D: DelayNs> CredentialGate<L, D> {
    pub fn new(link: L, delay: D, config: GateConfig) -> Self {
        Self {
            link,
            delay,
            config,
        }
    }

    /// Try to join with `credentials`; on failure bring up the open network
    /// `access_point_name` and report provisioning mode.
    pub async fn decide(
        &mut self,
        credentials: &Credentials,
        access_point_name: &str,
    ) -> BootDecision {
        match self.join(credentials).await {
            Ok(()) => {
                info!("gate: joined {}", credentials.network_name);
                return BootDecision {
                    mode: DeviceMode::Normal,
                    access_point: None,
                };
            }
            Err(e) => warn!("gate: not joined: {:?}", e),
        }

        let access_point = match self.link.start_access_point(access_point_name).await {
            Ok(address) => {
                info!("gate: access point {} up at {}", access_point_name, address);
                Some(address)
            }
            Err(e) => {
                warn!("gate: access point failed: {:?}", e);
                None
            }
        };
        BootDecision {
            mode: DeviceMode::Provisioning,
            access_point,
        }
    }

    /// Bounded join: polls the link every `poll_interval_ms` until it is up
    /// or `join_timeout_ms` has passed. Time spent starting the attempt
    /// counts against the same bound.
    pub async fn join(&mut self, credentials: &Credentials) -> Result<(), JoinError<L::Error>> {
        if !credentials.has_network() {
            return Err(JoinError::MissingCredentials);
        }

        let mut waited_ms = 0;
        {
            let mut begin = pin!(
                self.link
                    .begin_join(&credentials.network_name, &credentials.network_secret)
            );
            loop {
                match select(begin.as_mut(), self.delay.delay_ms(self.config.poll_interval_ms))
                    .await
                {
                    Either::First(started) => {
                        started.map_err(JoinError::Link)?;
                        break;
                    }
                    Either::Second(()) => {
                        waited_ms += self.config.poll_interval_ms;
                        if waited_ms >= self.config.join_timeout_ms {
                            return Err(JoinError::Timeout);
                        }
                    }
                }
            }
        }

        loop {
            if self.link.is_joined() {
                return Ok(());
            }
            if waited_ms >= self.config.join_timeout_ms {
                return Err(JoinError::Timeout);
            }
            self.delay.delay_ms(self.config.poll_interval_ms).await;
            waited_ms += self.config.poll_interval_ms;
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn into_parts(self) -> (L, D) {
        (self.link, self.delay)
    }
}
