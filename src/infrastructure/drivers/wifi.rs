//! Wi-Fi radio: station join for the boot gate, access point for provisioning.

use core::net::Ipv4Addr;
use core::str::FromStr;

use botion_core::domain::ports::NetworkLink;
use embassy_executor::Spawner;
use embassy_net::{DhcpConfig, Ipv4Cidr, Stack, StackResources, StaticConfigV4};
use embassy_time::{Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{
    AccessPointConfig, AuthMethod, ClientConfig, Config as RadioConfig, ModeConfig,
    WifiController, WifiDevice, WifiError, WifiStaState,
};
use heapless::String;
use log::{info, warn};

use crate::config;
use crate::infrastructure::tasks::{dhcp_server_task, network_runner_task, wifi_supervisor_task};
use crate::mk_static;

const MAX_CONNECTIONS: usize = 6;
const AP_CONNECTIONS: usize = 4;

#[derive(Debug)]
pub enum LinkError {
    Init(esp_radio::InitializationError),
    Wifi(WifiError),
    /// The access point interface was already handed out.
    AccessPointTaken,
    Spawn,
}

impl From<WifiError> for LinkError {
    fn from(error: WifiError) -> Self {
        LinkError::Wifi(error)
    }
}

impl From<embassy_executor::SpawnError> for LinkError {
    fn from(_error: embassy_executor::SpawnError) -> Self {
        LinkError::Spawn
    }
}

/// Owns the radio until the boot gate has decided.
pub struct WifiLink {
    spawner: Spawner,
    controller: WifiController<'static>,
    station: Stack<'static>,
    access_point: Option<WifiDevice<'static>>,
    access_point_stack: Option<Stack<'static>>,
}

impl WifiLink {
    /// Bring up the radio and the station network stack.
    pub fn new(spawner: Spawner, wifi: WIFI<'static>) -> Result<Self, LinkError> {
        let radio = esp_radio::init().map_err(LinkError::Init)?;
        let radio = mk_static!(esp_radio::Controller<'static>, radio);
        let (controller, interfaces) = esp_radio::wifi::new(radio, wifi, RadioConfig::default())?;

        let mut dhcp_config = DhcpConfig::default();
        dhcp_config.hostname = String::from_str(config::DEVICE.hostname).ok();
        let resources = mk_static!(
            StackResources<MAX_CONNECTIONS>,
            StackResources::<MAX_CONNECTIONS>::new()
        );
        let (station, runner) = embassy_net::new(
            interfaces.sta,
            embassy_net::Config::dhcpv4(dhcp_config),
            resources,
            random_seed(),
        );
        spawner.spawn(network_runner_task(runner))?;

        Ok(Self {
            spawner,
            controller,
            station,
            access_point: Some(interfaces.ap),
            access_point_stack: None,
        })
    }

    /// Hand the controller to the reconnect task and keep the station stack.
    pub fn into_station(self) -> Result<Stack<'static>, LinkError> {
        self.spawner.spawn(wifi_supervisor_task(self.controller))?;
        Ok(self.station)
    }

    /// Network stack of the provisioning access point, once it is up.
    pub fn access_point_stack(&self) -> Option<Stack<'static>> {
        self.access_point_stack
    }
}

impl NetworkLink for WifiLink {
    type Error = LinkError;

    async fn begin_join(&mut self, name: &str, secret: &str) -> Result<(), LinkError> {
        let client = ClientConfig::default()
            .with_ssid(name.into())
            .with_password(secret.into());
        self.controller.set_config(&ModeConfig::Client(client))?;
        if !matches!(self.controller.is_started(), Ok(true)) {
            self.controller.start_async().await?;
        }

        // Association and DHCP are observed through `is_joined`.
        info!("wifi: connecting to {}", name);
        self.controller.connect()?;
        Ok(())
    }

    fn is_joined(&mut self) -> bool {
        esp_radio::wifi::sta_state() == WifiStaState::Connected
            && self.station.config_v4().is_some()
    }

    async fn start_access_point(&mut self, name: &str) -> Result<Ipv4Addr, LinkError> {
        let device = self.access_point.take().ok_or(LinkError::AccessPointTaken)?;
        if matches!(self.controller.is_started(), Ok(true)) {
            if let Err(e) = self.controller.stop_async().await {
                warn!("wifi: could not stop station: {:?}", e);
            }
        }

        let access_point = AccessPointConfig::default()
            .with_ssid(name.into())
            .with_auth_method(AuthMethod::None);
        self.controller
            .set_config(&ModeConfig::AccessPoint(access_point))?;
        self.controller.start_async().await?;

        let address = config::PROVISIONING.address;
        let static_config = StaticConfigV4 {
            address: Ipv4Cidr::new(address, config::PROVISIONING.prefix_len),
            gateway: Some(address),
            dns_servers: heapless::Vec::default(),
        };
        let resources = mk_static!(
            StackResources<AP_CONNECTIONS>,
            StackResources::<AP_CONNECTIONS>::new()
        );
        let (stack, runner) = embassy_net::new(
            device,
            embassy_net::Config::ipv4_static(static_config),
            resources,
            random_seed(),
        );
        self.spawner.spawn(network_runner_task(runner))?;

        while !stack.is_link_up() {
            Timer::after(Duration::from_millis(100)).await;
        }
        self.spawner.spawn(dhcp_server_task(stack, address))?;
        self.access_point_stack = Some(stack);

        Ok(address)
    }
}

/// 64 bits from the hardware RNG, for stack and TLS seeds.
pub(crate) fn random_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}
