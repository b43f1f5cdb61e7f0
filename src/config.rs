#![allow(clippy::unreadable_literal)]

use core::net::Ipv4Addr;

use botion_core::app::{GateConfig, OrchestratorConfig, TaskClientConfig};
use botion_core::notion::API_BASE_URL;

pub struct DeviceConfig {
    pub hostname: &'static str,
}

pub struct NotionConfig {
    pub base_url: &'static str,
    /// Multi-select value the device follows.
    pub category: &'static str,
}

pub struct ProvisioningConfig {
    pub ap_ssid: &'static str,
    pub address: Ipv4Addr,
    pub prefix_len: u8,
    pub http_port: u16,
    pub restart_delay_ms: u64,
}

pub struct DisplayConfig {
    pub i2c_address: u8,
    pub i2c_frequency_khz: u32,
    /// How long boot status screens stay up.
    pub status_hold_ms: u64,
}

pub const DEVICE: DeviceConfig = DeviceConfig {
    hostname: "botion-cube",
};

pub const NOTION: NotionConfig = NotionConfig {
    base_url: API_BASE_URL,
    category: match option_env!("BOTION_CATEGORY") {
        Some(category) => category,
        None => "Club",
    },
};

pub const PROVISIONING: ProvisioningConfig = ProvisioningConfig {
    ap_ssid: match option_env!("BOTION_AP_SSID") {
        Some(ssid) => ssid,
        None => "BOTION CUBE",
    },
    address: Ipv4Addr::new(192, 168, 4, 1),
    prefix_len: 24,
    http_port: 80,
    restart_delay_ms: 3000,
};

pub const DISPLAY: DisplayConfig = DisplayConfig {
    i2c_address: 0x3C,
    i2c_frequency_khz: 400,
    status_hold_ms: 1000,
};

pub const GATE: GateConfig = GateConfig {
    join_timeout_ms: 10_000,
    poll_interval_ms: 100,
};

pub const ORCHESTRATOR: OrchestratorConfig = OrchestratorConfig {
    tick_delay_ms: 1000,
    scroll_step_px: 4,
    scroll_step_delay_ms: 100,
    completion_step_px: 4,
    completion_step_delay_ms: 25,
    poll_interval_ticks: 30,
};

pub const TASK_CLIENT: TaskClientConfig = TaskClientConfig {
    base_url: NOTION.base_url,
    category: NOTION.category,
};

/// Push button, active low.
#[macro_export]
macro_rules! button_gpio {
    ($p:expr) => {
        $p.GPIO2
    };
}

#[macro_export]
macro_rules! display_sda_gpio {
    ($p:expr) => {
        $p.GPIO5
    };
}

#[macro_export]
macro_rules! display_scl_gpio {
    ($p:expr) => {
        $p.GPIO6
    };
}
