mod dhcp_server;
mod network;

pub use dhcp_server::dhcp_server_task;
pub use network::{network_runner_task, wifi_supervisor_task};
