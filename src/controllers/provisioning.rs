use botion_core::app::ProvisioningController;
use botion_core::domain::ports::CredentialStore;
use botion_core::net::http::{Reply, RequestHead};
use botion_portal_page::PORTAL_PAGE_HTML;
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use log::info;

use crate::config;
use crate::infrastructure::adapters::{HttpHandler, run_http_server};

impl<S: CredentialStore> HttpHandler for ProvisioningController<S> {
    fn handle(&mut self, head: &RequestHead<'_>, body: &[u8]) -> Reply {
        ProvisioningController::handle(self, head.method, head.path, body)
    }
}

/// Serve the configuration form on the access point until credentials are
/// stored, then restart into normal mode.
pub async fn run_provisioning<S: CredentialStore>(stack: Stack<'static>, store: S) -> ! {
    let mut portal = ProvisioningController::new(store, PORTAL_PAGE_HTML);
    info!(
        "provisioning: portal on port {}",
        config::PROVISIONING.http_port
    );
    run_http_server(stack, config::PROVISIONING.http_port, &mut portal).await;

    info!(
        "provisioning: restarting in {} ms",
        config::PROVISIONING.restart_delay_ms
    );
    Timer::after(Duration::from_millis(config::PROVISIONING.restart_delay_ms)).await;
    esp_hal::system::software_reset()
}
