use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{WifiController, WifiDevice, WifiEvent, WifiStaState};
use log::{info, warn};

/// Keeps the station associated after boot.
///
/// The controller arrives already configured and started by the boot gate,
/// so the task only waits for a drop and reconnects.
#[embassy_executor::task]
pub async fn wifi_supervisor_task(mut controller: WifiController<'static>) {
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("wifi: link lost");
            Timer::after(Duration::from_millis(2000)).await;
        }
        if !matches!(controller.is_started(), Ok(true)) {
            if let Err(e) = controller.start_async().await {
                warn!("wifi: start failed: {:?}", e);
                Timer::after(Duration::from_millis(5000)).await;
                continue;
            }
        }

        info!("wifi: reconnecting");
        if let Err(e) = controller.connect_async().await {
            warn!("wifi: reconnect failed: {:?}", e);
            Timer::after(Duration::from_millis(5000)).await;
        }
    }
}

/// Drives one network stack. One instance per interface.
#[embassy_executor::task(pool_size = 2)]
pub async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
