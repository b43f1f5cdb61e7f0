use botion_core::app::{InputMonitor, Orchestrator, Presenter, TaskClient};
use botion_core::domain::entity::Credentials;
use embassy_net::Stack;
use embassy_time::Delay;
use esp_hal::gpio::Input;
use log::{info, warn};

use crate::config;
use crate::infrastructure::drivers::{HttpsTransport, OledSurface};

pub type BoardPresenter = Presenter<OledSurface>;

/// Normal mode: follow the task list until power-off.
pub async fn run_task_display(
    stack: Stack<'static>,
    mut presenter: BoardPresenter,
    button: Input<'static>,
    credentials: &Credentials,
) -> ! {
    let transport = HttpsTransport::new(stack);
    let client = match TaskClient::new(transport, credentials, config::TASK_CLIENT) {
        Ok(client) => client,
        Err(e) => {
            // The URL only overflows if the stored list id is corrupt.
            warn!("tasks: cannot build client: {:?}", e);
            if let Err(e) = presenter.show_status(&["List id invalid", "Reset to provision"]) {
                warn!("display: {:?}", e);
            }
            halt().await
        }
    };

    info!("tasks: following category {}", config::NOTION.category);
    Orchestrator::new(
        client,
        presenter,
        InputMonitor::new(button),
        Delay,
        config::ORCHESTRATOR,
    )
    .run()
    .await
}

async fn halt() -> ! {
    loop {
        embassy_time::Timer::after(embassy_time::Duration::from_secs(60)).await;
    }
}
