#![no_std]
#![no_main]

use core::fmt::Write as _;

use botion_core::app::{CredentialGate, Presenter};
use botion_core::domain::entity::{Credentials, DeviceMode};
use botion_core::domain::ports::CredentialStore;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use heapless::String;
use log::{info, warn};

use botion_cube::config;
use botion_cube::controllers::{BoardPresenter, run_provisioning, run_task_display};
use botion_cube::infrastructure::adapters::open_button;
use botion_cube::infrastructure::drivers::{OledSurface, WifiLink, open_credential_store};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Allocate heap memory (64 + 32 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let software_interrupts = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, software_interrupts.software_interrupt0);

    // Without the display there is no way to report anything, so failing here halts.
    let i2c_config = I2cConfig::default()
        .with_frequency(Rate::from_khz(config::DISPLAY.i2c_frequency_khz));
    let i2c = I2c::new(peripherals.I2C0, i2c_config)
        .unwrap_or_else(|e| panic!("display: bad I2C config: {:?}", e))
        .with_sda(botion_cube::display_sda_gpio!(peripherals))
        .with_scl(botion_cube::display_scl_gpio!(peripherals));
    let surface = OledSurface::new(i2c, config::DISPLAY.i2c_address)
        .unwrap_or_else(|e| panic!("display: {:?}", e));
    let mut presenter = Presenter::new(surface);
    hold_status(&mut presenter, &["Display ready"]).await;

    let button = open_button(botion_cube::button_gpio!(peripherals));

    let mut store = open_credential_store(peripherals.FLASH)
        .inspect_err(|e| warn!("storage: cannot open credentials: {:?}", e))
        .ok();
    let credentials = match store.load_all() {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("storage: cannot read credentials: {:?}", e);
            hold_status(&mut presenter, &["Storage issue"]).await;
            Credentials::default()
        }
    };

    let link = WifiLink::new(spawner, peripherals.WIFI)
        .unwrap_or_else(|e| panic!("wifi: radio init failed: {:?}", e));
    let mut gate = CredentialGate::new(link, Delay, config::GATE);
    let decision = gate
        .decide(&credentials, config::PROVISIONING.ap_ssid)
        .await;
    let (link, _delay) = gate.into_parts();

    match decision.mode {
        DeviceMode::Normal => {
            info!("boot: normal mode");
            let station = link
                .into_station()
                .unwrap_or_else(|e| panic!("wifi: supervisor spawn failed: {:?}", e));
            run_task_display(station, presenter, button, &credentials).await
        }
        DeviceMode::Provisioning => {
            info!("boot: provisioning mode");
            let mut url: String<24> = String::new();
            if let Some(address) = decision.access_point {
                if write!(url, "http://{}", address).is_err() {
                    warn!("boot: portal address does not fit the screen line");
                }
            }
            if let Err(e) = presenter.show_status(&[
                "Connect to Wifi:",
                config::PROVISIONING.ap_ssid,
                "",
                "Then open in browser:",
                url.as_str(),
            ]) {
                warn!("display: {:?}", e);
            }

            let Some(stack) = link.access_point_stack() else {
                warn!("boot: access point is down, nothing to serve");
                loop {
                    Timer::after(Duration::from_secs(60)).await;
                }
            };
            run_provisioning(stack, store).await
        }
    }
}

async fn hold_status(presenter: &mut BoardPresenter, lines: &[&str]) {
    if let Err(e) = presenter.show_status(lines) {
        warn!("display: {:?}", e);
    }
    Timer::after(Duration::from_millis(config::DISPLAY.status_hold_ms)).await;
}
