//! Host-testable core of the Botion Cube firmware.
//!
//! Everything that decides what the device does lives here: the boot gate,
//! the task client, the presenter, the orchestrator and the provisioning
//! form handler. Hardware is reached only through the traits in
//! [`domain::ports`], so the firmware crate supplies ESP32 drivers and the
//! tests supply fakes.
#![no_std]

pub mod app;
pub mod domain;
pub mod net;
pub mod notion;
pub mod storage;
