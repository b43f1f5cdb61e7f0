//! Configuration form served by the device in provisioning mode.
#![no_std]

/// The form posts `ssid`, `pass`, `api_key` and `database_id` to `/`.
pub const PORTAL_PAGE_HTML: &str = include_str!("../index.html");
