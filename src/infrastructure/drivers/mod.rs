mod display;
mod flash_storage;
mod https_client;
mod wifi;

pub use display::{DisplayFault, OledSurface};
pub use flash_storage::{EspCredentialStore, open_credential_store};
pub use https_client::HttpsTransport;
pub use wifi::{LinkError, WifiLink};
