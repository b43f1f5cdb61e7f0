use log::{info, warn};

use crate::domain::entity::{CREDENTIAL_LEN, CredentialSlot, CredentialValue};
use crate::domain::ports::{CredentialStore, StorageError};
use crate::net::form::{FormError, FormFields, decode_component};
use crate::net::http::{ContentType, HttpMethod, Reply};

pub const SUCCESS_MESSAGE: &str = "Success. Device will now restart.";

const FIELD_NAME_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    Form(FormError),
    Storage(StorageError),
}

impl From<FormError> for SubmitError {
    fn from(error: FormError) -> Self {
        SubmitError::Form(error)
    }
}

impl From<StorageError> for SubmitError {
    fn from(error: StorageError) -> Self {
        SubmitError::Storage(error)
    }
}

/// Serves the configuration form and stores what it submits.
pub struct ProvisioningController<S: CredentialStore> {
    store: S,
    page: &'static str,
}

impl<S: CredentialStore> ProvisioningController<S> {
    pub fn new(store: S, page: &'static str) -> Self {
        Self { store, page }
    }

    pub fn handle(&mut self, method: HttpMethod, path: &str, body: &[u8]) -> Reply {
        match (method, path) {
            (HttpMethod::Get, "/") => {
                Reply::new(200, ContentType::TextHtml, self.page.as_bytes())
            }
            (HttpMethod::Post, "/") => self.submit(body),
            _ => {
                info!("provisioning: no route for {:?} {}", method, path);
                Reply::new(404, ContentType::TextPlain, b"Not found")
            }
        }
    }

    fn submit(&mut self, body: &[u8]) -> Reply {
        match self.persist(body) {
            Ok(stored) => {
                info!("provisioning: stored {} field(s), restarting", stored);
                Reply::new(200, ContentType::TextPlain, SUCCESS_MESSAGE.as_bytes()).then_restart()
            }
            Err(SubmitError::Form(e)) => {
                warn!("provisioning: rejected form: {:?}", e);
                Reply::new(400, ContentType::TextPlain, b"Bad request")
            }
            Err(SubmitError::Storage(e)) => {
                warn!("provisioning: could not store form: {:?}", e);
                Reply::new(500, ContentType::TextPlain, b"Storage error")
            }
        }
    }

    /// Write every non-empty recognised field to its slot. Returns how many
    /// slots were written. Nothing is written if any field fails to decode.
    pub fn persist(&mut self, body: &[u8]) -> Result<usize, SubmitError> {
        let form = core::str::from_utf8(body).map_err(|_| FormError::Encoding)?;

        let mut pending: [Option<CredentialValue>; CredentialSlot::ALL.len()] = Default::default();
        for (raw_name, raw_value) in FormFields::new(form) {
            let Ok(name) = decode_component::<FIELD_NAME_LEN>(raw_name) else {
                continue;
            };
            let Some(slot) = CredentialSlot::from_field_name(&name) else {
                continue;
            };
            let value = decode_component::<CREDENTIAL_LEN>(raw_value)?;
            if value.is_empty() {
                continue;
            }
            if slot.is_secret() {
                info!("provisioning: received {}", slot.field_name());
            } else {
                info!("provisioning: received {} = {}", slot.field_name(), value);
            }
            pending[slot.index()] = Some(value);
        }

        let mut stored = 0;
        for slot in CredentialSlot::ALL {
            if let Some(value) = &pending[slot.index()] {
                self.store.write(slot, value)?;
                stored += 1;
            }
        }
        Ok(stored)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
