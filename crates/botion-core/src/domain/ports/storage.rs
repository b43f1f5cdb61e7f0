use crate::domain::entity::{CredentialSlot, CredentialValue, Credentials};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be opened or read.
    Unavailable,
    /// A write or erase failed.
    Io,
    /// The value does not fit into a record.
    TooLong,
}

/// Persistent key-value store for the four credential slots.
pub trait CredentialStore {
    /// Read a slot. A slot that was never written reads as an empty string.
    fn read(&mut self, slot: CredentialSlot) -> Result<CredentialValue, StorageError>;

    /// Replace the contents of a slot.
    fn write(&mut self, slot: CredentialSlot, value: &str) -> Result<(), StorageError>;

    fn load_all(&mut self) -> Result<Credentials, StorageError> {
        let mut credentials = Credentials::default();
        for slot in CredentialSlot::ALL {
            credentials.set(slot, self.read(slot)?);
        }
        Ok(credentials)
    }
}

/// A store that failed to open. Reads and writes report `Unavailable`.
impl<S: CredentialStore> CredentialStore for Option<S> {
    fn read(&mut self, slot: CredentialSlot) -> Result<CredentialValue, StorageError> {
        match self {
            Some(store) => store.read(slot),
            None => Err(StorageError::Unavailable),
        }
    }

    fn write(&mut self, slot: CredentialSlot, value: &str) -> Result<(), StorageError> {
        match self {
            Some(store) => store.write(slot, value),
            None => Err(StorageError::Unavailable),
        }
    }
}
