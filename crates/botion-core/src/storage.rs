//! Credential records on raw NOR flash.
//!
//! Each slot owns one erase sector. A record is the little-endian magic
//! header, the value, a `'\n'` terminator and `0xFF` padding up to the
//! record size. Only the first line after the header is the value; a sector
//! without the header reads as an empty string.

use embedded_storage::nor_flash::NorFlash;
use heapless::{String, Vec};
use log::{debug, warn};

use crate::domain::entity::{CREDENTIAL_LEN, CredentialSlot, CredentialValue};
use crate::domain::ports::{CredentialStore, StorageError};

const MAGIC_HEADER: u16 = 0xBEEF;
const MAGIC_HEADER_SIZE: usize = MAGIC_HEADER.to_le_bytes().len();

/// Header, longest value and terminator, rounded up to a 4 byte write unit.
pub const RECORD_SIZE: usize = (MAGIC_HEADER_SIZE + CREDENTIAL_LEN + 1).next_multiple_of(4);

const TERMINATOR: u8 = b'\n';
const ERASED: u8 = 0xFF;

/// Bytes of flash needed to hold every slot.
pub const fn region_size(erase_size: usize) -> usize {
    erase_size * CredentialSlot::ALL.len()
}

pub fn encode_record(value: &str) -> Result<[u8; RECORD_SIZE], StorageError> {
    if value.len() > CREDENTIAL_LEN {
        return Err(StorageError::TooLong);
    }
    let mut record = [ERASED; RECORD_SIZE];
    record[..MAGIC_HEADER_SIZE].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
    let end = MAGIC_HEADER_SIZE + value.len();
    record[MAGIC_HEADER_SIZE..end].copy_from_slice(value.as_bytes());
    record[end] = TERMINATOR;
    Ok(record)
}

pub fn decode_record(record: &[u8]) -> CredentialValue {
    if record.len() < MAGIC_HEADER_SIZE
        || u16::from_le_bytes([record[0], record[1]]) != MAGIC_HEADER
    {
        return String::new();
    }
    let payload = &record[MAGIC_HEADER_SIZE..];
    let line_end = payload
        .iter()
        .position(|&byte| byte == TERMINATOR || byte == ERASED)
        .unwrap_or(payload.len());
    let line = payload[..line_end].strip_suffix(b"\r").unwrap_or(&payload[..line_end]);

    let Ok(bytes) = Vec::<u8, CREDENTIAL_LEN>::from_slice(line) else {
        return String::new();
    };
    String::from_utf8(bytes).unwrap_or_else(|_| {
        warn!("storage: record is not valid UTF-8, treating as empty");
        String::new()
    })
}

/// [`CredentialStore`] over a NOR flash region, one sector per slot.
pub struct FlashCredentialStore<F: NorFlash> {
    flash: F,
    base: u32,
}

impl<F: NorFlash> FlashCredentialStore<F> {
    /// Use the region of `flash` starting at `base`. The region must hold
    /// [`region_size`] bytes and `base` must be sector aligned.
    pub fn new(flash: F, base: u32) -> Result<Self, StorageError> {
        let end = base as usize + region_size(F::ERASE_SIZE);
        if base as usize % F::ERASE_SIZE != 0 || end > flash.capacity() {
            return Err(StorageError::Unavailable);
        }
        Ok(Self { flash, base })
    }

    fn slot_offset(&self, slot: CredentialSlot) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let sector = (slot.index() * F::ERASE_SIZE) as u32;
        self.base + sector
    }

    pub fn into_inner(self) -> F {
        self.flash
    }
}

impl<F: NorFlash> CredentialStore for FlashCredentialStore<F> {
    fn read(&mut self, slot: CredentialSlot) -> Result<CredentialValue, StorageError> {
        let mut record = [0u8; RECORD_SIZE];
        self.flash
            .read(self.slot_offset(slot), &mut record)
            .map_err(|_| StorageError::Unavailable)?;
        Ok(decode_record(&record))
    }

    fn write(&mut self, slot: CredentialSlot, value: &str) -> Result<(), StorageError> {
        let record = encode_record(value)?;
        let offset = self.slot_offset(slot);
        #[allow(clippy::cast_possible_truncation)]
        let sector_end = offset + F::ERASE_SIZE as u32;

        self.flash
            .erase(offset, sector_end)
            .map_err(|_| StorageError::Io)?;
        self.flash
            .write(offset, &record)
            .map_err(|_| StorageError::Io)?;
        debug!("storage: wrote slot {}", slot.field_name());
        Ok(())
    }
}
