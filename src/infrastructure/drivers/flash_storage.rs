//! Credential records in the `nvs` data partition.

use botion_core::domain::ports::StorageError;
use botion_core::storage::{FlashCredentialStore, region_size};
use embedded_storage::nor_flash::NorFlash;
use esp_bootloader_esp_idf::partitions::{
    DataPartitionSubType, PARTITION_TABLE_MAX_LEN, PartitionType, read_partition_table,
};
use esp_hal::peripherals::FLASH;
use esp_storage::FlashStorage;
use log::{info, warn};

pub type CredentialFlash = FlashStorage<'static>;
pub type EspCredentialStore = FlashCredentialStore<CredentialFlash>;

/// Locate the credential partition and open the store on it.
pub fn open_credential_store(flash: FLASH<'static>) -> Result<EspCredentialStore, StorageError> {
    let mut flash = FlashStorage::new(flash);
    let mut table_buffer = [0u8; PARTITION_TABLE_MAX_LEN];

    let (offset, len) = {
        let table = read_partition_table(&mut flash, &mut table_buffer).map_err(|e| {
            warn!("storage: partition table unreadable: {:?}", e);
            StorageError::Unavailable
        })?;
        let entry = table
            .find_partition(PartitionType::Data(DataPartitionSubType::Nvs))
            .map_err(|_| StorageError::Unavailable)?
            .ok_or(StorageError::Unavailable)?;
        (entry.offset(), entry.len())
    };

    let needed = region_size(<CredentialFlash as NorFlash>::ERASE_SIZE);
    if (len as usize) < needed {
        warn!("storage: partition holds {} bytes, {} needed", len, needed);
        return Err(StorageError::Unavailable);
    }
    info!("storage: credentials at {:#x}", offset);
    FlashCredentialStore::new(flash, offset)
}
