use crate::error::RegistryError;
use crate::id::AccountId;
use crate::registry::{Registry, RegistryState};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Magic bytes guarding snapshot files against foreign input
const SNAPSHOT_MAGIC: &[u8; 8] = b"NFTREG01";

impl Registry {
    /// Write the registry's logical state to a snapshot file
    ///
    /// The file holds the magic header followed by one length-prefixed
    /// bincode record of the counter, the token table and the collections.
    /// The receipt journal is not part of the snapshot.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), RegistryError> {
        let state = self.read_state()?;
        let serialized = bincode::serialize(&*state)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(SNAPSHOT_MAGIC)?;
        let record_len = serialized.len() as u64;
        writer.write_all(&record_len.to_le_bytes())?;
        writer.write_all(&serialized)?;
        writer.flush()?;

        Ok(())
    }

    /// Restore a registry from a snapshot file
    ///
    /// The counter comes back exactly as saved, so restored registries never
    /// reissue an id that a previous run handed out.
    pub fn load_snapshot(admin: AccountId, path: &Path) -> Result<Registry, RegistryError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(RegistryError::Serialization(
                "snapshot magic mismatch".to_string(),
            ));
        }

        let mut len_bytes = [0u8; 8];
        reader.read_exact(&mut len_bytes)?;
        let record_len = u64::from_le_bytes(len_bytes) as usize;

        let mut serialized = vec![0u8; record_len];
        reader.read_exact(&mut serialized)?;
        let state: RegistryState = bincode::deserialize(&serialized)?;

        Ok(Registry::from_state(admin, state))
    }
}
