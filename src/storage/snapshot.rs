//! Snapshot persistence for the in-memory store.
//!
//! A snapshot is a single file holding the whole store: a magic header, a
//! version byte, the body length and a bincode body. Saves go to a temporary
//! file that atomically replaces the previous snapshot.

use super::memory::StoreState;
use crate::error::{GeoTilesError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_MAGIC: &[u8] = b"GEOTILES_SNAPSHOT";
const SNAPSHOT_VERSION: u8 = 1;
const HEADER_LEN: u64 = SNAPSHOT_MAGIC.len() as u64 + 1 + 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Save automatically after this many mutating operations.
    #[serde(default)]
    pub auto_snapshot_ops: Option<usize>,
}

pub struct SnapshotFile {
    path: PathBuf,
    config: SnapshotConfig,
    ops_since_snapshot: usize,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P, config: SnapshotConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            ops_since_snapshot: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the stored state; a missing or empty file yields an empty store.
    pub fn load(&self) -> Result<StoreState> {
        if !self.exists() {
            return Ok(StoreState::default());
        }

        let file = File::open(&self.path)?;
        let file_len = file.metadata()?.len();
        if file_len == 0 {
            return Ok(StoreState::default());
        }
        if file_len < HEADER_LEN {
            return Err(GeoTilesError::InvalidFormat);
        }

        let mut reader = BufReader::new(file);

        let mut magic = vec![0u8; SNAPSHOT_MAGIC.len()];
        reader.read_exact(&mut magic)?;
        if magic != SNAPSHOT_MAGIC {
            return Err(GeoTilesError::InvalidFormat);
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != SNAPSHOT_VERSION {
            return Err(GeoTilesError::InvalidFormat);
        }

        let body_len = read_u64(&mut reader)?;
        if body_len != file_len - HEADER_LEN {
            log::warn!(
                "snapshot {} declares {} body bytes but holds {}",
                self.path.display(),
                body_len,
                file_len - HEADER_LEN
            );
            return Err(GeoTilesError::InvalidFormat);
        }
        let body_len = usize::try_from(body_len).map_err(|_| GeoTilesError::InvalidFormat)?;
        let mut body = vec![0u8; body_len];
        reader.read_exact(&mut body)?;

        let state: StoreState = bincode::deserialize(&body)?;
        log::debug!(
            "loaded snapshot {} with {} layers",
            self.path.display(),
            state.layers.len()
        );
        Ok(state)
    }

    pub fn save(&mut self, state: &StoreState) -> Result<()> {
        let body = bincode::serialize(state)?;
        let temp_path = self.temp_path();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;
        write_u64(&mut writer, body.len() as u64)?;
        writer.write_all(&body)?;

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        self.sync_parent_dir()?;

        self.ops_since_snapshot = 0;
        log::info!(
            "saved snapshot {} ({} layers, {} bytes)",
            self.path.display(),
            state.layers.len(),
            body.len()
        );
        Ok(())
    }

    pub fn record_operation(&mut self) {
        self.ops_since_snapshot += 1;
    }

    pub fn should_snapshot(&self) -> bool {
        match self.config.auto_snapshot_ops {
            Some(threshold) => self.ops_since_snapshot >= threshold,
            None => false,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }

    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }
}

fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
