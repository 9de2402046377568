use std::{fs, path::Path, time::Instant};

use log::{debug, info};

use pilesync_shared::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use crate::{command::Command, error::RecorderError};

/// Gap forced between two records whose clock readings would otherwise not
/// be strictly increasing
pub const TIMESTAMP_EPSILON: f64 = 1e-5;

/// A command and the seconds elapsed since recording began
#[derive(Clone, Debug, PartialEq)]
pub struct CommandRecord {
    pub elapsed: f64,
    pub command: Command,
}

impl Serde for CommandRecord {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.elapsed.ser(writer);
        self.command.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            elapsed: f64::de(reader)?,
            command: Command::de(reader)?,
        })
    }
}

/// Time-ordered log of recordable commands
pub struct CommandRecorder {
    enabled: bool,
    started_at: Option<Instant>,
    records: Vec<CommandRecord>,
}

impl CommandRecorder {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            started_at: None,
            records: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Appends `command` if recording is enabled. Timestamps are strictly
    /// increasing: a reading at or before the previous one is pushed just
    /// past it.
    pub fn record(&mut self, now: Instant, command: Command) {
        if !self.enabled {
            return;
        }

        let started_at = *self.started_at.get_or_insert(now);
        let mut elapsed = now.saturating_duration_since(started_at).as_secs_f64();
        if let Some(previous) = self.records.last() {
            if elapsed <= previous.elapsed {
                elapsed = previous.elapsed + TIMESTAMP_EPSILON;
            }
        }

        self.records.push(CommandRecord { elapsed, command });
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.started_at = None;
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.records.ser(&mut writer);
        writer.to_bytes()
    }

    /// Replaces the log with the records encoded in `bytes`
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), RecorderError> {
        let mut reader = BitReader::new(bytes);
        let records =
            Vec::<CommandRecord>::de(&mut reader).map_err(|_| RecorderError::Corrupt)?;
        debug!("Loaded {} recorded commands", records.len());
        self.records = records;
        self.started_at = None;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecorderError> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()).map_err(|source| RecorderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved {} commands to {}", self.records.len(), path.display());
        Ok(())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), RecorderError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RecorderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_bytes(&bytes)
    }
}
