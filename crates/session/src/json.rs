//! JSON session archives.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use contracts::{
    EntityCode, RawSample, Rgb, SessionLap, SessionSource, StatusEvent, TelemetryError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// On-disk shape of a recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    /// Session name, used as the cache key when no override is configured
    #[serde(default)]
    pub name: Option<String>,

    /// One entry per competitor
    pub entities: Vec<EntityRecord>,

    /// Race-control status change events, chronological
    #[serde(default)]
    pub status_events: Vec<StatusEvent>,

    /// Competitor code → RGB color
    #[serde(default)]
    pub driver_colors: BTreeMap<String, Rgb>,
}

/// One competitor's recorded laps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Opaque upstream identifier (e.g. a car number)
    pub id: String,

    /// Display code (e.g. "VER")
    pub code: String,

    /// Laps in chronological race order
    pub laps: Vec<LapRecord>,
}

/// One recorded lap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapRecord {
    pub lap_number: u32,

    /// Free-form stint compound label (e.g. "SOFT")
    #[serde(default)]
    pub compound: String,

    pub samples: Vec<RawSample>,
}

/// Session provider backed by a JSON archive loaded fully into memory.
#[derive(Debug)]
pub struct JsonSessionSource {
    file: SessionFile,
}

impl JsonSessionSource {
    /// Load a session archive from disk.
    ///
    /// # Errors
    /// `Io` when the file cannot be read, `Session` when it does not parse.
    #[instrument(name = "session_load", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TelemetryError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_str(&raw)
    }

    /// Parse a session archive from a JSON string.
    ///
    /// # Errors
    /// `Session` when the JSON does not match the archive shape.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> Result<Self, TelemetryError> {
        let file: SessionFile = serde_json::from_str(raw)
            .map_err(|e| TelemetryError::session(format!("invalid session archive: {e}")))?;
        debug!(
            entities = file.entities.len(),
            status_events = file.status_events.len(),
            "session archive loaded"
        );
        Ok(Self { file })
    }

    /// Wrap an already-deserialized archive.
    pub fn new(file: SessionFile) -> Self {
        Self { file }
    }

    /// Session name from the archive, if recorded.
    pub fn name(&self) -> Option<&str> {
        self.file.name.as_deref()
    }

    fn entity(&self, id: &str) -> Result<&EntityRecord, TelemetryError> {
        self.file
            .entities
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| TelemetryError::EntityNotFound {
                entity: id.to_string(),
            })
    }
}

impl SessionSource for JsonSessionSource {
    fn entity_ids(&self) -> Vec<String> {
        self.file.entities.iter().map(|e| e.id.clone()).collect()
    }

    fn entity_code(&self, id: &str) -> Result<EntityCode, TelemetryError> {
        Ok(EntityCode::new(&self.entity(id)?.code))
    }

    fn laps(&self, id: &str) -> Result<Vec<SessionLap>, TelemetryError> {
        Ok(self
            .entity(id)?
            .laps
            .iter()
            .map(|lap| SessionLap {
                lap_number: lap.lap_number,
                compound: lap.compound.clone(),
                samples: lap.samples.clone(),
            })
            .collect())
    }

    fn status_events(&self) -> Result<Vec<StatusEvent>, TelemetryError> {
        Ok(self.file.status_events.clone())
    }

    fn driver_colors(&self) -> BTreeMap<EntityCode, Rgb> {
        self.file
            .driver_colors
            .iter()
            .map(|(code, rgb)| (EntityCode::new(code), *rgb))
            .collect()
    }
}
