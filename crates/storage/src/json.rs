use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use beacon_core::WatermarkState;

use crate::error::StoreError;
use crate::traits::WatermarkStore;

/// The on-disk record: the four watermark fields plus the two
/// installation-context strings, as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    last_report_millis: i64,
    #[serde(default)]
    last_weekly_report_millis: i64,
    #[serde(default)]
    last_report_month: u8,
    #[serde(default)]
    last_report_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    week_of_installation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    referral: Option<String>,
}

impl Document {
    fn watermarks(&self) -> WatermarkState {
        WatermarkState {
            last_report_millis: self.last_report_millis,
            last_weekly_report_millis: self.last_weekly_report_millis,
            last_report_month: self.last_report_month,
            last_report_year: self.last_report_year,
        }
    }

    fn set_watermarks(&mut self, state: &WatermarkState) {
        self.last_report_millis = state.last_report_millis;
        self.last_weekly_report_millis = state.last_weekly_report_millis;
        self.last_report_month = state.last_report_month;
        self.last_report_year = state.last_report_year;
    }
}

/// Single-file JSON store with atomic replace semantics.
///
/// Writes go to a temporary file in the same directory and are renamed
/// over the target, so a commit is all-or-nothing even across a crash
/// mid-write. A missing file reads as first-run defaults; a file that
/// exists but cannot be read or parsed is an error, never first-run.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_document(&self) -> Result<Document, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_document_sync(&path))
            .await
            .map_err(|e| StoreError::Backend(format!("task join error: {e}")))?
    }

    async fn write_document(&self, doc: Document) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_document_sync(&path, &doc))
            .await
            .map_err(|e| StoreError::Backend(format!("task join error: {e}")))?
    }
}

fn read_document_sync(path: &Path) -> Result<Document, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(e) => return Err(StoreError::Unavailable(e.to_string())),
    };
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn write_document_sync(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let json = serde_json::to_vec_pretty(doc).map_err(|e| StoreError::Backend(e.to_string()))?;

    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::Backend(e.to_string()))?;
    tmp.write_all(&json)
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl WatermarkStore for JsonFileStore {
    async fn load(&self) -> Result<WatermarkState, StoreError> {
        Ok(self.read_document().await?.watermarks())
    }

    async fn commit(&self, state: &WatermarkState) -> Result<(), StoreError> {
        let mut doc = self.read_document().await?;
        doc.set_watermarks(state);
        self.write_document(doc).await
    }

    async fn week_of_installation(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_document().await?.week_of_installation)
    }

    async fn set_week_of_installation(&self, week: &str) -> Result<(), StoreError> {
        let mut doc = self.read_document().await?;
        doc.week_of_installation = Some(week.to_string());
        self.write_document(doc).await
    }

    async fn referral(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_document().await?.referral)
    }
}
