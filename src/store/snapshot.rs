//! Backup and export snapshots of the whole document.
//!
//! A snapshot is the full document plus a metadata block, pretty-printed so
//! the file stays hand-inspectable. The caller decides where the artifact
//! lands; this module only produces the bytes and a filesystem-safe name.

use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::errors::Result;
use crate::store::{CURRENCY, DOCUMENT_VERSION, DocumentStore};

/// Which flavor of snapshot to produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapshotKind {
    /// Safety copy, metadata under `backupInfo`.
    Backup,
    /// Data hand-off, metadata under `exportInfo` with the currency included.
    Export,
}

impl SnapshotKind {
    const fn slug(self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Export => "export",
        }
    }

    const fn metadata_key(self) -> &'static str {
        match self {
            Self::Backup => "backupInfo",
            Self::Export => "exportInfo",
        }
    }
}

/// A snapshot ready to be written somewhere.
#[derive(Clone, Debug)]
pub struct SnapshotArtifact {
    /// Suggested file name, timestamped and free of `:` and `.` separators.
    pub file_name: String,
    /// Pretty-printed JSON payload.
    pub contents: String,
}

/// Renders the current document as a snapshot artifact.
///
/// The document itself is not modified; the metadata block exists only in
/// the rendered payload.
///
/// # Errors
/// Returns an error if the document fails to serialize.
pub async fn export_snapshot(
    store: &DocumentStore,
    kind: SnapshotKind,
    clinic_name: &str,
) -> Result<SnapshotArtifact> {
    let now = Utc::now();
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut metadata = json!({
        "version": DOCUMENT_VERSION,
        "clinicName": clinic_name,
    });
    let date_key = match kind {
        SnapshotKind::Backup => "backupDate",
        SnapshotKind::Export => "exportDate",
    };
    if let Value::Object(map) = &mut metadata {
        map.insert(date_key.to_string(), Value::String(stamp.clone()));
        if kind == SnapshotKind::Export {
            map.insert("currency".to_string(), Value::String(CURRENCY.to_string()));
        }
    }

    let document = store.document().await;
    let mut payload = serde_json::to_value(&document)?;
    if let Value::Object(map) = &mut payload {
        map.insert(kind.metadata_key().to_string(), metadata);
    }

    let file_name = format!(
        "ijaz-clinic-{}-{}.json",
        kind.slug(),
        stamp.replace([':', '.'], "-")
    );
    Ok(SnapshotArtifact {
        file_name,
        contents: serde_json::to_string_pretty(&payload)?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_store;
    use chrono::DateTime;

    #[tokio::test]
    async fn test_backup_carries_metadata_and_data() -> Result<()> {
        let store = setup_store().await;
        let artifact = export_snapshot(&store, SnapshotKind::Backup, "Test Clinic").await?;

        let value: Value = serde_json::from_str(&artifact.contents)?;
        assert!(value.get("users").is_some());
        assert!(value.get("services").is_some());
        assert!(value.get("invoices").is_some());

        let info = value.get("backupInfo").unwrap();
        assert_eq!(info.get("version").unwrap(), DOCUMENT_VERSION);
        assert_eq!(info.get("clinicName").unwrap(), "Test Clinic");
        let stamp = info.get("backupDate").unwrap().as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(info.get("currency").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_export_includes_currency() -> Result<()> {
        let store = setup_store().await;
        let artifact = export_snapshot(&store, SnapshotKind::Export, "Test Clinic").await?;

        let value: Value = serde_json::from_str(&artifact.contents)?;
        let info = value.get("exportInfo").unwrap();
        assert_eq!(info.get("currency").unwrap(), CURRENCY);
        assert!(value.get("backupInfo").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_file_name_is_filesystem_safe() -> Result<()> {
        let store = setup_store().await;
        let artifact = export_snapshot(&store, SnapshotKind::Export, "Test Clinic").await?;

        assert!(artifact.file_name.starts_with("ijaz-clinic-export-"));
        assert!(artifact.file_name.ends_with(".json"));
        let stamp = artifact
            .file_name
            .trim_start_matches("ijaz-clinic-export-")
            .trim_end_matches(".json");
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('.'));
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_leaves_document_unchanged() -> Result<()> {
        let store = setup_store().await;
        let before = serde_json::to_value(&store.document().await)?;

        export_snapshot(&store, SnapshotKind::Backup, "Test Clinic").await?;

        let after = serde_json::to_value(&store.document().await)?;
        assert_eq!(before, after);
        Ok(())
    }
}
