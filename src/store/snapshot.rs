// LeadDesk - store/snapshot.rs
//
// JSON snapshot of the three collections: the bulk-read entry point
// mirroring what the hosted store hands the application on load.
// Missing collections and missing optional fields default rather than
// erroring.

use crate::core::model::{Company, Courier, Request};
use crate::store::directory::DirectoryStore;
use crate::store::requests::RequestStore;
use crate::util::error::{SnapshotError, StoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A full on-disk snapshot of all collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub requests: Vec<Request>,
    pub companies: Vec<Company>,
    pub couriers: Vec<Courier>,
}

impl Snapshot {
    /// Seed the in-memory stores from this snapshot. A repeated id
    /// within any collection is rejected.
    pub fn into_stores(self) -> Result<(RequestStore, DirectoryStore), StoreError> {
        Ok((
            RequestStore::from_requests(self.requests)?,
            DirectoryStore::from_collections(self.companies, self.couriers)?,
        ))
    }
}

/// Load a snapshot file. All errors carry the path for context.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let snapshot: Snapshot =
        serde_json::from_str(&content).map_err(|e| SnapshotError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    tracing::info!(
        path = %path.display(),
        requests = snapshot.requests.len(),
        companies = snapshot.companies.len(),
        couriers = snapshot.couriers.len(),
        "Snapshot loaded"
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_collections_default_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.requests.is_empty());
        assert!(snapshot.companies.is_empty());
        assert!(snapshot.couriers.is_empty());
    }

    #[test]
    fn test_load_snapshot_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"requests":[{{"id":"r1","createdAt":"2026-08-30T10:00:00+03:00"}}]}}"#
        )
        .unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.requests.len(), 1);
        assert_eq!(snapshot.requests[0].id, "r1");

        let (requests, _) = snapshot.into_stores().unwrap();
        assert_eq!(requests.requests().len(), 1);
    }

    #[test]
    fn test_into_stores_rejects_duplicate_ids() {
        let json = r#"{"requests":[
            {"id":"r1","createdAt":"2026-08-30T10:00:00+03:00"},
            {"id":"r1","createdAt":"2026-08-30T11:00:00+03:00"}]}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let result = snapshot.into_stores();
        assert!(matches!(result, Err(StoreError::DuplicateId { .. })));
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        let result = load_snapshot(Path::new("/nonexistent/leaddesk-snapshot.json"));
        assert!(matches!(result, Err(SnapshotError::Io { .. })));
    }

    #[test]
    fn test_load_snapshot_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let result = load_snapshot(file.path());
        assert!(matches!(result, Err(SnapshotError::JsonParse { .. })));
    }
}
