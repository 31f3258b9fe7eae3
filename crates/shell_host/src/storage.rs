//! Desktop snapshot persistence.
//!
//! The shell persists exactly one record: the [`DesktopSnapshot`] holding the
//! user's icons, positions, and trash. [`RecordStore`] is the host seam that
//! moves that record as an opaque JSON string; the snapshot-level functions
//! here own the encoding and the schema-version policy, so stores never
//! inspect what they carry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use desktop_core::{DesktopSnapshot, DESKTOP_SNAPSHOT_SCHEMA_VERSION};

/// Storage key under which the desktop snapshot lives.
pub const DESKTOP_RECORD_KEY: &str = "shell.desktop.v1";

/// Boxed local future returned by [`RecordStore`] methods.
pub type RecordStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service moving opaque JSON records by key.
pub trait RecordStore {
    /// Loads the raw JSON previously saved under `key`.
    fn load_record<'a>(
        &'a self,
        key: &'a str,
    ) -> RecordStoreFuture<'a, Result<Option<String>, String>>;

    /// Saves `raw_json` under `key`, replacing any previous record.
    fn save_record<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> RecordStoreFuture<'a, Result<(), String>>;
}

/// In-memory record store for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RefCell<HashMap<String, String>>,
}

impl RecordStore for MemoryRecordStore {
    fn load_record<'a>(
        &'a self,
        key: &'a str,
    ) -> RecordStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.records.borrow().get(key).cloned()) })
    }

    fn save_record<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> RecordStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.records
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }
}

/// Loads the persisted desktop snapshot, if one exists and is readable.
///
/// A record written by a different schema version is discarded rather than
/// migrated; the shell then boots with the default desktop.
///
/// # Errors
///
/// Returns an error when the store fails or the record is not valid JSON.
pub async fn load_desktop_snapshot<S: RecordStore + ?Sized>(
    store: &S,
) -> Result<Option<DesktopSnapshot>, String> {
    let Some(raw) = store.load_record(DESKTOP_RECORD_KEY).await? else {
        return Ok(None);
    };
    let snapshot: DesktopSnapshot = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    if snapshot.schema_version != DESKTOP_SNAPSHOT_SCHEMA_VERSION {
        return Ok(None);
    }
    Ok(Some(snapshot))
}

/// Persists the desktop snapshot.
///
/// # Errors
///
/// Returns an error when serialization or the store save fails.
pub async fn save_desktop_snapshot<S: RecordStore + ?Sized>(
    store: &S,
    snapshot: &DesktopSnapshot,
) -> Result<(), String> {
    let raw = serde_json::to_string(snapshot).map_err(|e| e.to_string())?;
    store.save_record(DESKTOP_RECORD_KEY, &raw).await
}

#[cfg(test)]
mod tests {
    use desktop_core::{DesktopItems, IconKind, Point};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn snapshot_with_one_note() -> DesktopSnapshot {
        let mut items = DesktopItems::default();
        let id = items.create_icon("Notes", IconKind::File, 7);
        items.snapshot(vec![(id, Point::new(120, 48))])
    }

    #[test]
    fn saved_snapshot_loads_back_intact() {
        let store = MemoryRecordStore::default();
        let snapshot = snapshot_with_one_note();
        block_on(save_desktop_snapshot(&store, &snapshot)).expect("save");
        assert_eq!(
            block_on(load_desktop_snapshot(&store)).expect("load"),
            Some(snapshot)
        );
    }

    #[test]
    fn empty_store_boots_with_no_snapshot() {
        let store = MemoryRecordStore::default();
        assert_eq!(block_on(load_desktop_snapshot(&store)).expect("load"), None);
    }

    #[test]
    fn foreign_schema_version_is_discarded_on_load() {
        let store = MemoryRecordStore::default();
        let mut snapshot = snapshot_with_one_note();
        snapshot.schema_version = 99;
        block_on(save_desktop_snapshot(&store, &snapshot)).expect("save");
        assert_eq!(block_on(load_desktop_snapshot(&store)).expect("load"), None);
    }

    #[test]
    fn corrupt_record_reports_an_error_instead_of_default_state() {
        let store = MemoryRecordStore::default();
        block_on(store.save_record(DESKTOP_RECORD_KEY, "not json")).expect("save raw");
        assert!(block_on(load_desktop_snapshot(&store)).is_err());
    }
}
