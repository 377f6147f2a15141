//! Local Edit Overlay: unsynced, client-only edits layered over API records.
//!
//! The API has no update endpoints for several kinds, so inline edits are
//! kept in the tab scope and merged over every fetch. This is an unsynced
//! edit queue, not a source of truth: it is never reconciled with the
//! server and disappears with the scope.
//!
//! Each kind's patches live in one JSON object under
//! [`EntityKind::overlay_key`]. Writes are read-modify-write over that whole
//! object, so two processes sharing a scope can lose each other's updates.

use super::kind::EntityKind;
use super::record::{Patch, Record, merge_into, record_id};
use crate::error::Result;
use crate::scope::ScopeStorage;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-kind, per-id patch store over a storage scope.
#[derive(Clone)]
pub struct EditOverlay {
    scope: Arc<dyn ScopeStorage>,
}

impl EditOverlay {
    pub fn new(scope: Arc<dyn ScopeStorage>) -> Self {
        Self { scope }
    }

    /// Returns the stored patch for `id`, or an empty patch.
    pub fn get_patch(&self, kind: EntityKind, id: &str) -> Patch {
        self.load_map(kind).remove(id).unwrap_or_default()
    }

    /// Shallow-merges `fields` into the stored patch for `id`.
    ///
    /// Fields already in the patch but absent from `fields` are kept.
    /// Returns the patch as stored after the merge.
    pub fn set_patch(&self, kind: EntityKind, id: &str, fields: Patch) -> Result<Patch> {
        let mut map = self.load_map(kind);
        let entry = map.entry(id.to_string()).or_default();
        merge_into(entry, &fields);
        let merged = entry.clone();

        self.save_map(kind, &map)?;
        tracing::debug!(kind = %kind, id, fields = fields.len(), "Saved unsynced edit");
        Ok(merged)
    }

    /// Returns `record` with its patch merged on top.
    pub fn apply_patch(&self, kind: EntityKind, mut record: Record) -> Record {
        if let Some(id) = record_id(kind, &record) {
            let patch = self.get_patch(kind, &id);
            merge_into(&mut record, &patch);
        }
        record
    }

    /// Merges stored patches over a freshly fetched list.
    ///
    /// Order and length are preserved; patch values win over server values;
    /// server-only fields pass through. Records without an id are unchanged.
    pub fn apply_patches(&self, kind: EntityKind, records: Vec<Record>) -> Vec<Record> {
        let map = self.load_map(kind);
        if map.is_empty() {
            return records;
        }

        records
            .into_iter()
            .map(|mut record| {
                if let Some(patch) = record_id(kind, &record).and_then(|id| map.get(&id)) {
                    merge_into(&mut record, patch);
                }
                record
            })
            .collect()
    }

    /// Ids with unsynced edits, in key order.
    pub fn pending_ids(&self, kind: EntityKind) -> Vec<String> {
        self.load_map(kind)
            .into_iter()
            .filter(|(_, patch)| !patch.is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    /// True when `id` carries an unsynced edit.
    pub fn has_pending(&self, kind: EntityKind, id: &str) -> bool {
        !self.get_patch(kind, id).is_empty()
    }

    /// Drops the unsynced edit for `id`. Only called on explicit user request.
    pub fn discard(&self, kind: EntityKind, id: &str) -> Result<bool> {
        let mut map = self.load_map(kind);
        let removed = map.remove(id).is_some();
        if removed {
            self.save_map(kind, &map)?;
            tracing::debug!(kind = %kind, id, "Discarded unsynced edit");
        }
        Ok(removed)
    }

    fn load_map(&self, kind: EntityKind) -> BTreeMap<String, Patch> {
        self.try_load_map(kind).unwrap_or_else(|e| {
            tracing::warn!(kind = %kind, error = %e, "Ignoring unreadable edit overlay");
            BTreeMap::new()
        })
    }

    fn try_load_map(&self, kind: EntityKind) -> Result<BTreeMap<String, Patch>> {
        let Some(raw) = self.scope.get_item(&kind.overlay_key())? else {
            return Ok(BTreeMap::new());
        };
        let parsed: Map<String, Value> = serde_json::from_str(&raw)?;
        // Entries that are not objects cannot be merged; drop them.
        Ok(parsed
            .into_iter()
            .filter_map(|(id, value)| match value {
                Value::Object(patch) => Some((id, patch)),
                _ => None,
            })
            .collect())
    }

    fn save_map(&self, kind: EntityKind, map: &BTreeMap<String, Patch>) -> Result<()> {
        let raw = serde_json::to_string(map)?;
        self.scope.set_item(&kind.overlay_key(), &raw)
    }
}
