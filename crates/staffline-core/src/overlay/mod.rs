//! Entity records and the local edit overlay.
//!
//! # Module Structure
//!
//! - `kind`: [`EntityKind`], the record types served by the API
//! - `record`: opaque JSON records and patch helpers
//! - `store`: [`EditOverlay`], unsynced edits merged over fetched records

mod kind;
mod record;
mod store;

pub use kind::EntityKind;
pub use record::{Patch, Record, id_to_key, merge_into, record_id, str_field};
pub use store::EditOverlay;
