//! Core Provenance Library engine.
//!
//! The engine binds to one storage [`Backend`](cpl_backend::Backend) at a
//! time and answers ancestry questions about the provenance graph it holds:
//! which snapshots a given object version was derived from, and which were
//! derived from it.
//!
//! # Sessions
//!
//! - [`SessionSlot`] -- an explicit session; attach, query, detach
//! - [`global`] -- free functions over one process-wide slot
//! - [`SessionGuard`] -- attaches for a scope and detaches on drop
//!
//! # Queries
//!
//! - [`SessionSlot::get_ancestry`] -- push edges into an [`AncestryCallback`]
//! - [`SessionSlot::ancestry_iter`] -- pull edges lazily from an [`AncestryIter`]
//! - [`ListCollector`] / [`VectorCollector`] -- collect a whole result
//! - [`SessionSlot::lineage`] -- transitive walk, each snapshot expanded once
//!
//! Every fallible operation returns [`CplResult`]; [`CplError::code`] and
//! [`error_string`] give the numeric status view.

pub mod ancestry;
pub mod collect;
pub mod config;
pub mod error;
pub mod global;
pub mod guard;
pub mod iter;
pub mod lineage;
mod objects;
pub mod session;

#[cfg(test)]
mod testing;

pub use ancestry::{AncestryCallback, StatusCallback};
pub use collect::{ListCollector, VectorCollector};
pub use config::{EngineConfig, MemoryBackendConfig};
pub use error::{CplError, CplResult};
pub use global::{
    all_objects, ancestry_iter, ancestry_list, ancestry_vec, attach, attach_status, control_flow,
    create_object, current_version, data_flow, detach, get_ancestry, is_attached, lineage,
    lookup_object, new_version, object_info, session, try_lookup_object,
};
pub use guard::SessionGuard;
pub use iter::AncestryIter;
pub use lineage::{Lineage, LineageOptions, LineageStep};
pub use session::{SessionId, SessionSlot, SessionState};

pub use cpl_types::{error_string, Status};
