//! The process-wide session.
//!
//! These free functions operate on a single `static` [`SessionSlot`]. Code
//! that needs more than one session, or isolation between tests, should own
//! a [`SessionSlot`] instead.

use std::collections::VecDeque;
use std::sync::Arc;

use cpl_backend::{AncestryEntry, Backend, ObjectInfo};
use cpl_types::{DependencyFilter, DependencyType, Direction, ProvId, Snapshot, Status, Version};

use crate::ancestry::AncestryCallback;
use crate::error::CplResult;
use crate::iter::AncestryIter;
use crate::lineage::{Lineage, LineageOptions};
use crate::session::SessionSlot;

static SESSION: SessionSlot = SessionSlot::new();

pub fn session() -> &'static SessionSlot {
    &SESSION
}

pub fn attach(backend: Arc<dyn Backend>) -> CplResult<()> {
    SESSION.attach(backend)
}

pub fn attach_status(backend: Arc<dyn Backend>) -> Status {
    SESSION.attach_status(backend)
}

pub fn detach() {
    SESSION.detach()
}

pub fn is_attached() -> bool {
    SESSION.is_attached()
}

pub fn get_ancestry<C>(
    id: ProvId,
    version: Version,
    direction: Direction,
    filter: DependencyFilter,
    callback: &mut C,
) -> CplResult<()>
where
    C: AncestryCallback + ?Sized,
{
    SESSION.get_ancestry(id, version, direction, filter, callback)
}

pub fn ancestry_iter(
    id: ProvId,
    version: Version,
    direction: Direction,
    filter: DependencyFilter,
) -> CplResult<AncestryIter> {
    SESSION.ancestry_iter(id, version, direction, filter)
}

pub fn ancestry_list(
    id: ProvId,
    version: Version,
    direction: Direction,
    filter: DependencyFilter,
) -> CplResult<VecDeque<AncestryEntry>> {
    SESSION.ancestry_list(id, version, direction, filter)
}

pub fn ancestry_vec(
    id: ProvId,
    version: Version,
    direction: Direction,
    filter: DependencyFilter,
) -> CplResult<Vec<AncestryEntry>> {
    SESSION.ancestry_vec(id, version, direction, filter)
}

pub fn lineage(
    root: Snapshot,
    direction: Direction,
    filter: DependencyFilter,
    options: &LineageOptions,
) -> CplResult<Lineage> {
    SESSION.lineage(root, direction, filter, options)
}

pub fn create_object(
    originator: &str,
    name: &str,
    object_type: &str,
    container: Option<Snapshot>,
) -> CplResult<ProvId> {
    SESSION.create_object(originator, name, object_type, container)
}

pub fn lookup_object(originator: &str, name: &str, object_type: &str) -> CplResult<ProvId> {
    SESSION.lookup_object(originator, name, object_type)
}

pub fn try_lookup_object(
    originator: &str,
    name: &str,
    object_type: &str,
) -> CplResult<Option<ProvId>> {
    SESSION.try_lookup_object(originator, name, object_type)
}

pub fn object_info(id: ProvId) -> CplResult<ObjectInfo> {
    SESSION.object_info(id)
}

pub fn all_objects() -> CplResult<Vec<ObjectInfo>> {
    SESSION.all_objects()
}

pub fn new_version(id: ProvId) -> CplResult<Version> {
    SESSION.new_version(id)
}

pub fn current_version(id: ProvId) -> CplResult<Version> {
    SESSION.current_version(id)
}

pub fn data_flow(dest: ProvId, source: ProvId, dependency: DependencyType) -> CplResult<bool> {
    SESSION.data_flow(dest, source, dependency)
}

pub fn control_flow(dest: ProvId, source: ProvId, dependency: DependencyType) -> CplResult<bool> {
    SESSION.control_flow(dest, source, dependency)
}
