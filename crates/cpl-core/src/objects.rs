//! Object and version registration on the attached backend.

use tracing::debug;

use cpl_backend::{ObjectInfo, ObjectKey};
use cpl_types::{DependencyCategory, DependencyType, ProvId, Snapshot, Version};

use crate::error::{CplError, CplResult};
use crate::session::SessionSlot;

impl SessionSlot {
    /// Register a new object and return its id.
    ///
    /// `container`, when given, must name an existing snapshot.
    pub fn create_object(
        &self,
        originator: &str,
        name: &str,
        object_type: &str,
        container: Option<Snapshot>,
    ) -> CplResult<ProvId> {
        let key = ObjectKey::new(originator, name, object_type);
        let id = self.backend()?.create_object(&key, container)?;
        debug!(object = %id, key = %key, "object created");
        Ok(id)
    }

    pub fn lookup_object(
        &self,
        originator: &str,
        name: &str,
        object_type: &str,
    ) -> CplResult<ProvId> {
        let key = ObjectKey::new(originator, name, object_type);
        Ok(self.backend()?.lookup_object(&key)?)
    }

    /// Like [`lookup_object`](Self::lookup_object), with absence as `None`.
    pub fn try_lookup_object(
        &self,
        originator: &str,
        name: &str,
        object_type: &str,
    ) -> CplResult<Option<ProvId>> {
        match self.lookup_object(originator, name, object_type) {
            Ok(id) => Ok(Some(id)),
            Err(CplError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn object_info(&self, id: ProvId) -> CplResult<ObjectInfo> {
        Ok(self.backend()?.object_info(&id)?)
    }

    /// Every registered object, ordered by id.
    pub fn all_objects(&self) -> CplResult<Vec<ObjectInfo>> {
        Ok(self.backend()?.all_objects()?)
    }

    pub fn new_version(&self, id: ProvId) -> CplResult<Version> {
        let version = self.backend()?.new_version(&id)?;
        debug!(object = %id, %version, "new version");
        Ok(version)
    }

    pub fn current_version(&self, id: ProvId) -> CplResult<Version> {
        Ok(self.backend()?.current_version(&id)?)
    }

    /// Record a data dependency of `dest` on `source`.
    ///
    /// Returns `false` if the same edge was already recorded.
    pub fn data_flow(
        &self,
        dest: ProvId,
        source: ProvId,
        dependency: DependencyType,
    ) -> CplResult<bool> {
        self.add_dependency(dest, source, dependency, DependencyCategory::Data)
    }

    /// Record a control dependency of `dest` on `source`.
    ///
    /// Returns `false` if the same edge was already recorded.
    pub fn control_flow(
        &self,
        dest: ProvId,
        source: ProvId,
        dependency: DependencyType,
    ) -> CplResult<bool> {
        self.add_dependency(dest, source, dependency, DependencyCategory::Control)
    }

    fn add_dependency(
        &self,
        dest: ProvId,
        source: ProvId,
        dependency: DependencyType,
        expected: DependencyCategory,
    ) -> CplResult<bool> {
        if dependency.category() != expected {
            return Err(CplError::InvalidArgument(format!(
                "{dependency} is not a {expected:?} dependency"
            )));
        }
        let recorded = self.backend()?.add_dependency(&dest, &source, dependency)?;
        debug!(%dest, %source, %dependency, recorded, "dependency recorded");
        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InstrumentedBackend;
    use cpl_types::{DependencyFilter, Direction, Status};

    fn attached() -> SessionSlot {
        let slot = SessionSlot::new();
        slot.attach(InstrumentedBackend::new("objects")).unwrap();
        slot
    }

    #[test]
    fn detached_registration_fails() {
        let slot = SessionSlot::new();
        let err = slot.create_object("o", "n", "t", None).unwrap_err();
        assert_eq!(err.status(), Some(Status::NotAttached));
        let err = slot.try_lookup_object("o", "n", "t").unwrap_err();
        assert_eq!(err.status(), Some(Status::NotAttached));
    }

    #[test]
    fn create_then_lookup() {
        let slot = attached();
        let id = slot.create_object("org", "report.pdf", "file", None).unwrap();
        assert_eq!(slot.lookup_object("org", "report.pdf", "file").unwrap(), id);
        assert_eq!(slot.try_lookup_object("org", "report.pdf", "file").unwrap(), Some(id));

        let info = slot.object_info(id).unwrap();
        assert_eq!(info.key.name, "report.pdf");
        assert_eq!(info.version, Version::INITIAL);
    }

    #[test]
    fn missing_object() {
        let slot = attached();
        let err = slot.lookup_object("org", "absent", "file").unwrap_err();
        assert_eq!(err.status(), Some(Status::NotFound));
        assert_eq!(slot.try_lookup_object("org", "absent", "file").unwrap(), None);
    }

    #[test]
    fn duplicate_key_already_exists() {
        let slot = attached();
        slot.create_object("org", "x", "file", None).unwrap();
        let err = slot.create_object("org", "x", "file", None).unwrap_err();
        assert_eq!(err.status(), Some(Status::AlreadyExists));
    }

    #[test]
    fn empty_name_is_invalid() {
        let slot = attached();
        let err = slot.create_object("org", "", "file", None).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidArgument));
    }

    #[test]
    fn versions_advance() {
        let slot = attached();
        let id = slot.create_object("org", "log", "file", None).unwrap();
        assert_eq!(slot.new_version(id).unwrap(), Version::new(1));
        assert_eq!(slot.new_version(id).unwrap(), Version::new(2));
        assert_eq!(slot.current_version(id).unwrap(), Version::new(2));
    }

    #[test]
    fn all_objects_sorted_by_id() {
        let slot = attached();
        for name in ["c", "a", "b"] {
            slot.create_object("org", name, "file", None).unwrap();
        }
        let ids: Vec<ProvId> = slot.all_objects().unwrap().iter().map(|i| i.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids, sorted);
    }

    #[test]
    fn flows_record_once() {
        let slot = attached();
        let out = slot.create_object("org", "out", "file", None).unwrap();
        let input = slot.create_object("org", "in", "file", None).unwrap();
        let compiler = slot.create_object("org", "cc", "process", None).unwrap();

        assert!(slot.data_flow(out, input, DependencyType::DataInput).unwrap());
        assert!(!slot.data_flow(out, input, DependencyType::DataInput).unwrap());
        assert!(slot.control_flow(out, compiler, DependencyType::ControlStart).unwrap());

        let edges = slot
            .ancestry_vec(out, Version::INITIAL, Direction::Ancestors, DependencyFilter::All)
            .unwrap();
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn category_mismatch_is_rejected() {
        let slot = attached();
        let a = slot.create_object("org", "a", "file", None).unwrap();
        let b = slot.create_object("org", "b", "file", None).unwrap();

        let err = slot.data_flow(a, b, DependencyType::ControlOp).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidArgument));
        let err = slot.control_flow(a, b, DependencyType::DataCopy).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidArgument));
    }

    #[test]
    fn self_dependency_is_rejected() {
        let slot = attached();
        let a = slot.create_object("org", "a", "file", None).unwrap();
        let err = slot.data_flow(a, a, DependencyType::DataCopy).unwrap_err();
        assert_eq!(err.status(), Some(Status::InvalidArgument));
    }
}
