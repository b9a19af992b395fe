//! Object records as reported by a backend.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cpl_types::{ProvId, Snapshot, Version};

/// The natural key of an object: who created it, its name, and its type.
///
/// A backend registers at most one object per key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    pub originator: String,
    pub name: String,
    pub object_type: String,
}

impl ObjectKey {
    pub fn new(
        originator: impl Into<String>,
        name: impl Into<String>,
        object_type: impl Into<String>,
    ) -> Self {
        Self {
            originator: originator.into(),
            name: name.into(),
            object_type: object_type.into(),
        }
    }

    /// Returns `true` if any component is empty.
    pub fn has_empty_component(&self) -> bool {
        self.originator.is_empty() || self.name.is_empty() || self.object_type.is_empty()
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.originator, self.name, self.object_type)
    }
}

/// Everything a backend knows about one object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub id: ProvId,
    /// Latest version.
    pub version: Version,
    pub created_at: DateTime<Utc>,
    pub key: ObjectKey,
    /// The snapshot of the enclosing object at creation time, if any.
    pub container: Option<Snapshot>,
}

impl ObjectInfo {
    pub fn current(&self) -> Snapshot {
        Snapshot::new(self.id, self.version)
    }

    pub fn summary(&self) -> String {
        format!("{} {} ({})", self.key, self.version, self.id.short_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ObjectInfo {
        let container = Snapshot::new(ProvId::from_parts(0, 0x7), Version::new(2));
        ObjectInfo {
            id: ProvId::from_parts(0x1, 0xbeef),
            version: Version::new(3),
            created_at: Utc::now(),
            key: ObjectKey::new("org", "report.pdf", "file"),
            container: Some(container),
        }
    }

    #[test]
    fn empty_components_are_detected() {
        assert!(!ObjectKey::new("o", "n", "t").has_empty_component());
        assert!(ObjectKey::new("o", "", "t").has_empty_component());
        assert!(ObjectKey::new("", "n", "t").has_empty_component());
    }

    #[test]
    fn summary_names_key_version_and_short_id() {
        let info = info();
        assert_eq!(info.summary(), "org/report.pdf/file v3 (beef)");
        assert_eq!(info.current(), Snapshot::new(info.id, Version::new(3)));
    }

    #[test]
    fn object_info_json_roundtrip() {
        let info = info();
        let json = serde_json::to_string(&info).unwrap();
        let back: ObjectInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn object_key_json_fields() {
        let key = ObjectKey::new("org", "a.txt", "file");
        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(value["originator"], "org");
        assert_eq!(value["object_type"], "file");
        let back: ObjectKey = serde_json::from_value(value).unwrap();
        assert_eq!(back, key);
    }
}
