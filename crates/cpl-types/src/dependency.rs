//! Dependency edge kinds and the query selectors built on them.
//!
//! A [`DependencyType`] encodes both the broad [`DependencyCategory`] (data
//! or control) and a subtype. The numeric code is `category << 8 | subtype`,
//! so the category can always be recovered from a raw code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Broad class of a dependency edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyCategory {
    /// Content of one version was derived from another.
    Data,
    /// Execution of one object influenced another, independent of content.
    Control,
}

impl DependencyCategory {
    pub const fn code(&self) -> u16 {
        match self {
            Self::Data => 1,
            Self::Control => 2,
        }
    }
}

impl fmt::Display for DependencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "DATA"),
            Self::Control => write!(f, "CONTROL"),
        }
    }
}

/// The concrete type tag carried by an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Generic data input.
    DataInput,
    /// Data passed over inter-process communication.
    DataIpc,
    /// Data translated from one representation to another.
    DataTranslation,
    /// Verbatim copy.
    DataCopy,
    /// Generic control operation.
    ControlOp,
    /// One process started another.
    ControlStart,
}

impl DependencyType {
    pub const ALL: [DependencyType; 6] = [
        Self::DataInput,
        Self::DataIpc,
        Self::DataTranslation,
        Self::DataCopy,
        Self::ControlOp,
        Self::ControlStart,
    ];

    pub const fn category(&self) -> DependencyCategory {
        match self {
            Self::DataInput | Self::DataIpc | Self::DataTranslation | Self::DataCopy => {
                DependencyCategory::Data
            }
            Self::ControlOp | Self::ControlStart => DependencyCategory::Control,
        }
    }

    /// Stable numeric code (`category << 8 | subtype`).
    pub const fn code(&self) -> u16 {
        let subtype = match self {
            Self::DataInput | Self::ControlOp => 0,
            Self::DataIpc | Self::ControlStart => 1,
            Self::DataTranslation => 2,
            Self::DataCopy => 3,
        };
        (self.category().code() << 8) | subtype
    }

    pub fn from_code(code: u16) -> Result<Self, TypeError> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(TypeError::UnknownDependencyType(code))
    }

    pub const fn is_data(&self) -> bool {
        matches!(self.category(), DependencyCategory::Data)
    }

    pub const fn is_control(&self) -> bool {
        matches!(self.category(), DependencyCategory::Control)
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DataInput => "DATA_INPUT",
            Self::DataIpc => "DATA_IPC",
            Self::DataTranslation => "DATA_TRANSLATION",
            Self::DataCopy => "DATA_COPY",
            Self::ControlOp => "CONTROL_OP",
            Self::ControlStart => "CONTROL_START",
        };
        f.write_str(name)
    }
}

/// Which side of a snapshot an ancestry query walks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Inputs: what the queried snapshot depends on.
    #[default]
    Ancestors,
    /// Outputs: what depends on the queried snapshot.
    Descendants,
    /// Inputs followed by outputs.
    Both,
}

impl Direction {
    pub const fn includes_ancestors(&self) -> bool {
        matches!(self, Self::Ancestors | Self::Both)
    }

    pub const fn includes_descendants(&self) -> bool {
        matches!(self, Self::Descendants | Self::Both)
    }
}

/// Restricts a query to one dependency category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyFilter {
    #[default]
    All,
    DataOnly,
    ControlOnly,
}

impl DependencyFilter {
    pub const fn accepts(&self, dependency: DependencyType) -> bool {
        match self {
            Self::All => true,
            Self::DataOnly => dependency.is_data(),
            Self::ControlOnly => dependency.is_control(),
        }
    }
}
