//! Identity handed to metadata catalogs.
//!
//! Catalog stores (cost, weight, prefab paths and the like) live outside
//! this crate and key their records by robot name and source document. They
//! never see a [`crate::Robot`]'s internals.

use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Robot name plus the path of the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogKey {
    robot_name: String,
    source: PathBuf,
}

impl CatalogKey {
    /// Create a key.
    #[must_use]
    pub fn new(robot_name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            robot_name: robot_name.into(),
            source: source.into(),
        }
    }

    /// The robot's name attribute.
    #[must_use]
    pub fn robot_name(&self) -> &str {
        &self.robot_name
    }

    /// Where the document was loaded from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.robot_name, self.source.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_compare_by_both_fields() {
        let a = CatalogKey::new("arm", "a.urdf");
        let b = CatalogKey::new("arm", "b.urdf");
        let set: HashSet<_> = [a.clone(), b, a.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(a.to_string(), "arm (a.urdf)");
    }
}
