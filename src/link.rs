//! Rigid body segments.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::elements::{Collision, Inertial, Visual};
use crate::precondition::{ValueError, not_empty};

/// A link from a `<link>` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::LinkData"))]
pub struct Link {
    name: String,
    inertial: Inertial,
    visuals: Vec<Visual>,
    collisions: Vec<Collision>,
}

impl Link {
    /// Create a link with the given name and zero inertial properties.
    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        Self::with_parts(name, Inertial::default(), Vec::new(), Vec::new())
    }

    /// Create a link from all of its parts.
    pub fn with_parts(
        name: impl Into<String>,
        inertial: Inertial,
        visuals: Vec<Visual>,
        collisions: Vec<Collision>,
    ) -> Result<Self, ValueError> {
        let name = name.into();
        not_empty(&name, "name")?;
        Ok(Self {
            name,
            inertial,
            visuals,
            collisions,
        })
    }

    /// Link name, unique within a robot.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inertial properties; zero when the document omitted them.
    #[must_use]
    pub fn inertial(&self) -> &Inertial {
        &self.inertial
    }

    /// Visual elements in document order.
    #[must_use]
    pub fn visuals(&self) -> &[Visual] {
        &self.visuals
    }

    /// Collision elements in document order.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Check if this link carries no mass.
    #[must_use]
    pub fn is_massless(&self) -> bool {
        self.inertial.mass().value() == 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::elements::{Geometry, Inertia, Mass, Pose};

    #[test]
    fn test_new_link_is_massless() {
        let link = Link::new("base").unwrap();
        assert_eq!(link.name(), "base");
        assert!(link.is_massless());
        assert!(link.visuals().is_empty());
        assert!(link.collisions().is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(Link::new(""), Err(ValueError::Empty { param: "name" }));
    }

    #[test]
    fn test_parts_keep_order() {
        let first = Collision::new(
            Some("first".into()),
            Pose::identity(),
            Geometry::sphere(0.1).unwrap(),
        );
        let second = Collision::new(
            Some("second".into()),
            Pose::identity(),
            Geometry::sphere(0.2).unwrap(),
        );
        let inertial = Inertial::at_identity(
            Mass::new(2.0).unwrap(),
            Inertia::diagonal(0.1, 0.1, 0.1).unwrap(),
        );
        let link = Link::with_parts("arm", inertial, Vec::new(), vec![first, second]).unwrap();
        assert!(!link.is_massless());
        assert_eq!(link.collisions()[0].name(), Some("first"));
        assert_eq!(link.collisions()[1].name(), Some("second"));
    }
}
