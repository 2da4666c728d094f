//! Joints and their type tag.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::elements::{Axis, Calibration, Dynamics, Limit, Mimic, Pose, SafetyController};
use crate::precondition::{ValueError, not_empty};

/// Joint type from the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum JointType {
    /// Hinge with position limits.
    Revolute,
    /// Hinge without position limits.
    Continuous,
    /// Sliding joint with position limits.
    Prismatic,
    /// No motion.
    Fixed,
    /// All six degrees of freedom.
    Floating,
    /// Motion in the plane perpendicular to the axis.
    Planar,
}

impl JointType {
    /// All joint types.
    pub const ALL: [Self; 6] = [
        Self::Revolute,
        Self::Continuous,
        Self::Prismatic,
        Self::Fixed,
        Self::Floating,
        Self::Planar,
    ];

    /// The tag used in documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
            Self::Floating => "floating",
            Self::Planar => "planar",
        }
    }

    /// Whether a `<limit>` child is mandatory for this type.
    #[must_use]
    pub fn requires_limit(&self) -> bool {
        matches!(self, Self::Revolute | Self::Prismatic)
    }

    /// Get degrees of freedom for this joint type.
    #[must_use]
    pub fn dof(&self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute | Self::Continuous | Self::Prismatic => 1,
            Self::Planar => 3,
            Self::Floating => 6,
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized joint type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJointType(pub String);

impl fmt::Display for UnknownJointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown joint type: {}", self.0)
    }
}

impl std::error::Error for UnknownJointType {}

impl FromStr for JointType {
    type Err = UnknownJointType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownJointType(s.to_string()))
    }
}

/// A joint from a `<joint>` element.
///
/// `parent` and `child` are link names. They are only checked against the
/// link set when the kinematic tree is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::JointData"))]
pub struct Joint {
    name: String,
    joint_type: JointType,
    parent: String,
    child: String,
    origin: Pose,
    axis: Option<Axis>,
    calibration: Option<Calibration>,
    dynamics: Option<Dynamics>,
    limit: Option<Limit>,
    mimic: Option<Mimic>,
    safety_controller: Option<SafetyController>,
}

impl Joint {
    /// Create a joint at the identity origin with no optional elements.
    pub fn new(
        name: impl Into<String>,
        joint_type: JointType,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Result<Self, ValueError> {
        let name = name.into();
        let parent = parent.into();
        let child = child.into();
        not_empty(&name, "name")?;
        not_empty(&parent, "parent")?;
        not_empty(&child, "child")?;
        Ok(Self {
            name,
            joint_type,
            parent,
            child,
            origin: Pose::identity(),
            axis: None,
            calibration: None,
            dynamics: None,
            limit: None,
            mimic: None,
            safety_controller: None,
        })
    }

    /// Set the joint origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Pose) -> Self {
        self.origin = origin;
        self
    }

    /// Set the joint axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Set the calibration.
    #[must_use]
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Set the joint dynamics.
    #[must_use]
    pub fn with_dynamics(mut self, dynamics: Dynamics) -> Self {
        self.dynamics = Some(dynamics);
        self
    }

    /// Set the joint limits.
    #[must_use]
    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the mimic relation.
    #[must_use]
    pub fn with_mimic(mut self, mimic: Mimic) -> Self {
        self.mimic = Some(mimic);
        self
    }

    /// Set the safety controller.
    #[must_use]
    pub fn with_safety_controller(mut self, safety: SafetyController) -> Self {
        self.safety_controller = Some(safety);
        self
    }

    /// Joint name, unique within a robot.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Joint type.
    #[must_use]
    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    /// Name of the parent link.
    #[must_use]
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Name of the child link.
    #[must_use]
    pub fn child(&self) -> &str {
        &self.child
    }

    /// Joint frame relative to the parent link frame.
    #[must_use]
    pub fn origin(&self) -> &Pose {
        &self.origin
    }

    /// Axis as declared.
    #[must_use]
    pub fn axis(&self) -> Option<&Axis> {
        self.axis.as_ref()
    }

    /// Axis, falling back to `(1, 0, 0)` when undeclared.
    #[must_use]
    pub fn axis_or_default(&self) -> Axis {
        self.axis.unwrap_or_default()
    }

    /// Calibration, if any.
    #[must_use]
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Dynamics, if any.
    #[must_use]
    pub fn dynamics(&self) -> Option<&Dynamics> {
        self.dynamics.as_ref()
    }

    /// Limits, if any.
    #[must_use]
    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    /// Mimic relation, if any.
    #[must_use]
    pub fn mimic(&self) -> Option<&Mimic> {
        self.mimic.as_ref()
    }

    /// Safety controller, if any.
    #[must_use]
    pub fn safety_controller(&self) -> Option<&SafetyController> {
        self.safety_controller.as_ref()
    }
}
