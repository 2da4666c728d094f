//! Deserialization mirrors for the validated value types.
//!
//! Each `*Data` struct has the same shape as the type it stands in for.
//! Deserializing goes through the `*Data` form and then through the public
//! constructor, so a value read from serde upholds the same invariants as
//! one built by hand or by the parser.

use nalgebra::Vector3;
use serde::Deserialize;

use crate::elements::{
    Axis, Calibration, Collision, Color, Dynamics, Geometry, Inertia, Inertial, Limit, Mass,
    Material, Mimic, Pose, SafetyController, Texture, Visual,
};
use crate::joint::{Joint, JointType};
use crate::link::Link;
use crate::precondition::ValueError;

impl TryFrom<f64> for Mass {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, ValueError> {
        Self::new(value)
    }
}

impl TryFrom<Vector3<f64>> for Axis {
    type Error = ValueError;

    fn try_from(xyz: Vector3<f64>) -> Result<Self, ValueError> {
        Self::new(xyz)
    }
}

// ============================================================================
// Poses and inertia
// ============================================================================

#[derive(Deserialize)]
pub struct PoseData {
    xyz: Vector3<f64>,
    rpy: Vector3<f64>,
}

impl TryFrom<PoseData> for Pose {
    type Error = ValueError;

    fn try_from(data: PoseData) -> Result<Self, ValueError> {
        Self::new(data.xyz, data.rpy)
    }
}

#[derive(Deserialize)]
pub struct InertiaData {
    ixx: f64,
    ixy: f64,
    ixz: f64,
    iyy: f64,
    iyz: f64,
    izz: f64,
}

impl TryFrom<InertiaData> for Inertia {
    type Error = ValueError;

    fn try_from(d: InertiaData) -> Result<Self, ValueError> {
        Self::new(d.ixx, d.ixy, d.ixz, d.iyy, d.iyz, d.izz)
    }
}

// ============================================================================
// Joint elements
// ============================================================================

#[derive(Deserialize)]
pub struct CalibrationData {
    rising: Option<f64>,
    falling: Option<f64>,
}

impl TryFrom<CalibrationData> for Calibration {
    type Error = ValueError;

    fn try_from(d: CalibrationData) -> Result<Self, ValueError> {
        Self::new(d.rising, d.falling)
    }
}

#[derive(Deserialize)]
pub struct DynamicsData {
    damping: Option<f64>,
    friction: Option<f64>,
}

impl TryFrom<DynamicsData> for Dynamics {
    type Error = ValueError;

    fn try_from(d: DynamicsData) -> Result<Self, ValueError> {
        Self::new(d.damping, d.friction)
    }
}

#[derive(Deserialize)]
pub struct LimitData {
    lower: Option<f64>,
    upper: Option<f64>,
    effort: f64,
    velocity: f64,
}

impl TryFrom<LimitData> for Limit {
    type Error = ValueError;

    fn try_from(d: LimitData) -> Result<Self, ValueError> {
        Self::new(d.lower, d.upper, d.effort, d.velocity)
    }
}

#[derive(Deserialize)]
pub struct SafetyControllerData {
    soft_lower_limit: Option<f64>,
    soft_upper_limit: Option<f64>,
    k_position: f64,
    k_velocity: f64,
}

impl TryFrom<SafetyControllerData> for SafetyController {
    type Error = ValueError;

    fn try_from(d: SafetyControllerData) -> Result<Self, ValueError> {
        Self::new(
            d.soft_lower_limit,
            d.soft_upper_limit,
            d.k_position,
            d.k_velocity,
        )
    }
}

#[derive(Deserialize)]
pub struct MimicData {
    joint: String,
    multiplier: f64,
    offset: f64,
}

impl TryFrom<MimicData> for Mimic {
    type Error = ValueError;

    fn try_from(d: MimicData) -> Result<Self, ValueError> {
        Self::new(d.joint, d.multiplier, d.offset)
    }
}

// ============================================================================
// Appearance and geometry
// ============================================================================

#[derive(Deserialize)]
pub struct ColorData {
    rgba: [f64; 4],
}

impl TryFrom<ColorData> for Color {
    type Error = ValueError;

    fn try_from(d: ColorData) -> Result<Self, ValueError> {
        let [r, g, b, a] = d.rgba;
        Self::new(r, g, b, a)
    }
}

#[derive(Deserialize)]
pub struct TextureData {
    filename: String,
}

impl TryFrom<TextureData> for Texture {
    type Error = ValueError;

    fn try_from(d: TextureData) -> Result<Self, ValueError> {
        Self::new(d.filename)
    }
}

#[derive(Deserialize)]
pub struct MaterialData {
    name: String,
    color: Option<Color>,
    texture: Option<Texture>,
}

impl TryFrom<MaterialData> for Material {
    type Error = ValueError;

    fn try_from(d: MaterialData) -> Result<Self, ValueError> {
        Self::new(d.name, d.color, d.texture)
    }
}

#[derive(Deserialize)]
pub enum GeometryData {
    Box {
        size: Vector3<f64>,
    },
    Cylinder {
        radius: f64,
        length: f64,
    },
    Sphere {
        radius: f64,
    },
    Mesh {
        filename: String,
        scale: Option<Vector3<f64>>,
    },
}

impl TryFrom<GeometryData> for Geometry {
    type Error = ValueError;

    fn try_from(d: GeometryData) -> Result<Self, ValueError> {
        match d {
            GeometryData::Box { size } => Self::box_shape(size),
            GeometryData::Cylinder { radius, length } => Self::cylinder(radius, length),
            GeometryData::Sphere { radius } => Self::sphere(radius),
            GeometryData::Mesh { filename, scale } => Self::mesh(filename, scale),
        }
    }
}

// ============================================================================
// Links and joints
// ============================================================================

#[derive(Deserialize)]
pub struct LinkData {
    name: String,
    inertial: Inertial,
    visuals: Vec<Visual>,
    collisions: Vec<Collision>,
}

impl TryFrom<LinkData> for Link {
    type Error = ValueError;

    fn try_from(d: LinkData) -> Result<Self, ValueError> {
        Self::with_parts(d.name, d.inertial, d.visuals, d.collisions)
    }
}

#[derive(Deserialize)]
pub struct JointData {
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

impl TryFrom<JointData> for Joint {
    type Error = ValueError;

    fn try_from(d: JointData) -> Result<Self, ValueError> {
        let mut joint = Self::new(d.name, d.joint_type, d.parent, d.child)?.with_origin(d.origin);
        if let Some(axis) = d.axis {
            joint = joint.with_axis(axis);
        }
        if let Some(calibration) = d.calibration {
            joint = joint.with_calibration(calibration);
        }
        if let Some(dynamics) = d.dynamics {
            joint = joint.with_dynamics(dynamics);
        }
        if let Some(limit) = d.limit {
            joint = joint.with_limit(limit);
        }
        if let Some(mimic) = d.mimic {
            joint = joint.with_mimic(mimic);
        }
        if let Some(safety) = d.safety_controller {
            joint = joint.with_safety_controller(safety);
        }
        Ok(joint)
    }
}
