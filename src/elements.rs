//! Immutable value types for the physical and geometric parts of a robot.
//!
//! Every constructor validates its own invariants through
//! [`crate::precondition`] and reports the first violation. Values compare
//! and hash structurally. Floating point fields are always finite, which
//! makes `Eq` sound; `0.0` and `-0.0` hash identically.

use std::hash::{Hash, Hasher};

use nalgebra::{Matrix3, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::precondition::{ValueError, finite, non_negative, not_empty, within_range};

fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    let bits = if value == 0.0 { 0 } else { value.to_bits() };
    bits.hash(state);
}

fn hash_opt_f64<H: Hasher>(value: Option<f64>, state: &mut H) {
    value.is_some().hash(state);
    if let Some(v) = value {
        hash_f64(v, state);
    }
}

fn hash_vector3<H: Hasher>(v: &Vector3<f64>, state: &mut H) {
    for c in v.iter() {
        hash_f64(*c, state);
    }
}

fn finite_vector3(v: Vector3<f64>, param: &'static str) -> Result<Vector3<f64>, ValueError> {
    for c in v.iter() {
        finite(*c, param)?;
    }
    Ok(v)
}

fn finite_opt(value: Option<f64>, param: &'static str) -> Result<Option<f64>, ValueError> {
    value.map(|v| finite(v, param)).transpose()
}

// ============================================================================
// Pose
// ============================================================================

/// Frame placement from an `<origin>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::PoseData"))]
pub struct Pose {
    xyz: Vector3<f64>,
    rpy: Vector3<f64>,
}

impl Pose {
    /// Create from a translation and roll/pitch/yaw angles.
    pub fn new(xyz: Vector3<f64>, rpy: Vector3<f64>) -> Result<Self, ValueError> {
        Ok(Self {
            xyz: finite_vector3(xyz, "xyz")?,
            rpy: finite_vector3(rpy, "rpy")?,
        })
    }

    /// Create a pure translation.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Result<Self, ValueError> {
        Self::new(Vector3::new(x, y, z), Vector3::zeros())
    }

    /// Zero translation and zero rotation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            xyz: Vector3::zeros(),
            rpy: Vector3::zeros(),
        }
    }

    /// Translation in meters.
    #[must_use]
    pub fn xyz(&self) -> Vector3<f64> {
        self.xyz
    }

    /// Roll, pitch, yaw in radians.
    #[must_use]
    pub fn rpy(&self) -> Vector3<f64> {
        self.rpy
    }

    /// Translation as a point.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.xyz)
    }

    /// Rotation as a quaternion.
    ///
    /// Fixed-axis XYZ: roll about X, then pitch about Y, then yaw about Z.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(self.rpy.x, self.rpy.y, self.rpy.z)
    }

    /// Whether both translation and rotation are zero.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.xyz == Vector3::zeros() && self.rpy == Vector3::zeros()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Eq for Pose {}

impl Hash for Pose {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_vector3(&self.xyz, state);
        hash_vector3(&self.rpy, state);
    }
}

// ============================================================================
// Inertial properties
// ============================================================================

/// Link mass in kilograms. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64"))]
pub struct Mass(f64);

impl Mass {
    /// Create a mass.
    pub fn new(value: f64) -> Result<Self, ValueError> {
        non_negative(value, "value").map(Self)
    }

    /// Mass in kilograms.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Eq for Mass {}

impl Hash for Mass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f64(self.0, state);
    }
}

/// Upper triangle of a symmetric inertia tensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::InertiaData"))]
pub struct Inertia {
    ixx: f64,
    ixy: f64,
    ixz: f64,
    iyy: f64,
    iyz: f64,
    izz: f64,
}

impl Inertia {
    /// Create from the six independent components.
    pub fn new(
        ixx: f64,
        ixy: f64,
        ixz: f64,
        iyy: f64,
        iyz: f64,
        izz: f64,
    ) -> Result<Self, ValueError> {
        Ok(Self {
            ixx: finite(ixx, "ixx")?,
            ixy: finite(ixy, "ixy")?,
            ixz: finite(ixz, "ixz")?,
            iyy: finite(iyy, "iyy")?,
            iyz: finite(iyz, "iyz")?,
            izz: finite(izz, "izz")?,
        })
    }

    /// Create a diagonal tensor.
    pub fn diagonal(ixx: f64, iyy: f64, izz: f64) -> Result<Self, ValueError> {
        Self::new(ixx, 0.0, 0.0, iyy, 0.0, izz)
    }

    /// The all-zero tensor.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Moment about X.
    #[must_use]
    pub fn ixx(&self) -> f64 {
        self.ixx
    }

    /// Product XY.
    #[must_use]
    pub fn ixy(&self) -> f64 {
        self.ixy
    }

    /// Product XZ.
    #[must_use]
    pub fn ixz(&self) -> f64 {
        self.ixz
    }

    /// Moment about Y.
    #[must_use]
    pub fn iyy(&self) -> f64 {
        self.iyy
    }

    /// Product YZ.
    #[must_use]
    pub fn iyz(&self) -> f64 {
        self.iyz
    }

    /// Moment about Z.
    #[must_use]
    pub fn izz(&self) -> f64 {
        self.izz
    }

    /// Full symmetric 3x3 matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.ixx, self.ixy, self.ixz, self.ixy, self.iyy, self.iyz, self.ixz, self.iyz,
            self.izz,
        )
    }
}

impl Eq for Inertia {}

impl Hash for Inertia {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in [self.ixx, self.ixy, self.ixz, self.iyy, self.iyz, self.izz] {
            hash_f64(v, state);
        }
    }
}

/// Mass, inertia and the frame they are expressed in.
///
/// The default is zero mass and zero inertia at the identity pose, which is
/// what a link without an `<inertial>` element gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inertial {
    origin: Pose,
    mass: Mass,
    inertia: Inertia,
}

impl Inertial {
    /// Create inertial properties.
    #[must_use]
    pub fn new(origin: Pose, mass: Mass, inertia: Inertia) -> Self {
        Self {
            origin,
            mass,
            inertia,
        }
    }

    /// Create inertial properties at the identity pose.
    #[must_use]
    pub fn at_identity(mass: Mass, inertia: Inertia) -> Self {
        Self::new(Pose::identity(), mass, inertia)
    }

    /// Inertial frame relative to the link frame.
    #[must_use]
    pub fn origin(&self) -> &Pose {
        &self.origin
    }

    /// Mass.
    #[must_use]
    pub fn mass(&self) -> Mass {
        self.mass
    }

    /// Inertia tensor.
    #[must_use]
    pub fn inertia(&self) -> &Inertia {
        &self.inertia
    }
}

// ============================================================================
// Joint elements
// ============================================================================

/// Joint axis as declared; not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vector3<f64>"))]
pub struct Axis(Vector3<f64>);

impl Axis {
    /// Create an axis. A zero-length vector is rejected.
    pub fn new(xyz: Vector3<f64>) -> Result<Self, ValueError> {
        let xyz = finite_vector3(xyz, "xyz")?;
        within_range(xyz.norm(), f64::EPSILON, f64::MAX, "xyz")?;
        Ok(Self(xyz))
    }

    /// The axis vector as written.
    #[must_use]
    pub fn xyz(&self) -> Vector3<f64> {
        self.0
    }

    /// The axis scaled to unit length.
    #[must_use]
    pub fn unit(&self) -> Vector3<f64> {
        self.0.normalize()
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self(Vector3::x())
    }
}

impl Eq for Axis {}

impl Hash for Axis {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_vector3(&self.0, state);
    }
}

/// Reference positions for absolute joint position calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::CalibrationData"))]
pub struct Calibration {
    rising: Option<f64>,
    falling: Option<f64>,
}

impl Calibration {
    /// Create a calibration; either edge may be absent.
    pub fn new(rising: Option<f64>, falling: Option<f64>) -> Result<Self, ValueError> {
        Ok(Self {
            rising: finite_opt(rising, "rising")?,
            falling: finite_opt(falling, "falling")?,
        })
    }

    /// Position that triggers a rising edge when moving positively.
    #[must_use]
    pub fn rising(&self) -> Option<f64> {
        self.rising
    }

    /// Position that triggers a falling edge when moving positively.
    #[must_use]
    pub fn falling(&self) -> Option<f64> {
        self.falling
    }
}

impl Eq for Calibration {}

impl Hash for Calibration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_opt_f64(self.rising, state);
        hash_opt_f64(self.falling, state);
    }
}

/// Joint damping and friction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::DynamicsData"))]
pub struct Dynamics {
    damping: Option<f64>,
    friction: Option<f64>,
}

impl Dynamics {
    /// Create dynamics; both values must be non-negative when present.
    pub fn new(damping: Option<f64>, friction: Option<f64>) -> Result<Self, ValueError> {
        Ok(Self {
            damping: damping.map(|v| non_negative(v, "damping")).transpose()?,
            friction: friction.map(|v| non_negative(v, "friction")).transpose()?,
        })
    }

    /// Viscous damping coefficient.
    #[must_use]
    pub fn damping(&self) -> Option<f64> {
        self.damping
    }

    /// Coulomb friction.
    #[must_use]
    pub fn friction(&self) -> Option<f64> {
        self.friction
    }
}

impl Eq for Dynamics {}

impl Hash for Dynamics {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_opt_f64(self.damping, state);
        hash_opt_f64(self.friction, state);
    }
}

/// Position, effort and velocity bounds from `<limit>`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::LimitData"))]
pub struct Limit {
    lower: Option<f64>,
    upper: Option<f64>,
    effort: f64,
    velocity: f64,
}

impl Limit {
    /// Create limits. When both bounds are present `lower <= upper`.
    pub fn new(
        lower: Option<f64>,
        upper: Option<f64>,
        effort: f64,
        velocity: f64,
    ) -> Result<Self, ValueError> {
        let lower = finite_opt(lower, "lower")?;
        let upper = finite_opt(upper, "upper")?;
        if let (Some(lo), Some(hi)) = (lower, upper) {
            within_range(hi, lo, f64::MAX, "upper")?;
        }
        Ok(Self {
            lower,
            upper,
            effort: non_negative(effort, "effort")?,
            velocity: non_negative(velocity, "velocity")?,
        })
    }

    /// Lower position bound (rad or m).
    #[must_use]
    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// Upper position bound (rad or m).
    #[must_use]
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Maximum effort (N or Nm).
    #[must_use]
    pub fn effort(&self) -> f64 {
        self.effort
    }

    /// Maximum velocity (rad/s or m/s).
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl Eq for Limit {}

impl Hash for Limit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_opt_f64(self.lower, state);
        hash_opt_f64(self.upper, state);
        hash_f64(self.effort, state);
        hash_f64(self.velocity, state);
    }
}

/// Soft limits enforced by a safety controller.
///
/// The soft bounds are optional like those of [`Limit`]; ordering is only
/// checked when both are present.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::SafetyControllerData"))]
pub struct SafetyController {
    soft_lower_limit: Option<f64>,
    soft_upper_limit: Option<f64>,
    k_position: f64,
    k_velocity: f64,
}

impl SafetyController {
    /// Create a safety controller. When both soft bounds are present
    /// `soft_lower_limit <= soft_upper_limit`.
    pub fn new(
        soft_lower_limit: Option<f64>,
        soft_upper_limit: Option<f64>,
        k_position: f64,
        k_velocity: f64,
    ) -> Result<Self, ValueError> {
        let soft_lower_limit = finite_opt(soft_lower_limit, "soft_lower_limit")?;
        let soft_upper_limit = finite_opt(soft_upper_limit, "soft_upper_limit")?;
        if let (Some(lo), Some(hi)) = (soft_lower_limit, soft_upper_limit) {
            within_range(hi, lo, f64::MAX, "soft_upper_limit")?;
        }
        Ok(Self {
            soft_lower_limit,
            soft_upper_limit,
            k_position: finite(k_position, "k_position")?,
            k_velocity: finite(k_velocity, "k_velocity")?,
        })
    }

    /// Soft lower joint bound.
    #[must_use]
    pub fn soft_lower_limit(&self) -> Option<f64> {
        self.soft_lower_limit
    }

    /// Soft upper joint bound.
    #[must_use]
    pub fn soft_upper_limit(&self) -> Option<f64> {
        self.soft_upper_limit
    }

    /// Position gain.
    #[must_use]
    pub fn k_position(&self) -> f64 {
        self.k_position
    }

    /// Velocity gain.
    #[must_use]
    pub fn k_velocity(&self) -> f64 {
        self.k_velocity
    }
}

impl Eq for SafetyController {}

impl Hash for SafetyController {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_opt_f64(self.soft_lower_limit, state);
        hash_opt_f64(self.soft_upper_limit, state);
        hash_f64(self.k_position, state);
        hash_f64(self.k_velocity, state);
    }
}

/// Makes a joint follow another: `value = multiplier * other + offset`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::MimicData"))]
pub struct Mimic {
    joint: String,
    multiplier: f64,
    offset: f64,
}

impl Mimic {
    /// Create a mimic relation to the named joint.
    pub fn new(joint: impl Into<String>, multiplier: f64, offset: f64) -> Result<Self, ValueError> {
        let joint = joint.into();
        not_empty(&joint, "joint")?;
        Ok(Self {
            joint,
            multiplier: finite(multiplier, "multiplier")?,
            offset: finite(offset, "offset")?,
        })
    }

    /// The joint being mimicked.
    #[must_use]
    pub fn joint(&self) -> &str {
        &self.joint
    }

    /// Scale applied to the mimicked position.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Offset added after scaling.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl Eq for Mimic {}

impl Hash for Mimic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.joint.hash(state);
        hash_f64(self.multiplier, state);
        hash_f64(self.offset, state);
    }
}

// ============================================================================
// Appearance
// ============================================================================

/// RGBA color with every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::ColorData"))]
pub struct Color {
    rgba: [f64; 4],
}

impl Color {
    /// Create a color.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Result<Self, ValueError> {
        let mut rgba = [r, g, b, a];
        for c in &mut rgba {
            *c = within_range(*c, 0.0, 1.0, "rgba")?;
        }
        Ok(Self { rgba })
    }

    /// Channels as `[r, g, b, a]`.
    #[must_use]
    pub fn rgba(&self) -> [f64; 4] {
        self.rgba
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.rgba {
            hash_f64(c, state);
        }
    }
}

/// Texture image reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::TextureData"))]
pub struct Texture {
    filename: String,
}

impl Texture {
    /// Create a texture reference.
    pub fn new(filename: impl Into<String>) -> Result<Self, ValueError> {
        let filename = filename.into();
        not_empty(&filename, "filename")?;
        Ok(Self { filename })
    }

    /// Image path or URI.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Named material with optional color and texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::MaterialData"))]
pub struct Material {
    name: String,
    color: Option<Color>,
    texture: Option<Texture>,
}

impl Material {
    /// Create a material.
    pub fn new(
        name: impl Into<String>,
        color: Option<Color>,
        texture: Option<Texture>,
    ) -> Result<Self, ValueError> {
        let name = name.into();
        not_empty(&name, "name")?;
        Ok(Self {
            name,
            color,
            texture,
        })
    }

    /// Material name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color, if defined here.
    #[must_use]
    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    /// Texture, if defined here.
    #[must_use]
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Whether this is only a reference to a material defined elsewhere.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.color.is_none() && self.texture.is_none()
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Shape from a `<geometry>` element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serde_data::GeometryData"))]
pub enum Geometry {
    /// Box with side lengths in meters.
    Box {
        /// Size in x, y, z.
        size: Vector3<f64>,
    },
    /// Cylinder along the local Z axis.
    Cylinder {
        /// Radius in meters.
        radius: f64,
        /// Length in meters.
        length: f64,
    },
    /// Sphere centered on the origin.
    Sphere {
        /// Radius in meters.
        radius: f64,
    },
    /// Mesh file reference.
    Mesh {
        /// Path or URI of the mesh.
        filename: String,
        /// Optional per-axis scale.
        scale: Option<Vector3<f64>>,
    },
}

impl Geometry {
    /// Create a box.
    pub fn box_shape(size: Vector3<f64>) -> Result<Self, ValueError> {
        for c in size.iter() {
            non_negative(*c, "size")?;
        }
        Ok(Self::Box { size })
    }

    /// Create a cylinder.
    pub fn cylinder(radius: f64, length: f64) -> Result<Self, ValueError> {
        Ok(Self::Cylinder {
            radius: non_negative(radius, "radius")?,
            length: non_negative(length, "length")?,
        })
    }

    /// Create a sphere.
    pub fn sphere(radius: f64) -> Result<Self, ValueError> {
        Ok(Self::Sphere {
            radius: non_negative(radius, "radius")?,
        })
    }

    /// Create a mesh reference.
    pub fn mesh(
        filename: impl Into<String>,
        scale: Option<Vector3<f64>>,
    ) -> Result<Self, ValueError> {
        let filename = filename.into();
        not_empty(&filename, "filename")?;
        if let Some(s) = scale {
            for c in s.iter() {
                non_negative(*c, "scale")?;
            }
        }
        Ok(Self::Mesh { filename, scale })
    }

    /// Tag name of the shape element.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Sphere { .. } => "sphere",
            Self::Mesh { .. } => "mesh",
        }
    }
}

impl Eq for Geometry {}

impl Hash for Geometry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Box { size } => hash_vector3(size, state),
            Self::Cylinder { radius, length } => {
                hash_f64(*radius, state);
                hash_f64(*length, state);
            }
            Self::Sphere { radius } => hash_f64(*radius, state),
            Self::Mesh { filename, scale } => {
                filename.hash(state);
                scale.is_some().hash(state);
                if let Some(s) = scale {
                    hash_vector3(s, state);
                }
            }
        }
    }
}

// ============================================================================
// Visual and collision
// ============================================================================

/// Appearance of a link from `<visual>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Visual {
    name: Option<String>,
    origin: Pose,
    geometry: Geometry,
    material: Option<Material>,
}

impl Visual {
    /// Create a visual element.
    #[must_use]
    pub fn new(
        name: Option<String>,
        origin: Pose,
        geometry: Geometry,
        material: Option<Material>,
    ) -> Self {
        Self {
            name,
            origin,
            geometry,
            material,
        }
    }

    /// Optional name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Placement relative to the link frame.
    #[must_use]
    pub fn origin(&self) -> &Pose {
        &self.origin
    }

    /// Shape.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Material as written on the visual.
    #[must_use]
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }
}

/// Contact shape of a link from `<collision>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Collision {
    name: Option<String>,
    origin: Pose,
    geometry: Geometry,
}

impl Collision {
    /// Create a collision element.
    #[must_use]
    pub fn new(name: Option<String>, origin: Pose, geometry: Geometry) -> Self {
        Self {
            name,
            origin,
            geometry,
        }
    }

    /// Optional name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Placement relative to the link frame.
    #[must_use]
    pub fn origin(&self) -> &Pose {
        &self.origin
    }

    /// Shape.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn unit_inertial(mass: f64, i: f64) -> Inertial {
        Inertial::new(
            Pose::identity(),
            Mass::new(mass).unwrap(),
            Inertia::new(i, i, i, i, i, i).unwrap(),
        )
    }

    #[test]
    fn test_pose_default_is_identity() {
        let pose = Pose::default();
        assert_eq!(pose.xyz(), Vector3::zeros());
        assert_eq!(pose.rpy(), Vector3::zeros());
        assert!(pose.is_identity());
    }

    #[test]
    fn test_pose_rotation() {
        let pose = Pose::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
        )
        .unwrap();
        let rotated = pose.rotation() * Vector3::x();
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pose_rejects_non_finite() {
        let err = Pose::from_xyz(f64::NAN, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, ValueError::OutOfRange { param: "xyz", .. }));
    }

    #[test]
    fn test_mass_rejects_negative() {
        assert!(Mass::new(0.0).is_ok());
        assert!(matches!(
            Mass::new(-1.0),
            Err(ValueError::OutOfRange { param: "value", .. })
        ));
    }

    #[test]
    fn test_inertia_to_matrix() {
        let inertia = Inertia::new(1.0, 0.1, 0.2, 2.0, 0.3, 3.0).unwrap();
        let m = inertia.to_matrix();
        assert_relative_eq!(m[(0, 0)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(m[(0, 1)], 0.1, epsilon = 1e-10);
        assert_relative_eq!(m[(1, 0)], 0.1, epsilon = 1e-10);
        assert_relative_eq!(m[(2, 1)], 0.3, epsilon = 1e-10);
        assert_relative_eq!(m[(2, 2)], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_inertial_default_is_zero_at_identity() {
        let inertial = Inertial::default();
        assert!(inertial.origin().is_identity());
        assert_eq!(inertial.mass().value(), 0.0);
        assert_eq!(*inertial.inertia(), Inertia::zero());
    }

    #[test]
    fn test_inertial_equality_and_hash() {
        let inertial = unit_inertial(1.0, 0.0);
        let same = unit_inertial(1.0, 0.0);
        let diff = unit_inertial(2.0, 2.0);

        assert_eq!(inertial, same);
        assert_eq!(hash_of(&inertial), hash_of(&same));
        assert_ne!(inertial, diff);
        assert_ne!(hash_of(&inertial), hash_of(&diff));

        let moved = Inertial::new(
            Pose::from_xyz(0.0, 0.0, 1.0).unwrap(),
            inertial.mass(),
            *inertial.inertia(),
        );
        assert_ne!(inertial, moved);
    }

    #[test]
    fn test_negative_zero_hashes_like_zero() {
        let a = Pose::from_xyz(0.0, 0.0, 0.0).unwrap();
        let b = Pose::from_xyz(-0.0, 0.0, 0.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_calibration_edges_are_independent() {
        let c = Calibration::new(Some(0.5), None).unwrap();
        assert_eq!(c.rising(), Some(0.5));
        assert_eq!(c.falling(), None);
        assert_ne!(c, Calibration::new(None, Some(0.5)).unwrap());
        assert_ne!(
            hash_of(&c),
            hash_of(&Calibration::new(None, Some(0.5)).unwrap())
        );
    }

    #[test]
    fn test_limit_bounds_order() {
        assert!(Limit::new(Some(-1.0), Some(1.0), 10.0, 1.0).is_ok());
        assert!(Limit::new(Some(1.0), None, 10.0, 1.0).is_ok());
        assert!(matches!(
            Limit::new(Some(1.0), Some(-1.0), 10.0, 1.0),
            Err(ValueError::OutOfRange { param: "upper", .. })
        ));
        assert!(Limit::new(None, None, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_dynamics_rejects_negative_damping() {
        assert!(Dynamics::new(Some(0.1), None).is_ok());
        assert!(matches!(
            Dynamics::new(Some(-0.1), None),
            Err(ValueError::OutOfRange {
                param: "damping",
                ..
            })
        ));
    }

    #[test]
    fn test_safety_controller_soft_limits() {
        assert!(SafetyController::new(Some(-1.0), Some(1.0), 10.0, 5.0).is_ok());
        assert!(SafetyController::new(Some(1.0), Some(-1.0), 10.0, 5.0).is_err());
        // A lone bound has nothing to be ordered against.
        assert!(SafetyController::new(Some(0.1), None, 0.0, 1.0).is_ok());
        assert!(SafetyController::new(None, Some(-0.1), 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_axis_rejects_zero_vector() {
        assert!(Axis::new(Vector3::zeros()).is_err());
        let axis = Axis::new(Vector3::new(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(axis.xyz(), Vector3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(axis.unit().y, 1.0, epsilon = 1e-12);
        assert_eq!(Axis::default().xyz(), Vector3::x());
    }

    #[test]
    fn test_color_channels_in_unit_range() {
        assert!(Color::new(0.0, 0.5, 1.0, 1.0).is_ok());
        assert!(matches!(
            Color::new(1.5, 0.0, 0.0, 1.0),
            Err(ValueError::OutOfRange { param: "rgba", .. })
        ));
    }

    #[test]
    fn test_material_requires_name() {
        assert!(matches!(
            Material::new("", None, None),
            Err(ValueError::Empty { param: "name" })
        ));
        let m = Material::new("steel", None, None).unwrap();
        assert!(m.is_reference());
    }

    #[test]
    fn test_geometry_constructors() {
        assert_eq!(Geometry::sphere(0.5).unwrap().tag(), "sphere");
        assert!(Geometry::cylinder(-0.1, 1.0).is_err());
        assert!(Geometry::box_shape(Vector3::new(1.0, -1.0, 1.0)).is_err());
        assert!(Geometry::mesh("", None).is_err());
        assert!(matches!(
            Geometry::mesh("arm.stl", Some(Vector3::new(1.0, -2.0, 1.0))),
            Err(ValueError::OutOfRange { param: "scale", .. })
        ));
        let a = Geometry::mesh("arm.stl", Some(Vector3::new(1.0, 1.0, 1.0))).unwrap();
        let b = Geometry::mesh("arm.stl", None).unwrap();
        assert_ne!(a, b);
        assert_ne!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_mimic_requires_joint() {
        assert!(Mimic::new("", 1.0, 0.0).is_err());
        let m = Mimic::new("j1", 2.0, 0.1).unwrap();
        assert_eq!(m.joint(), "j1");
        assert_relative_eq!(m.multiplier(), 2.0);
    }
}
