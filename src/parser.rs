//! URDF document parser.
//!
//! Walks an [`XmlNode`] tree and materializes links, joints and the material
//! catalog. Cross-references between joints and links are not checked here;
//! that is the tree builder's job.

use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::config::ParseConfig;
use crate::document::XmlNode;
use crate::elements::{
    Axis, Calibration, Collision, Color, Dynamics, Geometry, Inertia, Inertial, Limit, Mass,
    Material, Mimic, Pose, SafetyController, Texture, Visual,
};
use crate::error::{EntityKind, Result, UrdfError};
use crate::joint::{Joint, JointType};
use crate::link::Link;
use crate::precondition::ValueError;

const ROBOT_CHILDREN: &[&str] = &["link", "joint", "material", "transmission", "gazebo"];
const LINK_CHILDREN: &[&str] = &["inertial", "visual", "collision"];
const INERTIAL_CHILDREN: &[&str] = &["origin", "mass", "inertia"];
const VISUAL_CHILDREN: &[&str] = &["origin", "geometry", "material"];
const COLLISION_CHILDREN: &[&str] = &["origin", "geometry"];
const MATERIAL_CHILDREN: &[&str] = &["color", "texture"];
const SHAPES: &[&str] = &["box", "cylinder", "sphere", "mesh"];
const JOINT_CHILDREN: &[&str] = &[
    "parent",
    "child",
    "origin",
    "axis",
    "calibration",
    "dynamics",
    "limit",
    "mimic",
    "safety_controller",
];

/// Everything read from one document, before cross-references are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRobot {
    /// Robot name.
    pub name: String,
    /// Links in document order.
    pub links: Vec<Link>,
    /// Joints in document order.
    pub joints: Vec<Joint>,
    /// Material catalog: top-level materials first, then named inline
    /// visual materials not already defined.
    pub materials: Vec<Material>,
}

impl RawRobot {
    /// Look up a catalog material by name.
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name() == name)
    }
}

/// Parse a `<robot>` element into links, joints and materials.
///
/// # Errors
///
/// Returns an error if a required attribute or child element is missing, a
/// value does not parse or violates its range, a top-level material name is
/// repeated, or (in strict mode) an unknown element is present.
pub fn parse_document<'a, N: XmlNode<'a>>(root: N, config: &ParseConfig) -> Result<RawRobot> {
    DocumentParser { config }.parse_robot(root)
}

struct DocumentParser<'c> {
    config: &'c ParseConfig,
}

impl DocumentParser<'_> {
    fn parse_robot<'a, N: XmlNode<'a>>(&self, root: N) -> Result<RawRobot> {
        if root.tag_name() != "robot" {
            return Err(UrdfError::missing_element("robot", "URDF document"));
        }
        let name = required_attr(root, "name")?.to_string();
        debug!(robot = %name, "parsing elements");
        self.check_children(root, ROBOT_CHILDREN)?;

        let mut materials: Vec<Material> = Vec::new();
        for node in root.children_named("material") {
            let material = self.parse_material(node)?;
            if materials.iter().any(|m| m.name() == material.name()) {
                return Err(UrdfError::DuplicateName {
                    kind: EntityKind::Material,
                    name: material.name().to_string(),
                });
            }
            materials.push(material);
        }

        let links = root
            .children_named("link")
            .map(|node| self.parse_link(node))
            .collect::<Result<Vec<_>>>()?;

        let joints = root
            .children_named("joint")
            .map(|node| self.parse_joint(node))
            .collect::<Result<Vec<_>>>()?;

        for material in links
            .iter()
            .flat_map(|l| l.visuals())
            .filter_map(Visual::material)
        {
            if !material.is_reference() && !materials.iter().any(|m| m.name() == material.name())
            {
                materials.push(material.clone());
            }
        }

        debug!(
            links = links.len(),
            joints = joints.len(),
            materials = materials.len(),
            "parsed elements"
        );

        Ok(RawRobot {
            name,
            links,
            joints,
            materials,
        })
    }

    fn check_children<'a, N: XmlNode<'a>>(&self, node: N, known: &[&str]) -> Result<()> {
        for child in node.child_elements() {
            let tag = child.tag_name();
            if known.contains(&tag) {
                continue;
            }
            if self.config.is_strict() {
                return Err(UrdfError::UnrecognizedElement {
                    element: tag.to_string(),
                    context: describe(node),
                });
            }
            warn!(element = tag, parent = %describe(node), "skipping unrecognized element");
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------------

    fn parse_link<'a, N: XmlNode<'a>>(&self, node: N) -> Result<Link> {
        let name = required_attr(node, "name")?;
        self.check_children(node, LINK_CHILDREN)?;

        let inertial = match node.child("inertial") {
            Some(inertial) => self.parse_inertial(inertial)?,
            None => {
                debug!(link = name, "no inertial, using zero mass at identity pose");
                Inertial::default()
            }
        };

        let visuals = node
            .children_named("visual")
            .map(|v| self.parse_visual(v))
            .collect::<Result<Vec<_>>>()?;
        let collisions = node
            .children_named("collision")
            .map(|c| self.parse_collision(c))
            .collect::<Result<Vec<_>>>()?;

        in_element(Link::with_parts(name, inertial, visuals, collisions), node)
    }

    fn parse_inertial<'a, N: XmlNode<'a>>(&self, node: N) -> Result<Inertial> {
        self.check_children(node, INERTIAL_CHILDREN)?;
        let origin = parse_origin(node.child("origin"))?;

        let mass_node = node
            .child("mass")
            .ok_or_else(|| UrdfError::missing_element("mass", "inertial"))?;
        let mass = in_element(Mass::new(required_f64(mass_node, "value")?), mass_node)?;

        let i = node
            .child("inertia")
            .ok_or_else(|| UrdfError::missing_element("inertia", "inertial"))?;
        let inertia = in_element(
            Inertia::new(
                required_f64(i, "ixx")?,
                required_f64(i, "ixy")?,
                required_f64(i, "ixz")?,
                required_f64(i, "iyy")?,
                required_f64(i, "iyz")?,
                required_f64(i, "izz")?,
            ),
            i,
        )?;

        Ok(Inertial::new(origin, mass, inertia))
    }

    fn parse_visual<'a, N: XmlNode<'a>>(&self, node: N) -> Result<Visual> {
        self.check_children(node, VISUAL_CHILDREN)?;
        let name = node.attribute("name").map(str::to_string);
        let origin = parse_origin(node.child("origin"))?;
        let geometry = self.parse_geometry(
            node.child("geometry")
                .ok_or_else(|| UrdfError::missing_element("geometry", "visual"))?,
        )?;
        let material = node
            .child("material")
            .map(|m| self.parse_material(m))
            .transpose()?;
        Ok(Visual::new(name, origin, geometry, material))
    }

    fn parse_collision<'a, N: XmlNode<'a>>(&self, node: N) -> Result<Collision> {
        self.check_children(node, COLLISION_CHILDREN)?;
        let name = node.attribute("name").map(str::to_string);
        let origin = parse_origin(node.child("origin"))?;
        let geometry = self.parse_geometry(
            node.child("geometry")
                .ok_or_else(|| UrdfError::missing_element("geometry", "collision"))?,
        )?;
        Ok(Collision::new(name, origin, geometry))
    }

    fn parse_geometry<'a, N: XmlNode<'a>>(&self, node: N) -> Result<Geometry> {
        self.check_children(node, SHAPES)?;
        let shape = node
            .child_elements()
            .find(|c| SHAPES.contains(&c.tag_name()))
            .ok_or_else(|| UrdfError::missing_element("shape", "geometry"))?;

        let geometry = match shape.tag_name() {
            "box" => Geometry::box_shape(required_vector3(shape, "size")?),
            "cylinder" => Geometry::cylinder(
                required_f64(shape, "radius")?,
                required_f64(shape, "length")?,
            ),
            "sphere" => Geometry::sphere(required_f64(shape, "radius")?),
            _ => Geometry::mesh(
                required_attr(shape, "filename")?,
                optional_vector3(shape, "scale")?,
            ),
        };
        in_element(geometry, shape)
    }

    fn parse_material<'a, N: XmlNode<'a>>(&self, node: N) -> Result<Material> {
        let name = required_attr(node, "name")?;
        self.check_children(node, MATERIAL_CHILDREN)?;

        let color = match node.child("color") {
            Some(c) => {
                let [r, g, b, a] = parse_floats::<4, N>(c, "rgba", required_attr(c, "rgba")?)?;
                Some(in_element(Color::new(r, g, b, a), c)?)
            }
            None => None,
        };
        let texture = match node.child("texture") {
            Some(t) => Some(in_element(
                Texture::new(required_attr(t, "filename")?),
                t,
            )?),
            None => None,
        };

        in_element(Material::new(name, color, texture), node)
    }

    // ------------------------------------------------------------------------
    // Joints
    // ------------------------------------------------------------------------

    fn parse_joint<'a, N: XmlNode<'a>>(&self, node: N) -> Result<Joint> {
        let name = required_attr(node, "name")?;
        let type_str = required_attr(node, "type")?;
        let joint_type = type_str.parse::<JointType>().map_err(|e| {
            UrdfError::invalid_value("type", describe(node), type_str, e.to_string())
        })?;
        self.check_children(node, JOINT_CHILDREN)?;

        let parent = link_reference(node, "parent")?;
        let child = link_reference(node, "child")?;

        let limit = node.child("limit").map(parse_limit).transpose()?;
        if limit.is_none() && joint_type.requires_limit() {
            return Err(UrdfError::missing_element("limit", describe(node)));
        }

        let mut joint = in_element(Joint::new(name, joint_type, parent, child), node)?
            .with_origin(parse_origin(node.child("origin"))?);

        if let Some(axis) = node.child("axis") {
            let xyz = optional_vector3(axis, "xyz")?.unwrap_or_else(Vector3::x);
            joint = joint.with_axis(in_element(Axis::new(xyz), axis)?);
        }
        if let Some(c) = node.child("calibration") {
            let calibration = Calibration::new(
                optional_f64(c, "rising")?,
                optional_f64(c, "falling")?,
            );
            joint = joint.with_calibration(in_element(calibration, c)?);
        }
        if let Some(d) = node.child("dynamics") {
            let dynamics = Dynamics::new(optional_f64(d, "damping")?, optional_f64(d, "friction")?);
            joint = joint.with_dynamics(in_element(dynamics, d)?);
        }
        if let Some(limit) = limit {
            joint = joint.with_limit(limit);
        }
        if let Some(m) = node.child("mimic") {
            let mimic = Mimic::new(
                required_attr(m, "joint")?,
                optional_f64(m, "multiplier")?.unwrap_or(1.0),
                optional_f64(m, "offset")?.unwrap_or(0.0),
            );
            joint = joint.with_mimic(in_element(mimic, m)?);
        }
        if let Some(s) = node.child("safety_controller") {
            let safety = SafetyController::new(
                optional_f64(s, "soft_lower_limit")?,
                optional_f64(s, "soft_upper_limit")?,
                optional_f64(s, "k_position")?.unwrap_or(0.0),
                required_f64(s, "k_velocity")?,
            );
            joint = joint.with_safety_controller(in_element(safety, s)?);
        }

        Ok(joint)
    }
}

fn parse_limit<'a, N: XmlNode<'a>>(node: N) -> Result<Limit> {
    let limit = Limit::new(
        optional_f64(node, "lower")?,
        optional_f64(node, "upper")?,
        required_f64(node, "effort")?,
        required_f64(node, "velocity")?,
    );
    in_element(limit, node)
}

fn link_reference<'a, N: XmlNode<'a>>(joint: N, tag: &'static str) -> Result<&'a str> {
    let node = joint
        .child(tag)
        .ok_or_else(|| UrdfError::missing_element(tag, describe(joint)))?;
    required_attr(node, "link")
}

fn parse_origin<'a, N: XmlNode<'a>>(node: Option<N>) -> Result<Pose> {
    let Some(node) = node else {
        return Ok(Pose::identity());
    };
    let xyz = optional_vector3(node, "xyz")?.unwrap_or_else(Vector3::zeros);
    let rpy = optional_vector3(node, "rpy")?.unwrap_or_else(Vector3::zeros);
    in_element(Pose::new(xyz, rpy), node)
}

// ============================================================================
// Helper functions
// ============================================================================

/// Element description for error messages: `joint 'elbow'` or `inertial`.
fn describe<'a, N: XmlNode<'a>>(node: N) -> String {
    match node.attribute("name") {
        Some(name) => format!("{} '{name}'", node.tag_name()),
        None => node.tag_name().to_string(),
    }
}

/// Attach the element's tag to a constructor failure.
fn in_element<'a, T, N: XmlNode<'a>>(
    value: std::result::Result<T, ValueError>,
    node: N,
) -> Result<T> {
    value.map_err(|e| UrdfError::from_value(e, node.tag_name()))
}

/// Get a required, non-empty attribute value.
fn required_attr<'a, N: XmlNode<'a>>(node: N, name: &'static str) -> Result<&'a str> {
    match node.attribute(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(UrdfError::missing_attribute(name, describe(node))),
    }
}

fn parse_f64<'a, N: XmlNode<'a>>(node: N, name: &'static str, text: &str) -> Result<f64> {
    text.trim().parse().map_err(|_| {
        UrdfError::invalid_value(name, node.tag_name(), text, "expected a number")
    })
}

fn optional_f64<'a, N: XmlNode<'a>>(node: N, name: &'static str) -> Result<Option<f64>> {
    node.attribute(name)
        .map(|text| parse_f64(node, name, text))
        .transpose()
}

fn required_f64<'a, N: XmlNode<'a>>(node: N, name: &'static str) -> Result<f64> {
    parse_f64(node, name, required_attr(node, name)?)
}

/// Parse exactly `K` whitespace-separated numbers.
fn parse_floats<'a, const K: usize, N: XmlNode<'a>>(
    node: N,
    name: &'static str,
    text: &str,
) -> Result<[f64; K]> {
    let mut out = [0.0; K];
    let mut count = 0;
    for part in text.split_whitespace() {
        if count == K {
            count += 1;
            break;
        }
        out[count] = parse_f64(node, name, part)?;
        count += 1;
    }
    if count != K {
        return Err(UrdfError::invalid_value(
            name,
            node.tag_name(),
            text,
            format!("expected {K} values"),
        ));
    }
    Ok(out)
}

fn optional_vector3<'a, N: XmlNode<'a>>(
    node: N,
    name: &'static str,
) -> Result<Option<Vector3<f64>>> {
    node.attribute(name)
        .map(|text| parse_floats::<3, N>(node, name, text).map(Vector3::from))
        .transpose()
}

fn required_vector3<'a, N: XmlNode<'a>>(node: N, name: &'static str) -> Result<Vector3<f64>> {
    let text = required_attr(node, name)?;
    parse_floats::<3, N>(node, name, text).map(Vector3::from)
}
