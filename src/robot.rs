//! The validated robot model.

use std::collections::HashMap;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::catalog::CatalogKey;
use crate::elements::{Material, Visual};
use crate::joint::Joint;
use crate::link::Link;

/// A parent-to-child edge of the kinematic tree, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub(crate) struct Edge {
    pub(crate) joint: usize,
    pub(crate) child: usize,
}

/// A robot whose links and joints form exactly one tree.
///
/// Only [`crate::build_robot`] creates these, so every instance satisfies
/// the tree invariants: unique names, resolved references, a single root,
/// one parent per non-root link, and no cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Robot {
    name: String,
    links: Vec<Link>,
    joints: Vec<Joint>,
    materials: Vec<Material>,
    link_index: HashMap<String, usize>,
    joint_index: HashMap<String, usize>,
    root: usize,
    parent_joint: Vec<Option<usize>>,
    children: Vec<Vec<Edge>>,
}

impl Robot {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        links: Vec<Link>,
        joints: Vec<Joint>,
        materials: Vec<Material>,
        link_index: HashMap<String, usize>,
        joint_index: HashMap<String, usize>,
        root: usize,
        parent_joint: Vec<Option<usize>>,
        children: Vec<Vec<Edge>>,
    ) -> Self {
        Self {
            name,
            links,
            joints,
            materials,
            link_index,
            joint_index,
            root,
            parent_joint,
            children,
        }
    }

    /// Robot name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a link by name.
    #[must_use]
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.link_index.get(name).map(|&i| &self.links[i])
    }

    /// Get a joint by name.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joint_index.get(name).map(|&i| &self.joints[i])
    }

    /// The single link that is nobody's child.
    #[must_use]
    pub fn root_link(&self) -> &Link {
        &self.links[self.root]
    }

    /// Joints leaving `link` with their child link names, in document order.
    ///
    /// Empty for leaf links and for names that are not links of this robot.
    pub fn children_of<'s>(
        &'s self,
        link: &str,
    ) -> impl Iterator<Item = (&'s Joint, &'s str)> + use<'s> {
        let edges: &'s [Edge] = self
            .link_index
            .get(link)
            .map(|&i| self.children[i].as_slice())
            .unwrap_or_default();
        edges
            .iter()
            .map(|e| (&self.joints[e.joint], self.links[e.child].name()))
    }

    /// The joint whose child is `link`; `None` for the root or unknown names.
    #[must_use]
    pub fn parent_joint(&self, link: &str) -> Option<&Joint> {
        let i = *self.link_index.get(link)?;
        self.parent_joint[i].map(|j| &self.joints[j])
    }

    /// The parent link of `link`; `None` for the root or unknown names.
    #[must_use]
    pub fn parent_link(&self, link: &str) -> Option<&Link> {
        self.parent_joint(link)
            .and_then(|joint| self.link(joint.parent()))
    }

    /// All links in document order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// All joints in document order.
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Links in depth-first pre-order from the root, children in document order.
    #[must_use]
    pub fn depth_first(&self) -> Vec<&Link> {
        let mut order = Vec::with_capacity(self.links.len());
        let mut stack = vec![self.root];
        while let Some(i) = stack.pop() {
            order.push(&self.links[i]);
            stack.extend(self.children[i].iter().rev().map(|e| e.child));
        }
        order
    }

    /// The material catalog.
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Look up a catalog material by name.
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name() == name)
    }

    /// The material a visual renders with.
    ///
    /// A visual that only names its material resolves through the catalog;
    /// one that defines color or texture inline uses its own definition.
    #[must_use]
    pub fn resolve_material<'s>(&'s self, visual: &'s Visual) -> Option<&'s Material> {
        let material = visual.material()?;
        if material.is_reference() {
            self.material(material.name())
        } else {
            Some(material)
        }
    }

    /// Sum of all link masses in kilograms.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.links.iter().map(|l| l.inertial().mass().value()).sum()
    }

    /// Identifying pair for metadata catalogs.
    #[must_use]
    pub fn catalog_key(&self, source: impl Into<PathBuf>) -> CatalogKey {
        CatalogKey::new(self.name.clone(), source)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::parse_urdf_str;
    use approx::assert_relative_eq;

    const ARM: &str = r#"
        <robot name="arm">
            <material name="grey"><color rgba="0.5 0.5 0.5 1"/></material>
            <link name="base">
                <inertial>
                    <mass value="2"/>
                    <inertia ixx="1" ixy="0" ixz="0" iyy="1" iyz="0" izz="1"/>
                </inertial>
                <visual>
                    <geometry><box size="1 1 1"/></geometry>
                    <material name="grey"/>
                </visual>
            </link>
            <link name="upper">
                <inertial>
                    <mass value="1.5"/>
                    <inertia ixx="1" ixy="0" ixz="0" iyy="1" iyz="0" izz="1"/>
                </inertial>
            </link>
            <link name="lower"/>
            <link name="tool"/>
            <joint name="shoulder" type="continuous">
                <parent link="base"/><child link="upper"/>
            </joint>
            <joint name="elbow" type="continuous">
                <parent link="upper"/><child link="lower"/>
            </joint>
            <joint name="mount" type="fixed">
                <parent link="base"/><child link="tool"/>
            </joint>
        </robot>
    "#;

    #[test]
    fn test_lookup_by_name() {
        let robot = parse_urdf_str(ARM).unwrap();
        assert_eq!(robot.name(), "arm");
        assert_eq!(robot.link("upper").unwrap().name(), "upper");
        assert_eq!(robot.joint("elbow").unwrap().parent(), "upper");
        assert!(robot.link("elbow").is_none());
        assert!(robot.joint("missing").is_none());
    }

    #[test]
    fn test_children_in_document_order() {
        let robot = parse_urdf_str(ARM).unwrap();
        let children: Vec<_> = robot
            .children_of("base")
            .map(|(j, c)| (j.name(), c))
            .collect();
        assert_eq!(children, [("shoulder", "upper"), ("mount", "tool")]);
        assert_eq!(robot.children_of("tool").count(), 0);
        assert_eq!(robot.children_of("nope").count(), 0);
    }

    #[test]
    fn test_parents() {
        let robot = parse_urdf_str(ARM).unwrap();
        assert!(robot.parent_joint("base").is_none());
        assert_eq!(robot.parent_joint("lower").unwrap().name(), "elbow");
        assert_eq!(robot.parent_link("lower").unwrap().name(), "upper");
        assert!(robot.parent_link("unknown").is_none());
    }

    #[test]
    fn test_depth_first_order() {
        let robot = parse_urdf_str(ARM).unwrap();
        let order: Vec<_> = robot.depth_first().iter().map(|l| l.name()).collect();
        assert_eq!(order, ["base", "upper", "lower", "tool"]);
    }

    #[test]
    fn test_materials_and_mass() {
        let robot = parse_urdf_str(ARM).unwrap();
        let visual = &robot.link("base").unwrap().visuals()[0];
        let material = robot.resolve_material(visual).unwrap();
        assert_eq!(material.color().unwrap().rgba(), [0.5, 0.5, 0.5, 1.0]);
        assert_relative_eq!(robot.total_mass(), 3.5);
    }

    #[test]
    fn test_catalog_key() {
        let robot = parse_urdf_str(ARM).unwrap();
        let key = robot.catalog_key("robots/arm.urdf");
        assert_eq!(key.robot_name(), "arm");
        assert_eq!(key.source(), std::path::Path::new("robots/arm.urdf"));
    }
}
