//! URDF serialization.
//!
//! Emits a document that parses back into an equal [`Robot`]. Optional
//! values that were absent stay absent; defaults filled in by the parser
//! are written out explicitly.

use std::fmt::Write;

use nalgebra::Vector3;
use quick_xml::escape::escape;

use crate::elements::{Collision, Geometry, Inertial, Material, Pose, Visual};
use crate::joint::Joint;
use crate::link::Link;
use crate::robot::Robot;

/// Serialize a robot to URDF XML.
#[must_use]
pub fn to_urdf_string(robot: &Robot) -> String {
    let mut writer = UrdfWriter::default();
    writer.write_robot(robot);
    writer.output
}

#[derive(Default)]
struct UrdfWriter {
    output: String,
    indent: usize,
}

impl UrdfWriter {
    fn write_robot(&mut self, robot: &Robot) {
        self.write_line(r#"<?xml version="1.0"?>"#);
        self.write_line(&format!(r#"<robot name="{}">"#, escape(robot.name())));
        self.indent += 1;

        for material in robot.materials() {
            self.write_material(material);
        }
        for link in robot.links() {
            self.write_link(link);
        }
        for joint in robot.joints() {
            self.write_joint(joint);
        }

        self.indent -= 1;
        self.write_line("</robot>");
    }

    // ------------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------------

    fn write_link(&mut self, link: &Link) {
        let open = format!(r#"<link name="{}""#, escape(link.name()));
        let has_inertial = *link.inertial() != Inertial::default();
        if !has_inertial && link.visuals().is_empty() && link.collisions().is_empty() {
            self.write_line(&format!("{open}/>"));
            return;
        }

        self.write_line(&format!("{open}>"));
        self.indent += 1;
        if has_inertial {
            self.write_inertial(link.inertial());
        }
        for visual in link.visuals() {
            self.write_visual(visual);
        }
        for collision in link.collisions() {
            self.write_collision(collision);
        }
        self.indent -= 1;
        self.write_line("</link>");
    }

    fn write_inertial(&mut self, inertial: &Inertial) {
        let i = inertial.inertia();
        self.write_line("<inertial>");
        self.indent += 1;
        self.write_origin(inertial.origin());
        self.write_line(&format!(
            r#"<mass value="{}"/>"#,
            inertial.mass().value()
        ));
        self.write_line(&format!(
            r#"<inertia ixx="{}" ixy="{}" ixz="{}" iyy="{}" iyz="{}" izz="{}"/>"#,
            i.ixx(),
            i.ixy(),
            i.ixz(),
            i.iyy(),
            i.iyz(),
            i.izz()
        ));
        self.indent -= 1;
        self.write_line("</inertial>");
    }

    fn write_visual(&mut self, visual: &Visual) {
        self.write_line(&format!("<visual{}>", name_attr(visual.name())));
        self.indent += 1;
        self.write_origin(visual.origin());
        self.write_geometry(visual.geometry());
        if let Some(material) = visual.material() {
            self.write_material(material);
        }
        self.indent -= 1;
        self.write_line("</visual>");
    }

    fn write_collision(&mut self, collision: &Collision) {
        self.write_line(&format!("<collision{}>", name_attr(collision.name())));
        self.indent += 1;
        self.write_origin(collision.origin());
        self.write_geometry(collision.geometry());
        self.indent -= 1;
        self.write_line("</collision>");
    }

    fn write_geometry(&mut self, geometry: &Geometry) {
        let shape = match geometry {
            Geometry::Box { size } => format!(r#"<box size="{}"/>"#, triple(size)),
            Geometry::Cylinder { radius, length } => {
                format!(r#"<cylinder radius="{radius}" length="{length}"/>"#)
            }
            Geometry::Sphere { radius } => format!(r#"<sphere radius="{radius}"/>"#),
            Geometry::Mesh { filename, scale } => {
                let mut attrs = format!(r#"filename="{}""#, escape(filename.as_str()));
                if let Some(scale) = scale {
                    write!(attrs, r#" scale="{}""#, triple(scale)).ok();
                }
                format!("<mesh {attrs}/>")
            }
        };
        self.write_line("<geometry>");
        self.indent += 1;
        self.write_line(&shape);
        self.indent -= 1;
        self.write_line("</geometry>");
    }

    fn write_material(&mut self, material: &Material) {
        let open = format!(r#"<material name="{}""#, escape(material.name()));
        if material.is_reference() {
            self.write_line(&format!("{open}/>"));
            return;
        }
        self.write_line(&format!("{open}>"));
        self.indent += 1;
        if let Some(color) = material.color() {
            let [r, g, b, a] = color.rgba();
            self.write_line(&format!(r#"<color rgba="{r} {g} {b} {a}"/>"#));
        }
        if let Some(texture) = material.texture() {
            self.write_line(&format!(
                r#"<texture filename="{}"/>"#,
                escape(texture.filename())
            ));
        }
        self.indent -= 1;
        self.write_line("</material>");
    }

    // ------------------------------------------------------------------------
    // Joints
    // ------------------------------------------------------------------------

    fn write_joint(&mut self, joint: &Joint) {
        self.write_line(&format!(
            r#"<joint name="{}" type="{}">"#,
            escape(joint.name()),
            joint.joint_type()
        ));
        self.indent += 1;
        self.write_line(&format!(r#"<parent link="{}"/>"#, escape(joint.parent())));
        self.write_line(&format!(r#"<child link="{}"/>"#, escape(joint.child())));
        self.write_origin(joint.origin());

        if let Some(axis) = joint.axis() {
            self.write_line(&format!(r#"<axis xyz="{}"/>"#, triple(&axis.xyz())));
        }
        if let Some(c) = joint.calibration() {
            let mut attrs = String::new();
            optional_attr(&mut attrs, "rising", c.rising());
            optional_attr(&mut attrs, "falling", c.falling());
            self.write_line(&format!("<calibration{attrs}/>"));
        }
        if let Some(d) = joint.dynamics() {
            let mut attrs = String::new();
            optional_attr(&mut attrs, "damping", d.damping());
            optional_attr(&mut attrs, "friction", d.friction());
            self.write_line(&format!("<dynamics{attrs}/>"));
        }
        if let Some(limit) = joint.limit() {
            let mut attrs = String::new();
            optional_attr(&mut attrs, "lower", limit.lower());
            optional_attr(&mut attrs, "upper", limit.upper());
            self.write_line(&format!(
                r#"<limit{attrs} effort="{}" velocity="{}"/>"#,
                limit.effort(),
                limit.velocity()
            ));
        }
        if let Some(m) = joint.mimic() {
            self.write_line(&format!(
                r#"<mimic joint="{}" multiplier="{}" offset="{}"/>"#,
                escape(m.joint()),
                m.multiplier(),
                m.offset()
            ));
        }
        if let Some(s) = joint.safety_controller() {
            let mut attrs = String::new();
            optional_attr(&mut attrs, "soft_lower_limit", s.soft_lower_limit());
            optional_attr(&mut attrs, "soft_upper_limit", s.soft_upper_limit());
            self.write_line(&format!(
                r#"<safety_controller{attrs} k_position="{}" k_velocity="{}"/>"#,
                s.k_position(),
                s.k_velocity()
            ));
        }

        self.indent -= 1;
        self.write_line("</joint>");
    }

    /// Identity poses are left out; the parser restores them.
    fn write_origin(&mut self, pose: &Pose) {
        if pose.is_identity() {
            return;
        }
        self.write_line(&format!(
            r#"<origin xyz="{}" rpy="{}"/>"#,
            triple(&pose.xyz()),
            triple(&pose.rpy())
        ));
    }

    fn write_line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn triple(v: &Vector3<f64>) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

fn name_attr(name: Option<&str>) -> String {
    name.map(|n| format!(r#" name="{}""#, escape(n)))
        .unwrap_or_default()
}

fn optional_attr(attrs: &mut String, name: &str, value: Option<f64>) {
    if let Some(value) = value {
        write!(attrs, r#" {name}="{value}""#).ok();
    }
}
