//! URDF robot description parsing and kinematic tree validation.
//!
//! This crate parses [URDF](http://wiki.ros.org/urdf) (Unified Robot
//! Description Format) documents into an immutable [`Robot`] whose links and
//! joints are guaranteed to form a single tree. Renderers, simulators and
//! importers walk that tree from [`Robot::root_link`] through
//! [`Robot::children_of`].
//!
//! # Example
//!
//! ```
//! use urdf_tree::parse_urdf_str;
//!
//! let robot = parse_urdf_str(r#"
//!     <robot name="arm">
//!         <link name="base"/>
//!         <link name="arm"/>
//!         <joint name="j1" type="revolute">
//!             <parent link="base"/>
//!             <child link="arm"/>
//!             <limit lower="-1.57" upper="1.57" effort="10" velocity="1"/>
//!         </joint>
//!     </robot>
//! "#).expect("valid document");
//!
//! assert_eq!(robot.root_link().name(), "base");
//! let children: Vec<_> = robot.children_of("base").map(|(j, c)| (j.name(), c)).collect();
//! assert_eq!(children, [("j1", "arm")]);
//! ```
//!
//! # Pipeline
//!
//! Loading runs in two phases that can also be called separately:
//!
//! 1. [`parse_document`] reads links, joints and materials from any
//!    [`XmlNode`] into a [`RawRobot`]. Omitted optional elements get their
//!    format defaults here.
//! 2. [`build_robot`] resolves joint references and checks the tree
//!    invariants. The first violation is returned and no `Robot` is built.
//!
//! # Unrecognized elements
//!
//! By default unknown child elements are skipped with a `tracing` warning.
//! [`ParseConfig::strict`] turns them into [`UrdfError::UnrecognizedElement`].
//!
//! # Custom value types
//!
//! The checks in [`precondition`] are public so code building its own
//! value types can fail the same way the built-in ones do.
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the value model and config.
//!   Deserialized values go through the same validating constructors.
//! - `roxmltree`: [`XmlNode`] for `roxmltree::Node`

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::redundant_closure_for_method_calls,
    clippy::needless_pass_by_value,
    clippy::map_unwrap_or,
    clippy::option_if_let_else
)]

mod catalog;
mod config;
mod document;
mod elements;
mod error;
mod joint;
mod link;
mod parser;
pub mod precondition;
mod robot;
#[cfg(feature = "serde")]
mod serde_data;
mod tree;
mod writer;

pub use catalog::CatalogKey;
pub use config::{ParseConfig, ReferenceHandling};
pub use document::{MAX_DEPTH, XmlDocument, XmlElement, XmlNode};
pub use elements::{
    Axis, Calibration, Collision, Color, Dynamics, Geometry, Inertia, Inertial, Limit, Mass,
    Material, Mimic, Pose, SafetyController, Texture, Visual,
};
pub use error::{EntityKind, ErrorKind, Result, UrdfError};
pub use joint::{Joint, JointType, UnknownJointType};
pub use link::Link;
pub use parser::{RawRobot, parse_document};
pub use precondition::ValueError;
pub use robot::Robot;
pub use tree::build_robot;
pub use writer::to_urdf_string;

/// Parse a URDF string with default (lenient) settings.
///
/// # Example
///
/// ```
/// let robot = urdf_tree::parse_urdf_str(r#"<robot name="r"><link name="base"/></robot>"#)?;
/// assert_eq!(robot.link_count(), 1);
/// # Ok::<(), urdf_tree::UrdfError>(())
/// ```
pub fn parse_urdf_str(xml: &str) -> Result<Robot> {
    parse_urdf_str_with(xml, &ParseConfig::default())
}

/// Parse a URDF string with explicit settings.
pub fn parse_urdf_str_with(xml: &str, config: &ParseConfig) -> Result<Robot> {
    let doc = XmlDocument::parse(xml)?;
    load_robot(doc.root(), config)
}

/// Parse and validate a robot from an already-parsed document.
///
/// Use this with a document library of your own (for example `roxmltree`
/// behind the `roxmltree` feature) instead of the built-in [`XmlDocument`].
pub fn load_robot<'a, N: XmlNode<'a>>(root: N, config: &ParseConfig) -> Result<Robot> {
    build_robot(parse_document(root, config)?)
}
