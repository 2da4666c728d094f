//! Error types for URDF parsing and kinematic tree construction.

use std::fmt;

use thiserror::Error;

use crate::precondition::ValueError;

/// Named entity kinds that must have unique names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A `<link>`.
    Link,
    /// A `<joint>`.
    Joint,
    /// A top-level `<material>`.
    Material,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Link => "link",
            Self::Joint => "joint",
            Self::Material => "material",
        })
    }
}

/// Flat classification of [`UrdfError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The text was not well-formed XML.
    XmlSyntax,
    /// A required attribute is absent or empty.
    MissingRequiredAttribute,
    /// A required child element is absent.
    MissingRequiredChildElement,
    /// Numeric text or an enumerated tag could not be parsed.
    InvalidNumericValue,
    /// A parsed value violates its range.
    OutOfRangeValue,
    /// Two entities of one kind share a name.
    DuplicateName,
    /// A joint names a link that does not exist.
    UnresolvedReference,
    /// The parent graph contains a cycle.
    CyclicStructure,
    /// A link is the child of more than one joint.
    MultipleParentsForLink,
    /// The links do not form exactly one tree.
    DisconnectedOrMultipleRoots,
    /// A range check was requested with inverted bounds.
    InvalidConfiguration,
    /// Strict mode met an element it does not know.
    UnrecognizedElement,
}

/// Errors that can occur while parsing a document or building its tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UrdfError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlSyntax(String),

    /// Missing required attribute.
    #[error("missing required attribute: {attribute} on {element}")]
    MissingRequiredAttribute {
        /// The missing attribute name.
        attribute: &'static str,
        /// The element that should have the attribute.
        element: String,
    },

    /// Missing required child element.
    #[error("missing required element: {element} in {context}")]
    MissingRequiredChildElement {
        /// The missing element name.
        element: &'static str,
        /// Where the element was expected.
        context: String,
    },

    /// Text that should be a number or a known tag.
    #[error("invalid value for {attribute} on {element}: {value:?} ({message})")]
    InvalidNumericValue {
        /// The attribute holding the text.
        attribute: &'static str,
        /// The element containing the attribute.
        element: String,
        /// The offending text.
        value: String,
        /// What was expected.
        message: String,
    },

    /// A parsed value outside the range its type allows.
    #[error("value out of range for {attribute} on {element}: {message}")]
    OutOfRangeValue {
        /// The attribute holding the value.
        attribute: &'static str,
        /// The element containing the attribute.
        element: String,
        /// Description of the violated bound.
        message: String,
    },

    /// Duplicate entity name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// Which kind of entity collided.
        kind: EntityKind,
        /// The colliding name.
        name: String,
    },

    /// Reference to undefined link.
    #[error("reference to undefined link: {link} in joint {joint}")]
    UnresolvedReference {
        /// The joint holding the reference.
        joint: String,
        /// The link name that was referenced.
        link: String,
    },

    /// Kinematic loop detected.
    #[error("kinematic loop through joints {joints:?}")]
    CyclicStructure {
        /// Joints on the loop, in parent-to-child order.
        joints: Vec<String>,
    },

    /// A link with more than one parent joint.
    #[error("link {link} is the child of multiple joints: {joints:?}")]
    MultipleParentsForLink {
        /// The link with too many parents.
        link: String,
        /// Every joint naming it as child, in document order.
        joints: Vec<String>,
    },

    /// Not exactly one kinematic tree.
    #[error("links do not form a single tree: {links:?}")]
    DisconnectedOrMultipleRoots {
        /// Root candidates, or links unreachable from the root.
        links: Vec<String>,
    },

    /// A defect in how a check was configured, not in the document.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Unknown element rejected in strict mode.
    #[error("unrecognized element {element} in {context}")]
    UnrecognizedElement {
        /// The unknown tag.
        element: String,
        /// The enclosing element.
        context: String,
    },
}

impl UrdfError {
    /// The kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::XmlSyntax(_) => ErrorKind::XmlSyntax,
            Self::MissingRequiredAttribute { .. } => ErrorKind::MissingRequiredAttribute,
            Self::MissingRequiredChildElement { .. } => ErrorKind::MissingRequiredChildElement,
            Self::InvalidNumericValue { .. } => ErrorKind::InvalidNumericValue,
            Self::OutOfRangeValue { .. } => ErrorKind::OutOfRangeValue,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            Self::CyclicStructure { .. } => ErrorKind::CyclicStructure,
            Self::MultipleParentsForLink { .. } => ErrorKind::MultipleParentsForLink,
            Self::DisconnectedOrMultipleRoots { .. } => ErrorKind::DisconnectedOrMultipleRoots,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::UnrecognizedElement { .. } => ErrorKind::UnrecognizedElement,
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(attribute: &'static str, element: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute,
            element: element.into(),
        }
    }

    /// Create a missing element error.
    pub fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingRequiredChildElement {
            element,
            context: context.into(),
        }
    }

    /// Create an invalid numeric value error.
    pub fn invalid_value(
        attribute: &'static str,
        element: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidNumericValue {
            attribute,
            element: element.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create an undefined link error.
    pub fn unresolved(joint: impl Into<String>, link: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            joint: joint.into(),
            link: link.into(),
        }
    }

    /// Attach element context to a failed constructor precondition.
    pub fn from_value(err: ValueError, element: impl Into<String>) -> Self {
        match err {
            ValueError::Null { param } | ValueError::Empty { param } => {
                Self::missing_attribute(param, element)
            }
            ValueError::OutOfRange { param, .. } => Self::OutOfRangeValue {
                attribute: param,
                element: element.into(),
                message: err.to_string(),
            },
            ValueError::InvalidRange { .. } => Self::InvalidConfiguration(err.to_string()),
        }
    }
}

/// Result type for URDF operations.
pub type Result<T> = std::result::Result<T, UrdfError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UrdfError::missing_element("limit", "joint 'j1'");
        assert!(err.to_string().contains("limit"));
        assert!(err.to_string().contains("j1"));
        assert_eq!(err.kind(), ErrorKind::MissingRequiredChildElement);
    }

    #[test]
    fn test_duplicate_name_mentions_kind() {
        let err = UrdfError::DuplicateName {
            kind: EntityKind::Joint,
            name: "elbow".into(),
        };
        assert_eq!(err.to_string(), "duplicate joint name: elbow");
    }

    #[test]
    fn test_value_error_mapping() {
        let err = UrdfError::from_value(ValueError::Empty { param: "name" }, "link");
        assert_eq!(err, UrdfError::missing_attribute("name", "link"));

        let err = UrdfError::from_value(
            ValueError::OutOfRange {
                param: "value",
                value: -1.0,
                lower: 0.0,
                upper: f64::MAX,
            },
            "mass",
        );
        assert_eq!(err.kind(), ErrorKind::OutOfRangeValue);
        assert!(err.to_string().contains("mass"));
        assert!(err.to_string().contains("value"));

        let err = UrdfError::from_value(
            ValueError::InvalidRange {
                param: "upper",
                lower: 1.0,
                upper: 0.0,
            },
            "limit",
        );
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_unresolved_reference() {
        let err = UrdfError::unresolved("joint1", "missing_link");
        assert!(err.to_string().contains("missing_link"));
        assert!(err.to_string().contains("joint1"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<UrdfError>();
    }
}
