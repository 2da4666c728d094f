//! Parser settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the parser treats elements it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReferenceHandling {
    /// Unknown child elements are an error.
    Strict,
    /// Unknown child elements are skipped with a warning.
    #[default]
    Lenient,
}

/// Settings for [`crate::parse_document`] and the string entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseConfig {
    /// Treatment of unrecognized elements (default: lenient).
    pub reference_handling: ReferenceHandling,
}

impl ParseConfig {
    /// Create a config with default (lenient) settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that rejects unknown elements.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().with_reference_handling(ReferenceHandling::Strict)
    }

    /// Set how unknown elements are handled.
    #[must_use]
    pub fn with_reference_handling(mut self, handling: ReferenceHandling) -> Self {
        self.reference_handling = handling;
        self
    }

    /// Whether unknown elements are rejected.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.reference_handling == ReferenceHandling::Strict
    }
}
