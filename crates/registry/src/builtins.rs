//! Descriptors shipped with the crate.

use crate::descriptor::ResourceDescriptor;
use crate::error::DescriptorError;

/// Source of the Project descriptor.
pub const PROJECT_JSON: &str = include_str!("../descriptors/project.json");

/// Every builtin descriptor source, keyed by a display name for diagnostics.
pub const ALL: &[(&str, &str)] = &[("builtin:project", PROJECT_JSON)];

/// Parses the builtin Project descriptor.
pub fn project() -> Result<ResourceDescriptor, DescriptorError> {
	ResourceDescriptor::from_json(PROJECT_JSON)
}
