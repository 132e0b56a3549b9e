//! Load-time descriptor checks.
//!
//! Resolution assumes these hold; the store refuses any descriptor that fails
//! them.

use rustc_hash::FxHashSet;

use super::{ActionDescriptor, ResourceDescriptor};
use crate::error::DescriptorError;

impl ResourceDescriptor {
	/// Checks structural invariants, returning the first violation.
	pub fn validate(&self) -> Result<(), DescriptorError> {
		if self.name.trim().is_empty() {
			return Err(DescriptorError::EmptyName);
		}

		let mut tabs = FxHashSet::default();
		for tab in &self.tabs {
			if !tabs.insert(tab.name.as_str()) {
				return Err(DescriptorError::DuplicateTab { name: tab.name.clone() });
			}
		}

		let mut apis = FxHashSet::default();
		for action in &self.actions {
			validate_action(action)?;
			if !apis.insert(action.api.as_str()) {
				return Err(DescriptorError::DuplicateAction { api: action.api.clone() });
			}
		}

		Ok(())
	}
}

fn validate_action(action: &ActionDescriptor) -> Result<(), DescriptorError> {
	if action.api.trim().is_empty() {
		return Err(DescriptorError::EmptyApi);
	}
	if action.scopes().is_empty() {
		return Err(DescriptorError::NoScope { api: action.api.clone() });
	}
	if action.popup && action.component.is_none() {
		return Err(DescriptorError::PopupWithoutComponent { api: action.api.clone() });
	}

	let mut args = FxHashSet::default();
	for arg in &action.args {
		if !args.insert(arg.as_str()) {
			return Err(DescriptorError::DuplicateArgument {
				api: action.api.clone(),
				arg: arg.clone(),
			});
		}
	}
	if let Some(arg) = action.mapping.keys().find(|k| !args.contains(k.as_str())) {
		return Err(DescriptorError::UnknownMappedArgument {
			api: action.api.clone(),
			arg: arg.clone(),
		});
	}

	Ok(())
}
