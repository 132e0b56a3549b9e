use std::path::PathBuf;

/// Reason a descriptor was rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
	#[error("invalid descriptor document: {0}")]
	Parse(String),
	#[error("descriptor has an empty name")]
	EmptyName,
	#[error("action has an empty api name")]
	EmptyApi,
	#[error("action '{api}' sets neither listView nor dataView")]
	NoScope { api: String },
	#[error("tab '{name}' is declared more than once")]
	DuplicateTab { name: String },
	#[error("action '{api}' is declared more than once")]
	DuplicateAction { api: String },
	#[error("action '{api}' declares argument '{arg}' more than once")]
	DuplicateArgument { api: String, arg: String },
	#[error("action '{api}' maps '{arg}', which is not a declared argument")]
	UnknownMappedArgument { api: String, arg: String },
	#[error("action '{api}' is a popup but sets no component")]
	PopupWithoutComponent { api: String },
}

/// Descriptor store load and registration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	#[error("malformed descriptor '{descriptor}': {reason}")]
	Malformed { descriptor: String, reason: DescriptorError },
	#[error("descriptor '{0}' is already registered")]
	Duplicate(String),
	#[error("failed to read {path}: {message}")]
	Io { path: PathBuf, message: String },
}

impl StoreError {
	pub(crate) fn malformed(descriptor: impl Into<String>, reason: DescriptorError) -> Self {
		Self::Malformed {
			descriptor: descriptor.into(),
			reason,
		}
	}
}

/// An action was triggered while some of its arguments had no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("action '{api}' is missing arguments: {}", missing.join(", "))]
pub struct UnresolvedArguments {
	pub api: String,
	pub missing: Vec<String>,
}
