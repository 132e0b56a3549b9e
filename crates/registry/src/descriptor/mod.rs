//! Resource descriptor data model.
//!
//! A [`ResourceDescriptor`] is the static definition of one console resource:
//! its list columns, search filters, detail fields, tabs and actions. It is
//! parsed from JSON, validated once by [`ResourceDescriptor::validate`] and
//! then shared read-only through the store.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::FieldRef;
use crate::error::DescriptorError;
use crate::predicate::Predicate;

mod validate;


/// Opaque handle to a view component, resolved by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewRef(String);

impl ViewRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ViewRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Where a resolution call is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallSite {
	/// Resource list, no record selected.
	List,
	/// Detail view of a single record.
	Record,
}

impl CallSite {
	pub const fn as_set(self) -> ScopeSet {
		match self {
			Self::List => ScopeSet::LIST,
			Self::Record => ScopeSet::RECORD,
		}
	}
}

bitflags::bitflags! {
	/// Call sites an action is offered at.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct ScopeSet: u8 {
		/// `listView`
		const LIST = 1 << 0;
		/// `dataView`
		const RECORD = 1 << 1;
	}
}

impl From<CallSite> for ScopeSet {
	fn from(site: CallSite) -> Self {
		site.as_set()
	}
}

/// A named sub-view of the resource's detail display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabDescriptor {
	pub name: String,
	pub component: ViewRef,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub show: Option<Predicate>,
}

/// Computed source for one action argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingExpr {
	/// Read a field from the context.
	Field(FieldRef),
	/// A fixed value.
	Literal(Value),
}

/// Mapping entry for one argument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingEntry {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<MappingExpr>,
	/// Permitted values offered when the argument stays unresolved.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<Value>,
}

/// Badge shown on an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSpec {
	/// Count displayed until the first refresh completes.
	pub default_count: u64,
}

/// A user-triggerable operation bound to a remote API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionDescriptor {
	pub api: String,
	pub icon: String,
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc_help: Option<String>,
	#[serde(default)]
	pub list_view: bool,
	#[serde(default)]
	pub data_view: bool,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub args: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub show: Option<Predicate>,
	/// Static parameters and argument defaults.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub param: IndexMap<String, Value>,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub mapping: IndexMap<String, MappingEntry>,
	#[serde(default)]
	pub show_badge: bool,
	#[serde(default)]
	pub badge_num: u64,
	#[serde(default)]
	pub popup: bool,
	/// Confirmation message key shown before execution.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// View opened for popup actions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub component: Option<ViewRef>,
}

impl ActionDescriptor {
	pub fn scopes(&self) -> ScopeSet {
		let mut set = ScopeSet::empty();
		set.set(ScopeSet::LIST, self.list_view);
		set.set(ScopeSet::RECORD, self.data_view);
		set
	}

	/// Whether this action is offered at `site`.
	pub fn offered_at(&self, site: CallSite) -> bool {
		self.scopes().contains(site.as_set())
	}

	pub fn badge(&self) -> Option<BadgeSpec> {
		self.show_badge.then_some(BadgeSpec {
			default_count: self.badge_num,
		})
	}
}

/// Static definition of one console resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceDescriptor {
	pub name: String,
	pub title: String,
	pub icon: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc_help: Option<String>,
	/// APIs the user must hold before the resource is offered at all.
	#[serde(default)]
	pub permission: Vec<String>,
	pub resource_type: String,
	#[serde(default)]
	pub columns: Vec<String>,
	#[serde(default)]
	pub search_filters: Vec<String>,
	#[serde(default)]
	pub details: Vec<String>,
	#[serde(default)]
	pub tabs: Vec<TabDescriptor>,
	#[serde(default)]
	pub actions: Vec<ActionDescriptor>,
}

impl ResourceDescriptor {
	/// Parses and validates a JSON descriptor document.
	pub fn from_json(src: &str) -> Result<Self, DescriptorError> {
		let descriptor = Self::parse(src)?;
		descriptor.validate()?;
		Ok(descriptor)
	}

	/// Parses without validating.
	pub(crate) fn parse(src: &str) -> Result<Self, DescriptorError> {
		serde_json::from_str(src).map_err(|e| DescriptorError::Parse(e.to_string()))
	}

	pub fn tab(&self, name: &str) -> Option<&TabDescriptor> {
		self.tabs.iter().find(|t| t.name == name)
	}

	pub fn action(&self, api: &str) -> Option<&ActionDescriptor> {
		self.actions.iter().find(|a| a.api == api)
	}
}
