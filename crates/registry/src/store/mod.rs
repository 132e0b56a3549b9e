//! Descriptor store construction and lookup.
//!
//! Descriptors are registered on a [`DescriptorStoreBuilder`], validated as
//! they arrive, and frozen into a [`DescriptorStore`]. A rejected descriptor
//! never affects the others. The built store is immutable; share it behind an
//! `Arc` and read it from any thread without locking.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::builtins;
use crate::descriptor::ResourceDescriptor;
use crate::error::StoreError;

mod load;

pub use load::StoreLoadReport;


/// Collects and validates descriptors before the store is frozen.
#[derive(Debug, Default)]
pub struct DescriptorStoreBuilder {
	table: Vec<Arc<ResourceDescriptor>>,
	by_name: FxHashMap<String, usize>,
}

impl DescriptorStoreBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Validates and registers a parsed descriptor.
	pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<(), StoreError> {
		if let Err(reason) = descriptor.validate() {
			tracing::warn!(descriptor = %descriptor.name, %reason, "rejecting malformed descriptor");
			return Err(StoreError::malformed(descriptor.name, reason));
		}
		if self.by_name.contains_key(&descriptor.name) {
			tracing::warn!(descriptor = %descriptor.name, "rejecting duplicate descriptor");
			return Err(StoreError::Duplicate(descriptor.name));
		}

		tracing::debug!(
			descriptor = %descriptor.name,
			tabs = descriptor.tabs.len(),
			actions = descriptor.actions.len(),
			"registered descriptor",
		);
		self.by_name.insert(descriptor.name.clone(), self.table.len());
		self.table.push(Arc::new(descriptor));
		Ok(())
	}

	/// Parses, validates and registers a JSON descriptor. `source` names the
	/// origin in diagnostics when the document cannot be parsed.
	pub fn register_json(&mut self, source: &str, json: &str) -> Result<(), StoreError> {
		match ResourceDescriptor::parse(json) {
			Ok(descriptor) => self.register(descriptor),
			Err(reason) => {
				tracing::warn!(source, %reason, "rejecting unparsable descriptor");
				Err(StoreError::malformed(source, reason))
			}
		}
	}

	/// Registers every descriptor shipped with the crate.
	pub fn register_builtins(&mut self) -> Result<(), StoreError> {
		for (source, json) in builtins::ALL {
			self.register_json(source, json)?;
		}
		Ok(())
	}

	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Freezes the registered descriptors.
	pub fn build(self) -> DescriptorStore {
		tracing::info!(descriptors = self.table.len(), "descriptor store built");
		DescriptorStore {
			table: self.table.into(),
			by_name: self.by_name,
		}
	}
}

/// Read-only registry of validated descriptors, in registration order.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
	table: Arc<[Arc<ResourceDescriptor>]>,
	by_name: FxHashMap<String, usize>,
}

impl DescriptorStore {
	pub fn builder() -> DescriptorStoreBuilder {
		DescriptorStoreBuilder::new()
	}

	/// Store holding only the builtin descriptors.
	pub fn with_builtins() -> Result<Self, StoreError> {
		let mut builder = DescriptorStoreBuilder::new();
		builder.register_builtins()?;
		Ok(builder.build())
	}

	pub fn get(&self, name: &str) -> Option<&ResourceDescriptor> {
		self.by_name.get(name).map(|&idx| self.table[idx].as_ref())
	}

	/// Shared handle to a descriptor, for callers that outlive the store borrow.
	pub fn get_arc(&self, name: &str) -> Option<Arc<ResourceDescriptor>> {
		self.by_name.get(name).map(|&idx| Arc::clone(&self.table[idx]))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
		self.table.iter().map(AsRef::as_ref)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.iter().map(|d| d.name.as_str())
	}

	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}
}
