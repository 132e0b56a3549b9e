//! Tab and action resolution.
//!
//! [`resolve`] filters a descriptor's tabs and actions for one context and
//! returns them in declaration order. It is a pure function of its inputs:
//! no I/O, no shared mutable state, safe to call concurrently.

use serde::Serialize;

use crate::binder::{self, ParameterSet};
use crate::context::Context;
use crate::descriptor::{ActionDescriptor, CallSite, ResourceDescriptor, TabDescriptor};
use crate::predicate;

mod dispatch;

pub use dispatch::{Dispatch, plan_dispatch};

#[cfg(test)]
mod tests;

/// When action parameters are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
	/// Bind only when the action is triggered.
	#[default]
	Deferred,
	/// Bind every visible action during resolution.
	Eager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
	pub binding: BindMode,
}

impl ResolveOptions {
	pub fn eager() -> Self {
		Self { binding: BindMode::Eager }
	}
}

/// A visible action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAction<'d> {
	pub action: &'d ActionDescriptor,
	/// Present when resolved with [`BindMode::Eager`].
	#[serde(skip_serializing_if = "Option::is_none")]
	pub params: Option<ParameterSet>,
	/// Badge count to show until a refresh lands.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub badge: Option<u64>,
}

impl ResolvedAction<'_> {
	pub fn api(&self) -> &str {
		&self.action.api
	}
}

/// Visible tabs and actions of one descriptor for one context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedView<'d> {
	pub descriptor: &'d str,
	pub site: CallSite,
	pub tabs: Vec<&'d TabDescriptor>,
	pub actions: Vec<ResolvedAction<'d>>,
}

impl<'d> ResolvedView<'d> {
	pub fn tab(&self, name: &str) -> Option<&'d TabDescriptor> {
		self.tabs.iter().copied().find(|t| t.name == name)
	}

	pub fn action(&self, api: &str) -> Option<&ResolvedAction<'d>> {
		self.actions.iter().find(|a| a.action.api == api)
	}

	pub fn tab_names(&self) -> Vec<&'d str> {
		self.tabs.iter().map(|t| t.name.as_str()).collect()
	}

	pub fn action_apis(&self) -> Vec<&'d str> {
		self.actions.iter().map(|a| a.action.api.as_str()).collect()
	}

	/// Visible action descriptors, in order.
	pub fn action_descriptors(&self) -> impl Iterator<Item = &'d ActionDescriptor> + '_ {
		self.actions.iter().map(|a| a.action)
	}
}

/// Resolves at the call site implied by the context: record-level when it
/// carries a record, list-level otherwise. Binding is deferred.
pub fn resolve<'d>(descriptor: &'d ResourceDescriptor, ctx: &Context) -> ResolvedView<'d> {
	resolve_at(descriptor, ctx, site_of(ctx), ResolveOptions::default())
}

/// Resolves at an explicit call site.
pub fn resolve_at<'d>(descriptor: &'d ResourceDescriptor, ctx: &Context, site: CallSite, options: ResolveOptions) -> ResolvedView<'d> {
	let _span = tracing::debug_span!("resolve", descriptor = %descriptor.name, site = ?site).entered();

	let tabs = descriptor
		.tabs
		.iter()
		.filter(|tab| {
			let visible = predicate::evaluate(tab.show.as_ref(), ctx);
			tracing::trace!(tab = %tab.name, visible, "tab");
			visible
		})
		.collect();

	let actions = descriptor
		.actions
		.iter()
		.filter(|action| action.offered_at(site))
		.filter(|action| {
			let visible = predicate::evaluate(action.show.as_ref(), ctx);
			tracing::trace!(action = %action.api, visible, "action");
			visible
		})
		.map(|action| ResolvedAction {
			action,
			params: (options.binding == BindMode::Eager).then(|| binder::bind(action, ctx)),
			badge: action.badge().map(|b| b.default_count),
		})
		.collect();

	ResolvedView {
		descriptor: &descriptor.name,
		site,
		tabs,
		actions,
	}
}

/// Call site implied by the context.
pub fn site_of(ctx: &Context) -> CallSite {
	if ctx.record.is_some() { CallSite::Record } else { CallSite::List }
}
