//! Resource descriptor registry and resolution engine.
//!
//! A resource descriptor declares what the console shows for one resource
//! type: list columns, search filters, detail fields, tabs and actions. This
//! crate interprets descriptors against a runtime [`Context`]:
//!
//! - [`store`] loads, validates and freezes descriptors
//! - [`predicate`] evaluates visibility predicates, failing closed
//! - [`binder`] materializes action parameters
//! - [`resolver`] picks the visible tabs and actions and plans dispatch
//!
//! Everything here is synchronous and free of I/O except directory loading.
//! Badge counts live in a separate crate because they need a transport.

pub mod binder;
pub mod builtins;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod predicate;
pub mod resolver;
pub mod store;

pub use binder::{ArgSource, BoundArg, Invocation, ParameterSet, bind};
pub use context::{Context, FieldRef, MissingContext, Record, RoleType, RouteContext, UserContext, UserField};
pub use descriptor::{
	ActionDescriptor, BadgeSpec, CallSite, MappingEntry, MappingExpr, ResourceDescriptor, ScopeSet, TabDescriptor, ViewRef,
};
pub use error::{DescriptorError, StoreError, UnresolvedArguments};
pub use predicate::{Predicate, evaluate};
pub use resolver::{BindMode, Dispatch, ResolveOptions, ResolvedAction, ResolvedView, plan_dispatch, resolve, resolve_at, site_of};
pub use store::{DescriptorStore, DescriptorStoreBuilder, StoreLoadReport};
