//! Visibility predicates.
//!
//! Predicates are a closed set of tagged expressions over a [`Context`]. They
//! never perform I/O and never panic. Missing context (no record for a
//! `record.*` reference, an absent field) makes a sub-expression *unknown*;
//! combinators use three-valued logic so an unknown branch can still be
//! outvoted (`any` with a true branch, `all` with a false branch). An unknown
//! top-level result hides the affordance, and [`evaluate`] hides any
//! predicate that reads the record when there is no record at all.
//!
//! # Wire format
//!
//! ```json
//! { "any": [
//!     { "same": { "left": "record.account", "right": "user.account" } },
//!     { "roleIn": ["Admin", "DomainAdmin"] }
//! ] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::{Context, FieldRef, MissingContext, RoleType};


/// Result of evaluating a predicate: `Err` is the unknown state.
pub type Outcome = Result<bool, MissingContext>;

/// Visibility predicate expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
	Always,
	Never,
	/// Field equals a literal.
	Eq { field: FieldRef, value: Value },
	/// Field differs from a literal. Unknown when the field is absent.
	Ne { field: FieldRef, value: Value },
	/// Two fields hold equal values.
	Same { left: FieldRef, right: FieldRef },
	/// The user's role type is one of the listed roles.
	RoleIn(Vec<RoleType>),
	/// Field is present and not null.
	Present(FieldRef),
	All(Vec<Predicate>),
	Any(Vec<Predicate>),
	Not(Box<Predicate>),
}

impl Predicate {
	pub fn field_eq(field: &str, value: impl Into<Value>) -> Self {
		Self::Eq {
			field: FieldRef::record(field),
			value: value.into(),
		}
	}

	pub fn field_ne(field: &str, value: impl Into<Value>) -> Self {
		Self::Ne {
			field: FieldRef::record(field),
			value: value.into(),
		}
	}

	pub fn role_in(roles: impl IntoIterator<Item = RoleType>) -> Self {
		Self::RoleIn(roles.into_iter().collect())
	}

	/// Evaluates with three-valued semantics.
	pub fn check(&self, ctx: &Context) -> Outcome {
		match self {
			Self::Always => Ok(true),
			Self::Never => Ok(false),
			Self::Eq { field, value } => Ok(ctx.lookup(field)?.as_ref() == value),
			Self::Ne { field, value } => Ok(ctx.lookup(field)?.as_ref() != value),
			Self::Same { left, right } => {
				let left = ctx.lookup(left)?;
				let right = ctx.lookup(right)?;
				Ok(left == right)
			}
			Self::RoleIn(roles) => Ok(roles.contains(&ctx.user.roletype)),
			Self::Present(field) => match ctx.lookup(field) {
				Ok(value) => Ok(!value.is_null()),
				Err(MissingContext::NoRecord) => Err(MissingContext::NoRecord),
				Err(_) => Ok(false),
			},
			Self::All(items) => {
				let mut unknown = None;
				for item in items {
					match item.check(ctx) {
						Ok(false) => return Ok(false),
						Ok(true) => {}
						Err(missing) => {
							unknown.get_or_insert(missing);
						}
					}
				}
				unknown.map_or(Ok(true), Err)
			}
			Self::Any(items) => {
				let mut unknown = None;
				for item in items {
					match item.check(ctx) {
						Ok(true) => return Ok(true),
						Ok(false) => {}
						Err(missing) => {
							unknown.get_or_insert(missing);
						}
					}
				}
				unknown.map_or(Ok(false), Err)
			}
			Self::Not(inner) => inner.check(ctx).map(|v| !v),
		}
	}

	/// Whether any branch of this predicate references the record.
	pub fn reads_record(&self) -> bool {
		match self {
			Self::Always | Self::Never | Self::RoleIn(_) => false,
			Self::Eq { field, .. } | Self::Ne { field, .. } | Self::Present(field) => field.reads_record(),
			Self::Same { left, right } => left.reads_record() || right.reads_record(),
			Self::All(items) | Self::Any(items) => items.iter().any(Self::reads_record),
			Self::Not(inner) => inner.reads_record(),
		}
	}
}

/// Evaluates an optional predicate, failing closed.
///
/// An absent predicate is always visible. A predicate that reads the record
/// is `false` when the context has none, whatever its other branches say. Any
/// other unknown outcome is logged and reported as `false`.
pub fn evaluate(predicate: Option<&Predicate>, ctx: &Context) -> bool {
	let Some(predicate) = predicate else {
		return true;
	};
	if ctx.record.is_none() && predicate.reads_record() {
		tracing::debug!(reason = %MissingContext::NoRecord, "predicate failed closed");
		return false;
	}
	match predicate.check(ctx) {
		Ok(visible) => visible,
		Err(missing) => {
			tracing::debug!(reason = %missing, "predicate failed closed");
			false
		}
	}
}
