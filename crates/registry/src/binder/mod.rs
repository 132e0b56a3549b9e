//! Action argument binding.
//!
//! [`bind`] materializes the parameters of an action for one context. Each
//! declared argument is looked up through a fixed precedence chain:
//!
//! 1. mapping expression registered for the argument
//! 2. literal default from the static parameter map
//! 3. same-named field of the current record
//! 4. same-named route path parameter, then query parameter
//!
//! A mapping that cannot be evaluated falls through to the next source. When
//! nothing resolves an argument it is left [`BoundArg::Unresolved`]; the
//! binder never invents a value.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::{Context, MissingContext};
use crate::descriptor::{ActionDescriptor, MappingExpr};
use crate::error::UnresolvedArguments;

#[cfg(test)]
mod tests;

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArgSource {
	Mapping,
	Default,
	Record,
	RouteParam,
	Query,
}

/// Binding outcome for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BoundArg {
	Resolved { value: Value, source: ArgSource },
	/// No source produced a value. `options` lists permitted values, if the
	/// descriptor declared any.
	Unresolved {
		#[serde(skip_serializing_if = "Vec::is_empty")]
		options: Vec<Value>,
	},
}

impl BoundArg {
	pub fn value(&self) -> Option<&Value> {
		match self {
			Self::Resolved { value, .. } => Some(value),
			Self::Unresolved { .. } => None,
		}
	}

	pub fn source(&self) -> Option<ArgSource> {
		match self {
			Self::Resolved { source, .. } => Some(*source),
			Self::Unresolved { .. } => None,
		}
	}

	pub fn is_resolved(&self) -> bool {
		matches!(self, Self::Resolved { .. })
	}
}

/// Materialized parameters of one action.
///
/// Declared arguments come first in declaration order, followed by static
/// parameters that are not declared arguments.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ParameterSet {
	entries: IndexMap<String, BoundArg>,
}

impl ParameterSet {
	pub fn get(&self, name: &str) -> Option<&BoundArg> {
		self.entries.get(name)
	}

	/// Resolved value of `name`, if any.
	pub fn value(&self, name: &str) -> Option<&Value> {
		self.entries.get(name).and_then(BoundArg::value)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundArg)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Names of parameters that stayed unresolved, in order.
	pub fn unresolved(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().filter(|(_, v)| !v.is_resolved()).map(|(k, _)| k.as_str())
	}

	pub fn is_complete(&self) -> bool {
		self.entries.values().all(BoundArg::is_resolved)
	}

	/// Resolved values only, as a JSON object.
	pub fn resolved_values(&self) -> Map<String, Value> {
		self.entries
			.iter()
			.filter_map(|(k, v)| v.value().map(|value| (k.clone(), value.clone())))
			.collect()
	}

	/// Converts into a call payload for `api`, failing if any argument is
	/// unresolved.
	pub fn into_invocation(self, api: &str) -> Result<Invocation, UnresolvedArguments> {
		let missing: Vec<String> = self.unresolved().map(str::to_owned).collect();
		if !missing.is_empty() {
			return Err(UnresolvedArguments {
				api: api.to_owned(),
				missing,
			});
		}
		Ok(Invocation {
			api: api.to_owned(),
			params: self.resolved_values(),
		})
	}
}

/// Operation name plus materialized parameters, handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
	pub api: String,
	pub params: Map<String, Value>,
}

/// Binds every argument and static parameter of `action` against `ctx`.
pub fn bind(action: &ActionDescriptor, ctx: &Context) -> ParameterSet {
	let mut entries = IndexMap::with_capacity(action.args.len() + action.param.len());

	for arg in &action.args {
		let bound = bind_argument(action, arg, ctx);
		if !bound.is_resolved() {
			tracing::debug!(action = %action.api, arg = %arg, "argument unresolved");
		}
		entries.insert(arg.clone(), bound);
	}

	for (name, value) in &action.param {
		if !entries.contains_key(name) {
			entries.insert(
				name.clone(),
				BoundArg::Resolved {
					value: value.clone(),
					source: ArgSource::Default,
				},
			);
		}
	}

	ParameterSet { entries }
}

fn bind_argument(action: &ActionDescriptor, arg: &str, ctx: &Context) -> BoundArg {
	let mapping = action.mapping.get(arg);

	if let Some(expr) = mapping.and_then(|m| m.value.as_ref()) {
		match eval_mapping(expr, ctx) {
			Ok(Some(value)) => {
				return BoundArg::Resolved {
					value,
					source: ArgSource::Mapping,
				};
			}
			Ok(None) => {
				tracing::debug!(action = %action.api, arg, "mapping produced null; falling through");
			}
			Err(missing) => {
				tracing::debug!(action = %action.api, arg, reason = %missing, "mapping unavailable; falling through");
			}
		}
	}

	if let Some(value) = action.param.get(arg) {
		return BoundArg::Resolved {
			value: value.clone(),
			source: ArgSource::Default,
		};
	}

	if let Some(value) = ctx.record_field(arg) {
		return BoundArg::Resolved {
			value: value.clone(),
			source: ArgSource::Record,
		};
	}

	if let Some(value) = ctx.route.params.get(arg) {
		return BoundArg::Resolved {
			value: Value::String(value.clone()),
			source: ArgSource::RouteParam,
		};
	}

	if let Some(value) = ctx.route.query.get(arg) {
		return BoundArg::Resolved {
			value: Value::String(value.clone()),
			source: ArgSource::Query,
		};
	}

	BoundArg::Unresolved {
		options: mapping.map(|m| m.options.clone()).unwrap_or_default(),
	}
}

/// Evaluates a mapping expression; `Ok(None)` for a null result.
fn eval_mapping(expr: &MappingExpr, ctx: &Context) -> Result<Option<Value>, MissingContext> {
	let value = match expr {
		MappingExpr::Field(field) => ctx.lookup(field)?.into_owned(),
		MappingExpr::Literal(value) => value.clone(),
	};
	Ok((!value.is_null()).then_some(value))
}
