use serde::Serialize;

use crate::binder::{self, Invocation, ParameterSet};
use crate::context::Context;
use crate::descriptor::{ActionDescriptor, ViewRef};
use crate::predicate;

/// How a triggered action should be carried out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Dispatch {
	/// The action is not visible for this context.
	Hidden { api: String },
	/// Open the action's view; it collects its own input.
	Popup { api: String, view: ViewRef },
	/// Ask the user to confirm `message`, then send `invocation`.
	Confirm { message: String, invocation: Invocation },
	/// Send `invocation` right away.
	Direct { invocation: Invocation },
	/// Some arguments are unresolved; show a form prefilled with `params`.
	Prompt {
		api: String,
		params: ParameterSet,
		missing: Vec<String>,
	},
}

/// Binds `action` for `ctx` and decides how the caller should execute it.
///
/// The call site is derived from the context as in [`super::resolve`]; an
/// action not offered there is `Hidden` like one whose predicate is false.
pub fn plan_dispatch(action: &ActionDescriptor, ctx: &Context) -> Dispatch {
	let site = super::site_of(ctx);
	if !action.offered_at(site) {
		tracing::debug!(action = %action.api, site = ?site, "dispatch refused outside action scope");
		return Dispatch::Hidden { api: action.api.clone() };
	}
	if !predicate::evaluate(action.show.as_ref(), ctx) {
		tracing::debug!(action = %action.api, "dispatch refused for hidden action");
		return Dispatch::Hidden { api: action.api.clone() };
	}

	if action.popup
		&& let Some(view) = &action.component
	{
		return Dispatch::Popup {
			api: action.api.clone(),
			view: view.clone(),
		};
	}

	let params = binder::bind(action, ctx);
	if !params.is_complete() {
		let missing = params.unresolved().map(str::to_owned).collect();
		return Dispatch::Prompt {
			api: action.api.clone(),
			params,
			missing,
		};
	}

	let invocation = Invocation {
		api: action.api.clone(),
		params: params.resolved_values(),
	};
	match &action.message {
		Some(message) => Dispatch::Confirm {
			message: message.clone(),
			invocation,
		},
		None => Dispatch::Direct { invocation },
	}
}
