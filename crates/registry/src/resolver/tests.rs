use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

use super::*;
use crate::binder::{ArgSource, BoundArg};
use crate::builtins;
use crate::context::{Record, RoleType, UserContext};
use crate::predicate::Predicate;

fn record(value: Value) -> Record {
	match value {
		Value::Object(map) => map,
		_ => panic!("record fixture must be an object"),
	}
}

fn project() -> ResourceDescriptor {
	builtins::project().unwrap()
}

#[test]
fn suspended_project_for_foreign_admin() {
	let project = project();
	let ctx = Context::record(
		record(json!({ "state": "Suspended", "account": "x" })),
		UserContext::new(RoleType::Admin).with_account("y"),
	);

	let view = resolve(&project, &ctx);
	assert_eq!(view.site, CallSite::Record);
	assert!(view.action("activateProject").is_some());
	assert!(view.action("suspendProject").is_none());
	assert!(view.tab("accounts").is_some());
	assert_eq!(view.tab_names(), vec!["details", "resources", "limits", "accounts"]);
	assert_eq!(
		view.action_apis(),
		vec!["updateProject", "activateProject", "addAccountToProject", "deleteProject"]
	);
}

#[test]
fn owner_sees_accounts_but_not_limits() {
	let project = project();
	let ctx = Context::record(record(json!({ "account": "x" })), UserContext::new(RoleType::User).with_account("x"));

	let view = resolve(&project, &ctx);
	assert!(view.tab("accounts").is_some());
	assert!(view.tab("limits").is_none());
	assert_eq!(view.tab_names(), vec!["details", "resources", "accounts"]);
	// No state on the record: both state-gated actions fail closed.
	assert!(view.action("activateProject").is_none());
	assert!(view.action("suspendProject").is_none());
	assert!(view.action("addAccountToProject").is_some());
}

#[test]
fn active_project_offers_suspend() {
	let project = project();
	let ctx = Context::record(
		record(json!({ "state": "Active", "account": "x" })),
		UserContext::new(RoleType::User).with_account("z"),
	);
	let view = resolve(&project, &ctx);
	assert_eq!(view.action_apis(), vec!["updateProject", "suspendProject", "deleteProject"]);
	assert_eq!(view.tab_names(), vec!["details", "resources"]);
}

#[test]
fn list_site_offers_list_actions_only() {
	let project = project();
	let ctx = Context::list(UserContext::new(RoleType::Admin));

	let view = resolve(&project, &ctx);
	assert_eq!(view.site, CallSite::List);
	assert_eq!(
		view.action_apis(),
		vec!["createProject", "updateProjectInvitation", "listProjectInvitations"]
	);
	assert_eq!(view.tab_names(), vec!["details", "resources", "limits"]);
	assert!(view.tab("accounts").is_none());
}

#[test]
fn record_site_without_record_hides_record_predicates() {
	let project = project();
	let ctx = Context::list(UserContext::new(RoleType::Admin).with_account("y"));

	let view = resolve_at(&project, &ctx, CallSite::Record, ResolveOptions::default());
	assert!(view.action("addAccountToProject").is_none());
	assert!(view.action("activateProject").is_none());
	assert!(view.action("suspendProject").is_none());
	assert_eq!(view.action_apis(), vec!["updateProject", "deleteProject"]);
}

#[test]
fn badge_defaults_are_attached() {
	let project = project();
	let view = resolve(&project, &Context::list(UserContext::new(RoleType::User)));
	assert_eq!(view.action("listProjectInvitations").unwrap().badge, Some(0));
	assert_eq!(view.action("createProject").unwrap().badge, None);
}

#[test]
fn binding_is_deferred_unless_requested() {
	let project = project();
	let ctx = Context::record(record(json!({ "id": "abc-123", "account": "x" })), UserContext::new(RoleType::Admin));

	let deferred = resolve(&project, &ctx);
	assert!(deferred.actions.iter().all(|a| a.params.is_none()));

	let eager = resolve_at(&project, &ctx, CallSite::Record, ResolveOptions::eager());
	let add = eager.action("addAccountToProject").unwrap();
	let params = add.params.as_ref().unwrap();
	assert_eq!(params.value("projectid"), Some(&json!("abc-123")));
	assert_eq!(params.get("projectid").and_then(BoundArg::source), Some(ArgSource::Mapping));
}

#[test]
fn explicit_site_overrides_context() {
	let project = project();
	let ctx = Context::record(record(json!({ "state": "Active" })), UserContext::new(RoleType::User));
	let view = resolve_at(&project, &ctx, CallSite::List, ResolveOptions::default());
	assert_eq!(
		view.action_apis(),
		vec!["createProject", "updateProjectInvitation", "listProjectInvitations"]
	);
}

#[test]
fn resolved_view_serializes_in_order() {
	let project = project();
	let view = resolve(&project, &Context::list(UserContext::new(RoleType::User)));
	let value = serde_json::to_value(&view).unwrap();
	assert_eq!(value["descriptor"], json!("project"));
	assert_eq!(value["site"], json!("list"));
	assert_eq!(value["actions"][0]["action"]["api"], json!("createProject"));
	assert_eq!(value["actions"][2]["badge"], json!(0));
}

#[test]
fn dispatch_popup_skips_binding() {
	let project = project();
	let ctx = Context::list(UserContext::new(RoleType::User));
	let plan = plan_dispatch(project.action("updateProjectInvitation").unwrap(), &ctx);
	assert_eq!(
		plan,
		Dispatch::Popup {
			api: "updateProjectInvitation".into(),
			view: crate::descriptor::ViewRef::new("project/InvitationTokenTemplate"),
		}
	);
}

#[test]
fn dispatch_confirms_messaged_actions() {
	let project = project();
	let ctx = Context::record(record(json!({ "id": "p-1", "state": "Suspended" })), UserContext::new(RoleType::Admin));
	let Dispatch::Confirm { message, invocation } = plan_dispatch(project.action("activateProject").unwrap(), &ctx) else {
		panic!("activateProject should need confirmation");
	};
	assert_eq!(message, "message.activate.project");
	assert_eq!(invocation.api, "activateProject");
	assert!(invocation.params.is_empty());
}

#[test]
fn dispatch_prompts_for_missing_arguments() {
	let project = project();
	let ctx = Context::record(record(json!({ "id": "p-1", "account": "x" })), UserContext::new(RoleType::Admin));
	let Dispatch::Prompt { api, params, missing } = plan_dispatch(project.action("addAccountToProject").unwrap(), &ctx) else {
		panic!("addAccountToProject should prompt for email");
	};
	assert_eq!(api, "addAccountToProject");
	assert_eq!(missing, vec!["email".to_string()]);
	assert_eq!(params.value("projectid"), Some(&json!("p-1")));
}

#[test]
fn dispatch_direct_when_complete() {
	let project = project();
	let ctx = Context::record(
		record(json!({ "id": "p-1", "displaytext": "Web tier" })),
		UserContext::new(RoleType::User),
	);
	let plan = plan_dispatch(project.action("updateProject").unwrap(), &ctx);
	let Dispatch::Direct { invocation } = plan else {
		panic!("updateProject should dispatch directly");
	};
	assert_eq!(Value::Object(invocation.params), json!({ "displaytext": "Web tier" }));
}

#[test]
fn dispatch_refuses_record_action_from_list() {
	let project = project();
	let ctx = Context::list(UserContext::new(RoleType::Admin));
	assert_eq!(
		plan_dispatch(project.action("deleteProject").unwrap(), &ctx),
		Dispatch::Hidden {
			api: "deleteProject".into(),
		}
	);
	assert!(matches!(
		plan_dispatch(project.action("createProject").unwrap(), &ctx),
		Dispatch::Prompt { .. }
	));
}

#[test]
fn dispatch_refuses_hidden_action() {
	let project = project();
	let ctx = Context::record(record(json!({ "state": "Active" })), UserContext::new(RoleType::Admin));
	assert_eq!(
		plan_dispatch(project.action("activateProject").unwrap(), &ctx),
		Dispatch::Hidden {
			api: "activateProject".into(),
		}
	);
}

fn arb_role() -> impl Strategy<Value = RoleType> {
	prop_oneof![
		Just(RoleType::Admin),
		Just(RoleType::ResourceAdmin),
		Just(RoleType::DomainAdmin),
		Just(RoleType::User),
	]
}

fn arb_context() -> impl Strategy<Value = Context> {
	let state = prop::option::of(prop_oneof![Just("Active"), Just("Suspended"), Just("Disabled")]);
	let account = prop::option::of(prop_oneof![Just("x"), Just("y")]);
	let user_account = prop::option::of(prop_oneof![Just("x"), Just("y")]);
	(any::<bool>(), state, account, arb_role(), user_account).prop_map(|(has_record, state, account, role, user_account)| {
		let mut user = UserContext::new(role);
		user.account = user_account.map(str::to_owned);
		if !has_record {
			return Context::list(user);
		}
		let mut rec = Record::new();
		if let Some(state) = state {
			rec.insert("state".into(), json!(state));
		}
		if let Some(account) = account {
			rec.insert("account".into(), json!(account));
		}
		Context::record(rec, user)
	})
}

fn is_subsequence(items: &[&str], of: &[&str]) -> bool {
	let mut rest = of.iter();
	items.iter().all(|item| rest.any(|candidate| candidate == item))
}

proptest! {
	#[test]
	fn resolution_is_deterministic(ctx in arb_context()) {
		let project = project();
		prop_assert_eq!(resolve(&project, &ctx), resolve(&project, &ctx));
	}

	#[test]
	fn output_keeps_declaration_order(ctx in arb_context()) {
		let project = project();
		let view = resolve(&project, &ctx);
		let declared_tabs: Vec<_> = project.tabs.iter().map(|t| t.name.as_str()).collect();
		let declared_actions: Vec<_> = project.actions.iter().map(|a| a.api.as_str()).collect();
		prop_assert!(is_subsequence(&view.tab_names(), &declared_tabs));
		prop_assert!(is_subsequence(&view.action_apis(), &declared_actions));
	}

	#[test]
	fn visibility_matches_predicate(ctx in arb_context()) {
		let project = project();
		let view = resolve(&project, &ctx);
		let site = site_of(&ctx);
		for action in &project.actions {
			let expected = action.offered_at(site) && predicate::evaluate(action.show.as_ref(), &ctx);
			prop_assert_eq!(view.action(&action.api).is_some(), expected);
			if action.show.is_none() {
				prop_assert_eq!(view.action(&action.api).is_some(), action.offered_at(site));
			}
			if ctx.record.is_none() && action.show.as_ref().is_some_and(Predicate::reads_record) {
				prop_assert!(view.action(&action.api).is_none());
			}
		}
		for tab in &project.tabs {
			prop_assert_eq!(view.tab(&tab.name).is_some(), predicate::evaluate(tab.show.as_ref(), &ctx));
			if ctx.record.is_none() && tab.show.as_ref().is_some_and(Predicate::reads_record) {
				prop_assert!(view.tab(&tab.name).is_none());
			}
		}
	}
}
