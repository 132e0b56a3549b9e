use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::builtins;
use crate::context::{Record, RoleType, RouteContext, UserContext};

fn record(value: Value) -> Record {
	match value {
		Value::Object(map) => map,
		_ => panic!("record fixture must be an object"),
	}
}

fn action(value: Value) -> ActionDescriptor {
	serde_json::from_value(value).unwrap()
}

fn user() -> UserContext {
	UserContext::new(RoleType::User).with_account("x")
}

#[test]
fn mapping_wins_for_project_id() {
	let project = builtins::project().unwrap();
	let add = project.action("addAccountToProject").unwrap();
	let ctx = Context::record(record(json!({ "id": "abc-123", "account": "x" })), user());

	let params = bind(add, &ctx);
	assert_eq!(params.value("projectid"), Some(&json!("abc-123")));
	assert_eq!(params.get("projectid").and_then(BoundArg::source), Some(ArgSource::Mapping));
	assert_eq!(params.get("account").and_then(BoundArg::source), Some(ArgSource::Record));
	assert_eq!(params.get("email"), Some(&BoundArg::Unresolved { options: vec![] }));
	assert_eq!(params.unresolved().collect::<Vec<_>>(), vec!["email"]);
	assert!(!params.is_complete());
}

#[test]
fn mapping_beats_literal_default() {
	let act = action(json!({
		"api": "a", "icon": "i", "label": "l", "dataView": true,
		"args": ["projectid"],
		"param": { "projectid": "default-id" },
		"mapping": { "projectid": { "value": { "field": "record.id" } } }
	}));
	let ctx = Context::record(record(json!({ "id": "abc-123" })), user());
	assert_eq!(bind(&act, &ctx).value("projectid"), Some(&json!("abc-123")));
}

#[test]
fn failing_mapping_falls_through_to_default() {
	let act = action(json!({
		"api": "a", "icon": "i", "label": "l", "listView": true,
		"args": ["projectid"],
		"param": { "projectid": "default-id" },
		"mapping": { "projectid": { "value": { "field": "record.id" } } }
	}));
	let ctx = Context::list(user());
	let params = bind(&act, &ctx);
	assert_eq!(params.value("projectid"), Some(&json!("default-id")));
	assert_eq!(params.get("projectid").and_then(BoundArg::source), Some(ArgSource::Default));
}

#[test]
fn default_beats_record_beats_route() {
	let act = action(json!({
		"api": "a", "icon": "i", "label": "l", "dataView": true,
		"args": ["zone", "name", "page", "id"],
		"param": { "zone": "z-default" }
	}));
	let ctx = Context::record(record(json!({ "zone": "z-record", "name": "n-record" })), user()).with_route(
		RouteContext::new("/project/p-1")
			.with_param("id", "p-1")
			.with_param("name", "n-route")
			.with_query("page", "2"),
	);

	let params = bind(&act, &ctx);
	assert_eq!(params.value("zone"), Some(&json!("z-default")));
	assert_eq!(params.value("name"), Some(&json!("n-record")));
	assert_eq!(params.value("page"), Some(&json!("2")));
	assert_eq!(params.get("page").and_then(BoundArg::source), Some(ArgSource::Query));
	assert_eq!(params.value("id"), Some(&json!("p-1")));
	assert_eq!(params.get("id").and_then(BoundArg::source), Some(ArgSource::RouteParam));
}

#[test]
fn null_record_field_is_not_a_value() {
	let act = action(json!({ "api": "a", "icon": "i", "label": "l", "dataView": true, "args": ["email"] }));
	let ctx = Context::record(record(json!({ "email": null })), user());
	assert!(!bind(&act, &ctx).is_complete());
}

#[test]
fn unresolved_argument_reports_options() {
	let act = action(json!({
		"api": "a", "icon": "i", "label": "l", "listView": true,
		"args": ["roletype"],
		"mapping": { "roletype": { "options": ["Admin", "User"] } }
	}));
	let params = bind(&act, &Context::list(user()));
	assert_eq!(
		params.get("roletype"),
		Some(&BoundArg::Unresolved {
			options: vec![json!("Admin"), json!("User")],
		})
	);
}

#[test]
fn static_params_follow_declared_args() {
	let project = builtins::project().unwrap();
	let invitations = project.action("listProjectInvitations").unwrap();
	let params = bind(invitations, &Context::list(user()));
	assert_eq!(params.len(), 1);
	assert_eq!(params.value("state"), Some(&json!("Pending")));
	assert!(params.is_complete());

	let act = action(json!({
		"api": "a", "icon": "i", "label": "l", "listView": true,
		"args": ["name"],
		"param": { "listall": true, "name": "n" }
	}));
	let names: Vec<_> = bind(&act, &Context::list(user())).iter().map(|(k, _)| k.to_owned()).collect();
	assert_eq!(names, vec!["name", "listall"]);
}

#[test]
fn literal_mapping_resolves_without_context() {
	let act = action(json!({
		"api": "a", "icon": "i", "label": "l", "listView": true,
		"args": ["listall"],
		"mapping": { "listall": { "value": { "literal": true } } }
	}));
	assert_eq!(bind(&act, &Context::list(user())).value("listall"), Some(&json!(true)));
}

#[test]
fn into_invocation_requires_every_argument() {
	let project = builtins::project().unwrap();
	let add = project.action("addAccountToProject").unwrap();
	let ctx = Context::record(record(json!({ "id": "abc-123", "account": "x" })), user());

	let err = bind(add, &ctx).into_invocation(&add.api).unwrap_err();
	assert_eq!(
		err,
		UnresolvedArguments {
			api: "addAccountToProject".into(),
			missing: vec!["email".into()],
		}
	);
	assert_eq!(err.to_string(), "action 'addAccountToProject' is missing arguments: email");

	let ctx = Context::record(record(json!({ "id": "abc-123", "account": "x", "email": "a@b.c" })), user());
	let invocation = bind(add, &ctx).into_invocation(&add.api).unwrap();
	assert_eq!(invocation.api, "addAccountToProject");
	assert_eq!(
		Value::Object(invocation.params),
		json!({ "projectid": "abc-123", "account": "x", "email": "a@b.c" })
	);
}

#[test]
fn serializes_bound_args() {
	let params = bind(
		&action(json!({ "api": "a", "icon": "i", "label": "l", "listView": true, "args": ["name", "x"], "param": { "name": "n" } })),
		&Context::list(user()),
	);
	assert_eq!(
		serde_json::to_value(&params).unwrap(),
		json!({
			"name": { "status": "resolved", "value": "n", "source": "default" },
			"x": { "status": "unresolved" }
		})
	);
}
