use std::path::Path;

use anyhow::{Context as _, anyhow};
use cockpit_registry::{
	BindMode, CallSite, Context, DescriptorStore, DescriptorStoreBuilder, ResolveOptions, StoreLoadReport, bind as bind_action,
	plan_dispatch, resolve_at, site_of,
};
use serde_json::{Value, json};


/// Result of `cockpit validate`.
pub struct Validation {
	pub output: Value,
	pub clean: bool,
}

fn builder_with(dir: Option<&Path>) -> anyhow::Result<(DescriptorStoreBuilder, Option<StoreLoadReport>)> {
	let mut builder = DescriptorStore::builder();
	builder.register_builtins().context("builtin descriptors failed to register")?;
	let report = dir.map(|dir| builder.load_dir(dir));
	Ok((builder, report))
}

/// Builds the store from every descriptor that loads. Rejected files are
/// logged and skipped; `validate` is the command that fails on them.
pub fn load_store(dir: Option<&Path>) -> anyhow::Result<DescriptorStore> {
	let (builder, report) = builder_with(dir)?;
	for (path, error) in report.iter().flat_map(|r| &r.errors) {
		tracing::warn!(path = %path.display(), %error, "skipping rejected descriptor");
	}
	Ok(builder.build())
}

pub fn validate(dir: Option<&Path>) -> anyhow::Result<Validation> {
	let (builder, report) = builder_with(dir)?;
	let report = report.unwrap_or_default();
	let store = builder.build();
	let errors: Vec<Value> = report
		.errors
		.iter()
		.map(|(path, error)| json!({ "path": path.display().to_string(), "error": error.to_string() }))
		.collect();

	Ok(Validation {
		clean: report.is_clean(),
		output: json!({
			"descriptors": store.names().collect::<Vec<_>>(),
			"errors": errors,
		}),
	})
}

pub fn read_context(path: &Path) -> anyhow::Result<Context> {
	let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read context {}", path.display()))?;
	serde_json::from_str(&raw).with_context(|| format!("invalid context {}", path.display()))
}

pub fn resolve(
	store: &DescriptorStore,
	resource: &str,
	ctx: &Context,
	site: Option<CallSite>,
	binding: BindMode,
) -> anyhow::Result<Value> {
	let descriptor = store.get(resource).ok_or_else(|| anyhow!("unknown resource '{resource}'"))?;
	let view = resolve_at(descriptor, ctx, site.unwrap_or_else(|| site_of(ctx)), ResolveOptions { binding });

	let actions: Vec<Value> = view
		.actions
		.iter()
		.map(|resolved| {
			let mut entry = json!({
				"api": resolved.api(),
				"label": resolved.action.label,
				"icon": resolved.action.icon,
			});
			if let Some(badge) = resolved.badge {
				entry["badge"] = json!(badge);
			}
			if let Some(params) = &resolved.params {
				entry["params"] = json!(params);
			}
			entry
		})
		.collect();

	Ok(json!({
		"descriptor": view.descriptor,
		"site": view.site,
		"tabs": view.tabs.iter().map(|t| json!({ "name": t.name, "component": t.component })).collect::<Vec<_>>(),
		"actions": actions,
	}))
}

pub fn bind(store: &DescriptorStore, resource: &str, action: &str, ctx: &Context) -> anyhow::Result<Value> {
	let descriptor = store.get(resource).ok_or_else(|| anyhow!("unknown resource '{resource}'"))?;
	let action = descriptor
		.action(action)
		.ok_or_else(|| anyhow!("resource '{resource}' has no action '{action}'"))?;

	Ok(json!({
		"params": bind_action(action, ctx),
		"dispatch": plan_dispatch(action, ctx),
	}))
}
