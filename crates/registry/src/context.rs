//! Runtime context a descriptor is resolved against.
//!
//! A [`Context`] is built by the caller for every resolution call. It carries
//! the current record (absent for list views), the current route and the
//! authenticated user. Predicates and mapping expressions read it through
//! [`FieldRef`] paths such as `record.state` or `user.roletype`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map of the record currently on screen.
pub type Record = Map<String, Value>;

/// Role type of the authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleType {
	Admin,
	ResourceAdmin,
	DomainAdmin,
	User,
}

impl RoleType {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Admin => "Admin",
			Self::ResourceAdmin => "ResourceAdmin",
			Self::DomainAdmin => "DomainAdmin",
			Self::User => "User",
		}
	}
}

impl fmt::Display for RoleType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	pub roletype: RoleType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domainid: Option<String>,
}

impl UserContext {
	/// Creates a user with only a role type set.
	pub fn new(roletype: RoleType) -> Self {
		Self {
			id: None,
			username: None,
			roletype,
			account: None,
			domain: None,
			domainid: None,
		}
	}

	pub fn with_account(mut self, account: impl Into<String>) -> Self {
		self.account = Some(account.into());
		self
	}

	pub fn with_domain(mut self, domain: impl Into<String>, domainid: impl Into<String>) -> Self {
		self.domain = Some(domain.into());
		self.domainid = Some(domainid.into());
		self
	}

	fn field(&self, field: UserField) -> Option<Cow<'_, str>> {
		match field {
			UserField::Id => self.id.as_deref().map(Cow::Borrowed),
			UserField::Username => self.username.as_deref().map(Cow::Borrowed),
			UserField::RoleType => Some(Cow::Borrowed(self.roletype.as_str())),
			UserField::Account => self.account.as_deref().map(Cow::Borrowed),
			UserField::Domain => self.domain.as_deref().map(Cow::Borrowed),
			UserField::DomainId => self.domainid.as_deref().map(Cow::Borrowed),
		}
	}
}

/// Current route: path, path parameters and query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteContext {
	#[serde(default)]
	pub path: String,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub params: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub query: BTreeMap<String, String>,
}

impl RouteContext {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			..Self::default()
		}
	}

	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());
		self
	}

	/// Path parameter first, then query parameter.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.params.get(key).or_else(|| self.query.get(key)).map(String::as_str)
	}
}

/// Runtime tuple a resolution call is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub record: Option<Record>,
	#[serde(default)]
	pub route: RouteContext,
	pub user: UserContext,
}

impl Context {
	/// List-level context (no record).
	pub fn list(user: UserContext) -> Self {
		Self {
			record: None,
			route: RouteContext::default(),
			user,
		}
	}

	/// Record-level context.
	pub fn record(record: Record, user: UserContext) -> Self {
		Self {
			record: Some(record),
			route: RouteContext::default(),
			user,
		}
	}

	pub fn with_route(mut self, route: RouteContext) -> Self {
		self.route = route;
		self
	}

	/// Reads the value a field reference points at.
	pub fn lookup(&self, field: &FieldRef) -> Result<Cow<'_, Value>, MissingContext> {
		match field {
			FieldRef::Record(path) => {
				let record = self.record.as_ref().ok_or(MissingContext::NoRecord)?;
				let (first, rest) = path.split_first().ok_or_else(|| MissingContext::RecordField(String::new()))?;
				let mut value = record.get(first);
				for segment in rest {
					value = value.and_then(|v| v.get(segment));
				}
				value
					.map(Cow::Borrowed)
					.ok_or_else(|| MissingContext::RecordField(path.join(".")))
			}
			FieldRef::Route(key) => self
				.route
				.get(key)
				.map(|v| Cow::Owned(Value::String(v.to_owned())))
				.ok_or_else(|| MissingContext::RouteParam(key.clone())),
			FieldRef::User(field) => self
				.user
				.field(*field)
				.map(|v| Cow::Owned(Value::String(v.into_owned())))
				.ok_or(MissingContext::UserField(*field)),
		}
	}

	/// Top-level record field, ignoring explicit nulls.
	pub fn record_field(&self, name: &str) -> Option<&Value> {
		self.record.as_ref()?.get(name).filter(|v| !v.is_null())
	}
}

/// Context a predicate or mapping needed but did not find.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MissingContext {
	#[error("no record in context")]
	NoRecord,
	#[error("record has no field '{0}'")]
	RecordField(String),
	#[error("route has no parameter '{0}'")]
	RouteParam(String),
	#[error("user has no field '{0}'")]
	UserField(UserField),
}

/// Readable user attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
	Id,
	Username,
	RoleType,
	Account,
	Domain,
	DomainId,
}

impl UserField {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Id => "id",
			Self::Username => "username",
			Self::RoleType => "roletype",
			Self::Account => "account",
			Self::Domain => "domain",
			Self::DomainId => "domainid",
		}
	}
}

impl fmt::Display for UserField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Dotted reference into the context: `record.<path>`, `route.<key>` or
/// `user.<field>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldRef {
	Record(Vec<String>),
	Route(String),
	User(UserField),
}

impl FieldRef {
	pub fn record(path: &str) -> Self {
		Self::Record(path.split('.').map(str::to_owned).collect())
	}

	/// Whether evaluating this reference needs a record in the context.
	pub fn reads_record(&self) -> bool {
		matches!(self, Self::Record(_))
	}
}

/// Malformed [`FieldRef`] path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldRefError {
	#[error("field reference '{0}' must start with record., route. or user.")]
	UnknownRoot(String),
	#[error("field reference '{0}' has an empty segment")]
	EmptySegment(String),
	#[error("unknown user field '{0}'")]
	UnknownUserField(String),
}

impl FromStr for FieldRef {
	type Err = FieldRefError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let Some((root, rest)) = s.split_once('.') else {
			return Err(FieldRefError::UnknownRoot(s.to_owned()));
		};
		if rest.is_empty() || rest.split('.').any(str::is_empty) {
			return Err(FieldRefError::EmptySegment(s.to_owned()));
		}
		match root {
			"record" => Ok(Self::record(rest)),
			"route" => Ok(Self::Route(rest.to_owned())),
			"user" => {
				let field = match rest {
					"id" => UserField::Id,
					"username" => UserField::Username,
					"roletype" => UserField::RoleType,
					"account" => UserField::Account,
					"domain" => UserField::Domain,
					"domainid" => UserField::DomainId,
					other => return Err(FieldRefError::UnknownUserField(other.to_owned())),
				};
				Ok(Self::User(field))
			}
			_ => Err(FieldRefError::UnknownRoot(s.to_owned())),
		}
	}
}

impl TryFrom<String> for FieldRef {
	type Error = FieldRefError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<FieldRef> for String {
	fn from(value: FieldRef) -> Self {
		value.to_string()
	}
}

impl fmt::Display for FieldRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Record(path) => write!(f, "record.{}", path.join(".")),
			Self::Route(key) => write!(f, "route.{key}"),
			Self::User(field) => write!(f, "user.{field}"),
		}
	}
}
