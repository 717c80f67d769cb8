//! API surface descriptor: validated base URL, resolved endpoint set, product group.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::ConfigError};

/// Production API root operated by the registry.
pub const PRODUCTION_BASE: &str = "https://ismp.crpt.ru/api/v3/";

const AUTH_CHALLENGE_PATH: &str = "auth/cert/key";
const AUTH_TOKEN_PATH: &str = "auth/cert/";
const CREATE_DOCUMENT_PATH: &str = "lk/documents/create";
const PRODUCT_GROUP_PARAM: &str = "pg";

/// Stable labels for the endpoints the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Challenge issuance endpoint (`auth/cert/key`).
	AuthChallenge,
	/// Token grant endpoint (`auth/cert/`).
	AuthToken,
	/// Document submission endpoint (`lk/documents/create`).
	CreateDocument,
}
impl Endpoint {
	/// Returns a stable label suitable for error, span, or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::AuthChallenge => "auth_challenge",
			Endpoint::AuthToken => "auth_token",
			Endpoint::CreateDocument => "create_document",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Endpoint set resolved from a base URL at construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoints {
	/// Challenge issuance endpoint.
	pub challenge: Url,
	/// Token grant endpoint.
	pub token: Url,
	/// Document submission endpoint, without the product group parameter.
	pub create_document: Url,
}

/// Immutable API descriptor consumed by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiDescriptor {
	/// Resolved endpoint definitions.
	pub endpoints: ApiEndpoints,
	/// Product group appended to submission URLs as the `pg` query parameter.
	pub product_group: ProductGroup,
}
impl ApiDescriptor {
	/// Resolves the endpoint set against the production API root.
	pub fn production() -> Result<Self, ConfigError> {
		let base =
			Url::parse(PRODUCTION_BASE).map_err(|e| ConfigError::InvalidBaseUrl { source: e })?;

		Self::from_base(base)
	}

	/// Resolves the endpoint set against an arbitrary API root.
	///
	/// The base must be a hierarchical URL. A missing trailing slash is tolerated and
	/// normalized so relative joins never drop the final path segment.
	pub fn from_base(base: Url) -> Result<Self, ConfigError> {
		if base.cannot_be_a_base() {
			return Err(ConfigError::UnusableBaseUrl { url: base.to_string() });
		}

		let base = normalize_trailing_slash(base);
		let join =
			|path: &str| base.join(path).map_err(|e| ConfigError::InvalidBaseUrl { source: e });
		let endpoints = ApiEndpoints {
			challenge: join(AUTH_CHALLENGE_PATH)?,
			token: join(AUTH_TOKEN_PATH)?,
			create_document: join(CREATE_DOCUMENT_PATH)?,
		};

		Ok(Self { endpoints, product_group: ProductGroup::default() })
	}

	/// Overrides the product group used for submissions.
	pub fn with_product_group(mut self, group: ProductGroup) -> Self {
		self.product_group = group;

		self
	}

	/// Returns the submission URL with the product group query parameter applied.
	pub fn create_document_url(&self) -> Url {
		let mut url = self.endpoints.create_document.clone();

		url.query_pairs_mut().append_pair(PRODUCT_GROUP_PARAM, &self.product_group);

		url
	}
}

/// Validated product group identifier carried as the `pg` query parameter.
///
/// Defaults to `shoes`, the group this client was first built for.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductGroup(String);
impl ProductGroup {
	/// Creates a new product group after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProductGroupError> {
		let view = value.as_ref();

		validate_group(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Default for ProductGroup {
	fn default() -> Self {
		Self("shoes".into())
	}
}
impl Deref for ProductGroup {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProductGroup {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ProductGroup> for String {
	fn from(value: ProductGroup) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProductGroup {
	type Error = ProductGroupError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_group(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ProductGroup {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ProductGroup({})", self.0)
	}
}
impl Display for ProductGroup {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProductGroup {
	type Err = ProductGroupError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Error returned when product group validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProductGroupError {
	/// The product group was empty.
	#[error("Product group cannot be empty.")]
	Empty,
	/// The product group contains whitespace characters.
	#[error("Product group contains whitespace.")]
	ContainsWhitespace,
}

fn normalize_trailing_slash(mut base: Url) -> Url {
	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());

		base.set_path(&path);
	}

	base
}

fn validate_group(view: &str) -> Result<(), ProductGroupError> {
	if view.is_empty() {
		return Err(ProductGroupError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ProductGroupError::ContainsWhitespace);
	}

	Ok(())
}
