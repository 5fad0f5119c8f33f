//! Router settings.
//!
//! Settings are plain serde structs, usually loaded from a `[router]`-style
//! TOML document:
//!
//! ```toml
//! login_path = "/signin"
//! home_path = "/dashboard"
//! not_found_path = "/404"
//! require_auth = true
//! ```
//!
//! Missing keys fall back to [`RouterSettings::default`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The document is not valid TOML for [`RouterSettings`].
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value failed validation.
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue {
		/// Setting name.
		key: String,
		/// What is wrong with it.
		message: String,
	},
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Path of the login route.
	pub login_path: String,
	/// Where to go after signing in when no return URL is remembered.
	pub home_path: String,
	/// Route used for unmatched paths. Unmatched paths fail when unset.
	pub not_found_path: Option<String>,
	/// Redirect unauthenticated users to `login_path`.
	pub require_auth: bool,
	/// Restore each route's last query parameters on re-entry.
	pub remember_query: bool,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			login_path: "/login".to_string(),
			home_path: "/".to_string(),
			not_found_path: None,
			require_auth: false,
			remember_query: true,
		}
	}
}

impl RouterSettings {
	/// Parses and validates settings from a TOML string.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path)?;
		tracing::debug!(path = %path.display(), "loading router settings");
		Self::from_toml_str(&source)
	}

	/// Checks that every configured path is absolute.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let paths = [
			("login_path", Some(&self.login_path)),
			("home_path", Some(&self.home_path)),
			("not_found_path", self.not_found_path.as_ref()),
		];
		for (key, value) in paths {
			if let Some(value) = value
				&& !value.starts_with('/')
			{
				return Err(SettingsError::InvalidValue {
					key: key.to_string(),
					message: format!("'{}' must start with '/'", value),
				});
			}
		}
		Ok(())
	}

	/// Sets the login path.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();
		self
	}

	/// Sets the home path.
	pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
		self.home_path = path.into();
		self
	}

	/// Sets the fallback route for unmatched paths.
	pub fn with_not_found_path(mut self, path: impl Into<String>) -> Self {
		self.not_found_path = Some(path.into());
		self
	}

	/// Enables or disables the login gate.
	pub fn with_require_auth(mut self, require_auth: bool) -> Self {
		self.require_auth = require_auth;
		self
	}

	/// Enables or disables query parameter memory.
	pub fn with_remember_query(mut self, remember_query: bool) -> Self {
		self.remember_query = remember_query;
		self
	}
}
