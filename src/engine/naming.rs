//! App name resolution and the hosting-app disambiguator

use std::fmt;
use uuid::Uuid;

use crate::{Result, ScaffoldError};

/// Exclusive upper bound of [`AppNumber`]
pub const APP_NUMBER_LIMIT: u32 = 100_000;

/// Validated application name, used as directory and manifest name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppName(String);

impl AppName {
    /// Resolve the app name from the first positional argument
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let name = raw.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(ScaffoldError::MissingAppName);
        }

        let invalid = |reason: &str| ScaffoldError::InvalidAppName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name == "." || name == ".." {
            return Err(invalid("must not be a relative path component"));
        }
        if name.contains(['/', '\\']) {
            return Err(invalid("must not contain path separators"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric suffix that keeps hosting app names unique, in `[0, 100000)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppNumber(u32);

impl AppNumber {
    pub fn new(value: u32) -> Result<Self> {
        if value >= APP_NUMBER_LIMIT {
            return Err(ScaffoldError::Config(format!(
                "app number {} is out of range (must be below {})",
                value, APP_NUMBER_LIMIT
            )));
        }
        Ok(Self(value))
    }

    /// Fresh, unseeded value for this invocation
    pub fn random() -> Self {
        let bits = Uuid::new_v4().as_u128();
        Self((bits % APP_NUMBER_LIMIT as u128) as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AppNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name registered on the hosting platform: `{name}-{number}`
pub fn hosting_app_name(name: &AppName, number: AppNumber) -> String {
    format!("{}-{}", name, number)
}
