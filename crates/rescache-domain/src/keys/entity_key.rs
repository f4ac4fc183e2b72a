//! Semantic entity identity
//!
//! Entity ids are opaque to the store, but agents build them from the
//! fields that identify an object in its source system. The encoded form is
//! `{provider};{type};{account};{region};{name}`, which keeps every id of one
//! agent scope under a common prefix so the scope can be enumerated with a
//! single glob.

use crate::constants::{IDENTITY_DELIMITER, STORE_KEY_DELIMITER};
use crate::error::{Error, Result};
use std::fmt;

/// Identity of one externally observed object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    provider: String,
    type_name: String,
    account: String,
    region: String,
    name: String,
}

impl EntityKey {
    /// Build an identity, rejecting components that cannot be encoded
    pub fn new(
        provider: impl Into<String>,
        type_name: impl Into<String>,
        account: impl Into<String>,
        region: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let key = Self {
            provider: provider.into(),
            type_name: type_name.into(),
            account: account.into(),
            region: region.into(),
            name: name.into(),
        };
        for (kind, value) in key.components() {
            check_component(kind, value)?;
        }
        Ok(key)
    }

    /// Parse an encoded identity; `None` when the id was not produced by [`EntityKey::encode`]
    pub fn parse(id: &str) -> Option<Self> {
        let parts: Vec<&str> = id.split(IDENTITY_DELIMITER).collect();
        let [provider, type_name, account, region, name] = parts.as_slice() else {
            return None;
        };
        Self::new(*provider, *type_name, *account, *region, *name).ok()
    }

    /// Encode into the opaque id stored in the cache
    pub fn encode(&self) -> String {
        [
            self.provider.as_str(),
            self.type_name.as_str(),
            self.account.as_str(),
            self.region.as_str(),
            self.name.as_str(),
        ]
        .join(&IDENTITY_DELIMITER.to_string())
    }

    /// Glob matching every id of one type inside an `(account, region)` scope
    ///
    /// Glob metacharacters inside the components are wrapped in single
    /// character classes so they only match themselves.
    pub fn scope_pattern(provider: &str, type_name: &str, account: &str, region: &str) -> String {
        let delimiter = IDENTITY_DELIMITER.to_string();
        let mut pattern = [provider, type_name, account, region]
            .iter()
            .map(|part| escape_glob(part))
            .collect::<Vec<_>>()
            .join(&delimiter);
        pattern.push(IDENTITY_DELIMITER);
        pattern.push('*');
        pattern
    }

    /// Provider (cloud or source system) name
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Entity type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Account the object belongs to
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Region the object belongs to
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Logical name of the object
    pub fn name(&self) -> &str {
        &self.name
    }

    fn components(&self) -> [(&'static str, &str); 5] {
        [
            ("provider", self.provider.as_str()),
            ("type", self.type_name.as_str()),
            ("account", self.account.as_str()),
            ("region", self.region.as_str()),
            ("name", self.name.as_str()),
        ]
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn check_component(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::encoding(format!("identity {kind} must not be empty")));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| *c == IDENTITY_DELIMITER || *c == STORE_KEY_DELIMITER)
    {
        return Err(Error::encoding(format!(
            "identity {kind} '{value}' contains reserved delimiter '{bad}'"
        )));
    }
    Ok(())
}

fn escape_glob(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str(r"[\\]"),
            '*' | '?' | '[' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
