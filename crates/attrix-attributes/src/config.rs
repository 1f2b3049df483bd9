//! Bona fide status configuration.
//!
//! Source attribute names, the affiliation scope prefix and the counted
//! key are fixed at startup and shared immutably by the probes and the
//! event classifier.

use std::env;

use crate::definition::{NS_EXT_SOURCE_ATTR_DEF, NS_PRINCIPAL_ATTR_DEF, NS_PRINCIPAL_ATTR_VIRT};
use crate::error::AttributeError;
use crate::model::AttributeRef;

const DEFAULT_STATUS_SOURCE: &str = "elixirBonaFideStatusREMS";
const DEFAULT_AFFILIATION_SOURCE: &str = "eduPersonScopedAffiliations";
const DEFAULT_AFFILIATION_EVENT_SOURCE: &str = "affiliation";
const DEFAULT_AFFILIATION_PREFIX: &str = "faculty@";
const DEFAULT_COUNT_SOURCE: &str = "publications";
const DEFAULT_COUNT_KEY: &str = "ELIXIR";

/// Configuration of the bona fide status resolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonaFideConfig {
    /// Stored principal attribute holding an externally granted status.
    pub status_source: String,
    /// Derived principal attribute listing scoped affiliations.
    pub affiliation_source: String,
    /// External identity source attribute the affiliations are derived from.
    pub affiliation_event_source: String,
    /// Prefix an affiliation must start with to qualify.
    pub affiliation_prefix: String,
    /// Stored principal attribute mapping keys to counts.
    pub count_source: String,
    /// Key whose count must be positive.
    pub count_key: String,
}

impl Default for BonaFideConfig {
    fn default() -> Self {
        Self {
            status_source: DEFAULT_STATUS_SOURCE.to_string(),
            affiliation_source: DEFAULT_AFFILIATION_SOURCE.to_string(),
            affiliation_event_source: DEFAULT_AFFILIATION_EVENT_SOURCE.to_string(),
            affiliation_prefix: DEFAULT_AFFILIATION_PREFIX.to_string(),
            count_source: DEFAULT_COUNT_SOURCE.to_string(),
            count_key: DEFAULT_COUNT_KEY.to_string(),
        }
    }
}

impl BonaFideConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional, defaults in parentheses:
    /// - `BONAFIDE_STATUS_SOURCE` (`elixirBonaFideStatusREMS`)
    /// - `BONAFIDE_AFFILIATION_SOURCE` (`eduPersonScopedAffiliations`)
    /// - `BONAFIDE_AFFILIATION_EVENT_SOURCE` (`affiliation`)
    /// - `BONAFIDE_AFFILIATION_PREFIX` (`faculty@`)
    /// - `BONAFIDE_COUNT_SOURCE` (`publications`)
    /// - `BONAFIDE_COUNT_KEY` (`ELIXIR`)
    pub fn from_env() -> Result<Self, AttributeError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value. Same variables and rules as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AttributeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(v) = lookup("BONAFIDE_STATUS_SOURCE") {
            builder = builder.status_source(v);
        }
        if let Some(v) = lookup("BONAFIDE_AFFILIATION_SOURCE") {
            builder = builder.affiliation_source(v);
        }
        if let Some(v) = lookup("BONAFIDE_AFFILIATION_EVENT_SOURCE") {
            builder = builder.affiliation_event_source(v);
        }
        if let Some(v) = lookup("BONAFIDE_AFFILIATION_PREFIX") {
            builder = builder.affiliation_prefix(v);
        }
        if let Some(v) = lookup("BONAFIDE_COUNT_SOURCE") {
            builder = builder.count_source(v);
        }
        if let Some(v) = lookup("BONAFIDE_COUNT_KEY") {
            builder = builder.count_key(v);
        }
        builder.build()
    }

    /// Create a new configuration builder starting from the defaults.
    #[must_use]
    pub fn builder() -> BonaFideConfigBuilder {
        BonaFideConfigBuilder::new()
    }

    /// Store reference of the status source.
    #[must_use]
    pub fn status_ref(&self) -> AttributeRef {
        AttributeRef::new(NS_PRINCIPAL_ATTR_DEF, &self.status_source)
    }

    /// Store reference of the affiliation list source.
    #[must_use]
    pub fn affiliation_ref(&self) -> AttributeRef {
        AttributeRef::new(NS_PRINCIPAL_ATTR_VIRT, &self.affiliation_source)
    }

    /// Reference of the external identity source attribute feeding the affiliations.
    #[must_use]
    pub fn affiliation_event_ref(&self) -> AttributeRef {
        AttributeRef::new(NS_EXT_SOURCE_ATTR_DEF, &self.affiliation_event_source)
    }

    /// Store reference of the keyed count source.
    #[must_use]
    pub fn count_ref(&self) -> AttributeRef {
        AttributeRef::new(NS_PRINCIPAL_ATTR_DEF, &self.count_source)
    }
}

/// Builder for `BonaFideConfig`.
#[derive(Debug, Default)]
pub struct BonaFideConfigBuilder {
    config: BonaFideConfig,
}

impl BonaFideConfigBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status_source(mut self, name: impl Into<String>) -> Self {
        self.config.status_source = name.into();
        self
    }

    #[must_use]
    pub fn affiliation_source(mut self, name: impl Into<String>) -> Self {
        self.config.affiliation_source = name.into();
        self
    }

    #[must_use]
    pub fn affiliation_event_source(mut self, name: impl Into<String>) -> Self {
        self.config.affiliation_event_source = name.into();
        self
    }

    #[must_use]
    pub fn affiliation_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.affiliation_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn count_source(mut self, name: impl Into<String>) -> Self {
        self.config.count_source = name.into();
        self
    }

    #[must_use]
    pub fn count_key(mut self, key: impl Into<String>) -> Self {
        self.config.count_key = key.into();
        self
    }

    /// Build the configuration, rejecting empty values.
    pub fn build(self) -> Result<BonaFideConfig, AttributeError> {
        let c = &self.config;
        let fields = [
            ("BONAFIDE_STATUS_SOURCE", &c.status_source),
            ("BONAFIDE_AFFILIATION_SOURCE", &c.affiliation_source),
            ("BONAFIDE_AFFILIATION_EVENT_SOURCE", &c.affiliation_event_source),
            ("BONAFIDE_AFFILIATION_PREFIX", &c.affiliation_prefix),
            ("BONAFIDE_COUNT_SOURCE", &c.count_source),
            ("BONAFIDE_COUNT_KEY", &c.count_key),
        ];
        for (var, value) in fields {
            if value.trim().is_empty() {
                return Err(AttributeError::ConfigInvalid {
                    var: var.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(self.config)
    }
}
