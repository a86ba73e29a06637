//! Structured documents
//!
//! `stats*` and `list-tubes*` replies carry a YAML body. How that body is
//! turned into a value is decided by the [`Decoder`] configured on the
//! connection; without one the raw bytes are handed back untouched.

use std::fmt;
use std::sync::Arc;

use crate::error::{BeanError, Result};

/// User-supplied decoding function
pub type DecodeFn = Arc<dyn Fn(Vec<u8>) -> Result<Document> + Send + Sync>;

/// How structured-document bodies are decoded
#[derive(Clone, Default)]
pub enum Decoder {
    /// YAML when compiled with the `yaml` feature, identity otherwise
    #[default]
    Auto,

    /// Pass raw bytes through
    Identity,

    #[cfg(feature = "yaml")]
    Yaml,

    Custom(DecodeFn),
}

impl Decoder {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Vec<u8>) -> Result<Document> + Send + Sync + 'static,
    {
        Decoder::Custom(Arc::new(f))
    }

    /// Resolve `Auto` to a concrete decoder
    pub fn resolve(self) -> Self {
        match self {
            #[cfg(feature = "yaml")]
            Decoder::Auto => Decoder::Yaml,
            #[cfg(not(feature = "yaml"))]
            Decoder::Auto => {
                tracing::warn!("YAML support not compiled in, structured replies will be raw");
                Decoder::Identity
            }
            other => other,
        }
    }

    pub fn decode(&self, body: Vec<u8>) -> Result<Document> {
        match self {
            Decoder::Identity => Ok(Document::Raw(body)),
            #[cfg(feature = "yaml")]
            Decoder::Auto | Decoder::Yaml => serde_yaml::from_slice(&body)
                .map(Document::Yaml)
                .map_err(|e| BeanError::Decode(e.to_string())),
            #[cfg(not(feature = "yaml"))]
            Decoder::Auto => Ok(Document::Raw(body)),
            Decoder::Custom(f) => f(body),
        }
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoder::Auto => f.write_str("Auto"),
            Decoder::Identity => f.write_str("Identity"),
            #[cfg(feature = "yaml")]
            Decoder::Yaml => f.write_str("Yaml"),
            Decoder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A decoded structured-document reply
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Undecoded body bytes
    Raw(Vec<u8>),

    #[cfg(feature = "yaml")]
    Yaml(serde_yaml::Value),
}

impl Document {
    /// Raw body, if the document was not decoded
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Document::Raw(bytes) => Some(bytes.as_slice()),
            #[cfg(feature = "yaml")]
            _ => None,
        }
    }

    /// Unsigned integer field of a mapping document
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self {
            #[cfg(feature = "yaml")]
            Document::Yaml(value) => value.get(key).and_then(serde_yaml::Value::as_u64),
            _ => None,
        }
    }

    /// String field of a mapping document
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self {
            #[cfg(feature = "yaml")]
            Document::Yaml(value) => value.get(key).and_then(serde_yaml::Value::as_str),
            _ => None,
        }
    }

    /// Elements of a sequence document, as strings
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            #[cfg(feature = "yaml")]
            Document::Yaml(serde_yaml::Value::Sequence(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        serde_yaml::Value::String(s) => Some(s.clone()),
                        serde_yaml::Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Deserialize a decoded document into a typed value
    #[cfg(feature = "yaml")]
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        match self {
            Document::Yaml(value) => serde_yaml::from_value(value.clone())
                .map_err(|e| BeanError::Decode(e.to_string())),
            Document::Raw(bytes) => {
                serde_yaml::from_slice(bytes).map_err(|e| BeanError::Decode(e.to_string()))
            }
        }
    }
}

/// Typed view of a `stats-job` reply
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobStats {
    pub id: u64,
    pub tube: String,
    pub state: String,
    pub pri: u32,
    pub age: u64,
    pub delay: u64,
    pub ttr: u64,
    pub time_left: u64,
    #[serde(default)]
    pub file: u64,
    pub reserves: u64,
    pub timeouts: u64,
    pub releases: u64,
    pub buries: u64,
    pub kicks: u64,
}
