//! The keyword-argument bag passed to command handlers.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::CommandError;

/// Named arguments supplied by the caller of `prompts/get`.
///
/// The bag is passed through untouched: nothing is checked against the
/// declared [`ArgumentDescriptor`](super::ArgumentDescriptor)s. Handlers pull
/// out what they need and report their own errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Creates an empty argument bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw JSON value for `name`, if supplied.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the string argument `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingArgument`] if the argument is absent and
    /// [`CommandError::InvalidArgument`] if it is not a JSON string.
    pub fn get_str(&self, name: &str) -> Result<&str, CommandError> {
        self.raw(name)
            .ok_or_else(|| CommandError::MissingArgument {
                name: name.to_string(),
            })?
            .as_str()
            .ok_or_else(|| CommandError::InvalidArgument {
                name: name.to_string(),
                expected: "a string".to_string(),
            })
    }

    /// Deserialises argument `name` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingArgument`] if the argument is absent and
    /// [`CommandError::InvalidArgument`] if it does not deserialise as `T`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, CommandError> {
        let value = self
            .raw(name)
            .ok_or_else(|| CommandError::MissingArgument {
                name: name.to_string(),
            })?;

        serde_json::from_value(value.clone()).map_err(|e| CommandError::InvalidArgument {
            name: name.to_string(),
            expected: format!("a valid {} ({e})", std::any::type_name::<T>()),
        })
    }

    /// Sets argument `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Number of supplied arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the supplied arguments.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
