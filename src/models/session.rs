// ABOUTME: Session specification model decoded from a tmuxg session file
// Holds the raw (unexpanded) values exactly as written in the document

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use super::window::WindowSpec;

/// A session as written in its YAML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSpec {
    /// Session name, also the label of the isolated tmux server
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Script run before the session is created, see `setup_script()`.
    #[serde(rename = "setup-script", deserialize_with = "null_as_default")]
    pub setup_script: String,
    /// Variables set for the session, in document order.
    pub environment: EnvironmentSpec,
    /// Default working directory, unexpanded.
    #[serde(deserialize_with = "null_as_default")]
    pub cwd: String,
    /// Windows in tmux index order.
    #[serde(deserialize_with = "null_as_default")]
    pub windows: Vec<WindowSpec>,
    /// Name of the window to focus.
    #[serde(deserialize_with = "null_as_default")]
    pub focus: String,
}

impl SessionSpec {
    /// Decode a session document and fill in window defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        let mut spec: Self = serde_yaml::from_str(contents)?;
        spec.fill_defaults();
        Ok(spec)
    }

    /// Apply window defaults.
    pub fn fill_defaults(&mut self) {
        for window in &mut self.windows {
            window.fill_defaults();
        }
    }

    /// Trimmed setup script body, `None` when there is nothing to run.
    pub fn setup_script(&self) -> Option<&str> {
        let body = self.setup_script.trim();
        if body.is_empty() {
            None
        } else {
            Some(body)
        }
    }

    /// Index of the window named by `focus`, falling back to the first window.
    pub fn focus_index(&self) -> usize {
        self.windows
            .iter()
            .position(|w| !self.focus.is_empty() && w.name == self.focus)
            .unwrap_or(0)
    }
}

/// Environment entries in document order.
///
/// Values may be any YAML scalar; numbers and booleans keep their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSpec(Vec<(String, String)>);

impl EnvironmentSpec {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier entry with the same name in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}

impl<'de> Deserialize<'de> for EnvironmentSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = EnvironmentSpec;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of environment variable names to values")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(EnvironmentSpec::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut env = EnvironmentSpec::new();
                while let Some((key, value)) = map.next_entry::<String, serde_yaml::Value>()? {
                    let value = scalar_to_string(value).ok_or_else(|| {
                        de::Error::custom(format!(
                            "environment variable {key:?} must be a string, number or boolean"
                        ))
                    })?;
                    env.insert(key, value);
                }
                Ok(env)
            }
        }

        deserializer.deserialize_any(EntriesVisitor)
    }
}

fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s),
        _ => None,
    }
}

/// Treat an explicit YAML null (`cwd:` with nothing after it) like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
