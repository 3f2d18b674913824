// ABOUTME: Explicit environment context used for variable expansion and child processes
// Replaces mutation of the process environment with an immutable, threaded value

/// Expansion of session specifications.
pub mod resolver;

pub use resolver::{resolve, ResolvedSession, ResolvedWindow};

use std::collections::BTreeMap;

use crate::models::EnvironmentSpec;

/// Snapshot of environment variables plus the entries layered on top of it.
///
/// Values are never mutated in place; [`Environment::with_var`] returns a new
/// context. The overlay keeps the layered entries in the order they were added
/// so they can be handed to spawned processes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    overlay: Vec<(String, String)>,
}

impl Environment {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Context holding exactly `vars`.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            overlay: Vec::new(),
        }
    }

    /// Value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Like [`Environment::get`] but treats an empty value as unset.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Expand `$NAME` and `${NAME}` references. Unknown variables become empty.
    pub fn expand(&self, input: &str) -> String {
        shellexpand::env_with_context_no_errors(input, |name| Some(self.get(name).unwrap_or("")))
            .into_owned()
    }

    /// New context with `name` set to `value` (taken literally).
    pub fn with_var(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let mut next = self.clone();
        next.vars.insert(name.clone(), value.clone());
        match next.overlay.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => next.overlay.push((name, value)),
        }
        next
    }

    /// Layer session entries on top of this context.
    ///
    /// Entries are expanded one by one in document order, each against the
    /// context produced by the entries before it, so a value may refer to a
    /// sibling listed above it.
    pub fn extend_expanded(&self, entries: &EnvironmentSpec) -> Self {
        entries.iter().fold(self.clone(), |env, (name, raw)| {
            let value = env.expand(raw);
            env.with_var(name, value)
        })
    }

    /// Entries layered on top of the base snapshot, in insertion order.
    pub fn overlay(&self) -> &[(String, String)] {
        &self.overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Environment {
        Environment::from_vars([("HOME", "/home/ada"), ("PATH", "/usr/bin"), ("EMPTY", "")])
    }

    #[test]
    fn test_expand_both_forms() {
        let env = base();
        assert_eq!(env.expand("$HOME/src"), "/home/ada/src");
        assert_eq!(env.expand("${HOME}/src"), "/home/ada/src");
        assert_eq!(env.expand("no references"), "no references");
    }

    #[test]
    fn test_expand_unknown_is_empty() {
        let env = base();
        assert_eq!(env.expand("${NOPE}/x"), "/x");
        assert_eq!(env.expand("a$NOPE-b"), "a-b");
    }

    #[test]
    fn test_with_var_does_not_touch_original() {
        let env = base();
        let next = env.with_var("GOPATH", "/go");

        assert_eq!(env.get("GOPATH"), None);
        assert_eq!(next.get("GOPATH"), Some("/go"));
        assert_eq!(next.overlay(), &[("GOPATH".to_string(), "/go".to_string())]);
    }

    #[test]
    fn test_extend_expanded_chains_in_document_order() {
        let entries: EnvironmentSpec = [
            ("GOPATH", "${HOME}/go"),
            ("SRC", "${GOPATH}/src"),
            ("PATH", "${GOPATH}/bin:${PATH}"),
        ]
        .into_iter()
        .collect();

        let env = base().extend_expanded(&entries);

        assert_eq!(env.get("GOPATH"), Some("/home/ada/go"));
        assert_eq!(env.get("SRC"), Some("/home/ada/go/src"));
        assert_eq!(env.get("PATH"), Some("/home/ada/go/bin:/usr/bin"));
        assert_eq!(env.overlay().len(), 3);
    }

    #[test]
    fn test_extend_expanded_forward_reference_is_not_resolved() {
        let entries: EnvironmentSpec = [("SRC", "${LATER}/src"), ("LATER", "/l")]
            .into_iter()
            .collect();

        let env = base().extend_expanded(&entries);

        assert_eq!(env.get("SRC"), Some("/src"));
        assert_eq!(env.get("LATER"), Some("/l"));
    }

    #[test]
    fn test_non_empty() {
        let env = base();
        assert_eq!(env.non_empty("EMPTY"), None);
        assert_eq!(env.non_empty("HOME"), Some("/home/ada"));
    }
}
