//! Literal placeholder substitution.
//!
//! This is deliberately not a template language: each token is matched as
//! plain text and anything that is not a registered token passes through
//! untouched, including other brace-delimited text.

/// Ordered list of `(token, value)` pairs applied to template text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` to be replaced with `value`.
    ///
    /// Empty tokens are ignored. Re-registering a token replaces its value.
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            return self;
        }
        let value = value.into();
        match self.pairs.iter_mut().find(|(t, _)| *t == token) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((token, value)),
        }
        self
    }

    /// Replace every occurrence of every registered token, in registration
    /// order.
    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_owned(), |acc, (token, value)| acc.replace(token, value))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(t, _)| t.as_str())
    }
}
