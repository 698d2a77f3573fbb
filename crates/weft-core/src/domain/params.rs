//! Declared parameter names of an injected task.

use crate::error::SignatureError;
use crate::signature;

/// Ordered parameter names; for injected tasks these are the dependency names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<String>);

impl Params {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Read the names from signature text such as `"(op1, op2) => ..."`.
    pub fn from_signature(source: &str) -> Result<Self, SignatureError> {
        signature::parameter_names(source).map(Self)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_names(self) -> Vec<String> {
        self.0
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Params {
    fn from(names: [S; N]) -> Self {
        Self::new(names)
    }
}

impl<S: Into<String>> From<Vec<S>> for Params {
    fn from(names: Vec<S>) -> Self {
        Self::new(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_array_and_signature_agree() {
        let a = Params::from(["op1", "op2"]);
        let b = Params::from_signature("function (op1, op2) {}").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.last(), Some("op2"));
    }

    #[test]
    fn empty_array_has_no_names() {
        let p = Params::from([] as [&str; 0]);
        assert!(p.is_empty());
    }
}
