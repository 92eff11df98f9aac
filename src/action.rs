use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::interface::UserInterface;
use crate::resolver::{ResolveError, SubargValues};
use crate::spec::SubargSpec;

/// The single error type the host parser sees.
/// Resolution error kinds survive only in the message text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Parse error: {0}")]
pub struct ParseError(pub(crate) String);

impl From<ResolveError> for ParseError {
    fn from(error: ResolveError) -> Self {
        ParseError(error.to_string())
    }
}

/// The host parser's plug-in seam: activated with the raw tokens following a flag.
pub trait FlagAction {
    /// React to one occurrence of the flag.
    fn apply(&mut self, tokens: &[&str]) -> Result<(), ParseError>;
}

/// A [`FlagAction`] that resolves the flag's tokens against a [`SubargSpec`] and
/// appends the result to host-owned storage. A repeated flag accumulates one
/// [`SubargValues`] per occurrence.
///
/// ### Example
/// ```
/// use subargs::{FlagAction, KWSubarg, PSubarg, SubargAction, SubargSpec, SubargValues};
///
/// let spec: SubargSpec<String> = SubargSpec::new(
///     vec![PSubarg::new("msg1"), PSubarg::new("msg2")],
///     vec![KWSubarg::new("name")],
/// )
/// .unwrap();
/// let mut results: Vec<SubargValues<String>> = Vec::default();
/// let mut action = SubargAction::new("print", spec, &mut results);
/// action
///     .apply(&["Welcome", "Message", "name=Michael"])
///     .unwrap();
/// drop(action);
///
/// assert_eq!(results[0].get("name"), Some(&"Michael".to_string()));
/// ```
pub struct SubargAction<'a, T> {
    flag: String,
    spec: SubargSpec<T>,
    results: Rc<RefCell<&'a mut Vec<SubargValues<T>>>>,
}

impl<'a, T> std::fmt::Debug for SubargAction<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubargAction")
            .field("flag", &self.flag)
            .field("spec", &self.spec)
            .finish()
    }
}

impl<'a, T> SubargAction<'a, T> {
    /// Create an action for `flag`, binding the host's result storage.
    /// The flag name prefixes every error message as `[flag] ...`.
    pub fn new(
        flag: impl Into<String>,
        spec: SubargSpec<T>,
        results: &'a mut Vec<SubargValues<T>>,
    ) -> Self {
        Self {
            flag: flag.into(),
            spec,
            results: Rc::new(RefCell::new(results)),
        }
    }

    /// Resolve one occurrence of the flag, reporting any failure through the
    /// host's interface.
    ///
    /// On failure, yields the non-zero exit code for the host to abort with.
    pub fn invoke(
        &mut self,
        tokens: &[&str],
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<(), i32>
    where
        T: Clone,
    {
        match self.apply(tokens) {
            Ok(()) => Ok(()),
            Err(error) => {
                user_interface.print_error(error);
                Err(1)
            }
        }
    }
}

impl<'a, T: Clone> FlagAction for SubargAction<'a, T> {
    fn apply(&mut self, tokens: &[&str]) -> Result<(), ParseError> {
        let values = self
            .spec
            .resolve(tokens)
            .map_err(|error| ParseError(format!("[{flag}] {error}", flag = self.flag)))?;
        self.results.borrow_mut().push(values);
        Ok(())
    }
}
