//! # subargs
//!
//! Structured sub-argument lists for command line flags.
//! A single flag carries a mix of positional tokens and `key=value` tokens:
//!
//! ```console
//! myprog --print Welcome Message name=Michael role=brother
//! ```
//!
//! Declare the expected slots once ([`PSubarg`], [`KWSubarg`], [`SubargSpec`]),
//! then resolve each occurrence's raw tokens into a [`SubargValues`] mapping, or
//! surface a precise diagnostic. Tokenization of the command line itself stays
//! with the host parser; this crate consumes the already-split token sequence.
//!
//! ```
//! use subargs::{FlagAction, KWSubarg, PSubarg, SubargAction, SubargSpec, SubargValues};
//!
//! let spec: SubargSpec<String> = SubargSpec::new(
//!     vec![PSubarg::new("msg1"), PSubarg::new("msg2")],
//!     vec![
//!         KWSubarg::new("name"),
//!         KWSubarg::new("role").optional("friend".to_string()),
//!     ],
//! )
//! .unwrap();
//!
//! let mut results: Vec<SubargValues<String>> = Vec::default();
//! let mut action = SubargAction::new("print", spec, &mut results);
//! action
//!     .apply(&["Welcome", "Message", "name=Michael", "role=brother"])
//!     .unwrap();
//! drop(action);
//!
//! assert_eq!(results[0].get("msg1"), Some(&"Welcome".to_string()));
//! assert_eq!(results[0].get("name"), Some(&"Michael".to_string()));
//! ```
//!
//! Sub-arguments convert through plain `fn(&str) -> Result<T, String>` function
//! pointers (`T::from_str` by default), and a [`Printer`] formats the declared
//! slots into the host's help text.
#![deny(missing_docs)]
mod action;
mod interface;
mod printer;
mod resolver;
mod spec;

pub use action::{FlagAction, ParseError, SubargAction};
pub use interface::{ConsoleInterface, UserInterface};
pub use printer::Printer;
pub use resolver::{ResolveError, SubargValues};
pub use spec::{Converter, KWSubarg, PSubarg, SpecError, SubargSpec};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
