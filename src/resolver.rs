use std::collections::HashMap;

use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::spec::SubargSpec;

/// Error resolving a token sequence against a [`SubargSpec`].
/// Deterministic and non-retryable; the first problem in token order wins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Fewer tokens than required positional slots; names the first unfilled slot.
    #[error("missing required positional sub-argument '{name}'.")]
    MissingPositional {
        /// The first unfilled required positional slot.
        name: String,
    },

    /// More positional tokens than declared positional slots.
    #[error("too many positional sub-arguments (unexpected '{token}').")]
    ExtraPositional {
        /// The first surplus token.
        token: String,
    },

    /// A surplus `key=value` token whose key matches no declared keyword slot.
    #[error("unknown keyword sub-argument '{key}'.")]
    UnknownKeyword {
        /// The undeclared key.
        key: String,
    },

    /// The same keyword key was supplied twice; repetition is never a silent overwrite.
    #[error("cannot repeat the keyword sub-argument '{key}'.")]
    DuplicateKeyword {
        /// The repeated key.
        key: String,
    },

    /// A required keyword slot was never supplied.
    #[error("missing required keyword sub-argument '{key}'.")]
    MissingKeyword {
        /// The unsupplied key.
        key: String,
    },

    /// A slot's converter rejected the token text.
    #[error("cannot convert '{token}' for '{name}': {message}")]
    InvalidConversion {
        /// The slot whose converter rejected the text.
        name: String,
        /// The rejected text (for a keyword slot, the text right of the `=`).
        token: String,
        /// The converter's own description of the failure.
        message: String,
    },
}

/// The resolved result of one flag occurrence: a slot name/key to converted
/// value mapping. Required slots are always present; optional keyword slots
/// fall back to their default, and unfilled optional positional slots are omitted.
#[derive(Debug, PartialEq, Eq)]
pub struct SubargValues<T> {
    values: HashMap<String, T>,
}

impl<T> SubargValues<T> {
    /// Look up the converted value for a slot name/key.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.values.get(name)
    }

    /// Whether the result carries a value for the slot name/key.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The number of filled slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no slot was filled.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Visit the filled slots, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

// All in-progress state lives here, local to a single resolve() call.
// The spec itself is read-only throughout.
struct Resolver<'s, T> {
    spec: &'s SubargSpec<T>,
    values: HashMap<String, T>,
    position: usize,
}

impl<'s, T> Resolver<'s, T> {
    fn new(spec: &'s SubargSpec<T>) -> Self {
        Self {
            spec,
            values: HashMap::default(),
            position: 0,
        }
    }

    fn feed(&mut self, token: &str) -> Result<(), ResolveError> {
        if let Some((key, value)) = token.split_once('=') {
            // A leading '=' never forms a keyword token.
            if !key.is_empty() {
                if let Some(slot) = self.spec.keyword(key) {
                    if self.values.contains_key(key) {
                        return Err(ResolveError::DuplicateKeyword {
                            key: key.to_string(),
                        });
                    }

                    let converted =
                        slot.convert(value)
                            .map_err(|message| ResolveError::InvalidConversion {
                                name: key.to_string(),
                                token: value.to_string(),
                                message,
                            })?;
                    self.values.insert(slot.key().to_string(), converted);

                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Matched keyword sub-argument '{key}'.");
                    }

                    return Ok(());
                }
            }
        }

        // An unmatched key falls through to here: 'key=value' with an
        // undeclared key is an ordinary positional token.
        match self.spec.positionals().get(self.position) {
            Some(slot) => {
                let converted =
                    slot.convert(token)
                        .map_err(|message| ResolveError::InvalidConversion {
                            name: slot.name().to_string(),
                            token: token.to_string(),
                            message,
                        })?;
                self.values.insert(slot.name().to_string(), converted);
                self.position += 1;

                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Matched positional sub-argument '{name}'.",
                        name = slot.name()
                    );
                }

                Ok(())
            }
            None => {
                // A surplus token shaped like 'key=value' is almost certainly a
                // mistyped key, so diagnose it as such rather than as overflow.
                Err(match token.split_once('=') {
                    Some((key, _)) if !key.is_empty() => ResolveError::UnknownKeyword {
                        key: key.to_string(),
                    },
                    _ => ResolveError::ExtraPositional {
                        token: token.to_string(),
                    },
                })
            }
        }
    }

    fn close(mut self) -> Result<SubargValues<T>, ResolveError>
    where
        T: Clone,
    {
        // Required slots precede optional ones, so the first unfilled slot decides.
        if let Some(slot) = self.spec.positionals()[self.position..]
            .iter()
            .find(|slot| slot.is_required())
        {
            return Err(ResolveError::MissingPositional {
                name: slot.name().to_string(),
            });
        }

        for slot in self.spec.keywords() {
            if !self.values.contains_key(slot.key()) {
                if slot.is_required() {
                    return Err(ResolveError::MissingKeyword {
                        key: slot.key().to_string(),
                    });
                }

                if let Some(default) = slot.default() {
                    self.values.insert(slot.key().to_string(), default.clone());
                }
            }
        }

        Ok(SubargValues {
            values: self.values,
        })
    }
}

impl<T> SubargSpec<T> {
    /// Resolve one flag's raw tokens against this specification.
    ///
    /// Tokens are scanned left to right.
    /// A token splitting as `key=value` with a non-empty key matching a declared
    /// keyword slot fills that slot; every other token fills the next positional
    /// slot in declaration order. Each token passes through its slot's converter
    /// as it is assigned.
    ///
    /// Resolution stops at the first error in token order.
    /// After the scan, an unfilled required positional slot or keyword slot is an
    /// error; unfilled optional keyword slots take their declared default, and
    /// unfilled optional positional slots are omitted from the result.
    ///
    /// Resolution never mutates the specification; a shared `SubargSpec` may
    /// serve concurrent calls.
    pub fn resolve(&self, tokens: &[&str]) -> Result<SubargValues<T>, ResolveError>
    where
        T: Clone,
    {
        let mut resolver = Resolver::new(self);

        for token in tokens {
            resolver.feed(token)?;
        }

        resolver.close()
    }
}
