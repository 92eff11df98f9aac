use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use thiserror::Error;

/// A sub-argument converter.
/// Turns the raw token text into a `T`, or explains why the text is invalid.
///
/// Converters are plain function pointers: they carry no state, they are `Sync`,
/// and two slot descriptors compare equal only when they point at the same function.
pub type Converter<T> = fn(&str) -> Result<T, String>;

pub(crate) fn from_str_converter<T: FromStr>(token: &str) -> Result<T, String> {
    T::from_str(token).map_err(|_| format!("not a valid {}", std::any::type_name::<T>()))
}

/// Error detecting an invalid sub-argument specification.
/// Raised at declaration time, never during resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    /// Two slots share a name/key; every slot keys into a single result mapping.
    #[error("cannot duplicate the sub-argument '{0}'.")]
    DuplicateName(String),

    /// A required positional slot was declared after an optional one.
    #[error("required positional sub-argument '{0}' follows an optional one.")]
    RequiredAfterOptional(String),
}

/// A positional sub-argument description.
/// Matched against tokens by declaration order, not by name.
///
/// ### Example
/// ```
/// use subargs::PSubarg;
///
/// let in_file: PSubarg<String> = PSubarg::new("in_file").help("path to the input file");
/// let out_file: PSubarg<String> = PSubarg::new("out_file").optional();
/// assert!(in_file.is_required());
/// assert!(!out_file.is_required());
/// ```
pub struct PSubarg<T> {
    name: String,
    converter: Converter<T>,
    required: bool,
    help: Option<String>,
}

impl<T: FromStr> PSubarg<T> {
    /// Create a required positional sub-argument.
    /// The default converter parses via `T::from_str`; for `String` this is a passthrough.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            converter: from_str_converter::<T>,
            required: true,
            help: None,
        }
    }
}

impl<T> PSubarg<T> {
    /// Mark this sub-argument as optional.
    /// An optional slot left unfilled is simply omitted from the resolved result.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Replace the converter for this sub-argument.
    pub fn converter(mut self, converter: Converter<T>) -> Self {
        self.converter = converter;
        self
    }

    /// Document the help message for this sub-argument.
    /// If repeated, only the final message applies.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// The name keying this slot in the resolved result.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a token must be supplied for this slot.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub(crate) fn convert(&self, token: &str) -> Result<T, String> {
        (self.converter)(token)
    }
}

impl<T> PartialEq for PSubarg<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            // converter identity, not behaviour
            && std::ptr::eq(self.converter as *const (), other.converter as *const ())
            && self.required == other.required
            && self.help == other.help
    }
}

impl<T> Eq for PSubarg<T> {}

impl<T> std::fmt::Debug for PSubarg<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PSubarg[{t}, {n}, required={r}]",
            t = std::any::type_name::<T>(),
            n = self.name,
            r = self.required,
        )
    }
}

/// A keyword sub-argument description.
/// Matched against `key=value` tokens by literal key equality, at any token position.
///
/// ### Example
/// ```
/// use subargs::KWSubarg;
///
/// let name: KWSubarg<String> = KWSubarg::new("name");
/// let role: KWSubarg<String> = KWSubarg::new("role").optional("friend".to_string());
/// assert!(name.is_required());
/// assert!(!role.is_required());
/// ```
pub struct KWSubarg<T> {
    key: String,
    converter: Converter<T>,
    required: bool,
    default: Option<T>,
    help: Option<String>,
}

impl<T: FromStr> KWSubarg<T> {
    /// Create a required keyword sub-argument.
    /// The default converter parses via `T::from_str`; for `String` this is a passthrough.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            converter: from_str_converter::<T>,
            required: true,
            default: None,
            help: None,
        }
    }
}

impl<T> KWSubarg<T> {
    /// Mark this sub-argument as optional.
    /// An optional slot left unsupplied takes `default` in the resolved result.
    pub fn optional(mut self, default: T) -> Self {
        self.required = false;
        self.default.replace(default);
        self
    }

    /// Replace the converter for this sub-argument.
    /// The converter applies to the text right of the `=`; never to the declared default.
    pub fn converter(mut self, converter: Converter<T>) -> Self {
        self.converter = converter;
        self
    }

    /// Document the help message for this sub-argument.
    /// If repeated, only the final message applies.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// The key activating this slot, also keying it in the resolved result.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether a `key=value` token must be supplied for this slot.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub(crate) fn default(&self) -> Option<&T> {
        self.default.as_ref()
    }

    pub(crate) fn convert(&self, value: &str) -> Result<T, String> {
        (self.converter)(value)
    }
}

impl<T: PartialEq> PartialEq for KWSubarg<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            // converter identity, not behaviour
            && std::ptr::eq(self.converter as *const (), other.converter as *const ())
            && self.required == other.required
            && self.default == other.default
            && self.help == other.help
    }
}

impl<T: PartialEq> Eq for KWSubarg<T> {}

impl<T> std::fmt::Debug for KWSubarg<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KWSubarg[{t}, {k}, required={r}, default={d}]",
            t = std::any::type_name::<T>(),
            k = self.key,
            r = self.required,
            d = self.default.is_some(),
        )
    }
}

/// The declared shape of one flag's sub-argument list: ordered positional slots
/// plus keyword slots looked up by key.
///
/// Built once at Cli-definition time and immutable thereafter; a shared
/// `SubargSpec` may serve concurrent [`resolve`](SubargSpec::resolve) calls.
///
/// ### Example
/// ```
/// use subargs::{KWSubarg, PSubarg, SubargSpec};
///
/// let spec: SubargSpec<String> = SubargSpec::new(
///     vec![PSubarg::new("msg1"), PSubarg::new("msg2")],
///     vec![
///         KWSubarg::new("name"),
///         KWSubarg::new("role").optional("friend".to_string()),
///     ],
/// )
/// .unwrap();
///
/// let values = spec
///     .resolve(&["Welcome", "Message", "name=Michael", "role=brother"])
///     .unwrap();
/// assert_eq!(values.get("msg1"), Some(&"Welcome".to_string()));
/// assert_eq!(values.get("role"), Some(&"brother".to_string()));
/// ```
pub struct SubargSpec<T> {
    positionals: Vec<PSubarg<T>>,
    keywords: Vec<KWSubarg<T>>,
    index: HashMap<String, usize>,
}

impl<T> SubargSpec<T> {
    /// Assemble a sub-argument specification.
    ///
    /// Fails with [`SpecError`] when two slots share a name/key, or when a required
    /// positional slot is declared after an optional one.
    pub fn new(positionals: Vec<PSubarg<T>>, keywords: Vec<KWSubarg<T>>) -> Result<Self, SpecError> {
        let mut names: HashSet<String> = HashSet::default();
        let mut first_optional: Option<&str> = None;

        for slot in &positionals {
            if !names.insert(slot.name.clone()) {
                return Err(SpecError::DuplicateName(slot.name.clone()));
            }

            match first_optional {
                Some(_) if slot.required => {
                    return Err(SpecError::RequiredAfterOptional(slot.name.clone()));
                }
                None if !slot.required => {
                    first_optional.replace(slot.name.as_str());
                }
                _ => {}
            }
        }

        let mut index: HashMap<String, usize> = HashMap::default();

        for (i, slot) in keywords.iter().enumerate() {
            if !names.insert(slot.key.clone()) {
                return Err(SpecError::DuplicateName(slot.key.clone()));
            }

            index.insert(slot.key.clone(), i);
        }

        Ok(Self {
            positionals,
            keywords,
            index,
        })
    }

    pub(crate) fn positionals(&self) -> &[PSubarg<T>] {
        &self.positionals
    }

    pub(crate) fn keywords(&self) -> &[KWSubarg<T>] {
        &self.keywords
    }

    pub(crate) fn keyword(&self, key: &str) -> Option<&KWSubarg<T>> {
        self.index.get(key).map(|i| &self.keywords[*i])
    }
}

impl<T> std::fmt::Debug for SubargSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubargSpec")
            .field("positionals", &self.positionals)
            .field("keywords", &self.keywords)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn shouting(token: &str) -> Result<String, String> {
        Ok(token.to_ascii_uppercase())
    }

    #[test]
    fn psubarg_equality() {
        let base: PSubarg<String> = PSubarg::new("msg").help("abc");

        assert_eq!(base, PSubarg::new("msg").help("abc"));
        assert_ne!(base, PSubarg::new("other").help("abc"));
        assert_ne!(base, PSubarg::new("msg"));
        assert_ne!(base, PSubarg::new("msg").help("abc").optional());
        assert_ne!(base, PSubarg::new("msg").help("abc").converter(shouting));
    }

    #[test]
    fn kwsubarg_equality() {
        let base: KWSubarg<String> = KWSubarg::new("name").help("abc");

        assert_eq!(base, KWSubarg::new("name").help("abc"));
        assert_ne!(base, KWSubarg::new("other").help("abc"));
        assert_ne!(base, KWSubarg::new("name"));
        assert_ne!(base, KWSubarg::new("name").help("abc").optional("x".to_string()));
        assert_ne!(base, KWSubarg::new("name").help("abc").converter(shouting));
    }

    #[test]
    fn kwsubarg_equality_default() {
        let left: KWSubarg<String> = KWSubarg::new("role").optional("friend".to_string());
        let right: KWSubarg<String> = KWSubarg::new("role").optional("boss".to_string());

        assert_eq!(left, KWSubarg::new("role").optional("friend".to_string()));
        assert_ne!(left, right);
    }

    #[test]
    fn spec() {
        let spec: SubargSpec<String> = SubargSpec::new(
            vec![PSubarg::new("msg1"), PSubarg::new("msg2").optional()],
            vec![KWSubarg::new("name")],
        )
        .unwrap();

        assert_eq!(spec.positionals().len(), 2);
        assert_eq!(spec.keywords().len(), 1);
        assert_eq!(spec.keyword("name").unwrap().key(), "name");
        assert_eq!(spec.keyword("unknown"), None);
    }

    #[rstest]
    #[case(vec!["msg", "msg"], vec![], "msg")]
    #[case(vec![], vec!["name", "name"], "name")]
    #[case(vec!["value"], vec!["value"], "value")]
    fn spec_duplicate_name(
        #[case] positionals: Vec<&str>,
        #[case] keywords: Vec<&str>,
        #[case] duplicate: &str,
    ) {
        let result: Result<SubargSpec<String>, SpecError> = SubargSpec::new(
            positionals.into_iter().map(PSubarg::new).collect(),
            keywords.into_iter().map(KWSubarg::new).collect(),
        );

        assert_eq!(
            result.unwrap_err(),
            SpecError::DuplicateName(duplicate.to_string())
        );
    }

    #[test]
    fn spec_required_after_optional() {
        let result: Result<SubargSpec<String>, SpecError> = SubargSpec::new(
            vec![
                PSubarg::new("first").optional(),
                PSubarg::new("second"),
            ],
            Vec::default(),
        );

        assert_eq!(
            result.unwrap_err(),
            SpecError::RequiredAfterOptional("second".to_string())
        );
    }

    #[test]
    fn spec_empty() {
        let spec: SubargSpec<String> =
            SubargSpec::new(Vec::default(), Vec::default()).unwrap();

        assert!(spec.positionals().is_empty());
        assert!(spec.keywords().is_empty());
    }
}
