use std::collections::BTreeSet;

use crate::api::{Accessor, ValueType};
use crate::constant::{ARGS_SEPARATOR, FLAG_PREFIX, VALUE_DELIMITER};
use crate::error::DefinitionError;
use crate::model::Scope;

/// The identity of a logical option: its scope and (unordered) set of spellings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionKey {
    scope: Scope,
    flags: BTreeSet<String>,
}

impl OptionKey {
    /// The scope of the option.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The spellings of the option.
    pub fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }
}

/// One logical option, possibly reachable by several spellings (flags).
///
/// Built via [`OptionMetadata::builder`].
#[derive(Debug, Clone)]
pub struct OptionMetadata {
    scope: Scope,
    flags: Vec<String>,
    title: String,
    titled: bool,
    description: Option<String>,
    arity: usize,
    required: bool,
    hidden: bool,
    allowed_values: Option<Vec<String>>,
    value_type: ValueType,
    accessors: Vec<Accessor>,
}

impl OptionMetadata {
    /// Start building an option at `scope` whose tokens convert to `value_type`.
    ///
    /// ### Example
    /// ```
    /// # use gantry_builder as gantry;
    /// use gantry::{AccessorPath, OptionMetadata, Scope, Slot, Typed};
    ///
    /// #[derive(Default)]
    /// struct Build {
    ///     jobs: u8,
    /// }
    ///
    /// let option = OptionMetadata::builder(Scope::Command, u8::value_type())
    ///     .flag("-j")
    ///     .flag("--jobs")
    ///     .description("Parallel jobs.")
    ///     .accessor(AccessorPath::root().leaf(Slot::scalar::<Build, u8>("jobs", |b| &mut b.jobs)))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(option.title(), "jobs");
    /// assert_eq!(option.arity(), 1);
    /// assert_eq!(option.canonical_flag(), "--jobs");
    /// ```
    pub fn builder(scope: Scope, value_type: ValueType) -> OptionMetadataBuilder {
        OptionMetadataBuilder {
            scope,
            flags: Vec::default(),
            title: None,
            description: None,
            arity: None,
            required: false,
            hidden: false,
            allowed_values: None,
            value_type,
            accessors: Vec::default(),
        }
    }

    /// The grammar level at which this option is legal.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// The spellings, in declaration order.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// The identity of this option.
    pub fn key(&self) -> OptionKey {
        OptionKey {
            scope: self.scope,
            flags: self.flags.iter().cloned().collect(),
        }
    }

    /// Whether `token` is one of this option's spellings.
    pub fn has_flag(&self, token: &str) -> bool {
        self.flags.iter().any(|f| f == token)
    }

    /// The spelling used to name this option in messages: the first long flag, otherwise the first flag.
    pub fn canonical_flag(&self) -> &str {
        canonical(&self.flags).map_or("", String::as_str)
    }

    /// The display name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The number of value tokens consumed per occurrence.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Whether parsing fails when this option is absent.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether help renderers should skip this option.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The closed set of raw values this option accepts, if restricted.
    pub fn allowed_values(&self) -> Option<&[String]> {
        self.allowed_values.as_deref()
    }

    /// The type each value token converts to.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Whether any accessor collects values (rather than keeping the last one).
    pub fn is_multi_valued(&self) -> bool {
        self.accessors.iter().any(Accessor::is_collection)
    }

    /// The write targets for this option's values.
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    pub(crate) fn absorb(&mut self, other: OptionMetadata) -> Result<(), DefinitionError> {
        if self.arity != other.arity
            || self.value_type != other.value_type
            || self.allowed_values != other.allowed_values
            || (self.titled && other.titled && self.title != other.title)
        {
            return Err(DefinitionError::IncompatibleOption(
                self.canonical_flag().to_string(),
            ));
        }

        self.required |= other.required;
        self.hidden |= other.hidden;

        if !self.titled && other.titled {
            self.title = other.title;
            self.titled = true;
        }

        if self.description.is_none() {
            self.description = other.description;
        }

        self.accessors.extend(other.accessors);
        Ok(())
    }
}

/// Builder for [`OptionMetadata`].
pub struct OptionMetadataBuilder {
    scope: Scope,
    flags: Vec<String>,
    title: Option<String>,
    description: Option<String>,
    arity: Option<usize>,
    required: bool,
    hidden: bool,
    allowed_values: Option<Vec<String>>,
    value_type: ValueType,
    accessors: Vec<Accessor>,
}

impl OptionMetadataBuilder {
    /// Add a spelling (ex: `-v`, `--verbose`).
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Add several spellings.
    pub fn flags<S: Into<String>>(mut self, flags: impl IntoIterator<Item = S>) -> Self {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Set the display name.
    /// Defaults to the first long flag (otherwise the first flag) without its leading dashes.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title.replace(title.into());
        self
    }

    /// Set the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Set the number of values consumed per occurrence.
    /// Defaults to 0 for `bool` options (a switch), otherwise 1.
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity.replace(arity);
        self
    }

    /// Mark the option as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark the option as hidden from help.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Restrict the raw values to a closed set.
    pub fn allowed_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.allowed_values
            .replace(values.into_iter().map(Into::into).collect());
        self
    }

    /// Add a write target.
    pub fn accessor(mut self, accessor: Accessor) -> Self {
        self.accessors.push(accessor);
        self
    }

    /// Check and build the option.
    pub fn build(self) -> Result<OptionMetadata, DefinitionError> {
        let OptionMetadataBuilder {
            scope,
            flags: declared,
            title,
            description,
            arity,
            required,
            hidden,
            allowed_values,
            value_type,
            accessors,
        } = self;

        let mut flags: Vec<String> = Vec::default();

        for flag in declared {
            if !is_valid_flag(&flag) {
                return Err(DefinitionError::InvalidFlag(flag));
            }

            if !flags.contains(&flag) {
                flags.push(flag);
            }
        }

        let titled = title.is_some();
        let title = match (title, canonical(&flags)) {
            (Some(title), _) => title,
            (None, Some(flag)) => flag.trim_start_matches(FLAG_PREFIX).to_string(),
            (None, None) => return Err(DefinitionError::EmptyFlags("?".to_string())),
        };

        if flags.is_empty() {
            return Err(DefinitionError::EmptyFlags(title));
        }

        value_type.check(&title)?;

        let arity = arity.unwrap_or(if value_type.is_bool() { 0 } else { 1 });

        if arity == 0 && !value_type.is_bool() {
            return Err(DefinitionError::SwitchType(title));
        }

        if accessors.is_empty() {
            return Err(DefinitionError::MissingAccessor(title));
        }

        for accessor in &accessors {
            if accessor.element_type() != value_type.type_id() {
                return Err(DefinitionError::AccessorType {
                    name: title,
                    accessor: accessor.path(),
                    expected: value_type.name(),
                    found: accessor.element_name(),
                });
            }

            if arity > 1 && !accessor.is_collection() {
                return Err(DefinitionError::TupleArity(title, arity));
            }
        }

        Ok(OptionMetadata {
            scope,
            flags,
            title,
            titled,
            description,
            arity,
            required,
            hidden,
            allowed_values,
            value_type,
            accessors,
        })
    }
}

fn canonical(flags: &[String]) -> Option<&String> {
    flags
        .iter()
        .find(|f| f.starts_with(ARGS_SEPARATOR))
        .or_else(|| flags.first())
}

fn is_valid_flag(flag: &str) -> bool {
    flag.len() > 1
        && flag.starts_with(FLAG_PREFIX)
        && flag != ARGS_SEPARATOR
        && !flag.contains(VALUE_DELIMITER)
        && !flag.contains(char::is_whitespace)
}

/// The positional arguments of a command (at most one per command).
///
/// Built via [`ArgumentsMetadata::builder`].
#[derive(Debug, Clone)]
pub struct ArgumentsMetadata {
    title: String,
    description: Option<String>,
    usage: Option<String>,
    required: bool,
    value_type: ValueType,
    accessors: Vec<Accessor>,
}

impl ArgumentsMetadata {
    /// Start building the arguments, whose tokens convert to `value_type`.
    pub fn builder(value_type: ValueType) -> ArgumentsMetadataBuilder {
        ArgumentsMetadataBuilder {
            title: None,
            description: None,
            usage: None,
            required: false,
            value_type,
            accessors: Vec::default(),
        }
    }

    /// The display name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The usage text, if any.
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Whether parsing fails when no positional values are given.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The type each positional token converts to.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Whether any accessor collects values (rather than keeping the last one).
    pub fn is_multi_valued(&self) -> bool {
        self.accessors.iter().any(Accessor::is_collection)
    }

    /// The write targets for the positional values.
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    pub(crate) fn absorb(&mut self, other: ArgumentsMetadata) -> Result<(), DefinitionError> {
        if self.title != other.title
            || self.description != other.description
            || self.usage != other.usage
            || self.required != other.required
            || self.value_type != other.value_type
        {
            return Err(DefinitionError::ArgumentsConflict(
                self.title.clone(),
                other.title,
            ));
        }

        self.accessors.extend(other.accessors);
        Ok(())
    }
}

/// Builder for [`ArgumentsMetadata`].
pub struct ArgumentsMetadataBuilder {
    title: Option<String>,
    description: Option<String>,
    usage: Option<String>,
    required: bool,
    value_type: ValueType,
    accessors: Vec<Accessor>,
}

impl ArgumentsMetadataBuilder {
    /// Set the display name.
    /// Defaults to the first accessor's field name.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title.replace(title.into());
        self
    }

    /// Set the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Set the usage text.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage.replace(usage.into());
        self
    }

    /// Mark the arguments as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Add a write target.
    pub fn accessor(mut self, accessor: Accessor) -> Self {
        self.accessors.push(accessor);
        self
    }

    /// Check and build the arguments.
    pub fn build(self) -> Result<ArgumentsMetadata, DefinitionError> {
        let ArgumentsMetadataBuilder {
            title,
            description,
            usage,
            required,
            value_type,
            accessors,
        } = self;

        let title = match (title, accessors.first()) {
            (Some(title), _) => title,
            (None, Some(accessor)) => accessor.path(),
            (None, None) => {
                return Err(DefinitionError::MissingAccessor("arguments".to_string()))
            }
        };

        if accessors.is_empty() {
            return Err(DefinitionError::MissingAccessor(title));
        }

        value_type.check(&title)?;

        for accessor in &accessors {
            if accessor.element_type() != value_type.type_id() {
                return Err(DefinitionError::AccessorType {
                    name: title,
                    accessor: accessor.path(),
                    expected: value_type.name(),
                    found: accessor.element_name(),
                });
            }
        }

        Ok(ArgumentsMetadata {
            title,
            description,
            usage,
            required,
            value_type,
            accessors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AccessorPath, Slot, Typed};
    use rstest::rstest;

    #[derive(Default)]
    struct Target {
        verbose: bool,
        count: u32,
        pair: Vec<u32>,
        files: Vec<String>,
        file: Option<String>,
    }

    fn verbose() -> Accessor {
        AccessorPath::root().leaf(Slot::scalar::<Target, bool>("verbose", |t| &mut t.verbose))
    }

    fn count() -> Accessor {
        AccessorPath::root().leaf(Slot::scalar::<Target, u32>("count", |t| &mut t.count))
    }

    fn pair() -> Accessor {
        AccessorPath::root().leaf(Slot::collection::<Target, Vec<u32>, u32>("pair", |t| {
            &mut t.pair
        }))
    }

    fn files() -> Accessor {
        AccessorPath::root().leaf(Slot::collection::<Target, Vec<String>, String>(
            "files",
            |t| &mut t.files,
        ))
    }

    fn file() -> Accessor {
        AccessorPath::root().leaf(Slot::optional::<Target, String>("file", |t| &mut t.file))
    }

    #[test]
    fn switch_defaults() {
        // Setup & Execute
        let option = OptionMetadata::builder(Scope::Global, bool::value_type())
            .flag("-v")
            .flag("--verbose")
            .flag("-v")
            .accessor(verbose())
            .build()
            .unwrap();

        // Verify
        assert_eq!(option.flags(), &["-v".to_string(), "--verbose".to_string()]);
        assert_eq!(option.title(), "verbose");
        assert_eq!(option.arity(), 0);
        assert_eq!(option.canonical_flag(), "--verbose");
        assert!(!option.is_required());
        assert!(!option.is_multi_valued());
        assert!(option.has_flag("-v"));
        assert!(!option.has_flag("--v"));
        assert_eq!(option.scope(), Scope::Global);
    }

    #[test]
    fn value_defaults() {
        let option = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("-c")
            .title("count")
            .description("abc")
            .required(true)
            .hidden(true)
            .allowed_values(["1", "2"])
            .accessor(count())
            .build()
            .unwrap();

        assert_eq!(option.title(), "count");
        assert_eq!(option.description(), Some("abc"));
        assert_eq!(option.arity(), 1);
        assert_eq!(option.canonical_flag(), "-c");
        assert!(option.is_required());
        assert!(option.is_hidden());
        assert_eq!(
            option.allowed_values(),
            Some(&["1".to_string(), "2".to_string()][..])
        );
    }

    #[test]
    fn key_unordered() {
        let a = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flags(["-c", "--count"])
            .accessor(count())
            .build()
            .unwrap();
        let b = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flags(["--count", "-c"])
            .accessor(count())
            .build()
            .unwrap();
        let c = OptionMetadata::builder(Scope::Group, u32::value_type())
            .flags(["--count", "-c"])
            .accessor(count())
            .build()
            .unwrap();

        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[rstest]
    #[case("c")]
    #[case("-")]
    #[case("--")]
    #[case("--a=b")]
    #[case("--a b")]
    fn invalid_flag(#[case] flag: &str) {
        let error = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag(flag)
            .accessor(count())
            .build()
            .unwrap_err();
        assert_eq!(error, DefinitionError::InvalidFlag(flag.to_string()));
    }

    #[test]
    fn empty_flags() {
        let error = OptionMetadata::builder(Scope::Command, u32::value_type())
            .title("count")
            .accessor(count())
            .build()
            .unwrap_err();
        assert_eq!(error, DefinitionError::EmptyFlags("count".to_string()));
    }

    #[test]
    fn switch_type() {
        let error = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("--count")
            .arity(0)
            .accessor(count())
            .build()
            .unwrap_err();
        assert_eq!(error, DefinitionError::SwitchType("count".to_string()));
    }

    #[test]
    fn missing_accessor() {
        let error = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("--count")
            .build()
            .unwrap_err();
        assert_eq!(error, DefinitionError::MissingAccessor("count".to_string()));
    }

    #[test]
    fn accessor_type() {
        let error = OptionMetadata::builder(Scope::Command, i32::value_type())
            .flag("--count")
            .accessor(count())
            .build()
            .unwrap_err();
        assert_matches!(error, DefinitionError::AccessorType { name, accessor, .. } => {
            assert_eq!(name, "count");
            assert_eq!(accessor, "count");
        });
    }

    #[test]
    fn conversion_type() {
        let value_type = ValueType::custom::<u32>().with_parse::<i8>();
        let error = OptionMetadata::builder(Scope::Command, value_type)
            .flag("--count")
            .accessor(count())
            .build()
            .unwrap_err();
        assert_matches!(error, DefinitionError::ConversionType { name, found, .. } => {
            assert_eq!(name, "count");
            assert_eq!(found, "i8");
        });
    }

    #[test]
    fn tuple_arity() {
        let option = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("--pair")
            .arity(2)
            .accessor(pair())
            .build()
            .unwrap();
        assert!(option.is_multi_valued());
        assert_eq!(option.arity(), 2);

        let error = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("--pair")
            .arity(2)
            .accessor(count())
            .build()
            .unwrap_err();
        assert_eq!(error, DefinitionError::TupleArity("pair".to_string(), 2));
    }

    #[test]
    fn option_absorb() {
        // Setup
        let mut a = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("--count")
            .accessor(count())
            .build()
            .unwrap();
        let b = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("--count")
            .description("from b")
            .required(true)
            .accessor(count())
            .build()
            .unwrap();
        let c = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flag("--count")
            .arity(2)
            .accessor(pair())
            .build()
            .unwrap();

        // Execute
        a.absorb(b).unwrap();
        let error = a.absorb(c).unwrap_err();

        // Verify
        assert_eq!(a.accessors().len(), 2);
        assert!(a.is_required());
        assert_eq!(a.description(), Some("from b"));
        assert_eq!(
            error,
            DefinitionError::IncompatibleOption("--count".to_string())
        );
    }

    #[test]
    fn option_absorb_presentation() {
        // Setup
        let mut a = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flags(["-c", "--count"])
            .accessor(count())
            .build()
            .unwrap();
        let b = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flags(["-c", "--count"])
            .title("total")
            .hidden(true)
            .accessor(count())
            .build()
            .unwrap();
        let c = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flags(["-c", "--count"])
            .title("other")
            .accessor(count())
            .build()
            .unwrap();

        // Execute
        a.absorb(b).unwrap();
        let error = a.absorb(c).unwrap_err();

        // Verify
        assert_eq!(a.title(), "total");
        assert!(a.is_hidden());
        assert_eq!(
            error,
            DefinitionError::IncompatibleOption("--count".to_string())
        );
    }

    #[rstest]
    #[case(vec!["-j", "--jobs"], "jobs")]
    #[case(vec!["--jobs", "-j", "--workers"], "jobs")]
    #[case(vec!["-j"], "j")]
    fn default_title(#[case] flags: Vec<&str>, #[case] expected: &str) {
        let option = OptionMetadata::builder(Scope::Command, u32::value_type())
            .flags(flags)
            .accessor(count())
            .build()
            .unwrap();
        assert_eq!(option.title(), expected);
    }

    #[test]
    fn arguments() {
        let arguments = ArgumentsMetadata::builder(String::value_type())
            .usage("FILE...")
            .accessor(files())
            .build()
            .unwrap();

        assert_eq!(arguments.title(), "files");
        assert_eq!(arguments.usage(), Some("FILE..."));
        assert_eq!(arguments.description(), None);
        assert!(!arguments.is_required());
        assert!(arguments.is_multi_valued());
    }

    #[test]
    fn arguments_accessor_type() {
        let error = ArgumentsMetadata::builder(u32::value_type())
            .accessor(files())
            .build()
            .unwrap_err();
        assert_matches!(error, DefinitionError::AccessorType { .. });

        let error = ArgumentsMetadata::builder(u32::value_type())
            .build()
            .unwrap_err();
        assert_eq!(
            error,
            DefinitionError::MissingAccessor("arguments".to_string())
        );
    }

    #[rstest]
    #[case(ArgumentsMetadata::builder(String::value_type()).title("files").accessor(file()), true)]
    #[case(ArgumentsMetadata::builder(String::value_type()).title("other").accessor(file()), false)]
    #[case(ArgumentsMetadata::builder(String::value_type()).title("files").description("abc").accessor(file()), false)]
    #[case(ArgumentsMetadata::builder(String::value_type()).title("files").usage("abc").accessor(file()), false)]
    #[case(ArgumentsMetadata::builder(String::value_type()).title("files").required(true).accessor(file()), false)]
    fn arguments_absorb(#[case] other: ArgumentsMetadataBuilder, #[case] compatible: bool) {
        // Setup
        let mut arguments = ArgumentsMetadata::builder(String::value_type())
            .title("files")
            .accessor(files())
            .build()
            .unwrap();

        // Execute
        let result = arguments.absorb(other.build().unwrap());

        // Verify
        if compatible {
            result.unwrap();
            assert_eq!(arguments.accessors().len(), 2);
        } else {
            assert_matches!(result, Err(DefinitionError::ArgumentsConflict(..)));
            assert_eq!(arguments.accessors().len(), 1);
        }
    }
}
