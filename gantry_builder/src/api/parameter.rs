use std::any::TypeId;
use std::sync::Arc;

use crate::api::{Accessor, AccessorPath};
use crate::error::DefinitionError;
use crate::metadata::{
    ArgumentsMetadata, CommandGroupMetadata, CommandMetadata, GlobalMetadata, OptionMetadata,
};
use crate::model::InjectionKind;

/// A struct that declares options/arguments (and possibly nested delegates) for a command.
///
/// Typically derived via `#[derive(Options)]`, but may be implemented by hand.
///
/// ### Example
/// ```
/// # use gantry_builder as gantry;
/// use gantry::*;
///
/// #[derive(Default)]
/// struct Verbosity {
///     verbose: bool,
/// }
///
/// impl Options for Verbosity {
///     fn declare(
///         declarations: &mut Declarations,
///         path: &AccessorPath,
///     ) -> Result<(), DefinitionError> {
///         declarations.option(
///             OptionMetadata::builder(Scope::Global, bool::value_type())
///                 .flag("-v")
///                 .flag("--verbose")
///                 .accessor(path.leaf(Slot::scalar::<Self, bool>("verbose", |v| &mut v.verbose)))
///                 .build()?,
///         );
///         Ok(())
///     }
/// }
///
/// let mut declarations = Declarations::default();
/// Verbosity::declare(&mut declarations, &AccessorPath::root()).unwrap();
/// assert_eq!(declarations.options().len(), 1);
/// ```
pub trait Options: Default + Send + 'static {
    /// Add this struct's declarations, with every accessor rooted at `path`.
    fn declare(declarations: &mut Declarations, path: &AccessorPath)
        -> Result<(), DefinitionError>;
}

/// A struct that is the target of a command: its declarations plus the command details.
///
/// Typically derived via `#[derive(Command)]`.
pub trait Command: Options {
    /// The name, description, etc of the command.
    fn details() -> CommandDetails;
}

/// The descriptive part of a [`CommandMetadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDetails {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) discussion: Option<String>,
    pub(crate) examples: Vec<String>,
}

impl CommandDetails {
    /// Details for the command `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            hidden: false,
            discussion: None,
            examples: Vec::default(),
        }
    }

    /// Set the one line help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Mark the command as hidden from help.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set the long form help text.
    pub fn discussion(mut self, discussion: impl Into<String>) -> Self {
        self.discussion.replace(discussion.into());
        self
    }

    /// Add a usage example.
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

/// Binds one of the framework's metadata objects into a target field (ex: `Option<Arc<CommandMetadata>>`).
#[derive(Debug, Clone)]
pub struct Injection {
    kind: InjectionKind,
    accessor: Accessor,
}

impl Injection {
    /// Create an injection; the kind is decided by the accessor's element type.
    pub fn new(accessor: Accessor) -> Result<Self, DefinitionError> {
        let element = accessor.element_type();
        let kind = if element == TypeId::of::<Arc<GlobalMetadata>>() {
            InjectionKind::Global
        } else if element == TypeId::of::<Arc<CommandGroupMetadata>>() {
            InjectionKind::Group
        } else if element == TypeId::of::<Arc<CommandMetadata>>() {
            InjectionKind::Command
        } else {
            return Err(DefinitionError::InjectionType {
                accessor: accessor.path(),
                found: accessor.element_name(),
            });
        };

        Ok(Self { kind, accessor })
    }

    /// Which metadata object is injected.
    pub fn kind(&self) -> InjectionKind {
        self.kind
    }

    /// The write target.
    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }
}

/// The raw (unmerged) declarations collected from a command's target type.
#[derive(Debug, Default)]
pub struct Declarations {
    options: Vec<OptionMetadata>,
    arguments: Vec<ArgumentsMetadata>,
    injections: Vec<Injection>,
}

impl Declarations {
    /// Declare an option.
    pub fn option(&mut self, option: OptionMetadata) -> &mut Self {
        self.options.push(option);
        self
    }

    /// Declare the arguments.
    /// Several declarations are allowed, so long as they agree (ex: the same delegate embedded twice).
    pub fn arguments(&mut self, arguments: ArgumentsMetadata) -> &mut Self {
        self.arguments.push(arguments);
        self
    }

    /// Declare a metadata injection.
    pub fn inject(&mut self, injection: Injection) -> &mut Self {
        self.injections.push(injection);
        self
    }

    /// The options declared so far.
    pub fn options(&self) -> &[OptionMetadata] {
        &self.options
    }

    pub(crate) fn into_parts(self) -> (Vec<OptionMetadata>, Vec<ArgumentsMetadata>, Vec<Injection>) {
        (self.options, self.arguments, self.injections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Slot, Step, Typed};
    use crate::model::Scope;

    #[derive(Default)]
    struct Inner {
        count: u32,
    }

    impl Options for Inner {
        fn declare(
            declarations: &mut Declarations,
            path: &AccessorPath,
        ) -> Result<(), DefinitionError> {
            declarations.option(
                OptionMetadata::builder(Scope::Command, u32::value_type())
                    .flag("--count")
                    .accessor(path.leaf(Slot::scalar::<Self, u32>("count", |i| &mut i.count)))
                    .build()?,
            );
            Ok(())
        }
    }

    #[derive(Default)]
    struct Outer {
        inner: Inner,
        lazy: Option<Inner>,
        command: Option<Arc<CommandMetadata>>,
        name: Option<String>,
    }

    impl Options for Outer {
        fn declare(
            declarations: &mut Declarations,
            path: &AccessorPath,
        ) -> Result<(), DefinitionError> {
            Inner::declare(
                declarations,
                &path.child(Step::field::<Self, Inner>("inner", |o| &mut o.inner)),
            )?;
            Inner::declare(
                declarations,
                &path.child(Step::optional::<Self, Inner>("lazy", |o| &mut o.lazy)),
            )?;
            declarations.inject(Injection::new(path.leaf(Slot::optional::<
                Self,
                Arc<CommandMetadata>,
            >(
                "command", |o| &mut o.command
            )))?);
            Ok(())
        }
    }

    #[test]
    fn delegated_declarations() {
        // Setup
        let mut declarations = Declarations::default();

        // Execute
        Outer::declare(&mut declarations, &AccessorPath::root()).unwrap();

        // Verify
        let (options, arguments, injections) = declarations.into_parts();
        let paths: Vec<String> = options
            .iter()
            .flat_map(|o| o.accessors().iter().map(Accessor::path))
            .collect();
        assert_eq!(
            paths,
            vec!["inner.count".to_string(), "lazy.count".to_string()]
        );
        assert!(arguments.is_empty());
        assert_eq!(injections.len(), 1);
        assert_eq!(injections[0].kind(), InjectionKind::Command);
        assert_eq!(injections[0].accessor().path(), "command");
    }

    #[test]
    fn injection_type() {
        let error = Injection::new(
            AccessorPath::root().leaf(Slot::optional::<Outer, String>("name", |o| &mut o.name)),
        )
        .unwrap_err();

        assert_eq!(
            error,
            DefinitionError::InjectionType {
                accessor: "name".to_string(),
                found: std::any::type_name::<String>(),
            }
        );
    }

    #[test]
    fn details() {
        let details = CommandDetails::new("build")
            .description("abc")
            .hidden(true)
            .discussion("def")
            .example("build --out x")
            .example("build");

        assert_eq!(details.name, "build");
        assert_eq!(details.description, Some("abc".to_string()));
        assert!(details.hidden);
        assert_eq!(details.discussion, Some("def".to_string()));
        assert_eq!(details.examples.len(), 2);
    }
}
