use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::api::Command;
use crate::error::{DefinitionError, ParseError};
use crate::metadata::{CommandGroupMetadata, CommandMetadata, GlobalMetadata};
use crate::parser::{InstanceBuilder, ParseState, Parser, Validator};

type Converter<C> = Arc<dyn Fn(Box<dyn Any + Send>) -> C + Send + Sync>;

fn converter<T, C, F>(into: F) -> Converter<C>
where
    T: Any,
    C: 'static,
    F: Fn(T) -> C + Send + Sync + 'static,
{
    Arc::new(move |instance: Box<dyn Any + Send>| {
        let instance = instance
            .downcast::<T>()
            .expect("internal error - a command must instantiate its registered type");
        into(*instance)
    })
}

struct Registry<C> {
    default_command: Option<Arc<CommandMetadata>>,
    commands: Vec<Arc<CommandMetadata>>,
    converters: Vec<(Arc<CommandMetadata>, Converter<C>)>,
    deferred_error: Option<DefinitionError>,
}

impl<C: 'static> Registry<C> {
    fn new() -> Self {
        Self {
            default_command: None,
            commands: Vec::default(),
            converters: Vec::default(),
            deferred_error: None,
        }
    }

    fn defer(&mut self, error: DefinitionError) {
        // Only the first error is reported.
        if self.deferred_error.is_none() {
            self.deferred_error.replace(error);
        }
    }

    fn register<T, F>(&mut self, metadata: Result<CommandMetadata, DefinitionError>, into: F, default: bool)
    where
        T: Any,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        let metadata = match metadata {
            Ok(metadata) => metadata,
            Err(error) => {
                self.defer(error);
                return;
            }
        };

        if metadata.target().type_id() != TypeId::of::<T>() {
            self.defer(DefinitionError::TargetType {
                command: metadata.name().to_string(),
                expected: std::any::type_name::<T>(),
                found: metadata.target().name(),
            });
            return;
        }

        let metadata = Arc::new(metadata);

        if default && self.default_command.replace(metadata.clone()).is_some() {
            self.defer(DefinitionError::DuplicateName(format!(
                "default command '{}'",
                metadata.name()
            )));
        }

        self.commands.push(metadata.clone());
        self.converters.push((metadata, converter(into)));
    }
}

/// The configured command line interface, producing a `C` for each successful parse.
///
/// Built via [`Cli::builder`].
///
/// ### Example
/// ```
/// # use gantry_builder as gantry;
/// use gantry::*;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Greet {
///     name: String,
/// }
///
/// impl Options for Greet {
///     fn declare(declarations: &mut Declarations, path: &AccessorPath) -> Result<(), DefinitionError> {
///         declarations.option(
///             OptionMetadata::builder(Scope::Command, String::value_type())
///                 .flags(["-n", "--name"])
///                 .required(true)
///                 .accessor(path.leaf(Slot::scalar::<Self, String>("name", |g| &mut g.name)))
///                 .build()?,
///         );
///         Ok(())
///     }
/// }
///
/// impl Command for Greet {
///     fn details() -> CommandDetails {
///         CommandDetails::new("greet").description("Say hello.")
///     }
/// }
///
/// #[derive(Debug, PartialEq)]
/// enum Action {
///     Greet(Greet),
/// }
///
/// let cli = Cli::<Action>::builder("program")
///     .command(Action::Greet)
///     .build()
///     .unwrap();
///
/// let action = cli.parse(&["greet", "-n", "bob"]).unwrap();
/// assert_eq!(action, Action::Greet(Greet { name: "bob".to_string() }));
///
/// let error = cli.parse(&["greet"]).unwrap_err();
/// assert_eq!(error.to_string(), "Required option '--name' is missing.");
/// ```
pub struct Cli<C> {
    metadata: Arc<GlobalMetadata>,
    converters: Vec<(Arc<CommandMetadata>, Converter<C>)>,
}

impl<C: 'static> Cli<C> {
    /// Start configuring the program `name`.
    pub fn builder(name: impl Into<String>) -> CliBuilder<C> {
        CliBuilder {
            name: name.into(),
            description: None,
            registry: Registry::new(),
            groups: Vec::default(),
        }
    }

    /// The read-only program metadata (ex: for help renderers).
    pub fn metadata(&self) -> &Arc<GlobalMetadata> {
        &self.metadata
    }

    /// Parse `tokens` without validating or building anything (ex: for completion suggesters).
    pub fn parse_state<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParseState, ParseError> {
        Parser.parse(&self.metadata, tokens)
    }

    /// Parse `tokens` into a `C`.
    ///
    /// When no command token is given, the selected group's default command (or else, the program's) is used.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<C, ParseError> {
        let state = self.parse_state(tokens)?;
        let state = match (state.command(), self.default_command(&state)) {
            (None, Some(default)) => state.with_default_command(default),
            _ => state,
        };
        let command = Validator.validate(&state)?;
        let instance = InstanceBuilder::new(&self.metadata).build(&state, &command);
        Ok(self.convert(&command, instance))
    }

    fn default_command(&self, state: &ParseState) -> Option<&Arc<CommandMetadata>> {
        match state.group() {
            Some(group) => self.metadata.group(group.name())?.default_command(),
            None => self.metadata.default_command(),
        }
    }

    fn convert(&self, command: &Arc<CommandMetadata>, instance: Box<dyn Any + Send>) -> C {
        let (_, into) = self
            .converters
            .iter()
            .find(|(c, _)| Arc::ptr_eq(c, command))
            .expect("internal error - every command must have a converter");
        into(instance)
    }
}

/// Builder for [`Cli`].
pub struct CliBuilder<C> {
    name: String,
    description: Option<String>,
    registry: Registry<C>,
    groups: Vec<Result<CommandGroupMetadata, DefinitionError>>,
}

impl<C: 'static> CliBuilder<C> {
    /// Set the program help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Add a command, converting its parsed target into `C` via `into`.
    pub fn command<T, F>(mut self, into: F) -> Self
    where
        T: Command,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        self.registry
            .register::<T, F>(CommandMetadata::of::<T>(), into, false);
        self
    }

    /// Add the command used when no command token is given.
    pub fn default_command<T, F>(mut self, into: F) -> Self
    where
        T: Command,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        self.registry
            .register::<T, F>(CommandMetadata::of::<T>(), into, true);
        self
    }

    /// Add a hand built command, whose target must be `T`.
    pub fn command_with<T, F>(mut self, metadata: CommandMetadata, into: F) -> Self
    where
        T: Any,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        self.registry.register::<T, F>(Ok(metadata), into, false);
        self
    }

    /// Add a group of commands.
    ///
    /// ### Example
    /// ```
    /// # use gantry_builder as gantry;
    /// use gantry::*;
    ///
    /// #[derive(Debug, Default)]
    /// struct List;
    ///
    /// impl Options for List {
    ///     fn declare(_: &mut Declarations, _: &AccessorPath) -> Result<(), DefinitionError> {
    ///         Ok(())
    ///     }
    /// }
    ///
    /// impl Command for List {
    ///     fn details() -> CommandDetails {
    ///         CommandDetails::new("list")
    ///     }
    /// }
    ///
    /// let cli = Cli::<String>::builder("program")
    ///     .group("remote", |group| {
    ///         group
    ///             .description("Manage remotes.")
    ///             .default_command(|_: List| "remote list".to_string())
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(cli.parse(&["remote", "list"]).unwrap(), "remote list");
    /// assert_eq!(cli.parse(&["remote"]).unwrap(), "remote list");
    /// ```
    pub fn group<F>(mut self, name: impl Into<String>, setup: F) -> Self
    where
        F: FnOnce(GroupBuilder<C>) -> GroupBuilder<C>,
    {
        let group = setup(GroupBuilder {
            name: name.into(),
            description: None,
            registry: Registry::new(),
        });
        let GroupBuilder {
            name,
            description,
            registry,
        } = group;
        let Registry {
            default_command,
            commands,
            converters,
            deferred_error,
        } = registry;

        if let Some(error) = deferred_error {
            self.registry.defer(error);
        }

        self.registry.converters.extend(converters);
        self.groups.push(CommandGroupMetadata::new(
            name,
            description,
            default_command,
            commands,
        ));
        self
    }

    /// Check the whole program definition and build the interface.
    pub fn build(self) -> Result<Cli<C>, DefinitionError> {
        let CliBuilder {
            name,
            description,
            registry,
            groups,
        } = self;

        if let Some(error) = registry.deferred_error {
            return Err(error);
        }

        let groups = groups
            .into_iter()
            .map(|group| group.map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        let metadata = GlobalMetadata::new(
            name,
            description,
            registry.default_command,
            registry.commands,
            groups,
        )?;

        Ok(Cli {
            metadata: Arc::new(metadata),
            converters: registry.converters,
        })
    }
}

/// Builder for one group of a [`Cli`]; see [`CliBuilder::group`].
pub struct GroupBuilder<C> {
    name: String,
    description: Option<String>,
    registry: Registry<C>,
}

impl<C: 'static> GroupBuilder<C> {
    /// Set the group help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Add a command to the group.
    pub fn command<T, F>(mut self, into: F) -> Self
    where
        T: Command,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        self.registry
            .register::<T, F>(CommandMetadata::of::<T>(), into, false);
        self
    }

    /// Add the command used when the group token is given without a command token.
    pub fn default_command<T, F>(mut self, into: F) -> Self
    where
        T: Command,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        self.registry
            .register::<T, F>(CommandMetadata::of::<T>(), into, true);
        self
    }

    /// Add a hand built command to the group, whose target must be `T`.
    pub fn command_with<T, F>(mut self, metadata: CommandMetadata, into: F) -> Self
    where
        T: Any,
        F: Fn(T) -> C + Send + Sync + 'static,
    {
        self.registry.register::<T, F>(Ok(metadata), into, false);
        self
    }
}
