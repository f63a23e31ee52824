use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::api::{AccessorPath, Command, CommandDetails, Declarations, Injection};
use crate::error::DefinitionError;
use crate::metadata::{
    check_collisions, merge_arguments, merge_options, ArgumentsMetadata, OptionMetadata,
};
use crate::model::Scope;

/// The type a command instantiates (default constructs) and populates.
#[derive(Clone, Copy)]
pub struct TargetType {
    name: &'static str,
    type_id: TypeId,
    create: fn() -> Box<dyn Any + Send>,
}

impl TargetType {
    /// The target type `T`.
    pub fn of<T: Default + Send + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            create: create_default::<T>,
        }
    }

    /// The type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The [`TypeId`] of the target.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn create(&self) -> Box<dyn Any + Send> {
        (self.create)()
    }
}

fn create_default<T: Default + Send + 'static>() -> Box<dyn Any + Send> {
    Box::new(T::default())
}

impl std::fmt::Debug for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TargetType[{}]", self.name)
    }
}

/// The immutable description of one command: its options (split by scope), arguments, injections and target.
#[derive(Debug)]
pub struct CommandMetadata {
    details: CommandDetails,
    global_options: Vec<Arc<OptionMetadata>>,
    group_options: Vec<Arc<OptionMetadata>>,
    command_options: Vec<Arc<OptionMetadata>>,
    all_options: Vec<Arc<OptionMetadata>>,
    arguments: Option<ArgumentsMetadata>,
    injections: Vec<Injection>,
    target: TargetType,
}

impl CommandMetadata {
    /// Load the metadata of a [`Command`] type.
    pub fn of<T: Command>() -> Result<Self, DefinitionError> {
        let mut declarations = Declarations::default();
        T::declare(&mut declarations, &AccessorPath::root())?;
        Self::new(T::details(), TargetType::of::<T>(), declarations)
    }

    /// Build the metadata of a command by hand, targeting `T`.
    ///
    /// ### Example
    /// ```
    /// # use gantry_builder as gantry;
    /// use gantry::*;
    ///
    /// #[derive(Default)]
    /// struct Clean {
    ///     all: bool,
    /// }
    ///
    /// let command = CommandMetadata::builder::<Clean>("clean")
    ///     .description("Remove build outputs.")
    ///     .option(
    ///         OptionMetadata::builder(Scope::Command, bool::value_type())
    ///             .flag("--all")
    ///             .accessor(AccessorPath::root().leaf(Slot::scalar::<Clean, bool>("all", |c| &mut c.all)))
    ///             .build()
    ///             .unwrap(),
    ///     )
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(command.name(), "clean");
    /// assert_eq!(command.command_options().len(), 1);
    /// ```
    pub fn builder<T: Default + Send + 'static>(name: impl Into<String>) -> CommandMetadataBuilder {
        CommandMetadataBuilder {
            details: CommandDetails::new(name),
            target: TargetType::of::<T>(),
            declarations: Declarations::default(),
        }
    }

    /// Merge and check the raw declarations of a command.
    pub fn new(
        details: CommandDetails,
        target: TargetType,
        declarations: Declarations,
    ) -> Result<Self, DefinitionError> {
        let (options, arguments, injections) = declarations.into_parts();
        let mut global = Vec::default();
        let mut group = Vec::default();
        let mut command = Vec::default();

        for option in options {
            match option.scope() {
                Scope::Global => global.push(option),
                Scope::Group => group.push(option),
                Scope::Command => command.push(option),
            }
        }

        let global_options = merge_options(global)?;
        let group_options = merge_options(group)?;
        let command_options = merge_options(command)?;
        let all_options: Vec<Arc<OptionMetadata>> = global_options
            .iter()
            .chain(group_options.iter())
            .chain(command_options.iter())
            .cloned()
            .collect();
        check_collisions(&all_options)?;
        let arguments = merge_arguments(arguments)?;

        Ok(Self {
            details,
            global_options,
            group_options,
            command_options,
            all_options,
            arguments,
            injections,
            target,
        })
    }

    /// The command token.
    pub fn name(&self) -> &str {
        &self.details.name
    }

    /// The one line help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.details.description.as_deref()
    }

    /// Whether help renderers should skip this command.
    pub fn is_hidden(&self) -> bool {
        self.details.hidden
    }

    /// The long form help text, if any.
    pub fn discussion(&self) -> Option<&str> {
        self.details.discussion.as_deref()
    }

    /// The usage examples.
    pub fn examples(&self) -> &[String] {
        &self.details.examples
    }

    /// The options legal anywhere in the program.
    pub fn global_options(&self) -> &[Arc<OptionMetadata>] {
        &self.global_options
    }

    /// The options legal after this command's group token.
    pub fn group_options(&self) -> &[Arc<OptionMetadata>] {
        &self.group_options
    }

    /// The options legal only after the command token.
    pub fn command_options(&self) -> &[Arc<OptionMetadata>] {
        &self.command_options
    }

    /// Every option of the command: global, then group, then command scoped.
    pub fn all_options(&self) -> &[Arc<OptionMetadata>] {
        &self.all_options
    }

    /// The positional arguments, if the command takes any.
    pub fn arguments(&self) -> Option<&ArgumentsMetadata> {
        self.arguments.as_ref()
    }

    /// The metadata injections.
    pub fn injections(&self) -> &[Injection] {
        &self.injections
    }

    /// The type instantiated for this command.
    pub fn target(&self) -> &TargetType {
        &self.target
    }
}

/// Builder for [`CommandMetadata`].
pub struct CommandMetadataBuilder {
    details: CommandDetails,
    target: TargetType,
    declarations: Declarations,
}

impl CommandMetadataBuilder {
    /// Set the one line help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.details = self.details.description(description);
        self
    }

    /// Mark the command as hidden from help.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.details = self.details.hidden(hidden);
        self
    }

    /// Set the long form help text.
    pub fn discussion(mut self, discussion: impl Into<String>) -> Self {
        self.details = self.details.discussion(discussion);
        self
    }

    /// Add a usage example.
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.details = self.details.example(example);
        self
    }

    /// Declare an option.
    pub fn option(mut self, option: OptionMetadata) -> Self {
        self.declarations.option(option);
        self
    }

    /// Declare the arguments.
    pub fn arguments(mut self, arguments: ArgumentsMetadata) -> Self {
        self.declarations.arguments(arguments);
        self
    }

    /// Declare a metadata injection.
    pub fn inject(mut self, injection: Injection) -> Self {
        self.declarations.inject(injection);
        self
    }

    /// Merge and check the declarations.
    pub fn build(self) -> Result<CommandMetadata, DefinitionError> {
        CommandMetadata::new(self.details, self.target, self.declarations)
    }
}
