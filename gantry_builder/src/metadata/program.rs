use std::collections::HashSet;
use std::sync::Arc;

use crate::error::DefinitionError;
use crate::metadata::{check_collisions, union_options, CommandMetadata, OptionMetadata};

fn include_default(
    default_command: &Option<Arc<CommandMetadata>>,
    mut commands: Vec<Arc<CommandMetadata>>,
) -> Vec<Arc<CommandMetadata>> {
    if let Some(default) = default_command {
        if !commands.iter().any(|c| Arc::ptr_eq(c, default)) {
            commands.push(default.clone());
        }
    }

    commands
}

fn check_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), DefinitionError> {
    let mut seen: HashSet<&str> = HashSet::default();

    for name in names {
        if !seen.insert(name) {
            return Err(DefinitionError::DuplicateName(name.to_string()));
        }
    }

    Ok(())
}

/// A named set of commands sharing group scoped options (ex: `program remote add ..`).
#[derive(Debug)]
pub struct CommandGroupMetadata {
    name: String,
    description: Option<String>,
    options: Vec<Arc<OptionMetadata>>,
    default_command: Option<Arc<CommandMetadata>>,
    commands: Vec<Arc<CommandMetadata>>,
}

impl CommandGroupMetadata {
    /// Create a group; the default command (if any) is added to the commands when absent.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        default_command: Option<Arc<CommandMetadata>>,
        commands: Vec<Arc<CommandMetadata>>,
    ) -> Result<Self, DefinitionError> {
        let commands = include_default(&default_command, commands);
        check_names(commands.iter().map(|c| c.name()))?;
        let options = union_options(commands.iter().flat_map(|c| c.group_options()))?;

        Ok(Self {
            name: name.into(),
            description,
            options,
            default_command,
            commands,
        })
    }

    /// The group token.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The group scoped options of every member command.
    pub fn options(&self) -> &[Arc<OptionMetadata>] {
        &self.options
    }

    /// The command selected when the group token is given alone.
    pub fn default_command(&self) -> Option<&Arc<CommandMetadata>> {
        self.default_command.as_ref()
    }

    /// The member commands.
    pub fn commands(&self) -> &[Arc<CommandMetadata>] {
        &self.commands
    }

    /// Find a member command by name.
    pub fn command(&self, name: &str) -> Option<&Arc<CommandMetadata>> {
        self.commands.iter().find(|c| c.name() == name)
    }
}

/// The immutable description of the whole program.
#[derive(Debug)]
pub struct GlobalMetadata {
    name: String,
    description: Option<String>,
    options: Vec<Arc<OptionMetadata>>,
    default_command: Option<Arc<CommandMetadata>>,
    default_group_commands: Vec<Arc<CommandMetadata>>,
    command_groups: Vec<Arc<CommandGroupMetadata>>,
}

impl GlobalMetadata {
    /// Create the program; the default command (if any) is added to the ungrouped commands when absent.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        default_command: Option<Arc<CommandMetadata>>,
        default_group_commands: Vec<Arc<CommandMetadata>>,
        command_groups: Vec<Arc<CommandGroupMetadata>>,
    ) -> Result<Self, DefinitionError> {
        let default_group_commands = include_default(&default_command, default_group_commands);
        check_names(command_groups.iter().map(|g| g.name()))?;
        check_names(
            default_group_commands
                .iter()
                .map(|c| c.name())
                .chain(command_groups.iter().map(|g| g.name())),
        )?;

        let commands = default_group_commands
            .iter()
            .chain(command_groups.iter().flat_map(|g| g.commands()));
        let options = union_options(commands.flat_map(|c| c.global_options()))?;

        for group in &command_groups {
            let legal: Vec<Arc<OptionMetadata>> =
                group.options().iter().chain(options.iter()).cloned().collect();
            check_collisions(&legal)?;
        }

        Ok(Self {
            name: name.into(),
            description,
            options,
            default_command,
            default_group_commands,
            command_groups,
        })
    }

    /// The program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The global scoped options of every command.
    pub fn options(&self) -> &[Arc<OptionMetadata>] {
        &self.options
    }

    /// The command selected when no group/command token is given.
    pub fn default_command(&self) -> Option<&Arc<CommandMetadata>> {
        self.default_command.as_ref()
    }

    /// The commands outside of any group.
    pub fn default_group_commands(&self) -> &[Arc<CommandMetadata>] {
        &self.default_group_commands
    }

    /// The command groups.
    pub fn command_groups(&self) -> &[Arc<CommandGroupMetadata>] {
        &self.command_groups
    }

    /// Find a group by name.
    pub fn group(&self, name: &str) -> Option<&Arc<CommandGroupMetadata>> {
        self.command_groups.iter().find(|g| g.name() == name)
    }

    /// Find an ungrouped command by name.
    pub fn command(&self, name: &str) -> Option<&Arc<CommandMetadata>> {
        self.default_group_commands.iter().find(|c| c.name() == name)
    }
}
