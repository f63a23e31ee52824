use std::sync::Arc;

use crate::api::Value;
use crate::metadata::{CommandGroupMetadata, CommandMetadata, OptionKey, OptionMetadata};
use crate::model::Context;

/// One occurrence of an option along with its converted values.
#[derive(Debug, Clone)]
pub struct ParsedOption {
    option: Arc<OptionMetadata>,
    values: Vec<Value>,
}

impl ParsedOption {
    /// The matched option.
    pub fn option(&self) -> &Arc<OptionMetadata> {
        &self.option
    }

    /// The converted values of this occurrence (`true` for a switch).
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// An immutable snapshot of parsing progress.
///
/// Every transition returns a new state, leaving `self` untouched.
///
/// ### Example
/// ```
/// # use gantry_builder as gantry;
/// use gantry::{Context, ParseState};
///
/// let initial = ParseState::new();
/// let separated = initial.push_context(Context::Args);
/// assert_eq!(initial.location(), Context::Global);
/// assert_eq!(separated.location(), Context::Args);
/// ```
#[derive(Debug, Clone)]
pub struct ParseState {
    context_stack: Vec<Context>,
    selected_group: Option<Arc<CommandGroupMetadata>>,
    selected_command: Option<Arc<CommandMetadata>>,
    parsed_options: Vec<ParsedOption>,
    parsed_arguments: Vec<Value>,
    current_option: Option<ParsedOption>,
    unparsed_input: Vec<String>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseState {
    /// The state before any token: at the [`Context::Global`] position.
    pub fn new() -> Self {
        Self {
            context_stack: vec![Context::Global],
            selected_group: None,
            selected_command: None,
            parsed_options: Vec::default(),
            parsed_arguments: Vec::default(),
            current_option: None,
            unparsed_input: Vec::default(),
        }
    }

    /// Enter a grammar position.
    pub fn push_context(&self, context: Context) -> Self {
        let mut next = self.clone();
        next.context_stack.push(context);
        next
    }

    /// Leave the current grammar position (the outermost position is never left).
    pub fn pop_context(&self) -> Self {
        let mut next = self.clone();

        if next.context_stack.len() > 1 {
            next.context_stack.pop();
        }

        next
    }

    /// Select a group, entering the [`Context::Group`] position.
    pub fn with_group(&self, group: &Arc<CommandGroupMetadata>) -> Self {
        let mut next = self.push_context(Context::Group);
        next.selected_group.replace(group.clone());
        next
    }

    /// Select a command, entering the [`Context::Command`] position.
    pub fn with_command(&self, command: &Arc<CommandMetadata>) -> Self {
        let mut next = self.push_context(Context::Command);
        next.selected_command.replace(command.clone());
        next
    }

    /// Select a command that was not named by a token (ex: a group's default command).
    /// The [`Context::Command`] position is entered beneath any option still awaiting its value(s).
    pub fn with_default_command(&self, command: &Arc<CommandMetadata>) -> Self {
        let mut next = self.clone();
        let position = next
            .context_stack
            .iter()
            .rposition(|c| matches!(c, Context::Global | Context::Group))
            .map_or(0, |p| p + 1);
        next.context_stack.insert(position, Context::Command);
        next.selected_command.replace(command.clone());
        next
    }

    /// Record a complete occurrence of an option.
    pub fn with_option(&self, option: &Arc<OptionMetadata>, values: Vec<Value>) -> Self {
        let mut next = self.clone();
        next.parsed_options.push(ParsedOption {
            option: option.clone(),
            values,
        });
        next
    }

    /// Record an option whose values ran out, entering the [`Context::Option`] position.
    pub fn awaiting_value(&self, option: &Arc<OptionMetadata>, values: Vec<Value>) -> Self {
        let mut next = self.push_context(Context::Option);
        next.current_option.replace(ParsedOption {
            option: option.clone(),
            values,
        });
        next
    }

    /// Record a positional value.
    pub fn with_argument(&self, value: Value) -> Self {
        let mut next = self.clone();
        next.parsed_arguments.push(value);
        next
    }

    /// Record tokens that matched nothing.
    pub fn with_unparsed_input<S: AsRef<str>>(&self, tokens: &[S]) -> Self {
        let mut next = self.clone();
        next.unparsed_input
            .extend(tokens.iter().map(|t| t.as_ref().to_string()));
        next
    }

    /// The current grammar position.
    pub fn location(&self) -> Context {
        *self
            .context_stack
            .last()
            .expect("internal error - the context stack must never be empty")
    }

    /// Every grammar position entered, outermost first.
    pub fn context_stack(&self) -> &[Context] {
        &self.context_stack
    }

    /// The selected group, if any.
    pub fn group(&self) -> Option<&Arc<CommandGroupMetadata>> {
        self.selected_group.as_ref()
    }

    /// The selected command, if any.
    pub fn command(&self) -> Option<&Arc<CommandMetadata>> {
        self.selected_command.as_ref()
    }

    /// Every complete option occurrence, in encounter order.
    pub fn parsed_options(&self) -> &[ParsedOption] {
        &self.parsed_options
    }

    /// The values of every occurrence of the option `key`, flattened in encounter order.
    pub fn values_for(&self, key: &OptionKey) -> Vec<Value> {
        self.parsed_options
            .iter()
            .filter(|p| &p.option.key() == key)
            .flat_map(|p| p.values.iter().cloned())
            .collect()
    }

    /// Whether the option `key` occurred.
    pub fn contains(&self, key: &OptionKey) -> bool {
        self.parsed_options.iter().any(|p| &p.option.key() == key)
    }

    /// The positional values, in encounter order.
    pub fn parsed_arguments(&self) -> &[Value] {
        &self.parsed_arguments
    }

    /// The option awaiting its value(s), if parsing ended mid-option.
    pub fn current_option(&self) -> Option<&ParsedOption> {
        self.current_option.as_ref()
    }

    /// The tokens that matched nothing.
    pub fn unparsed_input(&self) -> &[String] {
        &self.unparsed_input
    }
}
