use std::sync::Arc;

use crate::api::TypeConverter;
use crate::constant::ARGS_SEPARATOR;
use crate::error::ParseError;
use crate::metadata::{CommandMetadata, GlobalMetadata};
use crate::model::Context;
use crate::parser::matcher::{OptionMatcher, Tokens};
use crate::parser::ParseState;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Walks tokens through the program grammar:
/// global options, then an optional group (and its options), then a command, its options and arguments.
///
/// Stateless; the same parser (and metadata) may serve any number of parses, concurrently.
///
/// ### Example
/// ```
/// # use gantry_builder as gantry;
/// use gantry::*;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Status {
///     short: bool,
/// }
///
/// let status = CommandMetadata::builder::<Status>("status")
///     .option(
///         OptionMetadata::builder(Scope::Command, bool::value_type())
///             .flag("-s")
///             .accessor(AccessorPath::root().leaf(Slot::scalar::<Status, bool>("short", |s| &mut s.short)))
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
/// let global = GlobalMetadata::new("git", None, None, vec![Arc::new(status)], vec![]).unwrap();
///
/// let state = Parser.parse(&global, &["status", "-s"]).unwrap();
/// assert_eq!(state.command().unwrap().name(), "status");
/// assert_eq!(state.parsed_options().len(), 1);
///
/// // Nothing matched a command: left for the caller to decide.
/// let state = Parser.parse(&global, &["stash"]).unwrap();
/// assert!(state.command().is_none());
/// assert_eq!(state.unparsed_input(), &["stash".to_string()]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    /// Parse `tokens` against the `global` program grammar.
    ///
    /// Only conversion failures (and values outside an option's allowed set) are raised here.
    /// Grammar completeness is left to the [`Validator`](./struct.Validator.html).
    pub fn parse<S: AsRef<str>>(
        &self,
        global: &GlobalMetadata,
        tokens: &[S],
    ) -> Result<ParseState, ParseError> {
        let mut tokens = Tokens::new(tokens);
        let state =
            OptionMatcher::new(global.options()).consume_all(ParseState::new(), &mut tokens)?;

        if state.location() == Context::Option {
            return Ok(state);
        }

        let (state, commands) = match tokens.peek().and_then(|token| global.group(token)) {
            Some(group) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Selected group {}.", group.name());
                }

                tokens.next();
                let matcher = OptionMatcher::new(group.options().iter().chain(global.options()));
                let state = matcher.consume_all(state.with_group(group), &mut tokens)?;

                if state.location() == Context::Option {
                    return Ok(state);
                }

                (state, group.commands())
            }
            None => (state, global.default_group_commands()),
        };

        match tokens
            .peek()
            .and_then(|token| commands.iter().find(|c| c.name() == token))
        {
            Some(command) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Selected command {}.", command.name());
                }

                tokens.next();
                self.parse_command(command, state.with_command(command), &mut tokens)
            }
            None => Ok(state.with_unparsed_input(tokens.drain())),
        }
    }

    fn parse_command<S: AsRef<str>>(
        &self,
        command: &Arc<CommandMetadata>,
        mut state: ParseState,
        tokens: &mut Tokens<'_, S>,
    ) -> Result<ParseState, ParseError> {
        let matcher = OptionMatcher::new(command.all_options());

        loop {
            state = matcher.consume_all(state, tokens)?;

            if state.location() == Context::Option || !tokens.has_next() {
                return Ok(state);
            }

            state = self.parse_arguments(command, state, tokens)?;
        }
    }

    fn parse_arguments<S: AsRef<str>>(
        &self,
        command: &CommandMetadata,
        state: ParseState,
        tokens: &mut Tokens<'_, S>,
    ) -> Result<ParseState, ParseError> {
        let (mut state, positional) = if tokens.peek() == Some(ARGS_SEPARATOR) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Found the arguments separator.");
            }

            tokens.next();
            (state.push_context(Context::Args), tokens.drain())
        } else {
            (state, tokens.advance(1))
        };

        match command.arguments() {
            Some(arguments) => {
                for token in positional {
                    let value = TypeConverter.convert(
                        arguments.title(),
                        arguments.value_type(),
                        token.as_ref(),
                    )?;
                    state = state.with_argument(value);
                }

                Ok(state)
            }
            None => Ok(state.with_unparsed_input(positional)),
        }
    }
}
