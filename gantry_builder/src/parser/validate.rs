use std::sync::Arc;

use crate::error::GrammarError;
use crate::metadata::CommandMetadata;
use crate::model::Context;
use crate::parser::ParseState;

/// Checks that a terminal [`ParseState`] is a complete sentence of the grammar.
///
/// The checks run in a fixed order, and only the first failure is reported:
/// 1. a command was selected,
/// 2. required arguments were given,
/// 3. no tokens were left over,
/// 4. no option is awaiting its value(s),
/// 5. every required option was given.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    /// Validate `state`, returning the selected command.
    pub fn validate(&self, state: &ParseState) -> Result<Arc<CommandMetadata>, GrammarError> {
        let command = match state.command() {
            Some(command) => command.clone(),
            None if state.unparsed_input().is_empty() => {
                return Err(GrammarError::CommandMissing);
            }
            None => {
                return Err(GrammarError::CommandUnrecognized(
                    state.unparsed_input().to_vec(),
                ));
            }
        };

        if let Some(arguments) = command.arguments() {
            if arguments.is_required() && state.parsed_arguments().is_empty() {
                return Err(GrammarError::ArgumentsMissing(arguments.title().to_string()));
            }
        }

        if !state.unparsed_input().is_empty() {
            return Err(GrammarError::ArgumentsUnexpected(
                state.unparsed_input().to_vec(),
            ));
        }

        if state.location() == Context::Option {
            let flag = match state.current_option() {
                Some(current) => current.option().canonical_flag().to_string(),
                None => unreachable!("internal error - the option context must carry its option"),
            };
            return Err(GrammarError::OptionMissingValue(flag));
        }

        for option in command.all_options() {
            if option.is_required() && !state.contains(&option.key()) {
                return Err(GrammarError::OptionMissing(
                    option.canonical_flag().to_string(),
                ));
            }
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AccessorPath, Slot, Typed, Value};
    use crate::metadata::{ArgumentsMetadata, OptionMetadata};
    use crate::model::Scope;

    #[derive(Default)]
    struct Target {
        out: String,
        label: Option<String>,
        files: Vec<String>,
    }

    fn command(required_arguments: bool) -> Arc<CommandMetadata> {
        Arc::new(
            CommandMetadata::builder::<Target>("build")
                .option(
                    OptionMetadata::builder(Scope::Command, String::value_type())
                        .flags(["-o", "--out"])
                        .required(true)
                        .accessor(
                            AccessorPath::root()
                                .leaf(Slot::scalar::<Target, String>("out", |t| &mut t.out)),
                        )
                        .build()
                        .unwrap(),
                )
                .option(
                    OptionMetadata::builder(Scope::Command, String::value_type())
                        .flag("--label")
                        .accessor(
                            AccessorPath::root()
                                .leaf(Slot::optional::<Target, String>("label", |t| &mut t.label)),
                        )
                        .build()
                        .unwrap(),
                )
                .arguments(
                    ArgumentsMetadata::builder(String::value_type())
                        .required(required_arguments)
                        .accessor(AccessorPath::root().leaf(Slot::collection::<
                            Target,
                            Vec<String>,
                            String,
                        >(
                            "files", |t| &mut t.files
                        )))
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
    }

    fn string(raw: &str) -> Value {
        Value::new(raw, raw.to_string())
    }

    fn with_out(state: ParseState, command: &Arc<CommandMetadata>) -> ParseState {
        state.with_option(&command.command_options()[0], vec![string("dist")])
    }

    #[test]
    fn command_missing() {
        let error = Validator.validate(&ParseState::new()).unwrap_err();
        assert_eq!(error, GrammarError::CommandMissing);
    }

    #[test]
    fn command_unrecognized() {
        let state = ParseState::new().with_unparsed_input(&["deploy", "x"]);
        let error = Validator.validate(&state).unwrap_err();
        assert_eq!(
            error,
            GrammarError::CommandUnrecognized(vec!["deploy".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn arguments_missing() {
        let command = command(true);
        // Leftover input is reported after missing arguments.
        let state = ParseState::new()
            .with_command(&command)
            .with_unparsed_input(&["x"]);

        let error = Validator.validate(&state).unwrap_err();

        assert_eq!(error, GrammarError::ArgumentsMissing("files".to_string()));
    }

    #[test]
    fn arguments_unexpected() {
        let command = command(false);
        let state = ParseState::new()
            .with_command(&command)
            .with_unparsed_input(&["x", "y"])
            .awaiting_value(&command.command_options()[1], vec![]);

        let error = Validator.validate(&state).unwrap_err();

        assert_eq!(
            error,
            GrammarError::ArgumentsUnexpected(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn option_missing_value() {
        let command = command(false);
        // Awaiting a value is reported before the missing required option.
        let state = ParseState::new()
            .with_command(&command)
            .awaiting_value(&command.command_options()[1], vec![]);

        let error = Validator.validate(&state).unwrap_err();

        assert_eq!(
            error,
            GrammarError::OptionMissingValue("--label".to_string())
        );
    }

    #[test]
    fn option_missing() {
        let command = command(false);
        let state = ParseState::new().with_command(&command);

        let error = Validator.validate(&state).unwrap_err();

        assert_eq!(error, GrammarError::OptionMissing("--out".to_string()));
    }

    #[test]
    fn valid() {
        // Setup
        let command = command(true);
        let state = with_out(ParseState::new().with_command(&command), &command)
            .with_argument(string("a.txt"));

        // Execute
        let selected = Validator.validate(&state).unwrap();

        // Verify
        assert!(Arc::ptr_eq(&selected, &command));
    }
}
