use thiserror::Error;

use crate::api::ConversionError;

/// The program definition is inconsistent.
///
/// Raised while building metadata (ex: [`CliBuilder::build`](./struct.CliBuilder.html#method.build)), never while parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// An option declares no flags.
    #[error("Option '{0}' must declare at least one flag.")]
    EmptyFlags(String),

    /// A flag that doesn't start with `-`, or is exactly the `--` separator.
    #[error("Invalid flag '{0}': flags must start with '-' and cannot be the '--' separator.")]
    InvalidFlag(String),

    /// An arity 0 option bound to a non-`bool` value.
    #[error("Option '{0}' takes no values, so it must convert to bool.")]
    SwitchType(String),

    /// An arity N>1 option bound to a scalar field.
    #[error("Option '{0}' takes {1} values, so every accessor must be a collection.")]
    TupleArity(String, usize),

    /// An option/arguments declaration without anywhere to write its values.
    #[error("'{0}' must declare at least one accessor.")]
    MissingAccessor(String),

    /// An accessor's leaf type does not match the declared value type.
    #[error("Accessor '{accessor}' of '{name}' binds {found}, but values convert to {expected}.")]
    AccessorType {
        /// The option/arguments title.
        name: String,
        /// The accessor path.
        accessor: String,
        /// The declared value type.
        expected: &'static str,
        /// The accessor's leaf element type.
        found: &'static str,
    },

    /// A value type registers a conversion that produces some other type.
    #[error("'{name}' converts to {expected}, but registers a conversion producing {found}.")]
    ConversionType {
        /// The option/arguments title.
        name: String,
        /// The declared value type.
        expected: &'static str,
        /// The type produced by the registered conversion.
        found: &'static str,
    },

    /// The same flag set was declared with different arities or value types.
    #[error("Option '{0}' is declared more than once with incompatible arity or value type.")]
    IncompatibleOption(String),

    /// A flag claimed by two distinct logical options.
    #[error("Cannot duplicate the flag '{0}' across distinct options.")]
    FlagCollision(String),

    /// Several arguments declarations on one command that don't agree.
    #[error("Conflicting arguments declarations '{0}' and '{1}'.")]
    ArgumentsConflict(String, String),

    /// An injection bound to something other than `Arc` of a metadata type.
    #[error("Injection '{accessor}' binds {found}, which is not a metadata type.")]
    InjectionType {
        /// The accessor path.
        accessor: String,
        /// The accessor's leaf element type.
        found: &'static str,
    },

    /// Two commands in one namespace (or two groups) share a name.
    #[error("Cannot duplicate the name '{0}'.")]
    DuplicateName(String),

    /// A hand built command registered against a different target type.
    #[error("Command '{command}' instantiates {found}, but was registered as {expected}.")]
    TargetType {
        /// The command name.
        command: String,
        /// The registered type.
        expected: &'static str,
        /// The command metadata target type.
        found: &'static str,
    },
}

/// The token stream doesn't fit the program grammar.
///
/// Carries the option/argument/command names involved, so callers can build their own message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    /// No command token was given, and there is no default command.
    #[error("No command specified.")]
    CommandMissing,

    /// Tokens were given, but none of them selected a command.
    #[error("Command '{}' not recognized.", .0.join(" "))]
    CommandUnrecognized(Vec<String>),

    /// The command's arguments are required, but no positional values were given.
    #[error("Required arguments '{0}' are missing.")]
    ArgumentsMissing(String),

    /// Tokens left over after parsing.
    #[error("Found unexpected parameters: {0:?}.")]
    ArgumentsUnexpected(Vec<String>),

    /// The input ended while an option was still awaiting its value(s).
    #[error("Option '{0}' is missing its value.")]
    OptionMissingValue(String),

    /// A required option was not given.
    #[error("Required option '{0}' is missing.")]
    OptionMissing(String),

    /// The raw value is outside the option's closed set of allowed values.
    #[error("Value '{value}' is not allowed for option '{option}' (allowed: {allowed:?}).")]
    ValueNotAllowed {
        /// The option title.
        option: String,
        /// The raw token.
        value: String,
        /// The allowed values.
        allowed: Vec<String>,
    },

    /// A multi-value option used inside a combined short flag (ex: `-abc`).
    #[error("Option '{0}' takes several values and cannot be used in combined short form.")]
    ClassicArity(String),
}

/// A failed parse attempt.
///
/// Exactly one error is reported per attempt.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token could not convert to its option/argument type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The token stream doesn't fit the grammar.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;

    #[test]
    fn definition_messages() {
        let error = DefinitionError::AccessorType {
            name: "count".to_string(),
            accessor: "common.count".to_string(),
            expected: "u32",
            found: "i8",
        };

        assert_contains!(error.to_string(), "'common.count'");
        assert_contains!(error.to_string(), "binds i8");
        assert_contains!(
            DefinitionError::TupleArity("range".to_string(), 2).to_string(),
            "takes 2 values"
        );
    }

    #[test]
    fn grammar_messages() {
        assert_eq!(
            GrammarError::CommandUnrecognized(vec!["foo".to_string(), "bar".to_string()])
                .to_string(),
            "Command 'foo bar' not recognized."
        );
        assert_eq!(
            GrammarError::OptionMissing("--out".to_string()).to_string(),
            "Required option '--out' is missing."
        );
        assert_eq!(
            GrammarError::ArgumentsUnexpected(vec!["x".to_string()]).to_string(),
            "Found unexpected parameters: [\"x\"]."
        );
    }

    #[test]
    fn parse_error_transparent() {
        let error = ParseError::from(GrammarError::CommandMissing);
        assert_eq!(error.to_string(), "No command specified.");
        assert_matches!(error, ParseError::Grammar(GrammarError::CommandMissing));
    }
}
