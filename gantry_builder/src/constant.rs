/// Everything after this token is positional, even when it looks like an option.
pub(crate) const ARGS_SEPARATOR: &str = "--";
pub(crate) const FLAG_PREFIX: char = '-';
pub(crate) const VALUE_DELIMITER: char = '=';
// The raw token recorded for a matched switch.
pub(crate) const SWITCH_VALUE: &str = "true";
