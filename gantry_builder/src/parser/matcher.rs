use std::sync::Arc;

use crate::api::{TypeConverter, Value};
use crate::constant::{ARGS_SEPARATOR, FLAG_PREFIX, VALUE_DELIMITER};
use crate::error::{GrammarError, ParseError};
use crate::metadata::OptionMetadata;
use crate::parser::ParseState;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A cursor over the raw tokens.
pub(super) struct Tokens<'t, S> {
    tokens: &'t [S],
    index: usize,
}

impl<'t, S: AsRef<str>> Tokens<'t, S> {
    pub(super) fn new(tokens: &'t [S]) -> Self {
        Self { tokens, index: 0 }
    }

    pub(super) fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.index).map(AsRef::as_ref)
    }

    pub(super) fn next(&mut self) -> Option<&'t str> {
        let token = self.peek();

        if token.is_some() {
            self.index += 1;
        }

        token
    }

    pub(super) fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// Consume (up to) the next `count` tokens.
    pub(super) fn advance(&mut self, count: usize) -> &'t [S] {
        let end = self.tokens.len().min(self.index + count);
        let consumed = &self.tokens[self.index..end];
        self.index = end;
        consumed
    }

    /// Consume every remaining token.
    pub(super) fn drain(&mut self) -> &'t [S] {
        self.advance(self.tokens.len())
    }
}

/// Matches tokens against the options legal at one grammar position.
pub(super) struct OptionMatcher<'m> {
    options: Vec<&'m Arc<OptionMetadata>>,
}

impl<'m> OptionMatcher<'m> {
    pub(super) fn new(options: impl IntoIterator<Item = &'m Arc<OptionMetadata>>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    fn find(&self, flag: &str) -> Option<&'m Arc<OptionMetadata>> {
        self.options.iter().copied().find(|o| o.has_flag(flag))
    }

    fn find_short(&self, single: char) -> Option<&'m Arc<OptionMetadata>> {
        self.options.iter().copied().find(|o| {
            o.flags().iter().any(|f| {
                let mut characters = f.chars();
                characters.next() == Some(FLAG_PREFIX)
                    && characters.next() == Some(single)
                    && characters.next().is_none()
            })
        })
    }

    /// Greedily match options until a token isn't one, or an option runs out of values.
    pub(super) fn consume_all<S: AsRef<str>>(
        &self,
        mut state: ParseState,
        tokens: &mut Tokens<'_, S>,
    ) -> Result<ParseState, ParseError> {
        while tokens.has_next() {
            match self.consume(&state, tokens)? {
                Some(next) => {
                    state = next;

                    if state.current_option().is_some() {
                        break;
                    }
                }
                None => break,
            }
        }

        Ok(state)
    }

    /// Match the next token, in order: simple, GNU long (`--flag=value`), then classic short (`-abc`).
    /// Returns `None` (consuming nothing) when the token isn't an option here.
    pub(super) fn consume<S: AsRef<str>>(
        &self,
        state: &ParseState,
        tokens: &mut Tokens<'_, S>,
    ) -> Result<Option<ParseState>, ParseError> {
        let token = match tokens.peek() {
            Some(token) => token,
            None => return Ok(None),
        };

        if let Some(option) = self.find(token) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Matched option {token} (simple).");
            }

            tokens.next();
            return self.consume_values(state, option, Vec::default(), tokens);
        }

        if let Some((flag, raw)) = token.split_once(VALUE_DELIMITER) {
            if let Some(option) = self.find(flag).filter(|o| o.arity() == 1) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Matched option {flag} (gnu long) with '{raw}'.");
                }

                tokens.next();
                let value = convert(option, raw)?;
                return Ok(Some(state.with_option(option, vec![value])));
            }
        }

        self.consume_classic(state, token, tokens)
    }

    fn consume_classic<S: AsRef<str>>(
        &self,
        state: &ParseState,
        token: &str,
        tokens: &mut Tokens<'_, S>,
    ) -> Result<Option<ParseState>, ParseError> {
        let body = match token.strip_prefix(FLAG_PREFIX) {
            Some(body) if !body.is_empty() && !token.starts_with(ARGS_SEPARATOR) => body,
            _ => return Ok(None),
        };

        // Plan the whole token first; any unknown character means it isn't an option (ex: `-3`).
        let mut switches: Vec<&Arc<OptionMetadata>> = Vec::default();
        let mut valued: Option<(&Arc<OptionMetadata>, &str)> = None;

        for (index, single) in body.char_indices() {
            let option = match self.find_short(single) {
                Some(option) => option,
                None => return Ok(None),
            };

            match option.arity() {
                0 => switches.push(option),
                1 => {
                    valued.replace((option, &body[index + single.len_utf8()..]));
                    break;
                }
                _ => {
                    return Err(GrammarError::ClassicArity(option.canonical_flag().to_string()).into())
                }
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Matched option {token} (classic short).");
        }

        tokens.next();
        let mut next = state.clone();

        for option in switches {
            next = next.with_option(option, vec![Value::switch()]);
        }

        match valued {
            Some((option, "")) => self.consume_values(&next, option, Vec::default(), tokens),
            Some((option, raw)) => {
                let value = convert(option, raw)?;
                Ok(Some(next.with_option(option, vec![value])))
            }
            None => Ok(Some(next)),
        }
    }

    fn consume_values<S: AsRef<str>>(
        &self,
        state: &ParseState,
        option: &Arc<OptionMetadata>,
        mut values: Vec<Value>,
        tokens: &mut Tokens<'_, S>,
    ) -> Result<Option<ParseState>, ParseError> {
        if option.arity() == 0 {
            return Ok(Some(state.with_option(option, vec![Value::switch()])));
        }

        while values.len() < option.arity() {
            match tokens.next() {
                Some(raw) => values.push(convert(option, raw)?),
                None => return Ok(Some(state.awaiting_value(option, values))),
            }
        }

        Ok(Some(state.with_option(option, values)))
    }
}

fn convert(option: &OptionMetadata, raw: &str) -> Result<Value, ParseError> {
    if let Some(allowed) = option.allowed_values() {
        if !allowed.iter().any(|a| a == raw) {
            return Err(GrammarError::ValueNotAllowed {
                option: option.title().to_string(),
                value: raw.to_string(),
                allowed: allowed.to_vec(),
            }
            .into());
        }
    }

    Ok(TypeConverter.convert(option.title(), option.value_type(), raw)?)
}
