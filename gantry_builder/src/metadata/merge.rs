use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DefinitionError;
use crate::metadata::{ArgumentsMetadata, OptionKey, OptionMetadata};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Collapse declarations with identical keys into single logical options, preserving first-declared order.
/// The merged accessors are the union of every contributing declaration.
pub(crate) fn merge_options(
    declared: Vec<OptionMetadata>,
) -> Result<Vec<Arc<OptionMetadata>>, DefinitionError> {
    let mut merged: Vec<OptionMetadata> = Vec::default();
    let mut positions: HashMap<OptionKey, usize> = HashMap::default();

    for option in declared {
        let key = option.key();

        match positions.get(&key) {
            Some(position) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Merging option {key:?} into its earlier declaration.");
                }

                merged[*position].absorb(option)?;
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(option);
            }
        }
    }

    Ok(merged.into_iter().map(Arc::new).collect())
}

/// Union the (already merged) options of several commands, keeping the first instance of each key.
pub(crate) fn union_options<'a>(
    options: impl IntoIterator<Item = &'a Arc<OptionMetadata>>,
) -> Result<Vec<Arc<OptionMetadata>>, DefinitionError> {
    let mut union: Vec<Arc<OptionMetadata>> = Vec::default();
    let mut positions: HashMap<OptionKey, usize> = HashMap::default();

    for option in options {
        let key = option.key();

        match positions.get(&key) {
            Some(position) => {
                let existing = &union[*position];

                if existing.arity() != option.arity() || existing.value_type() != option.value_type()
                {
                    return Err(DefinitionError::IncompatibleOption(
                        option.canonical_flag().to_string(),
                    ));
                }
            }
            None => {
                positions.insert(key, union.len());
                union.push(option.clone());
            }
        }
    }

    check_collisions(&union)?;
    Ok(union)
}

/// Verify no flag is claimed by two distinct logical options.
pub(crate) fn check_collisions(options: &[Arc<OptionMetadata>]) -> Result<(), DefinitionError> {
    let mut owners: HashMap<&str, OptionKey> = HashMap::default();

    for option in options {
        let key = option.key();

        for flag in option.flags() {
            match owners.get(flag.as_str()) {
                Some(owner) if owner != &key => {
                    return Err(DefinitionError::FlagCollision(flag.clone()));
                }
                Some(_) => {}
                None => {
                    owners.insert(flag.as_str(), key.clone());
                }
            }
        }
    }

    Ok(())
}

/// Collapse the arguments declarations of one command; they must all agree.
pub(crate) fn merge_arguments(
    declared: Vec<ArgumentsMetadata>,
) -> Result<Option<ArgumentsMetadata>, DefinitionError> {
    let mut merged: Option<ArgumentsMetadata> = None;

    for arguments in declared {
        match merged.as_mut() {
            Some(existing) => existing.absorb(arguments)?,
            None => {
                merged.replace(arguments);
            }
        }
    }

    Ok(merged)
}
