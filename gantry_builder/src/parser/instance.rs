use std::any::Any;
use std::sync::Arc;

use crate::api::Value;
use crate::metadata::{CommandMetadata, GlobalMetadata};
use crate::model::InjectionKind;
use crate::parser::ParseState;

/// Materializes a command's target from a validated [`ParseState`].
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    global: Arc<GlobalMetadata>,
}

impl InstanceBuilder {
    /// Create a builder for the program `global` (the source of global metadata injections).
    pub fn new(global: &Arc<GlobalMetadata>) -> Self {
        Self {
            global: global.clone(),
        }
    }

    /// Default construct the `command` target, then write the option values, arguments and injections into it.
    ///
    /// Panics if the metadata doesn't describe its target type (a definition defect).
    pub fn build(&self, state: &ParseState, command: &Arc<CommandMetadata>) -> Box<dyn Any + Send> {
        let mut target = command.target().create();

        for option in command.all_options() {
            let values = state.values_for(&option.key());

            for accessor in option.accessors() {
                accessor.write(&mut *target, &values);
            }
        }

        if let Some(arguments) = command.arguments() {
            for accessor in arguments.accessors() {
                accessor.write(&mut *target, state.parsed_arguments());
            }
        }

        for injection in command.injections() {
            let value = match injection.kind() {
                InjectionKind::Global => Value::new(self.global.name(), self.global.clone()),
                InjectionKind::Group => match state.group() {
                    Some(group) => Value::new(group.name(), group.clone()),
                    None => continue,
                },
                InjectionKind::Command => Value::new(command.name(), command.clone()),
            };

            injection.accessor().write(&mut *target, &[value]);
        }

        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AccessorPath, Injection, Slot, Step, Typed};
    use crate::metadata::{ArgumentsMetadata, CommandGroupMetadata, OptionMetadata};
    use crate::model::Scope;

    #[derive(Debug, Default)]
    struct Shared {
        verbose: bool,
    }

    #[derive(Debug, Default)]
    struct Target {
        first: Shared,
        second: Option<Shared>,
        third: Option<Shared>,
        names: Vec<String>,
        last: Option<String>,
        files: Vec<String>,
        global: Option<Arc<GlobalMetadata>>,
        group: Option<Arc<CommandGroupMetadata>>,
        command: Option<Arc<CommandMetadata>>,
    }

    fn verbose(path: AccessorPath) -> OptionMetadata {
        OptionMetadata::builder(Scope::Global, bool::value_type())
            .flag("--verbose")
            .accessor(path.leaf(Slot::scalar::<Shared, bool>("verbose", |s| &mut s.verbose)))
            .build()
            .unwrap()
    }

    fn command() -> Arc<CommandMetadata> {
        let first = AccessorPath::root().child(Step::field::<Target, Shared>("first", |t| {
            &mut t.first
        }));
        let second = AccessorPath::root().child(Step::optional::<Target, Shared>("second", |t| {
            &mut t.second
        }));
        let root = AccessorPath::root();

        Arc::new(
            CommandMetadata::builder::<Target>("build")
                .option(verbose(first))
                .option(verbose(second))
                .option(
                    OptionMetadata::builder(Scope::Command, String::value_type())
                        .flag("--name")
                        .accessor(root.leaf(Slot::collection::<Target, Vec<String>, String>(
                            "names",
                            |t| &mut t.names,
                        )))
                        .accessor(root.leaf(Slot::optional::<Target, String>("last", |t| {
                            &mut t.last
                        })))
                        .build()
                        .unwrap(),
                )
                .arguments(
                    ArgumentsMetadata::builder(String::value_type())
                        .accessor(root.leaf(Slot::collection::<Target, Vec<String>, String>(
                            "files",
                            |t| &mut t.files,
                        )))
                        .build()
                        .unwrap(),
                )
                .inject(
                    Injection::new(root.leaf(Slot::optional::<Target, Arc<GlobalMetadata>>(
                        "global",
                        |t| &mut t.global,
                    )))
                    .unwrap(),
                )
                .inject(
                    Injection::new(root.leaf(Slot::optional::<Target, Arc<CommandGroupMetadata>>(
                        "group",
                        |t| &mut t.group,
                    )))
                    .unwrap(),
                )
                .inject(
                    Injection::new(root.leaf(Slot::optional::<Target, Arc<CommandMetadata>>(
                        "command",
                        |t| &mut t.command,
                    )))
                    .unwrap(),
                )
                .build()
                .unwrap(),
        )
    }

    fn string(raw: &str) -> Value {
        Value::new(raw, raw.to_string())
    }

    #[test]
    fn build() {
        // Setup
        let command = command();
        let global = Arc::new(
            GlobalMetadata::new("program", None, None, vec![command.clone()], vec![]).unwrap(),
        );
        let options = command.all_options();
        let state = ParseState::new()
            .with_command(&command)
            .with_option(&options[0], vec![Value::switch()])
            .with_option(&options[1], vec![string("a")])
            .with_option(&options[1], vec![string("b")])
            .with_argument(string("x.txt"))
            .with_argument(string("y.txt"));

        // Execute
        let instance = InstanceBuilder::new(&global).build(&state, &command);

        // Verify
        let target = instance.downcast::<Target>().unwrap();
        // Both delegates receive the merged option's value; the lazy one is created.
        assert!(target.first.verbose);
        assert!(target.second.as_ref().unwrap().verbose);
        assert!(target.third.is_none());
        assert_eq!(target.names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(target.last, Some("b".to_string()));
        assert_eq!(target.files, vec!["x.txt".to_string(), "y.txt".to_string()]);
        assert!(Arc::ptr_eq(target.global.as_ref().unwrap(), &global));
        assert!(target.group.is_none());
        assert!(Arc::ptr_eq(target.command.as_ref().unwrap(), &command));
    }

    #[test]
    fn build_untouched() {
        let command = command();
        let global = Arc::new(
            GlobalMetadata::new("program", None, None, vec![command.clone()], vec![]).unwrap(),
        );
        let state = ParseState::new().with_command(&command);

        let instance = InstanceBuilder::new(&global).build(&state, &command);

        let target = instance.downcast::<Target>().unwrap();
        assert!(!target.first.verbose);
        assert!(target.second.is_none());
        assert!(target.names.is_empty());
        assert_eq!(target.last, None);
    }

    #[test]
    fn build_group() {
        let command = command();
        let group = Arc::new(
            CommandGroupMetadata::new("remote", None, None, vec![command.clone()]).unwrap(),
        );
        let global =
            Arc::new(GlobalMetadata::new("program", None, None, vec![], vec![group.clone()]).unwrap());
        let state = ParseState::new().with_group(&group).with_command(&command);

        let instance = InstanceBuilder::new(&global).build(&state, &command);

        let target = instance.downcast::<Target>().unwrap();
        assert!(Arc::ptr_eq(target.group.as_ref().unwrap(), &group));
    }
}
