/// The grammar level at which an option is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Legal before any group/command token, and anywhere after.
    Global,
    /// Legal after the group token.
    Group,
    /// Legal only after the command token.
    Command,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Group => write!(f, "group"),
            Scope::Command => write!(f, "command"),
        }
    }
}

/// A grammar position on the [`ParseState`](./struct.ParseState.html) context stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Outermost position: program level.
    Global,
    /// A group token was matched.
    Group,
    /// A command token was matched.
    Command,
    /// An option is awaiting its value(s).
    Option,
    /// The `--` separator was consumed; everything remaining is positional.
    Args,
}

/// The kind of framework object bound by a metadata injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionKind {
    /// The [`GlobalMetadata`](./struct.GlobalMetadata.html) of the program.
    Global,
    /// The selected [`CommandGroupMetadata`](./struct.CommandGroupMetadata.html), if any.
    Group,
    /// The selected [`CommandMetadata`](./struct.CommandMetadata.html).
    Command,
}
