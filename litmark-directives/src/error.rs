//! `DirectiveFailure` (§7 `CoreError::Directive`, §8 scenario 4).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveFailure {
    /// One or more attribute/body/separator errors accumulated while
    /// reading a single directive invocation.
    Composite { name: String, messages: Vec<String> },
    /// A `@:name` marker appeared where no enclosing directive declared it
    /// as one of its separators.
    OrphanedSeparator { name: String },
    /// The host parser recognized a directive start for a name with no
    /// registered declaration.
    UnknownDirective { name: String },
}

impl fmt::Display for DirectiveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveFailure::Composite { name, messages } => write!(
                f,
                "One or more errors processing directive '{name}': {}",
                messages.join(", ")
            ),
            DirectiveFailure::OrphanedSeparator { name } => {
                write!(f, "Orphaned separator directive with name '{name}'")
            }
            DirectiveFailure::UnknownDirective { name } => {
                write!(f, "unknown directive '{name}'")
            }
        }
    }
}

impl std::error::Error for DirectiveFailure {}

/// The exact wording §4.5 item 4 specifies for separator-count violations;
/// these strings are pushed into a [`DirectiveFailure::Composite`]'s
/// `messages`, not raised as their own error variant.
pub fn too_few_message(name: &str, min: usize, actual: usize) -> String {
    format!("too few occurrences of separator directive '{name}': expected min: {min}, actual: {actual}")
}

pub fn too_many_message(name: &str, max: usize, actual: usize) -> String {
    format!("too many occurrences of separator directive '{name}': expected max: {max}, actual: {actual}")
}
