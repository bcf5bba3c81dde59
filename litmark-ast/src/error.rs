use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    PathNotAbsolute { path: String },
    DuplicateName { parent: String, name: String },
}

impl fmt::Display for AstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstError::PathNotAbsolute { path } => write!(f, "document tree path {path:?} must be absolute"),
            AstError::DuplicateName { parent, name } => {
                write!(f, "duplicate name {name:?} within {parent:?}")
            }
        }
    }
}

impl std::error::Error for AstError {}
