//! The rewrite-phase error kinds (§7): unresolved references, duplicate
//! targets, and circular alias chains. `litmark-config` owns config-layer
//! errors and `litmark-directives` owns `DirectiveFailure`; these three are
//! specific to cross-document resolution, which only this crate performs.

use std::fmt;

use litmark_combinators::VirtualPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceError {
    pub document: VirtualPath,
    pub message: String,
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.document, self.message)
    }
}

impl std::error::Error for ReferenceError {}

/// Multiple documents registered the same unique selector. Its `Display`
/// wording is load-bearing: scenario 6 asserts it verbatim at use sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTargetError {
    pub name: String,
    pub paths: Vec<VirtualPath>,
}

impl fmt::Display for DuplicateTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate target id: {}", self.name)
    }
}

impl std::error::Error for DuplicateTargetError {}

/// A chain of alias declarations (a `SpanLink` that names itself via its own
/// `id` while pointing at another selector, §4.6) loops back on a name it
/// already visited. `chain` lists the names in visit order, ending with the
/// repeated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularAliasError {
    pub chain: Vec<String>,
}

impl fmt::Display for CircularAliasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular alias chain: {}", self.chain.join(" -> "))
    }
}

impl std::error::Error for CircularAliasError {}
