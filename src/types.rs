/// Shared types used across the codebase

/// Account operations exposed over HTTP
/// Used by the service for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete, // Archives the page, never removes it
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Client-facing message for any failure of this operation
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::List => "failed to fetch accounts",
            Operation::Create => "failed to create account",
            Operation::Update => "failed to update account",
            Operation::Delete => "failed to delete account",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
