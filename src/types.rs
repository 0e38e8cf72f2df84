/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Mutations that emit a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table names used as the resource label on change events.
pub mod tables {
    pub const ESTUDIANTES: &str = "estudiantes";
    pub const MATRICULAS: &str = "matriculas";
    pub const REGISTRO_NOTAS: &str = "registro_notas";
}
