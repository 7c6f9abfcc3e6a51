//! Owner roles and what each may do

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a workspace owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    /// Capabilities granted to this role
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Teacher => Capabilities {
                can_assign_homework: true,
                can_submit_homework: false,
                can_grade: true,
            },
            Self::Student => Capabilities {
                can_assign_homework: false,
                can_submit_homework: true,
                can_grade: false,
            },
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => write!(f, "teacher"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// Feature switches attached to a workspace instead of role-specific subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub can_assign_homework: bool,
    pub can_submit_homework: bool,
    pub can_grade: bool,
}

/// Owner of a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
    pub role: Role,
}

impl Owner {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }

    pub fn teacher(id: impl Into<String>) -> Self {
        Self::new(id, Role::Teacher)
    }

    pub fn student(id: impl Into<String>) -> Self {
        Self::new(id, Role::Student)
    }
}
