use serde::{Deserialize, Serialize};

/// One accessibility rule in the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: i32,
    pub name: String,
    pub wcaglevels: String,
    pub benefits: String,
    pub regex: String,
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}
