use serde::{Deserialize, Serialize};

/// Compositional role of an element within a three-element cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Left,
    Center,
    Right,
}

impl Role {
    /// Number of designed roles
    pub const COUNT: usize = 3;

    /// 0 → Left, 1 → Center, 2 → Right; any other index falls back to Center
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Role::Left,
            2 => Role::Right,
            _ => Role::Center,
        }
    }

    /// Whether `index` has a designed role rather than the fallback
    pub fn is_designed(index: usize) -> bool {
        index < Self::COUNT
    }
}
