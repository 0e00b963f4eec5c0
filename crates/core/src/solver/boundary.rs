use serde::{Deserialize, Serialize};

/// How the neighbour resolver treats cells on the grid edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Edges wrap to the opposite side (torus topology)
    Cyclic,
    /// Neighbours beyond the edge read as zero
    #[default]
    Clamped,
}

impl BoundaryMode {
    /// Map the integer flag of a problem description (non-zero = cyclic)
    #[must_use]
    pub const fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            Self::Clamped
        } else {
            Self::Cyclic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag() {
        assert_eq!(BoundaryMode::from_flag(0), BoundaryMode::Clamped);
        assert_eq!(BoundaryMode::from_flag(1), BoundaryMode::Cyclic);
        assert_eq!(BoundaryMode::from_flag(-3), BoundaryMode::Cyclic);
        assert_eq!(BoundaryMode::default(), BoundaryMode::Clamped);
    }
}
