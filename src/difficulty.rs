//! Engine strength tiers.

use std::fmt;

/// Ordered difficulty tiers.
///
/// Each tier fixes a search depth in plies and whether ties between equally
/// scored moves may be broken at random.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    /// Uniformly random legal move.
    #[default]
    Easy,
    /// One ply of lookahead on the static evaluation.
    Medium,
    /// Alpha-beta, 3 plies.
    Hard,
    /// Alpha-beta, 5 plies.
    Expert,
    /// Alpha-beta, 6 plies.
    Grandmaster,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Grandmaster,
    ];

    #[inline]
    pub const fn level_index(self) -> i32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
            Difficulty::Expert => 3,
            Difficulty::Grandmaster => 4,
        }
    }

    /// Search depth in plies; 0 means no lookahead.
    #[inline]
    pub const fn search_depth(self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 3,
            Difficulty::Expert => 5,
            Difficulty::Grandmaster => 6,
        }
    }

    #[inline]
    pub const fn randomness_allowed(self) -> bool {
        matches!(self, Difficulty::Easy | Difficulty::Medium)
    }

    /// Map an externally stored level index to a tier.
    ///
    /// Indices below EASY clamp to EASY, above GRANDMASTER to GRANDMASTER.
    /// An unmatched index in between falls back to MEDIUM.
    pub fn from_level_index(index: i32) -> Self {
        if let Some(d) = Self::ALL.into_iter().find(|d| d.level_index() == index) {
            return d;
        }
        if index <= Difficulty::Easy.level_index() {
            Difficulty::Easy
        } else if index >= Difficulty::Grandmaster.level_index() {
            Difficulty::Grandmaster
        } else {
            Difficulty::Medium
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Grandmaster => "grandmaster",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
