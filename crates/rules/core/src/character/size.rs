//! Size ladder.

/// Physical size category, ordered smallest to largest.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum SizeTier {
    Diminutive = 0,
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
    Colossal,
    Titanic,
}

impl SizeTier {
    pub const SMALLEST: Self = Self::Diminutive;
    pub const LARGEST: Self = Self::Titanic;

    pub const fn index(self) -> i64 {
        self as u8 as i64
    }

    /// Move `steps` along the ladder, stopping at either end.
    pub fn shifted(self, steps: i64) -> Self {
        let index = self
            .index()
            .saturating_add(steps)
            .clamp(Self::SMALLEST.index(), Self::LARGEST.index());
        // Clamped into the ladder, so the lookup always hits.
        Self::from_repr(index as u8).unwrap_or(self)
    }

    /// Bulk the frame alone can carry, before skill and item bonuses.
    pub const fn base_bulk(self) -> i64 {
        match self {
            Self::Diminutive => 1,
            Self::Tiny => 2,
            Self::Small => 4,
            Self::Medium => 6,
            Self::Large => 8,
            Self::Huge => 12,
            Self::Gargantuan => 16,
            Self::Colossal => 24,
            Self::Titanic => 32,
        }
    }
}
