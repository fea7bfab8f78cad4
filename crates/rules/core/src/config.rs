/// Rules configuration: fixed mechanics plus tunable display defaults.
///
/// The dice shape and progression ladder are constants; only floors, the
/// fallback tag and the default formulas may be overridden by a ruleset file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Night vision radius (meters) every character has without a source.
    pub night_vision_floor: f64,
    /// Dark vision radius (meters) every character has without a source.
    pub dark_vision_floor: f64,
    /// Character tag reported when no active source grants one.
    pub default_tag: String,
    /// Expression used when a character has no vitality formula of its own.
    pub vitality_formula: String,
    /// Expression used when a character has no coast-number formula of its own.
    pub coast_formula: String,
}

impl RulesConfig {
    // ===== fixed mechanics =====
    pub const DIE_FACES: u8 = 12;
    /// Faces at or above this count as a success.
    pub const SUCCESS_THRESHOLD: u8 = 8;
    pub const BASE_DICE: usize = 3;
    pub const MAX_NET_BOOSTS: i32 = 10;
    /// Largest pool the dice engine ever draws.
    pub const MAX_POOL: usize = Self::BASE_DICE + Self::MAX_NET_BOOSTS as usize;
    pub const TARGET_NUMBER_BASE: i32 = 6;
    /// Fair-roll target success rate as `numerator / denominator`.
    pub const FAIR_TARGET: (u64, u64) = (5, 12);
    pub const MAX_TIERS: u8 = 5;
    /// Levels between two unlocks of the same track.
    pub const TIER_STRIDE: u32 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_NIGHT_VISION: f64 = 1.0;
    pub const DEFAULT_DARK_VISION: f64 = 0.2;
    pub const DEFAULT_TAG: &'static str = "Humanoid";
    pub const DEFAULT_VITALITY_FORMULA: &'static str = "10 + level + grit";
    pub const DEFAULT_COAST_FORMULA: &'static str = "4 + floor(level / 4)";

    pub fn new() -> Self {
        Self {
            night_vision_floor: Self::DEFAULT_NIGHT_VISION,
            dark_vision_floor: Self::DEFAULT_DARK_VISION,
            default_tag: Self::DEFAULT_TAG.to_owned(),
            vitality_formula: Self::DEFAULT_VITALITY_FORMULA.to_owned(),
            coast_formula: Self::DEFAULT_COAST_FORMULA.to_owned(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
