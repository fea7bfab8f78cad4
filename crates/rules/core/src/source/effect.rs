//! Typed modifier entries carried by sources.

use crate::progression::ProgressionTier;

/// Which derived progression a [`EffectEntry::ProgressionOverride`] targets.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProgressionStat {
    Speed,
    ToughnessTn,
    DestinyTn,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VisionKind {
    Night,
    Dark,
}

/// One modifier contributed by a source.
///
/// The merge policy for each variant lives in [`crate::stats`]; this type only
/// carries the data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectEntry {
    Proficiency { value: String },
    ProgressionOverride { stat: ProgressionStat, tier: ProgressionTier },
    VisionRadius {
        vision: VisionKind,
        #[cfg_attr(feature = "serde", serde(default))]
        meters: Numeric,
    },
    BulkCapacityBoost {
        #[cfg_attr(feature = "serde", serde(default))]
        amount: Numeric,
    },
    SizeModifier {
        #[cfg_attr(feature = "serde", serde(default))]
        steps: Numeric,
    },
    Resistance { tag: String },
    Vulnerability { tag: String },
}

impl EffectEntry {
    pub fn proficiency(value: impl Into<String>) -> Self {
        Self::Proficiency { value: value.into() }
    }

    pub fn progression(stat: ProgressionStat, tier: ProgressionTier) -> Self {
        Self::ProgressionOverride { stat, tier }
    }

    pub fn vision(vision: VisionKind, meters: impl Into<Numeric>) -> Self {
        Self::VisionRadius {
            vision,
            meters: meters.into(),
        }
    }

    pub fn bulk(amount: impl Into<Numeric>) -> Self {
        Self::BulkCapacityBoost {
            amount: amount.into(),
        }
    }

    pub fn size(steps: impl Into<Numeric>) -> Self {
        Self::SizeModifier {
            steps: steps.into(),
        }
    }

    pub fn resistance(tag: impl Into<String>) -> Self {
        Self::Resistance { tag: tag.into() }
    }

    pub fn vulnerability(tag: impl Into<String>) -> Self {
        Self::Vulnerability { tag: tag.into() }
    }

    /// Numeric payload that failed to parse, if this entry has one.
    pub fn malformed_number(&self) -> Option<&Numeric> {
        let number = match self {
            Self::VisionRadius { meters, .. } => meters,
            Self::BulkCapacityBoost { amount } => amount,
            Self::SizeModifier { steps } => steps,
            _ => return None,
        };
        number.value().is_none().then_some(number)
    }
}

/// A host-supplied number that may be missing or garbage.
///
/// Anything that is not a finite number reads as absent. Absent values make no
/// contribution to a merge; they never count as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Numeric(Option<f64>);

impl Numeric {
    pub const ABSENT: Self = Self(None);

    pub fn new(value: f64) -> Self {
        Self(Some(value))
    }

    pub fn parse(text: &str) -> Self {
        Self(text.trim().parse::<f64>().ok())
    }

    /// The value if it is finite.
    pub fn value(&self) -> Option<f64> {
        self.0.filter(|v| v.is_finite())
    }

    /// The value truncated toward zero, for step and count fields.
    pub fn whole(&self) -> Option<i64> {
        self.value().map(|v| v.trunc() as i64)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::new(value as f64)
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<Option<f64>> for Numeric {
    fn from(value: Option<f64>) -> Self {
        Self(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Numeric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.value() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct NumericVisitor;

        impl<'de> serde::de::Visitor<'de> for NumericVisitor {
            type Value = Numeric;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a number, a numeric string, or nothing")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Numeric, E>
            where
                E: serde::de::Error,
            {
                Ok(Numeric::new(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Numeric, E>
            where
                E: serde::de::Error,
            {
                Ok(Numeric::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Numeric, E>
            where
                E: serde::de::Error,
            {
                Ok(Numeric::new(v as f64))
            }

            fn visit_str<E>(self, v: &str) -> Result<Numeric, E>
            where
                E: serde::de::Error,
            {
                Ok(Numeric::parse(v))
            }

            fn visit_bool<E>(self, _: bool) -> Result<Numeric, E>
            where
                E: serde::de::Error,
            {
                Ok(Numeric::ABSENT)
            }

            fn visit_unit<E>(self) -> Result<Numeric, E>
            where
                E: serde::de::Error,
            {
                Ok(Numeric::ABSENT)
            }

            fn visit_none<E>(self) -> Result<Numeric, E>
            where
                E: serde::de::Error,
            {
                Ok(Numeric::ABSENT)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Numeric, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_any(NumericVisitor)
            }
        }

        deserializer.deserialize_any(NumericVisitor)
    }
}
