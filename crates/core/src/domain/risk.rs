use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk rank from 1 (lowest) to 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RiskLevel(u8);

impl RiskLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> anyhow::Result<Self> {
        ensure!(
            (Self::MIN..=Self::MAX).contains(&level),
            "risk level must be {}..={} (got {level})",
            Self::MIN,
            Self::MAX
        );
        Ok(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The grade label that must accompany this level.
    pub fn grade(self) -> RiskGrade {
        match self.0 {
            1 => RiskGrade::VeryLow,
            2 => RiskGrade::Low,
            3 => RiskGrade::Moderate,
            4 => RiskGrade::High,
            5 => RiskGrade::VeryHigh,
            other => unreachable!("risk level {other} outside 1..=5"),
        }
    }

    /// Filled share of the semicircle gauge.
    pub fn gauge_fraction(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> anyhow::Result<Self> {
        Self::new(value)
    }
}

impl From<RiskLevel> for u8 {
    fn from(value: RiskLevel) -> Self {
        value.0
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}등급", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskGrade {
    #[serde(rename = "매우 낮음")]
    VeryLow,
    #[serde(rename = "낮음")]
    Low,
    #[serde(rename = "보통")]
    Moderate,
    #[serde(rename = "높음")]
    High,
    #[serde(rename = "매우 높음")]
    VeryHigh,
}

impl RiskGrade {
    pub fn label(self) -> &'static str {
        match self {
            RiskGrade::VeryLow => "매우 낮음",
            RiskGrade::Low => "낮음",
            RiskGrade::Moderate => "보통",
            RiskGrade::High => "높음",
            RiskGrade::VeryHigh => "매우 높음",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            RiskGrade::VeryLow => 1,
            RiskGrade::Low => 2,
            RiskGrade::Moderate => 3,
            RiskGrade::High => 4,
            RiskGrade::VeryHigh => 5,
        }
    }

    pub fn style_token(self) -> &'static str {
        match self {
            RiskGrade::VeryLow => "emerald",
            RiskGrade::Low => "teal",
            RiskGrade::Moderate => "amber",
            RiskGrade::High => "orange",
            RiskGrade::VeryHigh => "rose",
        }
    }
}

impl fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
