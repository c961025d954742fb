use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Upper bound of every weighted axis
pub const SCORE_MAX: f64 = 100.0;
/// Upper bound of the fallacy penalty
pub const FALLACY_MAX: f64 = 60.0;

/// One of the two debate participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Side::A),
            "B" | "b" => Ok(Side::B),
            other => Err(format!("unknown side '{}' (expected A or B)", other)),
        }
    }
}

/// Evaluated dimension: six weighted axes plus the fallacy penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Validity,
    Consistency,
    Interpretation,
    Clarity,
    Persuasiveness,
    Stance,
    Fallacy,
}

impl Axis {
    /// Axes that contribute to the weighted sum, in summation order
    pub const WEIGHTED: [Axis; 6] = [
        Axis::Validity,
        Axis::Consistency,
        Axis::Interpretation,
        Axis::Clarity,
        Axis::Persuasiveness,
        Axis::Stance,
    ];

    pub const ALL: [Axis; 7] = [
        Axis::Validity,
        Axis::Consistency,
        Axis::Interpretation,
        Axis::Clarity,
        Axis::Persuasiveness,
        Axis::Stance,
        Axis::Fallacy,
    ];

    /// Display label shown in reports and on the radar
    pub fn label(self) -> &'static str {
        match self {
            Axis::Validity => "データ妥当性",
            Axis::Consistency => "論理一貫性",
            Axis::Interpretation => "引用の正確性",
            Axis::Clarity => "再現性・明確性",
            Axis::Persuasiveness => "説得力",
            Axis::Stance => "対話姿勢",
            Axis::Fallacy => "詭弁ペナルティ",
        }
    }

    /// Inclusive domain of the axis
    pub fn domain(self) -> (f64, f64) {
        match self {
            Axis::Fallacy => (0.0, FALLACY_MAX),
            _ => (0.0, SCORE_MAX),
        }
    }

    pub fn is_penalty(self) -> bool {
        self == Axis::Fallacy
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "validity" => Ok(Axis::Validity),
            "consistency" => Ok(Axis::Consistency),
            "interpretation" => Ok(Axis::Interpretation),
            "clarity" => Ok(Axis::Clarity),
            "persuasiveness" => Ok(Axis::Persuasiveness),
            "stance" => Ok(Axis::Stance),
            "fallacy" | "fallacyPenalty" => Ok(Axis::Fallacy),
            other => Err(format!("unknown axis '{}'", other)),
        }
    }
}

/// Clamp to `[min, max]` and round to the nearest integer.
///
/// Callers filter out non-finite values first.
pub fn clamp_round(value: f64, min: f64, max: f64) -> i32 {
    value.clamp(min, max).round() as i32
}

/// Clamp a fallacy penalty to `[0, 60]`
pub fn clamp_penalty(value: f64) -> i32 {
    clamp_round(value, 0.0, FALLACY_MAX)
}

/// Per-side scores. Every field is kept inside its axis domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisScores {
    pub validity: i32,
    pub consistency: i32,
    pub interpretation: i32,
    pub clarity: i32,
    pub persuasiveness: i32,
    pub stance: i32,
    pub fallacy: i32,
}

impl AxisScores {
    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Validity => self.validity,
            Axis::Consistency => self.consistency,
            Axis::Interpretation => self.interpretation,
            Axis::Clarity => self.clarity,
            Axis::Persuasiveness => self.persuasiveness,
            Axis::Stance => self.stance,
            Axis::Fallacy => self.fallacy,
        }
    }

    /// Assign a raw value. Out-of-range values are clamped; non-finite
    /// values leave the current value in place.
    pub fn set(&mut self, axis: Axis, value: f64) {
        if !value.is_finite() {
            return;
        }
        let (min, max) = axis.domain();
        let clamped = clamp_round(value, min, max);
        let slot = match axis {
            Axis::Validity => &mut self.validity,
            Axis::Consistency => &mut self.consistency,
            Axis::Interpretation => &mut self.interpretation,
            Axis::Clarity => &mut self.clarity,
            Axis::Persuasiveness => &mut self.persuasiveness,
            Axis::Stance => &mut self.stance,
            Axis::Fallacy => &mut self.fallacy,
        };
        *slot = clamped;
    }
}

/// Fixed weights of the six weighted axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector {
    pub validity: f64,
    pub consistency: f64,
    pub interpretation: f64,
    pub clarity: f64,
    pub persuasiveness: f64,
    pub stance: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            validity: 0.2,
            consistency: 0.2,
            interpretation: 0.15,
            clarity: 0.15,
            persuasiveness: 0.15,
            stance: 0.15,
        }
    }
}

impl WeightVector {
    /// Weight of an axis; the penalty axis carries no weight
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Validity => self.validity,
            Axis::Consistency => self.consistency,
            Axis::Interpretation => self.interpretation,
            Axis::Clarity => self.clarity,
            Axis::Persuasiveness => self.persuasiveness,
            Axis::Stance => self.stance,
            Axis::Fallacy => 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        Axis::WEIGHTED.iter().map(|&axis| self.get(axis)).sum()
    }
}
