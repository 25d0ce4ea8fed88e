use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SolveError;
use crate::triple::MAX_COUNTER;

/// Which metric the search minimises and over what region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Variant {
    /// Minimise against `a*b + c`. Fast, but not a real tick count.
    ClosedForm,
    /// Minimise against the PIO instruction cost over the full domain.
    #[default]
    CostModel,
    /// Closed-form pass, then a cost-model search in a cube of half-width
    /// `radius` around its answer. May miss the global optimum.
    Hybrid { radius: u8 },
    /// Cost-model search scored as
    /// `error_weight * |error| + footprint_weight * footprint`.
    Constrained {
        error_weight: u32,
        footprint_weight: u32,
    },
}

impl Variant {
    pub const DEFAULT_RADIUS: u8 = 5;

    /// Hybrid search with the default neighborhood radius.
    pub fn hybrid() -> Self {
        Variant::Hybrid {
            radius: Self::DEFAULT_RADIUS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::ClosedForm => "closed",
            Variant::CostModel => "cost",
            Variant::Hybrid { .. } => "hybrid",
            Variant::Constrained { .. } => "constrained",
        }
    }

    /// Whether reported errors are real PIO tick residuals.
    pub fn uses_cost_model(&self) -> bool {
        !matches!(self, Variant::ClosedForm)
    }

    pub fn validate(&self) -> Result<(), SolveError> {
        match *self {
            Variant::Hybrid { radius } if radius > MAX_COUNTER => {
                Err(SolveError::RadiusOutOfRange(radius as u32))
            }
            Variant::Constrained { error_weight: 0, .. } => Err(SolveError::ZeroErrorWeight),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Hybrid { radius } => write!(f, "hybrid(r={})", radius),
            Variant::Constrained {
                error_weight,
                footprint_weight,
            } => write!(f, "constrained(e={}, f={})", error_weight, footprint_weight),
            _ => f.write_str(self.name()),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    /// Parse a variant name. Parameterised variants get their defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" | "closed-form" => Ok(Variant::ClosedForm),
            "cost" | "cost-model" => Ok(Variant::CostModel),
            "hybrid" => Ok(Variant::hybrid()),
            "constrained" => Ok(Variant::Constrained {
                error_weight: 1,
                footprint_weight: 0,
            }),
            _ => Err(format!(
                "unknown variant '{}' (expected closed, cost, hybrid or constrained)",
                s
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Linear scoring of a candidate's residual and instruction footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weights {
    pub error: u32,
    pub footprint: u32,
}

impl Weights {
    /// Plain `|error|`.
    pub const UNIT: Weights = Weights {
        error: 1,
        footprint: 0,
    };

    pub fn score(&self, abs_error: u64, footprint: u32) -> u64 {
        (self.error as u64)
            .saturating_mul(abs_error)
            .saturating_add(self.footprint as u64 * footprint as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("closed".parse::<Variant>(), Ok(Variant::ClosedForm));
        assert_eq!("cost-model".parse::<Variant>(), Ok(Variant::CostModel));
        assert_eq!("hybrid".parse::<Variant>(), Ok(Variant::Hybrid { radius: 5 }));
        assert!("fast".parse::<Variant>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::CostModel.to_string(), "cost");
        assert_eq!(Variant::Hybrid { radius: 3 }.to_string(), "hybrid(r=3)");
        assert_eq!(
            Variant::Constrained {
                error_weight: 2,
                footprint_weight: 1
            }
            .to_string(),
            "constrained(e=2, f=1)"
        );
    }

    #[test]
    fn test_validate() {
        assert!(Variant::Hybrid { radius: 31 }.validate().is_ok());
        assert_eq!(
            Variant::Hybrid { radius: 32 }.validate(),
            Err(SolveError::RadiusOutOfRange(32))
        );
        assert!(Variant::ClosedForm.validate().is_ok());
    }

    #[test]
    fn test_weights_score() {
        assert_eq!(Weights::UNIT.score(9, 7), 9);
        let w = Weights {
            error: 3,
            footprint: 2,
        };
        assert_eq!(w.score(4, 7), 26);
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_string(&Variant::Hybrid { radius: 5 }).unwrap();
        assert_eq!(json, r#"{"kind":"hybrid","radius":5}"#);
        let json = serde_json::to_string(&Variant::CostModel).unwrap();
        assert_eq!(json, r#"{"kind":"cost-model"}"#);
    }
}
