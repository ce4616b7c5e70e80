//! Static ablation catalog: projected scores for the gated-workspace agent
//! with individual components removed. Illustrative constants, not measured
//! results; clients render these as comparison bars.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AblationVariant {
    FullModel,
    NoGate,
    NoBottleneck,
    FixedCurriculum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AblationRow {
    pub variant: AblationVariant,
    pub name: &'static str,
    pub claim: &'static str,
    pub reward: u32,
    pub stability: u32,
    pub robustness: u32,
}

/// Same order as the `AblationVariant` discriminants; `row` relies on it.
pub const ABLATIONS: &[AblationRow] = &[
    AblationRow {
        variant: AblationVariant::FullModel,
        name: "Full Model",
        claim: "All components active: IB regularization, causal gate, adaptive curriculum.",
        reward: 95,
        stability: 98,
        robustness: 92,
    },
    AblationRow {
        variant: AblationVariant::NoGate,
        name: "No Gate",
        claim: "Without gating, the agent cannot selectively suppress corrupted workspace content.",
        reward: 60,
        stability: 85,
        robustness: 30,
    },
    AblationRow {
        variant: AblationVariant::NoBottleneck,
        name: "No IB",
        claim: "Without IB regularization, the workspace ceases to be minimal; it can encode nuisance/backstage information.",
        reward: 88,
        stability: 90,
        robustness: 45,
    },
    AblationRow {
        variant: AblationVariant::FixedCurriculum,
        name: "Fixed Curr.",
        claim: "A fixed schedule cannot jointly maintain PPO stability (KL ceiling) and robustness targets.",
        reward: 75,
        stability: 60,
        robustness: 70,
    },
];

pub fn row(variant: AblationVariant) -> &'static AblationRow {
    &ABLATIONS[variant as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_align_with_variant_order() {
        for (i, r) in ABLATIONS.iter().enumerate() {
            assert_eq!(r.variant as usize, i);
            assert_eq!(row(r.variant), r);
        }
    }

    #[test]
    fn full_model_dominates_every_ablation() {
        let full = row(AblationVariant::FullModel);
        for r in &ABLATIONS[1..] {
            assert!(full.reward > r.reward);
            assert!(full.stability > r.stability);
            assert!(full.robustness > r.robustness);
        }
    }

    #[test]
    fn scores_are_percentages() {
        for r in ABLATIONS {
            assert!(r.reward <= 100 && r.stability <= 100 && r.robustness <= 100);
        }
    }
}
