//! Curriculum step data model and the per-tick transition function.
//!
//! A `CurriculumStep` is one tick's worth of simulated training-progress
//! metrics for a gated-workspace policy: how hard the corruption curriculum
//! is pushing, how far the policy update drifted, how much performance is
//! lost under corruption, and how strongly the suppression gate is engaged.
//! `advance` derives the next step from the previous one plus the current
//! control settings and an injected random source. Every branch is total and
//! every output is clamped, so there are no error paths.

use crate::prng::Prng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// History capacity: appending beyond this evicts the oldest step (FIFO).
pub const HISTORY_CAP: usize = 50;

/// Number of baseline steps a fresh (or reset) history starts with.
pub const SEED_STEPS: usize = 20;

/// One tick of simulated training-progress metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurriculumStep {
    /// Monotonically increasing tick index.
    pub step: u64,
    /// Probability of adversarial corruption being applied upstream, in [0, 1].
    pub corruption_prob: f32,
    /// Policy-update divergence proxy, in [0, 0.5].
    pub ppo_kl: f32,
    /// Performance degradation under corruption, in [0.05, 0.6] once evolved.
    pub robustness_drop: f32,
    /// Suppression gate engagement, in [0, 1].
    pub gate_activation: f32,
    /// Importance-sampling ratio proxy, nominally near 1.0.
    pub ppo_ratio: f32,
}

/// Whether synthetic adversarial corruption is currently injected, and how.
///
/// The transition only cares whether corruption is active; the flavor is
/// carried for clients that label the injection style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CorruptionMode {
    #[default]
    None,
    Shuffle,
    Nearest,
}

impl CorruptionMode {
    pub fn is_active(self) -> bool {
        self != CorruptionMode::None
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(CorruptionMode::None),
            "shuffle" => Some(CorruptionMode::Shuffle),
            "nearest" => Some(CorruptionMode::Nearest),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CorruptionMode::None => "none",
            CorruptionMode::Shuffle => "shuffle",
            CorruptionMode::Nearest => "nearest",
        }
    }
}

/// Which auxiliary reward-shaping formula is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapingMode {
    #[default]
    Sparse,
    Dense,
    Potential,
}

impl ShapingMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sparse" => Some(ShapingMode::Sparse),
            "dense" => Some(ShapingMode::Dense),
            "potential" => Some(ShapingMode::Potential),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShapingMode::Sparse => "sparse",
            ShapingMode::Dense => "dense",
            ShapingMode::Potential => "potential",
        }
    }
}

/// Control-panel settings read as-of each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurriculumConfig {
    pub corruption_mode: CorruptionMode,
    pub shaping_mode: ShapingMode,
    /// Scales the shaping effect, in [0, 1].
    pub shaping_gain: f32,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            corruption_mode: CorruptionMode::None,
            shaping_mode: ShapingMode::Sparse,
            shaping_gain: 0.5,
        }
    }
}

/// Baseline step used to seed a fresh history. All fields are fixed except a
/// small jitter on the ratio so the seeded series doesn't render as a flat line.
pub fn seed_step(index: u64, rng: &mut Prng) -> CurriculumStep {
    CurriculumStep {
        step: index,
        corruption_prob: 0.1,
        ppo_kl: 0.01,
        robustness_drop: 0.05,
        gate_activation: 0.1,
        ppo_ratio: 1.0 + rng.jitter(0.01),
    }
}

/// Derive the next step from `prev` under the current settings.
///
/// Draw order is fixed (KL noise, shared drop/gate noise, ratio noise), so two
/// clones of one `Prng` produce comparable trajectories across configs.
pub fn advance(prev: &CurriculumStep, cfg: CurriculumConfig, rng: &mut Prng) -> CurriculumStep {
    let corrupted = cfg.corruption_mode.is_active();

    // KL drift: symmetric noise on top of the previous value, floored at zero.
    let mut kl = (prev.ppo_kl + rng.jitter(0.005)).max(0.0);
    match cfg.shaping_mode {
        // Potential-based shaping damps variance in advantage estimation.
        ShapingMode::Potential => kl = (kl - 0.002 * cfg.shaping_gain).max(0.001),
        // Dense shaping destabilizes under injected noise.
        ShapingMode::Dense if corrupted => kl += 0.002 * cfg.shaping_gain,
        _ => {}
    }
    if corrupted {
        kl += 0.02;
    }
    // Cap on every path, not just under corruption: otherwise a saturated
    // corrupted run followed by a clean tick could drift past the ceiling.
    kl = kl.min(0.5);

    // Curriculum difficulty. The uncorrupted chain intentionally mixes the
    // NEW kl with the PREVIOUS robustness drop; keep the asymmetry.
    let prob = if corrupted {
        (prev.corruption_prob + 0.05).min(1.0)
    } else if kl > 0.1 {
        // Back off when the policy update is already unstable.
        (prev.corruption_prob - 0.05).max(0.0)
    } else if prev.robustness_drop < 0.2 {
        // Robustness gap is small; push difficulty up.
        (prev.corruption_prob + 0.02).min(1.0)
    } else {
        prev.corruption_prob
    };

    // Training closes the robustness gap faster once difficulty is high.
    let training_effect = 0.01 * if prob > 0.3 { 1.5 } else { 0.5 };
    let shaping_bonus = match cfg.shaping_mode {
        ShapingMode::Sparse => 0.0,
        ShapingMode::Dense => 0.008 * cfg.shaping_gain,
        ShapingMode::Potential => 0.004 * cfg.shaping_gain,
    };

    // One shared draw feeds both the drop and the gate.
    let noise = rng.jitter(0.01);
    let drop = if corrupted {
        (prev.robustness_drop + 0.03).min(0.6)
    } else {
        (prev.robustness_drop - (training_effect + shaping_bonus)
            + noise
            + 0.5 * (prob - prev.corruption_prob))
            .max(0.05)
    };

    let gate_base = if corrupted { 0.95 } else { drop * 2.0 };
    let gate = (gate_base + noise).clamp(0.0, 1.0);

    let ratio = 1.0 + rng.jitter(0.025) + 0.2 * kl;

    CurriculumStep {
        step: prev.step + 1,
        corruption_prob: prob,
        ppo_kl: kl,
        robustness_drop: drop,
        gate_activation: gate,
        ppo_ratio: ratio,
    }
}
