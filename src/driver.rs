//! Playback state machine around the bounded curriculum history.
//!
//! The driver owns the step sequence and the control settings. It has two
//! states, Paused and Running; `tick` only mutates while Running, so a host
//! timer that keeps firing after `pause` cannot touch the history. Consumers
//! read the history through shared references and never mutate it.

use std::collections::VecDeque;

use crate::curriculum::{
    advance, seed_step, CorruptionMode, CurriculumConfig, CurriculumStep, ShapingMode,
    HISTORY_CAP, SEED_STEPS,
};
use crate::prng::Prng;

pub struct CurriculumDriver {
    history: VecDeque<CurriculumStep>,
    config: CurriculumConfig,
    playing: bool,
    rng: Prng,
    seed: u64,
}

impl CurriculumDriver {
    pub fn new(seed: u64) -> Self {
        let mut rng = Prng::new(seed);
        let history = seeded_history(&mut rng);
        Self {
            history,
            config: CurriculumConfig::default(),
            playing: false,
            rng,
            seed,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance one step if Running, reading the settings current at this
    /// instant. Returns the appended step, or `None` while Paused.
    pub fn tick(&mut self) -> Option<CurriculumStep> {
        if !self.playing {
            return None;
        }
        let last = *self.history.back()?;
        let next = advance(&last, self.config, &mut self.rng);
        self.history.push_back(next);
        if self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
        Some(next)
    }

    /// Return to the exact seeded history, default settings, Paused.
    ///
    /// The generator is reseeded first, so every reset yields an identical
    /// sequence including the ratio jitter. Resetting twice is a no-op.
    pub fn reset(&mut self) {
        self.rng = Prng::new(self.seed);
        self.history = seeded_history(&mut self.rng);
        self.config = CurriculumConfig::default();
        self.playing = false;
    }

    pub fn set_corruption_mode(&mut self, mode: CorruptionMode) {
        self.config.corruption_mode = mode;
    }

    pub fn set_shaping_mode(&mut self, mode: ShapingMode) {
        self.config.shaping_mode = mode;
    }

    pub fn set_shaping_gain(&mut self, gain: f32) {
        self.config.shaping_gain = gain.clamp(0.0, 1.0);
    }

    pub fn config(&self) -> CurriculumConfig {
        self.config
    }

    pub fn latest(&self) -> Option<CurriculumStep> {
        self.history.back().copied()
    }

    pub fn history(&self) -> impl Iterator<Item = &CurriculumStep> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Contiguous copy of the history, oldest first. For serialization.
    pub fn history_vec(&self) -> Vec<CurriculumStep> {
        self.history.iter().copied().collect()
    }
}

fn seeded_history(rng: &mut Prng) -> VecDeque<CurriculumStep> {
    (0..SEED_STEPS as u64).map(|i| seed_step(i, rng)).collect()
}
