//! Read-only snapshots of the simulation.
//!
//! Design intent:
//! - Observers cannot mutate or steer the driver.
//! - Snapshotting is *on-demand* and copies the bounded history; the tick
//!   path stays unchanged.

use crate::curriculum::{CurriculumConfig, CurriculumStep};
use crate::driver::CurriculumDriver;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverSnapshot {
    pub playing: bool,
    pub config: CurriculumConfig,
    pub latest: Option<CurriculumStep>,
    pub history: Vec<CurriculumStep>,
}

pub struct DriverAdapter<'a> {
    driver: &'a CurriculumDriver,
}

impl<'a> DriverAdapter<'a> {
    pub fn new(driver: &'a CurriculumDriver) -> Self {
        Self { driver }
    }

    pub fn snapshot(&self) -> DriverSnapshot {
        DriverSnapshot {
            playing: self.driver.is_playing(),
            config: self.driver.config(),
            latest: self.driver.latest(),
            history: self.driver.history_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::SEED_STEPS;

    #[test]
    fn snapshot_reflects_driver_state() {
        let mut driver = CurriculumDriver::new(42);
        driver.play();
        driver.tick();

        let snap = DriverAdapter::new(&driver).snapshot();
        assert!(snap.playing);
        assert_eq!(snap.history.len(), SEED_STEPS + 1);
        assert_eq!(snap.latest, snap.history.last().copied());
        assert_eq!(snap.config, driver.config());
    }

    #[test]
    fn snapshot_is_detached_from_later_ticks() {
        let mut driver = CurriculumDriver::new(42);
        driver.play();
        let snap = DriverAdapter::new(&driver).snapshot();
        driver.tick();
        assert_eq!(snap.history.len(), SEED_STEPS);
    }
}
