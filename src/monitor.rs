//! Mock serving-telemetry feed: a sliding window of randomly drawn deployment
//! metrics plus a bounded alert log driven by threshold checks. Nothing here
//! measures a real system; the feed exists so clients have a live-looking
//! monitoring surface to render.

use std::collections::VecDeque;
use std::fmt;

use crate::prng::Prng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sliding-window length for the metric feed.
pub const WINDOW_LEN: usize = 20;

/// Most recent alerts retained.
pub const ALERT_CAP: usize = 5;

/// Workspace drift score above which a drift alert fires.
pub const DRIFT_ALERT_THRESHOLD: f32 = 0.2;

/// Encoder latency above which a spike alert fires, in milliseconds.
pub const LATENCY_ALERT_MS: f32 = 19.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricPoint {
    /// Sample index; stands in for a wall-clock label.
    pub minute: u32,
    pub accuracy: f32,
    pub loss: f32,
    pub latency_ms: f32,
    pub drift_score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Alert {
    Drift { score: f32 },
    LatencySpike { latency_ms: f32 },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::Drift { score } => write!(f, "Drift Detected: KL(P||Q) = {score:.3}"),
            Alert::LatencySpike { latency_ms } => write!(f, "Latency Spike: {latency_ms:.1}ms"),
        }
    }
}

pub struct MonitorFeed {
    window: VecDeque<MetricPoint>,
    alerts: VecDeque<Alert>,
    rng: Prng,
    minute: u32,
}

impl MonitorFeed {
    /// Pre-fills the window with baseline draws, ramping the drift score over
    /// the last few points so a fresh feed already shows a drift episode.
    pub fn new(seed: u64) -> Self {
        let mut feed = Self {
            window: VecDeque::with_capacity(WINDOW_LEN),
            alerts: VecDeque::new(),
            rng: Prng::new(seed),
            minute: 0,
        };
        for i in 0..WINDOW_LEN {
            let ramp = if i + 5 > WINDOW_LEN {
                (i as f32) * 0.05
            } else {
                0.0
            };
            let mut point = feed.draw_point();
            point.drift_score = 0.05 + ramp;
            // Seed points bypass alerting; only live samples page anyone.
            feed.push_window(point);
        }
        feed
    }

    /// Draw one live sample and run the threshold checks on it.
    pub fn sample(&mut self) -> MetricPoint {
        let point = self.draw_point();
        self.record(point);
        point
    }

    /// Apply windowing and alert thresholds to an already-built point.
    pub fn record(&mut self, point: MetricPoint) {
        // Prepending, so push in reverse: drift must stay ahead of a latency
        // spike raised by the same point.
        if point.latency_ms > LATENCY_ALERT_MS {
            self.push_alert(Alert::LatencySpike {
                latency_ms: point.latency_ms,
            });
        }
        if point.drift_score > DRIFT_ALERT_THRESHOLD {
            self.push_alert(Alert::Drift {
                score: point.drift_score,
            });
        }
        self.push_window(point);
    }

    pub fn window(&self) -> impl Iterator<Item = &MetricPoint> {
        self.window.iter()
    }

    pub fn latest(&self) -> Option<MetricPoint> {
        self.window.back().copied()
    }

    /// Newest alert first.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    fn draw_point(&mut self) -> MetricPoint {
        let minute = self.minute;
        self.minute = self.minute.wrapping_add(1);
        MetricPoint {
            minute,
            accuracy: 0.85 + self.rng.next_f32() * 0.1,
            loss: 0.2 + self.rng.next_f32() * 0.1,
            latency_ms: 15.0 + self.rng.next_f32() * 5.0,
            drift_score: 0.05 + self.rng.next_f32() * 0.3,
        }
    }

    fn push_window(&mut self, point: MetricPoint) {
        self.window.push_back(point);
        if self.window.len() > WINDOW_LEN {
            self.window.pop_front();
        }
    }

    fn push_alert(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
        self.alerts.truncate(ALERT_CAP);
    }
}
