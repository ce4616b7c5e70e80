//! gwsim daemon - headless curriculum simulation service
//!
//! Runs the simulation clock in the background and exposes it to UI clients
//! over a JSON-lines TCP protocol:
//! - play/pause/reset and the control-panel settings
//! - the bounded step history for chart rendering
//! - the mock monitoring feed, ablation catalog, and feature store
//!
//! Nothing is persisted: the daemon is a live data source, and a restart is
//! equivalent to a reset.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::time;
use tracing::{error, info};

use gwsim::ablation::ABLATIONS;
use gwsim::curriculum::{CorruptionMode, CurriculumConfig, CurriculumStep, ShapingMode};
use gwsim::driver::CurriculumDriver;
use gwsim::features::FeatureStore;
use gwsim::monitor::{MetricPoint, MonitorFeed};
use gwsim::observer::DriverAdapter;
use gwsim::prng::Prng;

const LISTEN_ADDR: &str = "127.0.0.1:9321";
const DEFAULT_TICK_PERIOD_MS: u32 = 500;

// Monitor samples once per MONITOR_EVERY timer ticks (2s at the default
// period, matching the dashboard's slower telemetry cadence).
const MONITOR_EVERY: u64 = 4;

#[derive(Debug, thiserror::Error)]
enum DaemonError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════════════════════
// Protocol Messages
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Request {
    GetState,
    GetHistory,
    Play,
    Pause,
    Reset,
    SetCorruptionMode { mode: String },
    SetShapingMode { mode: String },
    SetShapingGain { gain: f32 },
    SetTickPeriodMs { ms: u32 },
    GetMonitor,
    GetAblations,
    GetFeatureCatalog,
    ServeFeatures { entity_id: String, features: Vec<String> },
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Response {
    State(StateSnapshot),
    History { steps: Vec<CurriculumStep> },
    Monitor(MonitorSnapshot),
    Ablations { rows: Vec<AblationEntry> },
    FeatureCatalog { features: Vec<FeatureEntry> },
    Features { payload: serde_json::Value },
    Success { message: String },
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateSnapshot {
    playing: bool,
    frame: u64,
    tick_period_ms: u32,
    config: CurriculumConfig,
    latest: Option<CurriculumStep>,
    history_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonitorSnapshot {
    window: Vec<MetricPoint>,
    alerts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AblationEntry {
    name: String,
    claim: String,
    reward: u32,
    stability: u32,
    robustness: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeatureEntry {
    name: String,
    value_type: String,
    entity: String,
    description: String,
    online: bool,
}

// ═══════════════════════════════════════════════════════════════════════════
// Daemon State
// ═══════════════════════════════════════════════════════════════════════════

struct DaemonState {
    driver: CurriculumDriver,
    monitor: MonitorFeed,
    store: FeatureStore,
    serve_rng: Prng,
    frame: u64,
    tick_period_ms: u32,
}

impl DaemonState {
    fn new(seed: u64) -> Self {
        Self {
            driver: CurriculumDriver::new(seed),
            monitor: MonitorFeed::new(seed ^ 0xA5A5),
            store: FeatureStore::new(),
            serve_rng: Prng::new(seed ^ 0x5A5A),
            frame: 0,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
        }
    }

    fn tick(&mut self) {
        self.frame += 1;
        // Monitoring runs on its own slower cadence whether or not the
        // curriculum is playing; the driver gates itself while Paused.
        if self.frame % MONITOR_EVERY == 0 {
            self.monitor.sample();
        }
        self.driver.tick();
    }

    fn get_snapshot(&self) -> StateSnapshot {
        let sim = DriverAdapter::new(&self.driver).snapshot();
        StateSnapshot {
            playing: sim.playing,
            frame: self.frame,
            tick_period_ms: self.tick_period_ms,
            config: sim.config,
            latest: sim.latest,
            history_len: sim.history.len(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Client Handler
// ═══════════════════════════════════════════════════════════════════════════

async fn handle_client(
    stream: TcpStream,
    state: Arc<RwLock<DaemonState>>,
) -> Result<(), DaemonError> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let resp = Response::Error {
                    message: format!("Invalid request: {}", e),
                };
                writer
                    .write_all(serde_json::to_string(&resp)?.as_bytes())
                    .await?;
                writer.write_all(b"\n").await?;
                continue;
            }
        };

        let response = match request {
            Request::GetState => {
                let s = state.read().await;
                Response::State(s.get_snapshot())
            }
            Request::GetHistory => {
                let s = state.read().await;
                Response::History {
                    steps: DriverAdapter::new(&s.driver).snapshot().history,
                }
            }
            Request::Play => {
                let mut s = state.write().await;
                s.driver.play();
                Response::Success {
                    message: "Playing".to_string(),
                }
            }
            Request::Pause => {
                let mut s = state.write().await;
                s.driver.pause();
                Response::Success {
                    message: "Paused".to_string(),
                }
            }
            Request::Reset => {
                let mut s = state.write().await;
                s.driver.reset();
                info!("Simulation reset to seeded baseline");
                Response::Success {
                    message: "Reset".to_string(),
                }
            }
            Request::SetCorruptionMode { mode } => {
                let mut s = state.write().await;
                match CorruptionMode::parse(&mode) {
                    Some(m) => {
                        s.driver.set_corruption_mode(m);
                        Response::Success {
                            message: format!("Corruption mode set to {}", m.as_str()),
                        }
                    }
                    None => Response::Error {
                        message: format!("Unknown corruption mode: {}", mode),
                    },
                }
            }
            Request::SetShapingMode { mode } => {
                let mut s = state.write().await;
                match ShapingMode::parse(&mode) {
                    Some(m) => {
                        s.driver.set_shaping_mode(m);
                        Response::Success {
                            message: format!("Shaping mode set to {}", m.as_str()),
                        }
                    }
                    None => Response::Error {
                        message: format!("Unknown shaping mode: {}", mode),
                    },
                }
            }
            Request::SetShapingGain { gain } => {
                let mut s = state.write().await;
                s.driver.set_shaping_gain(gain);
                Response::Success {
                    message: format!("Shaping gain set to {:.2}", s.driver.config().shaping_gain),
                }
            }
            Request::SetTickPeriodMs { ms } => {
                let mut s = state.write().await;
                let clamped = ms.clamp(10, 60_000);
                s.tick_period_ms = clamped;
                info!("Tick period set to {} ms", clamped);
                Response::Success {
                    message: format!("Tick period set to {} ms", clamped),
                }
            }
            Request::GetMonitor => {
                let s = state.read().await;
                Response::Monitor(MonitorSnapshot {
                    window: s.monitor.window().copied().collect(),
                    alerts: s.monitor.alerts().map(|a| a.to_string()).collect(),
                })
            }
            Request::GetAblations => Response::Ablations {
                rows: ABLATIONS
                    .iter()
                    .map(|r| AblationEntry {
                        name: r.name.to_string(),
                        claim: r.claim.to_string(),
                        reward: r.reward,
                        stability: r.stability,
                        robustness: r.robustness,
                    })
                    .collect(),
            },
            Request::GetFeatureCatalog => {
                let s = state.read().await;
                Response::FeatureCatalog {
                    features: s
                        .store
                        .catalog()
                        .iter()
                        .map(|def| FeatureEntry {
                            name: def.name.to_string(),
                            value_type: def.value_type.to_string(),
                            entity: def.entity.to_string(),
                            description: def.description.to_string(),
                            online: def.online,
                        })
                        .collect(),
                }
            }
            Request::ServeFeatures {
                entity_id,
                features,
            } => {
                let mut s = state.write().await;
                // serve_online draws from the serving generator, so a write
                // lock is needed even though the simulation is untouched.
                let DaemonState {
                    store, serve_rng, ..
                } = &mut *s;
                Response::Features {
                    payload: store.serve_online(&entity_id, &features, serve_rng),
                }
            }
            Request::Shutdown => {
                info!("Shutdown requested");
                tokio::spawn(async {
                    // Give the response a moment to flush before exiting.
                    time::sleep(Duration::from_millis(50)).await;
                    std::process::exit(0);
                });
                Response::Success {
                    message: "Shutting down".to_string(),
                }
            }
        };

        writer
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<(), DaemonError> {
    tracing_subscriber::fmt::init();

    let state = Arc::new(RwLock::new(DaemonState::new(7)));

    // Exit cleanly on Ctrl-C; there is nothing to persist.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C: shutting down");
            std::process::exit(0);
        }
    });

    let listener = TcpListener::bind(LISTEN_ADDR).await?;
    info!("gwsim daemon listening on {}", LISTEN_ADDR);

    // Simulation clock task. The period is re-read every iteration so
    // SetTickPeriodMs takes effect on the next tick.
    let state_clone = Arc::clone(&state);
    tokio::spawn(async move {
        loop {
            let period_ms = {
                let s = state_clone.read().await;
                s.tick_period_ms
            };
            tokio::time::sleep(Duration::from_millis(u64::from(period_ms))).await;

            let mut s = state_clone.write().await;
            s.tick();
        }
    });

    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Client connected: {}", addr);
        let state_clone = Arc::clone(&state);

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, state_clone).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_parse_from_protocol_json() {
        let req: Request =
            serde_json::from_str(r#"{"type":"SetShapingGain","gain":0.7}"#).expect("valid request");
        match req {
            Request::SetShapingGain { gain } => assert!((gain - 0.7).abs() < 1e-6),
            other => panic!("unexpected request: {other:?}"),
        }

        let req: Request = serde_json::from_str(r#"{"type":"SetCorruptionMode","mode":"shuffle"}"#)
            .expect("valid request");
        assert!(matches!(req, Request::SetCorruptionMode { .. }));

        assert!(serde_json::from_str::<Request>(r#"{"type":"Nonsense"}"#).is_err());
    }

    #[test]
    fn paused_timer_never_touches_the_history() {
        let mut state = DaemonState::new(7);
        let before: Vec<_> = state.driver.history_vec();
        for _ in 0..100 {
            state.tick();
        }
        assert_eq!(state.driver.history_vec(), before);

        state.driver.play();
        state.tick();
        assert_eq!(state.driver.history_len(), before.len() + 1);
    }

    #[test]
    fn monitor_samples_every_fourth_frame() {
        let mut state = DaemonState::new(7);
        let baseline = state.monitor.window().count();
        let last_minute = state.monitor.latest().map(|p| p.minute);
        for _ in 0..8 {
            state.tick();
        }
        // Window stays at capacity; the minute counter shows two new samples.
        assert_eq!(state.monitor.window().count(), baseline);
        let now_minute = state.monitor.latest().map(|p| p.minute);
        match (last_minute, now_minute) {
            (Some(a), Some(b)) => assert_eq!(b, a + 2),
            _ => panic!("monitor window should be pre-filled"),
        }
    }
}
