//! Mock feature store: a static catalog of the agent's feature definitions
//! and an online-serving stub that fabricates values on demand. No storage,
//! no network; responses are JSON objects a client renders as-is.

use hashbrown::HashMap;
use serde_json::{json, Map, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::prng::Prng;

#[cfg(feature = "serde")]
use serde::Serialize;

pub const STORE_VERSION: &str = "v2.1.4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FeatureDef {
    pub name: &'static str,
    pub value_type: &'static str,
    pub entity: &'static str,
    pub description: &'static str,
    pub online: bool,
}

/// The fixed catalog the dashboard browses.
pub const CATALOG: &[FeatureDef] = &[
    FeatureDef {
        name: "backstage_x_tensor",
        value_type: "Tensor<Float32>[256]",
        entity: "agent_id",
        description: "Sensory encodings + LSTM memory state",
        online: true,
    },
    FeatureDef {
        name: "workspace_w_vector",
        value_type: "Vector<Float32>[16]",
        entity: "agent_id",
        description: "Bottlenecked broadcast variable (Latent)",
        online: true,
    },
    FeatureDef {
        name: "reward_history_1h",
        value_type: "Array<Float>",
        entity: "agent_id",
        description: "Rolling average reward for baseline",
        online: false,
    },
    FeatureDef {
        name: "gate_threshold_static",
        value_type: "Float",
        entity: "global_config",
        description: "Deployment-specific gate sensitivity",
        online: true,
    },
    FeatureDef {
        name: "action_distribution_prior",
        value_type: "Vector<Float32>[8]",
        entity: "agent_id",
        description: "Prior distribution for KL regularization",
        online: true,
    },
    FeatureDef {
        name: "episodic_memory_embedding",
        value_type: "Tensor<Float32>[512]",
        entity: "agent_id",
        description: "Retrieved context from long-term memory",
        online: false,
    },
];

pub struct FeatureStore {
    index: HashMap<&'static str, &'static FeatureDef>,
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureStore {
    pub fn new() -> Self {
        let index = CATALOG.iter().map(|def| (def.name, def)).collect();
        Self { index }
    }

    pub fn catalog(&self) -> &'static [FeatureDef] {
        CATALOG
    }

    pub fn lookup(&self, name: &str) -> Option<&'static FeatureDef> {
        self.index.get(name).copied()
    }

    /// Case-insensitive substring match over names and descriptions.
    pub fn search(&self, term: &str) -> Vec<&'static FeatureDef> {
        let term = term.to_ascii_lowercase();
        CATALOG
            .iter()
            .filter(|def| {
                def.name.to_ascii_lowercase().contains(&term)
                    || def.description.to_ascii_lowercase().contains(&term)
            })
            .collect()
    }

    /// Fabricate an online-serving response for the requested features.
    ///
    /// Value shape follows the definition's name: vector/tensor features
    /// get an 8-element array of centered draws,
    /// threshold/prior features a scalar, everything else a placeholder
    /// string. Unknown names land in `_missing` rather than failing the
    /// whole request.
    pub fn serve_online(&self, entity_id: &str, names: &[String], rng: &mut Prng) -> Value {
        let mut body = Map::new();
        let mut missing: Vec<&str> = Vec::new();

        for name in names {
            let Some(def) = self.lookup(name) else {
                missing.push(name);
                continue;
            };
            let value = if def.name.contains("vector") || def.name.contains("tensor") {
                let values: Vec<f64> = (0..8).map(|_| round2(rng.range_f32(-1.0, 1.0))).collect();
                json!(values)
            } else if def.name.contains("threshold") || def.name.contains("prior") {
                json!(round4(rng.next_f32()))
            } else {
                json!("mock_value")
            };
            body.insert(def.name.to_string(), value);
        }

        if !missing.is_empty() {
            body.insert("_missing".to_string(), json!(missing));
        }
        body.insert(
            "_metadata".to_string(),
            json!({
                "entity": entity_id,
                "served_at": unix_seconds(),
                "store_version": STORE_VERSION,
                "latency_ms": rng.range_usize(2, 12),
            }),
        );

        Value::Object(body)
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn round2(v: f32) -> f64 {
    ((v * 100.0).round() as f64) / 100.0
}

fn round4(v: f32) -> f64 {
    ((v * 10_000.0).round() as f64) / 10_000.0
}
