//! Compositions: a flat list of layers whose properties are animated by
//! descriptors inside a sequence window.
//!
//! Layers carry no render semantics. A host looks up the resolved values by
//! `(layer, target)` and applies them to whatever it draws.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::config::VideoConfig;
use crate::descriptor::AnimationDescriptor;
use crate::error::ResolveError;
use crate::sequence::Sequence;
use crate::Result;

/// One animated property of a layer (`"opacity"`, `"translateY"`, `"scale"`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedProperty {
    pub target: String,
    pub animation: AnimationDescriptor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    /// Window in which the layer is active. Descriptors see frames relative
    /// to its start.
    #[serde(default)]
    pub sequence: Sequence,
    #[serde(default)]
    pub properties: Vec<AnimatedProperty>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub name: String,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub layer: String,
    pub target: String,
    pub value: f64,
}

/// Values of every active layer at one frame, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameValues {
    pub frame: f64,
    pub values: Vec<ResolvedValue>,
}

impl FrameValues {
    pub fn get(&self, layer: &str, target: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.layer == layer && v.target == target)
            .map(|v| v.value)
    }

    /// Ids of the layers that produced values at this frame.
    pub fn active_layers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for v in &self.values {
            if seen.last() != Some(&v.layer.as_str()) {
                seen.push(v.layer.as_str());
            }
        }
        seen
    }
}

/// Key under which a layer property is baked: `"<layer>.<target>"`.
pub fn track_key(layer: &str, target: &str) -> String {
    format!("{layer}.{target}")
}

impl Composition {
    pub fn new(name: impl Into<String>, video: VideoConfig) -> Self {
        Self {
            name: name.into(),
            video,
            layers: Vec::new(),
        }
    }

    /// Parse and validate a composition document.
    pub fn from_json(text: &str) -> Result<Self> {
        let comp: Composition = serde_json::from_str(text)?;
        comp.validate()?;
        Ok(comp)
    }

    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;

        let mut layer_ids = HashSet::new();
        for layer in &self.layers {
            if !layer_ids.insert(layer.id.as_str()) {
                return Err(ResolveError::InvalidConfig {
                    reason: format!("duplicate layer id '{}'", layer.id),
                });
            }
            if let Some(duration) = layer.sequence.duration_in_frames {
                if !(duration.is_finite() && duration > 0.0) {
                    return Err(ResolveError::InvalidConfig {
                        reason: format!(
                            "layer '{}' has a non-positive sequence duration {duration}",
                            layer.id
                        ),
                    });
                }
            }

            let mut targets = HashSet::new();
            for prop in &layer.properties {
                if !targets.insert(prop.target.as_str()) {
                    return Err(ResolveError::InvalidConfig {
                        reason: format!("layer '{}' animates '{}' twice", layer.id, prop.target),
                    });
                }
                prop.animation.validate()?;
            }
        }
        Ok(())
    }

    /// Resolve every property of every layer active at `frame`.
    pub fn evaluate(&self, frame: f64) -> Result<FrameValues> {
        let mut values = Vec::new();
        for layer in &self.layers {
            let Some(local) = layer.sequence.local_frame(frame) else {
                continue;
            };
            for prop in &layer.properties {
                values.push(ResolvedValue {
                    layer: layer.id.clone(),
                    target: prop.target.clone(),
                    value: prop.animation.resolve(local, &self.video)?,
                });
            }
        }
        Ok(FrameValues { frame, values })
    }
}
