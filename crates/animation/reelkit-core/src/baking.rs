//! Baking API: resolve every frame of a composition window ahead of time.

use serde::{Deserialize, Serialize};

use crate::composition::{track_key, Composition};
use crate::error::ResolveError;
use crate::Result;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BakingConfig {
    /// First frame to bake.
    pub start_frame: u32,
    /// Frame after the last one baked; if None, uses the composition duration.
    pub end_frame: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedTrack {
    /// `"<layer>.<target>"`
    pub key: String,
    /// One entry per baked frame; `None` while the layer is inactive.
    pub values: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BakedComposition {
    pub name: String,
    pub fps: f64,
    pub start_frame: u32,
    pub end_frame: u32,
    pub tracks: Vec<BakedTrack>,
}

impl BakedComposition {
    pub fn frame_count(&self) -> usize {
        (self.end_frame - self.start_frame) as usize
    }

    pub fn track(&self, key: &str) -> Option<&BakedTrack> {
        self.tracks.iter().find(|t| t.key == key)
    }

    /// Baked value of `key` at absolute `frame`.
    pub fn value_at(&self, key: &str, frame: u32) -> Option<f64> {
        let idx = frame.checked_sub(self.start_frame)? as usize;
        self.track(key)?.values.get(idx).copied().flatten()
    }
}

/// Bake a composition over `cfg`'s window.
pub fn bake_composition(comp: &Composition, cfg: &BakingConfig) -> Result<BakedComposition> {
    comp.validate()?;

    let start = cfg.start_frame;
    let end = cfg.end_frame.unwrap_or(comp.video.duration_in_frames);
    if end < start {
        return Err(ResolveError::InvalidConfig {
            reason: format!("baking window ends ({end}) before it starts ({start})"),
        });
    }
    let frame_count = (end - start) as usize;

    let mut tracks = Vec::new();
    for layer in &comp.layers {
        for prop in &layer.properties {
            let mut values = Vec::with_capacity(frame_count);
            for frame in start..end {
                let value = match layer.sequence.local_frame(frame as f64) {
                    Some(local) => Some(prop.animation.resolve(local, &comp.video)?),
                    None => None,
                };
                values.push(value);
            }
            tracks.push(BakedTrack {
                key: track_key(&layer.id, &prop.target),
                values,
            });
        }
    }

    log::debug!(
        "baked '{}': {} tracks x {} frames",
        comp.name,
        tracks.len(),
        frame_count
    );

    Ok(BakedComposition {
        name: comp.name.clone(),
        fps: comp.video.fps,
        start_frame: start,
        end_frame: end,
        tracks,
    })
}

/// Export baked data as serde_json::Value (stable schema for FFI/serialization).
pub fn export_baked_json(baked: &BakedComposition) -> serde_json::Value {
    serde_json::to_value(baked).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{AnimatedProperty, Layer};
    use crate::config::VideoConfig;
    use crate::descriptor::AnimationDescriptor;
    use crate::interp::InterpolateOptions;
    use crate::sequence::Sequence;

    fn ramp() -> Composition {
        let mut comp = Composition::new("ramp", VideoConfig::new(30.0, 10));
        comp.layers.push(Layer {
            id: "l".into(),
            sequence: Sequence::new(2.0, Some(5.0)),
            properties: vec![AnimatedProperty {
                target: "x".into(),
                animation: AnimationDescriptor::interpolate(
                    [0.0, 4.0],
                    [0.0, 8.0],
                    InterpolateOptions::clamped(),
                ),
            }],
        });
        comp
    }

    #[test]
    fn bakes_whole_duration_by_default() {
        let baked = bake_composition(&ramp(), &BakingConfig::default()).unwrap();
        assert_eq!(baked.frame_count(), 10);
        let track = baked.track("l.x").unwrap();
        assert_eq!(
            track.values,
            vec![
                None,
                None,
                Some(0.0),
                Some(2.0),
                Some(4.0),
                Some(6.0),
                Some(8.0),
                None,
                None,
                None
            ]
        );
        assert_eq!(baked.value_at("l.x", 4), Some(4.0));
        assert_eq!(baked.value_at("l.x", 0), None);
        assert_eq!(baked.value_at("missing", 4), None);
    }

    #[test]
    fn partial_window() {
        let cfg = BakingConfig {
            start_frame: 3,
            end_frame: Some(5),
        };
        let baked = bake_composition(&ramp(), &cfg).unwrap();
        assert_eq!(baked.frame_count(), 2);
        assert_eq!(baked.value_at("l.x", 3), Some(2.0));
        assert_eq!(baked.value_at("l.x", 2), None);
    }

    #[test]
    fn inverted_window_is_an_error() {
        let cfg = BakingConfig {
            start_frame: 5,
            end_frame: Some(1),
        };
        assert!(bake_composition(&ramp(), &cfg).is_err());
    }

    #[test]
    fn export_uses_camel_case() {
        let baked = bake_composition(&ramp(), &BakingConfig::default()).unwrap();
        let json = export_baked_json(&baked);
        assert_eq!(json["startFrame"], 0);
        assert_eq!(json["tracks"][0]["key"], "l.x");
    }
}
