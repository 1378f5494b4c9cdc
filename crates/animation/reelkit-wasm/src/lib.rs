use js_sys::JSON;
use serde::Deserialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use reelkit_core::{
    bake_composition, measure_spring as core_measure_spring, AnimationDescriptor, BakingConfig,
    Composition, InterpolateOptions, SpringConfig, SpringOptions, VideoConfig,
    DEFAULT_REST_THRESHOLD,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Deserialize `value`, or fall back to `T::default()` for undefined/null.
fn from_js_or_default<T>(value: JsValue, what: &str) -> Result<T, JsError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if jsvalue_is_undefined_or_null(&value) {
        Ok(T::default())
    } else {
        swb::from_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpringCall {
    frame: f64,
    fps: f64,
    #[serde(flatten)]
    options: SpringOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeasureCall {
    fps: f64,
    #[serde(default)]
    config: SpringConfig,
    #[serde(default)]
    threshold: Option<f64>,
}

/// `interpolate(input, inputRange, outputRange, options?)`
///
/// Ranges are plain JS arrays of numbers; options take `extrapolateLeft`,
/// `extrapolateRight` and `easing`.
#[wasm_bindgen]
pub fn interpolate(
    input: f64,
    input_range: JsValue,
    output_range: JsValue,
    options: JsValue,
) -> Result<f64, JsError> {
    let input_range: Vec<f64> = swb::from_value(input_range)
        .map_err(|e| JsError::new(&format!("inputRange error: {e}")))?;
    let output_range: Vec<f64> = swb::from_value(output_range)
        .map_err(|e| JsError::new(&format!("outputRange error: {e}")))?;
    let options: InterpolateOptions = from_js_or_default(options, "options")?;
    reelkit_core::interpolate(input, &input_range, &output_range, &options)
        .map_err(|e| JsError::new(&format!("interpolate: {e}")))
}

/// `spring({ frame, fps, config?, from?, to?, delay?, reverse?, durationInFrames?, durationRestThreshold? })`
#[wasm_bindgen]
pub fn spring(params: JsValue) -> Result<f64, JsError> {
    if jsvalue_is_undefined_or_null(&params) {
        return Err(JsError::new("spring: params are null/undefined"));
    }
    let call: SpringCall =
        swb::from_value(params).map_err(|e| JsError::new(&format!("spring params error: {e}")))?;
    reelkit_core::spring_with(call.frame, call.fps, &call.options)
        .map_err(|e| JsError::new(&format!("spring: {e}")))
}

/// `measureSpring({ fps, config?, threshold? })`: frames until the spring settles.
#[wasm_bindgen(js_name = measureSpring)]
pub fn measure_spring(params: JsValue) -> Result<u32, JsError> {
    if jsvalue_is_undefined_or_null(&params) {
        return Err(JsError::new("measureSpring: params are null/undefined"));
    }
    let call: MeasureCall = swb::from_value(params)
        .map_err(|e| JsError::new(&format!("measureSpring params error: {e}")))?;
    core_measure_spring(
        call.fps,
        &call.config,
        call.threshold.unwrap_or(DEFAULT_REST_THRESHOLD),
    )
    .map_err(|e| JsError::new(&format!("measureSpring: {e}")))
}

/// Resolve a single descriptor (`{ type: "interpolate" | "spring", ... }`) at `frame`.
#[wasm_bindgen]
pub fn resolve(frame: f64, descriptor: JsValue, video_config: JsValue) -> Result<f64, JsError> {
    let descriptor: AnimationDescriptor = swb::from_value(descriptor)
        .map_err(|e| JsError::new(&format!("descriptor error: {e}")))?;
    let video: VideoConfig = from_js_or_default(video_config, "video config")?;
    video
        .validate()
        .map_err(|e| JsError::new(&format!("video config error: {e}")))?;
    descriptor
        .resolve(frame, &video)
        .map_err(|e| JsError::new(&format!("resolve: {e}")))
}

#[wasm_bindgen]
pub struct ReelComposition {
    core: Composition,
}

#[wasm_bindgen]
impl ReelComposition {
    /// Parse and validate a composition document (a JS object).
    #[wasm_bindgen(constructor)]
    pub fn new(doc: JsValue) -> Result<ReelComposition, JsError> {
        console_error_panic_hook::set_once();

        if jsvalue_is_undefined_or_null(&doc) {
            return Err(JsError::new("ReelComposition: doc is null/undefined"));
        }
        // Stringify so the core parser (which validates) does the work
        let text = JSON::stringify(&doc)
            .map_err(|e| JsError::new(&format!("composition stringify error: {:?}", e)))?
            .as_string()
            .ok_or_else(|| JsError::new("composition stringify produced non-string"))?;
        let core = Composition::from_json(&text)
            .map_err(|e| JsError::new(&format!("composition parse error: {e}")))?;
        Ok(ReelComposition { core })
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.core.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> f64 {
        self.core.video.fps
    }

    #[wasm_bindgen(getter, js_name = durationInFrames)]
    pub fn duration_in_frames(&self) -> u32 {
        self.core.video.duration_in_frames
    }

    /// Values of every active layer at `frame` as `{ frame, values: [{ layer, target, value }] }`.
    pub fn evaluate(&self, frame: f64) -> Result<JsValue, JsError> {
        let values = self
            .core
            .evaluate(frame)
            .map_err(|e| JsError::new(&format!("evaluate: {e}")))?;
        swb::to_value(&values).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Bake a frame window (`{ startFrame?, endFrame? }`, defaults to the whole composition).
    pub fn bake(&self, cfg: JsValue) -> Result<JsValue, JsError> {
        let cfg: BakingConfig = from_js_or_default(cfg, "baking config")?;
        let baked = bake_composition(&self.core, &cfg)
            .map_err(|e| JsError::new(&format!("bake: {e}")))?;
        swb::to_value(&baked).map_err(|e| JsError::new(&format!("baked output error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
