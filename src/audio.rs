use crate::constants::{CUE_TONE_HZ, CUE_TONE_LEVEL, CUE_TONE_RAMP_SEC};
use web_sys as web;

fn js_err(label: &str, e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{} error: {:?}", label, e)
}

/// Continuous sine tone that is ramped in and out with the nystagmus cue.
///
/// The oscillator runs for the life of the page; only the gain moves, so
/// flipping the cue never clicks.
pub struct CueTone {
    audio_ctx: web::AudioContext,
    gain: web::GainNode,
    _osc: web::OscillatorNode,
    active: bool,
}

impl CueTone {
    pub fn new(audio_ctx: &web::AudioContext) -> anyhow::Result<Self> {
        let osc = web::OscillatorNode::new(audio_ctx).map_err(|e| js_err("OscillatorNode", e))?;
        osc.set_type(web::OscillatorType::Sine);
        osc.frequency().set_value(CUE_TONE_HZ);
        let gain = web::GainNode::new(audio_ctx).map_err(|e| js_err("GainNode", e))?;
        gain.gain().set_value(0.0);
        osc.connect_with_audio_node(&gain)
            .map_err(|e| js_err("connect osc", e))?;
        gain.connect_with_audio_node(&audio_ctx.destination())
            .map_err(|e| js_err("connect gain", e))?;
        osc.start().map_err(|e| js_err("start osc", e))?;
        Ok(Self {
            audio_ctx: audio_ctx.clone(),
            gain,
            _osc: osc,
            active: false,
        })
    }

    /// Browsers keep a context suspended until a user gesture resumes it.
    pub fn resume(&self) {
        _ = self.audio_ctx.resume();
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        let now = self.audio_ctx.current_time();
        let target = if active { CUE_TONE_LEVEL } else { 0.0 };
        let param = self.gain.gain();
        _ = param.cancel_scheduled_values(now);
        _ = param.set_value_at_time(param.value(), now);
        _ = param.linear_ramp_to_value_at_time(target, now + CUE_TONE_RAMP_SEC);
    }
}
