use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const CUE_TONE_HZ: f32 = 440.0;
const CUE_TONE_LEVEL: f32 = 0.08;
const CUE_TONE_RAMP_SEC: f32 = 0.08;

/// Sine oscillator whose level follows a shared on/off flag.
struct ToneState {
    phase: f32,
    phase_inc: f32,
    level: f32,
    level_step: f32,
    gate: Arc<AtomicBool>,
}

impl ToneState {
    fn next_sample(&mut self) -> f32 {
        let target = if self.gate.load(Ordering::Relaxed) {
            CUE_TONE_LEVEL
        } else {
            0.0
        };
        // linear ramp avoids clicks when the cue flips
        if self.level < target {
            self.level = (self.level + self.level_step).min(target);
        } else if self.level > target {
            self.level = (self.level - self.level_step).max(target);
        }
        let s = self.phase.sin() * self.level;
        self.phase += self.phase_inc;
        if self.phase > std::f32::consts::TAU {
            self.phase -= std::f32::consts::TAU;
        }
        s
    }
}

/// Open the default output device and play the cue tone while `gate` is set.
/// Returns `None` when no usable device exists; the caller runs silently.
pub fn start_cue_tone(gate: Arc<AtomicBool>) -> Option<cpal::Stream> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let config = device.default_output_config().ok()?;
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    let tone = ToneState {
        phase: 0.0,
        phase_inc: std::f32::consts::TAU * CUE_TONE_HZ / sample_rate,
        level: 0.0,
        level_step: CUE_TONE_LEVEL / (CUE_TONE_RAMP_SEC * sample_rate).max(1.0),
        gate,
    };

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), channels, tone),
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), channels, tone),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), channels, tone),
        other => {
            log::warn!("[audio] unsupported sample format {:?}", other);
            return None;
        }
    };
    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            log::warn!("[audio] could not build output stream: {e}");
            return None;
        }
    };
    stream.play().ok()?;
    log::info!("[audio] cue tone ready at {} Hz sample rate", sample_rate);
    Some(stream)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut tone: ToneState,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            for frame in data.chunks_mut(channels.max(1)) {
                let v = T::from_sample(tone.next_sample());
                for out in frame.iter_mut() {
                    *out = v;
                }
            }
        },
        |err| log::error!("[audio] stream error: {err}"),
        None,
    )
}
