// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Synthesized alert tone and audible cue backends

use std::f32::consts::TAU;
use std::io::Write;
use std::time::Duration;

use crate::config::AlertConfig;
use crate::error::AudioError;

/// Short sine beep with an exponentially decaying envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl Tone {
    /// 800 Hz, 0.3 -> 0.01 over half a second
    pub fn alert() -> Self {
        Self {
            frequency_hz: 800.0,
            duration: Duration::from_millis(500),
            start_gain: 0.3,
            end_gain: 0.01,
        }
    }

    pub fn from_config(config: &AlertConfig) -> Self {
        Self {
            frequency_hz: config.tone_frequency_hz,
            duration: Duration::from_millis(config.tone_duration_ms),
            start_gain: config.tone_start_gain,
            end_gain: config.tone_end_gain,
        }
    }

    /// Envelope gain `t` seconds in. Gains must be positive for the ramp.
    pub fn gain_at(&self, t: f32) -> f32 {
        let length = self.duration.as_secs_f32();
        if length <= 0.0 || t >= length {
            return self.end_gain;
        }
        if t <= 0.0 {
            return self.start_gain;
        }
        let start = self.start_gain.max(f32::EPSILON);
        let end = self.end_gain.max(f32::EPSILON);
        start * (end / start).powf(t / length)
    }

    /// Mono samples at `sample_rate`
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let count = (self.duration.as_secs_f32() * rate).round() as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / rate;
                (TAU * self.frequency_hz * t).sin() * self.gain_at(t)
            })
            .collect()
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self::alert()
    }
}

/// Something that can make a brief, non-blocking sound
pub trait AudioCue: Send + Sync {
    fn play(&self, tone: &Tone) -> Result<(), AudioError>;
}

/// Rings the terminal bell on stderr
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&self, _tone: &Tone) -> Result<(), AudioError> {
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| AudioError::Unavailable(e.to_string()))
    }
}

/// No sound at all
#[derive(Debug, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self, _tone: &Tone) -> Result<(), AudioError> {
        Ok(())
    }
}

#[cfg(feature = "audio")]
pub use self::output::CpalCue;

#[cfg(feature = "audio")]
mod output {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::time::Duration;
    use tracing::warn;

    use super::{AudioCue, Tone};
    use crate::error::AudioError;

    /// Plays the tone on the default output device from a helper thread
    #[derive(Debug, Default)]
    pub struct CpalCue;

    impl AudioCue for CpalCue {
        fn play(&self, tone: &Tone) -> Result<(), AudioError> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| AudioError::Unavailable("no default output device".to_string()))?;
            let config = device
                .default_output_config()
                .map_err(|e| AudioError::Unavailable(e.to_string()))?;
            let tone = *tone;

            std::thread::Builder::new()
                .name("alert-tone".to_string())
                .spawn(move || {
                    if let Err(e) = play_blocking(&device, &config, &tone) {
                        warn!("Could not play alert sound: {}", e);
                    }
                })
                .map_err(|e| AudioError::Unavailable(e.to_string()))?;
            Ok(())
        }
    }

    fn play_blocking(
        device: &cpal::Device,
        config: &cpal::SupportedStreamConfig,
        tone: &Tone,
    ) -> Result<(), AudioError> {
        let channels = config.channels().max(1) as usize;
        let samples = tone.render(config.sample_rate().0);
        let mut cursor = 0usize;

        let stream = device
            .build_output_stream(
                &config.config(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value = samples.get(cursor).copied().unwrap_or(0.0);
                        cursor += 1;
                        frame.iter_mut().for_each(|s| *s = value);
                    }
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;
        std::thread::sleep(tone.duration + Duration::from_millis(50));
        Ok(())
    }
}
