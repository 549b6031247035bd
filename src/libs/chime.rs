//! Reminder chime synthesis.
//!
//! The chime is a single oscillator through a gain stage:
//!
//! - 880 Hz, stepping down to 660 Hz at 0.18 s
//! - exponential attack from near silence to the peak within 0.01 s
//! - exponential decay back to near silence, reaching it at 0.36 s
//! - the oscillator stops at 0.35 s
//!
//! Rendering produces mono `f32` samples so any output backend can play it.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

pub const HIGH_HZ: f64 = 880.0;
pub const LOW_HZ: f64 = 660.0;
/// Seconds into the chime at which the pitch drops.
pub const STEP_AT: f64 = 0.18;
pub const ATTACK: f64 = 0.01;
/// Oscillator stop time in seconds.
pub const DURATION: f64 = 0.35;
/// Time at which the decay reaches [`FLOOR_GAIN`].
pub const RELEASE_END: f64 = 0.36;
pub const FLOOR_GAIN: f64 = 0.0001;
/// Quietest peak used, so a zero volume still produces an audible chime.
pub const MIN_PEAK: f64 = 0.02;

pub const DEFAULT_VOLUME: f64 = 0.25;

#[derive(ValueEnum, Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [Waveform::Sine, Waveform::Triangle, Waveform::Square, Waveform::Sawtooth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        }
    }

    /// Value of the waveform at `phase` in cycles, range `[-1, 1]`.
    pub fn sample(&self, phase: f64) -> f64 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Triangle => 1.0 - 4.0 * ((p + 0.25).fract() - 0.5).abs(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Waveform::ALL
            .into_iter()
            .find(|wave| wave.as_str() == s)
            .ok_or_else(|| format!("unknown waveform '{}'", s))
    }
}

/// Chime waveform and volume.
///
/// Always holds a known waveform and a volume in `[0, 1]`.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct SoundConfig {
    pub wave: Waveform,
    pub volume: f64,
}

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig {
            wave: Waveform::Sine,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl SoundConfig {
    /// Normalizes a persisted value. Unknown waves read as sine and unusable
    /// volumes as the default; volumes are clamped to `[0, 1]`.
    pub fn from_value(value: Option<&Value>) -> Self {
        let defaults = SoundConfig::default();
        let Some(Value::Object(map)) = value else {
            return defaults;
        };
        let wave = map
            .get("wave")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.wave);
        let volume = map.get("volume").and_then(volume_of).unwrap_or(defaults.volume);
        SoundConfig { wave, volume }
    }
}

/// Reads a finite volume from a number or numeric string, clamped to `[0, 1]`.
pub(crate) fn volume_of(value: &Value) -> Option<f64> {
    let volume = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    volume.is_finite().then(|| volume.clamp(0.0, 1.0))
}

/// Gain curve of the chime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    peak: f64,
}

impl Envelope {
    pub fn new(volume: f64) -> Self {
        Self {
            peak: volume.clamp(0.0, 1.0).max(MIN_PEAK),
        }
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn gain_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            FLOOR_GAIN
        } else if t < ATTACK {
            exp_ramp(FLOOR_GAIN, self.peak, t / ATTACK)
        } else if t < RELEASE_END {
            exp_ramp(self.peak, FLOOR_GAIN, (t - ATTACK) / (RELEASE_END - ATTACK))
        } else {
            FLOOR_GAIN
        }
    }
}

fn exp_ramp(from: f64, to: f64, progress: f64) -> f64 {
    from * (to / from).powf(progress)
}

pub fn frequency_at(t: f64) -> f64 {
    if t < STEP_AT {
        HIGH_HZ
    } else {
        LOW_HZ
    }
}

pub struct Chime;

impl Chime {
    /// Renders the chime as mono samples at `sample_rate`.
    pub fn render(config: &SoundConfig, sample_rate: u32) -> Vec<f32> {
        let rate = f64::from(sample_rate.max(1));
        let count = (DURATION * rate).round() as usize;
        let envelope = Envelope::new(config.volume);

        let mut phase = 0.0_f64;
        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            let t = i as f64 / rate;
            samples.push((config.wave.sample(phase) * envelope.gain_at(t)) as f32);
            phase = (phase + frequency_at(t) / rate).fract();
        }
        samples
    }
}

