//! Sound engine for in-app reminder chimes.
//!
//! Audio output is opened lazily and must be unlocked by an explicit user
//! action ([`SoundEngine::enable`]) before any chime is played. Until then
//! [`SoundEngine::play_chime`] is a no-op that answers `false`.
//!
//! ## Backends
//!
//! - [`TerminalBell`]: rings the terminal bell. Always available.
//! - `CpalHost` (feature `cpal`): plays the synthesized chime on the default
//!   output device.
//! - [`CapturedAudio`]: keeps every played buffer in memory.

use super::chime::{volume_of, Chime, SoundConfig, Waveform};
use super::prefs::{Preferences, SOUND_CONFIG_KEY};
use parking_lot::Mutex;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Sample rate of the one-sample unlock buffer.
pub const UNLOCK_SAMPLE_RATE: u32 = 22_050;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("audio output failed: {0}")]
    Output(String),
}

/// An opened audio output.
pub trait AudioDevice: Send {
    /// Preferred sample rate for rendered chimes.
    fn sample_rate(&self) -> u32;

    /// Wakes a suspended output.
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Plays a one-sample silent buffer so later playback is allowed.
    fn unlock(&mut self) -> Result<(), AudioError> {
        self.play(&[0.0], UNLOCK_SAMPLE_RATE)
    }

    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), AudioError>;
}

pub trait AudioHost: Send + Sync {
    fn open(&self) -> Result<Box<dyn AudioDevice>, AudioError>;
}

/// Partial sound settings. Missing or invalid fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundConfigUpdate {
    pub wave: Option<String>,
    pub volume: Option<Value>,
}

impl SoundConfigUpdate {
    pub fn wave(wave: &str) -> Self {
        Self {
            wave: Some(wave.to_string()),
            volume: None,
        }
    }

    pub fn volume(volume: f64) -> Self {
        Self {
            wave: None,
            volume: Some(Value::from(volume)),
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(Value::from(volume));
        self
    }
}

pub struct SoundEngine {
    host: Box<dyn AudioHost>,
    device: Option<Box<dyn AudioDevice>>,
    unlocked: bool,
    config: SoundConfig,
    prefs: Option<Preferences>,
}

impl SoundEngine {
    /// Engine with the default configuration and no persistence.
    pub fn new(host: Box<dyn AudioHost>) -> Self {
        Self {
            host,
            device: None,
            unlocked: false,
            config: SoundConfig::default(),
            prefs: None,
        }
    }

    /// Engine whose configuration is read from and written to `prefs`.
    pub fn load(host: Box<dyn AudioHost>, prefs: Preferences) -> Self {
        let config = SoundConfig::from_value(prefs.get_raw(SOUND_CONFIG_KEY).as_ref());
        Self {
            config,
            prefs: Some(prefs),
            ..Self::new(host)
        }
    }

    /// Opens (once) and unlocks audio output by playing a one-sample buffer.
    ///
    /// Repeated calls reuse the open device. Returns whether output is usable.
    pub fn enable(&mut self) -> bool {
        match self.try_enable() {
            Ok(()) => {
                self.unlocked = true;
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to enable sound");
                false
            }
        }
    }

    fn try_enable(&mut self) -> Result<(), AudioError> {
        if self.device.is_none() {
            self.device = Some(self.host.open()?);
            debug!("audio output opened");
        }
        let device = self.device.as_mut().ok_or(AudioError::NoDevice)?;
        device.resume()?;
        device.unlock()
    }

    pub fn is_enabled(&self) -> bool {
        self.device.is_some() && self.unlocked
    }

    /// Plays the reminder chime. Returns `false` without playing anything
    /// unless [`enable`](Self::enable) has succeeded.
    pub fn play_chime(&mut self) -> bool {
        if !self.unlocked {
            return false;
        }
        let Some(device) = self.device.as_mut() else {
            return false;
        };
        if let Err(e) = device.resume() {
            debug!(error = %e, "audio resume failed");
        }

        let sample_rate = device.sample_rate();
        let samples = Chime::render(&self.config, sample_rate);
        match device.play(&samples, sample_rate) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to play chime");
                false
            }
        }
    }

    pub fn config(&self) -> SoundConfig {
        self.config
    }

    /// Applies `update`, persists the result, and returns it.
    ///
    /// An unknown wave or a non-numeric volume keeps the previous value;
    /// volumes are clamped to `[0, 1]`.
    pub fn set_config(&mut self, update: SoundConfigUpdate) -> SoundConfig {
        let wave = update
            .wave
            .as_deref()
            .and_then(|w| w.parse::<Waveform>().ok())
            .unwrap_or(self.config.wave);
        let volume = update.volume.as_ref().and_then(volume_of).unwrap_or(self.config.volume);
        self.config = SoundConfig { wave, volume };

        if let Some(prefs) = &self.prefs {
            if let Err(e) = prefs.set(SOUND_CONFIG_KEY, &self.config) {
                warn!(error = %e, "failed to persist sound config");
            }
        }
        self.config
    }
}

/// Rings the terminal bell for any non-silent buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl AudioHost for TerminalBell {
    fn open(&self) -> Result<Box<dyn AudioDevice>, AudioError> {
        Ok(Box::new(BellDevice))
    }
}

struct BellDevice;

impl AudioDevice for BellDevice {
    fn sample_rate(&self) -> u32 {
        UNLOCK_SAMPLE_RATE
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, samples: &[f32], _sample_rate: u32) -> Result<(), AudioError> {
        if samples.iter().all(|s| *s == 0.0) {
            return Ok(());
        }
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|_| stdout.flush())
            .map_err(|e| AudioError::Output(e.to_string()))
    }
}

/// A buffer handed to a [`CapturedAudio`] device.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPlay {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

#[derive(Debug, Default)]
struct CaptureState {
    opens: usize,
    plays: Vec<CapturedPlay>,
    fail_open: bool,
    fail_play: bool,
}

/// In-memory audio host. Clones share the same capture.
#[derive(Debug, Clone, Default)]
pub struct CapturedAudio {
    state: Arc<Mutex<CaptureState>>,
}

impl CapturedAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host without any output device.
    pub fn without_device() -> Self {
        let audio = Self::default();
        audio.state.lock().fail_open = true;
        audio
    }

    pub fn fail_playback(&self, failing: bool) {
        self.state.lock().fail_play = failing;
    }

    pub fn opens(&self) -> usize {
        self.state.lock().opens
    }

    pub fn plays(&self) -> Vec<CapturedPlay> {
        self.state.lock().plays.clone()
    }
}

impl AudioHost for CapturedAudio {
    fn open(&self) -> Result<Box<dyn AudioDevice>, AudioError> {
        let mut state = self.state.lock();
        if state.fail_open {
            return Err(AudioError::NoDevice);
        }
        state.opens += 1;
        Ok(Box::new(CapturedDevice {
            state: Arc::clone(&self.state),
        }))
    }
}

struct CapturedDevice {
    state: Arc<Mutex<CaptureState>>,
}

impl AudioDevice for CapturedDevice {
    fn sample_rate(&self) -> u32 {
        48_000
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), AudioError> {
        let mut state = self.state.lock();
        if state.fail_play {
            return Err(AudioError::Output("device lost".to_string()));
        }
        state.plays.push(CapturedPlay {
            sample_rate,
            samples: samples.to_vec(),
        });
        Ok(())
    }
}

#[cfg(feature = "cpal")]
pub use self::output::CpalHost;

#[cfg(feature = "cpal")]
mod output {
    use super::{AudioDevice, AudioError, AudioHost};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::StreamConfig;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing::error;

    const OUTPUT_SAMPLE_RATE: u32 = 44_100;

    /// Default output device of the default cpal host.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct CpalHost;

    impl AudioHost for CpalHost {
        fn open(&self) -> Result<Box<dyn AudioDevice>, AudioError> {
            let device = cpal::default_host().default_output_device().ok_or(AudioError::NoDevice)?;
            Ok(Box::new(CpalDevice { device }))
        }
    }

    struct CpalDevice {
        device: cpal::Device,
    }

    struct PlaybackBuffer {
        samples: Vec<f32>,
        position: usize,
        finished: bool,
    }

    impl AudioDevice for CpalDevice {
        fn sample_rate(&self) -> u32 {
            OUTPUT_SAMPLE_RATE
        }

        fn resume(&mut self) -> Result<(), AudioError> {
            Ok(())
        }

        /// Starts playback on a background thread and returns once the stream is running.
        fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<(), AudioError> {
            let device = self.device.clone();
            let stream_config = StreamConfig {
                channels: 1,
                sample_rate,
                buffer_size: cpal::BufferSize::Default,
            };
            let buffer = Arc::new(Mutex::new(PlaybackBuffer {
                samples: samples.to_vec(),
                position: 0,
                finished: false,
            }));
            let (started_tx, started_rx) = std::sync::mpsc::channel();

            std::thread::spawn(move || {
                let feed = Arc::clone(&buffer);
                let stream = device.build_output_stream(
                    &stream_config,
                    move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                        let Ok(mut buf) = feed.lock() else {
                            return;
                        };
                        for sample in data.iter_mut() {
                            if buf.position < buf.samples.len() {
                                *sample = buf.samples[buf.position];
                                buf.position += 1;
                            } else {
                                *sample = 0.0;
                                buf.finished = true;
                            }
                        }
                    },
                    move |err| {
                        error!("audio output stream error: {err}");
                    },
                    None,
                );
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = started_tx.send(Err(AudioError::Output(e.to_string())));
                        return;
                    }
                };
                if let Err(e) = stream.play() {
                    let _ = started_tx.send(Err(AudioError::Output(e.to_string())));
                    return;
                }
                let _ = started_tx.send(Ok(()));

                loop {
                    std::thread::sleep(Duration::from_millis(10));
                    match buffer.lock() {
                        Ok(buf) if !buf.finished => continue,
                        _ => break,
                    }
                }
                drop(stream);
            });

            started_rx
                .recv()
                .map_err(|e| AudioError::Output(e.to_string()))?
        }
    }
}
