#[cfg(test)]
mod tests {
    use serde_json::json;
    use taskbell::libs::chime::{
        frequency_at, Chime, Envelope, SoundConfig, Waveform, DEFAULT_VOLUME, FLOOR_GAIN, HIGH_HZ, LOW_HZ, MIN_PEAK,
    };
    use taskbell::libs::prefs::{Preferences, SOUND_CONFIG_KEY};
    use taskbell::libs::sound::{CapturedAudio, CapturedPlay, SoundConfigUpdate, SoundEngine, UNLOCK_SAMPLE_RATE};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SoundTestContext {
        _temp_dir: TempDir,
        prefs: Preferences,
        audio: CapturedAudio,
    }

    impl TestContext for SoundTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let prefs = Preferences::at(temp_dir.path().join("prefs.json"));
            SoundTestContext {
                _temp_dir: temp_dir,
                prefs,
                audio: CapturedAudio::new(),
            }
        }
    }

    impl SoundTestContext {
        fn engine(&self) -> SoundEngine {
            SoundEngine::load(Box::new(self.audio.clone()), self.prefs.clone())
        }
    }

    #[test]
    fn test_waveform_shapes() {
        assert!(Waveform::Sine.sample(0.0).abs() < 1e-9);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-9);
        assert_eq!(Waveform::Square.sample(0.1), 1.0);
        assert_eq!(Waveform::Square.sample(0.6), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
        assert!((Waveform::Triangle.sample(0.25) - 1.0).abs() < 1e-9);
        assert!((Waveform::Triangle.sample(0.75) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_waveform_names() {
        for wave in Waveform::ALL {
            assert_eq!(wave.to_string().parse::<Waveform>(), Ok(wave));
        }
        assert!("noise".parse::<Waveform>().is_err());
        assert!("Sine".parse::<Waveform>().is_err());
    }

    #[test]
    fn test_envelope_rises_then_decays() {
        let envelope = Envelope::new(0.5);
        assert_eq!(envelope.gain_at(0.0), FLOOR_GAIN);
        assert!(envelope.gain_at(0.005) > FLOOR_GAIN);
        assert!((envelope.gain_at(0.01) - 0.5).abs() < 1e-9);
        assert!(envelope.gain_at(0.1) < 0.5);
        assert!(envelope.gain_at(0.3) < envelope.gain_at(0.1));
        assert_eq!(envelope.gain_at(0.36), FLOOR_GAIN);
    }

    #[test]
    fn test_envelope_peak_bounds() {
        assert_eq!(Envelope::new(0.0).peak(), MIN_PEAK);
        assert_eq!(Envelope::new(0.01).peak(), MIN_PEAK);
        assert_eq!(Envelope::new(3.0).peak(), 1.0);
        assert_eq!(Envelope::new(0.25).peak(), 0.25);
    }

    #[test]
    fn test_pitch_steps_down() {
        assert_eq!(frequency_at(0.0), HIGH_HZ);
        assert_eq!(frequency_at(0.179), HIGH_HZ);
        assert_eq!(frequency_at(0.18), LOW_HZ);
        assert_eq!(frequency_at(0.34), LOW_HZ);
    }

    #[test]
    fn test_chime_render_length_and_level() {
        let samples = Chime::render(&SoundConfig::default(), 48_000);
        assert_eq!(samples.len(), 16_800);
        let peak = samples.iter().fold(0.0_f32, |max, s| max.max(s.abs()));
        assert!(peak > 0.2 && peak <= DEFAULT_VOLUME as f32 + 1e-6, "peak = {}", peak);

        let quiet = SoundConfig {
            wave: Waveform::Square,
            volume: 0.0,
        };
        let peak = Chime::render(&quiet, 48_000).iter().fold(0.0_f32, |max, s| max.max(s.abs()));
        assert!(peak > 0.0 && peak <= MIN_PEAK as f32 + 1e-6);
    }

    #[test]
    fn test_sound_config_from_value() {
        assert_eq!(SoundConfig::from_value(None), SoundConfig::default());
        assert_eq!(SoundConfig::from_value(Some(&json!("loud"))), SoundConfig::default());

        let config = SoundConfig::from_value(Some(&json!({ "wave": "triangle", "volume": "0.8" })));
        assert_eq!(
            config,
            SoundConfig {
                wave: Waveform::Triangle,
                volume: 0.8
            }
        );

        let config = SoundConfig::from_value(Some(&json!({ "wave": "organ", "volume": 7 })));
        assert_eq!(
            config,
            SoundConfig {
                wave: Waveform::Sine,
                volume: 1.0
            }
        );

        let config = SoundConfig::from_value(Some(&json!({ "volume": "abc" })));
        assert_eq!(config.volume, DEFAULT_VOLUME);
    }

    #[test_context(SoundTestContext)]
    #[test]
    fn test_chime_is_silent_until_enabled(ctx: &mut SoundTestContext) {
        let mut engine = ctx.engine();
        assert!(!engine.is_enabled());
        assert!(!engine.play_chime());
        assert_eq!(ctx.audio.opens(), 0);
        assert!(ctx.audio.plays().is_empty());
    }

    #[test_context(SoundTestContext)]
    #[test]
    fn test_enable_unlocks_with_one_silent_sample(ctx: &mut SoundTestContext) {
        let mut engine = ctx.engine();
        assert!(engine.enable());
        assert!(engine.is_enabled());
        assert_eq!(
            ctx.audio.plays(),
            vec![CapturedPlay {
                sample_rate: UNLOCK_SAMPLE_RATE,
                samples: vec![0.0]
            }]
        );

        // The device is opened once and reused.
        assert!(engine.enable());
        assert_eq!(ctx.audio.opens(), 1);

        assert!(engine.play_chime());
        let plays = ctx.audio.plays();
        let chime = plays.last().unwrap();
        assert_eq!(chime.sample_rate, 48_000);
        assert_eq!(chime.samples, Chime::render(&SoundConfig::default(), 48_000));
    }

    #[test]
    fn test_enable_without_device_fails() {
        let mut engine = SoundEngine::new(Box::new(CapturedAudio::without_device()));
        assert!(!engine.enable());
        assert!(!engine.is_enabled());
        assert!(!engine.play_chime());
    }

    #[test_context(SoundTestContext)]
    #[test]
    fn test_playback_failure_reports_false(ctx: &mut SoundTestContext) {
        let mut engine = ctx.engine();
        assert!(engine.enable());
        ctx.audio.fail_playback(true);
        assert!(!engine.play_chime());

        ctx.audio.fail_playback(false);
        assert!(engine.play_chime());
    }

    #[test_context(SoundTestContext)]
    #[test]
    fn test_set_config_keeps_previous_wave_on_bogus_input(ctx: &mut SoundTestContext) {
        let mut engine = ctx.engine();
        engine.set_config(SoundConfigUpdate::wave("square"));

        let config = engine.set_config(SoundConfigUpdate::wave("bogus").with_volume(2.0));
        assert_eq!(
            config,
            SoundConfig {
                wave: Waveform::Square,
                volume: 1.0
            }
        );

        let config = engine.set_config(SoundConfigUpdate {
            wave: None,
            volume: Some(json!("quiet")),
        });
        assert_eq!(config.volume, 1.0);

        let config = engine.set_config(SoundConfigUpdate::volume(-0.5));
        assert_eq!(config.volume, 0.0);
    }

    #[test_context(SoundTestContext)]
    #[test]
    fn test_set_config_persists(ctx: &mut SoundTestContext) {
        let mut engine = ctx.engine();
        engine.set_config(SoundConfigUpdate::wave("sawtooth").with_volume(0.6));

        assert_eq!(ctx.prefs.get_raw(SOUND_CONFIG_KEY), Some(json!({ "wave": "sawtooth", "volume": 0.6 })));

        let reloaded = ctx.engine();
        assert_eq!(
            reloaded.config(),
            SoundConfig {
                wave: Waveform::Sawtooth,
                volume: 0.6
            }
        );
    }

    #[test_context(SoundTestContext)]
    #[test]
    fn test_load_normalizes_stored_config(ctx: &mut SoundTestContext) {
        ctx.prefs.set(SOUND_CONFIG_KEY, &json!({ "wave": "kazoo", "volume": 5 })).unwrap();
        assert_eq!(
            ctx.engine().config(),
            SoundConfig {
                wave: Waveform::Sine,
                volume: 1.0
            }
        );
    }

    #[test_context(SoundTestContext)]
    #[test]
    fn test_chime_follows_config(ctx: &mut SoundTestContext) {
        let mut engine = ctx.engine();
        engine.enable();
        let config = engine.set_config(SoundConfigUpdate::wave("square").with_volume(0.5));
        assert!(engine.play_chime());

        let plays = ctx.audio.plays();
        assert_eq!(plays.last().unwrap().samples, Chime::render(&config, 48_000));
    }
}
