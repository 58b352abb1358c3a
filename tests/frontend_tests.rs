//! Tests for the pieces around the simulation: key mapping, audio intents
//! and configuration.

use std::time::Duration;

use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use falling_blocks::{
    audio::{signal_for, AudioSignal, AudioSink, Bell, Silent},
    config::Cli,
    game::SequencePieceProvider,
    input::map_key,
    Config, ConfigError, Game, GameEvent, InputEvent, ShapeId,
};
use serial_test::serial;

// ============================================================================
// Input Mapping Tests
// ============================================================================

mod input_mapping {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_drive_the_piece() {
        assert_eq!(map_key(press(KeyCode::Left)), Some(InputEvent::MoveLeft));
        assert_eq!(map_key(press(KeyCode::Right)), Some(InputEvent::MoveRight));
        assert_eq!(map_key(press(KeyCode::Down)), Some(InputEvent::SoftDrop));
        assert_eq!(map_key(press(KeyCode::Up)), Some(InputEvent::Rotate));
    }

    #[test]
    fn letters_control_the_session() {
        assert_eq!(map_key(press(KeyCode::Char('p'))), Some(InputEvent::TogglePause));
        assert_eq!(map_key(press(KeyCode::Char('R'))), Some(InputEvent::Reset));
        assert_eq!(map_key(press(KeyCode::Char('s'))), Some(InputEvent::ToggleSound));
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(InputEvent::Quit));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(press(KeyCode::Enter)), None);
    }

    #[test]
    fn only_presses_count() {
        let release = KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Release);
        let repeat = KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Repeat);

        assert_eq!(map_key(release), None);
        assert_eq!(map_key(repeat), None);
    }
}

// ============================================================================
// Audio Tests
// ============================================================================

mod audio {
    use super::*;

    #[test]
    fn bell_rings_on_start_only() {
        let mut bell = Bell::new(Vec::new());

        bell.signal(AudioSignal::Start);
        assert!(bell.is_playing());
        bell.signal(AudioSignal::Stop);
        assert!(!bell.is_playing());

        assert_eq!(bell.into_inner(), b"\x07".to_vec());
    }

    #[test]
    fn silent_sink_accepts_everything() {
        let mut sink = Silent;
        sink.signal(AudioSignal::Start);
        sink.signal(AudioSignal::Stop);
    }

    #[test]
    fn lifecycle_events_map_to_signals() {
        assert_eq!(signal_for(&GameEvent::GameRestarted, true), Some(AudioSignal::Start));
        assert_eq!(signal_for(&GameEvent::GameRestarted, false), None);
        assert_eq!(signal_for(&GameEvent::SoundToggled(true), true), Some(AudioSignal::Start));
        assert_eq!(signal_for(&GameEvent::SoundToggled(false), false), Some(AudioSignal::Stop));
        assert_eq!(signal_for(&GameEvent::GameOver, true), Some(AudioSignal::Stop));
        assert_eq!(signal_for(&GameEvent::PieceLocked, true), None);
    }

    #[test]
    fn sound_off_survives_reset_in_same_frame() {
        let mut game = Game::with_provider(
            Config::default(),
            Box::new(SequencePieceProvider::new(vec![ShapeId::O])),
        )
        .unwrap();
        game.take_events();

        game.tick(Duration::ZERO, &[InputEvent::ToggleSound, InputEvent::Reset]);

        let signals: Vec<AudioSignal> = game
            .take_events()
            .iter()
            .filter_map(|event| signal_for(event, game.sound_on))
            .collect();
        assert!(!game.sound_on);
        assert_eq!(signals.last(), Some(&AudioSignal::Stop));
    }

    #[test]
    fn muted_game_runs_without_start_signal() {
        let config = Config {
            sound_on: false,
            seed: Some(1),
            ..Config::default()
        };
        let mut game = Game::new(config).unwrap();
        let mut bell = Bell::new(Vec::new());

        for _ in 0..20 {
            game.tick(Duration::from_millis(500), &[]);
            for event in game.take_events() {
                if let Some(signal) = signal_for(&event, game.sound_on) {
                    bell.signal(signal);
                }
            }
        }

        assert!(bell.into_inner().is_empty());
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod configuration {
    use super::*;

    #[test]
    fn defaults_match_classic_grid() {
        let config = Config::default();

        assert_eq!(config.grid_width, 10);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.fall_interval, Duration::from_millis(500));
        assert!(config.sound_on);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_sized_grid_is_refused() {
        let narrow = Config {
            grid_width: 0,
            ..Config::default()
        };
        let flat = Config {
            grid_height: 0,
            ..Config::default()
        };

        assert_eq!(Game::new(narrow).err(), Some(ConfigError::ZeroWidth));
        assert_eq!(Game::new(flat).err(), Some(ConfigError::ZeroHeight));
    }

    #[test]
    fn grid_narrower_than_a_shape_is_refused() {
        let config = Config {
            grid_width: 3,
            ..Config::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::ShapeTooWide {
                shape: ShapeId::I,
                shape_width: 4,
                grid_width: 3,
            })
        );
    }

    #[test]
    fn oversized_grid_and_zero_interval_are_refused() {
        let huge = Config {
            grid_height: 5000,
            ..Config::default()
        };
        let frozen = Config {
            fall_interval: Duration::ZERO,
            ..Config::default()
        };

        assert_eq!(huge.validate(), Err(ConfigError::GridTooLarge(5000)));
        assert_eq!(frozen.validate(), Err(ConfigError::ZeroFallInterval));
    }

    #[test]
    #[serial]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["falling-blocks"]).unwrap();

        assert_eq!(cli.to_config(), Config::default());
        assert!(cli.log_file.is_none());
    }

    #[test]
    #[serial]
    fn cli_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "falling-blocks",
            "--width",
            "12",
            "--height",
            "24",
            "--fall-ms",
            "250",
            "--seed",
            "9",
            "--mute",
        ])
        .unwrap();

        let config = cli.to_config();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 24);
        assert_eq!(config.fall_interval, Duration::from_millis(250));
        assert_eq!(config.seed, Some(9));
        assert!(!config.sound_on);
    }

    #[test]
    #[serial]
    fn cli_reads_environment() {
        std::env::set_var("FALLING_BLOCKS_FALL_MS", "125");
        std::env::set_var("FALLING_BLOCKS_WIDTH", "8");
        let parsed = Cli::try_parse_from(["falling-blocks"]);
        std::env::remove_var("FALLING_BLOCKS_FALL_MS");
        std::env::remove_var("FALLING_BLOCKS_WIDTH");

        let config = parsed.unwrap().to_config();
        assert_eq!(config.fall_interval, Duration::from_millis(125));
        assert_eq!(config.grid_width, 8);
    }
}
