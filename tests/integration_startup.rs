//! Integration test to ensure a game can start up without errors.

use tempfile::tempdir;
use wildwood::game::templates;
use wildwood::{
    canvas_size, generate_world, Command, Game, Point, SceneType, TextBuffer, WildwoodError,
    WildwoodResult, WorldConfig,
};

#[test]
fn test_basic_startup() -> WildwoodResult<()> {
    let config = WorldConfig::for_testing(12345);
    let game = Game::new(&config)?;

    assert_eq!(game.scene(), &SceneType::Playing);
    assert!(game.dialog_state().is_none());
    assert_eq!(game.world().player_id().map(String::as_str), Some(templates::PLAYER_ID));
    assert_eq!(game.world().player_position(), Some(config.screen_size() / 2));
    assert!(game.world().status.last().is_some());
    assert!(game.world().caches_populated());

    Ok(())
}

#[test]
fn test_first_frame_renders_player_and_hud() -> WildwoodResult<()> {
    let config = WorldConfig::for_testing(99);
    let game = Game::new(&config)?;
    let size = canvas_size(config.screen_size());
    let mut buffer = TextBuffer::new(size.x, size.y);

    game.render(&mut buffer, 0);

    let player = config.screen_size() / 2;
    assert_eq!(buffer.get(player.x, player.y), Some('@'));
    assert!(buffer.contains("HP"));
    assert!(buffer.contains("You wake up in the woods."));
    Ok(())
}

#[test]
fn test_first_turns_advance_the_clock() -> WildwoodResult<()> {
    let mut game = Game::new(&WorldConfig::for_testing(7))?;
    let start = game.world().time();

    for _ in 0..5 {
        assert!(!game.handle_command(Command::Wait)?);
    }

    assert_eq!(game.world().ticks(), 5);
    assert_eq!(
        game.world().time().minutes_since_midnight(),
        start.minutes_since_midnight() + 5 * game.world().config().minutes_per_tick
    );
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> WildwoodResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("world.json");
    let config = WorldConfig {
        seed: 31,
        creatures_per_screen: 3,
        ..WorldConfig::default()
    };
    config.save(&path)?;

    let loaded = WorldConfig::load(&path)?;
    assert_eq!(loaded, config);

    let world = generate_world(&loaded)?;
    assert_eq!(world.player_position(), Some(Point::new(30, 15)));
    Ok(())
}

#[test]
fn test_partial_config_uses_defaults() -> WildwoodResult<()> {
    let config = WorldConfig::from_json(r#"{ "seed": 4, "start_hour": 21 }"#)?;
    assert_eq!(config.seed, 4);
    assert_eq!(config.start_hour, 21);
    assert_eq!(config.screen_width, WorldConfig::default().screen_width);
    Ok(())
}

#[test]
fn test_zero_sized_screen_is_an_error() -> WildwoodResult<()> {
    assert!(matches!(
        WorldConfig::from_json(r#"{ "screen_width": 0 }"#),
        Err(WildwoodError::InvalidState(_))
    ));

    let config = WorldConfig {
        screen_height: 0,
        ..WorldConfig::for_testing(3)
    };
    assert!(matches!(generate_world(&config), Err(WildwoodError::InvalidState(_))));
    assert!(Game::new(&config).is_err());
    Ok(())
}
