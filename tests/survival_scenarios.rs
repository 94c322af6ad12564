//! End-to-end scenarios driven through `Game::handle_command`, the same path
//! the frame loop uses.

use wildwood::game::templates;
use wildwood::{
    BehaviourKind, Command, Direction, EquipSlot, Game, ItemTemplate, Point, RecipeBook,
    RecipeProgress, SceneType, Time, WildwoodError, WildwoodResult, World, WorldConfig,
};

fn small_world() -> WildwoodResult<World> {
    let mut world = World::new(WorldConfig::for_testing(17));
    world.add_entity(templates::player(Point::new(5, 5)))?;
    world.set_player(templates::PLAYER_ID)?;
    world.refresh_caches();
    Ok(world)
}

fn saw(world: &World, message: &str) -> bool {
    world.status.notifications().any(|line| line == message)
}

#[test]
fn test_equipped_torch_lights_the_night() -> WildwoodResult<()> {
    let mut world = small_world()?;
    let torch = ItemTemplate::Torch.spawn(Point::new(5, 5))?;
    let torch_id = torch.id.clone();
    world.add_entity(torch)?;
    assert!(world.add_to_inventory(templates::PLAYER_ID, &torch_id)?);
    world.set_time(Time::new(0, 0));

    assert!(world.lights(0).is_empty());

    assert!(world.equip(templates::PLAYER_ID, EquipSlot::LeftHand, &torch_id)?);
    let lights = world.lights(0);
    assert_eq!(lights.len(), 1);
    let cell = world.config().cell_size;
    assert_eq!(lights[0].x, 5.5 * cell);
    assert_eq!(lights[0].y, 5.5 * cell);
    assert_eq!(lights[0].radius, 5.0 * cell);
    Ok(())
}

#[test]
fn test_pick_berries_from_a_bush_and_eat_them() -> WildwoodResult<()> {
    let mut world = small_world()?;
    let bush = templates::berry_bush(Point::new(6, 5))?;
    let bush_id = bush.id.clone();
    world.add_entity(bush)?;
    let berry = ItemTemplate::Berry.spawn(Point::new(6, 5))?;
    let berry_id = berry.id.clone();
    world.add_entity(berry)?;
    world.add_to_inventory(&bush_id, &berry_id)?;
    if let Some(hunger) = world.player_mut().and_then(|player| player.hunger.as_mut()) {
        hunger.current = 10;
    }

    let mut game = Game::with_world(world);
    game.handle_command(Command::Loot)?;
    assert_eq!(game.dialog_state(), Some("looting"));
    game.handle_command(Command::Confirm)?;
    assert!(game.dialog_state().is_none());
    assert!(game.world().inventory_contains(templates::PLAYER_ID, &berry_id));
    assert!(game.world().get_entity(&bush_id).map_or(false, |bush| bush.inventory.is_empty()));

    game.handle_command(Command::OpenInventory)?;
    game.handle_command(Command::Eat)?;
    game.handle_command(Command::Cancel)?;
    let hunger = game.world().player().and_then(|player| player.hunger);
    assert_eq!(hunger.map(|hunger| hunger.current), Some(13));
    assert!(saw(game.world(), "You eat the berry."));
    Ok(())
}

#[test]
fn test_hunting_a_rabbit() -> WildwoodResult<()> {
    let mut world = small_world()?;
    let mut rabbit = templates::rabbit(Point::new(6, 5))?;
    rabbit.behaviours.set_enabled(BehaviourKind::Wander, false);
    rabbit.behaviours.set_enabled(BehaviourKind::SeekHome, false);
    let rabbit_id = rabbit.id.clone();
    world.add_entity(rabbit)?;

    let mut game = Game::with_world(world);
    for _ in 0..200 {
        if !game.world().contains(&rabbit_id) {
            break;
        }
        game.handle_command(Command::Attack(Direction::East))?;
    }

    assert!(!game.world().contains(&rabbit_id));
    assert!(saw(game.world(), "The rabbit dies."));
    assert!(game.world().status.attack_target().is_none());
    Ok(())
}

#[test]
fn test_hitting_the_dog_turns_it_hostile() -> WildwoodResult<()> {
    let mut world = small_world()?;
    let mut dog = templates::dog(Point::new(6, 5))?;
    dog.behaviours.set_enabled(BehaviourKind::WanderAttach, false);
    let dog_id = dog.id.clone();
    world.add_entity(dog)?;

    let mut game = Game::with_world(world);
    for _ in 0..100 {
        if saw(game.world(), "The dog turns on you!") {
            break;
        }
        game.handle_command(Command::Attack(Direction::East))?;
    }

    assert!(saw(game.world(), "The dog turns on you!"));
    let dog = game.world().get_entity(&dog_id);
    assert!(dog.map_or(false, |dog| dog.behaviours.is_enabled(BehaviourKind::ChaseAndAttack)));
    assert!(dog.map_or(false, |dog| !dog.behaviours.is_enabled(BehaviourKind::WanderAttach)));
    Ok(())
}

#[test]
fn test_walking_through_a_door() -> WildwoodResult<()> {
    let mut world = small_world()?;
    let door = templates::door(Point::new(6, 5), false)?;
    let door_id = door.id.clone();
    world.add_entity(door)?;

    let mut game = Game::with_world(world);
    game.handle_command(Command::Move(Direction::East))?;
    assert_eq!(game.world().player_position(), Some(Point::new(5, 5)));
    assert_eq!(game.world().status.last(), Some("You open the door."));
    assert!(game.world().get_entity(&door_id).map_or(false, |door| !door.solid));

    game.handle_command(Command::Move(Direction::East))?;
    game.handle_command(Command::Move(Direction::East))?;
    assert_eq!(game.world().player_position(), Some(Point::new(7, 5)));
    Ok(())
}

#[test]
fn test_crossing_into_the_next_screen() -> WildwoodResult<()> {
    let mut world = World::new(WorldConfig::for_testing(17));
    world.add_entity(templates::player(Point::new(59, 5)))?;
    world.set_player(templates::PLAYER_ID)?;
    let tree = templates::tree(Point::new(70, 8));
    let tree_id = tree.id.clone();
    world.add_entity(tree)?;
    world.refresh_caches();
    assert_eq!(world.anchor(), Point::origin());
    assert!(world.surrounding_entities().contains(&tree_id));

    let mut game = Game::with_world(world);
    game.handle_command(Command::Move(Direction::East))?;

    assert_eq!(game.world().player_position(), Some(Point::new(60, 5)));
    assert_eq!(game.world().anchor(), Point::new(1, 0));
    assert!(game.world().current_entities().contains(&tree_id));
    Ok(())
}

#[test]
fn test_death_and_a_fresh_start() -> WildwoodResult<()> {
    let mut world = small_world()?;
    if let Some(player) = world.player_mut() {
        player.hp = 1;
        if let Some(hunger) = player.hunger.as_mut() {
            hunger.current = 0;
        }
    }

    let mut game = Game::with_world(world);
    game.handle_command(Command::Wait)?;
    match game.scene() {
        SceneType::GameOver { turns, .. } => assert_eq!(*turns, 1),
        SceneType::Playing => panic!("the player should have starved"),
    }

    game.handle_command(Command::Move(Direction::North))?;
    assert!(matches!(game.scene(), SceneType::GameOver { .. }));

    assert!(!game.handle_command(Command::Confirm)?);
    assert_eq!(game.scene(), &SceneType::Playing);
    assert_eq!(game.world().config().seed, 18);
    assert_eq!(game.world().ticks(), 0);
    Ok(())
}

/// Crafts a torch from whatever the player carries. Returns false when the
/// materials run short.
fn craft_torch(world: &mut World) -> WildwoodResult<bool> {
    let recipe = RecipeBook::standard()
        .recipes
        .into_iter()
        .find(|recipe| recipe.name == "Torch")
        .ok_or_else(|| WildwoodError::InvalidState("no torch recipe".to_string()))?;
    let mut progress = RecipeProgress::new(recipe);
    for ingredient in 0..progress.recipe.ingredients.len() {
        while progress.remaining[ingredient] > 0 {
            let candidates = progress.candidates(world, templates::PLAYER_ID, ingredient);
            let Some(item) = candidates.first() else {
                return Ok(false);
            };
            progress.assign(world, ingredient, item);
        }
    }
    progress.build(world, templates::PLAYER_ID, None)?;
    Ok(true)
}

#[test]
fn test_crafting_materials_cannot_be_reused() -> WildwoodResult<()> {
    let mut world = small_world()?;
    for template in [ItemTemplate::Stick, ItemTemplate::Grass] {
        let item = template.spawn(Point::new(5, 5))?;
        let id = item.id.clone();
        world.add_entity(item)?;
        assert!(world.add_to_inventory(templates::PLAYER_ID, &id)?);
    }

    let mut game = Game::with_world(world);
    assert!(craft_torch(game.world_mut())?);

    game.handle_command(Command::Loot)?;
    assert!(game.dialog_state().is_none());
    assert_eq!(game.world().status.last(), Some("There is nothing here to pick up."));
    game.handle_command(Command::Confirm)?;
    game.handle_command(Command::Confirm)?;
    assert!(!craft_torch(game.world_mut())?);

    game.handle_command(Command::Wait)?;
    let names: Vec<&str> = game.world().entities().map(|entity| entity.name.as_str()).collect();
    assert_eq!(names.iter().filter(|name| **name == "Torch").count(), 1);
    assert!(!names.contains(&"Stick"));
    assert!(!names.contains(&"Grass"));
    Ok(())
}
