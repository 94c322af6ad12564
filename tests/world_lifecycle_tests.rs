//! Entity lifecycle through the public world API: registration, deferred
//! deletion, reference scrubbing, screen caches and regrowing resources.

use wildwood::game::templates;
use wildwood::{
    EquipSlot, ItemTemplate, Point, WildwoodError, WildwoodResult, World, WorldConfig,
};

fn world_with_player(at: Point) -> WildwoodResult<World> {
    let mut world = World::new(WorldConfig::for_testing(23));
    world.add_entity(templates::player(at))?;
    world.set_player(templates::PLAYER_ID)?;
    world.refresh_caches();
    Ok(world)
}

#[test]
fn test_duplicate_identity_is_rejected() -> WildwoodResult<()> {
    let mut world = world_with_player(Point::new(5, 5))?;
    let tree = templates::tree(Point::new(8, 8));
    let mut copy = templates::tree(Point::new(9, 9));
    copy.id = tree.id.clone();
    world.add_entity(tree)?;

    let before = world.len();
    match world.add_entity(copy) {
        Err(WildwoodError::DuplicateEntity(_)) => {}
        other => panic!("expected a duplicate error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(world.len(), before);
    Ok(())
}

#[test]
fn test_deletion_waits_for_the_next_tick() -> WildwoodResult<()> {
    let mut world = world_with_player(Point::new(5, 5))?;
    let stick = ItemTemplate::Stick.spawn(Point::new(7, 7))?;
    let stick_id = stick.id.clone();
    world.add_entity(stick)?;

    world.queue_for_deletion(&stick_id);
    world.queue_for_deletion(&stick_id);
    assert!(world.contains(&stick_id));
    assert!(world.is_queued_for_deletion(&stick_id));

    world.tick()?;
    assert!(!world.contains(&stick_id));
    assert!(!world.current_entities().contains(&stick_id));
    assert_eq!(world.cleanup(), 0);
    Ok(())
}

#[test]
fn test_erasing_an_item_scrubs_its_holder() -> WildwoodResult<()> {
    let mut world = world_with_player(Point::new(5, 5))?;
    let torch = ItemTemplate::Torch.spawn(Point::new(5, 5))?;
    let torch_id = torch.id.clone();
    world.add_entity(torch)?;
    assert!(world.equip(templates::PLAYER_ID, EquipSlot::RightHand, &torch_id)?);

    world.erase(&torch_id)?;

    let player = world.player().ok_or(WildwoodError::NoPlayer)?;
    assert!(player.inventory.is_empty());
    assert!(player.equipment.slot_of(&torch_id).is_none());
    assert_eq!(world.carried_weight(templates::PLAYER_ID), 0);
    Ok(())
}

#[test]
fn test_carried_items_follow_their_holder() -> WildwoodResult<()> {
    let mut world = world_with_player(Point::new(5, 5))?;
    let stone = ItemTemplate::Stone.spawn(Point::new(5, 5))?;
    let stone_id = stone.id.clone();
    world.add_entity(stone)?;
    assert!(world.add_to_inventory(templates::PLAYER_ID, &stone_id)?);

    assert!(world.move_entity(templates::PLAYER_ID, Point::new(6, 6))?);
    assert_eq!(world.position_of(&stone_id), Some(Point::new(6, 6)));
    assert!(world.entities_at(Point::new(6, 6)).iter().all(|id| id != &stone_id));

    assert!(world.remove_from_inventory(templates::PLAYER_ID, &stone_id)?);
    assert!(world.entities_at(Point::new(6, 6)).contains(&stone_id));
    Ok(())
}

#[test]
fn test_caches_cover_the_anchor_and_its_neighbours() -> WildwoodResult<()> {
    let mut world = world_with_player(Point::new(5, 5))?;
    let near = templates::tree(Point::new(-3, 40));
    let far = templates::tree(Point::new(130, 5));
    let (near_id, far_id) = (near.id.clone(), far.id.clone());
    world.add_entity(near)?;
    world.add_entity(far)?;

    assert!(world.current_entities().iter().any(|id| id == templates::PLAYER_ID));
    assert!(world.surrounding_entities().contains(&near_id));
    assert!(!world.current_entities().contains(&far_id));
    assert!(!world.surrounding_entities().contains(&far_id));
    assert!(world.entities_at_fast(Point::new(130, 5)).is_empty());
    assert_eq!(world.entities_at(Point::new(130, 5)), vec![far_id]);
    Ok(())
}

#[test]
fn test_picked_bush_regrows_after_its_restock_rate() -> WildwoodResult<()> {
    let mut world = world_with_player(Point::new(5, 5))?;
    let bush = templates::berry_bush(Point::new(10, 10))?;
    let bush_id = bush.id.clone();
    world.add_entity(bush)?;
    let stock = |world: &World| world.get_entity(&bush_id).map_or(0, |bush| bush.inventory.len());

    for _ in 0..59 {
        world.tick()?;
    }
    assert_eq!(stock(&world), 0);

    world.tick()?;
    assert_eq!(stock(&world), 1);

    for _ in 0..60 {
        world.tick()?;
    }
    assert_eq!(stock(&world), 1);
    Ok(())
}
