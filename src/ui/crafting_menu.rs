//! # Crafting Screens
//!
//! Pick a recipe, then fill each ingredient by choosing which carried items
//! to use. Inventory products are built as soon as the recipe is complete;
//! world products ask for a direction to build in first. Nothing is consumed
//! until the build happens, so backing out at any step is free.

use crate::game::{Direction, EntityId, Placement, RecipeBook, RecipeProgress, World};
use crate::input::Command;
use crate::rendering::{draw_frame, draw_list, Canvas, Rgb};
use crate::ui::{menu_area, wrap_cursor, Popup, Transition, UiState};
use crate::WildwoodResult;
use log::info;

/// Recipe list.
#[derive(Debug, Clone)]
pub struct CraftingMenu {
    crafter: EntityId,
    book: RecipeBook,
    cursor: usize,
}

impl CraftingMenu {
    pub fn new(crafter: &str, book: RecipeBook) -> Self {
        Self {
            crafter: crafter.to_string(),
            book,
            cursor: 0,
        }
    }
}

impl UiState for CraftingMenu {
    fn name(&self) -> &'static str {
        "crafting"
    }

    fn handle_input(&mut self, command: Command, _world: &mut World) -> WildwoodResult<Transition> {
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, self.book.len());
            return Ok(Transition::Stay);
        }
        match command {
            Command::Cancel | Command::OpenCrafting => Ok(Transition::Close),
            Command::Confirm => {
                let Some(recipe) = self.book.get(self.cursor).cloned() else {
                    return Ok(Transition::Stay);
                };
                Ok(Transition::Switch(Box::new(IngredientMenu {
                    menu: self.clone(),
                    progress: RecipeProgress::new(recipe),
                    cursor: 0,
                })))
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, "Crafting");
        let names: Vec<String> = self.book.recipes.iter().map(|r| r.name.clone()).collect();
        draw_list(canvas, corner.x + 2, corner.y + 2, &names, Some(self.cursor));

        if let Some(recipe) = self.book.get(self.cursor) {
            let x = corner.x + size.x / 2;
            canvas.draw_text("Needs:", x, corner.y + 2, Rgb::YELLOW);
            for (row, ingredient) in recipe.ingredients.iter().enumerate() {
                canvas.draw_text(
                    &format!("{} x {}", ingredient.quantity, ingredient.material),
                    x + 1,
                    corner.y + 3 + row as i32,
                    Rgb::WHITE,
                );
            }
        }
    }
}

/// Ingredient list of the chosen recipe with what is still missing.
#[derive(Debug, Clone)]
pub struct IngredientMenu {
    menu: CraftingMenu,
    progress: RecipeProgress,
    cursor: usize,
}

impl IngredientMenu {
    pub fn progress(&self) -> &RecipeProgress {
        &self.progress
    }
}

impl UiState for IngredientMenu {
    fn name(&self) -> &'static str {
        "ingredients"
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, self.progress.remaining.len());
            return Ok(Transition::Stay);
        }
        match command {
            Command::Cancel => Ok(Transition::Switch(Box::new(self.menu.clone()))),
            Command::Confirm => {
                if self.progress.remaining.get(self.cursor).copied().unwrap_or(0) == 0 {
                    return Ok(Transition::Stay);
                }
                let candidates =
                    self.progress
                        .candidates(world, &self.menu.crafter, self.cursor);
                if candidates.is_empty() {
                    let material = self.progress.recipe.ingredients[self.cursor].material;
                    return Ok(Transition::Switch(Box::new(Popup::returning_to(
                        &format!("You don't have any {}.", material),
                        Box::new(self.clone()),
                    ))));
                }
                Ok(Transition::Switch(Box::new(MaterialMenu {
                    ingredients: self.clone(),
                    candidates,
                    cursor: 0,
                })))
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, &self.progress.recipe.name);
        let rows: Vec<String> = self
            .progress
            .recipe
            .ingredients
            .iter()
            .zip(&self.progress.remaining)
            .map(|(ingredient, left)| {
                format!("{} x {} ({} left)", ingredient.quantity, ingredient.material, left)
            })
            .collect();
        draw_list(canvas, corner.x + 2, corner.y + 2, &rows, Some(self.cursor));
    }
}

/// Carried items that can fill the selected ingredient.
#[derive(Debug, Clone)]
pub struct MaterialMenu {
    ingredients: IngredientMenu,
    candidates: Vec<EntityId>,
    cursor: usize,
}

impl MaterialMenu {
    /// After an assignment: build, ask where to build, pick more of the same
    /// ingredient, or go back to the ingredient list.
    fn next_step(&self, world: &mut World) -> WildwoodResult<Transition> {
        let progress = &self.ingredients.progress;
        let crafter = &self.ingredients.menu.crafter;
        if progress.is_satisfied() {
            return match progress.recipe.placement {
                Placement::Inventory => {
                    progress.build(world, crafter, None)?;
                    world.notify(format!(
                        "You craft the {}.",
                        progress.recipe.name.to_lowercase()
                    ));
                    Ok(Transition::Switch(Box::new(self.ingredients.menu.clone())))
                }
                Placement::World => Ok(Transition::Switch(Box::new(PlacementMenu {
                    ingredients: self.ingredients.clone(),
                }))),
            };
        }

        let ingredient = self.ingredients.cursor;
        let candidates = progress.candidates(world, crafter, ingredient);
        if progress.remaining[ingredient] > 0 && !candidates.is_empty() {
            return Ok(Transition::Switch(Box::new(MaterialMenu {
                ingredients: self.ingredients.clone(),
                candidates,
                cursor: 0,
            })));
        }
        Ok(Transition::Switch(Box::new(self.ingredients.clone())))
    }
}

impl UiState for MaterialMenu {
    fn name(&self) -> &'static str {
        "materials"
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if let Some(step) = command.menu_step() {
            self.cursor = wrap_cursor(self.cursor, step, self.candidates.len());
            return Ok(Transition::Stay);
        }
        match command {
            Command::Cancel => Ok(Transition::Switch(Box::new(self.ingredients.clone()))),
            Command::Confirm => {
                let Some(item) = self.candidates.get(self.cursor).cloned() else {
                    return Ok(Transition::Stay);
                };
                let ingredient = self.ingredients.cursor;
                if !self.ingredients.progress.assign(world, ingredient, &item) {
                    return Ok(Transition::Stay);
                }
                self.next_step(world)
            }
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let (corner, size) = menu_area(world);
        draw_frame(canvas, corner.x, corner.y, size.x, size.y, "Use which?");
        let rows: Vec<String> = self
            .candidates
            .iter()
            .filter_map(|id| world.get_entity(id))
            .map(|item| match item.properties.material() {
                Some((_, quality)) => format!("{} (quality {})", item.name, quality),
                None => item.name.clone(),
            })
            .collect();
        draw_list(canvas, corner.x + 2, corner.y + 2, &rows, Some(self.cursor));
    }
}

/// Asks which adjacent square to build a world product on.
#[derive(Debug, Clone)]
pub struct PlacementMenu {
    ingredients: IngredientMenu,
}

impl PlacementMenu {
    fn build_towards(&self, world: &mut World, direction: Direction) -> WildwoodResult<Transition> {
        let crafter = &self.ingredients.menu.crafter;
        let Some(origin) = world.position_of(crafter) else {
            return Ok(Transition::Close);
        };
        let target = origin + direction.to_delta();
        if world.is_occupied(target) {
            return Ok(Transition::Switch(Box::new(Popup::returning_to(
                "Something is in the way.",
                Box::new(self.clone()),
            ))));
        }
        let progress = &self.ingredients.progress;
        let product = progress.build(world, crafter, Some(target))?;
        info!("{} placed at {}", product, target);
        world.notify(format!(
            "You build the {}.",
            progress.recipe.name.to_lowercase()
        ));
        Ok(Transition::Close)
    }
}

impl UiState for PlacementMenu {
    fn name(&self) -> &'static str {
        "placement"
    }

    fn handle_input(&mut self, command: Command, world: &mut World) -> WildwoodResult<Transition> {
        if let Some(direction) = command.direction() {
            return self.build_towards(world, direction);
        }
        match command {
            Command::Cancel => Ok(Transition::Switch(Box::new(self.ingredients.menu.clone()))),
            _ => Ok(Transition::Stay),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, world: &World) {
        let lines = vec![
            format!("Build the {} where?", self.ingredients.progress.recipe.name.to_lowercase()),
            "Pick a direction, or escape to cancel.".to_string(),
        ];
        crate::rendering::draw_message_box(canvas, world.config().screen_size(), "Build", &lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{templates, ItemTemplate, Point, WorldConfig};
    use crate::ui::Dialog;

    fn world_with(items: &[ItemTemplate]) -> World {
        let mut world = World::new(WorldConfig::for_testing(9));
        world.add_entity(templates::player(Point::new(5, 5))).unwrap();
        world.set_player(templates::PLAYER_ID).unwrap();
        for template in items {
            let item = template.spawn(Point::new(5, 5)).unwrap();
            let id = item.id.clone();
            world.add_entity(item).unwrap();
            assert!(world.add_to_inventory(templates::PLAYER_ID, &id).unwrap());
        }
        world.refresh_caches();
        world
    }

    fn open(world: &mut World) -> Dialog {
        let menu = CraftingMenu::new(templates::PLAYER_ID, RecipeBook::standard());
        Dialog::open(Box::new(menu), world).unwrap().unwrap()
    }

    fn inventory_names(world: &World) -> Vec<String> {
        world
            .player()
            .unwrap()
            .inventory
            .iter()
            .map(|id| world.get_entity(id).unwrap().name.clone())
            .collect()
    }

    /// Index of a recipe in the standard book.
    fn select(dialog: &mut Dialog, world: &mut World, name: &str) {
        let index = RecipeBook::standard()
            .recipes
            .iter()
            .position(|recipe| recipe.name == name)
            .unwrap();
        for _ in 0..index {
            dialog.handle_input(Command::Next, world).unwrap();
        }
        dialog.handle_input(Command::Confirm, world).unwrap();
        assert_eq!(dialog.state_name(), "ingredients");
    }

    #[test]
    fn test_torch_is_crafted_into_inventory() {
        let mut world = world_with(&[ItemTemplate::Stick, ItemTemplate::Grass]);
        let mut dialog = open(&mut world);
        select(&mut dialog, &mut world, "Torch");

        // wood
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "materials");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "ingredients");

        // grass
        dialog.handle_input(Command::Next, &mut world).unwrap();
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "crafting");

        world.cleanup();
        assert_eq!(inventory_names(&world), vec!["Torch".to_string()]);
        assert_eq!(world.status.last(), Some("You craft the torch."));
    }

    #[test]
    fn test_missing_material_pops_up() {
        let mut world = world_with(&[ItemTemplate::Grass]);
        let mut dialog = open(&mut world);
        select(&mut dialog, &mut world, "Torch");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "popup");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "ingredients");
    }

    #[test]
    fn test_campfire_needs_a_free_square() {
        let mut world = world_with(&[ItemTemplate::Stick, ItemTemplate::Stick, ItemTemplate::Grass]);
        world.add_entity(templates::tree(Point::new(5, 4))).unwrap();
        world.refresh_caches();
        let mut dialog = open(&mut world);
        select(&mut dialog, &mut world, "Campfire");

        // two sticks in a row, then the grass
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "materials");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "ingredients");
        dialog.handle_input(Command::Next, &mut world).unwrap();
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "placement");

        dialog.handle_input(Command::Move(Direction::North), &mut world).unwrap();
        assert_eq!(dialog.state_name(), "popup");
        assert_eq!(world.player().unwrap().inventory.len(), 3);
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "placement");

        assert!(!dialog.handle_input(Command::Move(Direction::South), &mut world).unwrap());
        world.cleanup();
        assert!(world.player().unwrap().inventory.is_empty());
        let here: Vec<String> = world
            .entities_at(Point::new(5, 6))
            .iter()
            .map(|id| world.get_entity(id).unwrap().name.clone())
            .collect();
        assert_eq!(here, vec!["Campfire".to_string()]);
    }

    #[test]
    fn test_backing_out_consumes_nothing() {
        let mut world = world_with(&[ItemTemplate::Stick, ItemTemplate::Grass]);
        let mut dialog = open(&mut world);
        select(&mut dialog, &mut world, "Torch");
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        dialog.handle_input(Command::Confirm, &mut world).unwrap();
        dialog.handle_input(Command::Cancel, &mut world).unwrap();
        assert_eq!(dialog.state_name(), "crafting");
        assert!(!dialog.handle_input(Command::Cancel, &mut world).unwrap());
        world.cleanup();
        assert_eq!(world.player().unwrap().inventory.len(), 2);
    }
}
