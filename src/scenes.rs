//! # Scene Management System
//!
//! [`Game`] owns the world and the active dialog and routes exactly one
//! [`Command`] per loop iteration, either to the dialog or to the player.
//! [`SceneManager`] wraps it in the macroquad frame loop.

use crate::game::{Entity, EntityId, Point, RecipeBook, Time, World, WorldConfig};
use crate::generation::{floor_glyph, generate_world};
use crate::input::{Command, InputHandler, HELP_LINES};
use crate::rendering::{
    canvas_size, draw_hud, draw_message_box, draw_world, Canvas, MacroquadDisplay,
};
use crate::ui::{
    CraftingMenu, Dialog, EquipmentMenu, InspectionMenu, InteractionMenu, InventoryMenu,
    LootSource, LootingMenu, UiState,
};
use crate::{WildwoodError, WildwoodResult};
use log::{debug, info};
use macroquad::prelude::next_frame;

/// Represents the current scene in the game
#[derive(Debug, Clone, PartialEq)]
pub enum SceneType {
    /// Normal gameplay
    Playing,
    /// The player died after `turns` ticks, at `time`
    GameOver { turns: u64, time: Time },
}

/// One play session: the world, the open dialog and the scene.
pub struct Game {
    world: World,
    dialog: Option<Dialog>,
    scene: SceneType,
    show_help: bool,
    recipes: RecipeBook,
}

impl Game {
    /// Generates a fresh world from `config`.
    pub fn new(config: &WorldConfig) -> WildwoodResult<Self> {
        let mut world = generate_world(config)?;
        world.notify("You wake up in the woods. Press ? for help.".to_string());
        Ok(Self::with_world(world))
    }

    /// Plays in an existing world.
    pub fn with_world(world: World) -> Self {
        Self {
            world,
            dialog: None,
            scene: SceneType::Playing,
            show_help: false,
            recipes: RecipeBook::standard(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scene(&self) -> &SceneType {
        &self.scene
    }

    /// Name of the active dialog state, if a dialog is open.
    pub fn dialog_state(&self) -> Option<&'static str> {
        self.dialog.as_ref().map(|dialog| dialog.state_name())
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    /// Handles one command. Returns true if exit is requested.
    pub fn handle_command(&mut self, command: Command) -> WildwoodResult<bool> {
        if let SceneType::GameOver { .. } = self.scene {
            return self.handle_game_over(command);
        }
        if command == Command::Quit {
            info!("player quit after {} ticks", self.world.ticks());
            return Ok(true);
        }

        if self.show_help {
            if matches!(command, Command::ToggleHelp | Command::Cancel | Command::Confirm) {
                self.show_help = false;
            }
        } else if let Some(dialog) = self.dialog.as_mut() {
            if !dialog.handle_input(command, &mut self.world)? {
                self.dialog = None;
            }
        } else {
            self.player_action(command)?;
        }

        if self.world.player_is_dead() {
            info!("player died after {} ticks", self.world.ticks());
            self.dialog = None;
            self.scene = SceneType::GameOver {
                turns: self.world.ticks(),
                time: self.world.time(),
            };
        }
        Ok(false)
    }

    /// Game over: confirm starts a new game, cancel exits.
    fn handle_game_over(&mut self, command: Command) -> WildwoodResult<bool> {
        match command {
            Command::Confirm => {
                self.start_new_game()?;
                Ok(false)
            }
            Command::Cancel | Command::Quit => Ok(true),
            _ => Ok(false),
        }
    }

    /// Starts a new game with the next seed.
    fn start_new_game(&mut self) -> WildwoodResult<()> {
        let mut config = self.world.config().clone();
        config.seed = config.seed.wrapping_add(1);
        info!("Starting new game with seed: {}", config.seed);
        *self = Self::new(&config)?;
        Ok(())
    }

    fn open(&mut self, state: Box<dyn UiState>) -> WildwoodResult<()> {
        self.dialog = Dialog::open(state, &mut self.world)?;
        Ok(())
    }

    /// The first creature at `position` that passes `filter`.
    fn creature_at(&self, position: Point, filter: impl Fn(&Entity) -> bool) -> Option<EntityId> {
        self.world
            .entities_at(position)
            .into_iter()
            .find(|id| {
                self.world
                    .get_entity(id)
                    .map(|entity| entity.is_creature() && filter(entity))
                    .unwrap_or(false)
            })
    }

    /// Something next to the player that can be interacted with.
    fn adjacent_interactable(&self, position: Point, player: &str) -> Option<EntityId> {
        self.world
            .entities_surrounding(position)
            .into_iter()
            .find(|id| {
                id != player
                    && self
                        .world
                        .get_entity(id)
                        .and_then(|entity| entity.behaviours.interactable())
                        .map(|interactable| interactable.enabled)
                        .unwrap_or(false)
            })
    }

    /// Something next to the player with items to take, other than a creature.
    fn adjacent_container(&self, position: Point, player: &str) -> Option<EntityId> {
        self.world
            .entities_surrounding(position)
            .into_iter()
            .find(|id| {
                id != player
                    && self
                        .world
                        .get_entity(id)
                        .map(|entity| !entity.is_creature() && !entity.inventory.is_empty())
                        .unwrap_or(false)
            })
    }

    /// Carries out a command outside of any dialog.
    fn player_action(&mut self, command: Command) -> WildwoodResult<()> {
        let player = self
            .world
            .player_id()
            .cloned()
            .ok_or(WildwoodError::NoPlayer)?;
        let position = self
            .world
            .player_position()
            .ok_or(WildwoodError::NoPlayer)?;

        match command {
            Command::Move(direction) => {
                let target = position + direction.to_delta();
                match self.creature_at(target, |entity| entity.is_hostile()) {
                    Some(enemy) => {
                        self.world.attack(&player, &enemy)?;
                    }
                    None => {
                        self.world.move_entity(&player, target)?;
                    }
                }
            }
            Command::Attack(direction) => {
                let target = position + direction.to_delta();
                match self.creature_at(target, |entity| entity.is_alive()) {
                    Some(victim) => {
                        self.world.attack(&player, &victim)?;
                    }
                    None => self.world.notify("You swing at nothing.".to_string()),
                }
            }
            Command::Wait => {}
            Command::Interact => match self.adjacent_interactable(position, &player) {
                Some(target) => self.open(Box::new(InteractionMenu::new(&player, &target)))?,
                None => self
                    .world
                    .notify("There is nothing here to use.".to_string()),
            },
            Command::Loot => {
                let ground = LootSource::Ground(position);
                let source = if !LootingMenu::available(&self.world, &player, &ground).is_empty() {
                    Some(ground)
                } else {
                    self.adjacent_container(position, &player)
                        .map(LootSource::Container)
                };
                match source {
                    Some(source) => self.open(Box::new(LootingMenu::new(&player, source)))?,
                    None => self
                        .world
                        .notify("There is nothing here to pick up.".to_string()),
                }
            }
            Command::Inspect => self.open(Box::new(InspectionMenu::new(position)))?,
            Command::OpenInventory => self.open(Box::new(InventoryMenu::new(&player)))?,
            Command::OpenCrafting => {
                let menu = CraftingMenu::new(&player, self.recipes.clone());
                self.open(Box::new(menu))?
            }
            Command::OpenEquipment => self.open(Box::new(EquipmentMenu::new(&player)))?,
            Command::ToggleHelp => self.show_help = true,
            _ => debug!("{:?} ignored outside of menus", command),
        }

        if command.costs_turn() {
            self.world.tick()?;
        }
        Ok(())
    }

    /// Draws the current scene.
    pub fn render(&self, canvas: &mut dyn Canvas, frame: u64) {
        let screen = self.world.config().screen_size();
        match &self.scene {
            SceneType::Playing => {
                let seed = self.world.config().seed;
                draw_world(canvas, &self.world, frame, &|at| floor_glyph(at, seed));
                draw_hud(canvas, &self.world);
                if let Some(dialog) = &self.dialog {
                    dialog.render(canvas, &self.world);
                }
                if self.show_help {
                    let lines: Vec<String> = HELP_LINES.iter().map(|line| line.to_string()).collect();
                    draw_message_box(canvas, screen, "Help", &lines);
                }
            }
            SceneType::GameOver { turns, time } => {
                let lines = vec![
                    format!("You survived {} turns.", turns),
                    format!("It was {} when you fell.", time),
                    String::new(),
                    "enter: new game   escape: quit".to_string(),
                ];
                draw_message_box(canvas, screen, "You died", &lines);
            }
        }
    }
}

/// The main scene manager that coordinates the frame loop
pub struct SceneManager {
    game: Game,
    display: MacroquadDisplay,
    input_handler: InputHandler,
    frame: u64,
}

impl SceneManager {
    pub fn new(game: Game, input_handler: InputHandler) -> Self {
        let config = game.world().config();
        let display = MacroquadDisplay::new(config.cell_size, config.screen_size());
        Self {
            game,
            display,
            input_handler,
            frame: 0,
        }
    }

    /// Pixel size of the window the game needs.
    pub fn window_size(config: &WorldConfig) -> (f32, f32) {
        let cells = canvas_size(config.screen_size());
        (cells.x as f32 * config.cell_size, cells.y as f32 * config.cell_size)
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> WildwoodResult<()> {
        loop {
            if let Some(command) = self.input_handler.get_command() {
                if self.game.handle_command(command)? {
                    break;
                }
            }
            self.display.begin_frame();
            self.game.render(&mut self.display, self.frame);
            self.frame = self.frame.wrapping_add(1);
            next_frame().await;
        }
        Ok(())
    }
}
