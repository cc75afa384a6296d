//=========================================================================
// States Demo
//=========================================================================
//
// Title → Menu → Game, with a Pause overlay and a key-binding Settings
// screen. The game screen owns a small scene graph: a background layer
// and an air layer with the player's aircraft and two escorts, moved by
// commands produced from the player's key bindings.
//
// Run with:
//   RUST_LOG=debug cargo run --example states
//
// Textures are read from `media/`; missing files are replaced with
// generated placeholders so the demo runs from a bare checkout.
//
//=========================================================================

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::path::Path;
use std::time::Duration;

use glam::{Affine2, Vec2};
use log::{info, warn};
use stagecraft::prelude::*;
use stagecraft::STATISTICS_FONT;

//=== Identifiers =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screen {
    Title,
    Menu,
    Game,
    Pause,
    Settings,
}

impl StateId for Screen {}

const TITLE_SCREEN: ResourceId = ResourceId::new("title_screen");
const DESERT: ResourceId = ResourceId::new("desert");
const EAGLE: ResourceId = ResourceId::new("eagle");
const RAPTOR: ResourceId = ResourceId::new("raptor");
const MAIN_FONT: ResourceId = STATISTICS_FONT;

const PLAYER_AIRCRAFT: Category = Category::from_bits_retain(1 << 1);
const ALLIED_AIRCRAFT: Category = Category::from_bits_retain(1 << 2);

//=== Shared Data =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PlayerAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

impl PlayerAction {
    const ALL: [PlayerAction; 4] = [
        PlayerAction::MoveLeft,
        PlayerAction::MoveRight,
        PlayerAction::MoveUp,
        PlayerAction::MoveDown,
    ];

    fn label(self) -> &'static str {
        match self {
            PlayerAction::MoveLeft => "Move Left",
            PlayerAction::MoveRight => "Move Right",
            PlayerAction::MoveUp => "Move Up",
            PlayerAction::MoveDown => "Move Down",
        }
    }

    fn direction(self) -> Vec2 {
        match self {
            PlayerAction::MoveLeft => Vec2::NEG_X,
            PlayerAction::MoveRight => Vec2::X,
            PlayerAction::MoveUp => Vec2::NEG_Y,
            PlayerAction::MoveDown => Vec2::Y,
        }
    }
}

/// Key bindings and held keys, shared between Game and Settings.
#[derive(Debug)]
struct Player {
    bindings: HashMap<KeyCode, PlayerAction>,
    held: HashSet<KeyCode>,
}

impl Default for Player {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyCode::ArrowLeft, PlayerAction::MoveLeft),
            (KeyCode::ArrowRight, PlayerAction::MoveRight),
            (KeyCode::ArrowUp, PlayerAction::MoveUp),
            (KeyCode::ArrowDown, PlayerAction::MoveDown),
        ]);

        Self {
            bindings,
            held: HashSet::new(),
        }
    }
}

impl Player {
    const SPEED: f32 = 200.0;

    fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, .. } => {
                self.held.insert(*key);
            }
            InputEvent::KeyUp { key, .. } => {
                self.held.remove(key);
            }
            InputEvent::FocusLost => self.held.clear(),
            _ => {}
        }
    }

    /// One movement command per held, bound key.
    fn handle_realtime_input(&self, commands: &mut CommandQueue) {
        for key in &self.held {
            if let Some(action) = self.bindings.get(key) {
                let velocity = action.direction() * Self::SPEED;
                commands.push(Command::for_content::<Aircraft, _>(
                    PLAYER_AIRCRAFT,
                    move |aircraft, _, _| aircraft.accelerate(velocity),
                ));
            }
        }
    }

    fn assign_key(&mut self, action: PlayerAction, key: KeyCode) {
        self.bindings.retain(|_, bound| *bound != action);
        self.bindings.insert(key, action);
        self.held.clear();
    }

    fn assigned_key(&self, action: PlayerAction) -> Option<KeyCode> {
        self.bindings
            .iter()
            .find_map(|(key, bound)| (*bound == action).then_some(*key))
    }
}

#[derive(Debug, Default)]
struct GameData {
    player: Player,
}

type DemoContext = Context<GameData>;
type DemoStateContext<'a> = StateContext<'a, Screen, GameData>;

//=== Drawing Helpers =====================================================

fn at(position: Vec2) -> RenderStates {
    RenderStates {
        transform: Affine2::from_translation(position),
    }
}

fn draw_text(target: &mut dyn RenderTarget, string: &str, position: Vec2, color: Color) {
    let text = TextNode::new(MAIN_FONT, string).with_color(color);
    target.draw(&text.primitive(), &at(position));
}

fn draw_background(target: &mut dyn RenderTarget) {
    SpriteNode::new(TITLE_SCREEN).draw_current(target, &RenderStates::default());
}

//=== Scene Content =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AircraftKind {
    Eagle,
    Raptor,
}

#[derive(Debug)]
struct Aircraft {
    kind: AircraftKind,
    velocity: Vec2,
}

impl Aircraft {
    fn new(kind: AircraftKind) -> Self {
        Self {
            kind,
            velocity: Vec2::ZERO,
        }
    }

    fn accelerate(&mut self, velocity: Vec2) {
        self.velocity += velocity;
    }
}

impl NodeContent for Aircraft {
    fn update_current(&mut self, transform: &mut Transformable, dt: Duration) {
        transform.move_by(self.velocity * dt.as_secs_f32());
    }

    fn draw_current(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        let texture = match self.kind {
            AircraftKind::Eagle => EAGLE,
            AircraftKind::Raptor => RAPTOR,
        };
        SpriteNode::new(texture).draw_current(target, states);
    }

    fn category(&self) -> Category {
        match self.kind {
            AircraftKind::Eagle => PLAYER_AIRCRAFT,
            AircraftKind::Raptor => ALLIED_AIRCRAFT,
        }
    }
}

//=== World ===============================================================

struct World {
    graph: SceneGraph,
    commands: CommandQueue,
    player: NodeId,
    bounds: Vec2,
}

impl World {
    const BORDER: f32 = 40.0;

    fn new(surface: SurfaceSize) -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        graph.spawn(root, SpriteNode::new(DESERT))?;
        let air = graph.spawn(root, EmptyNode)?;

        let mut eagle = SceneGraph::with_root(Aircraft::new(AircraftKind::Eagle));
        let eagle_root = eagle.root();
        if let Some(node) = eagle.node_mut(eagle_root) {
            node.transform_mut().set_origin(Vec2::new(24.0, 24.0));
        }

        for offset in [Vec2::new(-80.0, 50.0), Vec2::new(80.0, 50.0)] {
            let escort = eagle.spawn(eagle_root, Aircraft::new(AircraftKind::Raptor))?;
            if let Some(node) = eagle.node_mut(escort) {
                node.transform_mut().set_position(offset);
            }
        }

        let player = graph.attach_child(air, eagle)?;
        let spawn = Vec2::new(surface.center().x, surface.height as f32 - Self::BORDER * 2.0);
        if let Some(node) = graph.node_mut(player) {
            node.transform_mut().set_position(spawn);
        }

        info!(target: "app", "World built with {} nodes", graph.len());

        Ok(Self {
            graph,
            commands: CommandQueue::new(),
            player,
            bounds: Vec2::new(surface.width as f32, surface.height as f32),
        })
    }

    fn commands_mut(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    fn update(&mut self, dt: Duration) {
        if let Some((aircraft, _)) = self
            .graph
            .node_mut(self.player)
            .and_then(|node| node.downcast_mut::<Aircraft>())
        {
            aircraft.velocity = Vec2::ZERO;
        }

        self.graph.dispatch(&mut self.commands, dt);
        self.adapt_player_velocity();
        self.graph.update(dt);
        self.adapt_player_position();
    }

    /// Diagonal movement is as fast as straight movement.
    fn adapt_player_velocity(&mut self) {
        if let Some((aircraft, _)) = self
            .graph
            .node_mut(self.player)
            .and_then(|node| node.downcast_mut::<Aircraft>())
        {
            if aircraft.velocity.x != 0.0 && aircraft.velocity.y != 0.0 {
                aircraft.velocity /= std::f32::consts::SQRT_2;
            }
        }
    }

    fn adapt_player_position(&mut self) {
        let min = Vec2::splat(Self::BORDER);
        let max = self.bounds - Vec2::splat(Self::BORDER);

        if let Some(node) = self.graph.node_mut(self.player) {
            let position = node.transform().position().clamp(min, max);
            node.transform_mut().set_position(position);
        }
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        self.graph.draw(target, RenderStates::default());
    }
}

//=== Title ===============================================================

struct TitleState {
    show_text: bool,
    text_effect_time: Duration,
}

impl FromContext<GameData> for TitleState {
    fn from_context(_context: &mut DemoContext) -> Self {
        Self {
            show_text: true,
            text_effect_time: Duration::ZERO,
        }
    }
}

impl State<Screen, GameData> for TitleState {
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut DemoStateContext<'_>) -> bool {
        if event.pressed_key().is_some() {
            ctx.pop_state();
            ctx.push_state(Screen::Menu);
        }
        true
    }

    fn update(&mut self, dt: Duration, _ctx: &mut DemoStateContext<'_>) -> bool {
        self.text_effect_time += dt;

        if self.text_effect_time >= Duration::from_millis(500) {
            self.show_text = !self.show_text;
            self.text_effect_time = Duration::ZERO;
        }
        true
    }

    fn draw(&self, target: &mut dyn RenderTarget, context: &DemoContext) {
        draw_background(target);

        if self.show_text {
            let center = context.surface_size().center();
            draw_text(target, "Press any key to start", center, Color::WHITE);
        }
    }
}

//=== Menu ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Play,
    Settings,
    Exit,
}

struct MenuState {
    options: [MenuOption; 3],
    selected: usize,
}

impl FromContext<GameData> for MenuState {
    fn from_context(_context: &mut DemoContext) -> Self {
        Self {
            options: [MenuOption::Play, MenuOption::Settings, MenuOption::Exit],
            selected: 0,
        }
    }
}

impl State<Screen, GameData> for MenuState {
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut DemoStateContext<'_>) -> bool {
        match event.pressed_key() {
            Some(KeyCode::Enter) => match self.options[self.selected] {
                MenuOption::Play => {
                    ctx.pop_state();
                    ctx.push_state(Screen::Game);
                }
                MenuOption::Settings => ctx.push_state(Screen::Settings),
                // The stack empties and the application closes
                MenuOption::Exit => ctx.pop_state(),
            },
            Some(KeyCode::ArrowUp) => {
                self.selected = (self.selected + self.options.len() - 1) % self.options.len();
            }
            Some(KeyCode::ArrowDown) => {
                self.selected = (self.selected + 1) % self.options.len();
            }
            _ => {}
        }
        false
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut DemoStateContext<'_>) -> bool {
        true
    }

    fn draw(&self, target: &mut dyn RenderTarget, context: &DemoContext) {
        draw_background(target);

        let center = context.surface_size().center();
        for (index, option) in self.options.iter().enumerate() {
            let color = if index == self.selected {
                Color::RED
            } else {
                Color::WHITE
            };
            let position = center + Vec2::new(0.0, 30.0 * index as f32);
            draw_text(target, &format!("{:?}", option), position, color);
        }
    }
}

//=== Game ================================================================

struct GameState {
    world: Option<World>,
}

impl FromContext<GameData> for GameState {
    fn from_context(context: &mut DemoContext) -> Self {
        let world = match World::new(context.surface_size()) {
            Ok(world) => Some(world),
            Err(e) => {
                warn!(target: "app", "World construction failed: {}", e);
                None
            }
        };
        Self { world }
    }
}

impl State<Screen, GameData> for GameState {
    fn on_exit(&mut self, context: &mut DemoContext) {
        context.data.player.held.clear();
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut DemoStateContext<'_>) -> bool {
        ctx.data.player.handle_event(event);

        if event.pressed_key() == Some(KeyCode::Escape) {
            // Pause consumes every event, releases included.
            ctx.data.player.held.clear();
            ctx.push_state(Screen::Pause);
        }
        true
    }

    fn update(&mut self, dt: Duration, ctx: &mut DemoStateContext<'_>) -> bool {
        if let Some(world) = &mut self.world {
            ctx.data.player.handle_realtime_input(world.commands_mut());
            world.update(dt);
        }
        true
    }

    fn draw(&self, target: &mut dyn RenderTarget, _context: &DemoContext) {
        if let Some(world) = &self.world {
            world.draw(target);
        }
    }
}

//=== Pause ===============================================================

struct PauseState;

impl FromContext<GameData> for PauseState {
    fn from_context(_context: &mut DemoContext) -> Self {
        PauseState
    }
}

impl State<Screen, GameData> for PauseState {
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut DemoStateContext<'_>) -> bool {
        match event.pressed_key() {
            Some(KeyCode::Escape) => ctx.pop_state(),
            Some(KeyCode::Backspace) => {
                ctx.clear_states();
                ctx.push_state(Screen::Menu);
            }
            _ => {}
        }
        false
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut DemoStateContext<'_>) -> bool {
        false
    }

    fn draw(&self, target: &mut dyn RenderTarget, context: &DemoContext) {
        let surface = context.surface_size();
        let shade = RectNode {
            size: Vec2::new(surface.width as f32, surface.height as f32),
            color: Color::rgba(0, 0, 0, 150),
        };
        shade.draw_current(target, &RenderStates::default());

        let center = surface.center();
        draw_text(target, "Game Paused", center - Vec2::new(0.0, 60.0), Color::WHITE);
        draw_text(
            target,
            "(Press Backspace to return to the main menu)",
            center + Vec2::new(0.0, 20.0),
            Color::WHITE,
        );
    }
}

//=== Settings ============================================================

struct SettingsState {
    selected: usize,
    awaiting_key: bool,
}

impl FromContext<GameData> for SettingsState {
    fn from_context(_context: &mut DemoContext) -> Self {
        Self {
            selected: 0,
            awaiting_key: false,
        }
    }
}

impl State<Screen, GameData> for SettingsState {
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut DemoStateContext<'_>) -> bool {
        let Some(key) = event.pressed_key() else {
            return false;
        };

        if self.awaiting_key {
            let action = PlayerAction::ALL[self.selected];
            info!(target: "app", "Binding {:?} to {:?}", key, action);
            ctx.data.player.assign_key(action, key);
            self.awaiting_key = false;
            return false;
        }

        match key {
            KeyCode::Escape => ctx.pop_state(),
            KeyCode::Enter => self.awaiting_key = true,
            KeyCode::ArrowUp => {
                self.selected = (self.selected + PlayerAction::ALL.len() - 1) % PlayerAction::ALL.len();
            }
            KeyCode::ArrowDown => {
                self.selected = (self.selected + 1) % PlayerAction::ALL.len();
            }
            _ => {}
        }
        false
    }

    fn update(&mut self, _dt: Duration, _ctx: &mut DemoStateContext<'_>) -> bool {
        true
    }

    fn draw(&self, target: &mut dyn RenderTarget, context: &DemoContext) {
        draw_background(target);

        for (index, action) in PlayerAction::ALL.iter().enumerate() {
            let selected = index == self.selected;
            let label = match (selected && self.awaiting_key, context.data.player.assigned_key(*action)) {
                (true, _) => format!("{}: press a key", action.label()),
                (false, Some(key)) => format!("{}: {:?}", action.label(), key),
                (false, None) => format!("{}: unbound", action.label()),
            };
            let color = if selected { Color::RED } else { Color::WHITE };
            draw_text(target, &label, Vec2::new(80.0, 50.0 + 50.0 * index as f32), color);
        }
    }
}

//=== Resources ===========================================================

fn placeholder(width: u32, height: u32, rgba: [u8; 4]) -> Option<Texture> {
    let pixels = rgba.repeat((width * height) as usize);
    Texture::from_rgba(width, height, pixels)
}

fn load_resources(context: &mut DemoContext) {
    let media = Path::new("media");
    let textures = [
        (TITLE_SCREEN, "title_screen.png", [40, 40, 60, 255]),
        (DESERT, "desert.png", [200, 170, 110, 255]),
        (EAGLE, "eagle.png", [30, 90, 200, 255]),
        (RAPTOR, "raptor.png", [160, 40, 40, 255]),
    ];

    for (id, file, fallback) in textures {
        if let Err(e) = context.textures.load(id, media.join(file)) {
            warn!(target: "app", "{}; using a placeholder", e);
            if let Some(texture) = placeholder(48, 48, fallback) {
                context.textures.insert(id, texture);
            }
        }
    }

    if let Err(e) = context.fonts.load(MAIN_FONT, media.join("sansation.ttf")) {
        warn!(target: "app", "{}; text is drawn without glyph data", e);
        context.fonts.insert(MAIN_FONT, Font::from_bytes("placeholder", Vec::new()));
    }
}

//=== Entry Point =========================================================

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config_path = Path::new("demos/states.toml");
    let config = if config_path.exists() {
        AppConfig::load(config_path)?
    } else {
        AppConfig::default()
    };

    ApplicationBuilder::<Screen, GameData>::from_config(&config)
        .build(GameData::default())
        .init(|stack| {
            load_resources(stack.context_mut());

            stack.register_state::<TitleState>(Screen::Title);
            stack.register_state::<MenuState>(Screen::Menu);
            stack.register_state::<GameState>(Screen::Game);
            stack.register_state::<PauseState>(Screen::Pause);
            stack.register_state::<SettingsState>(Screen::Settings);

            stack.push_state(Screen::Title);
        })
        .run()?;

    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn game_stack() -> StateStack<Screen, GameData> {
        let context = Context::new(SurfaceSize::new(640, 480), GameData::default());
        let mut stack = StateStack::new(context);
        stack.register_state::<GameState>(Screen::Game);
        stack.register_state::<PauseState>(Screen::Pause);
        stack.push_state(Screen::Game);
        stack.apply_pending_changes().unwrap();
        stack
    }

    fn send(stack: &mut StateStack<Screen, GameData>, event: InputEvent) {
        stack.handle_event(&event).unwrap();
    }

    fn held(stack: &StateStack<Screen, GameData>) -> &HashSet<KeyCode> {
        &stack.context().data.player.held
    }

    #[test]
    fn key_released_during_pause_is_not_held_after_resume() {
        let mut stack = game_stack();

        send(&mut stack, InputEvent::key_down(KeyCode::ArrowRight));
        assert!(held(&stack).contains(&KeyCode::ArrowRight));

        send(&mut stack, InputEvent::key_down(KeyCode::Escape));
        assert_eq!(stack.state_ids(), vec![Screen::Game, Screen::Pause]);

        send(&mut stack, InputEvent::key_up(KeyCode::ArrowRight));
        send(&mut stack, InputEvent::key_down(KeyCode::Escape));
        assert_eq!(stack.state_ids(), vec![Screen::Game]);

        assert!(held(&stack).is_empty(), "held after resume: {:?}", held(&stack));
    }

    #[test]
    fn held_bound_key_moves_player() {
        let mut stack = game_stack();
        send(&mut stack, InputEvent::key_down(KeyCode::ArrowLeft));

        let mut commands = CommandQueue::new();
        stack.context().data.player.handle_realtime_input(&mut commands);
        assert_eq!(commands.len(), 1);

        send(&mut stack, InputEvent::key_up(KeyCode::ArrowLeft));
        let mut commands = CommandQueue::new();
        stack.context().data.player.handle_realtime_input(&mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn pause_blocks_updates_below() {
        let mut stack = game_stack();
        send(&mut stack, InputEvent::key_down(KeyCode::Escape));

        send(&mut stack, InputEvent::key_down(KeyCode::ArrowUp));
        assert!(held(&stack).is_empty());

        stack.update(Duration::from_millis(16)).unwrap();
        assert_eq!(stack.top(), Some(Screen::Pause));
    }
}
