//! Game session
//!
//! A running game: the engine plus the active input handler. Input events go
//! in, a `LoopControl` comes out.

use ratatui::buffer::Buffer;

use super::engine::Engine;
use super::turn::TurnResult;
use crate::ecs::Position;
use crate::render::RenderContext;
use crate::ui::handlers::{Handler, Transition};
use crate::ui::input::InputEvent;

const FAULT_NOTICE: &str = "Something went wrong. See the message log.";

/// Whether the main loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit { save: bool },
}

#[derive(Debug)]
pub struct Session {
    pub(crate) engine: Engine,
    pub(crate) handler: Handler,
    mouse: Option<Position>,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Self::with_handler(engine, Handler::MainGame)
    }

    pub fn with_handler(engine: Engine, handler: Handler) -> Self {
        Self { engine, handler, mouse: None }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Map tile under the mouse pointer
    pub fn mouse(&self) -> Option<Position> {
        self.mouse
    }

    /// Feed one input event through the active handler
    pub fn handle_event(&mut self, event: &InputEvent) -> LoopControl {
        if let InputEvent::MouseMotion(tile) = event {
            let map = self.engine.map();
            self.mouse = map.in_bounds(tile.x, tile.y).then_some(*tile);
        }
        let transition = self.handler.handle_event(&self.engine, event);
        self.apply(transition)
    }

    fn apply(&mut self, transition: Transition) -> LoopControl {
        match transition {
            Transition::Stay => LoopControl::Continue,
            Transition::Switch(handler) => {
                self.switch(handler);
                LoopControl::Continue
            }
            Transition::Notify(message, then) => {
                self.engine.add_message(message.text, message.fg);
                self.apply(*then)
            }
            Transition::Exit => LoopControl::Quit { save: false },
            Transition::Perform(action) => match self.engine.handle_player_action(action) {
                TurnResult::Quit => LoopControl::Quit { save: true },
                TurnResult::PlayerDied => {
                    self.switch(Handler::GameOver);
                    LoopControl::Continue
                }
                TurnResult::Advanced => {
                    self.switch(Handler::MainGame);
                    LoopControl::Continue
                }
                // Refused actions leave the player where they were, e.g. still targeting
                TurnResult::NotConsumed => LoopControl::Continue,
                TurnResult::Faulted => {
                    let parent = Box::new(self.handler.clone());
                    self.switch(Handler::Popup { parent, text: FAULT_NOTICE.to_string() });
                    LoopControl::Continue
                }
            },
        }
    }

    fn switch(&mut self, handler: Handler) {
        if handler != self.handler {
            log::debug!("Handler {} -> {}", self.handler.name(), handler.name());
        }
        self.handler = handler;
    }

    pub fn render(&self, buf: &mut Buffer) {
        let ctx = RenderContext { mouse: self.mouse };
        self.handler.render(&self.engine, buf, &ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Fighter;
    use crate::game::engine::testing::*;
    use crate::ui::handlers::{SelectTile, TargetMode};
    use crossterm::event::KeyCode;

    fn press(session: &mut Session, c: char) -> LoopControl {
        session.handle_event(&InputEvent::key(KeyCode::Char(c)))
    }

    #[test]
    fn test_refused_use_keeps_inventory_open() {
        let mut engine = arena(10, 10);
        give_item(&mut engine, "healing_potion");
        let mut session = Session::new(engine);

        assert_eq!(press(&mut session, 'i'), LoopControl::Continue);
        assert_eq!(press(&mut session, 'a'), LoopControl::Continue);
        assert!(matches!(session.handler, Handler::Inventory(_)));
        assert_eq!(last_message(&session.engine), "Your health is already full.");
        assert_eq!(session.engine.turn(), 0);
    }

    #[test]
    fn test_successful_use_returns_to_main_game() {
        let mut engine = arena(10, 10);
        let player = engine.player();
        give_item(&mut engine, "healing_potion");
        engine.map.world.get::<&mut Fighter>(player).unwrap().set_hp(20);
        let mut session = Session::new(engine);

        press(&mut session, 'i');
        press(&mut session, 'a');
        assert_eq!(session.handler, Handler::MainGame);
        assert_eq!(hp(&session.engine, player), 24);
        assert_eq!(session.engine.turn(), 1);
    }

    #[test]
    fn test_targeting_hint_is_logged() {
        let mut engine = arena(10, 10);
        give_item(&mut engine, "lightning_scroll");
        let mut session = Session::new(engine);

        press(&mut session, 'i');
        press(&mut session, 'a');
        assert!(matches!(session.handler, Handler::SelectTile(_)));
        assert_eq!(last_message(&session.engine), "Select a target location.");
    }

    #[test]
    fn test_death_then_quit_without_saving() {
        let mut engine = arena(10, 10);
        let player = engine.player();
        let start = engine.player_position().unwrap();
        spawn_monster(&mut engine, "ogre", start.offset(1, 0));
        engine.map.world.get::<&mut Fighter>(player).unwrap().set_hp(1);
        let mut session = Session::new(engine);

        assert_eq!(press(&mut session, '.'), LoopControl::Continue);
        assert_eq!(session.handler, Handler::GameOver);
        assert_eq!(press(&mut session, 'k'), LoopControl::Continue);
        assert_eq!(
            session.handle_event(&InputEvent::key(KeyCode::Esc)),
            LoopControl::Quit { save: false }
        );
    }

    #[test]
    fn test_escape_quits_with_save() {
        let mut session = Session::new(arena(10, 10));
        assert_eq!(
            session.handle_event(&InputEvent::key(KeyCode::Esc)),
            LoopControl::Quit { save: true }
        );
        assert_eq!(session.handle_event(&InputEvent::Quit), LoopControl::Quit { save: true });
    }

    #[test]
    fn test_fault_opens_popup_over_targeting() {
        let mut engine = arena(10, 10);
        let start = engine.player_position().unwrap();
        let scroll = give_item(&mut engine, "lightning_scroll");
        let goblin = spawn_monster(&mut engine, "goblin", start.offset(1, 0));
        engine.map.world.remove_one::<crate::ecs::Renderable>(goblin).unwrap();
        let targeting = Handler::SelectTile(SelectTile {
            cursor: start.offset(1, 0),
            mode: TargetMode::Single { item: scroll },
        });
        let mut session = Session::with_handler(engine, targeting.clone());

        assert_eq!(session.handle_event(&InputEvent::key(KeyCode::Enter)), LoopControl::Continue);
        assert_eq!(
            session.handler,
            Handler::Popup { parent: Box::new(targeting.clone()), text: FAULT_NOTICE.to_string() }
        );
        assert_eq!(session.engine.turn(), 0);

        press(&mut session, 'x');
        assert_eq!(session.handler, targeting);
    }

    #[test]
    fn test_mouse_motion_tracks_tile() {
        let mut session = Session::new(arena(10, 10));
        session.handle_event(&InputEvent::MouseMotion(Position::new(3, 4)));
        assert_eq!(session.mouse(), Some(Position::new(3, 4)));
        session.handle_event(&InputEvent::MouseMotion(Position::new(30, 4)));
        assert_eq!(session.mouse(), None);
    }
}
