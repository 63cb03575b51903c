//! Input handlers
//!
//! The active screen of a running game. Each handler turns one input event
//! into a `Transition` and knows how to draw itself over the map.

use crossterm::event::{KeyCode, KeyEvent, MouseButton};
use hecs::Entity;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use serde::{Deserialize, Serialize};

use super::input::{direction_for, is_confirm, is_modifier_only, is_wait, step_multiplier, InputEvent};
use crate::combat::{effective_defense, effective_power};
use crate::ecs::{Level, Name, Position};
use crate::game::actions::{Action, ActionKind};
use crate::game::engine::Engine;
use crate::game::message_log::{render_lines, Message};
use crate::items::{Consumable, Equipment, Equippable, Inventory, Targeting};
use crate::render::{self, build_draw_request, put_char, to_color, RenderContext};

/// Rows scrolled by PageUp/PageDown in the history viewer
const HISTORY_PAGE: i64 = 10;

// ============================================================================
// Handler states
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryMode {
    Use,
    Drop,
}

/// Scroll position in the full message log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryViewer {
    pub log_length: usize,
    pub cursor: usize,
}

impl HistoryViewer {
    /// Start on the newest message
    pub fn new(log_length: usize) -> Self {
        Self { log_length, cursor: log_length.saturating_sub(1) }
    }

    /// Move the cursor. Stepping past either end wraps to the other; a step
    /// that starts inside the log clamps instead.
    pub fn scrolled(&self, adjust: i64) -> Self {
        let last = self.log_length.saturating_sub(1);
        let cursor = if adjust < 0 && self.cursor == 0 {
            last
        } else if adjust > 0 && self.cursor == last {
            0
        } else {
            (self.cursor as i64 + adjust).clamp(0, last as i64) as usize
        };
        Self { cursor, ..*self }
    }
}

/// What confirming a tile does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    Look,
    Single { item: Entity },
    Area { item: Entity, radius: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectTile {
    pub cursor: Position,
    pub mode: TargetMode,
}

impl SelectTile {
    /// Cursor starts on the player
    pub fn new(engine: &Engine, mode: TargetMode) -> Self {
        let cursor = engine.player_position().unwrap_or_default();
        Self { cursor, mode }
    }
}

/// The active screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    MainGame,
    GameOver,
    History(HistoryViewer),
    Inventory(InventoryMode),
    SelectTile(SelectTile),
    /// Text over a dimmed view of `parent`
    Popup { parent: Box<Handler>, text: String },
    Character,
}

/// What the session should do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay,
    /// Hand the action to the engine
    Perform(Action),
    Switch(Handler),
    /// Log the message, then apply the inner transition
    Notify(Message, Box<Transition>),
    /// End the session without saving
    Exit,
}

impl Transition {
    fn notify(text: &str, fg: crate::ecs::Rgb, then: Transition) -> Self {
        Transition::Notify(Message::new(text, fg), Box::new(then))
    }
}

/// The part of a handler worth keeping in a save file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandlerContext {
    #[default]
    MainGame,
    GameOver,
    History { cursor: usize },
    Look { cursor: Position },
    Character,
}

// ============================================================================
// Event handling
// ============================================================================

impl Handler {
    pub fn handle_event(&self, engine: &Engine, event: &InputEvent) -> Transition {
        match self {
            Handler::MainGame => main_game_event(engine, event),
            Handler::GameOver => match event {
                InputEvent::Quit => Transition::Exit,
                InputEvent::Key(key) if key.code == KeyCode::Esc => Transition::Exit,
                _ => Transition::Stay,
            },
            Handler::History(viewer) => history_event(engine, viewer, event),
            Handler::Inventory(mode) => inventory_event(engine, *mode, event),
            Handler::SelectTile(select) => select_tile_event(engine, select, event),
            Handler::Popup { parent, .. } => match event {
                InputEvent::Quit => quit(engine),
                InputEvent::Key(key) if !is_modifier_only(key) => Transition::Switch((**parent).clone()),
                _ => Transition::Stay,
            },
            Handler::Character => ask_user_event(engine, event),
        }
    }

    pub fn context(&self) -> HandlerContext {
        match self {
            Handler::GameOver => HandlerContext::GameOver,
            Handler::History(viewer) => HandlerContext::History { cursor: viewer.cursor },
            Handler::SelectTile(SelectTile { cursor, mode: TargetMode::Look }) => {
                HandlerContext::Look { cursor: *cursor }
            }
            Handler::Popup { parent, .. } => parent.context(),
            Handler::Character => HandlerContext::Character,
            Handler::MainGame | Handler::Inventory(_) | Handler::SelectTile(_) => {
                HandlerContext::MainGame
            }
        }
    }

    /// Rebuild a handler from a saved context, clamping cursors to the engine
    pub fn from_context(context: HandlerContext, engine: &Engine) -> Self {
        match context {
            HandlerContext::MainGame => Handler::MainGame,
            HandlerContext::GameOver => Handler::GameOver,
            HandlerContext::History { cursor } => {
                let log_length = engine.log().len();
                let cursor = cursor.min(log_length.saturating_sub(1));
                Handler::History(HistoryViewer { log_length, cursor })
            }
            HandlerContext::Look { cursor } => {
                let map = engine.map();
                let cursor = Position::new(
                    cursor.x.clamp(0, (map.width - 1).max(0)),
                    cursor.y.clamp(0, (map.height - 1).max(0)),
                );
                Handler::SelectTile(SelectTile { cursor, mode: TargetMode::Look })
            }
            HandlerContext::Character => Handler::Character,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Handler::MainGame => "main game",
            Handler::GameOver => "game over",
            Handler::History(_) => "history",
            Handler::Inventory(_) => "inventory",
            Handler::SelectTile(_) => "select tile",
            Handler::Popup { .. } => "popup",
            Handler::Character => "character",
        }
    }
}

fn quit(engine: &Engine) -> Transition {
    Transition::Perform(Action::new(engine.player(), ActionKind::Quit))
}

fn main_game_event(engine: &Engine, event: &InputEvent) -> Transition {
    let key = match event {
        InputEvent::Key(key) => key,
        InputEvent::Quit => return quit(engine),
        _ => return Transition::Stay,
    };
    let player = engine.player();

    if let Some((dx, dy)) = direction_for(key) {
        return Transition::Perform(Action::bump(player, dx, dy));
    }
    if is_wait(key) {
        return Transition::Perform(Action::new(player, ActionKind::Wait));
    }

    match key.code {
        KeyCode::Esc => quit(engine),
        KeyCode::Char('>') => Transition::Perform(Action::new(player, ActionKind::DescendStairs)),
        KeyCode::Char('g') => Transition::Perform(Action::new(player, ActionKind::PickUp)),
        KeyCode::Char('v') => Transition::Switch(Handler::History(HistoryViewer::new(engine.log().len()))),
        KeyCode::Char('i') => Transition::Switch(Handler::Inventory(InventoryMode::Use)),
        KeyCode::Char('d') => Transition::Switch(Handler::Inventory(InventoryMode::Drop)),
        KeyCode::Char('c') => Transition::Switch(Handler::Character),
        KeyCode::Char('/') => {
            Transition::Switch(Handler::SelectTile(SelectTile::new(engine, TargetMode::Look)))
        }
        _ => Transition::Stay,
    }
}

/// Dialogs close on any real key press or click
fn ask_user_event(engine: &Engine, event: &InputEvent) -> Transition {
    match event {
        InputEvent::Key(key) if is_modifier_only(key) => Transition::Stay,
        InputEvent::Key(_) | InputEvent::MouseDown { .. } => Transition::Switch(Handler::MainGame),
        InputEvent::Quit => quit(engine),
        InputEvent::MouseMotion(_) => Transition::Stay,
    }
}

fn history_event(engine: &Engine, viewer: &HistoryViewer, event: &InputEvent) -> Transition {
    let key = match event {
        InputEvent::Key(key) => key,
        InputEvent::Quit => return quit(engine),
        InputEvent::MouseDown { .. } => return Transition::Switch(Handler::MainGame),
        InputEvent::MouseMotion(_) => return Transition::Stay,
    };
    let next = match key.code {
        KeyCode::Up => viewer.scrolled(-1),
        KeyCode::Down => viewer.scrolled(1),
        KeyCode::PageUp => viewer.scrolled(-HISTORY_PAGE),
        KeyCode::PageDown => viewer.scrolled(HISTORY_PAGE),
        KeyCode::Home => HistoryViewer { cursor: 0, ..*viewer },
        KeyCode::End => HistoryViewer::new(viewer.log_length),
        _ if is_modifier_only(key) => return Transition::Stay,
        _ => return Transition::Switch(Handler::MainGame),
    };
    Transition::Switch(Handler::History(next))
}

/// One letter per entry, `a` through `z`
const MAX_ENTRIES: usize = 26;

/// Items in display order: whatever is equipped, then the pack
fn inventory_entries(engine: &Engine) -> Vec<(Entity, bool)> {
    let world = &engine.map().world;
    let player = engine.player();
    let mut entries: Vec<(Entity, bool)> = Vec::new();
    if let Ok(equipment) = world.get::<&Equipment>(player) {
        entries.extend(equipment.items().map(|item| (item, true)));
    }
    if let Ok(inventory) = world.get::<&Inventory>(player) {
        entries.extend(inventory.items().iter().map(|&item| (item, false)));
    }
    entries.truncate(MAX_ENTRIES);
    entries
}

fn inventory_event(engine: &Engine, mode: InventoryMode, event: &InputEvent) -> Transition {
    let letter = match event {
        InputEvent::Key(KeyEvent { code: KeyCode::Char(c), .. }) if c.is_ascii_alphabetic() => {
            c.to_ascii_lowercase()
        }
        _ => return ask_user_event(engine, event),
    };

    let index = (letter as u8 - b'a') as usize;
    let entries = inventory_entries(engine);
    let Some(&(item, _)) = entries.get(index) else {
        return Transition::notify("Invalid entry.", engine.palette().invalid, Transition::Stay);
    };

    let player = engine.player();
    match mode {
        InventoryMode::Drop => Transition::Perform(Action::new(player, ActionKind::Drop { item })),
        InventoryMode::Use => item_selected(engine, item),
    }
}

fn item_selected(engine: &Engine, item: Entity) -> Transition {
    let world = &engine.map().world;
    let player = engine.player();

    if world.get::<&Equippable>(item).is_ok() {
        return Transition::Perform(Action::new(player, ActionKind::EquipToggle { item }));
    }

    let targeting = world.get::<&Consumable>(item).map(|c| c.targeting()).unwrap_or(Targeting::None);
    let mode = match targeting {
        Targeting::None => {
            return Transition::Perform(Action::new(player, ActionKind::ItemUse { item, target: None }))
        }
        Targeting::Single => TargetMode::Single { item },
        Targeting::Area { radius } => TargetMode::Area { item, radius },
    };
    Transition::notify(
        "Select a target location.",
        engine.palette().needs_target,
        Transition::Switch(Handler::SelectTile(SelectTile::new(engine, mode))),
    )
}

fn select_tile_event(engine: &Engine, select: &SelectTile, event: &InputEvent) -> Transition {
    let map = engine.map();
    match event {
        InputEvent::Key(key) => {
            if let Some((dx, dy)) = direction_for(key) {
                let step = step_multiplier(key.modifiers);
                let cursor = Position::new(
                    (select.cursor.x + dx * step).clamp(0, map.width - 1),
                    (select.cursor.y + dy * step).clamp(0, map.height - 1),
                );
                return Transition::Switch(Handler::SelectTile(SelectTile { cursor, ..*select }));
            }
            if is_confirm(key) {
                return tile_selected(engine, select, select.cursor);
            }
            ask_user_event(engine, event)
        }
        InputEvent::MouseMotion(tile) if map.in_bounds(tile.x, tile.y) => {
            Transition::Switch(Handler::SelectTile(SelectTile { cursor: *tile, ..*select }))
        }
        InputEvent::MouseDown { button: MouseButton::Left, tile } if map.in_bounds(tile.x, tile.y) => {
            tile_selected(engine, select, *tile)
        }
        _ => ask_user_event(engine, event),
    }
}

fn tile_selected(engine: &Engine, select: &SelectTile, tile: Position) -> Transition {
    let item = match select.mode {
        TargetMode::Look => return Transition::Switch(Handler::MainGame),
        TargetMode::Single { item } | TargetMode::Area { item, .. } => item,
    };
    Transition::Perform(Action::new(
        engine.player(),
        ActionKind::ItemUse { item, target: Some(tile) },
    ))
}

// ============================================================================
// Rendering
// ============================================================================

impl Handler {
    /// Draw the map view and this handler's overlay
    pub fn render(&self, engine: &Engine, buf: &mut Buffer, ctx: &RenderContext) {
        if let Handler::Popup { parent, text } = self {
            parent.render(engine, buf, ctx);
            render::dim(buf);
            render_popup_text(text, engine, buf);
            return;
        }

        let mouse = match self {
            Handler::SelectTile(select) => Some(select.cursor),
            _ => ctx.mouse,
        };
        render::paint(&build_draw_request(engine, mouse), engine.palette(), buf);

        match self {
            Handler::History(viewer) => render_history(viewer, engine, buf),
            Handler::Inventory(mode) => render_inventory(*mode, engine, buf),
            Handler::SelectTile(select) => render_select(select, engine, buf),
            Handler::Character => render_character(engine, buf),
            Handler::MainGame | Handler::GameOver | Handler::Popup { .. } => {}
        }
    }
}

/// Dialogs sit on the side of the screen away from the player
fn dialog_x(engine: &Engine) -> u16 {
    match engine.player_position() {
        Some(pos) if pos.x > 30 => 0,
        _ => 40,
    }
}

fn draw_dialog(buf: &mut Buffer, area: Rect, title: &str, lines: Vec<Line<'_>>, engine: &Engine) {
    let area = area.intersection(buf.area);
    let palette = engine.palette();
    let style = Style::default().fg(to_color(palette.white)).bg(Color::Black);
    Clear.render(area, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .style(style);
    Paragraph::new(lines).block(block).style(style).render(area, buf);
}

fn render_inventory(mode: InventoryMode, engine: &Engine, buf: &mut Buffer) {
    let title = match mode {
        InventoryMode::Use => "Select an item to use",
        InventoryMode::Drop => "Select an item to drop",
    };
    let world = &engine.map().world;

    let mut lines: Vec<String> = inventory_entries(engine)
        .into_iter()
        .enumerate()
        .map(|(i, (item, equipped))| {
            let letter = (b'a' + i as u8) as char;
            let name = world.get::<&Name>(item).map(|n| n.0.clone()).unwrap_or_default();
            if equipped {
                format!("({}) {} (E)", letter, name)
            } else {
                format!("({}) {}", letter, name)
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push("(Empty)".to_string());
    }

    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = (title.len() + 4).max(widest + 2) as u16;
    let height = lines.len() as u16 + 2;
    let area = Rect::new(dialog_x(engine), 0, width, height);
    draw_dialog(buf, area, title, lines.into_iter().map(Line::from).collect(), engine);
}

fn render_character(engine: &Engine, buf: &mut Buffer) {
    let title = "Character Information";
    let world = &engine.map().world;
    let player = engine.player();
    let level = world.get::<&Level>(player).map(|l| *l).ok();

    let lines = vec![
        Line::from(format!("Level: {}", level.map_or(1, |l| l.current_level))),
        Line::from(format!("XP: {}", level.map_or(0, |l| l.current_xp))),
        Line::from(format!(
            "XP for next Level: {}",
            level.map_or(0, |l| l.experience_to_next_level())
        )),
        Line::from(format!("Attack: {}", effective_power(world, player).unwrap_or(0))),
        Line::from(format!("Defense: {}", effective_defense(world, player).unwrap_or(0))),
    ];
    let area = Rect::new(dialog_x(engine), 0, title.len() as u16 + 6, 7);
    draw_dialog(buf, area, title, lines, engine);
}

fn render_history(viewer: &HistoryViewer, engine: &Engine, buf: &mut Buffer) {
    let area = Rect::new(3, 3, buf.area.width.saturating_sub(6), buf.area.height.saturating_sub(6));
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let messages = engine.log().messages();
    let shown = if messages.is_empty() { &messages[..0] } else { &messages[..=viewer.cursor.min(messages.len() - 1)] };
    let rows = render_lines(shown, inner_width, inner_height);

    let mut lines: Vec<Line<'_>> = vec![Line::from(""); inner_height.saturating_sub(rows.len())];
    lines.extend(
        rows.into_iter()
            .map(|(text, fg)| Line::styled(text, Style::default().fg(to_color(fg)))),
    );
    draw_dialog(buf, area, "Message history", lines, engine);
}

fn render_select(select: &SelectTile, engine: &Engine, buf: &mut Buffer) {
    let palette = engine.palette();
    if let TargetMode::Area { radius, .. } = select.mode {
        // Clipped at the screen edges
        let left = (select.cursor.x - radius).max(0);
        let top = (select.cursor.y - radius).max(0);
        let right = select.cursor.x + radius + 1;
        let bottom = select.cursor.y + radius + 1;
        if right > left && bottom > top {
            let area = Rect::new(left as u16, top as u16, (right - left) as u16, (bottom - top) as u16)
                .intersection(buf.area);
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .render(area, buf);
        }
    }

    let cursor = select.cursor;
    let glyph = buf
        .cell((cursor.x as u16, cursor.y as u16))
        .and_then(|c| c.symbol().chars().next())
        .unwrap_or(' ');
    put_char(buf, cursor.x, cursor.y, glyph, Some(palette.black), Some(palette.white));
}

fn render_popup_text(text: &str, engine: &Engine, buf: &mut Buffer) {
    let area = buf.area;
    let width = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height / 2;
    render::put_str(buf, x, y, text, engine.palette().white);
}
