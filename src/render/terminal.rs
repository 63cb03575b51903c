//! Terminal painter
//!
//! Writes a `DrawRequest` into a ratatui `Buffer`, cell by cell.

use ratatui::{buffer::Buffer, style::Color};

use super::frame::{
    DrawRequest, BAR_ORIGIN, BAR_WIDTH, DEPTH_ORIGIN, LOG_HEIGHT, LOG_ORIGIN, NAMES_ORIGIN,
};
use crate::data::Palette;
use crate::ecs::Rgb;

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Set one cell, ignoring positions outside the buffer
pub fn put_char(buf: &mut Buffer, x: i32, y: i32, ch: char, fg: Option<Rgb>, bg: Option<Rgb>) {
    if x < 0 || y < 0 {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_char(ch);
        if let Some(fg) = fg {
            cell.set_fg(to_color(fg));
        }
        if let Some(bg) = bg {
            cell.set_bg(to_color(bg));
        }
    }
}

/// Print text left to right, clipped at the buffer edge
pub fn put_str(buf: &mut Buffer, x: u16, y: u16, text: &str, fg: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        put_char(buf, x as i32 + i as i32, y as i32, ch, Some(fg), None);
    }
}

/// Paint the main game view
pub fn paint(request: &DrawRequest, palette: &Palette, buf: &mut Buffer) {
    for y in 0..request.map_height {
        for x in 0..request.map_width {
            let graphic = request.tiles[(y * request.map_width + x) as usize];
            put_char(buf, x, y, graphic.glyph, Some(graphic.fg), Some(graphic.bg));
        }
    }

    for entity in &request.entities {
        put_char(buf, entity.position.x, entity.position.y, entity.glyph, Some(entity.fg), None);
    }

    paint_health_bar(request, palette, buf);

    // Bottom-anchored: a short log still ends on the last row
    let top = LOG_ORIGIN.1 + LOG_HEIGHT.saturating_sub(request.messages.len() as u16);
    for (row, (line, fg)) in request.messages.iter().enumerate() {
        put_str(buf, LOG_ORIGIN.0, top + row as u16, line, *fg);
    }

    put_str(
        buf,
        DEPTH_ORIGIN.0,
        DEPTH_ORIGIN.1,
        &format!("Dungeon level: {}", request.depth),
        palette.white,
    );
    put_str(buf, NAMES_ORIGIN.0, NAMES_ORIGIN.1, &request.names_at_mouse, palette.white);
}

fn paint_health_bar(request: &DrawRequest, palette: &Palette, buf: &mut Buffer) {
    let (x0, y0) = BAR_ORIGIN;
    let filled = request.health.filled();
    for i in 0..BAR_WIDTH {
        let bg = if i < filled { palette.bar_filled } else { palette.bar_empty };
        put_char(buf, (x0 + i) as i32, y0 as i32, ' ', None, Some(bg));
    }
    let label = format!("HP: {}/{}", request.health.current, request.health.maximum);
    put_str(buf, x0 + 1, y0, &label, palette.bar_text);
}

/// Darken every cell, used behind popups
pub fn dim(buf: &mut Buffer) {
    let area = buf.area;
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.fg = dim_color(cell.fg);
                cell.bg = dim_color(cell.bg);
            }
        }
    }
}

fn dim_color(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(r / 8, g / 8, b / 8),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::testing::*;
    use crate::render::build_draw_request;
    use ratatui::layout::Rect;

    #[test]
    fn test_paint_draws_player_and_status() {
        let mut engine = arena(12, 12);
        let palette = engine.palette().clone();
        engine.add_message("ok", palette.white);
        let start = engine.player_position().unwrap();
        let request = build_draw_request(&engine, None);

        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 50));
        paint(&request, &palette, &mut buf);

        assert_eq!(buf[(start.x as u16, start.y as u16)].symbol(), "@");
        assert_eq!(buf[(1, 45)].symbol(), "H");
        assert_eq!(buf[(0, 45)].bg, to_color(palette.bar_filled));
        assert_eq!(buf[(0, 47)].symbol(), "D");
        // Newest message on the bottom row of the log pane
        assert_eq!(buf[(21, 49)].symbol(), "o");
    }

    #[test]
    fn test_paint_clips_to_small_buffer() {
        let engine = arena(12, 12);
        let request = build_draw_request(&engine, None);
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 10));
        paint(&request, engine.palette(), &mut buf);
        assert_eq!(buf.area.width, 10);
    }

    #[test]
    fn test_dim() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 1));
        put_char(&mut buf, 0, 0, 'x', Some((80, 160, 240)), Some((8, 8, 8)));
        dim(&mut buf);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(10, 20, 30));
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(1, 1, 1));
    }
}
