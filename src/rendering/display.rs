//! # Display Management
//!
//! Window rendering of a [`ViewerSession`] using macroquad.

use crate::{config, Direction, Dungeon, Edge, Position, Room, ViewerSession};
use macroquad::prelude::*;

/// Macroquad renderer for the dungeon viewer.
///
/// Walls are white lines, doors are green lines, and rooms outside the
/// selected path are drawn faded. The highlighted room is filled.
pub struct MacroquadDisplay {
    /// Cell size in pixels
    pub cell_size: f32,
    /// Wall line color
    pub wall_color: Color,
    /// Door line color
    pub door_color: Color,
    /// Fill color of the highlighted room
    pub highlight_color: Color,
    /// Alpha applied to rooms outside the selected path
    pub faded_alpha: f32,
    /// Line thickness in pixels
    pub line_thickness: f32,
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadDisplay {
    /// Creates a display with the default palette.
    pub fn new() -> Self {
        Self {
            cell_size: config::CELL_PIXELS,
            wall_color: WHITE,
            door_color: GREEN,
            highlight_color: BLUE,
            faded_alpha: 1.0 / 3.0,
            line_thickness: 1.0,
        }
    }

    /// Window size needed to show a `width × height` grid.
    pub fn window_size(&self, width: usize, height: usize) -> (i32, i32) {
        (
            (width as f32 * self.cell_size) as i32,
            (height as f32 * self.cell_size) as i32,
        )
    }

    /// Renders the complete viewer frame.
    pub fn render(&self, session: &ViewerSession) {
        clear_background(BLACK);

        let dungeon = session.dungeon();
        if let Some(room) = session.current_room().and_then(|id| dungeon.room(id)) {
            self.draw_room(room);
        }
        for cell in dungeon.grid().cells() {
            let picked = session.is_picked(cell.room());
            self.draw_cell(dungeon, cell.position(), picked);
        }
    }

    /// Fills every cell of a room, leaving a one pixel margin.
    fn draw_room(&self, room: &Room) {
        for pos in room.cells() {
            let (left, top) = self.corner(*pos);
            draw_rectangle(
                left + 1.0,
                top + 1.0,
                self.cell_size - 2.0,
                self.cell_size - 2.0,
                self.highlight_color,
            );
        }
    }

    fn draw_cell(&self, dungeon: &Dungeon, pos: Position, picked: bool) {
        for direction in Direction::ALL {
            let color = match dungeon.edge(pos, direction) {
                Some(Edge::Wall) => self.wall_color,
                Some(Edge::Door) => self.door_color,
                Some(Edge::Open) | None => continue,
            };
            let color = if picked {
                color
            } else {
                Color::new(color.r, color.g, color.b, color.a * self.faded_alpha)
            };
            self.draw_edge(pos, direction, color);
        }
    }

    fn draw_edge(&self, pos: Position, direction: Direction, color: Color) {
        let (left, top) = self.corner(pos);
        let (right, bottom) = (left + self.cell_size, top + self.cell_size);
        let ((x1, y1), (x2, y2)) = match direction {
            Direction::North => ((right, top), (left, top)),
            Direction::South => ((right, bottom), (left, bottom)),
            Direction::East => ((right, top), (right, bottom)),
            Direction::West => ((left, top), (left, bottom)),
        };
        draw_line(x1, y1, x2, y2, self.line_thickness, color);
    }

    fn corner(&self, pos: Position) -> (f32, f32) {
        (pos.x as f32 * self.cell_size, pos.y as f32 * self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size() {
        let display = MacroquadDisplay::new();
        assert_eq!(display.window_size(20, 20), (400, 400));
        assert_eq!(display.window_size(3, 5), (60, 100));
    }
}
