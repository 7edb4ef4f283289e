//! # Text Rendering
//!
//! Draws a dungeon as text for headless runs and tests.
//!
//! Each cell takes one character and each cell side takes one character
//! between cells, so a `W × H` dungeon becomes `2H + 1` lines of `2W + 1`
//! characters.

use crate::{Direction, Dungeon, Edge, RoomId};

/// Wall corner glyph.
pub const CORNER: char = '+';
/// Wall between vertically stacked cells.
pub const HORIZONTAL_WALL: char = '-';
/// Wall between side-by-side cells.
pub const VERTICAL_WALL: char = '|';
/// Door on either kind of boundary.
pub const DOOR: char = 'D';
/// Cell of the highlighted room.
pub const CURRENT_CELL: char = '@';
/// Cell of a room on the selected path.
pub const PICKED_CELL: char = '*';
/// Any other cell.
pub const PLAIN_CELL: char = '.';

/// Renders the dungeon, marking the selected path and the highlighted room.
pub fn render(dungeon: &Dungeon, path: &[RoomId], current: Option<RoomId>) -> String {
    let columns = dungeon.width() * 2 + 1;
    let rows = dungeon.height() * 2 + 1;
    let mut canvas = vec![vec![' '; columns]; rows];

    for cell in dungeon.grid().cells() {
        let pos = cell.position();
        let (column, row) = (pos.x as usize * 2 + 1, pos.y as usize * 2 + 1);

        canvas[row][column] = if Some(cell.room()) == current {
            CURRENT_CELL
        } else if path.contains(&cell.room()) {
            PICKED_CELL
        } else {
            PLAIN_CELL
        };

        for direction in Direction::ALL {
            let Some(edge) = dungeon.edge(pos, direction) else {
                continue;
            };
            let (dx, dy) = direction.delta();
            let target_row = (row as i32 + dy) as usize;
            let target_column = (column as i32 + dx) as usize;
            canvas[target_row][target_column] = match (edge, dy != 0) {
                (Edge::Open, _) => ' ',
                (Edge::Door, _) => DOOR,
                (Edge::Wall, true) => HORIZONTAL_WALL,
                (Edge::Wall, false) => VERTICAL_WALL,
            };
        }
    }

    for row in (0..rows).step_by(2) {
        for column in (0..columns).step_by(2) {
            let touches_wall = [(0, 1), (0, -1), (1, 0), (-1, 0)]
                .iter()
                .filter_map(|(dx, dy)| {
                    let r = row.checked_add_signed(*dy)?;
                    let c = column.checked_add_signed(*dx)?;
                    canvas.get(r)?.get(c).copied()
                })
                .any(|glyph| glyph != ' ');
            if touches_wall {
                canvas[row][column] = CORNER;
            }
        }
    }

    canvas
        .into_iter()
        .map(|line| line.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DungeonBuilder, GenerationConfig, Position, Sampler};

    #[test]
    fn test_fresh_grid_is_all_walls() {
        let dungeon = Dungeon::with_singleton_rooms(2, 1);
        let text = render(&dungeon, &[], None);
        assert_eq!(text, "+-+-+\n|.|.|\n+-+-+");
    }

    #[test]
    fn test_door_and_highlight_glyphs() {
        let mut dungeon = Dungeon::with_singleton_rooms(2, 1);
        let mut sampler = Sampler::seeded(1);
        let right = dungeon.room_at(Position::new(1, 0)).unwrap();
        let left = dungeon.room_at(Position::new(0, 0)).unwrap();
        dungeon
            .add_cell_door(Position::new(0, 0), right, &mut sampler)
            .unwrap();

        let text = render(&dungeon, &[left], Some(right));
        assert_eq!(text, "+-+-+\n|*D@|\n+-+-+");
    }

    #[test]
    fn test_dimensions_and_door_count() {
        let config = GenerationConfig::for_testing(21);
        let mut sampler = Sampler::seeded(21);
        let dungeon = DungeonBuilder::new(config)
            .unwrap()
            .construct_dungeon(&mut sampler)
            .unwrap();

        let text = render(&dungeon, &[], None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines.iter().all(|line| line.chars().count() == 13));
        assert_eq!(text.matches(DOOR).count(), dungeon.door_count());
    }
}
