//! Plain-text rendering of a map

use tk_core::dungeon::Map;
use tk_core::entity::EntityId;
use tk_core::geometry::Point;

/// Draw `map` as text, one line per row.
///
/// Terrain shows on explored cells and occupants follow the render
/// visibility rule, with `viewer` on top. `reveal` draws everything.
pub fn render_ascii(map: &Map, viewer: EntityId, reveal: bool) -> String {
    let width = map.width() as usize;
    let mut grid: Vec<char> = Vec::with_capacity(width * map.height() as usize);
    for y in 0..map.height() {
        for x in 0..map.width() {
            let p = Point::new(x, y);
            grid.push(if reveal || map.is_explored(p) {
                map.terrain_at(p).symbol()
            } else {
                ' '
            });
        }
    }

    for entity in map.draw_order(viewer) {
        if reveal || map.is_render_visible(entity) {
            grid[entity.pos.y as usize * width + entity.pos.x as usize] = entity.glyph;
        }
    }

    let mut out = String::with_capacity(grid.len() + map.height() as usize);
    for row in grid.chunks(width) {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
