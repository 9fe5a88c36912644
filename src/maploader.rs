//! Map data, as handed over by the map loader: wall layer, door layer, door descriptors.
//! Also parses small ASCII maps (handy for tests and for the demo).

use std::f64::consts::PI;

use crate::{DoorAxis, DoorSpec, TILE_SIZE};

/// Map data - contains walls, doors and the player start.
pub struct MapData {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub tile_size: f64,
    /// Wall tile ids, row by row (0 = empty).
    pub walls: Vec<u16>,
    /// Door tile ids, row by row (0 = no door texture).
    pub door_tiles: Vec<u16>,
    pub doors: Vec<DoorSpec>,
    /// Player start: cell + facing angle.
    pub player_start: Option<(i32, i32, f64)>,
}

impl MapData {
    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> u16 {
        self.safe_item_from_array(x, y, &self.walls)
    }

    #[inline]
    pub fn door_tile(&self, x: i32, y: i32) -> u16 {
        self.safe_item_from_array(x, y, &self.door_tiles)
    }

    fn safe_item_from_array(&self, x: i32, y: i32, vect: &[u16]) -> u16 {
        let w = self.width;
        let h = self.height;
        if x >= 0 && y >= 0 && x < w && y < h {
            let idx = (y * w + x) as usize;
            vect.get(idx).copied().unwrap_or(0)
        } else {
            0
        }
    }
}

/// Door tile id used by ASCII maps.
pub const ASCII_DOOR_TILE: u16 = 90;

/// Parse an ASCII map:
/// * `#` or `1`..`9` - wall (`#` is wall id 1, digits are their own id)
/// * `.` or space - empty
/// * `|` - vertical door, `-` - horizontal door
/// * `>`, `v`, `<`, `^` - player start, facing E, S, W, N (the map is y-flipped)
///
/// Shorter rows are padded with walls.
pub fn parse_ascii_map(name: &str, rows: &[&str], tile_size: f64) -> Result<MapData, String> {
    let height = rows.len();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(format!("Map {name} is empty"));
    }
    if !(tile_size > 0.0) {
        return Err(format!("Map {name} has an invalid tile size: {tile_size}"));
    }

    let len = width * height;
    let mut walls = vec![1_u16; len];
    let mut door_tiles = vec![0_u16; len];
    let mut doors = vec![];
    let mut player_start = None;

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let idx = y * width + x;
            let (gx, gy) = (x as i32, y as i32);
            walls[idx] = match ch {
                '#' => 1,
                '1'..='9' => (ch as u16) - ('0' as u16),
                '.' | ' ' => 0,
                '|' | '-' => {
                    let axis = if ch == '|' { DoorAxis::Vertical } else { DoorAxis::Horizontal };
                    doors.push(DoorSpec::new(gx, gy, axis));
                    door_tiles[idx] = ASCII_DOOR_TILE;
                    0
                }
                '>' | 'v' | '<' | '^' => {
                    if player_start.is_some() {
                        return Err(format!("Map {name} has more than one player start"));
                    }
                    player_start = Some((gx, gy, orientation_to_angle(ch)));
                    0
                }
                _ => return Err(format!("Map {name}: unknown tile '{ch}' at ({x},{y})")),
            };
        }
    }

    Ok(MapData {
        name: name.to_string(),
        width: width as i32,
        height: height as i32,
        tile_size,
        walls,
        door_tiles,
        doors,
        player_start,
    })
}

/// Same as [`parse_ascii_map`], with the default tile size.
#[inline]
pub fn parse_ascii_map_default(name: &str, rows: &[&str]) -> Result<MapData, String> {
    parse_ascii_map(name, rows, TILE_SIZE)
}

//-------------------
//  Internal stuff

fn orientation_to_angle(ch: char) -> f64 {
    match ch {
        'v' => PI / 2.0,
        '<' => PI,
        '^' => PI * 3.0 / 2.0,
        _ => 0.0,
    }
}
