//! Level - the collision facade: static walls (TileGrid) + the live doors.
//! Answers "is this point blocked" and "which texture goes on this cell".

use crate::{translate_point, Door, DoorState, MapData, TileGrid, NO_TEXTURE};

pub struct Level {
    name: String,
    tile_size: f64,
    grid: TileGrid,
    walls: Vec<u16>,
    door_tiles: Vec<u16>,
    doors: Vec<Door>,
    // cell index -> index in `doors`
    door_cells: Vec<Option<usize>>,
}

impl Level {
    pub fn load(map: &MapData) -> Result<Self, String> {
        let name = &map.name;
        if !(map.tile_size > 0.0) {
            return Err(format!("Level {name}: invalid tile size {}", map.tile_size));
        }
        let grid = TileGrid::from_wall_layer(map.width, map.height, &map.walls)
            .map_err(|e| format!("Level {name}: bad wall layer - {e}"))?;
        let len = map.walls.len();
        if map.door_tiles.len() != len {
            return Err(format!(
                "Level {name}: door layer has {} cells, expected {len}",
                map.door_tiles.len()
            ));
        }

        let mut doors = Vec::with_capacity(map.doors.len());
        let mut door_cells = vec![None; len];
        for spec in map.doors.iter() {
            let (x, y) = (spec.grid_x, spec.grid_y);
            if !grid.in_bounds(x, y) {
                return Err(format!("Level {name}: door at ({x},{y}) is outside the map"));
            }
            if grid.is_solid(x, y) {
                return Err(format!("Level {name}: door at ({x},{y}) sits on a wall"));
            }
            if !(spec.thickness > 0.0 && spec.thickness <= 1.0) {
                return Err(format!("Level {name}: door at ({x},{y}) has invalid thickness {}", spec.thickness));
            }
            if !(spec.auto_close_time >= 0.0) {
                return Err(format!("Level {name}: door at ({x},{y}) has invalid auto-close time"));
            }
            let idx = (y * map.width + x) as usize;
            if door_cells[idx].is_some() {
                return Err(format!("Level {name}: more than one door at ({x},{y})"));
            }
            door_cells[idx] = Some(doors.len());
            doors.push(Door::new(spec));
        }

        log::info!(
            "Level {name} loaded: {}x{} tiles, {} doors",
            map.width,
            map.height,
            doors.len()
        );

        Ok(Self {
            name: name.clone(),
            tile_size: map.tile_size,
            grid,
            walls: map.walls.clone(),
            door_tiles: map.door_tiles.clone(),
            doors,
            door_cells,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    #[inline]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    #[inline]
    pub fn world_to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        ((x / self.tile_size).floor() as i32, (y / self.tile_size).floor() as i32)
    }

    pub fn door_at(&self, cx: i32, cy: i32) -> Option<&Door> {
        self.door_index(cx, cy).map(|i| &self.doors[i])
    }

    pub fn door_at_mut(&mut self, cx: i32, cy: i32) -> Option<&mut Door> {
        self.door_index(cx, cy).map(move |i| &mut self.doors[i])
    }

    #[inline]
    pub fn is_door_cell(&self, cx: i32, cy: i32) -> bool {
        self.door_index(cx, cy).is_some()
    }

    /// Static solidity only (walls + outside of the map).
    #[inline]
    pub fn is_solid_cell(&self, cx: i32, cy: i32) -> bool {
        self.grid.is_solid(cx, cy)
    }

    /// Is this world point blocked, by a wall or by the current extent of a door?
    pub fn is_blocked(&self, x: f64, y: f64) -> bool {
        let (cx, cy) = self.world_to_cell(x, y);
        if self.grid.is_solid(cx, cy) {
            return true;
        }
        self.door_at(cx, cy)
            .map_or(false, |door| door.blocks_point(x, y, self.tile_size))
    }

    /// The static wall tile id of a cell (0 = no wall, also outside the map).
    #[inline]
    pub fn wall_id(&self, cx: i32, cy: i32) -> u16 {
        self.cell_index(cx, cy).map_or(NO_TEXTURE, |i| self.walls[i])
    }

    /// Texture to show at a cell: a blocking door's texture, else a neighbouring
    /// wall's texture (so a door without its own texture still looks like a wall),
    /// else the static wall texture.
    /// Cells outside the map (the implicit border) also borrow a neighbouring wall's texture.
    pub fn texture_id(&self, cx: i32, cy: i32) -> u16 {
        let Some(idx) = self.cell_index(cx, cy) else {
            return self.neighbour_wall_id(cx, cy).unwrap_or(NO_TEXTURE);
        };
        let blocking_door = self.door_cells[idx].map_or(false, |d| self.doors[d].is_blocking());
        if blocking_door {
            let tex = self.door_tiles[idx];
            if tex != NO_TEXTURE {
                return tex;
            }
            if let Some(id) = self.neighbour_wall_id(cx, cy) {
                return id;
            }
        }
        self.walls[idx]
    }

    /// Advance all doors. A door with one of the `occupants` standing in its cell is kept open.
    pub fn update(&mut self, elapsed_time: f64, occupants: &[(f64, f64)]) {
        let ts = self.tile_size;
        for door in self.doors.iter_mut() {
            let cell = door.cell();
            let held_open = occupants.iter().any(|&(ox, oy)| {
                ((ox / ts).floor() as i32, (oy / ts).floor() as i32) == cell
            });
            door.update(elapsed_time, held_open);
        }
    }

    pub fn activate_door_at(&mut self, cx: i32, cy: i32) -> bool {
        match self.door_at_mut(cx, cy) {
            Some(door) => {
                door.activate();
                true
            }
            None => false,
        }
    }

    /// Activate the door found `reach` world units in front of a position, if any.
    pub fn activate_facing(&mut self, x: f64, y: f64, angle: f64, reach: f64) -> bool {
        let (tx, ty) = translate_point(x, y, angle, reach);
        let (cx, cy) = self.world_to_cell(tx, ty);
        self.activate_door_at(cx, cy)
    }

    /// Close all doors (level restart).
    pub fn reset_doors(&mut self) {
        self.doors.iter_mut().for_each(|d| d.reset());
    }

    pub fn count_doors_in_state(&self, state: DoorState) -> usize {
        self.doors.iter().filter(|d| d.state() == state).count()
    }

    /// Move a round body, one axis at a time, so it slides along walls instead of sticking.
    pub fn slide_move(&self, x: f64, y: f64, dx: f64, dy: f64, radius: f64) -> (f64, f64) {
        let mut nx = x;
        let mut ny = y;
        if !self.is_area_blocked(x + dx, y, radius) {
            nx = x + dx;
        }
        if !self.is_area_blocked(nx, y + dy, radius) {
            ny = y + dy;
        }
        (nx, ny)
    }

    pub fn is_area_blocked(&self, x: f64, y: f64, radius: f64) -> bool {
        self.is_blocked(x, y)
            || self.is_blocked(x - radius, y - radius)
            || self.is_blocked(x + radius, y - radius)
            || self.is_blocked(x - radius, y + radius)
            || self.is_blocked(x + radius, y + radius)
    }

    //----------------

    #[inline]
    fn cell_index(&self, cx: i32, cy: i32) -> Option<usize> {
        if self.grid.in_bounds(cx, cy) {
            Some((cy * self.grid.width() + cx) as usize)
        } else {
            None
        }
    }

    // first non-empty wall id among the N, E, S, W neighbours
    fn neighbour_wall_id(&self, cx: i32, cy: i32) -> Option<u16> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .iter()
            .map(|(dx, dy)| self.wall_id(cx + dx, cy + dy))
            .find(|&id| id != NO_TEXTURE)
    }

    #[inline]
    fn door_index(&self, cx: i32, cy: i32) -> Option<usize> {
        self.cell_index(cx, cy).and_then(|i| self.door_cells[i])
    }
}
