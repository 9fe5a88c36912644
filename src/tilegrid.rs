//! TileGrid - the static occupancy grid, built from the map's wall layer.

/// Immutable `width x height` grid of solid/empty cells.
/// Anything outside the grid is solid, so the map is always walled in.
#[derive(Clone)]
pub struct TileGrid {
    width: i32,
    height: i32,
    solid: Vec<bool>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32, solid: Vec<bool>) -> Result<Self, String> {
        if width <= 0 || height <= 0 {
            return Err(format!("Invalid grid size: {width}x{height}"));
        }
        let len = (width as usize) * (height as usize);
        if solid.len() != len {
            return Err(format!("Grid needs {len} cells, got {}", solid.len()));
        }
        Ok(Self { width, height, solid })
    }

    /// Build the grid from a wall layer: every non-zero tile id is solid.
    pub fn from_wall_layer(width: i32, height: i32, walls: &[u16]) -> Result<Self, String> {
        let solid = walls.iter().map(|&w| w != 0).collect();
        Self::new(width, height, solid)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if self.in_bounds(x, y) {
            self.solid[(y * self.width + x) as usize]
        } else {
            true
        }
    }
}
