//!  Various constants and small definitions.

/// Added to denominators that may reach zero (ray directions parallel to an axis, zero depths).
pub const EPSILON: f64 = 1e-9;

/// Smallest depth ever written into the depth buffer.
pub const MIN_DEPTH: f64 = 1e-3;

/// Default size of one map tile, in world units.
pub const TILE_SIZE: f64 = 64.0;

/// How fast a door slides, in openness units per second.
pub const DOOR_SPEED: f64 = 1.0;

/// Default time a door stays fully open, in seconds.
pub const DOOR_AUTO_CLOSE_TIME: f64 = 5.0;

/// Texture id meaning "no wall here".
pub const NO_TEXTURE: u16 = 0;

/// The viewpoint used for rendering: position in world units + facing angle in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl Camera {
    #[inline]
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }
}
