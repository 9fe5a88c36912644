//! Doors - sliding slabs with a continuous openness, driven by a small state machine.
//!
//! The collision code and the ray caster both go through [`Door::current_bounds`],
//! so they always agree on where the slab is.

use crate::{DOOR_AUTO_CLOSE_TIME, DOOR_SPEED};

/// Orientation of the door slab, as seen on the map.
/// * `Vertical` - the slab is a vertical line on the map (rays crossing it travel along X),
///   and it retracts along Y while opening.
/// * `Horizontal` - the slab is a horizontal line on the map (rays crossing it travel along Y),
///   and it retracts along X while opening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum DoorAxis {
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Axis-aligned rectangle, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Door descriptor, as found in the map's object data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorSpec {
    pub grid_x: i32,
    pub grid_y: i32,
    pub axis: DoorAxis,
    /// Fraction of a tile covered by the slab, across its face.
    pub thickness: f64,
    pub auto_close_time: f64,
}

impl DoorSpec {
    pub fn new(grid_x: i32, grid_y: i32, axis: DoorAxis) -> Self {
        Self {
            grid_x,
            grid_y,
            axis,
            thickness: 0.1,
            auto_close_time: DOOR_AUTO_CLOSE_TIME,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Door {
    grid_x: i32,
    grid_y: i32,
    axis: DoorAxis,
    thickness: f64,
    auto_close_time: f64,
    speed: f64,
    openness: f64,
    // last commanded direction
    opening: bool,
    open_timer: f64,
}

impl Door {
    pub fn new(spec: &DoorSpec) -> Self {
        Self {
            grid_x: spec.grid_x,
            grid_y: spec.grid_y,
            axis: spec.axis,
            thickness: spec.thickness.clamp(0.0, 1.0),
            auto_close_time: spec.auto_close_time.max(0.0),
            speed: DOOR_SPEED,
            openness: 0.0,
            opening: false,
            open_timer: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    #[inline]
    pub fn axis(&self) -> DoorAxis {
        self.axis
    }

    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    #[inline]
    pub fn openness(&self) -> f64 {
        self.openness
    }

    #[inline]
    pub fn open_timer(&self) -> f64 {
        self.open_timer
    }

    pub fn state(&self) -> DoorState {
        match (self.opening, self.openness) {
            (true, o) if o >= 1.0 => DoorState::Open,
            (true, _) => DoorState::Opening,
            (false, o) if o <= 0.0 => DoorState::Closed,
            (false, _) => DoorState::Closing,
        }
    }

    /// The slab blocks something as long as it has not fully retracted.
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.openness < 1.0
    }

    /// "Use" the door: open it, reverse it while closing, or keep it open longer.
    pub fn activate(&mut self) {
        match self.state() {
            DoorState::Closed | DoorState::Closing => {
                log::debug!("door ({},{}) activated while {}", self.grid_x, self.grid_y, self.state());
                self.opening = true;
                // a door that just started closing is still fully open
                self.open_timer = 0.0;
            }
            DoorState::Open => self.open_timer = 0.0,
            DoorState::Opening => {}
        }
    }

    /// Advance the door by `elapsed_time` seconds.
    /// While `held_open` is set (something stands in the doorway), the door will not close.
    pub fn update(&mut self, elapsed_time: f64, held_open: bool) {
        let old_state = self.state();
        match old_state {
            DoorState::Opening => {
                self.openness = (self.openness + self.speed * elapsed_time).min(1.0);
                if self.openness >= 1.0 {
                    self.open_timer = 0.0;
                }
            }
            DoorState::Open => {
                if held_open {
                    self.open_timer = 0.0;
                } else {
                    self.open_timer += elapsed_time;
                    if self.open_timer > self.auto_close_time {
                        self.opening = false;
                    }
                }
            }
            DoorState::Closing => {
                if held_open {
                    self.opening = true;
                } else {
                    self.openness = (self.openness - self.speed * elapsed_time).max(0.0);
                }
            }
            DoorState::Closed => {}
        }

        let new_state = self.state();
        if new_state != old_state {
            log::debug!("door ({},{}): {old_state} -> {new_state}", self.grid_x, self.grid_y);
        }
    }

    /// Back to the initial, fully closed state.
    pub fn reset(&mut self) {
        self.openness = 0.0;
        self.opening = false;
        self.open_timer = 0.0;
    }

    /// Current extent of the slab, in world units, or None once it is fully retracted.
    /// The slab is centered in its cell across its face, and shrinks linearly along
    /// its face as the door opens.
    pub fn current_bounds(&self, tile_size: f64) -> Option<Bounds> {
        if !self.is_blocking() {
            return None;
        }
        let x0 = (self.grid_x as f64) * tile_size;
        let y0 = (self.grid_y as f64) * tile_size;
        let mid = tile_size * 0.5;
        let half_thick = self.thickness * tile_size * 0.5;
        let retracted = self.openness * tile_size;

        let bounds = match self.axis {
            DoorAxis::Vertical => Bounds {
                min_x: x0 + mid - half_thick,
                max_x: x0 + mid + half_thick,
                min_y: y0 + retracted,
                max_y: y0 + tile_size,
            },
            DoorAxis::Horizontal => Bounds {
                min_x: x0 + retracted,
                max_x: x0 + tile_size,
                min_y: y0 + mid - half_thick,
                max_y: y0 + mid + half_thick,
            },
        };
        Some(bounds)
    }

    #[inline]
    pub fn blocks_point(&self, x: f64, y: f64, tile_size: f64) -> bool {
        self.current_bounds(tile_size).map_or(false, |b| b.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: f64 = 64.0;

    fn door(axis: DoorAxis, auto_close_time: f64) -> Door {
        Door::new(&DoorSpec {
            grid_x: 3,
            grid_y: 3,
            axis,
            thickness: 1.0,
            auto_close_time,
        })
    }

    #[test]
    fn test_starts_closed() {
        let d = door(DoorAxis::Vertical, 5.0);
        assert_eq!(d.state(), DoorState::Closed);
        assert!(d.is_blocking());
        let b = d.current_bounds(TS).unwrap();
        assert_eq!(b, Bounds { min_x: 192.0, min_y: 192.0, max_x: 256.0, max_y: 256.0 });
    }

    #[test]
    fn test_full_cycle() {
        let mut d = door(DoorAxis::Horizontal, 2.0);
        d.activate();
        assert_eq!(d.state(), DoorState::Opening);
        d.update(0.5, false);
        assert_eq!(d.state(), DoorState::Opening);
        assert!((d.openness() - 0.5).abs() < 1e-9);
        d.update(0.6, false);
        assert_eq!(d.state(), DoorState::Open);
        assert_eq!(d.openness(), 1.0);
        assert!(d.current_bounds(TS).is_none());

        d.update(1.5, false);
        assert_eq!(d.state(), DoorState::Open);
        d.update(0.6, false);
        assert_eq!(d.state(), DoorState::Closing);
        d.update(0.25, false);
        assert!((d.openness() - 0.75).abs() < 1e-9);
        d.update(5.0, false);
        assert_eq!(d.state(), DoorState::Closed);
        assert_eq!(d.openness(), 0.0);
    }

    #[test]
    fn test_activate_while_open_restarts_timer() {
        let mut d = door(DoorAxis::Vertical, 1.0);
        d.activate();
        d.update(1.0, false);
        d.update(0.9, false);
        assert!(d.open_timer() > 0.8);
        d.activate();
        assert_eq!(d.open_timer(), 0.0);
        assert_eq!(d.state(), DoorState::Open);
        d.update(0.9, false);
        assert_eq!(d.state(), DoorState::Open);
    }

    #[test]
    fn test_activate_while_closing_reverses() {
        let mut d = door(DoorAxis::Vertical, 0.0);
        d.activate();
        d.update(1.0, false);
        d.update(0.1, false);
        assert_eq!(d.state(), DoorState::Closing);
        d.update(0.3, false);
        let o = d.openness();
        d.activate();
        assert_eq!(d.state(), DoorState::Opening);
        assert_eq!(d.openness(), o);
        d.update(0.1, false);
        assert!(d.openness() > o);
    }

    #[test]
    fn test_activate_right_after_auto_close_keeps_it_open() {
        let mut d = door(DoorAxis::Vertical, 1.0);
        d.activate();
        d.update(1.0, false);
        d.update(1.1, false);
        assert_eq!(d.state(), DoorState::Closing);
        assert_eq!(d.openness(), 1.0);
        d.activate();
        assert_eq!(d.state(), DoorState::Open);
        assert_eq!(d.open_timer(), 0.0);
        d.update(0.016, false);
        assert_eq!(d.state(), DoorState::Open);
        d.update(1.0, false);
        assert_eq!(d.state(), DoorState::Closing);
    }

    #[test]
    fn test_activate_while_opening_is_noop() {
        let mut d = door(DoorAxis::Vertical, 5.0);
        d.activate();
        d.update(0.3, false);
        d.activate();
        assert_eq!(d.state(), DoorState::Opening);
        assert!((d.openness() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_held_open() {
        let mut d = door(DoorAxis::Vertical, 0.5);
        d.activate();
        d.update(1.0, false);
        d.update(10.0, true);
        assert_eq!(d.state(), DoorState::Open);
        d.update(0.6, false);
        assert_eq!(d.state(), DoorState::Closing);
        d.update(0.2, false);
        assert_eq!(d.state(), DoorState::Closing);
        d.update(0.1, true);
        assert_eq!(d.state(), DoorState::Opening);
    }

    #[test]
    fn test_bounds_shrink_along_face() {
        let mut d = Door::new(&DoorSpec {
            grid_x: 1,
            grid_y: 2,
            axis: DoorAxis::Vertical,
            thickness: 0.25,
            auto_close_time: 5.0,
        });
        let b = d.current_bounds(TS).unwrap();
        assert_eq!(b.width(), 16.0);
        assert_eq!(b.height(), 64.0);
        assert!(d.blocks_point(96.0, 130.0, TS));
        assert!(!d.blocks_point(70.0, 130.0, TS));

        d.activate();
        d.update(0.5, false);
        let b = d.current_bounds(TS).unwrap();
        assert_eq!(b.height(), 32.0);
        assert_eq!(b.min_y, 160.0);
        // the upper half is free now, the lower half is still blocked
        assert!(!d.blocks_point(96.0, 140.0, TS));
        assert!(d.blocks_point(96.0, 170.0, TS));
    }

    #[test]
    fn test_reset() {
        let mut d = door(DoorAxis::Vertical, 5.0);
        d.activate();
        d.update(0.7, false);
        d.reset();
        assert_eq!(d.state(), DoorState::Closed);
        assert_eq!(d.openness(), 0.0);
    }
}
