//! Contains the ray casting algorithm: a DDA march through the static walls,
//! plus an analytic intersection against the current bounds of every door.

use crate::{Bounds, Camera, Door, DoorAxis, Level, EPSILON};

/// Which grid line was crossed when the ray hit something.
/// `X` = the ray was stepping along X (so it hit a vertical, E/W facing, surface).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSide {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Wall,
    Door,
}

#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub kind: HitKind,
    pub side: HitSide,
    /// Raw distance from the ray origin, along the ray (world units).
    pub dist: f64,
    pub cell: (i32, i32),
    /// Horizontal texture coordinate on the struck face, in `[0, 1]`.
    pub tex_u: f64,
    /// Wall hit right after leaving a door cell (i.e. a door frame).
    pub from_door_cell: bool,
    /// Slab thickness (tile fraction) for door hits, 1 for walls.
    pub thickness: f64,
    /// Number of cells visited by the DDA march.
    pub steps: i32,
}

pub struct RayCaster {
    origin_x: f64,
    origin_y: f64,
    tile_size: f64,
    // origin, in tile units
    pos_x: f64,
    pos_y: f64,
    sin: f64,
    cos: f64,
    map_x: i32,
    map_y: i32,
    ray_x: Ray,
    ray_y: Ray,
}

impl RayCaster {
    /// Set up the ray caster, for casting multiple rays (at different angles) from the same origin.
    pub fn new(camera: &Camera, tile_size: f64) -> Self {
        Self {
            origin_x: camera.x,
            origin_y: camera.y,
            tile_size,
            pos_x: camera.x / tile_size,
            pos_y: camera.y / tile_size,
            sin: 0.0,
            cos: 0.0,
            map_x: 0,
            map_y: 0,
            ray_x: Default::default(),
            ray_y: Default::default(),
        }
    }

    /// Cast one ray and return the closest thing it hits: a wall (DDA) or a door (analytic).
    pub fn cast_ray(&mut self, angle: f64, level: &Level) -> RayHit {
        let wall_hit = self.march_walls(angle, level);
        match self.closest_door(level) {
            Some(door_hit) if door_hit.dist < wall_hit.dist => RayHit {
                steps: wall_hit.steps,
                ..door_hit
            },
            _ => wall_hit,
        }
    }

    //----------------

    fn prepare(&mut self, angle: f64) {
        (self.sin, self.cos) = angle.sin_cos();
        self.map_x = self.pos_x.floor() as i32;
        self.map_y = self.pos_y.floor() as i32;
        self.ray_x = Ray::init(self.pos_x, self.cos);
        self.ray_y = Ray::init(self.pos_y, self.sin);
    }

    /// Walk the grid one cell at a time until a statically solid cell is found.
    /// The map border counts as solid, so this always stops within `width + height` steps.
    fn march_walls(&mut self, angle: f64, level: &Level) -> RayHit {
        self.prepare(angle);

        let max_steps = level.width() + level.height();
        let mut steps = 0;
        let mut side = HitSide::X;
        let mut dist = 0.0;
        let mut from_door_cell = false;
        while steps < max_steps {
            // check if coming from a door cell
            // (used for painting the door frames)
            from_door_cell = level.is_door_cell(self.map_x, self.map_y);
            // advance the shorter of the 2 rays
            if self.ray_x.dist < self.ray_y.dist {
                self.map_x += self.ray_x.dir;
                dist = self.ray_x.dist;
                self.ray_x.dist += self.ray_x.scale;
                side = HitSide::X;
            } else {
                self.map_y += self.ray_y.dir;
                dist = self.ray_y.dist;
                self.ray_y.dist += self.ray_y.scale;
                side = HitSide::Y;
            }
            steps += 1;
            if level.is_solid_cell(self.map_x, self.map_y) {
                break;
            }
        }

        // find the texture relative position
        let tex_u = match side {
            HitSide::X => {
                // the hit was on a vertical wall
                let y_spot = self.pos_y + dist * self.sin;
                let frac = y_spot - y_spot.floor();
                if self.ray_x.dir > 0 {
                    frac
                } else {
                    1.0 - frac
                }
            }
            HitSide::Y => {
                // the hit was on a horizontal wall
                let x_spot = self.pos_x + dist * self.cos;
                let frac = x_spot - x_spot.floor();
                if self.ray_y.dir < 0 {
                    frac
                } else {
                    1.0 - frac
                }
            }
        };

        RayHit {
            kind: HitKind::Wall,
            side,
            dist: dist * self.tile_size,
            cell: (self.map_x, self.map_y),
            tex_u,
            from_door_cell,
            thickness: 1.0,
            steps,
        }
    }

    /// Intersect the ray (as an infinite half-line) with the current bounds of all doors.
    fn closest_door(&self, level: &Level) -> Option<RayHit> {
        let ts = self.tile_size;
        let mut best: Option<RayHit> = None;
        for door in level.doors() {
            let Some(bounds) = door.current_bounds(ts) else {
                continue;
            };
            let Some(hit) = self.intersect_door(door, &bounds) else {
                continue;
            };
            if best.map_or(true, |b| hit.dist < b.dist) {
                best = Some(hit);
            }
        }
        best
    }

    fn intersect_door(&self, door: &Door, bounds: &Bounds) -> Option<RayHit> {
        let ts = self.tile_size;
        let (cx, cy) = door.cell();
        let openness = door.openness();

        // (direction along the crossed axis, origin on that axis, face positions)
        let (dir, origin, faces, side) = match door.axis() {
            DoorAxis::Vertical => (self.cos, self.origin_x, [bounds.min_x, bounds.max_x], HitSide::X),
            DoorAxis::Horizontal => (self.sin, self.origin_y, [bounds.min_y, bounds.max_y], HitSide::Y),
        };
        if dir.abs() < EPSILON {
            // parallel to the door's faces => can never cross them
            return None;
        }

        let mut best_t = f64::INFINITY;
        for face in faces {
            let t = (face - origin) / dir;
            if t <= 0.0 || t >= best_t {
                continue;
            }
            let inside = match door.axis() {
                DoorAxis::Vertical => {
                    let y = self.origin_y + t * self.sin;
                    y >= bounds.min_y && y <= bounds.max_y
                }
                DoorAxis::Horizontal => {
                    let x = self.origin_x + t * self.cos;
                    x >= bounds.min_x && x <= bounds.max_x
                }
            };
            if inside {
                best_t = t;
            }
        }
        if !best_t.is_finite() {
            return None;
        }

        // texture coordinate relative to the (partially retracted) slab
        let (along, cell_start, mirrored) = match door.axis() {
            DoorAxis::Vertical => (self.origin_y + best_t * self.sin, (cy as f64) * ts, self.cos < 0.0),
            DoorAxis::Horizontal => (self.origin_x + best_t * self.cos, (cx as f64) * ts, self.sin > 0.0),
        };
        let slab_u = ((along - cell_start) / ts - openness).clamp(0.0, 1.0);
        let tex_u = if mirrored { 1.0 - slab_u } else { slab_u };
        // slab extent across its face, as a fraction of a tile
        let thickness = match door.axis() {
            DoorAxis::Vertical => bounds.width(),
            DoorAxis::Horizontal => bounds.height(),
        } / ts;

        Some(RayHit {
            kind: HitKind::Door,
            side,
            dist: best_t,
            cell: (cx, cy),
            tex_u,
            from_door_cell: false,
            thickness,
            steps: 0,
        })
    }
}

//--------------------------
// Internal stuff

/// One axis of the DDA: distance to the next grid line, distance between grid lines, step direction.
#[derive(Default)]
struct Ray {
    dist: f64,
    scale: f64,
    dir: i32,
}

impl Ray {
    // compute direction, scale and initial distance along one axis;
    // the epsilon keeps axis-parallel rays finite (they just never step on that axis)
    fn init(pos: f64, dir_component: f64) -> Self {
        let pos_fl = pos.floor();
        let scale = 1.0 / (dir_component.abs() + EPSILON);
        if dir_component < 0.0 {
            Self {
                dist: (pos - pos_fl) * scale,
                scale,
                dir: -1,
            }
        } else {
            Self {
                dist: (pos_fl + 1.0 - pos) * scale,
                scale,
                dir: 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_ascii_map;
    use std::f64::consts::PI;

    const TS: f64 = 64.0;

    fn level(rows: &[&str]) -> Level {
        Level::load(&parse_ascii_map("test", rows, TS).unwrap()).unwrap()
    }

    #[test]
    fn test_straight_east() {
        let level = level(&["#####", "#...#", "#####"]);
        let cam = Camera::new(1.5 * TS, 1.5 * TS, 0.0);
        let mut rc = RayCaster::new(&cam, TS);
        let hit = rc.cast_ray(0.0, &level);
        assert_eq!(hit.kind, HitKind::Wall);
        assert_eq!(hit.side, HitSide::X);
        assert_eq!(hit.cell, (4, 1));
        assert!((hit.dist - 2.5 * TS).abs() < 1e-6);
        assert!((hit.tex_u - 0.5).abs() < 1e-6);
        assert_eq!(hit.steps, 3);
    }

    #[test]
    fn test_straight_north_and_west() {
        let level = level(&["#####", "#...#", "#...#", "#####"]);
        let cam = Camera::new(2.5 * TS, 2.25 * TS, 0.0);
        let mut rc = RayCaster::new(&cam, TS);
        // north is -Y (the map is y-flipped)
        let hit = rc.cast_ray(PI * 1.5, &level);
        assert_eq!(hit.side, HitSide::Y);
        assert_eq!(hit.cell, (2, 0));
        assert!((hit.dist - 1.25 * TS).abs() < 1e-6);
        let hit = rc.cast_ray(PI, &level);
        assert_eq!(hit.side, HitSide::X);
        assert_eq!(hit.cell, (0, 2));
        assert!((hit.dist - 1.5 * TS).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_ray() {
        let level = level(&["#####", "#...#", "#...#", "#...#", "#####"]);
        let cam = Camera::new(1.5 * TS, 1.5 * TS, 0.0);
        let mut rc = RayCaster::new(&cam, TS);
        let hit = rc.cast_ray(PI / 4.0, &level);
        // hits the far corner area: either (4,3)/(3,4) boundary, at about 2.5*sqrt(2) tiles
        assert!((hit.dist - 2.5 * 2f64.sqrt() * TS).abs() < 1e-3);
    }

    #[test]
    fn test_closed_door_is_hit_before_wall() {
        let level = level(&["#######", "#..|..#", "#######"]);
        let cam = Camera::new(1.5 * TS, 1.5 * TS, 0.0);
        let mut rc = RayCaster::new(&cam, TS);
        let hit = rc.cast_ray(0.0, &level);
        assert_eq!(hit.kind, HitKind::Door);
        assert_eq!(hit.cell, (3, 1));
        // slab is centered in the cell, 0.1 tiles thick
        assert!((hit.dist - (3.45 * TS - 1.5 * TS)).abs() < 1e-6);
        assert!((hit.thickness - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_open_door_lets_rays_through() {
        let mut level = level(&["#######", "#..|..#", "#######"]);
        level.activate_door_at(3, 1);
        level.update(2.0, &[]);
        let cam = Camera::new(1.5 * TS, 1.5 * TS, 0.0);
        let mut rc = RayCaster::new(&cam, TS);
        let hit = rc.cast_ray(0.0, &level);
        assert_eq!(hit.kind, HitKind::Wall);
        assert_eq!(hit.cell, (6, 1));
    }

    #[test]
    fn test_half_open_door() {
        let mut level = level(&["#######", "#.....#", "#..|..#", "#.....#", "#######"]);
        level.activate_door_at(3, 2);
        level.update(0.5, &[]);
        // the door retracted along Y: the upper half of the cell is free, the lower half is not
        let mut rc = RayCaster::new(&Camera::new(1.5 * TS, 2.25 * TS, 0.0), TS);
        assert_eq!(rc.cast_ray(0.0, &level).kind, HitKind::Wall);
        let mut rc = RayCaster::new(&Camera::new(1.5 * TS, 2.75 * TS, 0.0), TS);
        let hit = rc.cast_ray(0.0, &level);
        assert_eq!(hit.kind, HitKind::Door);
        // texture slides with the slab
        assert!((hit.tex_u - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_door_frame_flag() {
        let level = level(&["#####", "#.-.#", "#####"]);
        // standing in the door cell, north of the slab
        let cam = Camera::new(2.5 * TS, 1.25 * TS, 0.0);
        let mut rc = RayCaster::new(&cam, TS);
        // looking north => the wall above the door is the door frame
        let hit = rc.cast_ray(PI * 1.5, &level);
        assert_eq!(hit.kind, HitKind::Wall);
        assert!(hit.from_door_cell);
    }

    #[test]
    fn test_ray_parallel_to_door_faces_passes_through() {
        // east-west ray along the middle of a horizontal slab
        let level_h = level(&["#####", "#.-.#", "#####"]);
        let mut rc = RayCaster::new(&Camera::new(1.5 * TS, 1.5 * TS, 0.0), TS);
        let hit = rc.cast_ray(0.0, &level_h);
        assert_eq!(hit.kind, HitKind::Wall);
        assert_eq!(hit.cell, (4, 1));
        assert!((hit.dist - 2.5 * TS).abs() < 1e-6);

        // north-south ray along the middle of a vertical slab
        let level_v = level(&["###", "#.#", "#|#", "#.#", "###"]);
        let mut rc = RayCaster::new(&Camera::new(1.5 * TS, 1.5 * TS, 0.0), TS);
        let hit = rc.cast_ray(PI / 2.0, &level_v);
        assert_eq!(hit.kind, HitKind::Wall);
        assert_eq!(hit.cell, (1, 4));
        assert!((hit.dist - 2.5 * TS).abs() < 1e-6);
    }

    #[test]
    fn test_axis_parallel_rays_are_finite() {
        let level = level(&["#####", "#...#", "#...#", "#####"]);
        let cam = Camera::new(2.0 * TS, 2.0 * TS, 0.0);
        let mut rc = RayCaster::new(&cam, TS);
        for angle in [0.0, PI / 2.0, PI, PI * 1.5, 2.0 * PI] {
            let hit = rc.cast_ray(angle, &level);
            assert!(hit.dist.is_finite());
            assert!(hit.dist >= 0.0);
        }
    }
}
