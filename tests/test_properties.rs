//! Property-style tests over random maps, cameras and door timings.
//! Every test uses a seeded RNG, so failures are reproducible.

use rolfcast::*;
use std::f64::consts::PI;

const TS: f64 = 64.0;
const SPR: u16 = 7;
const SPR_COLOR: u32 = 0xFFFF_00FF;

// ── Helpers ────────────────────────────────────────────────────────────

/// A random map: walled border, random walls inside, a few random doors on empty cells.
fn random_map(rng: &mut fastrand::Rng, width: i32, height: i32) -> MapData {
    let mut walls = vec![0_u16; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            if border || rng.u8(0..100) < 20 {
                walls[(y * width + x) as usize] = rng.u16(1..5);
            }
        }
    }

    let mut doors = vec![];
    for _ in 0..rng.usize(0..4) {
        let (gx, gy) = (rng.i32(1..width - 1), rng.i32(1..height - 1));
        let taken = doors.iter().any(|d: &DoorSpec| d.grid_x == gx && d.grid_y == gy);
        if walls[(gy * width + gx) as usize] == 0 && !taken {
            let axis = if rng.bool() { DoorAxis::Vertical } else { DoorAxis::Horizontal };
            let mut spec = DoorSpec::new(gx, gy, axis);
            spec.thickness = 0.05 + rng.f64() * 0.95;
            doors.push(spec);
        }
    }

    MapData {
        name: "random".to_string(),
        width,
        height,
        tile_size: TS,
        walls,
        door_tiles: vec![0; (width * height) as usize],
        doors,
        player_start: None,
    }
}

/// A random position anywhere in the map (possibly inside a wall or outside the map).
fn random_spot(rng: &mut fastrand::Rng, level: &Level) -> (f64, f64) {
    let w = (level.width() as f64) * TS;
    let h = (level.height() as f64) * TS;
    (rng.f64() * w, rng.f64() * h)
}

/// A random empty cell's center, if the map has any.
fn random_free_spot(rng: &mut fastrand::Rng, level: &Level) -> Option<(f64, f64)> {
    for _ in 0..100 {
        let (cx, cy) = (rng.i32(1..level.width() - 1), rng.i32(1..level.height() - 1));
        if !level.is_solid_cell(cx, cy) && !level.is_door_cell(cx, cy) {
            return Some(((cx as f64 + 0.5) * TS, (cy as f64 + 0.5) * TS));
        }
    }
    None
}

/// Randomly open/close some doors, so rays see every door state.
fn shuffle_doors(rng: &mut fastrand::Rng, level: &mut Level) {
    let cells: Vec<(i32, i32)> = level.doors().iter().map(|d| d.cell()).collect();
    for (cx, cy) in cells {
        if rng.bool() {
            level.activate_door_at(cx, cy);
        }
    }
    level.update(rng.f64() * 1.5, &[]);
}

fn textures() -> TextureCache {
    let mut textures = TextureCache::new(1);
    textures.add_wall(1, Texture::new_solid(8, 8, 0xFF80_8080));
    textures.add_sprite(SPR, Texture::new_solid(8, 8, SPR_COLOR));
    textures
}

// ── Ray casting ────────────────────────────────────────────────────────

#[test]
fn wall_march_terminates_within_width_plus_height_steps() {
    let mut rng = fastrand::Rng::with_seed(1234);
    for _ in 0..50 {
        let (w, h) = (rng.i32(3..24), rng.i32(3..24));
        let mut level = Level::load(&random_map(&mut rng, w, h)).expect("valid level");
        shuffle_doors(&mut rng, &mut level);

        for _ in 0..40 {
            let (x, y) = random_spot(&mut rng, &level);
            let cam = Camera::new(x, y, rng.f64() * 2.0 * PI);
            let mut rc = RayCaster::new(&cam, TS);
            for _ in 0..10 {
                let hit = rc.cast_ray(rng.f64() * 2.0 * PI - PI, &level);
                assert!(hit.steps <= w + h, "{} steps on a {w}x{h} map", hit.steps);
                assert!(hit.dist.is_finite() && hit.dist >= 0.0);
                assert!((0.0..=1.0).contains(&hit.tex_u));
            }
        }
    }
}

#[test]
fn axis_aligned_rays_stay_finite() {
    let mut rng = fastrand::Rng::with_seed(99);
    let level = Level::load(&random_map(&mut rng, 10, 10)).expect("valid level");
    let cam = Camera::new(4.5 * TS, 4.5 * TS, 0.0);
    let mut rc = RayCaster::new(&cam, TS);
    for angle in [0.0, PI / 2.0, PI, -PI / 2.0, 2.0 * PI] {
        let hit = rc.cast_ray(angle, &level);
        assert!(hit.dist.is_finite(), "angle {angle}");
        assert!(hit.steps <= 20);
    }
}

#[test]
fn center_ray_depth_equals_raw_distance() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut level = Level::load(&random_map(&mut rng, 16, 16)).expect("valid level");
    shuffle_doors(&mut rng, &mut level);
    for _ in 0..100 {
        let (x, y) = random_spot(&mut rng, &level);
        let angle = rng.f64() * 2.0 * PI;
        let hit = RayCaster::new(&Camera::new(x, y, angle), TS).cast_ray(angle, &level);
        assert_eq!(corrected_depth(hit.dist, 0.0), hit.dist.max(MIN_DEPTH));
    }
}

// ── Depth buffer ───────────────────────────────────────────────────────

#[test]
fn every_column_gets_a_finite_positive_depth() {
    let mut rng = fastrand::Rng::with_seed(2024);
    let textures = textures();
    for _ in 0..20 {
        let (w, h) = (rng.i32(3..16), rng.i32(3..16));
        let mut level = Level::load(&random_map(&mut rng, w, h)).expect("valid level");
        shuffle_doors(&mut rng, &mut level);

        let scr_w = rng.i32(16..200);
        let config = RenderConfig {
            ray_count: rng.i32(1..=scr_w),
            fov: 0.3 + rng.f64() * 2.0,
            ..RenderConfig::default()
        };
        let mut r = ThreeDRenderer::new(config, scr_w, 60).expect("valid renderer");
        let mut scrbuf = ScreenBuffer::new(scr_w, 60);

        for _ in 0..10 {
            let (x, y) = random_spot(&mut rng, &level);
            let cam = Camera::new(x, y, rng.f64() * 2.0 * PI);
            r.render_frame(&level, &cam, &textures, &[], &mut scrbuf);
            assert_eq!(r.depth_buffer().len(), scr_w as usize);
            assert!(
                r.depth_buffer().is_complete(),
                "incomplete depth buffer: {:?}",
                r.depth_buffer().as_slice()
            );
        }
    }
}

// ── Doors ──────────────────────────────────────────────────────────────

#[test]
fn door_stays_open_until_the_auto_close_timer_runs_out() {
    let mut rng = fastrand::Rng::with_seed(555);
    for _ in 0..30 {
        let auto_close_time = 0.5 + rng.f64() * 5.0;
        let axis = if rng.bool() { DoorAxis::Vertical } else { DoorAxis::Horizontal };
        let mut door = Door::new(&DoorSpec {
            grid_x: 2,
            grid_y: 2,
            axis,
            thickness: 1.0,
            auto_close_time,
        });
        let center = (2.5 * TS, 2.5 * TS);
        let dt = 0.01 + rng.f64() * 0.05;

        door.activate();
        let mut last_openness = door.openness();
        while door.state() != DoorState::Open {
            door.update(dt, false);
            assert!(door.openness() >= last_openness);
            last_openness = door.openness();
        }
        assert!(!door.is_blocking());
        assert!(!door.blocks_point(center.0, center.1, TS));

        // open, and not blocking, for as long as the timer has not run out
        let mut open_for = 0.0;
        while door.state() == DoorState::Open {
            assert!(!door.is_blocking());
            assert!(door.current_bounds(TS).is_none());
            assert!(door.open_timer() <= auto_close_time);
            door.update(dt, false);
            open_for += dt;
        }
        assert_eq!(door.state(), DoorState::Closing);
        assert!(open_for > auto_close_time);

        // closing: openness goes down, and the center gets blocked again at some point
        let mut last_openness = door.openness();
        let mut blocked_again = false;
        while door.state() == DoorState::Closing {
            door.update(dt, false);
            assert!(door.openness() <= last_openness);
            last_openness = door.openness();
            assert!(door.is_blocking());
            if door.blocks_point(center.0, center.1, TS) {
                blocked_again = true;
            }
        }
        assert!(blocked_again);
        assert_eq!(door.state(), DoorState::Closed);
        assert!(door.blocks_point(center.0, center.1, TS));
    }
}

#[test]
fn collision_and_rays_see_the_same_door_geometry() {
    let mut rng = fastrand::Rng::with_seed(31337);
    let rows = ["#####", "#...#", "#.|.#", "#...#", "#####"];
    let map = parse_ascii_map("doors", &rows, TS).expect("valid map");
    let mut level = Level::load(&map).expect("valid level");
    level.activate_door_at(2, 2);

    for _ in 0..20 {
        level.update(rng.f64() * 0.1, &[]);
        let door = level.door_at(2, 2).expect("door");
        let bounds = door.current_bounds(TS);

        // a ray from the west, at a random height across the cell
        let y = 2.0 * TS + (0.01 + rng.f64() * 0.98) * TS;
        let cam = Camera::new(1.2 * TS, y, 0.0);
        let hit = RayCaster::new(&cam, TS).cast_ray(0.0, &level);
        let hits_door = hit.kind == HitKind::Door;

        match bounds {
            Some(b) => {
                assert_eq!(hits_door, b.contains(b.min_x, y), "y={y} bounds={b:?}");
                assert_eq!(level.is_blocked(b.min_x, y), hits_door);
                if hits_door {
                    assert!((hit.dist - (b.min_x - cam.x)).abs() < 1e-9);
                }
            }
            None => assert!(!hits_door),
        }
    }
}

// ── Billboards ─────────────────────────────────────────────────────────

#[test]
fn billboards_are_never_drawn_behind_walls() {
    let mut rng = fastrand::Rng::with_seed(4242);
    let textures = textures();
    for _ in 0..30 {
        let mut level = Level::load(&random_map(&mut rng, 12, 12)).expect("valid level");
        shuffle_doors(&mut rng, &mut level);
        let Some((x, y)) = random_free_spot(&mut rng, &level) else {
            continue;
        };
        let cam = Camera::new(x, y, rng.f64() * 2.0 * PI);
        let mut r = ThreeDRenderer::new(RenderConfig::default(), 120, 80).expect("valid renderer");
        let mut scrbuf = ScreenBuffer::new(120, 80);
        r.render_walls(&level, &cam, &textures, &mut scrbuf);

        let (sx, sy) = random_spot(&mut rng, &level);
        let view = EntityView::new(sx, sy, SPR, SpriteCategory::Enemy);
        r.render_billboards(&cam, TS, &textures, &[view], &mut scrbuf);

        let Some(bb) = Billboard::project(&view, &cam, (8, 8), 0.9, TS, r.projection()) else {
            continue;
        };
        for col in 0..120 {
            let has_sprite = (0..80).any(|row| scrbuf.pixel(col, row) == Some(SPR_COLOR));
            if has_sprite {
                assert!(bb.depth < r.depth_buffer().get(col), "column {col} drawn behind a wall");
            }
        }
    }
}
