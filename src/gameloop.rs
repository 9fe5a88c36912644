//! Main game loop for the demo.
//! Also acts as a facade, to hold and manage all game objects
//! (level, textures, renderer, player, things).

use crate::*;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

// movement, in tiles per second / radians per second
const MOVE_SPEED: f64 = 3.0;
const TURN_SPEED: f64 = 2.5;
const MOUSE_TURN: f64 = 0.004;
// size of the player/actors, in tiles
const BODY_RADIUS: f64 = 0.2;
const USE_REACH: f64 = 0.8;
const PICKUP_REACH: f64 = 0.4;
const PROJECTILE_SPEED: f64 = 4.0;
const EFFECT_FRAME_TIME: f64 = 0.2;

/// A demo thing: how it looks + how it moves.
pub struct Thing {
    pub view: EntityView,
    /// Movement direction (projectiles only).
    pub velocity: (f64, f64),
    /// Animation frames, cycled over time (effects only).
    pub frames: Vec<u16>,
}

impl Thing {
    pub fn still(view: EntityView) -> Self {
        Self {
            view,
            velocity: (0.0, 0.0),
            frames: vec![],
        }
    }

    pub fn moving(view: EntityView, velocity: (f64, f64)) -> Self {
        Self {
            view,
            velocity,
            frames: vec![],
        }
    }

    pub fn animated(view: EntityView, frames: Vec<u16>) -> Self {
        Self {
            view,
            velocity: (0.0, 0.0),
            frames,
        }
    }
}

impl SpriteSource for Thing {
    fn entity_view(&self) -> EntityView {
        self.view
    }
}

pub struct GameLoop {
    scrbuf: ScreenBuffer,
    renderer: ThreeDRenderer,
    textures: TextureCache,
    level: Level,
    player: Camera,
    things: Vec<Thing>,
    inputs: InputManager,
    clock: f64,
}

impl GameLoop {
    pub fn new(
        width: i32,
        height: i32,
        pixel_size: i32,
        config: RenderConfig,
        map: &MapData,
        textures: TextureCache,
        things: Vec<Thing>,
    ) -> Result<Self, String> {
        let level = Level::load(map)?;
        let renderer = ThreeDRenderer::new(config, width, height)?;
        let ts = level.tile_size();
        let (px, py, angle) = map
            .player_start
            .ok_or_else(|| format!("Map {} has no player start", map.name))?;
        textures.check();

        Ok(Self {
            scrbuf: ScreenBuffer::new(width, height),
            renderer,
            textures,
            level,
            player: Camera::new(((px as f64) + 0.5) * ts, ((py as f64) + 0.5) * ts, angle),
            things,
            inputs: InputManager::new(pixel_size),
            clock: 0.0,
        })
    }

    fn move_player(&mut self, elapsed_time: f64) {
        let ts = self.level.tile_size();

        let mut turn = -(self.inputs.consume_mouse_motion() as f64) * MOUSE_TURN;
        if self.inputs.key(Keycode::Left) {
            turn += TURN_SPEED * elapsed_time;
        } else if self.inputs.key(Keycode::Right) {
            turn -= TURN_SPEED * elapsed_time;
        }
        // the map is y-flipped => turning "left" means decreasing the angle
        self.player.angle = normalize_angle(self.player.angle - turn);

        let mut forward = 0.0;
        let mut strafe = 0.0;
        if self.inputs.key(Keycode::W) || self.inputs.key(Keycode::Up) {
            forward += 1.0;
        } else if self.inputs.key(Keycode::S) || self.inputs.key(Keycode::Down) {
            forward -= 1.0;
        }
        if self.inputs.key(Keycode::A) {
            strafe -= 1.0;
        } else if self.inputs.key(Keycode::D) {
            strafe += 1.0;
        }
        if forward != 0.0 || strafe != 0.0 {
            let step = MOVE_SPEED * ts * elapsed_time;
            let (sin, cos) = self.player.angle.sin_cos();
            let dx = (forward * cos - strafe * sin) * step;
            let dy = (forward * sin + strafe * cos) * step;
            (self.player.x, self.player.y) =
                self.level
                    .slide_move(self.player.x, self.player.y, dx, dy, BODY_RADIUS * ts);
        }

        if self.inputs.consume_key(Keycode::Space) {
            let p = self.player;
            if !self.level.activate_facing(p.x, p.y, p.angle, USE_REACH * ts) {
                log::debug!("nothing to use here");
            }
        }
        if self.inputs.consume_key(Keycode::R) {
            log::info!("Restarting level {}", self.level.name());
            self.level.reset_doors();
        }
    }

    fn update_things(&mut self, elapsed_time: f64) {
        let ts = self.level.tile_size();
        let (px, py) = (self.player.x, self.player.y);
        let frame = (self.clock / EFFECT_FRAME_TIME) as usize;

        for thing in self.things.iter_mut() {
            let view = &mut thing.view;
            match view.category {
                SpriteCategory::Pickup if view.visible => {
                    let (dx, dy) = (view.x - px, view.y - py);
                    if (dx * dx + dy * dy).sqrt() < PICKUP_REACH * ts {
                        log::info!("Picked up item at ({:.0},{:.0})", view.x, view.y);
                        view.visible = false;
                    }
                }
                SpriteCategory::Projectile => {
                    let (vx, vy) = thing.velocity;
                    let nx = view.x + vx * elapsed_time * PROJECTILE_SPEED * ts;
                    let ny = view.y + vy * elapsed_time * PROJECTILE_SPEED * ts;
                    if self.level.is_blocked(nx, ny) {
                        // bounce back
                        thing.velocity = (-vx, -vy);
                    } else {
                        (view.x, view.y) = (nx, ny);
                    }
                }
                SpriteCategory::Effect if !thing.frames.is_empty() => {
                    view.sprite = Some(thing.frames[frame % thing.frames.len()]);
                }
                _ => {}
            }
        }
    }
}

impl GraphicsLoop for GameLoop {
    fn handle_event(&mut self, event: &Event) -> bool {
        self.inputs.handle_event(event);
        !self.inputs.consume_key(Keycode::Escape)
    }

    fn update_state(&mut self, elapsed_time: f64) -> bool {
        self.clock += elapsed_time;
        self.move_player(elapsed_time);
        self.update_things(elapsed_time);

        // doors first, so the renderer sees this frame's door geometry
        let mut occupants = vec![(self.player.x, self.player.y)];
        occupants.extend(
            self.things
                .iter()
                .map(|t| t.entity_view())
                .filter(|v| v.visible && v.category == SpriteCategory::Enemy)
                .map(|v| (v.x, v.y)),
        );
        self.level.update(elapsed_time, &occupants);

        let views: Vec<EntityView> = self.things.iter().map(|t| t.entity_view()).collect();
        self.renderer
            .render_frame(&self.level, &self.player, &self.textures, &views, &mut self.scrbuf);
        true
    }

    fn paint(&self, painter: &mut dyn Painter) {
        self.scrbuf.paint(painter);
    }
}
