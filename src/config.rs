//! Render configuration + the screen projection derived from it.

use crate::{SpriteCategory, EPSILON};
use std::f64::consts::PI;
use strum::IntoEnumIterator;

/// Tunable rendering settings.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Horizontal field of view, in radians.
    pub fov: f64,
    /// Number of rays cast per frame (0 = one ray per screen column).
    pub ray_count: i32,
    /// Multiplier for the projected wall height (1 = a tile is as tall as it is wide).
    pub wall_scale: f64,
    /// Max projected wall height, in screen heights.
    pub max_wall_height: f64,
    pub enemy_scale: f64,
    pub pickup_scale: f64,
    pub projectile_scale: f64,
    pub effect_scale: f64,
    /// Max projected sprite height, in screen heights.
    pub max_sprite_height: f64,
    pub sky_color: u32,
    pub floor_color: u32,
    /// Paint walls hit on their E/W faces a bit darker.
    pub shade_x_sides: bool,
    /// Texture used for the walls right next to a door, if any.
    pub door_frame_texture: Option<u16>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov: PI / 3.0,
            ray_count: 0,
            wall_scale: 1.0,
            max_wall_height: 8.0,
            enemy_scale: 0.9,
            pickup_scale: 0.5,
            projectile_scale: 0.3,
            effect_scale: 0.7,
            max_sprite_height: 2.0,
            sky_color: 0xFF38_3838,
            floor_color: 0xFF70_7070,
            shade_x_sides: true,
            door_frame_texture: None,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(format!("Field of view must be between 0 and PI, got {}", self.fov));
        }
        if self.ray_count < 0 {
            return Err(format!("Invalid ray count: {}", self.ray_count));
        }
        let positive = [
            ("wall scale", self.wall_scale),
            ("max wall height", self.max_wall_height),
            ("max sprite height", self.max_sprite_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(format!("Invalid {name}: {value}"));
            }
        }
        for category in SpriteCategory::iter() {
            let scale = self.sprite_scale(category);
            if !(scale > 0.0) {
                return Err(format!("Invalid {category} scale: {scale}"));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn sprite_scale(&self, category: SpriteCategory) -> f64 {
        match category {
            SpriteCategory::Pickup => self.pickup_scale,
            SpriteCategory::Enemy => self.enemy_scale,
            SpriteCategory::Projectile => self.projectile_scale,
            SpriteCategory::Effect => self.effect_scale,
        }
    }
}

//-----------------------

/// Screen-space constants, computed once per renderer.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub scr_width: i32,
    pub scr_height: i32,
    pub horizon: f64,
    pub fov: f64,
    pub half_fov: f64,
    /// Distance from the eye to the projection plane, in pixels (times the wall scale).
    pub focal: f64,
    pub max_wall_height: f64,
    pub max_sprite_height: f64,
}

impl Projection {
    pub fn new(config: &RenderConfig, scr_width: i32, scr_height: i32) -> Self {
        let half_fov = config.fov * 0.5;
        let focal = config.wall_scale * (scr_width as f64) * 0.5 / half_fov.tan();
        Self {
            scr_width,
            scr_height,
            horizon: (scr_height / 2) as f64,
            fov: config.fov,
            half_fov,
            focal,
            max_wall_height: config.max_wall_height * (scr_height as f64),
            max_sprite_height: config.max_sprite_height * (scr_height as f64),
        }
    }

    /// On-screen height of a full tile at the given (fisheye-corrected) depth.
    #[inline]
    pub fn wall_height(&self, depth: f64, tile_size: f64) -> f64 {
        (self.focal * tile_size / (depth + EPSILON)).min(self.max_wall_height)
    }

    /// Screen column for an angle relative to the view direction.
    #[inline]
    pub fn screen_x(&self, angle_delta: f64) -> f64 {
        (angle_delta / self.fov + 0.5) * (self.scr_width as f64)
    }
}
