//! Billboards - sprites that always face the camera (enemies, pickups, projectiles, explosions).
//! The compositor only needs to know where an entity is and what it currently looks like.

use crate::{normalize_angle, Camera, Projection, MIN_DEPTH};

/// Sprite categories, in the order their passes are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
pub enum SpriteCategory {
    Pickup,
    Enemy,
    Projectile,
    Effect,
}

impl SpriteCategory {
    /// Things on the ground stand on the floor; things in flight are centered on the horizon.
    #[inline]
    pub fn stands_on_floor(&self) -> bool {
        matches!(self, SpriteCategory::Pickup | SpriteCategory::Enemy)
    }
}

/// Read-only view of an entity, as seen by the billboard compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    pub x: f64,
    pub y: f64,
    /// Sprite id of the current animation frame (None = nothing to draw).
    pub sprite: Option<u16>,
    pub category: SpriteCategory,
    /// Alive / not picked up / not expired.
    pub visible: bool,
    /// Overrides the category's scale.
    pub scale: Option<f64>,
    /// Raise (+) or lower (-) the sprite, as a fraction of the wall height.
    pub vertical_offset: Option<f64>,
}

impl EntityView {
    pub fn new(x: f64, y: f64, sprite: u16, category: SpriteCategory) -> Self {
        Self {
            x,
            y,
            sprite: Some(sprite),
            category,
            visible: true,
            scale: None,
            vertical_offset: None,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_vertical_offset(mut self, offset: f64) -> Self {
        self.vertical_offset = Some(offset);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Implemented by anything that wants to show up as a billboard.
pub trait SpriteSource {
    fn entity_view(&self) -> EntityView;
}

impl SpriteSource for EntityView {
    fn entity_view(&self) -> EntityView {
        *self
    }
}

/// An entity projected on the screen.
#[derive(Clone, Copy, Debug)]
pub struct Billboard {
    pub sprite: u16,
    /// Raw distance to the camera.
    pub dist: f64,
    /// Fisheye-corrected distance (compared against the depth buffer).
    pub depth: f64,
    pub center_x: f64,
    pub width: f64,
    pub height: f64,
    pub top: f64,
    /// Horizontal span on screen: `[left_x, right_x)`.
    pub left_x: i32,
    pub right_x: i32,
}

impl Billboard {
    /// Project an entity on the screen. Returns None if it cannot be seen
    /// (hidden, no sprite, behind the camera / outside the field of view, off screen).
    pub fn project(
        view: &EntityView,
        camera: &Camera,
        sprite_size: (u16, u16),
        scale: f64,
        tile_size: f64,
        proj: &Projection,
    ) -> Option<Self> {
        let sprite = view.sprite?;
        if !view.visible || sprite_size.0 == 0 || sprite_size.1 == 0 {
            return None;
        }

        let dx = view.x - camera.x;
        let dy = view.y - camera.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < MIN_DEPTH {
            return None;
        }
        let angle_delta = normalize_angle(dy.atan2(dx) - camera.angle);
        if angle_delta.abs() > proj.half_fov {
            return None;
        }

        let depth = dist * angle_delta.cos();
        let center_x = proj.screen_x(angle_delta);
        let wall_height = proj.wall_height(depth, tile_size);
        let scale = view.scale.unwrap_or(scale);
        let height = (wall_height * scale).min(proj.max_sprite_height);
        let width = height * (sprite_size.0 as f64) / (sprite_size.1 as f64);
        let offset = view.vertical_offset.unwrap_or(0.0) * wall_height;
        let top = if view.category.stands_on_floor() {
            proj.horizon + wall_height * 0.5 - height - offset
        } else {
            proj.horizon - height * 0.5 - offset
        };

        let left_x = (center_x - width * 0.5).round() as i32;
        let right_x = left_x + (width.round() as i32).max(1);
        if right_x <= 0 || left_x >= proj.scr_width {
            return None;
        }

        Some(Self {
            sprite,
            dist,
            depth,
            center_x,
            width,
            height,
            top,
            left_x,
            right_x,
        })
    }
}

/// Sort billboards far-to-near, so nearer ones are painted over farther ones.
pub fn sort_far_to_near(billboards: &mut [Billboard]) {
    billboards.sort_by(|a, b| b.dist.partial_cmp(&a.dist).unwrap_or(std::cmp::Ordering::Equal));
}
