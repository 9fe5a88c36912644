//! ThreeDRenderer - renders the 3D view: background, walls + doors, then the billboards.
//!
//! The wall/door pass fills the depth buffer (one value per screen column); the billboard
//! pass only reads it. The billboard methods take `&self`, so they cannot write it.

use crate::*;

/// Depth used if a ray somehow produced garbage (e.g. a NaN camera position).
const FAR_DEPTH: f64 = 1e6;

/// Fallback color for walls without any texture.
const UNTEXTURED_WALL: u32 = 0xFF80_4020;

/// Per-column distance to the closest wall/door, for the current frame.
pub struct DepthBuffer(Vec<f64>);

impl DepthBuffer {
    pub fn new(columns: usize) -> Self {
        Self(vec![f64::INFINITY; columns])
    }

    #[inline]
    pub fn reset(&mut self) {
        self.0.fill(f64::INFINITY);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth at a screen column (infinitely far outside the screen).
    #[inline]
    pub fn get(&self, column: i32) -> f64 {
        if column < 0 {
            return f64::INFINITY;
        }
        self.0.get(column as usize).copied().unwrap_or(f64::INFINITY)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// True once every column holds a finite, positive depth.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|d| d.is_finite() && *d > 0.0)
    }

    #[inline]
    fn write(&mut self, column: i32, depth: f64) {
        if let Some(d) = self.0.get_mut(column as usize) {
            *d = depth;
        }
    }
}

pub struct ThreeDRenderer {
    config: RenderConfig,
    projection: Projection,
    ray_count: i32,
    depth: DepthBuffer,
}

impl ThreeDRenderer {
    pub fn new(config: RenderConfig, scr_width: i32, scr_height: i32) -> Result<Self, String> {
        config.validate()?;
        if scr_width <= 0 || scr_height <= 0 {
            return Err(format!("Invalid screen size: {scr_width}x{scr_height}"));
        }
        let ray_count = if config.ray_count == 0 { scr_width } else { config.ray_count };
        if ray_count > scr_width {
            return Err(format!("Cannot cast {ray_count} rays on {scr_width} screen columns"));
        }
        let projection = Projection::new(&config, scr_width, scr_height);
        Ok(Self {
            config,
            projection,
            ray_count,
            depth: DepthBuffer::new(scr_width as usize),
        })
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    pub fn ray_count(&self) -> i32 {
        self.ray_count
    }

    /// The depth buffer of the last rendered frame (read-only).
    #[inline]
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    #[inline]
    pub fn ray_angle(&self, camera: &Camera, ray_idx: i32) -> f64 {
        let p = &self.projection;
        camera.angle - p.half_fov + (ray_idx as f64) * (p.fov / (self.ray_count as f64))
    }

    /// Screen columns covered by one ray: `[from, to)`.
    #[inline]
    pub fn ray_span(&self, ray_idx: i32) -> (i32, i32) {
        let w = self.projection.scr_width as i64;
        let n = self.ray_count as i64;
        let idx = ray_idx as i64;
        ((idx * w / n) as i32, ((idx + 1) * w / n) as i32)
    }

    /// Render a whole frame. The level's doors must already be updated for this frame.
    pub fn render_frame(
        &mut self,
        level: &Level,
        camera: &Camera,
        textures: &TextureCache,
        entities: &[EntityView],
        scrbuf: &mut ScreenBuffer,
    ) {
        self.paint_background(scrbuf);
        self.render_walls(level, camera, textures, scrbuf);
        self.render_billboards(camera, level.tile_size(), textures, entities, scrbuf);
    }

    pub fn paint_background(&self, scrbuf: &mut ScreenBuffer) {
        let w = scrbuf.scr_width();
        let h = scrbuf.scr_height();
        let vertc = scrbuf.get_vert_center();
        scrbuf.fill_rect(0, 0, w, vertc, self.config.sky_color);
        scrbuf.fill_rect(0, vertc, w, h - vertc, self.config.floor_color);
    }

    /// The wall/door pass: resets the depth buffer, casts all rays, fills the depth buffer
    /// and paints the textured wall/door columns.
    pub fn render_walls(&mut self, level: &Level, camera: &Camera, textures: &TextureCache, scrbuf: &mut ScreenBuffer) {
        self.depth.reset();
        let mut raycaster = RayCaster::new(camera, level.tile_size());
        for ray_idx in 0..self.ray_count {
            let angle = self.ray_angle(camera, ray_idx);
            let hit = raycaster.cast_ray(angle, level);
            let depth = corrected_depth(hit.dist, angle - camera.angle);

            let (from_x, to_x) = self.ray_span(ray_idx);
            for x in from_x..to_x {
                self.depth.write(x, depth);
            }
            self.draw_hit(&hit, depth, from_x, to_x, level, textures, scrbuf);
        }
    }

    /// The billboard pass: project all entities (each with its category's scale), sort them
    /// far-to-near, then draw every column that is closer than the walls.
    /// Returns how many billboards got at least one column drawn.
    pub fn render_billboards(
        &self,
        camera: &Camera,
        tile_size: f64,
        textures: &TextureCache,
        entities: &[EntityView],
        scrbuf: &mut ScreenBuffer,
    ) -> usize {
        let mut billboards: Vec<Billboard> = entities
            .iter()
            .filter_map(|view| {
                let sprite = textures.sprite(view.sprite?)?;
                let scale = self.config.sprite_scale(view.category);
                Billboard::project(view, camera, sprite.size(), scale, tile_size, &self.projection)
            })
            .collect();
        sort_far_to_near(&mut billboards);

        let mut drawn = 0;
        for bb in billboards.iter() {
            if self.draw_billboard(bb, textures, scrbuf) {
                drawn += 1;
            }
        }
        drawn
    }

    //----------------

    #[allow(clippy::too_many_arguments)]
    fn draw_hit(
        &self,
        hit: &RayHit,
        depth: f64,
        from_x: i32,
        to_x: i32,
        level: &Level,
        textures: &TextureCache,
        scrbuf: &mut ScreenBuffer,
    ) {
        let (cx, cy) = hit.cell;
        let tex_id = match (hit.kind, hit.from_door_cell, self.config.door_frame_texture) {
            (HitKind::Wall, true, Some(frame_tex)) => frame_tex,
            _ => level.texture_id(cx, cy),
        };
        let tex_id = if tex_id == NO_TEXTURE { textures.default_wall() } else { tex_id };

        let height = self.projection.wall_height(depth, level.tile_size());
        let top = self.projection.horizon - height * 0.5;
        let shade = self.config.shade_x_sides && hit.side == HitSide::X;

        // doors are painted as wide as their slab, centered in the ray's span
        let (from_x, to_x) = match hit.kind {
            HitKind::Door => {
                let span = to_x - from_x;
                let w = (((span as f64) * hit.thickness).ceil() as i32).clamp(1, span.max(1));
                let x0 = from_x + (span - w) / 2;
                (x0, x0 + w)
            }
            HitKind::Wall => (from_x, to_x),
        };

        match textures.resolve_wall(tex_id) {
            Some(texture) => {
                let (tw, _) = texture.size();
                let tx = ((hit.tex_u * (tw as f64)) as i32).clamp(0, (tw as i32) - 1);
                let style = ColumnStyle {
                    transparent: false,
                    shade,
                };
                for x in from_x..to_x {
                    texture.render_column(tx, x, top, height, style, scrbuf);
                }
            }
            None => {
                let color = if shade { shade_color(UNTEXTURED_WALL) } else { UNTEXTURED_WALL };
                let y0 = top.max(0.0) as i32;
                let y1 = (top + height).ceil() as i32;
                scrbuf.fill_rect(from_x, y0, to_x - from_x, y1 - y0, color);
            }
        }
    }

    fn draw_billboard(&self, bb: &Billboard, textures: &TextureCache, scrbuf: &mut ScreenBuffer) -> bool {
        let Some(sprite) = textures.sprite(bb.sprite) else {
            return false;
        };
        let (sw, _) = sprite.size();
        let style = ColumnStyle {
            transparent: true,
            shade: false,
        };

        let from_x = bb.left_x.max(0);
        let to_x = bb.right_x.min(self.projection.scr_width);
        let span = (bb.right_x - bb.left_x) as f64;
        let mut any_drawn = false;
        for x in from_x..to_x {
            // occluded by a closer wall/door
            if !(bb.depth < self.depth.get(x)) {
                continue;
            }
            let src_x = (((x - bb.left_x) as f64) * (sw as f64) / span).floor() as i32;
            if sprite.render_column(src_x, x, bb.top, bb.height, style, scrbuf) {
                any_drawn = true;
            } else {
                log::trace!("sprite {}: column {src_x} out of bounds", bb.sprite);
            }
        }
        any_drawn
    }
}

/// Remove the fisheye effect: project the ray's length onto the view direction.
#[inline]
pub fn corrected_depth(raw_dist: f64, angle_delta: f64) -> f64 {
    let depth = raw_dist * angle_delta.cos();
    if depth.is_finite() {
        depth.max(MIN_DEPTH)
    } else {
        FAR_DEPTH
    }
}
