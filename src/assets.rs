//! Textures (walls + sprites) and the texture cache handed to the renderer.

use std::collections::HashMap;

use crate::{color_alpha, shade_color, ScreenBuffer};

/// A picture used for walls, doors and sprites.
/// Texels are ARGB, stored as columns, then rows (flipped), so one screen column
/// maps to one contiguous slice. Alpha 0 means transparent (sprites only).
pub struct Texture {
    width: u16,
    height: u16,
    texels: Vec<u32>,
}

/// How a texture column gets painted.
#[derive(Clone, Copy, Default)]
pub struct ColumnStyle {
    pub transparent: bool,
    pub shade: bool,
}

impl Texture {
    pub fn new(width: u16, height: u16, texels: Vec<u32>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid texture size: {width}x{height}"));
        }
        let len = (width as usize) * (height as usize);
        if texels.len() != len {
            return Err(format!("Texture {width}x{height} needs {len} texels, got {}", texels.len()));
        }
        Ok(Self { width, height, texels })
    }

    pub fn new_solid(width: u16, height: u16, color: u32) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    pub fn new_checker(width: u16, height: u16, cell: u16, color1: u32, color2: u32) -> Self {
        let cell = cell.max(1);
        Self::from_fn(width, height, |x, y| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                color1
            } else {
                color2
            }
        })
    }

    /// Base color with some random speckles, to make walls look less flat.
    pub fn new_noise(width: u16, height: u16, base: u32, rng: &mut fastrand::Rng) -> Self {
        Self::from_fn(width, height, |_, _| {
            let f = rng.u32(70..=100);
            let scale = |c: u32| ((c & 0xFF) * f / 100) & 0xFF;
            0xFF00_0000 | (scale(base >> 16) << 16) | (scale(base >> 8) << 8) | scale(base)
        })
    }

    /// A filled disc on a transparent background (simple sprite).
    pub fn new_disc(size: u16, color: u32) -> Self {
        let r = (size as f64) * 0.5;
        Self::from_fn(size, size, |x, y| {
            let dx = (x as f64) + 0.5 - r;
            let dy = (y as f64) + 0.5 - r;
            if dx * dx + dy * dy <= r * r {
                color
            } else {
                0
            }
        })
    }

    fn from_fn(width: u16, height: u16, mut f: impl FnMut(u16, u16) -> u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut texels = Vec::with_capacity((width as usize) * (height as usize));
        for x in 0..width {
            for y in 0..height {
                texels.push(f(x, y));
            }
        }
        Self { width, height, texels }
    }

    #[inline]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[inline]
    pub fn column(&self, x: i32) -> Option<&[u32]> {
        if x < 0 || x >= self.width as i32 {
            return None;
        }
        let h = self.height as usize;
        let start = (x as usize) * h;
        self.texels.get(start..start + h)
    }

    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> Option<u32> {
        if y < 0 {
            return None;
        }
        self.column(x).and_then(|col| col.get(y as usize).copied())
    }

    /// Render one column of the picture, stretched to `scaled_height` screen rows,
    /// starting at row `top` (which may be above the screen).
    /// Returns false if the source column does not exist.
    pub fn render_column(
        &self,
        src_x: i32,
        screen_x: i32,
        top: f64,
        scaled_height: f64,
        style: ColumnStyle,
        scrbuf: &mut ScreenBuffer,
    ) -> bool {
        let Some(column) = self.column(src_x) else {
            return false;
        };
        if screen_x < 0 || screen_x >= scrbuf.scr_width() || scaled_height <= 0.0 {
            // the column is outside the screen => no need to paint it :)
            return true;
        }

        let scrh = scrbuf.scr_height();
        let y_start = top.max(0.0).floor() as i32;
        let y_end = ((top + scaled_height).min(scrh as f64).ceil() as i32).min(scrh);
        let fstep = (self.height as f64) / scaled_height;

        for y in y_start..y_end {
            let ty = (((y as f64) + 0.5 - top) * fstep).floor();
            if ty < 0.0 || ty >= self.height as f64 {
                continue;
            }
            let texel = column[ty as usize];
            if style.transparent && color_alpha(texel) == 0 {
                continue;
            }
            let color = if style.shade { shade_color(texel) } else { texel };
            scrbuf.put_pixel(screen_x, y, color);
        }
        true
    }
}

//-----------------------

/// All textures the renderer needs, keyed by tile id (walls/doors) or sprite id.
/// Owned by whoever loads the level, and passed to the renderer on each frame.
pub struct TextureCache {
    walls: HashMap<u16, Texture>,
    sprites: HashMap<u16, Texture>,
    default_wall: u16,
}

impl TextureCache {
    pub fn new(default_wall: u16) -> Self {
        Self {
            walls: HashMap::new(),
            sprites: HashMap::new(),
            default_wall,
        }
    }

    pub fn add_wall(&mut self, id: u16, texture: Texture) {
        self.walls.insert(id, texture);
    }

    pub fn add_sprite(&mut self, id: u16, texture: Texture) {
        self.sprites.insert(id, texture);
    }

    #[inline]
    pub fn default_wall(&self) -> u16 {
        self.default_wall
    }

    #[inline]
    pub fn wall(&self, id: u16) -> Option<&Texture> {
        self.walls.get(&id)
    }

    #[inline]
    pub fn sprite(&self, id: u16) -> Option<&Texture> {
        self.sprites.get(&id)
    }

    /// The wall texture for an id, or the default wall texture if it is missing.
    pub fn resolve_wall(&self, id: u16) -> Option<&Texture> {
        self.walls.get(&id).or_else(|| {
            log::trace!("missing wall texture {id}, using default {}", self.default_wall);
            self.walls.get(&self.default_wall)
        })
    }

    /// Check that the default wall texture exists (otherwise walls can render as plain color).
    pub fn check(&self) -> bool {
        let ok = self.walls.contains_key(&self.default_wall);
        if !ok {
            log::warn!("default wall texture {} is missing", self.default_wall);
        }
        ok
    }
}
