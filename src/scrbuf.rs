//! ScreenBuffer - the frame being rendered, as ARGB pixels.

/// Anything that can show the finished frame, pixel by pixel (e.g. an SDL texture).
pub trait Painter {
    fn draw_pixel(&mut self, x: i32, y: i32, color: u32);
}

pub struct ScreenBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u32>,
}

impl ScreenBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn scr_width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn scr_height(&self) -> i32 {
        self.height
    }

    /// The horizon line.
    #[inline]
    pub fn get_vert_center(&self) -> i32 {
        self.height / 2
    }

    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        if x0 >= x1 {
            return;
        }
        for yy in y0..y1 {
            let row = (yy * self.width) as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    pub fn paint(&self, painter: &mut dyn Painter) {
        let mut idx = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                painter.draw_pixel(x, y, self.pixels[idx]);
                idx += 1;
            }
        }
    }
}
