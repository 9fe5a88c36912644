//! Thin SDL2 wrapper: window, event pump, frame timing, and pushing the ScreenBuffer to the window.

use std::time::Duration;

use sdl2::event::Event;
use sdl2::pixels::PixelFormatEnum;

use crate::Painter;

/// What to do between frames, to avoid burning a full CPU core.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy)]
pub enum SleepKind {
    NONE,
    YIELD,
    SLEEP(u64),
}

pub struct SdlConfiguration {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub pixel_size: i32,
    pub sleep_kind: SleepKind,
}

impl SdlConfiguration {
    pub fn new(title: &str, width: i32, height: i32, pixel_size: i32, sleep_kind: SleepKind) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            pixel_size: pixel_size.max(1),
            sleep_kind,
        }
    }
}

/// Implemented by the game: handle events, update the state, paint the frame.
pub trait GraphicsLoop {
    /// Returns false to quit.
    fn handle_event(&mut self, event: &Event) -> bool;
    /// Returns false to quit.
    fn update_state(&mut self, elapsed_time: f64) -> bool;
    fn paint(&self, painter: &mut dyn Painter);
}

pub fn run_game_loop(config: &SdlConfiguration, gameloop: &mut dyn GraphicsLoop) -> Result<(), String> {
    if config.width <= 0 || config.height <= 0 {
        return Err(format!("Invalid screen size: {}x{}", config.width, config.height));
    }
    let width = config.width as u32;
    let height = config.height as u32;
    let pixel_size = config.pixel_size as u32;

    let sdl_context = sdl2::init()?;
    let video = sdl_context.video()?;
    let window = video
        .window(&config.title, width * pixel_size, height * pixel_size)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let mut canvas = window.into_canvas().accelerated().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
        .map_err(|e| e.to_string())?;
    let mut event_pump = sdl_context.event_pump()?;
    let timer = sdl_context.timer()?;

    let mut painter = SdlPainter {
        width: config.width,
        height: config.height,
        pixels: vec![0; (width * height * 3) as usize],
    };
    let freq = timer.performance_frequency() as f64;
    let mut last_time = timer.performance_counter();
    log::info!("SDL window opened: {}x{} (pixel size {})", width, height, pixel_size);

    'running: loop {
        for event in event_pump.poll_iter() {
            if let Event::Quit { .. } = event {
                break 'running;
            }
            if !gameloop.handle_event(&event) {
                break 'running;
            }
        }

        let now = timer.performance_counter();
        let elapsed_time = (now - last_time) as f64 / freq;
        last_time = now;
        if !gameloop.update_state(elapsed_time) {
            break 'running;
        }

        gameloop.paint(&mut painter);
        texture
            .update(None, &painter.pixels, (width * 3) as usize)
            .map_err(|e| e.to_string())?;
        canvas.copy(&texture, None, None)?;
        canvas.present();

        match config.sleep_kind {
            SleepKind::NONE => {}
            SleepKind::YIELD => std::thread::yield_now(),
            SleepKind::SLEEP(ms) => std::thread::sleep(Duration::from_millis(ms)),
        }
    }

    Ok(())
}

//----------------------
//  Internal stuff

struct SdlPainter {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl Painter for SdlPainter {
    #[inline]
    fn draw_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            let idx = ((y * self.width + x) * 3) as usize;
            self.pixels[idx] = (color >> 16) as u8;
            self.pixels[idx + 1] = (color >> 8) as u8;
            self.pixels[idx + 2] = color as u8;
        }
    }
}
