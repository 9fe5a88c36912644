//! InputManager - knows which keys are held, which key presses were not yet consumed,
//! and how far the mouse moved since the last frame.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use std::collections::HashMap;

pub struct InputManager {
    // held keys -> "press not yet consumed" flag
    pressed: HashMap<Keycode, bool>,
    mouse_rel_x: i32,
    pixel_size: i32,
}

impl InputManager {
    pub fn new(pixel_size: i32) -> Self {
        Self {
            pressed: HashMap::new(),
            mouse_rel_x: 0,
            pixel_size: pixel_size.max(1),
        }
    }

    /// Is the key currently held down?
    #[inline]
    pub fn key(&self, key: Keycode) -> bool {
        self.pressed.contains_key(&key)
    }

    /// True once per key press (for "use", toggles etc).
    pub fn consume_key(&mut self, key: Keycode) -> bool {
        match self.pressed.get_mut(&key) {
            Some(fresh) => std::mem::replace(fresh, false),
            None => false,
        }
    }

    /// Horizontal mouse movement since the last call, in screen pixels.
    #[inline]
    pub fn consume_mouse_motion(&mut self) -> i32 {
        std::mem::take(&mut self.mouse_rel_x)
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::KeyDown { keycode: Some(key), .. } => {
                self.pressed.entry(*key).or_insert(true);
            }
            Event::KeyUp { keycode: Some(key), .. } => {
                self.pressed.remove(key);
            }
            Event::MouseMotion { xrel, .. } => {
                self.mouse_rel_x += *xrel / self.pixel_size;
            }
            _ => {}
        }
    }
}
