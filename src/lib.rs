//! ROLFCAST - the raycasting core of a WOLF3D-style renderer :)
//! Main library.
//!
//! Per frame: update the level (door timers) -> cast the walls/doors (fills the depth buffer)
//! -> draw the billboards (reads the depth buffer).

mod assets;
mod billboard;
mod config;
mod defs;
mod door;
mod level;
mod maploader;
mod raycaster;
mod render3d;
mod scrbuf;
mod tilegrid;
mod utils;

#[cfg(feature = "sdl")]
mod gameloop;
#[cfg(feature = "sdl")]
mod input;
#[cfg(feature = "sdl")]
mod sdl_wrapper;

pub use assets::*;
pub use billboard::*;
pub use config::*;
pub use defs::*;
pub use door::*;
pub use level::*;
pub use maploader::*;
pub use raycaster::*;
pub use render3d::*;
pub use scrbuf::*;
pub use tilegrid::*;
pub use utils::*;

#[cfg(feature = "sdl")]
pub use gameloop::*;
#[cfg(feature = "sdl")]
pub use input::*;
#[cfg(feature = "sdl")]
pub use sdl_wrapper::*;
