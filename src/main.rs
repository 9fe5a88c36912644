//! ROLFCAST demo - walk around a small level, open doors, look at some billboards :)
//! Main starting point.

use rolfcast::*;

const SCR_WIDTH: i32 = 640;
const SCR_HEIGHT: i32 = 400;
const PIXEL_SIZE: i32 = 2;
const SLEEP_KIND: SleepKind = SleepKind::SLEEP(1);

const DEMO_MAP: [&str; 12] = [
    "################",
    "#......#.......#",
    "#.>....|...2...#",
    "#......#.......#",
    "###-####...2...#",
    "#......#.......#",
    "#......####-####",
    "#..3...#.......#",
    "#......|.......#",
    "#..3...#...4...#",
    "#......#.......#",
    "################",
];

// sprite ids
const SPR_PICKUP: u16 = 1;
const SPR_ENEMY: u16 = 2;
const SPR_PROJECTILE: u16 = 3;
const SPR_EFFECT_1: u16 = 4;
const SPR_EFFECT_2: u16 = 5;

fn main() {
    log::set_logger(&STDOUT_LOGGER)
        .map(|()| log::set_max_level(log::LevelFilter::Info))
        .unwrap_or_else(|e| println!("Failed to install logger: {e}"));

    match run_demo() {
        Ok(_) => println!("ROLFCAST finished OK :)"),
        Err(msg) => println!("ERROR in ROLFCAST: {msg}"),
    }
}

fn run_demo() -> Result<(), String> {
    let map = parse_ascii_map_default("demo", &DEMO_MAP)?;
    let textures = build_textures();
    let things = build_things(map.tile_size);
    let config = RenderConfig {
        door_frame_texture: Some(9),
        ..RenderConfig::default()
    };

    let sdl_config = SdlConfiguration::new("ROLFCAST", SCR_WIDTH, SCR_HEIGHT, PIXEL_SIZE, SLEEP_KIND);
    let mut gameloop = GameLoop::new(SCR_WIDTH, SCR_HEIGHT, PIXEL_SIZE, config, &map, textures, things)?;
    run_game_loop(&sdl_config, &mut gameloop)
}

/// No asset files: every texture is generated.
fn build_textures() -> TextureCache {
    let mut rng = fastrand::Rng::with_seed(0x0F_3D);
    let mut textures = TextureCache::new(1);
    textures.add_wall(1, Texture::new_noise(64, 64, rgb(0x60, 0x60, 0x70), &mut rng));
    textures.add_wall(2, Texture::new_checker(64, 64, 16, rgb(0x20, 0x40, 0xA0), rgb(0x18, 0x30, 0x80)));
    textures.add_wall(3, Texture::new_noise(64, 64, rgb(0x70, 0x48, 0x20), &mut rng));
    textures.add_wall(4, Texture::new_checker(64, 64, 8, rgb(0x80, 0x80, 0x80), rgb(0x50, 0x50, 0x50)));
    textures.add_wall(9, Texture::new_solid(64, 64, rgb(0x40, 0x40, 0x40)));
    textures.add_wall(ASCII_DOOR_TILE, Texture::new_checker(64, 64, 32, rgb(0x00, 0x80, 0x80), rgb(0x00, 0x60, 0x60)));

    textures.add_sprite(SPR_PICKUP, Texture::new_disc(64, rgb(0xF0, 0xD0, 0x20)));
    textures.add_sprite(SPR_ENEMY, Texture::new_disc(64, rgb(0xC0, 0x20, 0x20)));
    textures.add_sprite(SPR_PROJECTILE, Texture::new_disc(32, rgb(0xFF, 0x80, 0x00)));
    textures.add_sprite(SPR_EFFECT_1, Texture::new_disc(64, rgb(0xFF, 0xFF, 0xFF)));
    textures.add_sprite(SPR_EFFECT_2, Texture::new_disc(48, rgb(0xFF, 0xC0, 0x40)));
    textures
}

fn build_things(ts: f64) -> Vec<Thing> {
    let at = |cx: f64, cy: f64| ((cx + 0.5) * ts, (cy + 0.5) * ts);
    let (x, y) = at(5.0, 2.0);
    let pickup = EntityView::new(x, y, SPR_PICKUP, SpriteCategory::Pickup);
    let (x, y) = at(13.0, 2.0);
    let enemy = EntityView::new(x, y, SPR_ENEMY, SpriteCategory::Enemy);
    let (x, y) = at(9.0, 8.0);
    let projectile = EntityView::new(x, y, SPR_PROJECTILE, SpriteCategory::Projectile);
    let (x, y) = at(4.0, 5.0);
    let effect = EntityView::new(x, y, SPR_EFFECT_1, SpriteCategory::Effect).with_vertical_offset(0.2);

    vec![
        Thing::still(pickup),
        Thing::still(enemy),
        Thing::moving(projectile, (1.0, 0.0)),
        Thing::animated(effect, vec![SPR_EFFECT_1, SPR_EFFECT_2]),
    ]
}

//----------------------
//  Logging

struct StdoutLogger;

static STDOUT_LOGGER: StdoutLogger = StdoutLogger;

impl log::Log for StdoutLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}
