mod app;
mod config;
mod game;
mod geometry;
mod overlay;
mod render;
mod scene;

fn main() {
    env_logger::init();
    log::info!("Mushroom Meadow starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
