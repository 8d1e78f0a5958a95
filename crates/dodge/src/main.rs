//! Dodge binary
//!
//! `dodge [config.toml|config.ron]`

use dodge::{DodgeConfig, DodgeGame};
use pose_engine::config::Config;
use pose_engine::foundation::logging;
use pose_engine::present::create_presenter;
use pose_engine::Engine;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::install_panic_hook();
    logging::init();

    log::info!("Starting dodge...");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DodgeConfig::load_or_default(config_path.as_deref())?;
    config.validate()?;

    let presenter = create_presenter(&config.session.presentation)?;
    let mut cameras = config.session.video.camera_provider();
    let loader = config.session.detection.pose_loader()?;

    let mut game = DodgeGame::new(&config)?;
    let mut engine = Engine::start(config.session.clone(), cameras.as_mut(), loader, presenter)?;
    engine.run(&mut game)?;

    log::info!("Dodge finished with score {}", game.score());
    Ok(())
}
