//! Third-person walk around a castle courtyard with spinning coins.

use castle::SceneKind;
use log::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("Logger initialized");

    if let Err(e) = castle::run(SceneKind::Platformer) {
        error!("Application error: {}", e);
        return Err(Box::new(e));
    }
    Ok(())
}
