//! Block castle on a grass plane, seen from a fixed camera.

use castle::SceneKind;
use log::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("Logger initialized");

    if let Err(e) = castle::run(SceneKind::Blocks) {
        error!("Application error: {}", e);
        return Err(Box::new(e));
    }
    Ok(())
}
