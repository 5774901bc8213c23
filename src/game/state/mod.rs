pub mod game_state;
pub mod hud;

pub use game_state::{Banner, BannerKind, GameState};
pub use hud::Hud;
