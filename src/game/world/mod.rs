pub mod app;
pub mod camera;
pub mod castles;
pub mod props;
pub mod scene;

pub use app::App;
pub use camera::Camera;
pub use props::{Color, Prop};
pub use scene::{Scene, SceneKind};
