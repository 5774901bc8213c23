pub mod mesh;
pub mod overlay;
pub mod renderer;
pub mod screenshot;
pub mod texture;
pub mod vertex;

pub use mesh::Primitive;
pub use overlay::{Overlay, OverlayFrame};
pub use renderer::{RenderMode, Renderer};
pub use texture::{Material, Texture};
pub use vertex::Vertex;
