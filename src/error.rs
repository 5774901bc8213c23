//! Error types for startup, rendering and screenshot capture.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter found")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("readback callback was dropped before completing")]
    ChannelClosed,

    #[error("readback buffer holds {actual} bytes, expected at least {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
