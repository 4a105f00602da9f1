//! Error types for the Glint viewer.

use thiserror::Error;

/// Main error type for the viewer.
#[derive(Error, Debug)]
pub enum Error {
    /// No drawable surface existed when the device was created.
    ///
    /// Device creation is aborted; nothing is retried.
    #[error("no drawable surface is available to bind a device to")]
    SurfaceUnavailable,

    /// No graphics adapter is compatible with the surface
    #[error("no compatible graphics adapter found: {0}")]
    AdapterUnavailable(String),

    /// The adapter refused the device request
    #[error("device request failed: {0}")]
    DeviceRequest(String),

    /// The windowing surface could not be created
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),

    /// The next swapchain texture could not be acquired
    #[error("could not acquire surface texture: {0}")]
    SurfaceTexture(String),

    /// A frame was requested while the graph has no active camera
    #[error("the scene has no active camera")]
    NoActiveCamera,

    /// The device was used after `dispose`
    #[error("device has been disposed")]
    DeviceDisposed,

    /// Event loop creation or execution errors
    #[error("event loop error: {0}")]
    EventLoop(String),
}

/// Result type alias using the viewer's Error type.
pub type Result<T> = std::result::Result<T, Error>;
