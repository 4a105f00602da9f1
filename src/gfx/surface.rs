//! Drawable surfaces
//!
//! A surface is the region a frame is rendered into. It is owned by whatever
//! created it (usually a winit window) and only borrowed by the device that is
//! bound to it.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use winit::window::Window;

/// Stable identity of a surface, used when attaching input control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocates a process-unique surface id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Width and height of a surface or drawing buffer in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (minimised window)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Aspect ratio, falling back to 1.0 for empty sizes
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Size of the drawing buffer for a surface of this physical size
    ///
    /// With `adapt_to_device_ratio` the buffer matches physical pixels,
    /// otherwise it matches logical pixels (never below 1x1).
    pub fn drawing_buffer(&self, scale_factor: f64, adapt_to_device_ratio: bool) -> SurfaceSize {
        if adapt_to_device_ratio || scale_factor <= 0.0 {
            return *self;
        }

        let scale = |v: u32| ((v as f64 / scale_factor).round() as u32).max(1);
        SurfaceSize::new(scale(self.width), scale(self.height))
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// A drawable region a device can be bound to
pub trait RenderSurface {
    fn id(&self) -> SurfaceId;

    /// Current size in physical pixels
    fn physical_size(&self) -> SurfaceSize;

    /// Physical pixels per logical pixel
    fn scale_factor(&self) -> f64;
}

/// A winit window used as render surface
#[derive(Clone)]
pub struct WindowSurface {
    id: SurfaceId,
    window: Arc<Window>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            id: SurfaceId::next(),
            window,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl RenderSurface for WindowSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn physical_size(&self) -> SurfaceSize {
        self.window.inner_size().into()
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}
