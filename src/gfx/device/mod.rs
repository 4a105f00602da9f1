//! # Render Device Binding
//!
//! A device is the graphics context bound to one [`RenderSurface`]. It is created
//! once per surface, resized whenever the surface changes size, and disposed as
//! the very last step of scene teardown.
//!
//! The binding layer is backend agnostic:
//!
//! - [`RenderDevice`] - what the scene host needs from a device
//! - [`DeviceFactory`] - how a device is created for a given surface type
//! - [`DeviceBinding`] - owns the device, tracks disposal and the drawing buffer size
//!
//! The wgpu device lives in [`crate::gfx::rendering`]; an offscreen recording
//! device lives in [`headless`].

pub mod headless;

use crate::{
    config::EngineOptions,
    error::{Error, Result},
    gfx::{
        scene::Graph,
        surface::{RenderSurface, SurfaceId, SurfaceSize},
    },
};

/// Operations the scene host performs on a graphics device
pub trait RenderDevice {
    /// Resizes the drawing buffer
    fn resize(&mut self, size: SurfaceSize);

    /// Current drawing buffer size
    fn drawing_buffer_size(&self) -> SurfaceSize;

    /// Draws one frame of the graph using its active camera
    ///
    /// Fails with [`Error::NoActiveCamera`] when the graph has none.
    fn render(&mut self, graph: &Graph) -> Result<()>;

    /// Releases all GPU-side resources
    fn dispose(&mut self);
}

/// Creates devices for surfaces of type `S`
pub trait DeviceFactory<S: RenderSurface> {
    type Device: RenderDevice;

    fn create_device(
        &self,
        surface: &S,
        options: &EngineOptions,
        buffer_size: SurfaceSize,
    ) -> Result<Self::Device>;
}

/// A device bound to a surface
///
/// Owns the device exclusively; nothing else may dispose it.
pub struct DeviceBinding<D: RenderDevice> {
    device: D,
    surface_id: SurfaceId,
    physical_size: SurfaceSize,
    scale_factor: f64,
    adapt_to_device_ratio: bool,
    disposed: bool,
}

impl<D: RenderDevice> DeviceBinding<D> {
    /// Creates a device for `surface`
    ///
    /// # Errors
    /// Returns [`Error::SurfaceUnavailable`] when no surface is given, and
    /// propagates any device creation failure.
    pub fn create<S, F>(surface: Option<&S>, factory: &F, options: &EngineOptions) -> Result<Self>
    where
        S: RenderSurface,
        F: DeviceFactory<S, Device = D>,
    {
        let surface = surface.ok_or(Error::SurfaceUnavailable)?;

        let physical_size = surface.physical_size();
        let scale_factor = surface.scale_factor();
        let buffer_size =
            physical_size.drawing_buffer(scale_factor, options.adapt_to_device_ratio);

        let device = factory.create_device(surface, options, buffer_size)?;
        log::info!(
            "Device bound to surface {} ({}x{}, antialias: {})",
            surface.id().raw(),
            buffer_size.width,
            buffer_size.height,
            options.antialias
        );

        Ok(Self {
            device,
            surface_id: surface.id(),
            physical_size,
            scale_factor,
            adapt_to_device_ratio: options.adapt_to_device_ratio,
            disposed: false,
        })
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn physical_size(&self) -> SurfaceSize {
        self.physical_size
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Resizes the device to match the surface's new physical size
    pub fn resize_to(&mut self, physical_size: SurfaceSize, scale_factor: f64) {
        self.physical_size = physical_size;
        self.scale_factor = scale_factor;

        let buffer_size = physical_size.drawing_buffer(scale_factor, self.adapt_to_device_ratio);
        self.device.resize(buffer_size);
    }

    /// Maps a position in physical surface pixels to drawing buffer pixels
    pub fn to_buffer_coords(&self, x: f32, y: f32) -> (f32, f32) {
        let buffer = self.device.drawing_buffer_size();
        if self.physical_size.is_empty() {
            return (x, y);
        }
        (
            x * buffer.width as f32 / self.physical_size.width as f32,
            y * buffer.height as f32 / self.physical_size.height as f32,
        )
    }

    /// Renders one frame, refusing to touch a disposed device
    pub fn render(&mut self, graph: &Graph) -> Result<()> {
        if self.disposed {
            return Err(Error::DeviceDisposed);
        }
        self.device.render(graph)
    }

    /// Disposes the device; returns false if it was already disposed
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            log::debug!("Device for surface {} already disposed", self.surface_id.raw());
            return false;
        }

        self.device.dispose();
        self.disposed = true;
        log::info!("Device for surface {} disposed", self.surface_id.raw());
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<D: RenderDevice> Drop for DeviceBinding<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        headless::{CallLog, HeadlessDeviceFactory, HeadlessSurface},
        *,
    };

    #[test]
    fn test_missing_surface_is_fatal() {
        let factory = HeadlessDeviceFactory::new(CallLog::new());
        let result = DeviceBinding::create(
            None::<&HeadlessSurface>,
            &factory,
            &EngineOptions::default(),
        );

        assert!(matches!(result, Err(Error::SurfaceUnavailable)));
        assert!(factory.log().is_empty());
    }

    #[test]
    fn test_dispose_runs_once() {
        let log = CallLog::new();
        let factory = HeadlessDeviceFactory::new(log.clone());
        let surface = HeadlessSurface::new(800, 600);
        let mut binding =
            DeviceBinding::create(Some(&surface), &factory, &EngineOptions::default()).unwrap();

        assert!(binding.dispose());
        assert!(!binding.dispose());
        drop(binding);

        assert_eq!(log.count("device.dispose"), 1);
    }

    #[test]
    fn test_buffer_size_respects_device_ratio() {
        let factory = HeadlessDeviceFactory::new(CallLog::new());
        let surface = HeadlessSurface::new(1600, 1200).with_scale_factor(2.0);

        let logical =
            DeviceBinding::create(Some(&surface), &factory, &EngineOptions::default()).unwrap();
        assert_eq!(
            logical.device().drawing_buffer_size(),
            SurfaceSize::new(800, 600)
        );
        assert_eq!(logical.to_buffer_coords(400.0, 300.0), (200.0, 150.0));

        let physical = DeviceBinding::create(
            Some(&surface),
            &factory,
            &EngineOptions::default().with_adapt_to_device_ratio(true),
        )
        .unwrap();
        assert_eq!(
            physical.device().drawing_buffer_size(),
            SurfaceSize::new(1600, 1200)
        );
    }

    #[test]
    fn test_render_after_dispose_is_rejected() {
        let factory = HeadlessDeviceFactory::new(CallLog::new());
        let surface = HeadlessSurface::new(320, 240);
        let mut binding =
            DeviceBinding::create(Some(&surface), &factory, &EngineOptions::default()).unwrap();
        let graph = Graph::new(Default::default());

        binding.dispose();
        assert!(matches!(binding.render(&graph), Err(Error::DeviceDisposed)));
    }
}
