//! Offscreen device
//!
//! [`HeadlessDevice`] draws nothing. It records every resize, frame and disposal
//! into a shared [`CallLog`], which makes the ordering of device calls relative to
//! camera and listener calls observable without a GPU.

use std::{cell::RefCell, rc::Rc};

use crate::{
    config::EngineOptions,
    error::{Error, Result},
    gfx::{
        device::{DeviceFactory, RenderDevice},
        scene::{Graph, ObjectId},
        surface::{RenderSurface, SurfaceId, SurfaceSize},
    },
};

/// Shared, ordered log of calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Number of entries equal to `entry`
    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.as_str() == entry).count()
    }

    /// Index of the first entry equal to `entry`
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A surface with a fixed, externally controlled size
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    id: SurfaceId,
    size: SurfaceSize,
    scale_factor: f64,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: SurfaceId::next(),
            size: SurfaceSize::new(width, height),
            scale_factor: 1.0,
        }
    }

    /// Builder pattern: Set the physical/logical pixel ratio
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = SurfaceSize::new(width, height);
    }
}

impl RenderSurface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn physical_size(&self) -> SurfaceSize {
        self.size
    }

    fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

/// One object drawn in a recorded frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub object: ObjectId,
    pub name: String,
    pub outlined: bool,
}

/// Offscreen device that records instead of drawing
pub struct HeadlessDevice {
    size: SurfaceSize,
    sample_count: u32,
    log: CallLog,
    frames: u64,
    last_frame: Vec<DrawRecord>,
    disposed: bool,
}

impl HeadlessDevice {
    pub fn new(size: SurfaceSize, log: CallLog) -> Self {
        Self {
            size,
            sample_count: 1,
            log,
            frames: 0,
            last_frame: Vec::new(),
            disposed: false,
        }
    }

    /// Number of frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Objects drawn in the most recent frame, in draw order
    pub fn last_frame(&self) -> &[DrawRecord] {
        &self.last_frame
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

impl RenderDevice for HeadlessDevice {
    fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.size = size;
        self.log
            .record(format!("device.resize {}x{}", size.width, size.height));
    }

    fn drawing_buffer_size(&self) -> SurfaceSize {
        self.size
    }

    fn render(&mut self, graph: &Graph) -> Result<()> {
        if self.disposed {
            return Err(Error::DeviceDisposed);
        }
        if !graph.has_active_camera() {
            return Err(Error::NoActiveCamera);
        }

        self.last_frame = graph
            .objects()
            .iter()
            .filter(|object| object.visible)
            .map(|object| DrawRecord {
                object: object.id(),
                name: object.name.clone(),
                outlined: object.is_outlined(),
            })
            .collect();
        self.frames += 1;
        self.log.record("device.render");
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.last_frame.clear();
        self.log.record("device.dispose");
    }
}

/// Creates [`HeadlessDevice`]s sharing one call log
#[derive(Debug, Clone, Default)]
pub struct HeadlessDeviceFactory {
    log: CallLog,
}

impl HeadlessDeviceFactory {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

impl DeviceFactory<HeadlessSurface> for HeadlessDeviceFactory {
    type Device = HeadlessDevice;

    fn create_device(
        &self,
        _surface: &HeadlessSurface,
        options: &EngineOptions,
        buffer_size: SurfaceSize,
    ) -> Result<HeadlessDevice> {
        let mut device = HeadlessDevice::new(buffer_size, self.log.clone());
        device.sample_count = if options.antialias { 4 } else { 1 };
        self.log.record("device.create");
        Ok(device)
    }
}
