//! Viewer configuration
//!
//! Option structs recognised when the device, the graph and the scene host are
//! created. All of them implement [`Default`] and follow the builder pattern, so a
//! typical host is configured as:
//!
//! ```no_run
//! use glint::config::{EngineOptions, HostOptions};
//!
//! let options = HostOptions::default()
//!     .with_engine(EngineOptions::default().with_antialias(true))
//!     .with_observe_canvas_resize(true);
//! ```

/// Options passed through untouched to device creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceOptions {
    pub power_preference: wgpu::PowerPreference,
    /// Waits for vertical blank when presenting
    pub vsync: bool,
    pub max_texture_dimension_2d: u32,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::default(),
            vsync: true,
            max_texture_dimension_2d: 4096,
        }
    }
}

impl DeviceOptions {
    /// Builder pattern: Set adapter power preference
    pub fn with_power_preference(mut self, power_preference: wgpu::PowerPreference) -> Self {
        self.power_preference = power_preference;
        self
    }

    /// Builder pattern: Enable or disable vsync
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

/// Device creation options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Request multisampled rendering (4x) when the adapter supports it
    pub antialias: bool,
    pub device: DeviceOptions,
    /// Render at physical pixel resolution instead of logical resolution
    pub adapt_to_device_ratio: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            antialias: false,
            device: DeviceOptions::default(),
            adapt_to_device_ratio: false,
        }
    }
}

impl EngineOptions {
    /// Builder pattern: Enable or disable antialiasing
    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    /// Builder pattern: Set device passthrough options
    pub fn with_device(mut self, device: DeviceOptions) -> Self {
        self.device = device;
        self
    }

    /// Builder pattern: Render at physical resolution
    pub fn with_adapt_to_device_ratio(mut self, adapt: bool) -> Self {
        self.adapt_to_device_ratio = adapt;
        self
    }
}

/// Options passed through to graph creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// RGBA clear colour of every frame
    pub clear_color: [f64; 4],
    /// Scene ambient colour, multiplied with material ambient colour
    pub ambient_color: [f32; 3],
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.2, 0.3, 1.0],
            ambient_color: [0.0, 0.0, 0.0],
        }
    }
}

impl SceneOptions {
    /// Builder pattern: Set the clear colour
    pub fn with_clear_color(mut self, r: f64, g: f64, b: f64, a: f64) -> Self {
        self.clear_color = [r, g, b, a];
        self
    }

    /// Builder pattern: Set the scene ambient colour
    pub fn with_ambient_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient_color = [r, g, b];
        self
    }
}

/// Options recognised by [`SceneHost`](crate::host::SceneHost)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostOptions {
    pub engine: EngineOptions,
    pub scene: SceneOptions,
    /// Resize the device whenever the surface changes size (default: true)
    pub observe_canvas_resize: bool,
    /// Hold back child components until the graph is ready (default: false)
    pub render_children_when_ready: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            engine: EngineOptions::default(),
            scene: SceneOptions::default(),
            observe_canvas_resize: true,
            render_children_when_ready: false,
        }
    }
}

impl HostOptions {
    /// Builder pattern: Set device creation options
    pub fn with_engine(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }

    /// Builder pattern: Set graph creation options
    pub fn with_scene(mut self, scene: SceneOptions) -> Self {
        self.scene = scene;
        self
    }

    /// Builder pattern: Enable or disable surface size observation
    pub fn with_observe_canvas_resize(mut self, observe: bool) -> Self {
        self.observe_canvas_resize = observe;
        self
    }

    /// Builder pattern: Defer child components until the graph is ready
    pub fn with_render_children_when_ready(mut self, defer: bool) -> Self {
        self.render_children_when_ready = defer;
        self
    }
}

/// What the host environment is able to deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Surface-level size notifications are available
    pub surface_observer: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            surface_observer: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_defaults() {
        let options = HostOptions::default();
        assert!(options.observe_canvas_resize);
        assert!(!options.render_children_when_ready);
        assert!(!options.engine.antialias);
        assert!(options.engine.device.vsync);
    }

    #[test]
    fn test_builders_chain() {
        let options = HostOptions::default()
            .with_engine(
                EngineOptions::default()
                    .with_antialias(true)
                    .with_adapt_to_device_ratio(true),
            )
            .with_scene(SceneOptions::default().with_clear_color(0.0, 0.0, 0.0, 1.0))
            .with_observe_canvas_resize(false)
            .with_render_children_when_ready(true);

        assert!(options.engine.antialias);
        assert!(options.engine.adapt_to_device_ratio);
        assert_eq!(options.scene.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert!(!options.observe_canvas_resize);
        assert!(options.render_children_when_ready);
    }
}
