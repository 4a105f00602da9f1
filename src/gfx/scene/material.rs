//! Materials assigned to renderable objects
//!
//! Two kinds exist: [`StandardMaterial`]s authored during scene setup, and the
//! transient [`OutlineMaterial`] the hover highlighter creates for the object
//! under the pointer. Objects hold a shared [`MaterialRef`]; identity (not value)
//! is what restore logic compares.

use std::sync::Arc;

/// Shared handle to a material
pub type MaterialRef = Arc<Material>;

/// Lit material with diffuse and ambient colour
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    pub diffuse_color: [f32; 3],
    pub ambient_color: [f32; 3],
    pub alpha: f32,
}

impl StandardMaterial {
    /// Creates a white, opaque material
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            diffuse_color: [1.0, 1.0, 1.0],
            ambient_color: [0.0, 0.0, 0.0],
            alpha: 1.0,
        }
    }

    /// Builder pattern: Set diffuse colour from RGB values
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse_color = [r, g, b];
        self
    }

    /// Builder pattern: Set ambient colour from RGB values
    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient_color = [r, g, b];
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Wraps the material in a shareable handle
    pub fn into_ref(self) -> MaterialRef {
        Arc::new(Material::Standard(self))
    }
}

/// Unlit, translucent highlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineMaterial {
    pub outline_color: [f32; 3],
    pub outline_alpha: f32,
}

impl Default for OutlineMaterial {
    fn default() -> Self {
        Self {
            outline_color: [1.0, 0.0, 0.0],
            outline_alpha: 0.3,
        }
    }
}

impl OutlineMaterial {
    pub fn new(outline_color: [f32; 3], outline_alpha: f32) -> Self {
        Self {
            outline_color,
            outline_alpha: outline_alpha.clamp(0.0, 1.0),
        }
    }

    pub fn into_ref(self) -> MaterialRef {
        Arc::new(Material::Outline(self))
    }
}

/// What the renderer needs to shade an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub base_color: [f32; 4],
    pub ambient_color: [f32; 3],
    pub unlit: bool,
}

impl Shading {
    pub fn is_translucent(&self) -> bool {
        self.base_color[3] < 1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Outline(OutlineMaterial),
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Standard(material) => &material.name,
            Material::Outline(_) => "outline",
        }
    }

    pub fn is_outline(&self) -> bool {
        matches!(self, Material::Outline(_))
    }

    pub fn shading(&self) -> Shading {
        match self {
            Material::Standard(m) => Shading {
                base_color: [
                    m.diffuse_color[0],
                    m.diffuse_color[1],
                    m.diffuse_color[2],
                    m.alpha,
                ],
                ambient_color: m.ambient_color,
                unlit: false,
            },
            Material::Outline(m) => Shading {
                base_color: [
                    m.outline_color[0],
                    m.outline_color[1],
                    m.outline_color[2],
                    m.outline_alpha,
                ],
                ambient_color: [0.0, 0.0, 0.0],
                unlit: true,
            },
        }
    }

    /// Shading used for objects without a material
    pub fn default_shading() -> Shading {
        Shading {
            base_color: [1.0, 1.0, 1.0, 1.0],
            ambient_color: [0.0, 0.0, 0.0],
            unlit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_defaults() {
        let outline = OutlineMaterial::default();
        assert_eq!(outline.outline_color, [1.0, 0.0, 0.0]);
        assert_eq!(outline.outline_alpha, 0.3);

        let shading = Material::Outline(outline).shading();
        assert!(shading.unlit);
        assert!(shading.is_translucent());
    }

    #[test]
    fn test_standard_builder() {
        let material = StandardMaterial::new("material1")
            .with_diffuse(0.5, 0.4, 1.0)
            .with_alpha(2.0)
            .into_ref();

        assert_eq!(material.name(), "material1");
        assert!(!material.is_outline());
        assert_eq!(material.shading().base_color, [0.5, 0.4, 1.0, 1.0]);
    }
}
