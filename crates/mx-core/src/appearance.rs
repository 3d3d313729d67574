//! Colors and materials attachable to elements, sub-shapes and poly shapes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an appearance; two appearances with equal colors stay distinct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppearanceId(Uuid);

impl std::fmt::Display for AppearanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RGBA color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Phong-style material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::rgb(0.2, 0.2, 0.2),
            diffuse: Color::rgb(0.8, 0.8, 0.8),
            specular: Color::rgb(0.0, 0.0, 0.0),
            emissive: Color::rgb(0.0, 0.0, 0.0),
            shininess: 0.0,
        }
    }
}

/// Color and/or material descriptor, shared through `Arc<Appearance>`
#[derive(Debug, Clone)]
pub struct Appearance {
    id: AppearanceId,
    pub color: Option<Color>,
    pub material: Option<Material>,
}

impl PartialEq for Appearance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Appearance {}

impl Appearance {
    pub fn new(color: Color) -> Self {
        Self {
            id: AppearanceId(Uuid::new_v4()),
            color: Some(color),
            material: None,
        }
    }

    pub fn from_material(material: Material) -> Self {
        Self {
            id: AppearanceId(Uuid::new_v4()),
            color: None,
            material: Some(material),
        }
    }

    pub fn id(&self) -> AppearanceId {
        self.id
    }

    /// Color used for display: explicit color, else the diffuse component
    pub fn display_color(&self) -> Option<Color> {
        self.color.or(self.material.map(|m| m.diffuse))
    }
}
