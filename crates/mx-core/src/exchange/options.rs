//! Parameter sets for the exchange collaborators
//!
//! Every struct is `#[serde(default)]`, so a configuration file only needs
//! to name the options it changes.

use serde::{Deserialize, Serialize};

use super::{ExchangeError, ExchangeResult};
use crate::representation::Lod;

/// Target or source file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileFormat {
    #[default]
    Native,
    Step,
    Jt,
    Acis,
    Iges,
    Vrml,
    Stl,
    Obj,
    Gltf,
}

impl FileFormat {
    /// Guess the format from a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mxm" => Some(Self::Native),
            "stp" | "step" => Some(Self::Step),
            "jt" => Some(Self::Jt),
            "sat" | "sab" => Some(Self::Acis),
            "igs" | "iges" => Some(Self::Iges),
            "wrl" => Some(Self::Vrml),
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "gltf" | "glb" => Some(Self::Gltf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderParameters {
    pub read_brep: bool,
    pub read_poly: bool,
    pub read_pmi: bool,
}

impl Default for ReaderParameters {
    fn default() -> Self {
        Self {
            read_brep: true,
            read_poly: true,
            read_pmi: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterParameters {
    pub file_format: FileFormat,
    pub write_brep: bool,
    pub write_poly: bool,
    /// LOD exported when a part carries several poly representations
    pub preferred_lod: Lod,
    pub write_textures: bool,
    pub write_pmi: bool,
}

impl Default for WriterParameters {
    fn default() -> Self {
        Self {
            file_format: FileFormat::Native,
            write_brep: true,
            write_poly: true,
            preferred_lod: Lod::Medium,
            write_textures: true,
            write_pmi: true,
        }
    }
}

impl WriterParameters {
    /// Mesh-only export, e.g. for STL or glTF
    pub fn poly_only(file_format: FileFormat) -> Self {
        Self {
            file_format,
            write_brep: false,
            write_pmi: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MesherParameters {
    pub granularity: Lod,
    /// Overrides the granularity preset, in radians
    pub angular_deflection: Option<f64>,
    /// Overrides the granularity preset, in model units
    pub chordal_deflection: Option<f64>,
    /// Record poly shape → B-Rep shape links and the inverse face/edge links
    pub save_brep_to_poly_associations: bool,
}

impl Default for MesherParameters {
    fn default() -> Self {
        Self::medium()
    }
}

impl MesherParameters {
    pub fn coarse() -> Self {
        Self::with_granularity(Lod::Coarse)
    }

    pub fn medium() -> Self {
        Self::with_granularity(Lod::Medium)
    }

    pub fn fine() -> Self {
        Self::with_granularity(Lod::Fine)
    }

    fn with_granularity(granularity: Lod) -> Self {
        Self {
            granularity,
            angular_deflection: None,
            chordal_deflection: None,
            save_brep_to_poly_associations: false,
        }
    }

    /// (angular, chordal) deflection actually used
    ///
    /// Both must be finite and strictly positive.
    pub fn deflections(&self) -> ExchangeResult<(f64, f64)> {
        let (angular, chordal) = match self.granularity {
            Lod::Coarse => (0.5, 1.0),
            Lod::Medium => (0.25, 0.1),
            Lod::Fine => (0.1, 0.01),
        };
        let angular = self.angular_deflection.unwrap_or(angular);
        let chordal = self.chordal_deflection.unwrap_or(chordal);
        for (name, value) in [("angular", angular), ("chordal", chordal)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ExchangeError::Mesh(format!(
                    "{} deflection must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok((angular, chordal))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimplificationLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifierParameters {
    pub level: SimplificationLevel,
    /// Features smaller than this are removed; `None` lets the simplifier decide
    pub feature_size: Option<f64>,
}

impl Default for SimplifierParameters {
    fn default() -> Self {
        Self {
            level: SimplificationLevel::Medium,
            feature_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_deflection_wins() {
        let mut params = MesherParameters::fine();
        assert_eq!(params.deflections().unwrap(), (0.1, 0.01));
        params.chordal_deflection = Some(0.5);
        assert_eq!(params.deflections().unwrap(), (0.1, 0.5));
    }

    #[test]
    fn test_degenerate_deflection_is_rejected() {
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let params = MesherParameters {
                angular_deflection: Some(bad),
                ..MesherParameters::default()
            };
            assert!(matches!(params.deflections(), Err(ExchangeError::Mesh(_))));
        }
        let params = MesherParameters {
            chordal_deflection: Some(0.0),
            ..MesherParameters::coarse()
        };
        assert!(params.deflections().is_err());
    }

    #[test]
    fn test_writer_defaults() {
        let params = WriterParameters::default();
        assert!(params.write_brep && params.write_poly && params.write_pmi);
        assert_eq!(params.preferred_lod, Lod::Medium);

        let stl = WriterParameters::poly_only(FileFormat::Stl);
        assert!(!stl.write_brep);
        assert!(stl.write_poly);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_extension("STEP"), Some(FileFormat::Step));
        assert_eq!(FileFormat::from_extension("glb"), Some(FileFormat::Gltf));
        assert_eq!(FileFormat::from_extension("txt"), None);
    }
}
