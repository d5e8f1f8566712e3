//! Saved import profiles: reusable, named import regions.

use crate::config::ImportConfig;
use crate::error::{GeoTilesError, Result};
use crate::grid::ImportRegion;
use geotiles_types::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

pub type ProfileId = u64;

/// Shape stored by a profile. Only rectangles are saved today.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileShape {
    Rectangle { start: Coordinate, end: Coordinate },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportProfile {
    pub id: ProfileId,
    pub name: String,
    pub description: Option<String>,
    pub shape: ProfileShape,
}

impl ImportProfile {
    pub fn rectangle(name: impl Into<String>, start: Coordinate, end: Coordinate) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            shape: ProfileShape::Rectangle { start, end },
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_rectangle(&self) -> bool {
        matches!(self.shape, ProfileShape::Rectangle { .. })
    }

    /// The region an import from this profile would cover.
    pub fn region(&self) -> ImportRegion {
        match self.shape {
            ProfileShape::Rectangle { start, end } => ImportRegion::rectangle(start, end),
        }
    }

    pub fn validate(&self, limits: &ImportConfig) -> Result<()> {
        validate_profile_name(&self.name, limits)?;
        if let Some(description) = &self.description {
            let len = description.chars().count();
            if len == 0 || len > limits.max_profile_description_len {
                return Err(GeoTilesError::InvalidInput(format!(
                    "profile description must be 1..={} characters, got {}",
                    limits.max_profile_description_len, len
                )));
            }
        }
        Ok(())
    }
}

pub fn validate_profile_name(name: &str, limits: &ImportConfig) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > limits.max_profile_name_len {
        return Err(GeoTilesError::InvalidInput(format!(
            "profile name must be 1..={} characters, got {}",
            limits.max_profile_name_len, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_profile_region() {
        let p = ImportProfile::rectangle("airfield", Coordinate::new(1.0, 2.0), Coordinate::new(0.0, 3.0));
        assert!(p.is_rectangle());
        assert_eq!(
            p.region(),
            ImportRegion::rectangle(Coordinate::new(1.0, 2.0), Coordinate::new(0.0, 3.0))
        );
    }

    #[test]
    fn test_name_length_bounds() {
        let limits = ImportConfig::default();
        let c = Coordinate::new(0.0, 0.0);
        assert!(ImportProfile::rectangle("", c, c).validate(&limits).is_err());
        assert!(ImportProfile::rectangle("x".repeat(51), c, c).validate(&limits).is_err());
        assert!(ImportProfile::rectangle("x".repeat(50), c, c).validate(&limits).is_ok());
    }

    #[test]
    fn test_empty_description_rejected() {
        let c = Coordinate::new(0.0, 0.0);
        let p = ImportProfile::rectangle("ok", c, c).with_description("");
        assert!(p.validate(&ImportConfig::default()).is_err());
    }

    #[test]
    fn test_limits_follow_config() {
        let limits = ImportConfig {
            max_profile_name_len: 4,
            max_profile_description_len: 3,
            ..ImportConfig::default()
        };
        let c = Coordinate::new(0.0, 0.0);
        assert!(validate_profile_name("abcd", &limits).is_ok());
        assert!(validate_profile_name("abcde", &limits).is_err());
        let p = ImportProfile::rectangle("ok", c, c).with_description("long");
        assert!(p.validate(&limits).is_err());
        assert!(p.with_description("abc").validate(&limits).is_ok());
    }
}
