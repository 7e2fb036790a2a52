//! Product catalog and profile ranges for the mock recommender.

use crate::error::ModelError;
use serde::Deserialize;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../../../contrib/catalog.toml");

/// Half-open range `[min, max)`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl Span<f32> {
    /// Both ends and the width are finite numbers.
    fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && (self.max - self.min).is_finite()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub categories: Vec<String>,
    pub platforms: Vec<String>,
    pub confidence: Span<f32>,
    pub engagement: Span<u32>,
    pub purchase_interest: Span<f32>,
    pub average_purchase: Span<u32>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, ModelError> {
        Self::from_toml(EMBEDDED_CATALOG)
    }

    pub fn from_toml(src: &str) -> Result<Self, ModelError> {
        let catalog: Catalog =
            toml::from_str(src).map_err(|e| ModelError::Catalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let src = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        let catalog: Catalog = toml::from_str(&src).map_err(|source| ModelError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.categories.is_empty() {
            return Err(ModelError::Catalog("no product categories".into()));
        }
        if self.platforms.is_empty() {
            return Err(ModelError::Catalog("no social platforms".into()));
        }
        if !self.purchase_interest.is_finite() {
            return Err(ModelError::Catalog("purchase_interest range must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.confidence.min) || !(0.0..=1.0).contains(&self.confidence.max) {
            return Err(ModelError::Catalog("confidence range must lie within [0, 1]".into()));
        }
        let ordered = self.confidence.min < self.confidence.max
            && self.engagement.min < self.engagement.max
            && self.purchase_interest.min < self.purchase_interest.max
            && self.average_purchase.min < self.average_purchase.max;
        if !ordered {
            return Err(ModelError::Catalog("every range needs min < max".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.categories.len(), 5);
        assert!(catalog.categories.iter().any(|c| c == "Home & Garden"));
        assert_eq!(catalog.engagement.min, 60);
        assert_eq!(catalog.average_purchase.max, 300);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let src = r#"
categories = ["Books"]
platforms = ["Twitter"]
confidence = { min = 0.9, max = 0.5 }
engagement = { min = 1, max = 2 }
purchase_interest = { min = 1.0, max = 2.0 }
average_purchase = { min = 1, max = 2 }
"#;
        let err = Catalog::from_toml(src).unwrap_err();
        assert!(err.to_string().contains("min < max"), "{err}");
    }

    #[test]
    fn test_rejects_empty_categories() {
        let src = r#"
categories = []
platforms = ["Twitter"]
confidence = { min = 0.5, max = 0.9 }
engagement = { min = 1, max = 2 }
purchase_interest = { min = 1.0, max = 2.0 }
average_purchase = { min = 1, max = 2 }
"#;
        assert!(Catalog::from_toml(src).is_err());
    }
    #[test]
    fn test_rejects_non_finite_ranges() {
        let template = r#"
categories = ["Books"]
platforms = ["Twitter"]
confidence = { min = 0.5, max = 0.9 }
engagement = { min = 1, max = 2 }
purchase_interest = PLACEHOLDER
average_purchase = { min = 1, max = 2 }
"#;
        for range in [
            "{ min = 0.0, max = inf }",
            "{ min = -inf, max = 1.0 }",
            "{ min = nan, max = 2.0 }",
            "{ min = -3.0e38, max = 3.0e38 }",
        ] {
            let err = Catalog::from_toml(&template.replace("PLACEHOLDER", range)).unwrap_err();
            assert!(err.to_string().contains("finite"), "{range}: {err}");
        }

        let err = Catalog::from_toml(
            &template
                .replace("PLACEHOLDER", "{ min = 1.0, max = 2.0 }")
                .replace("{ min = 0.5, max = 0.9 }", "{ min = nan, max = 0.9 }"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("[0, 1]"), "{err}");
    }
}
