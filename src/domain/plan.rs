//! Plan/package display configuration
//!
//! Products come from outside (the internal catalog or WooCommerce); this layer
//! only decides how and in which order they appear on the plans page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSource {
    Internal,
    Woocommerce,
}

impl ProductSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Woocommerce => "woocommerce",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Some(Self::Internal),
            "woocommerce" | "woo" => Some(Self::Woocommerce),
            _ => None,
        }
    }
}

/// Identity of a plan configuration: one per external product
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanKey {
    pub source: ProductSource,
    pub product_id: String,
}

impl PlanKey {
    pub fn new(source: ProductSource, product_id: impl Into<String>) -> Self {
        Self {
            source,
            product_id: product_id.into(),
        }
    }

    /// Parse `source:product_id`, e.g. `woocommerce:812`
    pub fn parse(s: &str) -> Option<Self> {
        let (source, id) = s.split_once(':')?;
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        Some(Self::new(ProductSource::from_str(source)?, id))
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source.as_str(), self.product_id)
    }
}

/// Product as reported by its source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub key: PlanKey,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Display overrides and position for one product card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDisplayConfig {
    pub key: PlanKey,
    #[serde(default)]
    pub custom_title: Option<String>,
    #[serde(default)]
    pub custom_description: Option<String>,
    #[serde(default)]
    pub custom_features: Vec<String>,
    #[serde(default = "default_visible")]
    pub show_on_plans_page: bool,
    /// 0-based position on the plans page
    #[serde(default)]
    pub display_order: u32,
}

fn default_visible() -> bool {
    true
}

impl PlanDisplayConfig {
    pub fn new(key: PlanKey) -> Self {
        Self {
            key,
            custom_title: None,
            custom_description: None,
            custom_features: Vec::new(),
            show_on_plans_page: true,
            display_order: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.custom_title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.custom_description = Some(description.into());
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.custom_features = features;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.show_on_plans_page = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_key_parse() {
        let key = PlanKey::parse("woocommerce:812").unwrap();
        assert_eq!(key.source, ProductSource::Woocommerce);
        assert_eq!(key.product_id, "812");
        assert_eq!(key.to_string(), "woocommerce:812");

        assert!(PlanKey::parse("internal:").is_none());
        assert!(PlanKey::parse("stripe:1").is_none());
        assert!(PlanKey::parse("812").is_none());
    }

    #[test]
    fn test_builder() {
        let config = PlanDisplayConfig::new(PlanKey::new(ProductSource::Internal, "pro"))
            .with_title("Pro Dad")
            .hidden();
        assert_eq!(config.custom_title.as_deref(), Some("Pro Dad"));
        assert!(!config.show_on_plans_page);
    }
}
