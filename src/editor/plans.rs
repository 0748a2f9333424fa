//! Plan card configurations

use serde::Serialize;

use crate::ordering::{self, OrderBase, Ordered};
use crate::{EditError, PlanDisplayConfig, PlanKey, ProductRef};

impl Ordered for PlanDisplayConfig {
    fn order_key(&self) -> String {
        self.key.to_string()
    }

    fn order(&self) -> u32 {
        self.display_order
    }

    fn set_order(&mut self, order: u32) {
        self.display_order = order;
    }
}

/// What the plans page renders for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCard {
    pub key: PlanKey,
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub display_order: u32,
}

/// Plan configurations sorted by `display_order` (contiguous from 0)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanSet {
    configs: Vec<PlanDisplayConfig>,
}

impl PlanSet {
    pub fn new(configs: impl IntoIterator<Item = PlanDisplayConfig>) -> Self {
        let mut configs: Vec<PlanDisplayConfig> = configs.into_iter().collect();
        ordering::normalize(&mut configs, OrderBase::Zero);
        Self { configs }
    }

    pub fn configs(&self) -> &[PlanDisplayConfig] {
        &self.configs
    }

    pub fn get(&self, key: &PlanKey) -> Option<&PlanDisplayConfig> {
        self.configs.iter().find(|c| &c.key == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.configs.iter().map(Ordered::order_key).collect()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    fn require(&self, key: &PlanKey) -> Result<usize, EditError> {
        self.configs
            .iter()
            .position(|c| &c.key == key)
            .ok_or_else(|| EditError::not_found("Plan", key.to_string()))
    }

    /// Insert or replace the overrides for `config.key`.
    ///
    /// New configurations go to the end; replacing keeps the existing position.
    pub fn upsert(&self, config: PlanDisplayConfig) -> Self {
        let mut configs = self.configs.clone();
        match configs.iter().position(|c| c.key == config.key) {
            Some(index) => {
                let display_order = configs[index].display_order;
                configs[index] = PlanDisplayConfig {
                    display_order,
                    ..config
                };
            }
            None => {
                configs.push(PlanDisplayConfig {
                    display_order: configs.len() as u32,
                    ..config
                });
            }
        }
        Self::new(configs)
    }

    /// Add default configurations for products that have none yet
    pub fn with_products(&self, products: &[ProductRef]) -> Self {
        products
            .iter()
            .filter(|p| self.get(&p.key).is_none())
            .fold(self.clone(), |set, product| {
                set.upsert(PlanDisplayConfig::new(product.key.clone()))
            })
    }

    pub fn remove(&self, key: &PlanKey) -> Result<Self, EditError> {
        let index = self.require(key)?;
        let mut configs = self.configs.clone();
        configs.remove(index);
        Ok(Self::new(configs))
    }

    pub fn set_visibility(&self, key: &PlanKey, visible: bool) -> Result<Self, EditError> {
        let index = self.require(key)?;
        let mut configs = self.configs.clone();
        configs[index].show_on_plans_page = visible;
        Ok(Self { configs })
    }

    /// Assign `display_order` by position in `keys` (`source:product_id` strings)
    pub fn reorder<S: AsRef<str>>(&self, keys: &[S]) -> Result<Self, EditError> {
        let configs = ordering::apply_permutation(&self.configs, keys, OrderBase::Zero)?;
        Ok(Self { configs })
    }

    pub fn move_item(&self, from: usize, to: usize) -> Result<Self, EditError> {
        let keys = ordering::move_ids(&self.configs, from, to)?;
        self.reorder(&keys)
    }

    /// Visible cards in display order; configurations whose product is unknown are skipped
    pub fn plan_cards(&self, products: &[ProductRef]) -> Vec<PlanCard> {
        self.configs
            .iter()
            .filter(|c| c.show_on_plans_page)
            .filter_map(|config| {
                let product = products.iter().find(|p| p.key == config.key)?;
                let features = if config.custom_features.is_empty() {
                    product.features.clone()
                } else {
                    config.custom_features.clone()
                };
                Some(PlanCard {
                    key: config.key.clone(),
                    title: config
                        .custom_title
                        .clone()
                        .unwrap_or_else(|| product.name.clone()),
                    description: config
                        .custom_description
                        .clone()
                        .unwrap_or_else(|| product.description.clone()),
                    features,
                    display_order: config.display_order,
                })
            })
            .collect()
    }
}
