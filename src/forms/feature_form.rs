//! 功能开关表单
//!
//! 每个功能模块一个多选字段，所有字段共用同一份已启用功能列表作为预填值。

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use super::config_form::FormContext;
use super::data::{FormData, FormErrors};
use super::types::EntityRef;
use crate::config::{FeatureSaveMode, FormsConfig};
use crate::errors::{ConfigFormError, Result};
use crate::storage::{Feature, FormStores};

/// 保留模块，不出现在表单中
pub const RESERVED_MODULE_ID: i64 = 0;

/// 功能作用范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureScope {
    /// 组织级功能（overall = true）
    Association,
    /// 活动级功能（overall = false）
    Event,
}

impl FeatureScope {
    pub fn overall(&self) -> bool {
        matches!(self, Self::Association)
    }

    fn accepts(&self, feature: &Feature) -> bool {
        !feature.placeholder && feature.overall == self.overall()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureField {
    pub name: String,
    pub module_id: i64,
    pub label: String,
    pub choices: Vec<(i64, String)>,
}

impl FeatureField {
    pub fn field_name(module_id: i64) -> String {
        format!("module_{}", module_id)
    }

    fn offers(&self, feature_id: i64) -> bool {
        self.choices.iter().any(|(id, _)| *id == feature_id)
    }
}

pub struct FeatureForm {
    entity: EntityRef,
    scope: FeatureScope,
    data: Option<FormData>,
    options: FormsConfig,
    stores: FormStores,
    fields: Vec<FeatureField>,
    initial: Vec<i64>,
    selected: Option<HashSet<i64>>,
    errors: FormErrors,
}

impl FeatureForm {
    pub async fn init_features(
        entity: EntityRef,
        scope: FeatureScope,
        ctx: FormContext,
        stores: FormStores,
    ) -> Result<Self> {
        let modules = stores.features.list_modules().await?;
        let features = stores.features.list_features().await?;

        let mut by_module: HashMap<i64, Vec<&Feature>> = HashMap::new();
        for feature in features.iter().filter(|f| scope.accepts(f)) {
            by_module.entry(feature.module_id).or_default().push(feature);
        }

        let mut fields = Vec::new();
        for module in modules.iter().filter(|m| m.id != RESERVED_MODULE_ID) {
            let Some(items) = by_module.get(&module.id) else {
                debug!("Skipping feature module '{}': no eligible features", module.slug);
                continue;
            };
            fields.push(FeatureField {
                name: FeatureField::field_name(module.id),
                module_id: module.id,
                label: module.name.clone(),
                choices: items.iter().map(|f| (f.id, f.name.clone())).collect(),
            });
        }

        let mut initial: Vec<i64> = stores
            .features
            .get_enabled(&entity)
            .await?
            .into_iter()
            .collect();
        initial.sort_unstable();

        debug!(
            "Feature form for {} built with {} module fields",
            entity,
            fields.len()
        );

        Ok(Self {
            entity,
            scope,
            data: ctx.data,
            options: ctx.options,
            stores,
            fields,
            initial,
            selected: None,
            errors: FormErrors::new(),
        })
    }

    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    pub fn scope(&self) -> FeatureScope {
        self.scope
    }

    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FeatureField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 每个模块字段共用的预填值
    pub fn initial(&self) -> &[i64] {
        &self.initial
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_valid(&mut self) -> bool {
        let Some(data) = self.data.as_ref() else {
            return false;
        };

        let mut selected = HashSet::new();
        let mut errors = FormErrors::new();
        for field in &self.fields {
            for raw in data.get_list(&field.name) {
                match raw.trim().parse::<i64>() {
                    Ok(id) if field.offers(id) => {
                        selected.insert(id);
                    }
                    _ => errors.add(
                        field.name.clone(),
                        format!(
                            "Select a valid choice. {} is not one of the available choices.",
                            raw
                        ),
                    ),
                }
            }
        }

        let valid = errors.is_empty();
        self.selected = Some(selected);
        self.errors = errors;
        valid
    }

    /// 写入功能集合，返回写入后的集合
    pub async fn save_features(&mut self) -> Result<HashSet<i64>> {
        if self.data.is_none() {
            return Err(ConfigFormError::validation(format!(
                "Cannot save unbound feature form for {}",
                self.entity
            )));
        }
        if self.selected.is_none() {
            self.is_valid();
        }
        if !self.errors.is_empty() {
            return Err(ConfigFormError::validation(format!(
                "Feature form for {} is invalid: {}",
                self.entity, self.errors
            )));
        }
        let selected = self.selected.clone().unwrap_or_default();

        let _guard = self.stores.locks.lock(&self.entity).await;

        let new_set = match self.options.feature_save_mode {
            FeatureSaveMode::Replace => selected,
            FeatureSaveMode::Preserve => {
                let current = self.stores.features.get_enabled(&self.entity).await?;
                let offered: HashSet<i64> = self
                    .fields
                    .iter()
                    .flat_map(|f| f.choices.iter().map(|(id, _)| *id))
                    .collect();
                current
                    .into_iter()
                    .filter(|id| !offered.contains(id))
                    .chain(selected)
                    .collect()
            }
        };

        self.stores
            .features
            .replace_all(&self.entity, &new_set)
            .await?;
        self.stores.config.invalidate_cascade(&self.entity).await;

        info!(
            "Saved {} features for {} (mode: {})",
            new_set.len(),
            self.entity,
            self.options.feature_save_mode
        );

        let mut initial: Vec<i64> = new_set.iter().copied().collect();
        initial.sort_unstable();
        self.initial = initial;
        Ok(new_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Feature;

    fn feature(id: i64, module_id: i64, overall: bool, placeholder: bool) -> Feature {
        Feature {
            id,
            module_id,
            name: format!("F{}", id),
            slug: format!("f{}", id),
            placeholder,
            overall,
        }
    }

    #[test]
    fn test_scope_filter() {
        assert!(FeatureScope::Association.accepts(&feature(1, 1, true, false)));
        assert!(!FeatureScope::Association.accepts(&feature(1, 1, false, false)));
        assert!(FeatureScope::Event.accepts(&feature(1, 1, false, false)));
        assert!(!FeatureScope::Event.accepts(&feature(1, 1, false, true)));
    }

    #[test]
    fn test_field_name() {
        assert_eq!(FeatureField::field_name(12), "module_12");
    }
}
