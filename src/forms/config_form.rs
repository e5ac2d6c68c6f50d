//! 动态配置表单
//!
//! 定义方在 `set_configs` 中声明配置项，表单负责：
//! - 构造时一次性读出实体的全部配置并预填
//! - 校验提交数据（字段级 + 定义方的 `clean` 钩子）
//! - 保存时批量写入、失效缓存、二次保存模型

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::codec::{decode_initial, encode_value};
use super::data::{CleanedData, FormData, FormErrors, InitialValue};
use super::descriptor::{ConfigDescriptor, ConfigExtra};
use super::field::{FieldSpec, build_field};
use super::section::ConfigDeclarer;
use super::types::{ConfigType, EntityRef};
use crate::config::FormsConfig;
use crate::errors::{ConfigFormError, Result};
use crate::storage::{FormStores, Person};

/// 配置表单定义
#[async_trait]
pub trait ConfigFormDef: Send + Sync {
    /// 配置所属实体
    fn entity(&self) -> EntityRef;

    /// 声明配置项，构造时只调用一次
    fn set_configs(&self, decl: &mut ConfigDeclarer) -> Result<()>;

    /// 模型自身的字段名，配置 key 不能与之重名
    fn model_fields(&self) -> &[&'static str] {
        &[]
    }

    /// 变更后需要级联失效派生缓存的 key
    fn cascading_keys(&self) -> &[&'static str] {
        &[]
    }

    /// 表单级校验钩子
    fn clean(&self, _cleaned: &mut CleanedData, _errors: &mut FormErrors) {}

    /// 保存模型自身字段
    async fn save_model(&self, _commit: bool) -> Result<()> {
        Ok(())
    }
}

/// 请求上下文
#[derive(Debug, Clone)]
pub struct FormContext {
    pub jump_section: Option<String>,
    pub data: Option<FormData>,
    pub options: FormsConfig,
}

impl Default for FormContext {
    fn default() -> Self {
        Self {
            jump_section: None,
            data: None,
            options: crate::config::get_config().forms.clone(),
        }
    }
}

impl FormContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: FormData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_jump_section(mut self, slug: impl Into<String>) -> Self {
        self.jump_section = Some(slug.into());
        self
    }

    pub fn with_options(mut self, options: FormsConfig) -> Self {
        self.options = options;
        self
    }
}

pub struct ConfigForm<D: ConfigFormDef> {
    def: D,
    entity: EntityRef,
    data: Option<FormData>,
    options: FormsConfig,
    stores: FormStores,
    descriptors: Vec<ConfigDescriptor>,
    fields: Vec<FieldSpec>,
    sections: HashMap<String, String>,
    initial: HashMap<String, InitialValue>,
    jump_section: Option<String>,
    stored: HashMap<String, String>,
    cleaned: Option<CleanedData>,
    errors: FormErrors,
}

impl<D: ConfigFormDef> ConfigForm<D> {
    pub async fn new(def: D, ctx: FormContext, stores: FormStores) -> Result<Self> {
        let entity = def.entity();

        let mut decl = ConfigDeclarer::new(ctx.jump_section);
        def.set_configs(&mut decl)?;
        let (descriptors, jump_section) = decl.into_parts();
        check_declarations(&descriptors, def.model_fields())?;

        let stored = stores.config.get_all(&entity).await?;
        debug!(
            "Loaded {} stored configs for {} ({} declared)",
            stored.len(),
            entity,
            descriptors.len()
        );

        let mut people_by_scope: HashMap<i64, Vec<Person>> = HashMap::new();
        let mut fields = Vec::with_capacity(descriptors.len());
        let mut sections = HashMap::new();
        let mut initial = HashMap::new();

        for descriptor in &descriptors {
            if let (ConfigType::Members, ConfigExtra::Scope(scope)) =
                (descriptor.config_type, &descriptor.extra)
                && !people_by_scope.contains_key(scope)
            {
                let people = stores.people.list_people(*scope).await?;
                people_by_scope.insert(*scope, people);
            }

            let people: &[Person] = match &descriptor.extra {
                ConfigExtra::Scope(scope) => people_by_scope
                    .get(scope)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
                _ => &[],
            };

            let field = build_field(descriptor, people)?;
            if let Some(label) = &descriptor.section {
                sections.insert(descriptor.key.clone(), label.clone());
            }
            if let Some(value) = stored.get(&descriptor.key) {
                initial.insert(
                    descriptor.key.clone(),
                    decode_initial(descriptor.config_type, value),
                );
            }
            fields.push(field);
        }

        Ok(Self {
            def,
            entity,
            data: ctx.data,
            options: ctx.options,
            stores,
            descriptors,
            fields,
            sections,
            initial,
            jump_section,
            stored,
            cleaned: None,
            errors: FormErrors::new(),
        })
    }

    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// 按声明顺序排列的字段
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn descriptors(&self) -> &[ConfigDescriptor] {
        &self.descriptors
    }

    pub fn initial(&self) -> &HashMap<String, InitialValue> {
        &self.initial
    }

    /// 字段名 -> 分组显示名
    pub fn sections(&self) -> &HashMap<String, String> {
        &self.sections
    }

    pub fn jump_section(&self) -> Option<&str> {
        self.jump_section.as_deref()
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn cleaned_data(&self) -> Option<&CleanedData> {
        self.cleaned.as_ref()
    }

    /// 校验提交数据，未绑定数据的表单总是无效
    pub fn is_valid(&mut self) -> bool {
        let Some(data) = self.data.as_ref() else {
            return false;
        };

        let mut cleaned = CleanedData::new();
        let mut errors = FormErrors::new();
        for field in &self.fields {
            match field.clean(data) {
                Ok(value) => cleaned.insert(field.name.clone(), value),
                Err(message) => errors.add(field.name.clone(), message),
            }
        }
        self.def.clean(&mut cleaned, &mut errors);

        if !errors.is_empty() {
            debug!("Form for {} has {} invalid fields", self.entity, errors.len());
        }
        let valid = errors.is_empty();
        self.cleaned = Some(cleaned);
        self.errors = errors;
        valid
    }

    /// 本次保存要写入的 name -> value
    ///
    /// 值为 None 的字段不写；编码后为空串且尚无存储行的字段也不写。
    pub fn staged_values(&self) -> HashMap<String, String> {
        let mut staged = HashMap::new();
        let Some(cleaned) = self.cleaned.as_ref() else {
            return staged;
        };

        for field in &self.fields {
            let Some(Some(value)) = cleaned.get(&field.name) else {
                continue;
            };
            let encoded = encode_value(value, self.options.normalize_double_slash);
            if encoded.is_empty() && !self.stored.contains_key(&field.name) {
                continue;
            }
            staged.insert(field.name.clone(), encoded);
        }
        staged
    }

    /// 保存模型和配置
    ///
    /// `commit = false` 时只调用 `save_model(false)`，不写配置。
    pub async fn save(&mut self, commit: bool) -> Result<EntityRef> {
        if !self.is_bound() {
            return Err(ConfigFormError::validation(format!(
                "Cannot save unbound form for {}",
                self.entity
            )));
        }
        if self.cleaned.is_none() {
            self.is_valid();
        }
        if !self.errors.is_empty() {
            return Err(ConfigFormError::validation(format!(
                "Form for {} is invalid: {}",
                self.entity, self.errors
            )));
        }

        self.def.save_model(commit).await?;
        if !commit {
            return Ok(self.entity);
        }

        let entity = self.entity;
        let staged = self.staged_values();

        let _guard = self.stores.locks.lock(&entity).await;

        self.stores.config.set_all(&entity, &staged).await?;

        if self.options.prune_stale_rows {
            let keep: HashSet<String> = self.descriptors.iter().map(|d| d.key.clone()).collect();
            let pruned = self.stores.config.prune(&entity, &keep).await?;
            if pruned > 0 {
                warn!("Pruned {} stale config rows for {}", pruned, entity);
                self.stored.retain(|name, _| keep.contains(name));
            }
        }

        self.stores.config.invalidate(&entity).await;
        let cascading = self.def.cascading_keys();
        if staged
            .keys()
            .any(|k| cascading.iter().any(|c| *c == k.as_str()))
        {
            self.stores.config.invalidate_cascade(&entity).await;
        }

        self.def.save_model(commit).await?;

        info!("Saved {} configs for {}", staged.len(), entity);
        self.stored.extend(staged);
        Ok(entity)
    }
}

fn check_declarations(descriptors: &[ConfigDescriptor], model_fields: &[&str]) -> Result<()> {
    let mut seen = HashSet::new();
    for descriptor in descriptors {
        if !seen.insert(descriptor.key.as_str()) {
            return Err(ConfigFormError::declaration(format!(
                "Config '{}' is declared more than once",
                descriptor.key
            )));
        }
        if model_fields.iter().any(|f| *f == descriptor.key) {
            return Err(ConfigFormError::declaration(format!(
                "Config '{}' collides with a model field",
                descriptor.key
            )));
        }
    }
    Ok(())
}
