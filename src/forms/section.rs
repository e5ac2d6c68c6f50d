//! 配置声明与分组
//!
//! `ConfigDeclarer` 收集表单定义声明的配置字段。分组通过 `section()` 返回的
//! `SectionScope` 表达：在 scope 上声明的字段都带有该分组的显示名，
//! 不依赖调用顺序维护的"当前分组"指针。

use tracing::debug;

use super::descriptor::{ConfigDescriptor, ConfigExtra};
use super::types::ConfigType;
use crate::errors::{ConfigFormError, Result};

/// 配置字段声明器
#[derive(Debug, Default)]
pub struct ConfigDeclarer {
    descriptors: Vec<ConfigDescriptor>,
    /// 请求参数中的 jump_section（分组 slug）
    jump_request: Option<String>,
    /// 命中的分组显示名，渲染后滚动到这里
    jump_section: Option<String>,
}

impl ConfigDeclarer {
    pub fn new(jump_request: Option<String>) -> Self {
        Self {
            descriptors: Vec::new(),
            jump_request,
            jump_section: None,
        }
    }

    /// 开启一个分组
    ///
    /// 同名分组可以多次开启，后续字段沿用同一个显示名。
    pub fn section(&mut self, slug: &str, display_name: &str) -> SectionScope<'_> {
        if self.jump_request.as_deref() == Some(slug) {
            debug!("Jump section matched: {} ({})", slug, display_name);
            self.jump_section = Some(display_name.to_string());
        }
        SectionScope {
            declarer: self,
            label: display_name.to_string(),
        }
    }

    /// 声明一个不属于任何分组的字段
    pub fn add(
        &mut self,
        key: &str,
        config_type: ConfigType,
        label: &str,
        help_text: &str,
    ) -> &mut Self {
        self.push(None, key, config_type, label, help_text, ConfigExtra::None);
        self
    }

    pub fn add_with(
        &mut self,
        key: &str,
        config_type: ConfigType,
        label: &str,
        help_text: &str,
        extra: ConfigExtra,
    ) -> &mut Self {
        self.push(None, key, config_type, label, help_text, extra);
        self
    }

    /// 以字符串类型标签声明字段（用于外部 schema），未知标签立即报错
    pub fn add_tagged(
        &mut self,
        key: &str,
        type_tag: &str,
        label: &str,
        help_text: &str,
        extra: ConfigExtra,
    ) -> Result<&mut Self> {
        let config_type = parse_tag(key, type_tag)?;
        self.push(None, key, config_type, label, help_text, extra);
        Ok(self)
    }

    pub fn descriptors(&self) -> &[ConfigDescriptor] {
        &self.descriptors
    }

    pub fn jump_section(&self) -> Option<&str> {
        self.jump_section.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Vec<ConfigDescriptor>, Option<String>) {
        (self.descriptors, self.jump_section)
    }

    fn push(
        &mut self,
        section: Option<String>,
        key: &str,
        config_type: ConfigType,
        label: &str,
        help_text: &str,
        extra: ConfigExtra,
    ) {
        self.descriptors.push(ConfigDescriptor {
            key: key.to_string(),
            config_type,
            section,
            label: label.to_string(),
            help_text: help_text.to_string(),
            extra,
        });
    }
}

/// 分组作用域，在其上声明的字段都归属该分组
pub struct SectionScope<'a> {
    declarer: &'a mut ConfigDeclarer,
    label: String,
}

impl SectionScope<'_> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn add(
        &mut self,
        key: &str,
        config_type: ConfigType,
        label: &str,
        help_text: &str,
    ) -> &mut Self {
        self.add_with(key, config_type, label, help_text, ConfigExtra::None)
    }

    pub fn add_with(
        &mut self,
        key: &str,
        config_type: ConfigType,
        label: &str,
        help_text: &str,
        extra: ConfigExtra,
    ) -> &mut Self {
        let section = Some(self.label.clone());
        self.declarer
            .push(section, key, config_type, label, help_text, extra);
        self
    }

    pub fn add_tagged(
        &mut self,
        key: &str,
        type_tag: &str,
        label: &str,
        help_text: &str,
        extra: ConfigExtra,
    ) -> Result<&mut Self> {
        let config_type = parse_tag(key, type_tag)?;
        Ok(self.add_with(key, config_type, label, help_text, extra))
    }
}

fn parse_tag(key: &str, type_tag: &str) -> Result<ConfigType> {
    type_tag.parse::<ConfigType>().map_err(|_| {
        ConfigFormError::declaration(format!(
            "Config '{}' declares unknown type '{}'",
            key, type_tag
        ))
    })
}
