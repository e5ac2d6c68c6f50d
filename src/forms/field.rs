//! 字段工厂
//!
//! 把一个 `ConfigDescriptor` 映射为具体的字段规格（控件、选项、取值方式）。
//! 配置字段一律非必填。

use serde::Serialize;

use super::data::{FieldValue, FormData};
use super::descriptor::{ConfigDescriptor, ConfigExtra};
use super::types::ConfigType;
use crate::errors::{ConfigFormError, Result};

/// 多行文本控件的高度提示
pub const TEXTAREA_ROWS: u32 = 5;

/// 渲染控件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "widget")]
pub enum Widget {
    TextInput,
    Checkbox,
    RichText,
    NumberInput,
    Textarea { rows: u32 },
    MultiSelect,
    CheckboxGroup,
}

/// 具体字段规格
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub config_type: ConfigType,
    pub widget: Widget,
    pub label: String,
    pub help_text: String,
    pub required: bool,
    /// 多选类字段的 (value, label) 选项
    pub choices: Vec<(String, String)>,
}

/// 根据描述符构造字段
///
/// `people` 仅对 Members 字段有意义，是按 `ConfigExtra::Scope` 查询出的成员列表。
/// 附加数据与类型不匹配时直接报错，错误信息包含出错的 key。
pub fn build_field(descriptor: &ConfigDescriptor, people: &[(i64, String)]) -> Result<FieldSpec> {
    let (widget, choices) = match descriptor.config_type {
        ConfigType::Char => (Widget::TextInput, Vec::new()),
        ConfigType::Bool => (Widget::Checkbox, Vec::new()),
        ConfigType::Html => (Widget::RichText, Vec::new()),
        ConfigType::Int => (Widget::NumberInput, Vec::new()),
        ConfigType::Textarea => (
            Widget::Textarea {
                rows: TEXTAREA_ROWS,
            },
            Vec::new(),
        ),
        ConfigType::Members => {
            if !matches!(descriptor.extra, ConfigExtra::Scope(_)) {
                return Err(ConfigFormError::declaration(format!(
                    "Config '{}' of type members requires a scope id",
                    descriptor.key
                )));
            }
            let choices = people
                .iter()
                .map(|(id, name)| (id.to_string(), name.clone()))
                .collect();
            (Widget::MultiSelect, choices)
        }
        ConfigType::MultiBool => match &descriptor.extra {
            ConfigExtra::Choices(choices) => (Widget::CheckboxGroup, choices.clone()),
            _ => {
                return Err(ConfigFormError::declaration(format!(
                    "Config '{}' of type multi_bool requires a choice list",
                    descriptor.key
                )));
            }
        },
    };

    Ok(FieldSpec {
        name: descriptor.key.clone(),
        config_type: descriptor.config_type,
        widget,
        label: descriptor.label.clone(),
        help_text: descriptor.help_text.clone(),
        required: false,
        choices,
    })
}

impl FieldSpec {
    /// 从提交数据中取值并校验
    ///
    /// 返回 `Ok(None)` 表示字段为空（只有整数字段会出现），
    /// `Err` 为面向用户的字段错误信息。
    pub fn clean(&self, data: &FormData) -> std::result::Result<Option<FieldValue>, String> {
        match self.config_type {
            ConfigType::Char | ConfigType::Html | ConfigType::Textarea => {
                let raw = data.get(&self.name).unwrap_or("");
                Ok(Some(FieldValue::Text(raw.trim().to_string())))
            }
            ConfigType::Bool => {
                let checked = data.get(&self.name).is_some_and(is_checked);
                Ok(Some(FieldValue::Bool(checked)))
            }
            ConfigType::Int => {
                let raw = data.get(&self.name).unwrap_or("").trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                raw.parse::<i64>()
                    .map(|n| Some(FieldValue::Int(n)))
                    .map_err(|_| "Enter a whole number.".to_string())
            }
            ConfigType::Members => {
                let mut ids = Vec::new();
                for raw in data.get_list(&self.name) {
                    let raw = raw.trim();
                    if raw.is_empty() {
                        continue;
                    }
                    if !self.has_choice(raw) {
                        return Err(invalid_choice(raw));
                    }
                    let id = raw.parse::<i64>().map_err(|_| invalid_choice(raw))?;
                    ids.push(id);
                }
                Ok(Some(FieldValue::Ids(ids)))
            }
            ConfigType::MultiBool => {
                let mut selected = Vec::new();
                for raw in data.get_list(&self.name) {
                    if !self.has_choice(raw) {
                        return Err(invalid_choice(raw));
                    }
                    selected.push(raw.clone());
                }
                Ok(Some(FieldValue::Choices(selected)))
            }
        }
    }

    fn has_choice(&self, value: &str) -> bool {
        self.choices.iter().any(|(v, _)| v == value)
    }
}

/// 复选框取值：缺省、空串和 "false"（不区分大小写）视为未勾选，其余非空值均为勾选
fn is_checked(raw: &str) -> bool {
    !raw.is_empty() && !raw.eq_ignore_ascii_case("false")
}

fn invalid_choice(value: &str) -> String {
    format!(
        "Select a valid choice. {} is not one of the available choices.",
        value
    )
}
