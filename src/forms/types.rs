//! 表单引擎核心类型
//!
//! 定义配置字段类型标签和配置所属实体的引用。

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// 配置字段类型
///
/// 封闭集合，字段工厂按此标签决定控件和取值方式。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConfigType {
    /// 单行文本
    Char,
    /// 复选框，存储为 "True" / "False"
    Bool,
    /// 富文本
    Html,
    /// 整数
    Int,
    /// 多行文本
    Textarea,
    /// 成员多选，存储为逗号分隔的 id
    Members,
    /// 多个独立复选框，选项由 extra 提供
    MultiBool,
}

/// 配置所属的实体类别
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntityKind {
    Association,
    Event,
    Run,
    Member,
}

impl EntityKind {
    /// 存储层使用的标签
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// 实体引用，同时作为缓存 key 和锁 key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }

    pub fn association(id: i64) -> Self {
        Self::new(EntityKind::Association, id)
    }

    pub fn event(id: i64) -> Self {
        Self::new(EntityKind::Event, id)
    }

    pub fn run(id: i64) -> Self {
        Self::new(EntityKind::Run, id)
    }

    pub fn member(id: i64) -> Self {
        Self::new(EntityKind::Member, id)
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
