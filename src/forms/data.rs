//! 表单数据容器
//!
//! - `FormData`: 提交的原始数据（同名多值）
//! - `FieldValue` / `CleanedData`: 校验后的值
//! - `InitialValue`: 从存储加载的预填值
//! - `FormErrors`: 字段级与表单级错误

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// 表单级错误使用的字段名
pub const NON_FIELD_ERRORS: &str = "__all__";

/// 提交的原始表单数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: HashMap<String, Vec<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个值（同名字段可多次追加，用于多选）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    /// 链式构造
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// 链式构造多值字段
    pub fn with_list<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let entry = self.values.entry(key.into()).or_default();
        entry.extend(values.into_iter().map(Into::into));
        self
    }

    /// 取第一个值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// 取所有值
    pub fn get_list(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut data = FormData::new();
        for (k, v) in iter {
            data.insert(k, v);
        }
        data
    }
}

/// 校验后的字段值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Ids(Vec<i64>),
    Choices(Vec<String>),
}

/// 校验后的数据，`None` 表示字段未给出值（如空整数）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedData {
    values: HashMap<String, Option<FieldValue>>,
}

impl CleanedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<FieldValue>) {
        self.values.insert(key.into(), value);
    }

    /// 外层 `None`: 字段不在校验结果中；内层 `None`: 字段值为空
    pub fn get(&self, key: &str) -> Option<Option<&FieldValue>> {
        self.values.get(key).map(Option::as_ref)
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<FieldValue>> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Some(FieldValue::Text(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(Some(FieldValue::Bool(b))) => Some(*b),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(Some(FieldValue::Int(n))) => Some(*n),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 预填值（由存储中的字符串按当前声明类型解析）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InitialValue {
    Text(String),
    Bool(bool),
    List(Vec<String>),
}

impl InitialValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InitialValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InitialValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            InitialValue::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

/// 表单错误集合，按字段名分组
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_form_error(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msgs)| format!("{}: {}", field, msgs.join("; ")))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
