use super::types::ConfigType;

/// 描述符的附加数据，含义取决于字段类型
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigExtra {
    #[default]
    None,
    /// Members: 成员列表所属的组织 id
    Scope(i64),
    /// MultiBool: (value, label) 选项
    Choices(Vec<(String, String)>),
}

impl ConfigExtra {
    pub fn choices<I, V, L>(items: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        Self::Choices(
            items
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
        )
    }
}

/// 单个动态配置字段的声明
///
/// 每次构造表单时生成，不单独持久化。`key` 既是表单字段名，
/// 也是 key/value 存储中的行名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDescriptor {
    pub key: String,
    pub config_type: ConfigType,
    pub section: Option<String>,
    pub label: String,
    pub help_text: String,
    pub extra: ConfigExtra,
}
