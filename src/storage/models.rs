use serde::{Deserialize, Serialize};

/// 功能模块（功能开关的分组）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureModule {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub order: i32,
}

/// 功能开关
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub slug: String,
    /// 占位功能不出现在选择表单中
    #[serde(default)]
    pub placeholder: bool,
    /// true 为组织级功能，false 为活动级功能
    #[serde(default)]
    pub overall: bool,
}

/// 成员列表中的一项：(member_id, 显示名)
pub type Person = (i64, String);
