//! 表单引擎
//!
//! - `types`: 配置类型与实体引用
//! - `descriptor` / `section`: 配置项声明
//! - `field`: 字段工厂
//! - `codec`: 存储字符串编解码
//! - `config_form` / `feature_form`: 表单编排
//! - `presets`: 内置表单定义

pub mod codec;
pub mod config_form;
pub mod data;
pub mod descriptor;
pub mod feature_form;
pub mod field;
pub mod locks;
pub mod presets;
pub mod section;
pub mod types;

pub use codec::{decode_initial, encode_value};
pub use config_form::{ConfigForm, ConfigFormDef, FormContext};
pub use data::{CleanedData, FieldValue, FormData, FormErrors, InitialValue, NON_FIELD_ERRORS};
pub use descriptor::{ConfigDescriptor, ConfigExtra};
pub use feature_form::{FeatureField, FeatureForm, FeatureScope, RESERVED_MODULE_ID};
pub use field::{FieldSpec, TEXTAREA_ROWS, Widget, build_field};
pub use locks::EntityLocks;
pub use presets::{EventConfigForm, PaymentSettingsForm};
pub use section::{ConfigDeclarer, SectionScope};
pub use types::{ConfigType, EntityKind, EntityRef};
