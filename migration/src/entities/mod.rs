pub mod entity_config;
pub mod entity_feature;
pub mod feature;
pub mod feature_module;
pub mod membership;

pub use entity_config::Entity as EntityConfigEntity;
pub use entity_feature::Entity as EntityFeatureEntity;
pub use feature::Entity as FeatureEntity;
pub use feature_module::Entity as FeatureModuleEntity;
pub use membership::Entity as MembershipEntity;
