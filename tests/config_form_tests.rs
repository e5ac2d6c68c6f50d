//! ConfigForm tests
//!
//! Uses the in-memory stores; SQLite-backed flows live in storage_tests.rs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use configform::cache::{CachedConfigStore, ConfigCache, MokaConfigCache};
use configform::config::FormsConfig;
use configform::errors::{ConfigFormError, Result};
use configform::forms::{
    ConfigDeclarer, ConfigExtra, ConfigForm, ConfigFormDef, ConfigType, EntityRef,
    EventConfigForm, FormContext, FormData, InitialValue, PaymentSettingsForm, Widget,
};
use configform::storage::{
    ConfigStore, FormStores, MemoryConfigStore, MemoryFeatureStore, MemoryPeopleLookup,
};

/// 覆盖全部类型的测试表单
struct Settings {
    saves: Arc<AtomicUsize>,
}

impl Settings {
    fn new() -> Self {
        Self {
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ConfigFormDef for Settings {
    fn entity(&self) -> EntityRef {
        EntityRef::run(1)
    }

    fn set_configs(&self, decl: &mut ConfigDeclarer) -> Result<()> {
        decl.add("website", ConfigType::Char, "Website", "");
        decl.section("a", "Alpha")
            .add("limit", ConfigType::Int, "Limit", "help")
            .add("open", ConfigType::Bool, "Open", "")
            .add("note", ConfigType::Textarea, "Note", "");
        decl.section("b", "Beta")
            .add("intro", ConfigType::Html, "Intro", "")
            .add_with(
                "staff",
                ConfigType::Members,
                "Staff",
                "",
                ConfigExtra::Scope(1),
            )
            .add_with(
                "tabs",
                ConfigType::MultiBool,
                "Tabs",
                "",
                ConfigExtra::choices([("gallery", "Gallery"), ("calendar", "Calendar")]),
            );
        Ok(())
    }

    fn model_fields(&self) -> &[&'static str] {
        &["name"]
    }

    async fn save_model(&self, _commit: bool) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn memory_stores() -> (FormStores, Arc<MemoryConfigStore>) {
    let config = Arc::new(MemoryConfigStore::new());
    let people = Arc::new(MemoryPeopleLookup::new());
    people.add(1, 3, "Ada");
    people.add(1, 7, "Brin");
    people.add(1, 9, "Cato");
    people.add(2, 11, "Dora");

    let stores = FormStores::new(
        config.clone(),
        Arc::new(MemoryFeatureStore::new()),
        people,
    );
    (stores, config)
}

fn ctx(data: Option<FormData>) -> FormContext {
    let ctx = FormContext::new().with_options(FormsConfig::default());
    match data {
        Some(data) => ctx.with_data(data),
        None => ctx,
    }
}

async fn load<D: ConfigFormDef>(def: D, stores: &FormStores) -> ConfigForm<D> {
    ConfigForm::new(def, ctx(None), stores.clone())
        .await
        .expect("Failed to build form")
}

async fn submit<D: ConfigFormDef>(def: D, stores: &FormStores, data: FormData) -> ConfigForm<D> {
    let mut form = ConfigForm::new(def, ctx(Some(data)), stores.clone())
        .await
        .expect("Failed to build form");
    assert!(form.is_valid(), "unexpected errors: {}", form.errors());
    form.save(true).await.expect("Failed to save form");
    form
}

fn initial_text<'a, D: ConfigFormDef>(form: &'a ConfigForm<D>, key: &str) -> Option<&'a str> {
    form.initial().get(key).and_then(InitialValue::as_text)
}

// =============================================================================
// 构造
// =============================================================================

#[cfg(test)]
mod construction_tests {
    use super::*;

    #[tokio::test]
    async fn test_fields_follow_declaration_order() {
        let (stores, _) = memory_stores();
        let form = load(Settings::new(), &stores).await;

        let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["website", "limit", "open", "note", "intro", "staff", "tabs"]
        );
        assert_eq!(
            form.field("note").unwrap().widget,
            Widget::Textarea { rows: 5 }
        );
        assert!(form.fields().iter().all(|f| !f.required));
    }

    #[tokio::test]
    async fn test_section_grouping() {
        let (stores, _) = memory_stores();
        let form = load(Settings::new(), &stores).await;

        assert_eq!(form.sections().get("limit").map(String::as_str), Some("Alpha"));
        assert_eq!(form.sections().get("note").map(String::as_str), Some("Alpha"));
        assert_eq!(form.sections().get("intro").map(String::as_str), Some("Beta"));
        assert!(!form.sections().contains_key("website"));
    }

    #[tokio::test]
    async fn test_jump_section() {
        let (stores, _) = memory_stores();
        let ctx = ctx(None).with_jump_section("b");
        let form = ConfigForm::new(Settings::new(), ctx, stores.clone())
            .await
            .unwrap();
        assert_eq!(form.jump_section(), Some("Beta"));

        let form = load(Settings::new(), &stores).await;
        assert_eq!(form.jump_section(), None);
    }

    #[tokio::test]
    async fn test_members_choices_scoped() {
        let (stores, _) = memory_stores();
        let form = load(Settings::new(), &stores).await;

        let ids: Vec<&str> = form
            .field("staff")
            .unwrap()
            .choices
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "7", "9"]);
    }

    #[tokio::test]
    async fn test_unset_keys_have_no_initial() {
        let (stores, _) = memory_stores();
        let form = load(Settings::new(), &stores).await;
        assert!(form.initial().is_empty());
    }
}

// =============================================================================
// 声明错误
// =============================================================================

#[cfg(test)]
mod declaration_tests {
    use super::*;

    struct Tagged(&'static str);

    #[async_trait]
    impl ConfigFormDef for Tagged {
        fn entity(&self) -> EntityRef {
            EntityRef::event(1)
        }

        fn set_configs(&self, decl: &mut ConfigDeclarer) -> Result<()> {
            decl.add_tagged("colour", self.0, "Colour", "", ConfigExtra::None)?;
            Ok(())
        }
    }

    struct Broken {
        duplicate: bool,
    }

    #[async_trait]
    impl ConfigFormDef for Broken {
        fn entity(&self) -> EntityRef {
            EntityRef::event(1)
        }

        fn set_configs(&self, decl: &mut ConfigDeclarer) -> Result<()> {
            if self.duplicate {
                decl.add("a", ConfigType::Char, "A", "");
                decl.section("s", "S").add("a", ConfigType::Int, "A", "");
            } else {
                decl.add("staff", ConfigType::Members, "Staff", "");
            }
            Ok(())
        }
    }

    struct Colliding;

    #[async_trait]
    impl ConfigFormDef for Colliding {
        fn entity(&self) -> EntityRef {
            EntityRef::event(1)
        }

        fn set_configs(&self, decl: &mut ConfigDeclarer) -> Result<()> {
            decl.add("slug", ConfigType::Char, "Slug", "");
            Ok(())
        }

        fn model_fields(&self) -> &[&'static str] {
            &["name", "slug"]
        }
    }

    fn expect_declaration_error<D>(result: Result<ConfigForm<D>>, key: &str)
    where
        D: ConfigFormDef,
    {
        match result {
            Err(ConfigFormError::Declaration(msg)) => assert!(msg.contains(key), "{}", msg),
            Err(e) => panic!("expected declaration error, got {}", e),
            Ok(_) => panic!("expected declaration error"),
        }
    }

    #[tokio::test]
    async fn test_unknown_type_tag() {
        let (stores, _) = memory_stores();
        let result = ConfigForm::new(Tagged("colour_picker"), ctx(None), stores.clone()).await;
        expect_declaration_error(result, "colour");

        let form = ConfigForm::new(Tagged("html"), ctx(None), stores).await.unwrap();
        assert_eq!(form.field("colour").unwrap().widget, Widget::RichText);
    }

    #[tokio::test]
    async fn test_members_without_scope() {
        let (stores, _) = memory_stores();
        let result = ConfigForm::new(Broken { duplicate: false }, ctx(None), stores).await;
        expect_declaration_error(result, "staff");
    }

    #[tokio::test]
    async fn test_duplicate_key() {
        let (stores, _) = memory_stores();
        let result = ConfigForm::new(Broken { duplicate: true }, ctx(None), stores).await;
        expect_declaration_error(result, "a");
    }

    #[tokio::test]
    async fn test_model_field_collision() {
        let (stores, _) = memory_stores();
        let result = ConfigForm::new(Colliding, ctx(None), stores).await;
        expect_declaration_error(result, "slug");
    }
}

// =============================================================================
// 保存与回读
// =============================================================================

#[cfg(test)]
mod save_tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_text_types() {
        let (stores, config) = memory_stores();
        let data = FormData::new()
            .with("website", "https://example.com")
            .with("limit", "42")
            .with("note", "line one\nline two")
            .with("intro", "<p>Hello</p>");
        submit(Settings::new(), &stores, data).await;

        let entity = EntityRef::run(1);
        assert_eq!(config.get(&entity, "limit").as_deref(), Some("42"));

        let form = load(Settings::new(), &stores).await;
        assert_eq!(initial_text(&form, "limit"), Some("42"));
        assert_eq!(initial_text(&form, "note"), Some("line one\nline two"));
        assert_eq!(initial_text(&form, "intro"), Some("<p>Hello</p>"));
    }

    #[tokio::test]
    async fn test_bool_coercion() {
        let (stores, config) = memory_stores();
        let entity = EntityRef::run(1);

        submit(Settings::new(), &stores, FormData::new().with("open", "on")).await;
        assert_eq!(config.get(&entity, "open").as_deref(), Some("True"));
        let form = load(Settings::new(), &stores).await;
        assert_eq!(form.initial().get("open"), Some(&InitialValue::Bool(true)));

        submit(Settings::new(), &stores, FormData::new()).await;
        assert_eq!(config.get(&entity, "open").as_deref(), Some("False"));
        let form = load(Settings::new(), &stores).await;
        assert_eq!(form.initial().get("open"), Some(&InitialValue::Bool(false)));
    }

    #[tokio::test]
    async fn test_bool_only_exact_true_is_checked() {
        let (stores, config) = memory_stores();
        let mut values = std::collections::HashMap::new();
        values.insert("open".to_string(), "true".to_string());
        config.set_all(&EntityRef::run(1), &values).await.unwrap();

        let form = load(Settings::new(), &stores).await;
        assert_eq!(form.initial().get("open"), Some(&InitialValue::Bool(false)));
    }

    #[tokio::test]
    async fn test_members_stored_comma_joined() {
        let (stores, config) = memory_stores();
        let data = FormData::new().with_list("staff", ["3", "7", "9"]);
        submit(Settings::new(), &stores, data).await;

        assert_eq!(
            config.get(&EntityRef::run(1), "staff").as_deref(),
            Some("3,7,9")
        );
        let form = load(Settings::new(), &stores).await;
        assert_eq!(
            form.initial().get("staff"),
            Some(&InitialValue::List(vec![
                "3".to_string(),
                "7".to_string(),
                "9".to_string()
            ]))
        );
    }

    #[tokio::test]
    async fn test_members_outside_scope_rejected() {
        let (stores, config) = memory_stores();
        let data = FormData::new().with_list("staff", ["3", "11"]);
        let mut form = ConfigForm::new(Settings::new(), ctx(Some(data)), stores)
            .await
            .unwrap();

        assert!(!form.is_valid());
        assert!(form.errors().has_error("staff"));
        assert!(form.save(true).await.is_err());
        assert_eq!(config.write_count(), 0);
    }

    #[tokio::test]
    async fn test_multi_bool_round_trip() {
        let (stores, config) = memory_stores();
        let data = FormData::new().with_list("tabs", ["calendar"]);
        submit(Settings::new(), &stores, data).await;

        assert_eq!(
            config.get(&EntityRef::run(1), "tabs").as_deref(),
            Some(r#"["calendar"]"#)
        );
        let form = load(Settings::new(), &stores).await;
        assert_eq!(
            form.initial().get("tabs"),
            Some(&InitialValue::List(vec!["calendar".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_idempotent_save() {
        let (stores, config) = memory_stores();
        let data = FormData::new()
            .with("website", "a.example")
            .with("limit", "3")
            .with("open", "on");
        submit(Settings::new(), &stores, data.clone()).await;
        let first = config.get_all(&EntityRef::run(1)).await.unwrap();

        submit(Settings::new(), &stores, data).await;
        let second = config.get_all(&EntityRef::run(1)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_double_slash_normalized() {
        let (stores, config) = memory_stores();
        submit(
            Settings::new(),
            &stores,
            FormData::new().with("website", "https://example.com//path"),
        )
        .await;

        assert_eq!(
            config.get(&EntityRef::run(1), "website").as_deref(),
            Some("https:/example.com/path")
        );
    }

    #[tokio::test]
    async fn test_double_slash_kept_when_disabled() {
        let (stores, config) = memory_stores();
        let options = FormsConfig {
            normalize_double_slash: false,
            ..FormsConfig::default()
        };
        let ctx = FormContext::new()
            .with_options(options)
            .with_data(FormData::new().with("website", "https://example.com"));
        let mut form = ConfigForm::new(Settings::new(), ctx, stores).await.unwrap();
        assert!(form.is_valid());
        form.save(true).await.unwrap();

        assert_eq!(
            config.get(&EntityRef::run(1), "website").as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_add_then_edit_limit() {
        let (stores, config) = memory_stores();
        submit(
            Settings::new(),
            &stores,
            FormData::new().with("limit", "5").with("website", "keep.example"),
        )
        .await;
        let form = load(Settings::new(), &stores).await;
        assert_eq!(initial_text(&form, "limit"), Some("5"));

        submit(
            Settings::new(),
            &stores,
            FormData::new().with("limit", "10").with("website", "keep.example"),
        )
        .await;
        let form = load(Settings::new(), &stores).await;
        assert_eq!(initial_text(&form, "limit"), Some("10"));
        assert_eq!(initial_text(&form, "website"), Some("keep.example"));
        assert_eq!(
            config.get(&EntityRef::run(1), "website").as_deref(),
            Some("keep.example")
        );
    }

    #[tokio::test]
    async fn test_empty_int_does_not_overwrite() {
        let (stores, config) = memory_stores();
        submit(Settings::new(), &stores, FormData::new().with("limit", "5")).await;
        submit(Settings::new(), &stores, FormData::new().with("limit", "")).await;
        assert_eq!(config.get(&EntityRef::run(1), "limit").as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_empty_text_clears_existing_row_only() {
        let (stores, config) = memory_stores();
        let entity = EntityRef::run(1);

        submit(Settings::new(), &stores, FormData::new()).await;
        assert_eq!(config.get(&entity, "note"), None);

        submit(Settings::new(), &stores, FormData::new().with("note", "hi")).await;
        submit(Settings::new(), &stores, FormData::new().with("note", "")).await;
        assert_eq!(config.get(&entity, "note").as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_single_batched_write() {
        let (stores, config) = memory_stores();
        let data = FormData::new()
            .with("website", "a")
            .with("limit", "1")
            .with("open", "on")
            .with("note", "n")
            .with("intro", "i");
        submit(Settings::new(), &stores, data).await;
        assert_eq!(config.write_count(), 1);
    }

    #[tokio::test]
    async fn test_model_saved_before_and_after_write() {
        let (stores, _) = memory_stores();
        let def = Settings::new();
        let saves = def.saves.clone();
        submit(def, &stores, FormData::new().with("limit", "1")).await;
        assert_eq!(saves.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_commit_false_writes_nothing() {
        let (stores, config) = memory_stores();
        let def = Settings::new();
        let saves = def.saves.clone();
        let ctx = ctx(Some(FormData::new().with("limit", "1")));
        let mut form = ConfigForm::new(def, ctx, stores).await.unwrap();

        let entity = form.save(false).await.unwrap();
        assert_eq!(entity, EntityRef::run(1));
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert_eq!(config.write_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_rows_kept_by_default() {
        let (stores, config) = memory_stores();
        let entity = EntityRef::run(1);
        let mut values = std::collections::HashMap::new();
        values.insert("retired".to_string(), "x".to_string());
        config.set_all(&entity, &values).await.unwrap();

        submit(Settings::new(), &stores, FormData::new().with("limit", "1")).await;
        assert_eq!(config.get(&entity, "retired").as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_stale_rows_pruned_when_enabled() {
        let (stores, config) = memory_stores();
        let entity = EntityRef::run(1);
        let mut values = std::collections::HashMap::new();
        values.insert("retired".to_string(), "x".to_string());
        config.set_all(&entity, &values).await.unwrap();

        let options = FormsConfig {
            prune_stale_rows: true,
            ..FormsConfig::default()
        };
        let ctx = FormContext::new()
            .with_options(options)
            .with_data(FormData::new().with("limit", "1"));
        let mut form = ConfigForm::new(Settings::new(), ctx, stores).await.unwrap();
        assert!(form.is_valid());
        form.save(true).await.unwrap();

        assert_eq!(config.get(&entity, "retired"), None);
        assert_eq!(config.get(&entity, "limit").as_deref(), Some("1"));
    }
}

// =============================================================================
// 校验钩子
// =============================================================================

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_int_blocks_save() {
        let (stores, config) = memory_stores();
        let def = Settings::new();
        let saves = def.saves.clone();
        let ctx = ctx(Some(FormData::new().with("limit", "ten").with("website", "x")));
        let mut form = ConfigForm::new(def, ctx, stores).await.unwrap();

        assert!(!form.is_valid());
        assert_eq!(form.errors().get("limit"), ["Enter a whole number."]);
        assert!(matches!(
            form.save(true).await,
            Err(ConfigFormError::Validation(_))
        ));
        assert_eq!(saves.load(Ordering::SeqCst), 0);
        assert_eq!(config.write_count(), 0);
    }

    #[tokio::test]
    async fn test_payment_fee_validation_blocks_save() {
        let (stores, config) = memory_stores();
        let data = FormData::new()
            .with("payment_fee", "abc")
            .with("payment_iban", "IT60X0542811101000000123456");
        let mut form = ConfigForm::new(PaymentSettingsForm::new(2), ctx(Some(data)), stores)
            .await
            .unwrap();

        assert!(!form.is_valid());
        assert!(form.errors().has_error("payment_fee"));
        assert!(form.save(true).await.is_err());
        assert_eq!(config.write_count(), 0);
    }

    #[tokio::test]
    async fn test_payment_settings_saved_when_valid() {
        let (stores, config) = memory_stores();
        let data = FormData::new()
            .with("payment_enabled", "on")
            .with("payment_fee", "1.5")
            .with("payment_iban", "IT60X0542811101000000123456");
        submit(PaymentSettingsForm::new(2), &stores, data).await;

        let entity = EntityRef::association(2);
        assert_eq!(config.get(&entity, "payment_fee").as_deref(), Some("1.5"));
        assert_eq!(config.get(&entity, "payment_enabled").as_deref(), Some("True"));
    }
}

// =============================================================================
// 缓存失效
// =============================================================================

#[cfg(test)]
mod invalidation_tests {
    use super::*;

    fn cached_stores() -> (FormStores, Arc<MokaConfigCache>) {
        let cache = Arc::new(MokaConfigCache::new(Duration::from_secs(60), 100));
        let config = Arc::new(CachedConfigStore::new(
            Arc::new(MemoryConfigStore::new()),
            cache.clone(),
        ));
        let stores = FormStores::new(
            config,
            Arc::new(MemoryFeatureStore::new()),
            Arc::new(MemoryPeopleLookup::new()),
        );
        (stores, cache)
    }

    #[tokio::test]
    async fn test_reload_sees_saved_values() {
        let (stores, _) = cached_stores();
        let form = load(EventConfigForm::new(5, 1), &stores).await;
        assert!(form.initial().is_empty());

        submit(
            EventConfigForm::new(5, 1),
            &stores,
            FormData::new().with("registration_limit", "30"),
        )
        .await;
        let form = load(EventConfigForm::new(5, 1), &stores).await;
        assert_eq!(initial_text(&form, "registration_limit"), Some("30"));
    }

    #[tokio::test]
    async fn test_cascade_only_for_cascading_keys() {
        let (stores, cache) = cached_stores();
        let entity = EntityRef::event(5);
        cache
            .insert_derived(entity, "stylesheet".to_string(), "body{}".to_string())
            .await;

        submit(
            EventConfigForm::new(5, 1),
            &stores,
            FormData::new().with("website", "a.example"),
        )
        .await;
        assert_eq!(
            cache.get_derived(&entity, "stylesheet").await.as_deref(),
            Some("body{}")
        );

        submit(
            EventConfigForm::new(5, 1),
            &stores,
            FormData::new().with("theme_colour", "#336699"),
        )
        .await;
        assert_eq!(cache.get_derived(&entity, "stylesheet").await, None);
    }
}
