//! 内置表单定义

use async_trait::async_trait;

use super::config_form::ConfigFormDef;
use super::data::{CleanedData, FormErrors};
use super::descriptor::ConfigExtra;
use super::section::ConfigDeclarer;
use super::types::{ConfigType, EntityRef};
use crate::errors::Result;

/// 活动配置
#[derive(Debug, Clone, Copy)]
pub struct EventConfigForm {
    pub event_id: i64,
    /// 成员候选范围
    pub association_id: i64,
}

impl EventConfigForm {
    pub fn new(event_id: i64, association_id: i64) -> Self {
        Self {
            event_id,
            association_id,
        }
    }
}

#[async_trait]
impl ConfigFormDef for EventConfigForm {
    fn entity(&self) -> EntityRef {
        EntityRef::event(self.event_id)
    }

    fn set_configs(&self, decl: &mut ConfigDeclarer) -> Result<()> {
        decl.add(
            "website",
            ConfigType::Char,
            "Website",
            "Public page of the event",
        );

        decl.section("registration", "Registration")
            .add(
                "registration_open",
                ConfigType::Bool,
                "Open registrations",
                "Allow players to sign up",
            )
            .add(
                "registration_limit",
                ConfigType::Int,
                "Limit",
                "Maximum number of players, empty for no limit",
            )
            .add(
                "registration_note",
                ConfigType::Textarea,
                "Note",
                "Shown on the sign up page",
            );

        decl.section("visuals", "Appearance")
            .add(
                "theme_colour",
                ConfigType::Char,
                "Theme colour",
                "Hex colour used to generate the stylesheet",
            )
            .add(
                "header_html",
                ConfigType::Html,
                "Header",
                "Rich text shown above every page",
            )
            .add_with(
                "visible_tabs",
                ConfigType::MultiBool,
                "Visible tabs",
                "",
                ConfigExtra::choices([
                    ("gallery", "Gallery"),
                    ("calendar", "Calendar"),
                    ("factions", "Factions"),
                ]),
            );

        decl.section("staff", "Staff").add_with(
            "organisers",
            ConfigType::Members,
            "Organisers",
            "Members allowed to manage the event",
            ConfigExtra::Scope(self.association_id),
        );

        Ok(())
    }

    fn model_fields(&self) -> &[&'static str] {
        &["name", "slug", "start", "end"]
    }

    fn cascading_keys(&self) -> &[&'static str] {
        &["theme_colour"]
    }
}

/// 组织收款设置
#[derive(Debug, Clone, Copy)]
pub struct PaymentSettingsForm {
    pub association_id: i64,
}

impl PaymentSettingsForm {
    pub fn new(association_id: i64) -> Self {
        Self { association_id }
    }
}

#[async_trait]
impl ConfigFormDef for PaymentSettingsForm {
    fn entity(&self) -> EntityRef {
        EntityRef::association(self.association_id)
    }

    fn set_configs(&self, decl: &mut ConfigDeclarer) -> Result<()> {
        decl.section("payments", "Payments")
            .add(
                "payment_enabled",
                ConfigType::Bool,
                "Enabled",
                "Accept online payments",
            )
            .add(
                "payment_fee",
                ConfigType::Char,
                "Fee",
                "Percentage added to every payment",
            )
            .add("payment_iban", ConfigType::Char, "IBAN", "");
        Ok(())
    }

    fn clean(&self, cleaned: &mut CleanedData, errors: &mut FormErrors) {
        if let Some(fee) = cleaned.get_text("payment_fee")
            && !fee.is_empty()
            && fee.replace(',', ".").parse::<f64>().is_err()
        {
            errors.add("payment_fee", "Enter a number.");
        }

        let iban_missing = cleaned.get_text("payment_iban").is_none_or(str::is_empty);
        if cleaned.get_bool("payment_enabled") == Some(true) && iban_missing {
            errors.add_form_error("An IBAN is required to enable payments.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::data::FieldValue;

    #[test]
    fn test_payment_fee_must_be_numeric() {
        let form = PaymentSettingsForm::new(1);
        let mut cleaned = CleanedData::new();
        cleaned.insert("payment_fee", Some(FieldValue::Text("abc".into())));
        let mut errors = FormErrors::new();
        form.clean(&mut cleaned, &mut errors);
        assert!(errors.has_error("payment_fee"));

        let mut cleaned = CleanedData::new();
        cleaned.insert("payment_fee", Some(FieldValue::Text("2,5".into())));
        let mut errors = FormErrors::new();
        form.clean(&mut cleaned, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_enabled_payments_need_iban() {
        let form = PaymentSettingsForm::new(1);
        let mut cleaned = CleanedData::new();
        cleaned.insert("payment_enabled", Some(FieldValue::Bool(true)));
        let mut errors = FormErrors::new();
        form.clean(&mut cleaned, &mut errors);
        assert!(errors.has_error(crate::forms::data::NON_FIELD_ERRORS));
    }

    #[test]
    fn test_event_form_declares_every_type() {
        let mut decl = ConfigDeclarer::new(Some("staff".to_string()));
        EventConfigForm::new(3, 1).set_configs(&mut decl).unwrap();
        let types: std::collections::HashSet<ConfigType> =
            decl.descriptors().iter().map(|d| d.config_type).collect();
        assert_eq!(types.len(), 7);
        assert_eq!(decl.jump_section(), Some("Staff"));
    }
}
