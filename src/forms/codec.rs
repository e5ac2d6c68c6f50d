//! 配置值的字符串编解码
//!
//! 存储不保存类型信息，读取时按当前描述符声明的类型重新解析。

use super::data::{FieldValue, InitialValue};
use super::types::ConfigType;

/// 把校验后的值编码为存储字符串
///
/// Members 以逗号连接 id；其他值转为字符串后，在 `normalize_double_slash`
/// 开启时把 "//" 替换为 "/"。
pub fn encode_value(value: &FieldValue, normalize_double_slash: bool) -> String {
    let encoded = match value {
        FieldValue::Ids(ids) => {
            return ids
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
        }
        FieldValue::Text(s) => s.clone(),
        FieldValue::Bool(true) => "True".to_string(),
        FieldValue::Bool(false) => "False".to_string(),
        FieldValue::Int(n) => n.to_string(),
        FieldValue::Choices(items) => {
            serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
        }
    };

    if normalize_double_slash {
        encoded.replace("//", "/")
    } else {
        encoded
    }
}

/// 按声明类型把存储字符串解析为预填值
pub fn decode_initial(config_type: ConfigType, stored: &str) -> InitialValue {
    match config_type {
        ConfigType::Bool => InitialValue::Bool(stored == "True"),
        ConfigType::Members => InitialValue::List(
            stored
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        ConfigType::MultiBool => {
            InitialValue::List(serde_json::from_str(stored).unwrap_or_default())
        }
        ConfigType::Char | ConfigType::Html | ConfigType::Int | ConfigType::Textarea => {
            InitialValue::Text(stored.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_encoding() {
        assert_eq!(encode_value(&FieldValue::Bool(true), true), "True");
        assert_eq!(encode_value(&FieldValue::Bool(false), true), "False");
        assert_eq!(
            decode_initial(ConfigType::Bool, "True"),
            InitialValue::Bool(true)
        );
        // 只有精确的 "True" 视为勾选
        assert_eq!(
            decode_initial(ConfigType::Bool, "true"),
            InitialValue::Bool(false)
        );
        assert_eq!(
            decode_initial(ConfigType::Bool, "False"),
            InitialValue::Bool(false)
        );
    }

    #[test]
    fn test_members_keeps_order() {
        let encoded = encode_value(&FieldValue::Ids(vec![3, 7, 9]), true);
        assert_eq!(encoded, "3,7,9");
        assert_eq!(
            decode_initial(ConfigType::Members, &encoded),
            InitialValue::List(vec!["3".into(), "7".into(), "9".into()])
        );
        assert_eq!(
            decode_initial(ConfigType::Members, ""),
            InitialValue::List(vec![])
        );
    }

    #[test]
    fn test_double_slash_normalization() {
        let value = FieldValue::Text("https://example.org//x".to_string());
        assert_eq!(encode_value(&value, true), "https:/example.org/x");
        assert_eq!(encode_value(&value, false), "https://example.org//x");
        // 非重叠替换
        assert_eq!(
            encode_value(&FieldValue::Text("a///b".into()), true),
            "a//b"
        );
    }

    #[test]
    fn test_multi_bool_json() {
        let encoded = encode_value(
            &FieldValue::Choices(vec!["a".into(), "c".into()]),
            true,
        );
        assert_eq!(encoded, r#"["a","c"]"#);
        assert_eq!(
            decode_initial(ConfigType::MultiBool, &encoded),
            InitialValue::List(vec!["a".into(), "c".into()])
        );
        assert_eq!(
            decode_initial(ConfigType::MultiBool, "garbage"),
            InitialValue::List(vec![])
        );
    }

    #[test]
    fn test_int_is_text_on_reload() {
        assert_eq!(encode_value(&FieldValue::Int(10), true), "10");
        assert_eq!(
            decode_initial(ConfigType::Int, "10"),
            InitialValue::Text("10".into())
        );
    }
}
