//! Provider configuration lookups.
//!
//! Each helper reads the property map first, then the first environment
//! variable in `envs` that is set, then falls back to an empty value.

use tfbridge_types::PropertyMap;

/// String value of `key`, or `""` when absent or not a string.
pub fn string_value(vars: &PropertyMap, key: &str) -> String {
    vars.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

pub fn config_string_value(vars: &PropertyMap, key: &str, envs: &[&str]) -> String {
    if let Some(value) = vars.get(key).and_then(|v| v.as_str()) {
        return value.to_string();
    }
    first_env(envs).unwrap_or_default()
}

/// Only the exact environment value `"true"` reads as true.
pub fn config_bool_value(vars: &PropertyMap, key: &str, envs: &[&str]) -> bool {
    if let Some(value) = vars.get(key).and_then(|v| v.as_bool()) {
        return value;
    }
    envs.iter()
        .any(|env| std::env::var(env).is_ok_and(|value| value == "true"))
}

/// Array elements as strings; environment values are split on `;`.
pub fn config_array_value(vars: &PropertyMap, key: &str, envs: &[&str]) -> Vec<String> {
    if let Some(values) = vars.get(key).and_then(|v| v.as_array()) {
        return values
            .iter()
            .map(|v| v.as_str().unwrap_or_default().to_string())
            .collect();
    }
    match first_env(envs) {
        Some(value) => value.split(';').map(str::to_string).collect(),
        None => Vec::new(),
    }
}

fn first_env(envs: &[&str]) -> Option<String> {
    envs.iter().find_map(|env| std::env::var(env).ok())
}

#[cfg(test)]
mod tests {
    use tfbridge_types::PropertyValue;

    use super::*;

    const UNSET: &str = "TFBRIDGE_TEST_NEVER_SET";

    fn vars() -> PropertyMap {
        let mut vars = PropertyMap::new();
        vars.insert("region".into(), PropertyValue::from("us-east-1"));
        vars.insert("insecure".into(), PropertyValue::from(true));
        vars.insert(
            "zones".into(),
            PropertyValue::from(vec![PropertyValue::from("a"), PropertyValue::from(1.0)]),
        );
        vars
    }

    #[test]
    fn test_property_map_first() {
        let vars = vars();
        assert_eq!(config_string_value(&vars, "region", &["PATH"]), "us-east-1");
        assert!(config_bool_value(&vars, "insecure", &[UNSET]));
        assert_eq!(config_array_value(&vars, "zones", &["PATH"]), vec!["a", ""]);
    }

    #[test]
    fn test_wrong_type_falls_through() {
        let vars = vars();
        assert_eq!(config_string_value(&vars, "insecure", &[UNSET]), "");
        assert!(!config_bool_value(&vars, "region", &[UNSET]));
        assert_eq!(string_value(&vars, "insecure"), "");
        assert_eq!(string_value(&vars, "region"), "us-east-1");
    }

    #[test]
    fn test_environment_fallback() {
        let vars = PropertyMap::new();
        let path = std::env::var("PATH").unwrap_or_default();
        if !path.is_empty() {
            assert_eq!(config_string_value(&vars, "region", &[UNSET, "PATH"]), path);
            assert_eq!(
                config_array_value(&vars, "zones", &[UNSET, "PATH"]),
                path.split(';').map(str::to_string).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_empty_defaults() {
        let vars = PropertyMap::new();
        assert_eq!(config_string_value(&vars, "region", &[UNSET]), "");
        assert!(!config_bool_value(&vars, "insecure", &[UNSET]));
        assert!(config_array_value(&vars, "zones", &[UNSET]).is_empty());
    }
}
