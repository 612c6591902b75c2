use std::sync::Arc;

use tfbridge_shim::CallContext;
use tfbridge_types::{PropertyKey, PropertyMap, PropertyValue};

use super::ComputeId;
use crate::error::InfoError;

/// ID hook that reads the resource ID from the string field `field` of its
/// state.
///
/// Errors name `provider` and point users at `repository`, since a missing
/// or malformed ID field is a bug in the provider mapping. A secret field is
/// unwrapped with a warning: resource IDs are never secret.
pub fn delegate_id_field(
    field: impl Into<PropertyKey>,
    provider: impl Into<String>,
    repository: impl Into<String>,
) -> ComputeId {
    let field = field.into();
    let provider = provider.into();
    let repository = repository.into();

    Arc::new(move |cx: &CallContext, state: &PropertyMap| {
        let error = |message: String| InfoError::DelegateId {
            message,
            provider: provider.clone(),
            repository: repository.clone(),
        };

        let Some(value) = state.get(&field) else {
            return Err(error(format!(
                "Could not find required property '{}' in state",
                field
            )));
        };

        if value.contains_unknowns() {
            return Err(error(format!(
                "Expected '{}' property to be known, found a computed value",
                field
            )));
        }

        let value = match value {
            PropertyValue::Secret(inner) => {
                warn_secret(cx, &field);
                &**inner
            }
            PropertyValue::Output(output) if output.secret => {
                warn_secret(cx, &field);
                &*output.element
            }
            // A plain output is not unwrapped and fails the string check below.
            other => other,
        };

        match value {
            PropertyValue::String(id) => Ok(id.clone()),
            other => Err(error(format!(
                "Expected '{}' property to be a string, found {}",
                field,
                other.type_name()
            ))),
        }
    })
}

fn warn_secret(cx: &CallContext, field: &PropertyKey) {
    cx.logger().warn(&format!(
        "Setting non-secret resource ID as '{}' (which is secret)",
        field
    ));
}

#[cfg(test)]
mod tests {
    use tfbridge_types::Output;

    use super::*;

    fn compute(state: PropertyMap) -> Result<String, InfoError> {
        let hook = delegate_id_field("name", "random", "https://github.com/example/random/issues");
        hook(&CallContext::background(), &state)
    }

    fn state(value: PropertyValue) -> PropertyMap {
        let mut state = PropertyMap::new();
        state.insert("name".into(), value);
        state
    }

    #[test]
    fn test_reads_string_field() {
        assert_eq!(compute(state(PropertyValue::from("abc"))).unwrap(), "abc");
    }

    #[test]
    fn test_secret_output_unwrapped() {
        let output = Output::known(PropertyValue::from("abc")).with_secret(true);
        assert_eq!(compute(state(output.into())).unwrap(), "abc");
    }

    #[test]
    fn test_plain_output_rejected() {
        let output = Output::known(PropertyValue::from("abc"));
        let err = compute(state(output.into())).unwrap_err();
        assert!(err.to_string().starts_with("Expected 'name' property to be a string, found output."));
    }

    #[test]
    fn test_missing_field() {
        let err = compute(PropertyMap::new()).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Could not find required property 'name' in state. This is an error in random resource provider, please report at https://github.com/example/random/issues"
        );
    }

    #[test]
    fn test_non_string_field() {
        let err = compute(state(PropertyValue::from(1.0))).unwrap_err();
        assert!(err.to_string().starts_with("Expected 'name' property to be a string, found number."));
    }

    #[test]
    fn test_computed_field() {
        let err = compute(state(PropertyValue::computed(PropertyValue::from("")))).unwrap_err();
        assert!(matches!(err, InfoError::DelegateId { .. }));

        let err = compute(state(Output::unknown().into())).unwrap_err();
        assert!(matches!(err, InfoError::DelegateId { .. }));
    }
}
