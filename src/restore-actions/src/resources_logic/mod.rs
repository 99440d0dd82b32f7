mod apps;
mod core;

pub use self::apps::*;
pub use self::core::*;

use plugin_core::{Error, Result, Unstructured};

use serde_json::Value;

pub const SELECTOR_ANNOTATION: &str = "eth-eks.velero/update-svc-selector";
pub const REPLICAS_ANNOTATION: &str = "eth-eks.velero/replicas-value-after-recovery";

/// String value of `key`, `None` when the annotation is absent.
fn string_annotation<'a>(item: &'a Unstructured, key: &str) -> Result<Option<&'a str>> {
    match item.annotation(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(Error::Validation(format!("annotation {key} must be a string"))),
    }
}
