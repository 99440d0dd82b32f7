//! Untyped resource documents exchanged between the host and the actions.
//!
//! Lookups never assume a shape: any level of the tree that is missing or is
//! not an object reads as absent.
use crate::{Error, Result};

use kube::Resource;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Unstructured {
    object: Map<String, Value>,
}

impl Unstructured {
    pub fn kind(&self) -> Option<&str> {
        self.object.get("kind").and_then(Value::as_str)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.object.get("apiVersion").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.nested_map(&["metadata"])?.get("name").and_then(Value::as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.nested_map(&["metadata"])?
            .get("namespace")
            .and_then(Value::as_str)
    }

    /// Annotations container, or `None` when it is missing or not an object.
    pub fn annotations(&self) -> Option<&Map<String, Value>> {
        self.nested_map(&["metadata", "annotations"])
    }

    /// Raw annotation value. The value is not required to be a string.
    pub fn annotation(&self, key: &str) -> Option<&Value> {
        self.annotations()?.get(key)
    }

    /// `<kind> <namespace>/<name>` for log lines.
    pub fn reference(&self) -> String {
        format!(
            "{} {}/{}",
            self.kind().unwrap_or("<unknown>"),
            self.namespace().unwrap_or_default(),
            self.name().unwrap_or_default(),
        )
    }

    pub fn nested_map(&self, path: &[&str]) -> Option<&Map<String, Value>> {
        path.iter()
            .try_fold(&self.object, |map, key| map.get(*key)?.as_object())
    }

    pub fn nested_field(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        self.nested_map(parents)?.get(*last)
    }

    /// Writes `value` at `path`, creating intermediate objects. Intermediates
    /// that exist but are not objects are replaced.
    pub fn set_nested_field(&mut self, value: Value, path: &[&str]) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut map = &mut self.object;
        for key in parents {
            let entry = map
                .entry(*key)
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(child) = entry else {
                return;
            };
            map = child;
        }
        map.insert((*last).to_string(), value);
    }

    /// Removes the field at `path`, returning it if it was present.
    pub fn remove_nested_field(&mut self, path: &[&str]) -> Option<Value> {
        let (last, parents) = path.split_last()?;
        parents
            .iter()
            .try_fold(&mut self.object, |map, key| map.get_mut(*key)?.as_object_mut())?
            .remove(*last)
    }

    /// Decodes the document into a typed resource.
    pub fn to_typed<K>(&self) -> Result<K>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned,
    {
        serde_json::from_value(Value::Object(self.object.clone())).map_err(|source| {
            Error::Conversion {
                kind: K::kind(&()).into_owned(),
                source,
            }
        })
    }

    /// Encodes a typed resource into an untyped document.
    pub fn from_typed<K>(resource: &K) -> Result<Self>
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let conversion_error = |source: serde_json::Error| Error::Conversion {
            kind: K::kind(&()).into_owned(),
            source,
        };
        match serde_json::to_value(resource).map_err(conversion_error)? {
            Value::Object(object) => Ok(Self { object }),
            other => Err(conversion_error(<serde_json::Error as serde::ser::Error>::custom(
                format!("expected an object, got {other}"),
            ))),
        }
    }
}
