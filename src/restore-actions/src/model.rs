use plugin_core::{Error, Result, Unstructured};

use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use kube::{Resource, ResourceExt};
use std::borrow::Cow;

/// Replicated workloads whose replica count can be rewritten on restore.
#[derive(Clone, Debug, PartialEq)]
pub enum Workload {
    Deployment(Deployment),
    StatefulSet(StatefulSet),
}

impl Workload {
    /// Decodes `item` into the typed shape matching its `kind`.
    pub fn from_item(item: &Unstructured) -> Result<Self> {
        match item.kind() {
            Some(kind) if kind == Deployment::kind(&()) => {
                Ok(Workload::Deployment(item.to_typed()?))
            }
            Some(kind) if kind == StatefulSet::kind(&()) => {
                Ok(Workload::StatefulSet(item.to_typed()?))
            }
            other => Err(Error::UnsupportedKind(other.unwrap_or_default().to_string())),
        }
    }

    pub fn kind(&self) -> Cow<'static, str> {
        match self {
            Workload::Deployment(_) => Deployment::kind(&()),
            Workload::StatefulSet(_) => StatefulSet::kind(&()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Workload::Deployment(d) => d.name_any(),
            Workload::StatefulSet(s) => s.name_any(),
        }
    }

    pub fn namespace(&self) -> Option<String> {
        match self {
            Workload::Deployment(d) => d.namespace(),
            Workload::StatefulSet(s) => s.namespace(),
        }
    }

    pub fn replicas(&self) -> Option<i32> {
        match self {
            Workload::Deployment(d) => d.spec.as_ref()?.replicas,
            Workload::StatefulSet(s) => s.spec.as_ref()?.replicas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Workload;
    use crate::fixtures;
    use plugin_core::Error;

    use serde_json::json;

    #[test]
    fn dispatches_on_kind() {
        let deployment = Workload::from_item(&fixtures::deployment(Some(2), &[])).unwrap();
        assert!(matches!(deployment, Workload::Deployment(_)));
        assert_eq!(deployment.kind(), "Deployment");
        assert_eq!(deployment.replicas(), Some(2));
        assert_eq!(deployment.name(), "test-deployment");
        assert_eq!(deployment.namespace().as_deref(), Some("test-namespace"));

        let stateful_set = Workload::from_item(&fixtures::stateful_set(Some(4), &[])).unwrap();
        assert!(matches!(stateful_set, Workload::StatefulSet(_)));
        assert_eq!(stateful_set.replicas(), Some(4));
    }

    #[test]
    fn rejects_other_kinds() {
        let err = Workload::from_item(&fixtures::service(&[], &[])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(kind) if kind == "Service"));

        let err = Workload::from_item(&fixtures::item(json!({ "metadata": {} }))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(kind) if kind.is_empty()));
    }

    #[test]
    fn malformed_workload_is_a_conversion_error() {
        let item = fixtures::item(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "broken" },
            "spec": { "replicas": "three" },
        }));
        let err = Workload::from_item(&item).unwrap_err();
        assert!(matches!(err, Error::Conversion { ref kind, .. } if kind == "Deployment"));
    }
}
