//! Resource documents shared by the tests.
use plugin_core::{RestoreItemActionExecuteInput, Unstructured};

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

fn metadata(name: &str, annotations: &[(&str, &str)]) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some("test-namespace".to_string()),
        annotations: (!annotations.is_empty()).then(|| string_map(annotations)),
        ..Default::default()
    }
}

pub fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn item(value: serde_json::Value) -> Unstructured {
    serde_json::from_value(value).unwrap()
}

pub fn input(item: Unstructured) -> RestoreItemActionExecuteInput {
    RestoreItemActionExecuteInput {
        item_from_backup: item.clone(),
        item,
        ..Default::default()
    }
}

pub fn deployment(replicas: Option<i32>, annotations: &[(&str, &str)]) -> Unstructured {
    let deployment = Deployment {
        metadata: metadata("test-deployment", annotations),
        spec: Some(DeploymentSpec {
            replicas,
            ..Default::default()
        }),
        ..Default::default()
    };
    Unstructured::from_typed(&deployment).unwrap()
}

pub fn stateful_set(replicas: Option<i32>, annotations: &[(&str, &str)]) -> Unstructured {
    let stateful_set = StatefulSet {
        metadata: metadata("test-statefulset", annotations),
        spec: Some(StatefulSetSpec {
            replicas,
            service_name: "test-statefulset".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    };
    Unstructured::from_typed(&stateful_set).unwrap()
}

pub fn service(selector: &[(&str, &str)], annotations: &[(&str, &str)]) -> Unstructured {
    let service = Service {
        metadata: metadata("test-service", annotations),
        spec: Some(ServiceSpec {
            selector: (!selector.is_empty()).then(|| string_map(selector)),
            ports: Some(vec![ServicePort {
                port: 80,
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };
    Unstructured::from_typed(&service).unwrap()
}

/// A service manifest as it comes out of a backup, carrying status and
/// fields the typed model does not know about.
pub fn service_from_backup(annotation: &str) -> Unstructured {
    let manifest = format!(
        r#"
apiVersion: v1
kind: Service
metadata:
  name: web
  namespace: shop
  labels:
    app: old-app
  annotations:
    eth-eks.velero/update-svc-selector: '{annotation}'
    example.com/owner: team-a
  uid: 5d1c2c2e-55a6-4a0c-9a8e-7b8b1c1e0d44
spec:
  type: ClusterIP
  clusterIP: 10.0.0.12
  selector:
    app: old-app
    tier: backend
  ports:
    - name: http
      port: 80
      targetPort: 8080
  x-vendor-extension:
    keep: true
status:
  loadBalancer: {{}}
"#
    );
    serde_yaml::from_str(&manifest).unwrap()
}
