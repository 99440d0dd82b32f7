use crate::{Result, Unstructured};

use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Which resources the host should route to an action.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSelector {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<String>,
}

impl ResourceSelector {
    pub fn included_resources<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            included_resources: resources.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// The restore an item belongs to. Only the metadata is carried.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Restore {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdentifier {
    #[serde(default)]
    pub group: String,
    pub resource: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestoreItemActionExecuteInput {
    /// Item being restored, possibly already modified by earlier actions
    pub item: Unstructured,
    /// Item exactly as it was captured in the backup
    #[serde(default)]
    pub item_from_backup: Unstructured,
    #[serde(default)]
    pub restore: Restore,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestoreItemActionExecuteOutput {
    pub updated_item: Unstructured,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_items: Vec<ResourceIdentifier>,
    #[serde(default)]
    pub skip_restore: bool,
    #[serde(default, rename = "operationID", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default)]
    pub wait_for_additional_items: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_item_wait_timeout_seconds: Option<u64>,
}

impl RestoreItemActionExecuteOutput {
    pub fn new(updated_item: Unstructured) -> Self {
        Self {
            updated_item,
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationProgress {
    pub completed: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub err: String,
    #[serde(default)]
    pub n_completed: i64,
    #[serde(default)]
    pub n_total: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operation_units: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl OperationProgress {
    pub fn completed() -> Self {
        Self {
            completed: true,
            updated: Some(Utc::now()),
            ..Default::default()
        }
    }
}

/// A hook the host invokes for every restored item matching [`applies_to`].
///
/// Implementations are called concurrently from several workers and must
/// not keep per-item state.
///
/// [`applies_to`]: RestoreItemAction::applies_to
pub trait RestoreItemAction: Send + Sync {
    fn name(&self) -> &'static str;

    fn applies_to(&self) -> Result<ResourceSelector>;

    fn execute(
        &self,
        input: &RestoreItemActionExecuteInput,
    ) -> Result<RestoreItemActionExecuteOutput>;

    /// Progress of an asynchronous operation started by `execute`.
    fn progress(&self, operation_id: &str, restore: &Restore) -> Result<OperationProgress>;

    fn cancel(&self, operation_id: &str, restore: &Restore) -> Result<()>;

    fn are_additional_items_ready(
        &self,
        additional_items: &[ResourceIdentifier],
        restore: &Restore,
    ) -> Result<bool>;
}
