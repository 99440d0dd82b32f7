use super::{string_annotation, SELECTOR_ANNOTATION};

use plugin_core::{
    Error, OperationProgress, ResourceIdentifier, ResourceSelector, Restore, RestoreItemAction,
    RestoreItemActionExecuteInput, RestoreItemActionExecuteOutput, Result, Unstructured,
};

use itertools::Itertools;
use k8s_openapi::api::core::v1::Service;
use kube::{Resource, ResourceExt};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Replaces a service's `spec.selector` with the JSON map stored in the
/// `eth-eks.velero/update-svc-selector` annotation.
#[derive(Clone, Debug, Default)]
pub struct UpdateSvcSelectorAction;

impl UpdateSvcSelectorAction {
    pub const NAME: &'static str = "eth-eks/update-svc-selector";

    pub fn new() -> Self {
        Self
    }
}

/// Selector carried by the annotation. A JSON `null` means no selector.
fn selector_from_annotation(item: &Unstructured) -> Result<Option<BTreeMap<String, String>>> {
    let Some(selector) = string_annotation(item, SELECTOR_ANNOTATION)? else {
        return Ok(None);
    };
    serde_json::from_str::<Option<BTreeMap<String, String>>>(selector).map_err(Error::Decode)
}

fn format_selector(selector: &BTreeMap<String, String>) -> String {
    selector
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .join(",")
}

impl RestoreItemAction for UpdateSvcSelectorAction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn applies_to(&self) -> Result<ResourceSelector> {
        Ok(ResourceSelector::included_resources(["services"]))
    }

    fn execute(
        &self,
        input: &RestoreItemActionExecuteInput,
    ) -> Result<RestoreItemActionExecuteOutput> {
        info!("Executing {}", Self::NAME);

        let item = &input.item;
        let Some(selector) = selector_from_annotation(item)? else {
            debug!(
                "Skipping {} because it does not have the {} annotation",
                item.reference(),
                SELECTOR_ANNOTATION,
            );
            return Ok(RestoreItemActionExecuteOutput::new(item.clone()));
        };

        let service: Service = item.to_typed()?;
        info!(
            "Updating selector of {} {}/{} to: {}",
            Service::kind(&()),
            service.namespace().unwrap_or_default(),
            service.name_any(),
            format_selector(&selector),
        );

        let mut updated = item.clone();
        // An empty selector serializes as an omitted field.
        if selector.is_empty() {
            updated.remove_nested_field(&["spec", "selector"]);
        } else {
            updated.set_nested_field(json!(selector), &["spec", "selector"]);
        }
        Ok(RestoreItemActionExecuteOutput::new(updated))
    }

    fn progress(&self, _operation_id: &str, _restore: &Restore) -> Result<OperationProgress> {
        Ok(OperationProgress::completed())
    }

    fn cancel(&self, _operation_id: &str, _restore: &Restore) -> Result<()> {
        Ok(())
    }

    fn are_additional_items_ready(
        &self,
        _additional_items: &[ResourceIdentifier],
        _restore: &Restore,
    ) -> Result<bool> {
        Ok(true)
    }
}
