use super::{string_annotation, REPLICAS_ANNOTATION};
use crate::model::Workload;

use plugin_core::{
    Error, OperationProgress, ResourceIdentifier, ResourceSelector, Restore, RestoreItemAction,
    RestoreItemActionExecuteInput, RestoreItemActionExecuteOutput, Result, Unstructured,
};

use serde_json::json;
use tracing::{debug, info};

/// Sets `spec.replicas` of deployments and stateful sets to the value of the
/// `eth-eks.velero/replicas-value-after-recovery` annotation.
#[derive(Clone, Debug, Default)]
pub struct UpdateReplicasAction;

impl UpdateReplicasAction {
    pub const NAME: &'static str = "eth-eks/update-replicas";

    pub fn new() -> Self {
        Self
    }
}

fn replicas_from_annotation(item: &Unstructured) -> Result<Option<i32>> {
    let Some(value) = string_annotation(item, REPLICAS_ANNOTATION)? else {
        return Ok(None);
    };
    let replicas = value.parse::<i32>().map_err(|source| Error::Parse {
        value: value.to_string(),
        source,
    })?;
    if replicas < 0 {
        return Err(Error::Validation(format!(
            "annotation {} must not be negative, got {}",
            REPLICAS_ANNOTATION, replicas
        )));
    }
    Ok(Some(replicas))
}

impl RestoreItemAction for UpdateReplicasAction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn applies_to(&self) -> Result<ResourceSelector> {
        Ok(ResourceSelector::included_resources(["statefulsets", "deployments"]))
    }

    fn execute(
        &self,
        input: &RestoreItemActionExecuteInput,
    ) -> Result<RestoreItemActionExecuteOutput> {
        info!("Executing {}", Self::NAME);

        let item = &input.item;
        let Some(replicas) = replicas_from_annotation(item)? else {
            debug!(
                "Skipping {} because it does not have the {} annotation",
                item.reference(),
                REPLICAS_ANNOTATION,
            );
            return Ok(RestoreItemActionExecuteOutput::new(item.clone()));
        };

        let workload = Workload::from_item(item)?;
        info!(
            "Updating replicas of {} {}/{} from {:?} to {}",
            workload.kind(),
            workload.namespace().unwrap_or_default(),
            workload.name(),
            workload.replicas(),
            replicas,
        );

        let mut updated = item.clone();
        updated.set_nested_field(json!(replicas), &["spec", "replicas"]);
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
