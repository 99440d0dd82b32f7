use crate::{
    config::Settings, Error, Metrics, ResourceIdentifier, ResourceSelector, Restore,
    RestoreItemAction, RestoreItemActionExecuteInput, RestoreItemActionExecuteOutput, Result,
};

use actix_web::{
    get,
    http::StatusCode,
    middleware, post,
    web::{Data, Json, JsonConfig, ServiceConfig},
    App, HttpResponse, HttpServer, Responder, ResponseError,
};
use prometheus::{Encoder, Registry, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// Collects restore item actions and serves them over HTTP.
pub struct Server {
    settings: Settings,
    actions: BTreeMap<&'static str, Arc<dyn RestoreItemAction>>,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            actions: BTreeMap::new(),
        }
    }

    /// Registers `action` under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register_restore_item_action<A>(mut self, action: A) -> Self
    where
        A: RestoreItemAction + 'static,
    {
        let name = action.name();
        if self.actions.insert(name, Arc::new(action)).is_some() {
            warn!("Restore item action {} registered twice, keeping the latest", name);
        }
        self
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    /// Binds the listener and serves until the process is signalled to stop.
    pub async fn serve(self) -> anyhow::Result<()> {
        let Server { settings, actions } = self;
        let state = Data::new(State::new(actions)?);

        info!(
            "Serving restore item actions {:?} on {}",
            state.actions.keys().collect::<Vec<_>>(),
            settings.bind_address
        );
        let mut server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(middleware::Logger::default().exclude("/health"))
                .configure(routes)
        })
        .bind(&settings.bind_address)?
        .shutdown_timeout(settings.shutdown_timeout);
        if let Some(workers) = settings.workers {
            server = server.workers(workers);
        }
        server.run().await?;
        Ok(())
    }
}

/// Shared state of the HTTP workers.
pub struct State {
    actions: BTreeMap<&'static str, Arc<dyn RestoreItemAction>>,
    registry: Registry,
    metrics: Metrics,
}

impl State {
    pub fn new(actions: BTreeMap<&'static str, Arc<dyn RestoreItemAction>>) -> Result<Self> {
        let registry = Registry::default();
        let api_metrics = Metrics::new()?.register(&registry)?;
        Ok(Self {
            actions,
            registry,
            metrics: api_metrics,
        })
    }

    pub fn from_actions<I>(actions: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn RestoreItemAction>>,
    {
        Self::new(actions.into_iter().map(|a| (a.name(), a)).collect())
    }

    fn action(&self, name: &str) -> Result<&Arc<dyn RestoreItemAction>> {
        self.actions
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))
    }

    pub fn execute(
        &self,
        name: &str,
        input: &RestoreItemActionExecuteInput,
    ) -> Result<RestoreItemActionExecuteOutput> {
        let action = self.action(name)?;
        let _span =
            info_span!("execute", action = name, item = %input.item.reference()).entered();
        let _timer = self.metrics.count_and_measure(name);
        action.execute(input).map_err(|err| {
            warn!("Restore item action failed: {}", err);
            self.metrics.execute_failure(name, &err);
            err
        })
    }

    fn encode_metrics(&self) -> Result<Vec<u8>> {
        let mut buffer = vec![];
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(Error::Metrics)?;
        Ok(buffer)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownAction(_) => StatusCode::NOT_FOUND,
            Error::Validation(_)
            | Error::Decode(_)
            | Error::Parse { .. }
            | Error::UnsupportedKind(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Conversion { .. } | Error::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string(),
            "kind": self.metric_label(),
        }))
    }
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub action: String,
    #[serde(flatten)]
    pub input: RestoreItemActionExecuteInput,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub action: String,
    #[serde(rename = "operationID")]
    pub operation_id: String,
    #[serde(default)]
    pub restore: Restore,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalItemsRequest {
    pub action: String,
    #[serde(default)]
    pub additional_items: Vec<ResourceIdentifier>,
    #[serde(default)]
    pub restore: Restore,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ActionDescriptor {
    name: &'static str,
    applies_to: ResourceSelector,
}

/// Largest accepted request body; restored manifests can be large.
const MAX_PAYLOAD_SIZE: usize = 4 * 1024 * 1024;

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().limit(MAX_PAYLOAD_SIZE))
        .service(health)
        .service(metrics)
        .service(list_actions)
        .service(execute)
        .service(progress)
        .service(cancel)
        .service(additional_items_ready);
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json("healthy")
}

#[get("/metrics")]
async fn metrics(state: Data<State>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type(prometheus::TEXT_FORMAT)
        .body(state.encode_metrics()?))
}

#[get("/v1/actions")]
async fn list_actions(state: Data<State>) -> Result<HttpResponse> {
    let mut actions = Vec::with_capacity(state.actions.len());
    for (name, action) in &state.actions {
        actions.push(ActionDescriptor {
            name: *name,
            applies_to: action.applies_to()?,
        });
    }
    Ok(HttpResponse::Ok().json(actions))
}

#[post("/v1/execute")]
async fn execute(state: Data<State>, request: Json<ExecuteRequest>) -> Result<HttpResponse> {
    let ExecuteRequest { action, input } = request.into_inner();
    let output = state.execute(&action, &input)?;
    Ok(HttpResponse::Ok().json(output))
}

#[post("/v1/progress")]
async fn progress(state: Data<State>, request: Json<OperationRequest>) -> Result<HttpResponse> {
    let progress = state
        .action(&request.action)?
        .progress(&request.operation_id, &request.restore)?;
    Ok(HttpResponse::Ok().json(progress))
}

#[post("/v1/cancel")]
async fn cancel(state: Data<State>, request: Json<OperationRequest>) -> Result<HttpResponse> {
    state
        .action(&request.action)?
        .cancel(&request.operation_id, &request.restore)?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/v1/additional-items-ready")]
async fn additional_items_ready(
    state: Data<State>,
    request: Json<AdditionalItemsRequest>,
) -> Result<HttpResponse> {
    let ready = state
        .action(&request.action)?
        .are_additional_items_ready(&request.additional_items, &request.restore)?;
    Ok(HttpResponse::Ok().json(json!({ "ready": ready })))
}
