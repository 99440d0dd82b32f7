use plugin_core::{config::Settings, telemetry, Server};
use restore_actions::{UpdateReplicasAction, UpdateSvcSelectorAction};

fn server(settings: Settings) -> Server {
    Server::new(settings)
        .register_restore_item_action(UpdateSvcSelectorAction::new())
        .register_restore_item_action(UpdateReplicasAction::new())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    telemetry::init(settings.log_format)?;

    server(settings).serve().await
}
