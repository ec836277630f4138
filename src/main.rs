//! Appointment agent - function server for a voice agent
//!
//! Serves the appointment tools over HTTP and, when configured, runs the
//! returned actions in-process.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use swaig_chain::api::{create_router, AppState};
use swaig_chain::config::AgentConfig;
use swaig_chain::host::{
    ActionExecutor, CallControl, DryRunCarrier, SessionStore, SmsGateway, WebhookCarrier,
};
use swaig_chain::tools::ToolRegistry;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swaig_chain=info,appointment_agent=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AgentConfig::from_env();
    let registry = ToolRegistry::appointment(&config);
    let sessions = Arc::new(SessionStore::new());

    tracing::info!(
        agent = %config.name,
        functions = ?registry.definitions().iter().map(|d| d.name.clone()).collect::<Vec<_>>(),
        "Tool registry initialized"
    );

    let port = config.port;
    let shutdown = CancellationToken::new();
    let sweeper = sessions.clone().spawn_sweeper(
        SESSION_SWEEP_INTERVAL,
        config.ended_retention,
        shutdown.clone(),
    );
    let execute_actions = config.execute_actions;
    let carrier_webhook = config.carrier_webhook.clone();
    let mut state = AppState::new(config, registry, sessions.clone());

    if execute_actions {
        let (sms, calls): (Arc<dyn SmsGateway>, Arc<dyn CallControl>) = match carrier_webhook {
            Some(url) => {
                tracing::info!(url = %url, "Executing actions through carrier webhook");
                let carrier = Arc::new(WebhookCarrier::new(url)?);
                (carrier.clone() as Arc<dyn SmsGateway>, carrier as Arc<dyn CallControl>)
            }
            None => {
                tracing::warn!("No SWAIG_CARRIER_WEBHOOK set, actions are only logged");
                (
                    Arc::new(DryRunCarrier) as Arc<dyn SmsGateway>,
                    Arc::new(DryRunCarrier) as Arc<dyn CallControl>,
                )
            }
        };
        state = state.with_executor(ActionExecutor::new(sms, calls, sessions));
    } else {
        tracing::info!("Returning actions to the external host");
    }

    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Appointment agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    sweeper.await?;
    tracing::info!("Appointment agent stopped");

    Ok(())
}

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Resolves on Ctrl-C or when `shutdown` is cancelled elsewhere
async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                shutdown.cancelled().await;
            }
        }
        () = shutdown.cancelled() => {}
    }
    tracing::info!("Shutting down");
}
