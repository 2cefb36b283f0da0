//! Mesh control-plane HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, the record store, credential verification, and the
//! HTTP router, then serves the API and the metrics listener.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use anyhow::Context;
use controlplane::app::{AppState, build_router};
use controlplane::config::ControlPlaneConfig;
use controlplane::observability;
use controlplane::store::ControlPlaneStore;
use controlplane::store::memory::InMemoryStore;
use controlplane::store::seed::Seed;
use mesh_authz::{ActorResolver, JwtCredentialVerifier};
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ControlPlaneConfig::from_env_or_yaml().context("control plane config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ControlPlaneConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("mesh-controlplane")?;
    let state = build_state(config.clone()).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state.clone());
    let addr = config.bind_addr;
    tracing::info!(
        %addr,
        backend = state.store.backend_name(),
        durable = state.store.is_durable(),
        "control plane listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: ControlPlaneConfig) -> anyhow::Result<AppState> {
    let secret = config
        .jwt
        .secret
        .as_deref()
        .context("MESH_JWT_SECRET must be set")?;
    let store: Arc<dyn ControlPlaneStore> = Arc::new(InMemoryStore::new());
    if let Some(path) = &config.seed_path {
        Seed::load(path)?
            .apply(store.as_ref())
            .await
            .context("apply seed")?;
    }
    if config.master_key.is_none() {
        tracing::warn!("no master key configured; privileged access is disabled");
    }
    let verifier = JwtCredentialVerifier::new(
        config.jwt.issuer.clone(),
        secret.as_bytes(),
        config.jwt.leeway_secs,
    );
    Ok(AppState {
        store,
        resolver: ActorResolver::new(config.master_key, Arc::new(verifier)),
    })
}
