use anyhow::Result;
use never_give_up_config::NeverGiveUpConfig;
use never_give_up_core::Resolver;
use never_give_up_mcp::{ScenarioServer, ServiceExt, stdio};
use std::sync::Arc;

pub async fn run(cfg: &NeverGiveUpConfig) -> Result<()> {
    let (registry, report) = super::build_registry(cfg);
    if !report.is_ok() {
        tracing::warn!(
            "{} scenario definition(s) were skipped; run `never-give-up check` for details",
            report.errors.len()
        );
    }
    if registry.is_empty() {
        tracing::warn!("no scenarios registered; only list_scenarios will return data");
    }

    let resolver = Resolver::new(Arc::new(registry), cfg.resolver_settings());
    let server =
        ScenarioServer::new(resolver).with_info(&cfg.server.name, env!("CARGO_PKG_VERSION"));

    tracing::info!(
        "Starting {} ({} tools)",
        server.name(),
        server.tool_table().tools().len()
    );

    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
