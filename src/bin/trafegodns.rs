mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use env_logger::Builder;
use log::{error, info, warn};
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::sleep;

use trafego_core::config::{AppConfig, OperationMode, ProviderKind};
use trafego_core::context::CoreContext;
use trafego_core::ipv4::{HttpResolver, PublicIpResolver};
use trafego_core::parser::{self, ParserDefaults};
use trafego_core::poller::docker::DockerPoller;
use trafego_core::poller::traefik::TraefikPoller;
use trafego_core::provider::cloudflare::CloudflareProvider;
use trafego_core::provider::digitalocean::DigitalOceanProvider;
use trafego_core::provider::pihole::PiholeProvider;
use trafego_core::provider::route53::Route53Provider;
use trafego_core::provider::unifi::UnifiProvider;
use trafego_core::provider::Provider;
use trafego_core::reconciler::Reconciler;
use trafego_core::types::DesiredRecord;

use cli::Cli;

/// Snapshot of desired records the active poller last derived, shared
/// between the poller task (sole writer) and every reconciler task (the
/// sole readers, once per cycle).
type SharedDesiredState = Arc<AsyncMutex<Vec<DesiredRecord>>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    Builder::new().filter_level(cli.loglevel.into()).init();

    let file_config = AppConfig::load(&cli.data_dir).unwrap_or_else(|e| {
        warn!("failed to load persisted configuration, using defaults: {e}");
        AppConfig::default()
    });
    let config = file_config.merge_cli(&cli.overrides());

    let ip_resolver: Arc<dyn PublicIpResolver> = Arc::new(HttpResolver::new(
        "https://api.ipify.org",
        "https://api64.ipify.org",
    ));

    let mut ctx = match CoreContext::new(cli.data_dir.clone(), config.clone(), ip_resolver.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("failed to initialize core context: {e}");
            std::process::exit(1);
        }
    };

    for conn in &config.providers {
        let name = match build_provider(conn).await {
            Ok((name, provider)) => {
                let zone = conn.zone.clone().unwrap_or_default();
                if let Err(e) = ctx.register_provider(name.clone(), zone, provider) {
                    error!("failed to register provider {name}: {e}");
                    continue;
                }
                name
            }
            Err(e) => {
                error!("failed to construct provider: {e}");
                continue;
            }
        };
        info!("configured provider: {name}");
    }

    if ctx.providers().is_empty() {
        error!("no providers configured, nothing to reconcile");
        std::process::exit(1);
    }

    let defaults = ParserDefaults {
        generic_label_prefix: config.generic_label_prefix.clone(),
        ..ParserDefaults::default()
    };

    let freshness_horizon = Duration::from_millis(config.cache_refresh_interval_ms);
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let desired_state: SharedDesiredState = Arc::new(AsyncMutex::new(Vec::new()));

    let mut tasks = Vec::new();
    for handle in ctx.providers() {
        let reconciler = Arc::new(Reconciler::new(
            handle.name.clone(),
            handle.provider.clone(),
            handle.zone.clone(),
            freshness_horizon,
            handle.ledger.clone(),
            ctx.policy.clone(),
            ip_resolver.clone(),
            config.cleanup_orphaned,
        ));
        let bus = ctx.bus.clone();
        let run_once = cli.run_once;
        let name = handle.name.clone();
        let desired_state = desired_state.clone();
        tasks.push(tokio::spawn(async move {
            loop {
                let snapshot = desired_state.lock().await.clone();
                let report = reconciler.reconcile_once(snapshot).await;
                bus.publish(
                    trafego_core::event_bus::topics::DNS_RECORDS_UPDATED,
                    serde_json::json!({
                        "provider": name,
                        "created": report.created,
                        "updated": report.updated,
                        "unchanged": report.unchanged,
                        "deleted": report.deleted,
                        "errors": report.errors.len(),
                    }),
                );
                if run_once {
                    break;
                }
                sleep(poll_interval).await;
            }
        }));
    }

    match config.operation_mode {
        OperationMode::Direct => {
            if let Ok(docker) = bollard::Docker::connect_with_local_defaults() {
                let mut poller = DockerPoller::new(docker, ctx.bus.clone(), config.generic_label_prefix.clone(), poll_interval);
                let desired_state = desired_state.clone();
                let defaults = defaults.clone();
                tasks.push(tokio::spawn(async move {
                    loop {
                        let delay = poller.poll_once().await;
                        let records = poller
                            .snapshot()
                            .iter()
                            .flat_map(|c| parser::extract_from_labels(&c.container_id, &c.labels, &defaults).0)
                            .collect();
                        *desired_state.lock().await = records;
                        sleep(delay).await;
                    }
                }));
            } else {
                error!("unable to connect to the Docker daemon for direct operation mode");
            }
        }
        OperationMode::Traefik => {
            if let Some(conn) = config.providers.first() {
                let api_url = conn.base_url.clone().unwrap_or_else(|| "http://localhost:8080".to_string());
                let mut poller = TraefikPoller::new(api_url, ctx.bus.clone(), poll_interval);
                let desired_state = desired_state.clone();
                let defaults = defaults.clone();
                tasks.push(tokio::spawn(async move {
                    loop {
                        let delay = poller.poll_once().await;
                        let records = poller
                            .snapshot()
                            .iter()
                            .flat_map(|r| parser::extract_from_router(r, &defaults))
                            .collect();
                        *desired_state.lock().await = records;
                        sleep(delay).await;
                    }
                }));
            }
        }
    }

    for task in tasks {
        let _ = task.await;
    }
}

async fn build_provider(
    conn: &trafego_core::config::ProviderConnection,
) -> Result<(String, Arc<dyn Provider>), String> {
    match conn.kind {
        Some(ProviderKind::Cloudflare) => {
            let token = conn.api_token.clone().ok_or("cloudflare provider requires api_token")?;
            let provider = CloudflareProvider::try_new(token, false).map_err(|e| e.to_string())?;
            Ok(("cloudflare".to_string(), Arc::new(provider)))
        }
        Some(ProviderKind::Route53) => {
            let zone = conn.zone.clone().ok_or("route53 provider requires zone")?;
            let sdk_config = aws_config::load_from_env().await;
            let client = aws_sdk_route53::Client::new(&sdk_config);
            Ok(("route53".to_string(), Arc::new(Route53Provider::new(client, zone))))
        }
        Some(ProviderKind::Digitalocean) => {
            let token = conn.api_token.clone().ok_or("digitalocean provider requires api_token")?;
            let domain = conn.domain.clone().ok_or("digitalocean provider requires domain")?;
            Ok(("digitalocean".to_string(), Arc::new(DigitalOceanProvider::new(token, domain))))
        }
        Some(ProviderKind::Unifi) => {
            let base_url = conn.base_url.clone().ok_or("unifi provider requires base_url")?;
            let site = conn.site.clone().unwrap_or_else(|| "default".to_string());
            let provider = UnifiProvider::new(base_url, site, trafego_core::provider::unifi::DEFAULT_SETTLE_DELAY)
                .map_err(|e| e.to_string())?;
            if let (Some(user), Some(pass)) = (&conn.username, &conn.password) {
                provider.login(user, pass).await.map_err(|e| e.to_string())?;
            }
            Ok(("unifi".to_string(), Arc::new(provider)))
        }
        Some(ProviderKind::Pihole) => {
            let base_url = conn.base_url.clone().ok_or("pihole provider requires base_url")?;
            let token = conn.api_token.clone().ok_or("pihole provider requires api_token")?;
            Ok(("pihole".to_string(), Arc::new(PiholeProvider::new(base_url, token, 300))))
        }
        None => Err("provider connection entry is missing a `kind`".to_string()),
    }
}
