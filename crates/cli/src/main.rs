use clap::Parser;
use delirium_domain::{CliOverrides, Config, EvictionPolicy, StoreBackend};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "delirium")]
#[command(version)]
#[command(about = "Delirium DNS - decoy resolver that answers every name with a fake address")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Subnet fake addresses are drawn from (CIDR)
    #[arg(short = 's', long)]
    subnet: Option<String>,

    /// Seconds a binding lives without being asked for
    #[arg(short = 't', long)]
    ttl: Option<u32>,

    /// Delete expired bindings instead of marking them
    #[arg(long)]
    delete: bool,

    /// Record store backend (memory, sqlite)
    #[arg(long)]
    backend: Option<StoreBackend>,

    /// Database path (sqlite backend)
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Append logs to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    log_path: Option<String>,

    /// Raise verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let log_level = match self.verbose {
            0 => self.log_level.clone(),
            1 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        };

        CliOverrides {
            bind_address: self.bind.clone(),
            dns_port: self.port,
            subnet: self.subnet.clone(),
            ttl: self.ttl,
            eviction: self.delete.then_some(EvictionPolicy::Delete),
            backend: self.backend,
            database_path: self.database.clone(),
            log_level,
            log_path: self.log_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = cli.overrides();

    let config = bootstrap::load_config(cli.config.as_deref(), overrides.clone())?;

    bootstrap::init_logging(&config.logging)?;

    info!("Starting Delirium DNS v{}", env!("CARGO_PKG_VERSION"));
    bootstrap::log_advisories(&config);

    let store = bootstrap::init_store(&config.database).await?;

    let listen_address = config.server.listen_address();
    let config_arc = Arc::new(RwLock::new(config));

    let services = di::Services::new(config_arc, store, overrides).await?;

    let mut dns_server = server::bind_dns_server(&listen_address, services.dns_handler()).await?;
    let mut dns_task = tokio::spawn(async move { dns_server.block_until_done().await });

    let config_path = cli.config.clone().or_else(Config::get_config_path);
    let mut sighup = Sighup::register();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
            _ = sighup.recv() => {
                match config_path.as_deref() {
                    Some(path) => {
                        if let Err(e) = services.reload_config.execute(path).await {
                            error!(error = %e, "Configuration reload failed; keeping current settings");
                        }
                    }
                    None => warn!("SIGHUP received but no configuration file is in use"),
                }
            }
            result = &mut dns_task => {
                match result {
                    Ok(Ok(())) => info!("DNS server stopped"),
                    Ok(Err(e)) => error!(error = %e, "DNS server error"),
                    Err(e) => error!(error = %e, "DNS server task failed"),
                }
                break;
            }
        }
    }

    dns_task.abort();

    match services.engine.records(false).await {
        Ok(active) => info!(active = active.len(), "Active bindings at shutdown"),
        Err(e) => warn!(error = %e, "Could not count active bindings"),
    }

    services.store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// SIGHUP stream registered once for the lifetime of the process.
#[cfg(unix)]
struct Sighup(Option<tokio::signal::unix::Signal>);

#[cfg(unix)]
impl Sighup {
    fn register() -> Self {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::hangup()) {
            Ok(stream) => Self(Some(stream)),
            Err(e) => {
                warn!(error = %e, "Failed to register SIGHUP handler; reload disabled");
                Self(None)
            }
        }
    }

    async fn recv(&mut self) {
        if let Some(stream) = self.0.as_mut() {
            if stream.recv().await.is_some() {
                return;
            }
        }
        std::future::pending::<()>().await
    }
}

#[cfg(not(unix))]
struct Sighup;

#[cfg(not(unix))]
impl Sighup {
    fn register() -> Self {
        Self
    }

    async fn recv(&mut self) {
        std::future::pending::<()>().await
    }
}
