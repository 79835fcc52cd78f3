use clap::Parser;
use ferrous_ptr_domain::CliOverrides;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "ferrous-ptr")]
#[command(version)]
#[command(about = "Ferrous PTR - DNS forwarder that synthesizes reverse lookups for local networks")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream resolver (tcp://IP:PORT, tls://HOSTNAME@IP:PORT or IP:PORT)
    #[arg(short = 'u', long)]
    upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        upstream: cli.upstream.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous PTR v{}", env!("CARGO_PKG_VERSION"));

    let backends = di::Backends::new(&config).await?;
    let dns_services = di::DnsServices::new(&config, &backends)?;

    let config_path = cli.config.clone().or_else(ferrous_ptr_domain::Config::get_config_path);
    let use_cases = di::UseCases::new(&dns_services, config_path);
    server::spawn_reload_listener(use_cases.reload_policy.clone())?;

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let num_workers = server::resolve_worker_count(config.server.num_workers);

    tokio::select! {
        result = server::start_dns_server(dns_addr, dns_services.handler, num_workers) => {
            if let Err(e) = result {
                error!(error = %e, "DNS server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
