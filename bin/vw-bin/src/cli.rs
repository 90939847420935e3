use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct VaultwatchCli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// OTEL collector endpoint
    #[arg(long, env = "OTEL_COLLECTOR_ENDPOINT")]
    pub otel_collector_endpoint: Option<String>,

    /// API port
    #[arg(long, env = "API_PORT", default_value = "8080")]
    pub api_port: u16,

    /// Vaults.fyi API key
    #[arg(long, env = "VAULTSFYI_API_KEY")]
    pub vaultsfyi_api_key: String,

    /// Wallet reported on by the refresh cycle and by default in portfolio summaries
    #[arg(long, env = "DEFAULT_WALLET")]
    pub default_wallet: Option<String>,

    /// Base JSON-RPC endpoint, the public Base RPC when unset
    #[arg(long, env = "BASE_RPC_URL")]
    pub base_rpc_url: Option<String>,

    /// Alchemy API key, its Base endpoint is tried first when set
    #[arg(long, env = "ALCHEMY_API_KEY")]
    pub alchemy_api_key: Option<String>,

    /// Absolute 1d APY change, in percent points, that raises an alert
    #[arg(long, env = "THRESHOLD_APY_DELTA", default_value_t = 0.5)]
    pub threshold_apy_delta: f64,

    /// Relative TVL drop, in percent, that raises an alert
    #[arg(long, env = "THRESHOLD_TVL_DROP", default_value_t = 5.0)]
    pub threshold_tvl_drop: f64,

    /// Seconds between two refresh cycles
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value_t = 3600)]
    pub refresh_interval_secs: u64,
}
