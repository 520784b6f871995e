use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "etcdutil-demo",
    version,
    about = "Exercise libetcdutil in a loop until a leased key expires"
)]
pub struct Cli {
    /// YAML file with endpoints, timeout and optional credentials
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Endpoint to connect to, may be repeated; overrides the config file
    #[arg(short, long = "endpoint")]
    pub endpoints: Vec<String>,

    /// Key prefix every round writes under
    #[arg(long, default_value = "/talkcni")]
    pub prefix: String,

    /// TTL in seconds of the lease attached to the second write
    #[arg(long, default_value_t = 4)]
    pub lease_ttl: i64,

    /// Seconds to sleep between rounds
    #[arg(long, default_value_t = 2)]
    pub interval: u64,

    /// Stop after this many rounds even if the prefix never empties
    #[arg(long)]
    pub max_rounds: Option<u64>,
}
