use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "churn-serve")]
#[command(about = "Serves churn predictions from a registered model over HTTP")]
pub struct CliConfig {
    #[arg(long, env = "CHURN_SERVE_CONFIG", help = "Optional TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "CHURN_SERVE_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "CHURN_SERVE_PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "MODEL_URI", help = "e.g. runs:/<run_id>/model")]
    pub model_uri: Option<String>,

    #[arg(
        long,
        env = "MLFLOW_TRACKING_URI",
        help = "Tracking server URL or mlruns directory for runs:/ URIs (default: ./mlruns)"
    )]
    pub tracking_uri: Option<String>,

    #[arg(long, help = "Give up loading the model after this many seconds")]
    pub load_timeout_secs: Option<u64>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
