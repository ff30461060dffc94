use std::{path::PathBuf, time::Duration};

use chart_tools::{
    GenerateConfig, MinioConfig, StrategyKind,
    config::{DEFAULT_GENERATE_TIMEOUT, DEFAULT_REQUEST_SERVER},
};
use clap::{ArgAction, Args, Parser, ValueEnum, builder::BoolishValueParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    Stdio,
    Sse,
    Streamable,
}

#[derive(Parser, Debug)]
#[command(name = "mcp-server-chart", version, about = "MCP server generating charts from structured data")]
pub struct Cli {
    /// Transport protocol
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = TransportKind::Stdio)]
    pub transport: TransportKind,

    /// Port for the sse and streamable transports
    #[arg(short, long, default_value_t = 1122)]
    pub port: u16,

    /// Endpoint path; `/sse` for sse and `/mcp` for streamable when omitted
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Seconds a streamable session may stay idle before it is dropped
    #[arg(long, env = "SESSION_IDLE_TIMEOUT_SECS", default_value_t = 1800)]
    pub session_idle_timeout_secs: u64,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

impl Cli {
    pub fn endpoint(&self) -> String {
        let endpoint = match (&self.endpoint, self.transport) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, TransportKind::Streamable) => "/mcp".to_string(),
            (None, _) => "/sse".to_string(),
        };
        if endpoint.starts_with('/') {
            endpoint
        } else {
            format!("/{endpoint}")
        }
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Where charts are produced: local, antvis or minio
    #[arg(long = "strategy", env = "VIS_GENERATE_STRATEGY", default_value = "local")]
    pub strategy: StrategyKind,

    /// Chart service used by the antvis strategy
    #[arg(long, env = "VIS_REQUEST_SERVER", default_value = DEFAULT_REQUEST_SERVER)]
    pub request_server: String,

    #[arg(long, env = "MINIO_ENDPOINT", default_value = "127.0.0.1")]
    pub minio_endpoint: String,

    #[arg(
        long,
        env = "MINIO_PORT",
        default_value_t = 9000,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub minio_port: u16,

    #[arg(
        long,
        env = "MINIO_USE_SSL",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub minio_use_ssl: bool,

    #[arg(long, env = "MINIO_ACCESS_KEY", default_value = "minio", hide_env_values = true)]
    pub minio_access_key: String,

    #[arg(long, env = "MINIO_SECRET_KEY", default_value = "minioadmin", hide_env_values = true)]
    pub minio_secret_key: String,

    #[arg(long, env = "MINIO_BUCKET_NAME", default_value = "mcp-server-chart")]
    pub minio_bucket_name: String,

    /// Apply a public-read policy and return static URLs instead of presigned ones
    #[arg(
        long,
        env = "MINIO_USE_PUBLIC_BUCKET",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub minio_use_public_bucket: bool,

    /// Lifetime of presigned URLs
    #[arg(long, env = "MINIO_OBJECT_EXPIRY_SECONDS", default_value_t = 3600)]
    pub minio_object_expiry_seconds: u32,

    /// Comma-separated tool names to hide
    #[arg(long, env = "DISABLED_TOOLS", value_delimiter = ',')]
    pub disabled_tools: Vec<String>,

    /// Directory for rendered charts and upload staging (OS temp dir when unset)
    #[arg(long, env = "CHART_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "GENERATE_TIMEOUT_SECS",
        default_value_t = DEFAULT_GENERATE_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub generate_timeout_secs: u64,
}

impl GenerateArgs {
    pub fn disabled_tools(&self) -> Vec<String> {
        self.disabled_tools
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn to_config(&self) -> GenerateConfig {
        let defaults = GenerateConfig::default();
        GenerateConfig {
            strategy: self.strategy,
            request_server: self.request_server.clone(),
            output_dir: self.output_dir.clone().unwrap_or(defaults.output_dir),
            timeout: Duration::from_secs(self.generate_timeout_secs),
            minio: MinioConfig {
                endpoint: self.minio_endpoint.clone(),
                port: self.minio_port,
                use_ssl: self.minio_use_ssl,
                access_key: self.minio_access_key.clone(),
                secret_key: self.minio_secret_key.clone(),
                bucket: self.minio_bucket_name.clone(),
                public_bucket: self.minio_use_public_bucket,
                object_expiry_secs: self.minio_object_expiry_seconds,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mcp-server-chart").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_endpoint_defaults_follow_transport() {
        assert_eq!(parse(&["-t", "sse"]).endpoint(), "/sse");
        assert_eq!(parse(&["-t", "streamable"]).endpoint(), "/mcp");
        assert_eq!(parse(&["-t", "SSE", "-e", "events"]).endpoint(), "/events");
    }

    #[test]
    fn test_generate_flags() {
        let cli = parse(&[
            "--strategy",
            "minio",
            "--minio-use-ssl",
            "yes",
            "--minio-use-public-bucket",
            "on",
            "--minio-port",
            "9443",
            "--disabled-tools",
            "generate_pie_chart, generate_bar_chart,",
        ]);
        let config = cli.generate.to_config();
        assert_eq!(config.strategy, StrategyKind::Minio);
        assert!(config.minio.use_ssl);
        assert!(config.minio.public_bucket);
        assert_eq!(config.minio.port, 9443);
        assert_eq!(
            cli.generate.disabled_tools(),
            vec!["generate_pie_chart", "generate_bar_chart"]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let parse_err = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("mcp-server-chart").chain(args.iter().copied()))
                .is_err()
        };
        assert!(parse_err(&["--minio-port", "0"]));
        assert!(parse_err(&["--minio-use-ssl", "maybe"]));
        assert!(parse_err(&["--strategy", "s3"]));
        assert!(parse_err(&["--generate-timeout-secs", "0"]));
        assert!(parse_err(&["-t", "websocket"]));
    }
}
