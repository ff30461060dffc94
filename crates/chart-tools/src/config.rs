use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use chart_error::{Error, Result};
use url::Url;

pub const DEFAULT_REQUEST_SERVER: &str = "https://antv-studio.alipay.com/api/gpt-vis";
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Local,
    Antvis,
    Minio,
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(StrategyKind::Local),
            "antvis" => Ok(StrategyKind::Antvis),
            "minio" => Ok(StrategyKind::Minio),
            other => Err(Error::Startup(format!(
                "unknown generate strategy '{other}', expected local, antvis or minio"
            ))),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::Local => "local",
            StrategyKind::Antvis => "antvis",
            StrategyKind::Minio => "minio",
        })
    }
}

#[derive(Debug, Clone)]
pub struct MinioConfig {
    pub endpoint: String,
    pub port: u16,
    pub use_ssl: bool,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub public_bucket: bool,
    pub object_expiry_secs: u32,
}

impl Default for MinioConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1".into(),
            port: 9000,
            use_ssl: false,
            access_key: "minio".into(),
            secret_key: "minioadmin".into(),
            bucket: "mcp-server-chart".into(),
            public_bucket: false,
            object_expiry_secs: 3600,
        }
    }
}

impl MinioConfig {
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl { "https" } else { "http" }
    }
}

/// Everything the generation side needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub strategy: StrategyKind,
    pub request_server: String,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub minio: MinioConfig,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            request_server: DEFAULT_REQUEST_SERVER.into(),
            output_dir: env::temp_dir(),
            timeout: DEFAULT_GENERATE_TIMEOUT,
            minio: MinioConfig::default(),
        }
    }
}

impl GenerateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::Startup("generate timeout must be positive".into()));
        }
        match self.strategy {
            StrategyKind::Local => Ok(()),
            StrategyKind::Antvis => Url::parse(&self.request_server)
                .map(|_| ())
                .map_err(|e| Error::Startup(format!("invalid VIS_REQUEST_SERVER: {e}"))),
            StrategyKind::Minio => {
                let minio = &self.minio;
                if minio.endpoint.trim().is_empty() {
                    return Err(Error::Startup("MINIO_ENDPOINT must not be empty".into()));
                }
                if minio.port == 0 {
                    return Err(Error::Startup(
                        "MINIO_PORT must be between 1 and 65535".into(),
                    ));
                }
                if minio.bucket.trim().is_empty() {
                    return Err(Error::Startup("MINIO_BUCKET_NAME must not be empty".into()));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("local".parse::<StrategyKind>().unwrap(), StrategyKind::Local);
        assert_eq!("AntVis".parse::<StrategyKind>().unwrap(), StrategyKind::Antvis);
        assert_eq!(" minio ".parse::<StrategyKind>().unwrap(), StrategyKind::Minio);
        assert!(matches!(
            "s3".parse::<StrategyKind>(),
            Err(Error::Startup(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(GenerateConfig::default().validate().is_ok());

        let config = GenerateConfig {
            strategy: StrategyKind::Minio,
            minio: MinioConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Startup(_))));

        let config = GenerateConfig {
            strategy: StrategyKind::Antvis,
            request_server: "not a url".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GenerateConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scheme_follows_tls() {
        let mut minio = MinioConfig::default();
        assert_eq!(minio.scheme(), "http");
        minio.use_ssl = true;
        assert_eq!(minio.scheme(), "https");
    }
}
