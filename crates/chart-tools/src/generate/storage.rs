use std::{path::Path, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chart_error::{Error, Result};
use s3::{Bucket, Region, bucket_ops::BucketConfiguration, creds::Credentials};
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tokio::sync::OnceCell;
use url::Url;
use uuid::Uuid;

use super::{
    GenerateStrategy, GenerationRequest,
    render::{RenderGuard, Renderer},
};
use crate::config::MinioConfig;

/// The handful of S3 calls the storage strategy needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    async fn make_bucket(&self, bucket: &str) -> Result<()>;

    async fn set_bucket_policy(&self, bucket: &str, policy: &Value) -> Result<()>;

    async fn put_object_from_file(
        &self,
        bucket: &str,
        object: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()>;

    async fn presigned_get_object(&self, bucket: &str, object: &str, expiry_secs: u32)
    -> Result<String>;
}

fn storage_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Storage(format!("{context}: {e}"))
}

/// MinIO / S3 backend on top of rust-s3, path-style addressing.
pub struct S3ObjectStore {
    region: Region,
    credentials: Credentials,
    http: reqwest::Client,
}

impl S3ObjectStore {
    pub fn new(config: &MinioConfig) -> Result<Self> {
        let endpoint = format!("{}://{}:{}", config.scheme(), config.endpoint, config.port);
        let region = Region::Custom {
            region: "us-east-1".to_string(),
            endpoint,
        };
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| storage_error("credentials", e))?;

        Ok(Self {
            region,
            credentials,
            http: reqwest::Client::new(),
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>> {
        Ok(Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| storage_error("bucket", e))?
            .with_path_style())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.bucket(bucket)?
            .exists()
            .await
            .map_err(|e| storage_error("bucket lookup", e))
    }

    async fn make_bucket(&self, bucket: &str) -> Result<()> {
        let response = Bucket::create_with_path_style(
            bucket,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| storage_error("create bucket", e))?;

        if !response.success() {
            return Err(Error::Storage(format!(
                "create bucket '{bucket}' failed with status {}: {}",
                response.response_code, response.response_text
            )));
        }
        Ok(())
    }

    async fn set_bucket_policy(&self, bucket: &str, policy: &Value) -> Result<()> {
        let mut queries = std::collections::HashMap::new();
        queries.insert("policy".to_string(), String::new());
        let url = self
            .bucket(bucket)?
            .presign_put("/", 60, None, Some(queries))
            .await
            .map_err(|e| storage_error("presign policy", e))?;

        let response = self
            .http
            .put(url)
            .body(serde_json::to_vec(policy)?)
            .send()
            .await
            .map_err(|e| storage_error("set bucket policy", e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "set bucket policy failed with status {status}: {message}"
            )));
        }
        Ok(())
    }

    async fn put_object_from_file(
        &self,
        bucket: &str,
        object: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()> {
        let content = tokio::fs::read(path).await?;
        let response = self
            .bucket(bucket)?
            .put_object_with_content_type(object, &content, content_type)
            .await
            .map_err(|e| storage_error("upload", e))?;

        if response.status_code() != 200 {
            return Err(Error::Storage(format!(
                "upload of '{object}' failed with status {}",
                response.status_code()
            )));
        }
        Ok(())
    }

    async fn presigned_get_object(
        &self,
        bucket: &str,
        object: &str,
        expiry_secs: u32,
    ) -> Result<String> {
        self.bucket(bucket)?
            .presign_get(object, expiry_secs, None)
            .await
            .map_err(|e| storage_error("presign", e))
    }
}

/// Where uploaded charts live and how their URLs are built.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub bucket: String,
    pub endpoint: String,
    pub port: u16,
    pub use_ssl: bool,
    pub public_bucket: bool,
    pub expiry_secs: u32,
}

impl StorageSettings {
    fn scheme(&self) -> &'static str {
        if self.use_ssl { "https" } else { "http" }
    }

    fn public_url(&self, object: &str) -> String {
        format!(
            "{}://{}:{}/{}/{}",
            self.scheme(),
            self.endpoint,
            self.port,
            self.bucket,
            object
        )
    }

    fn read_only_policy(&self) -> Value {
        json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": "*",
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/*", self.bucket)],
            }]
        })
    }
}

impl From<&MinioConfig> for StorageSettings {
    fn from(config: &MinioConfig) -> Self {
        Self {
            bucket: config.bucket.clone(),
            endpoint: config.endpoint.clone(),
            port: config.port,
            use_ssl: config.use_ssl,
            public_bucket: config.public_bucket,
            expiry_secs: config.object_expiry_secs,
        }
    }
}

struct StagedChart {
    file: NamedTempFile,
    extension: String,
    content_type: String,
}

/// Renders into a staging file, uploads it, and hands back a public or presigned URL.
pub struct ObjectStorageStrategy {
    store: Arc<dyn ObjectStore>,
    renderer: Arc<dyn Renderer>,
    settings: StorageSettings,
    staging_dir: PathBuf,
    bucket_ready: OnceCell<()>,
}

impl ObjectStorageStrategy {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        renderer: Arc<dyn Renderer>,
        settings: StorageSettings,
        staging_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            renderer,
            settings,
            staging_dir,
            bucket_ready: OnceCell::new(),
        }
    }

    /// Runs once per process; a failed attempt leaves the cell empty so the next call retries.
    async fn ensure_bucket(&self) -> Result<()> {
        self.bucket_ready
            .get_or_try_init(|| async {
                let bucket = &self.settings.bucket;
                if !self.store.bucket_exists(bucket).await? {
                    tracing::info!(bucket = %bucket, "Creating bucket");
                    self.store.make_bucket(bucket).await?;
                }
                if self.settings.public_bucket {
                    self.store
                        .set_bucket_policy(bucket, &self.settings.read_only_policy())
                        .await?;
                    tracing::debug!(bucket = %bucket, "Public read policy applied");
                }
                Ok::<(), Error>(())
            })
            .await
            .map(|_| ())
    }

    async fn locator(&self, object: &str) -> Result<String> {
        if self.settings.public_bucket {
            return Ok(self.settings.public_url(object));
        }

        let presigned = self
            .store
            .presigned_get_object(&self.settings.bucket, object, self.settings.expiry_secs)
            .await?;
        let mut url = Url::parse(&presigned)?;
        url.set_scheme(self.settings.scheme())
            .map_err(|_| Error::Internal(format!("cannot rewrite scheme of {presigned}")))?;
        Ok(url.into())
    }
}

fn stage(renderer: &dyn Renderer, options: &Value, dir: &Path) -> Result<StagedChart> {
    let artifact = RenderGuard::new(renderer.render(options)?);
    let buffer = artifact.to_buffer()?;
    let extension = artifact.extension().to_string();
    let mut file = tempfile::Builder::new()
        .prefix("chart-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;
    std::io::Write::write_all(&mut file, &buffer)?;

    Ok(StagedChart {
        file,
        extension,
        content_type: artifact.content_type().to_string(),
    })
}

#[async_trait]
impl GenerateStrategy for ObjectStorageStrategy {
    fn name(&self) -> &'static str {
        "minio"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.ensure_bucket().await?;

        let renderer = self.renderer.clone();
        let options = request.render_options();
        let dir = self.staging_dir.clone();
        let staged = tokio::task::spawn_blocking(move || stage(renderer.as_ref(), &options, &dir))
            .await
            .map_err(|e| Error::Internal(format!("render task failed: {e}")))??;

        let object = format!("{}.{}", Uuid::new_v4(), staged.extension);
        self.store
            .put_object_from_file(
                &self.settings.bucket,
                &object,
                staged.file.path(),
                &staged.content_type,
            )
            .await?;
        tracing::debug!(bucket = %self.settings.bucket, object = %object, "Chart uploaded");

        self.locator(&object).await
    }
}
