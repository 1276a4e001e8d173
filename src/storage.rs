//! S3-compatible object storage client.
//!
//! A thin wrapper over `rust-s3`: put bytes under a key, and turn a key
//! into a URL the front end can use. Retry and multipart logic stay in
//! the crate. The client is stateless per call and shared process-wide.

use s3::creds::Credentials;
use s3::{Bucket, Region};

use crate::config::OssConfig;
use crate::error::AppError;

pub struct ObjectStorage {
    bucket: Box<Bucket>,
    public_domain: Option<String>,
    presign_ttl_secs: u32,
}

impl ObjectStorage {
    pub fn from_config(cfg: &OssConfig) -> anyhow::Result<Self> {
        let region = Region::Custom {
            region: cfg.region.clone(),
            endpoint: cfg.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(&cfg.access_key),
            Some(&cfg.secret_key),
            None,
            None,
            None,
        )?;
        let bucket = Bucket::new(&cfg.bucket, region, credentials)?.with_path_style();

        Ok(Self {
            bucket,
            public_domain: cfg.domain.clone(),
            presign_ttl_secs: cfg.presign_ttl_secs,
        })
    }

    /// Store `bytes` under `key`.
    pub async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), AppError> {
        self.bucket
            .put_object_with_content_type(key, bytes, content_type)
            .await
            .map_err(|e| AppError::DependencyUnavailable(format!("object storage put: {e}")))?;
        Ok(())
    }

    /// Public or presigned URL for a stored object.
    ///
    /// With a configured public domain the URL is a plain prefix join;
    /// otherwise a time-limited presigned GET is produced.
    pub async fn url_for(&self, key: &str) -> Result<String, AppError> {
        match &self.public_domain {
            Some(domain) => Ok(format!("{}/{}", domain.trim_end_matches('/'), key)),
            None => self
                .bucket
                .presign_get(key, self.presign_ttl_secs, None)
                .await
                .map_err(|e| {
                    AppError::DependencyUnavailable(format!("object storage presign: {e}"))
                }),
        }
    }
}
