//! Clients for the two opaque image collaborators: a background-removal
//! service and an image host. Both are fallible remote calls; nothing here
//! retries, and both run strictly before any database write.

use reqwest::multipart;

use crate::config::ImagesConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ImagePipeline {
    client: reqwest::Client,
    config: ImagesConfig,
}

impl ImagePipeline {
    pub fn new(config: ImagesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Strip the background from an image. When no removal service is
    /// configured the image passes through untouched.
    pub async fn remove_background(&self, image: Vec<u8>) -> AppResult<Vec<u8>> {
        let Some(url) = self.config.remove_bg_url.as_deref() else {
            return Ok(image);
        };

        let form = multipart::Form::new().part(
            "image_file",
            multipart::Part::bytes(image).file_name("image.png"),
        );

        let mut request = self.client.post(url).multipart(form);
        if let Some(key) = self.config.remove_bg_api_key.as_deref() {
            request = request.header("X-Api-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("background removal request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "background removal returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("background removal read failed: {e}")))?;

        Ok(bytes.to_vec())
    }

    /// Upload an image blob to the configured host and return its public URL.
    pub async fn upload(&self, image: Vec<u8>) -> AppResult<String> {
        let url = self
            .config
            .host_url
            .as_deref()
            .ok_or_else(|| AppError::Upstream("no image host configured".into()))?;

        let mut form = multipart::Form::new().part(
            "image",
            multipart::Part::bytes(image).file_name("image.png"),
        );
        if let Some(key) = self.config.host_api_key.as_deref() {
            form = form.text("key", key.to_string());
        }

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("image upload request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "image host returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("image host response unreadable: {e}")))?;

        body.pointer("/data/url")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| AppError::Upstream("image host response missing url".into()))
    }
}
