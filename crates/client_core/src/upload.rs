use futures::{stream::FuturesUnordered, StreamExt};
use reqwest::{header::CONTENT_TYPE, Client};
use shared::protocol::{UploadUrlsRequest, UploadUrlsResponse};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    asset::BinaryAsset,
    config::ClientConfig,
    error::{NegotiationError, TransferError},
};

/// A signed write target and the storage path the uploaded object will live at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDestination {
    pub target_url: Url,
    pub storage_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedUploads {
    pub image: UploadDestination,
    pub audio: Option<UploadDestination>,
}

/// Storage paths of the assets that were actually transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPaths {
    pub image_path: String,
    pub audio_path: Option<String>,
}

pub struct UploadCoordinator {
    http: Client,
    endpoint: Url,
}

impl UploadCoordinator {
    pub fn new(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.upload_endpoint.clone(),
        }
    }

    pub async fn negotiate(
        &self,
        image_name: &str,
        audio_name: Option<&str>,
    ) -> Result<NegotiatedUploads, NegotiationError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&UploadUrlsRequest {
                image_filename: image_name.to_string(),
                audio_filename: audio_name.map(str::to_string),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "upload: destination negotiation rejected");
            return Err(NegotiationError::Status { status });
        }
        let body: UploadUrlsResponse = response.json().await?;

        let image = UploadDestination {
            target_url: parse_signed_url("image", &body.image_signed_url)?,
            storage_path: body.image_gs_path,
        };
        let audio = match (audio_name, body.audio_signed_url, body.audio_gs_path) {
            (Some(_), Some(url), Some(storage_path)) => Some(UploadDestination {
                target_url: parse_signed_url("audio", &url)?,
                storage_path,
            }),
            (Some(name), _, _) => {
                warn!(asset = name, "upload: no destination issued for audio asset");
                None
            }
            (None, _, _) => None,
        };

        info!(
            image_path = %image.storage_path,
            audio_path = audio.as_ref().map(|d| d.storage_path.as_str()).unwrap_or(""),
            "upload: destinations negotiated"
        );
        Ok(NegotiatedUploads { image, audio })
    }

    pub async fn transfer(
        &self,
        destination: &UploadDestination,
        asset: &BinaryAsset,
    ) -> Result<(), TransferError> {
        debug!(
            asset = asset.name(),
            bytes = asset.len(),
            mime_type = asset.mime_type(),
            "upload: transfer started"
        );
        let response = self
            .http
            .put(destination.target_url.clone())
            .header(CONTENT_TYPE, asset.mime_type())
            .body(asset.bytes())
            .send()
            .await
            .map_err(|source| TransferError::Http {
                asset_name: asset.name().to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status {
                asset_name: asset.name().to_string(),
                status,
            });
        }
        info!(asset = asset.name(), "upload: transfer complete");
        Ok(())
    }

    /// Transfers the image, and the audio when it has a destination, concurrently.
    ///
    /// Waits for every issued transfer to settle and reports the first failure
    /// observed. Objects already written by a sibling transfer are left in place.
    pub async fn upload_all(
        &self,
        uploads: &NegotiatedUploads,
        image: &BinaryAsset,
        audio: Option<&BinaryAsset>,
    ) -> Result<UploadedPaths, TransferError> {
        let mut transfers = FuturesUnordered::new();
        transfers.push(self.transfer(&uploads.image, image));

        let audio_path = match (&uploads.audio, audio) {
            (Some(destination), Some(asset)) => {
                transfers.push(self.transfer(destination, asset));
                Some(destination.storage_path.clone())
            }
            _ => None,
        };

        let mut first_failure = None;
        while let Some(result) = transfers.next().await {
            if let Err(err) = result {
                warn!(asset = err.asset_name(), "upload: transfer failed: {err}");
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
        if let Some(err) = first_failure {
            return Err(err);
        }

        Ok(UploadedPaths {
            image_path: uploads.image.storage_path.clone(),
            audio_path,
        })
    }
}

fn parse_signed_url(kind: &'static str, raw: &str) -> Result<Url, NegotiationError> {
    Url::parse(raw).map_err(|_| NegotiationError::InvalidDestination {
        kind,
        url: raw.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
