use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use rusoto_core::{HttpClient, Region};
use rusoto_credential::{
    AutoRefreshingProvider, DefaultCredentialsProvider, InstanceMetadataProvider, ProfileProvider,
};
use rusoto_s3::S3Client;

use crate::config::CredentialSource;

/// Create an S3 client for the given region and credential source.
///
/// The client is shared by every worker; rusoto clients are safe to call
/// concurrently.
pub fn create_s3_client(region: Region, credentials: &CredentialSource) -> Result<Arc<S3Client>> {
    let dispatcher = HttpClient::new().context("Failed to create HTTP client")?;

    let client = match credentials {
        CredentialSource::Default => {
            debug!("Resolving AWS credentials from the default provider chain");
            let provider = DefaultCredentialsProvider::new()
                .context("Failed to create default AWS credentials provider")?;
            S3Client::new_with(dispatcher, provider, region)
        }
        CredentialSource::Profile(profile_name) => {
            debug!("Resolving AWS credentials from profile '{}'", profile_name);
            let mut provider = ProfileProvider::new()
                .context("Failed to create AWS profile provider")?;
            provider.set_profile(profile_name.as_str());
            S3Client::new_with(dispatcher, provider, region)
        }
        CredentialSource::InstanceRole => {
            debug!("Resolving AWS credentials from EC2 instance metadata");
            let provider = AutoRefreshingProvider::new(InstanceMetadataProvider::new())
                .context("Failed to create instance metadata credentials provider")?;
            S3Client::new_with(dispatcher, provider, region)
        }
    };

    Ok(Arc::new(client))
}
