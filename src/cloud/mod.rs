//! Object storage integration.
//!
//! Workers only ever see the [`store::ObjectStore`] trait: one `put_object`
//! call per file with a streamed body. The production implementation,
//! [`store::S3Store`], wraps a rusoto `S3Client` built by
//! [`client::create_s3_client`], which also decides where credentials come
//! from (default chain, named profile, or EC2 instance role).
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rusoto_core::Region;
//! use s3_fast_upload::cloud::client::create_s3_client;
//! use s3_fast_upload::cloud::store::{ObjectStore, PutObject, S3Store, UploadBody};
//! use s3_fast_upload::config::CredentialSource;
//! use s3_fast_upload::models::Acl;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = create_s3_client(Region::UsWest1, &CredentialSource::Default)?;
//! let store = S3Store::new(client);
//!
//! let outcome = store.put_object(PutObject {
//!     bucket: "my-bucket".to_string(),
//!     key: "backups/hello.txt".to_string(),
//!     acl: Acl::Private,
//!     body: UploadBody::from_bytes(&b"hello"[..]),
//! }).await?;
//! println!("stored: {}", outcome);
//! # Ok(())
//! # }
//! ```

/// S3 client construction and credential resolution
pub mod client;

/// The upload capability trait and its S3 implementation
pub mod store;
