use std::path::{Component, Path};

use tokio::fs::File as AsyncFile;

use crate::cloud::store::{ObjectStore, PutObject, PutOutcome, UploadBody};
use crate::config::UploadTarget;
use crate::error::UploadError;
use crate::models::WorkItem;

/// A completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub key: String,
    pub bytes: u64,
    pub outcome: PutOutcome,
}

/// Destination key for a relative path: the prefix followed by the path
/// components joined with `/`. No separator is inserted after the prefix.
///
/// Components that are not valid UTF-8 are rejected rather than converted
/// lossily, since two such names could otherwise map to the same key.
pub fn object_key(prefix: &str, relative_path: &Path) -> Result<String, UploadError> {
    let mut key = String::from(prefix);
    let mut first = true;

    for component in relative_path.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| UploadError::UnrepresentableKey {
                path: relative_path.to_path_buf(),
            })?;
            if !first {
                key.push('/');
            }
            key.push_str(part);
            first = false;
        }
    }

    Ok(key)
}

/// Upload one work item: open the file below the source root and stream it
/// to `bucket/key`, where `key` comes from [`object_key`].
pub async fn upload_item(
    store: &dyn ObjectStore,
    target: &UploadTarget,
    item: &WorkItem,
    key: String,
) -> Result<UploadedObject, UploadError> {
    let source_path = item.source_path(&target.source_root);

    let local_error = |source| UploadError::LocalRead {
        path: source_path.clone(),
        source,
    };

    let file = AsyncFile::open(&source_path).await.map_err(local_error)?;
    // The length is taken now and declared to the store before any byte is
    // read. If the file changes size while streaming, the body stream fails
    // with an error naming both sizes.
    let bytes = file.metadata().await.map_err(local_error)?.len();

    let outcome = store
        .put_object(PutObject {
            bucket: target.bucket.clone(),
            key: key.clone(),
            acl: target.acl,
            body: UploadBody::from_file(file, bytes),
        })
        .await?;

    Ok(UploadedObject { key, bytes, outcome })
}
