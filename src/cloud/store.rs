use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::ready;
use futures_util::stream::{self, Stream, TryStreamExt};
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};
use tokio::fs::File as AsyncFile;
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::constants::STREAM_CHUNK_SIZE;
use crate::error::UploadError;
use crate::models::Acl;

/// Boxed stream of body chunks, in the shape rusoto's `ByteStream` accepts.
pub type ByteChunks = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// Object body handed to an [`ObjectStore`].
///
/// The length is known up front; the bytes are pulled lazily so a file is
/// never held in memory as a whole.
pub struct UploadBody {
    chunks: ByteChunks,
    content_length: u64,
}

impl UploadBody {
    /// Stream an already opened file in `STREAM_CHUNK_SIZE` reads.
    ///
    /// `content_length` is what the store is told up front. If the file
    /// yields more or fewer bytes than that, the stream ends with an error
    /// instead of sending a body that disagrees with the declared length.
    pub fn from_file(file: AsyncFile, content_length: u64) -> Self {
        let chunks = FramedRead::with_capacity(file, BytesCodec::new(), STREAM_CHUNK_SIZE)
            .map_ok(BytesMut::freeze);
        UploadBody {
            chunks: Box::pin(ExactLength::new(Box::pin(chunks), content_length)),
            content_length,
        }
    }

    /// Body made of a single in-memory chunk
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data: Bytes = data.into();
        let content_length = data.len() as u64;
        UploadBody {
            chunks: Box::pin(stream::once(futures_util::future::ready(Ok(data)))),
            content_length,
        }
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn into_stream(self) -> ByteChunks {
        self.chunks
    }

    /// Drain the body into memory. Meant for test doubles and small payloads.
    pub async fn collect(self) -> io::Result<Vec<u8>> {
        self.chunks
            .try_fold(Vec::new(), |mut buffer, chunk| async move {
                buffer.extend_from_slice(&chunk);
                Ok(buffer)
            })
            .await
    }
}

impl fmt::Debug for UploadBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Passes chunks through while checking the running total against the
/// declared length.
struct ExactLength {
    inner: ByteChunks,
    expected: u64,
    seen: u64,
    done: bool,
}

impl ExactLength {
    fn new(inner: ByteChunks, expected: u64) -> Self {
        ExactLength {
            inner,
            expected,
            seen: 0,
            done: false,
        }
    }

    fn size_changed(&self, kind: io::ErrorKind, read: &str) -> io::Error {
        io::Error::new(
            kind,
            format!(
                "file changed size during upload: expected {} bytes, read {}",
                self.expected, read
            ),
        )
    }
}

impl Stream for ExactLength {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        match ready!(self.inner.as_mut().poll_next(cx)) {
            Some(Ok(chunk)) => {
                self.seen += chunk.len() as u64;
                if self.seen > self.expected {
                    self.done = true;
                    let read = format!("at least {}", self.seen);
                    let err = self.size_changed(io::ErrorKind::InvalidData, &read);
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(e)) => {
                self.done = true;
                Poll::Ready(Some(Err(e)))
            }
            None => {
                self.done = true;
                if self.seen < self.expected {
                    let read = self.seen.to_string();
                    let err = self.size_changed(io::ErrorKind::UnexpectedEof, &read);
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None)
            }
        }
    }
}

/// A single put request
#[derive(Debug)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub acl: Acl,
    pub body: UploadBody,
}

/// What the store answered for a successful put
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOutcome {
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

impl fmt::Display for PutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "etag={} version={}",
            self.e_tag.as_deref().unwrap_or("-"),
            self.version_id.as_deref().unwrap_or("-")
        )
    }
}

/// The upload capability workers call into.
///
/// Implementations must tolerate concurrent calls from every worker at once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, request: PutObject) -> Result<PutOutcome, UploadError>;
}

/// [`ObjectStore`] backed by a shared rusoto `S3Client`
pub struct S3Store {
    client: Arc<S3Client>,
}

impl S3Store {
    pub fn new(client: Arc<S3Client>) -> Self {
        S3Store { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, request: PutObject) -> Result<PutOutcome, UploadError> {
        let PutObject { bucket, key, acl, body } = request;
        let content_length = body.content_length();
        let size_hint = usize::try_from(content_length).unwrap_or(usize::MAX);

        let request = PutObjectRequest {
            bucket: bucket.clone(),
            key: key.clone(),
            acl: Some(acl.as_str().to_string()),
            content_length: i64::try_from(content_length).ok(),
            body: Some(ByteStream::new_with_size(body.into_stream(), size_hint)),
            ..Default::default()
        };

        match self.client.put_object(request).await {
            Ok(output) => Ok(PutOutcome {
                e_tag: output.e_tag,
                version_id: output.version_id,
            }),
            Err(e) => Err(UploadError::Remote {
                bucket,
                key,
                message: e.to_string(),
            }),
        }
    }
}
