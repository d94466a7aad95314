//! Storage of original resume files in S3 / MinIO.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::extract::content_type_for;

/// Object key for an uploaded resume: `resumes/<job_id>/<uuid>-<file name>`.
pub fn resume_object_key(job_id: Uuid, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("resumes/{job_id}/{}-{safe_name}", Uuid::new_v4())
}

/// Path-style URL for an object, matching how the MinIO/S3 endpoint is configured.
pub fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/'))
}

/// Uploads the original file and returns its URL.
pub async fn upload_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    endpoint: &str,
    job_id: Uuid,
    file_name: &str,
    data: Bytes,
) -> Result<String, AppError> {
    let key = resume_object_key(job_id, file_name);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(data))
        .content_type(content_type_for(file_name))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Upload of {file_name} failed: {e}")))?;

    info!("Uploaded resume to s3://{bucket}/{key}");
    Ok(object_url(endpoint, bucket, &key))
}
