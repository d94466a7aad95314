// Bulk-upload progress tracking.
// One record per upload session, written by the ingest task after every file
// and polled by clients until it reaches a terminal status.

pub mod handlers;
pub mod models;
pub mod store;
