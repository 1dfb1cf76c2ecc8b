pub mod bookmarks;
pub mod filename;
pub mod ingest;
pub mod issue;
pub mod pagination;
pub mod session;
pub mod upload;
