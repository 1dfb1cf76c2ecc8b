//! Client for the ranking backend.

pub mod client;
pub mod events;

pub use client::{ApiClient, CheckReport, SearchPage, SongInfo, UploadReceipt, VideoInfo};
pub use events::{CancelHandle, JobEvent, JobStream};
