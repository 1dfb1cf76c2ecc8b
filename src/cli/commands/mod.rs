pub mod bookmark;
pub mod classify;
pub mod config;
pub mod init;
pub mod issue;
pub mod log;
pub mod mark;
pub mod remote;
pub mod token;
pub mod upload;
