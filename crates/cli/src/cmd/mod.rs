//! CLI command implementations

pub mod checkout;
pub mod cleanup;
pub mod commit;
pub mod config;
pub mod diff;
pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub mod save;
pub mod show;
pub mod status;
pub mod watch;
