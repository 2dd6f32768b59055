//! seqshot: capture a screen region into sequentially numbered files.
//!
//! This crate wires together:
//! - Preferences persistence (config)
//! - Filename counter derivation (naming)
//! - Screen capture domain (capture/)
//! - The capture session and its counter (session)
//! - Folder opening (shell) and the interactive front end (console)

pub mod capture;
pub mod config;
pub mod console;
pub mod naming;
pub mod session;
pub mod shell;

pub use capture::{Grabber, Region, ScreenGrabber};
pub use config::Config;
pub use session::{Session, SnapError};
