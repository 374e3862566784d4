//! Run configuration.
//!
//! Every environment variable the autobuilder reads is read exactly once,
//! at startup, into a [`Config`]. Components receive the parts they need
//! from it instead of consulting the process environment themselves.
//!
//! # Example
//!
//! ```
//! use go_autobuilder::config::Config;
//! use std::collections::HashMap;
//!
//! let vars: HashMap<&str, &str> = [
//!     ("LGTM_SRC", "/src/project"),
//!     ("LGTM_INDEX_NEED_GOPATH", "false"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let config = Config::from_env_fn(|key| {
//!     vars.get(key)
//!         .map(|v| v.to_string())
//!         .ok_or(std::env::VarError::NotPresent)
//! })
//! .unwrap();
//!
//! assert_eq!(config.need_gopath_override, Some(false));
//! assert!(config.is_hosted());
//! ```

pub mod loader;

pub use loader::{vars, Config};
