// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Processing defaults loaded from environment variables.

use crate::options::ClipOptions;

/// Defaults shared by all commands of one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingConfig {
    /// Dissolve arcs after clipping paths (`ARC_LITE_CLEANUP`).
    pub cleanup: bool,
    /// Drop features that clip to null (`ARC_LITE_REMOVE_EMPTY`).
    pub remove_empty: bool,
    /// Threads used when processing several datasets (`ARC_LITE_WORKER_THREADS`).
    pub worker_threads: usize,
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            cleanup: env_flag("ARC_LITE_CLEANUP", true),
            remove_empty: env_flag("ARC_LITE_REMOVE_EMPTY", true),
            worker_threads: std::env::var("ARC_LITE_WORKER_THREADS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .unwrap_or_else(|_| num_cpus::get())
                .max(1),
        }
    }

    /// Clip options seeded with these defaults.
    pub fn clip_options(&self) -> ClipOptions {
        ClipOptions {
            cleanup: self.cleanup,
            remove_empty: self.remove_empty,
            ..ClipOptions::default()
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
