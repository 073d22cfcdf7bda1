//! Process exit codes.
//! An empty corpus and an ignored verdict are not failures.

use byteflow_core::errors::ConfigError;

pub const SUCCESS: i32 = 0;
pub const RUNTIME_ERROR: i32 = 1; // Unreadable input, corpus I/O, strict-mode parse failure
pub const CONFIG_ERROR: i32 = 2; // Bad config file or arguments

pub fn for_error(err: &anyhow::Error) -> i32 {
    if err.chain().any(|c| c.is::<ConfigError>()) {
        CONFIG_ERROR
    } else {
        RUNTIME_ERROR
    }
}
