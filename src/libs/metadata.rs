//! Package metadata embedded at build time by `build.rs`.
//!
//! Provides `APP_METADATA_NAME`, `APP_METADATA_VERSION`, `APP_METADATA_OWNER`
//! and `APP_METADATA_DEFAULT_API_URL`.

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// `User-Agent` sent to the task server.
pub fn user_agent() -> String {
    format!("{}/{}", APP_METADATA_NAME, APP_METADATA_VERSION)
}
