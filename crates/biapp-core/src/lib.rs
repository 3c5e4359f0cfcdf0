//! biapp-core
//!
//! Pure domain types, API path conventions and JSON decoding helpers.
//! No network dependency; this is the shared vocabulary of the biapp system.

pub mod api_paths;
pub mod dates;
pub mod de;
pub mod error;
pub mod models;

/// Backend identifier of the only disease the evaluation form tracks.
pub const MIGRAINE_DISEASE_ID: u64 = 1;
