//! Supabase provider for fluorite-flake
//!
//! Implements the `DatabaseProvisioner` trait on top of the `supabase` CLI,
//! creating one project per environment.
//!
//! # Requirements
//!
//! - `supabase` CLI must be installed and logged in (`supabase login`)
//! - An organization id, region and database password, sourced from the
//!   operator's environment by the calling CLI layer

pub mod error;
pub mod provider;
pub mod supabase;

pub use error::{Result, SupabaseError};
pub use provider::SupabaseProvisioner;
pub use supabase::{ApiKey, ProjectInfo, SupabaseCli, SupabaseSettings};
