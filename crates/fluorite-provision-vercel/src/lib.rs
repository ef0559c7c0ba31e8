//! Vercel Blob provisioning for fluorite-flake
//!
//! Creates Vercel Blob stores through the `vercel` CLI. Blob stores are not
//! databases, so this crate sits beside the `DatabaseProvisioner` providers
//! rather than behind that trait.
//!
//! # Requirements
//!
//! - `vercel` CLI must be installed and logged in (`vercel login`)

pub mod error;
pub mod vercel;

pub use error::{Result, VercelError};
pub use vercel::{BlobStoreDetails, BlobStoreInfo, VercelCli, parse_blob_created, parse_store_details};
