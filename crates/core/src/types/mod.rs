//! Core types for shopsync.
//!
//! This module provides type-safe wrappers for the synchronized domain.

pub mod id;
pub mod site;
pub mod status;
pub mod tag;

pub use id::*;
pub use site::{SiteId, SiteIdError};
pub use status::{CustomerState, CustomerStateError};
pub use tag::{TagName, TagNameError, parse_tag_list};
