//! Age-verification claims and JSON record annotation.
//!
//! Builds on [`agegate_core`] to turn a single evaluation into an artefact a
//! caller can store or hand on: either a self-describing [`AgeClaim`]
//! document, or a decision written back into the record it came from.
//!
//! # Quick start
//!
//! ```no_run
//! use agegate_claim::AgeClaim;
//! use agegate_core::{Policy, parse_instant};
//!
//! let at = parse_instant("2021-04-30").unwrap();
//! let claim = AgeClaim::issue("2000-04-30", Policy::OVER_21, at).unwrap();
//! assert!(claim.decision && claim.verify_digest());
//! ```

mod annotate;
mod claim;
pub mod error;

pub use annotate::{annotate_record, annotate_records};
pub use claim::{AgeClaim, CLAIM_TYPE, CLAIM_VERSION};
pub use error::{Error, Result};
