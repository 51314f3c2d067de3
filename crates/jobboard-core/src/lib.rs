#![deny(missing_docs)]

//! # jobboard-core: Foundational Types for the Job Board
//!
//! Every other crate in the workspace depends on this one. It has no internal
//! crate dependencies, only `serde`, `thiserror`, and `uuid`.
//!
//! ## Design Principles
//!
//! 1. **Closed vocabularies.** Job types, experience levels, job statuses, and
//!    application statuses are enums with exhaustive `match`, parsed
//!    case-insensitively from the wire. The validation rules in
//!    `jobboard-validate` delegate to these parsers so the accepted word lists
//!    cannot drift apart.
//!
//! 2. **[`Role`] is ordered by privilege.** `Applicant < Recruiter < Admin`,
//!    so "at least recruiter" is a single comparison.
//!
//! 3. **Pagination arithmetic lives in one place.** [`PageRequest`] clamps
//!    client input; [`PageMeta`] derives the page count.

pub mod domain;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod role;

pub use domain::{ApplicationStatus, ExperienceLevel, JobStatus, JobType};
pub use error::CoreError;
pub use filter::{JobFacets, JobFilter};
pub use pagination::{paginate, PageMeta, PageRequest};
pub use role::Role;
