//! Name normalization and name-version generation.
//!
//! Turns differently formatted bylines (`ROCKEFELLER, JOHN D JR`,
//! `john mcdonald`) into canonical display names and enumerates the renderings
//! under which the same person may be listed on Wikipedia.

pub mod normalizer;
pub mod suffix;
pub mod versions;

pub use normalizer::{capitalize_name, is_connective_particle, lowercase_particles};
pub use suffix::{adjust_firstnames, resolve_suffix, SuffixSplit};
pub use versions::{get_name_versions, longest_version, NameComponents};
