//! Validators, grouped by what they check.

pub mod content;
pub mod site;
