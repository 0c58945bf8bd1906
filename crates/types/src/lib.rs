//! Foundation types for oaslint.
//!
//! This crate provides shared types used across the linting stack.
//! Its only dependency is `serde`, since every type here is part of the
//! serialized result surface consumed by report renderers and editors.
//!
//! # Type Categories
//!
//! - **Position types**: [`Position`], [`Range`]
//! - **Rule metadata**: [`RuleSeverity`], [`RuleCategory`], [`CategoryInfo`]

mod category;
mod position;
mod severity;

pub use category::{CategoryInfo, RuleCategory, CATEGORIES};
pub use position::{Position, Range};
pub use severity::RuleSeverity;
