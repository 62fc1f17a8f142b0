//! Rubric template and scoring

pub mod catalog;
pub mod scoring;

pub use catalog::{starter_domains, DomainTemplate, DEFAULT_DOMAIN_TAG};
pub use scoring::score_domains;
