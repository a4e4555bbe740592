//! Core pipeline steps and orchestration for AutoDraft.
//!
//! This crate ties the content provider, the store, and the HTML exporter
//! into the two entry points the surrounding application calls:
//! [`generate_topics`] and [`run_selected`].

pub mod orchestrator;
pub mod steps;

pub use orchestrator::run_selected;
pub use steps::topic_factory::generate_topics;
