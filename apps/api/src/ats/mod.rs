//! Deterministic resume-to-job-description matching.
//!
//! Pipeline: [`jd_parser`] and [`resume_parser`] → [`matching`] → [`scoring`]
//! → [`improvements`], orchestrated by [`engine::AtsEngine`].

pub mod engine;
pub mod handlers;
pub mod improvements;
pub mod jd_parser;
pub mod matching;
pub mod normalizer;
pub mod resume_parser;
pub mod scoring;
pub mod signals;
pub mod vocabulary;

pub use engine::{analyze_resume_ats, AtsAnalysis, AtsEngine};
pub use vocabulary::Vocabulary;
