//! # Atmos Analytics Engine
//!
//! This crate characterizes an atmospheric record: descriptive statistics per
//! variable, inter-variable correlation, temporal trends, anomaly flags and a
//! data-quality score.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It performs no I/O and
//!   depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** The `AtmosphericAnalyzer` takes an immutable
//!   series and returns a freshly built `AtmosphericResearchData`. Identical
//!   input yields identical output, and independent analyses can run in
//!   parallel without any locking.
//! - **Graceful degradation:** Missing readings and degenerate data never fail
//!   an analysis; they are reported in the output instead.
//!
//! ## Public API
//!
//! - `AtmosphericAnalyzer`: The main struct that runs the pipeline.
//! - `AtmosphericResearchData`: The bundle it produces.
//! - The per-stage functions (`describe`, `correlation_matrix`, `analyze_trend`,
//!   `detect_anomalies`, `assess_quality`) for callers that need one result only.

// Declare the modules that constitute this crate.
pub mod anomaly;
pub mod correlation;
pub mod descriptive;
pub mod engine;
pub mod error;
pub mod numeric;
pub mod quality;
pub mod report;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use anomaly::{AnomalyRecord, Severity, detect_anomalies};
pub use correlation::{CorrelationMatrix, PairCorrelation, correlate, correlation_matrix};
pub use descriptive::{VariableStatistics, describe};
pub use engine::AtmosphericAnalyzer;
pub use error::AnalyticsError;
pub use quality::{QualityReport, SuspiciousValue, assess_quality};
pub use report::AtmosphericResearchData;
pub use trend::{TrendClassification, TrendResult, analyze_trend};
