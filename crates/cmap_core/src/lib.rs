//! Ingests CMAP legislative matters from Legistar and normalizes them into
//! Open Civic Data bills and vote events.

pub mod actions;
pub mod assembler;
pub mod config;
pub mod db;
pub mod error;
pub mod legistar;
pub mod linker;
pub mod pipeline;
pub mod raw;
pub mod relations;
pub mod schema;
pub mod sink;
pub mod source;
pub mod taxonomy;
pub mod votes;

pub use assembler::{AssembledBill, BillAssembler};
pub use config::PipelineConfig;
pub use error::{ConfigError, IngestError, PipelineError, SinkError};
pub use pipeline::{Pipeline, RunSummary, Selection};
pub use sink::Sink;
pub use source::{LegislativeSource, SourceError};
pub use taxonomy::Taxonomy;
