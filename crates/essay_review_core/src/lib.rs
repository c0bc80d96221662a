pub mod access;
pub mod aggregator;
pub mod domain;
pub mod essay;
pub mod ports;

pub use access::{AccessGate, DefaultCredentialPolicy, DEFAULT_CREDENTIAL};
pub use aggregator::{
    AggregateError, Aggregation, AggregatorSettings, Diagnostic, FetchOutcome, SubmissionAggregator,
};
pub use domain::{effective_timestamp, sort_newest_first, SubmissionRecord, EARLIEST};
pub use essay::{EssayCatalog, EssayDefinition, EssayError, GradingCriterion, ParagraphSpec, ParagraphType};
pub use ports::{BlobStore, PortError, PortResult};
