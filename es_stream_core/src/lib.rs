//! Storage-notification to search-index pipeline.
//!
//! A batch of object-created notifications is processed record by record:
//! fetch the object, route its key to an index, turn its lines into a bulk
//! payload, make sure the index exists and submit. The first failing record
//! aborts the rest of the batch.

pub mod bulk;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod report;
pub mod router;

pub use bulk::{DocumentBatchBuilder, split_lines};
pub use error::{PipelineError, Result};
pub use event::{NotificationRecord, event_records};
pub use pipeline::Pipeline;
pub use report::{BatchReport, IndexedRecord, RecordOutcome};
pub use router::{DEFAULT_PRODUCER, IndexRouter};
