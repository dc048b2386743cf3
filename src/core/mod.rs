//! Core traits and types shared by every resource

pub mod error;
pub mod extract;
pub mod field;
pub mod id;
pub mod record;
pub mod store;
pub mod update;

pub use error::{FieldProblem, InputError, SalesError};
pub use extract::{IdPath, JsonBody, Validated};
pub use field::FieldValue;
pub use id::{ParseRecordIdError, RecordId};
pub use record::{Creatable, EntityKind, Record};
pub use store::{EntityStore, ListFilter, SumPipeline, UpdateOutcome};
pub use update::{FieldRule, PartialUpdate, guard};
