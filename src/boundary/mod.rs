//! Boundary layer
//!
//! Connects the validation pipeline to request handling:
//!
//! - Resolves schemas from the registry by id and version
//! - Runs validation before the handler body
//! - On failure, answers with a `validation failed` rejection carrying the
//!   first issue's `message` and `field`
//! - On success, hands the typed record (or DTO) to the handler
//!
//! Pipeline results are logged here, one line per request.

mod errors;
mod extract;
mod payload;
mod rejection;
mod state;

pub use errors::{BoundaryError, BoundaryResult, ErrorResponse};
pub use extract::{Dto, Validated};
pub use payload::record_from_pairs;
pub use rejection::{ValidationRejection, VALIDATION_FAILED};
pub use state::{Boundary, LATEST};
