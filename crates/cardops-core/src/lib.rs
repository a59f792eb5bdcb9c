//! Import session, staging table and submission for one back-office screen.

#![deny(unsafe_code)]

pub mod session;
pub mod staging;
pub mod submit;

pub use session::{ImportReport, ImportSession, SessionError, UploadTicket};
pub use staging::{StagingError, StagingState, StagingTable};
pub use submit::{DEFAULT_TIMEOUT, HttpSubmitter, Payload, SubmitError, Submitter};
