//! Shared wire types for the Converge platform API
//!
//! The upstream schema is not fully unified: several endpoints disagree on
//! field naming (`fullName` vs `name`, `resumeId` vs `resume_id`). All of
//! that normalization lives here, at the API boundary, so the client code
//! never has to probe alternate spellings itself.

pub mod api;
pub mod common;
