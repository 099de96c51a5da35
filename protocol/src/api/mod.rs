//! API DTOs module
//!
//! Request and response shapes for the consumed endpoints, organized by
//! domain: `auth`, `project`, `matching`, `rating`, `resume`.

pub mod auth;
pub mod matching;
pub mod project;
pub mod rating;
pub mod resume;

pub use auth::*;
pub use matching::*;
pub use project::*;
pub use rating::*;
pub use resume::*;
