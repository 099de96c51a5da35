pub mod profile;
pub mod project;
pub mod request;

pub use profile::*;
pub use project::*;
pub use request::*;
