//! Helpers shared by the service and the admin CLI.
//!
//! - [`code_generator`] - Time-ordered short code generation
//! - [`url_validator`] - Destination URL checks

pub mod code_generator;
pub mod url_validator;
