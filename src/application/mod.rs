// Application layer - reporting and the error type shared by the
// fixture importer, the exporters and the CLI.

pub mod error;
pub mod reporting;

pub use error::*;
pub use reporting::*;
