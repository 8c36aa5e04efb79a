//! Mock implementations shared by the integration tests.

mod transports;

pub use clients::*;
pub use services::*;
pub use transports::*;
