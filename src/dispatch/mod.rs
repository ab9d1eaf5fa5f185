pub mod dispatcher;
pub mod route_log;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use route_log::{ExportError, RouteLog, RouteRecord};
