mod api;
mod audit;
mod diagnostics;
mod ids;
mod record;

pub use api::*;
pub use audit::*;
pub use diagnostics::*;
pub use ids::*;
pub use record::*;
