pub mod category;
pub mod queries;
pub mod status;
pub mod types;

pub use category::*;
pub use queries::*;
pub use status::*;
pub use types::*;
