pub mod case;
pub mod error;
pub mod feature_flags;
pub mod models;
pub mod requests;

pub use case::*;
pub use error::*;
pub use feature_flags::*;
pub use models::*;
pub use requests::*;
