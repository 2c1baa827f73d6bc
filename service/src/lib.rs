pub use error::*;
pub use store::*;

mod error;
mod store;
