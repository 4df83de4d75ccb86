pub mod channels;
pub mod errors;
pub mod models;

pub use channels::*;
pub use errors::*;
pub use models::*;
