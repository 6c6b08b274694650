pub mod repository;
pub mod stream;

pub use repository::*;
pub use stream::*;
