pub mod commit;

pub use commit::*;
