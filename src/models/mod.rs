pub mod book;
pub mod aggregates;
pub mod indexes;
pub mod lenient;

pub use book::*;
pub use aggregates::*;
pub use indexes::*;
