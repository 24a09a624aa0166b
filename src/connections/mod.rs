pub mod controller;
pub mod data;
pub mod date;
pub mod game;
pub mod prelude;
pub mod puzzle;
pub mod share;
pub mod shuffle;
pub mod source;
pub mod store;

pub use controller::*;
pub use date::*;
pub use game::*;
pub use puzzle::*;
pub use share::*;
pub use shuffle::*;
pub use source::*;
pub use store::*;
