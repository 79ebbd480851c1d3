// Application layer - the ledger store and what it reports back to a UI.

pub mod error;
pub mod notice;
pub mod store;

pub use error::*;
pub use notice::*;
pub use store::*;
