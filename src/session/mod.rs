pub mod runner;
pub mod state;
pub mod store;

pub use runner::Analyzer;
pub use state::{Mode, Phase, Session, SessionEvent, Slot};
pub use store::SessionStore;
