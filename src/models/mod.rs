pub mod user;
pub mod activity;
pub mod analysis;

pub use user::*;
pub use activity::*;
pub use analysis::*;
