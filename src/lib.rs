pub mod models;
pub mod records;
pub mod source;
pub mod factory;
pub mod runner;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod clock;
pub mod constants;
pub mod error;
pub mod time;

pub use session::GameSession;
