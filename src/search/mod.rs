//! Breadth-first path search (explorer, session, budgets).

pub mod explorer;
pub mod resources;
pub mod session;

pub use explorer::Explorer;
pub use resources::ResourceTracker;
pub use session::Search;
