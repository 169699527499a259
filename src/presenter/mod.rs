pub mod loader;
pub mod session;
pub mod table;
