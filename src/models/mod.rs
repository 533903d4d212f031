pub mod error;
pub mod route;
pub mod table;
