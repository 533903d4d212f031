pub mod api;
pub mod assembler;
pub mod navigator;
pub mod registry;

pub use api::{ApiConfig, GeoLimit, GeoTrunc, Locale, QueryParams, ReDataClient, TimeTrunc};
pub use assembler::assemble;
pub use navigator::{TerminalObjects, navigate};
pub use registry::Registry;
