//! Client for the REData API, the public electricity statistics service of
//! Red Eléctrica de España.
//!
//! A [`ReDataClient`] points at one registered (category, widget) report
//! stream at a time. Each query sends a parameterized GET request, walks the
//! nested JSON response along the widget's extraction [`Route`], and aligns
//! every extracted time series into a single datetime-indexed [`Table`].
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use redata::{QueryParams, ReDataClient, TimeTrunc};
//!
//! # fn main() -> Result<(), redata::Error> {
//! let client = ReDataClient::new("demanda", "evolucion")?;
//! let params = QueryParams::new(
//!     NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
//!     NaiveDate::from_ymd_opt(2023, 1, 31).unwrap().and_hms_opt(23, 59, 0).unwrap(),
//!     TimeTrunc::Day,
//! );
//! let table = client.query(&params)?;
//! for (timestamp, cells) in table.rows() {
//!     println!("{timestamp}: {cells:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod services;

pub use models::error::{ApiFault, Error};
pub use models::route::{KeyPath, Route};
pub use models::table::{Series, Table};
pub use services::api::{
    ApiConfig, ApiConfigBuilder, GeoLimit, GeoTrunc, Locale, QueryParams, ReDataClient, TimeTrunc,
    query_widget,
};
pub use services::assembler::assemble;
pub use services::navigator::{TerminalObjects, navigate};
pub use services::registry::{Registry, StreamSpec};
