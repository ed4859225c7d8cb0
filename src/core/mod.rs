//! Core document types, totals calculation, status lifecycle and numbering.
//!
//! Every mutation of a [`Document`] re-derives its line totals and
//! [`Totals`] before returning, so the derived fields are always
//! consistent with the items and rates.

mod builder;
mod calculator;
mod document;
mod error;
pub mod lifecycle;
mod money;
mod numbering;
mod repository;
pub mod sanitize;
mod settings;
mod status;
mod types;
mod validation;

pub use builder::*;
pub use calculator::*;
pub use error::*;
pub use money::*;
pub use numbering::*;
pub use repository::*;
pub use settings::*;
pub use status::*;
pub use types::*;
pub use validation::*;
