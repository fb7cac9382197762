//! # pulsar-params: Typed Pulsar Parameter Store
//!
//! A dictionary-style store for pulsar timing parameters. Every key maps to
//! one of four value kinds (float, float vector, text, unsigned integer) and
//! float-valued parameters may carry a paired uncertainty, read back through
//! the `NAME_ERR` key.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pulsar_params::{ParameterStore, ParameterValue};
//!
//! // Load a TEMPO parameter file
//! let mut store = ParameterStore::from_par_file("J0534+2200.par")?;
//!
//! let f0 = store.get("F0")?;
//! let f0_err = store.get("F0_ERR")?;
//! println!("F0 = {f0:?} +/- {f0_err:?}");
//!
//! // Re-setting a key moves it to the end of the key order
//! store.set("PSRJ", "J0534+2200");
//! assert_eq!(store.keys().last().map(String::as_str), Some("PSRJ"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod par;
pub mod store;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use par::{ParFileParser, TempoParser, TempoParserBuilder};
pub use store::{ParameterEntry, ParameterStore};
pub use value::{ParameterKind, ParameterValue};
