//! Market snapshot acquisition for hedge-rs
//!
//! Provides the [`DataSource`] trait the pipeline loads snapshots through,
//! plus three implementations of the underlying data supply:
//!
//! - [`ManualDataset`] - a pre-supplied JSON dataset (prices, metrics,
//!   insider trades, market cap, sentiment), validated and sorted on load
//! - [`RestClient`] - a financial-datasets REST provider client
//! - [`MarketResearcher`] - an LLM-backed gatherer that asks the scoring
//!   oracle to assemble a dataset from web knowledge, with a conservative
//!   default when the response cannot be parsed
//!
//! Date-window arithmetic (the 3-calendar-month default lookback and
//! business-day iteration) lives in [`dates`].

pub mod dates;
pub mod error;
pub mod manual;
pub mod research;
pub mod rest;
pub mod source;

pub use dates::DateWindow;
pub use error::{DataError, Result};
pub use manual::ManualDataset;
pub use research::MarketResearcher;
pub use rest::{RestClient, RestDataSource};
pub use source::{DataSource, ManualDataSource};
