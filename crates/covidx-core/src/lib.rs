//! # `covidx` Core
//!
//! Covered-column secondary index codec for wide-column, multi-version row
//! stores.
//!
//! Given every known version of one row (persisted cells plus one pending
//! mutation) and an ordered group of covered columns, `covidx` resolves the
//! most recent visible value of each column as of a timestamp ceiling and
//! packs the values and the row's primary key into one composite index key.
//!
//! ## Features
//!
//! - **Version resolution**: delete-aware, timestamp-bounded scans over a
//!   row's cells, with exact-qualifier and whole-family (wildcard) columns
//! - **Composite keys**: order-preserving value prefix with a fixed-stride
//!   length trailer, fully decodable without a schema
//! - **Group specifications**: column groups serialized to and from flat
//!   property maps
//! - **Index maintenance**: per-event index puts and stale-row deletes
//!
//! ## Quick Start
//!
//! ```rust
//! use covidx_core::{
//!     codec, Cell, ColumnGroup, CoveredColumn, CoveredColumnIndexCodec, Mutation, RowVersionStore,
//! };
//!
//! let group = ColumnGroup::new(
//!     "users_by_name",
//!     vec![CoveredColumn::exact("info", "name")?],
//! )?;
//!
//! let mutation = Mutation::new("user-1").put("info", "name", 10, "alice");
//! let store = RowVersionStore::from_row("user-1", Vec::<Cell>::new(), &mutation)?;
//!
//! let key = CoveredColumnIndexCodec::new(&store, &group).index_row_key(10)?;
//! let (values, primary_key) = codec::decode_with_primary_key(&key.key)?;
//! assert_eq!(values, vec!["alice"]);
//! assert_eq!(primary_key, "user-1");
//! # Ok::<(), covidx_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::missing_errors_doc)]

pub mod builder;
pub mod cell;
pub mod codec;
pub mod column;
pub mod config;
pub mod error;
pub mod group;
pub mod mutation;
pub mod projection;
pub mod store;

pub use builder::{IndexBuilder, IndexUpdate};
pub use cell::{Cell, CellKind};
pub use codec::{CoveredColumnIndexCodec, IndexRowKey, ResolvedSlot};
pub use column::CoveredColumn;
pub use config::{CodecConfig, ConfigError, CovidxConfig, GroupConfig, LoggingConfig};
pub use error::{Error, Result};
pub use group::{ColumnGroup, IndexSpecBuilder, IndexSpecProperties};
pub use mutation::Mutation;
pub use projection::{IndexColumn, IndexWrite, IndexWriteLayout};
pub use store::{RowVersionStore, Scanner};
