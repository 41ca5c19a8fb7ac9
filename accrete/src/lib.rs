//! Ordered, asynchronous settings accumulation.
//!
//! An [`Accumulator`] starts from a default mapping and merges entries from
//! environment variables, JSON files and parsed command-line arguments in
//! the exact order the sources were declared. Each source reads
//! asynchronously, yet merges never overlap or reorder: every step waits
//! for the previous one, and the first failure ends the chain.
//!
//! Every merge passes its entries through [`MergeOptions`], which can
//! rewrite entries and select which of them survive.
//!
//! ```rust,no_run
//! use accrete::{Accumulator, ArgvConfig, MergeOptions};
//! use serde_json::json;
//!
//! # async fn run() -> accrete::AccreteResult<()> {
//! let settings = Accumulator::from_defaults(&json!({"port": 8080}))?;
//! settings
//!     .env("APP_", MergeOptions::new())
//!     .json("settings.json", MergeOptions::new().exclude(["secret"]))
//!     .argv(ArgvConfig::new("app").cmd("serve"), MergeOptions::new());
//! let settled = settings.done().await?;
//! println!("{:?}", settled.snapshot());
//! # Ok(())
//! # }
//! ```

mod accumulator;
mod case;
mod error;
pub mod fs;
mod options;
mod result_ext;
pub mod source;

pub use accumulator::{Accumulator, AccumulatorBuilder};
pub use case::{camel_case, strip_prefix};
pub use error::{AccreteError, AccreteResult, is_display_request};
pub use fs::{FileSystem, TokioFileSystem};
pub use options::{Entry, MergeOptions, process};
pub use result_ext::AccreteResultExt;
pub use source::SourceKind;
pub use source::argv::{ArgvConfig, CMD_KEY, OptionInstaller, SubCommand};
pub use source::env::Environment;
