//! Builder for accumulators with injected collaborators.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::{Accumulator, settled};
use crate::Environment;
use crate::fs::{FileSystem, TokioFileSystem};

/// Configures the collaborators an [`Accumulator`] reads from.
///
/// Defaults to the process environment and [`TokioFileSystem`].
#[must_use = "call `build` to create the accumulator"]
pub struct AccumulatorBuilder {
    defaults: Map<String, Value>,
    environment: Environment,
    fs: Arc<dyn FileSystem>,
}

impl AccumulatorBuilder {
    pub(super) fn new(defaults: Map<String, Value>) -> Self {
        Self {
            defaults,
            environment: Environment::default(),
            fs: Arc::new(TokioFileSystem),
        }
    }

    /// Read environment variables from `environment`.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Read settings files through `fs`.
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Create the accumulator.
    pub fn build(self) -> Accumulator {
        Accumulator {
            settings: Arc::new(Mutex::new(self.defaults)),
            chain: Arc::new(Mutex::new(settled())),
            environment: self.environment,
            fs: self.fs,
        }
    }
}

impl std::fmt::Debug for AccumulatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccumulatorBuilder")
            .field("defaults", &self.defaults)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
