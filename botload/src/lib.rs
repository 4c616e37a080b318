#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

extern crate self as botload;

#[macro_use]
mod macros;

mod data;
mod measurement;
mod sampler;
pub mod scenario;
#[doc(hidden)]
pub mod transaction;

cfg_http! {
    pub mod predict;
    pub mod target;
    pub mod traffic;
}

pub use botload_core as core;
pub use botload_macros::{scenario, transaction};
pub use measurement::Measurement;
pub use scenario::Scenario;

pub mod prelude {
    pub use crate::scenario::{ConfigurableScenario, Scenario};
    pub use botload_core::{RunConfig, RunStatistics};
    pub use botload_macros::{scenario, transaction};

    cfg_http! {
        pub use crate::predict::{PredictClient, PredictOutcome};
        pub use crate::target::SessionTarget;
    }
}
