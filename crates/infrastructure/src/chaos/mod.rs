//! Chaos document loading
//!
//! Reads the fault injection document named by [`crate::config::ChaosAppConfig`]
//! from a file, standard input or the built-in profile, and validates it
//! into a [`domain::WeightedChaos`].

mod loader;

pub use loader::{
    ChaosLoadError, DEFAULT_PROFILE, DocumentFormat, default_profile, load_chaos, load_chaos_file,
    load_chaos_reader, parse_chaos_str,
};
