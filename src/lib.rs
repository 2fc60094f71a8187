pub mod api;
pub mod clients;
pub mod core;
pub mod data;
pub mod query;
pub mod utils;

pub use crate::core::{config::*, error::*, types::*};
pub use data::{DataSources, DataStore, ReloadReport};
