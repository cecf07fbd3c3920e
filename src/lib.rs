// The cmd and reports modules belong to the binary crate (main.rs);
// everything the CLI needs from the library goes through api.
pub mod api;
pub mod config;
pub mod cost;
pub mod error;
pub mod estimates;
pub mod nd;
pub mod params;
pub mod prob;
pub mod schemes;
pub mod search;
pub mod util;
