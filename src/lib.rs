pub mod cli;
pub mod database;
pub mod error;
pub mod factory;
pub mod gpx;
pub mod id;
pub mod persistence;
pub mod session;
pub mod store;
pub mod utils;
pub mod workout;
