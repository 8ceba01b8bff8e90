pub mod client;
pub mod deadline;
pub mod document;
pub mod registry;

pub use client::MongoClient;
pub use registry::{ConnectionProvider, ConnectionRegistry};

/// Name of the environment-backed connection.
pub const DEFAULT_CONNECTION: &str = "default";
