pub mod error;
pub mod model;
pub mod settings;

pub use error::{Error, Result};
pub use model::{ConnectionProvider, ConnectionRegistry, MongoClient, DEFAULT_CONNECTION};
pub use settings::{ConnectionOptions, Settings};
