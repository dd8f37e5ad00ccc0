pub mod genius;

pub use genius::GeniusClient;
