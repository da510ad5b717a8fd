pub mod cache;
pub mod ergast_client;

pub use cache::ResponseCache;
pub use ergast_client::ErgastClient;
