// Adapters layer: concrete implementations of the domain ports (HTTP catalog client, connectivity probes).

pub mod connectivity;
pub mod http;

pub use connectivity::{StaticConnectivity, TcpProbe};
pub use http::TmdbClient;
