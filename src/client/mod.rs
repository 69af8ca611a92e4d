// HTTP clients hiding communication with services that implement the
// data-access contracts.

pub mod ground;
pub mod satellite;
pub mod web_client;

pub use ground::GroundDataClient;
pub use satellite::SatelliteDataClient;
pub use web_client::WebClient;
