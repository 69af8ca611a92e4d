// Domain layer: shared data model and service contracts (ports).

pub mod geo;
pub mod metar;
pub mod ports;
pub mod status;
