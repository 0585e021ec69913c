// Domain layer: catalog models and the ports the importers talk through.

pub mod model;
pub mod ports;
