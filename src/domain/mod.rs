// Domain layer: the movie model, its transfer encoding and the ports the core talks through.

pub mod model;
pub mod parcel;
pub mod ports;
