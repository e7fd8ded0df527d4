pub mod datapoint;
pub mod json;

pub use datapoint::Datapoint;
