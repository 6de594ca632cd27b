//! Request pipeline services.

pub mod pose;

pub use pose::PoseService;
