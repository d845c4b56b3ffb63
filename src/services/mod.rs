pub mod ensemble;
pub mod features;
pub mod inference;
pub mod inputs;
pub mod model;
pub mod presenter;
