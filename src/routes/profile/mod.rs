mod handler;
mod model;

pub use handler::{create_profile, update_own_profile, update_profile};
