mod handler;
mod model;

pub use handler::fetch_profile;
pub use model::ProfileRequest;
