mod handler;
mod model;

pub use handler::fetch_progress;
pub use model::ProgressRequest;
