mod error;
mod handlers;
mod json_value;
mod resolver;
mod routes;
mod state;
mod templating;

pub mod args;

pub use error::ServerError;
pub use routes::build_router;
pub use state::AppState;
