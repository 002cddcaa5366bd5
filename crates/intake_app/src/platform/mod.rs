mod app;
mod logging;
mod store;

pub use app::run_app;
