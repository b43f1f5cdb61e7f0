mod button;
mod http_server;

pub use button::open_button;
pub use http_server::{HttpHandler, run_http_server};
