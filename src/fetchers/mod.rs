mod request;

pub use request::{RequestFetcher, ACCEPT_HTML};
