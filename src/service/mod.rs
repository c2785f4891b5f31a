pub use self::app_service::AppService;
pub use self::request_service::{RequestService, RequestServiceBuilder};

mod app_service;
mod request_service;
