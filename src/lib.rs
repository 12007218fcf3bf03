pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::http::HttpPriceApi;
pub use config::Config;
pub use error::{FormError, PriceError};
pub use services::price_screen::PriceListScreen;
pub use services::slice::{PujaPrices, ServicePrices};
