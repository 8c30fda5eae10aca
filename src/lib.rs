pub mod clients;
pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
pub mod services;
pub mod soap;
pub mod utils;

pub use clients::{HttpClient, SoapTransport};
pub use config::Settings;
pub use error::{Error, Result};
pub use services::{ApiService, PdfDownload, VendorService};
