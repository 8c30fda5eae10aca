pub mod api;
pub mod vendor;

pub use api::ApiService;
pub use vendor::{DashboardSummary, FinanceOverview, PdfDownload, VendorService};
