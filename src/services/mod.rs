pub mod session;
pub use session::{SessionClaims, SessionSigner};

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService};
pub use account_service_impl::SeaOrmAccountService;

pub mod report_service;
pub mod report_service_impl;
pub use report_service::{ReportError, ReportService};
pub use report_service_impl::SeaOrmReportService;
