mod aggregator;
mod growth;

pub use aggregator::{DashboardAggregator, DashboardSnapshot};
pub use growth::{growth_percent, month_to_date_windows, DateWindow};
