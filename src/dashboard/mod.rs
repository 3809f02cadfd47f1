//! The dashboard: summary figures and charts for the current month.

mod aggregation;
mod charts;
mod handlers;

pub use aggregation::{
    MonthCashFlow, PeriodSummary, expenses_by_category_sorted, monthly_cash_flow,
    summarize_period,
};
pub use handlers::get_dashboard_page;
