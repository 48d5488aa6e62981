mod capture;
mod filters;
mod ivr;
mod lists;
mod methods;
mod rate_limits;
mod report;
mod skills;
mod statistics;
mod users;

pub use capture::capture_domain;
pub use filters::{demystify_filters, remystify_filter};
pub use ivr::{extract_ivr_functions, ivr_variables};
pub use lists::{add_list_records, delete_list_records};
pub use methods::list_methods;
pub use rate_limits::show_rate_limits;
pub use report::run_report;
pub use skills::update_user_skills;
pub use statistics::show_statistics;
pub use users::{capture_users, update_users};
