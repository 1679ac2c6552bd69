pub mod check_format;
pub mod reconcile;
