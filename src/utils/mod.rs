pub mod number;
pub mod time;

pub use number::{parse_float_lenient, parse_int_lenient};
pub use time::{days_between_ceil, parse_sap_date};
