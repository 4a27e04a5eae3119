pub mod validation;

pub use validation::{validate_group_name, validate_site};
