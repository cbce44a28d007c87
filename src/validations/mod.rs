mod url_record;

pub use url_record::{validate_custom_alias, validate_expiry_days, validate_url};
