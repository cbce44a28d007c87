mod url_record;

pub use url_record::{list_handler, redirect_handler, shorten_handler, stats_handler};
