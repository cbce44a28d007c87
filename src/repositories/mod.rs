mod memory;
mod url_record;

pub use memory::InMemoryUrlRecordRepository;
pub use url_record::{UrlRecordRepository, UrlRecordRepositoryTrait};

#[cfg(test)]
pub use url_record::MockUrlRecordRepositoryTrait;
