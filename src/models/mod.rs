mod url_record;

pub use url_record::{CreateUrlDto, NewUrlRecord, RawExpiry, ShortenedUrlResponseDto, UrlRecord, UrlStatsDto};
