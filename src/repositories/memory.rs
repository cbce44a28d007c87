use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::url_record::UrlRecordRepositoryTrait;
use crate::errors::RepositoryError;
use crate::models::{NewUrlRecord, UrlRecord};

type Result<T> = std::result::Result<T, RepositoryError>;

/// Process-local store with the same semantics as the Postgres table.
///
/// Every operation takes the lock once, so check-and-insert and increments
/// are atomic with respect to each other.
#[derive(Default)]
pub struct InMemoryUrlRecordRepository {
    records: RwLock<HashMap<String, UrlRecord>>,
}

impl InMemoryUrlRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRecordRepositoryTrait for InMemoryUrlRecordRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<String>> {
        Ok(self
            .records
            .read()
            .values()
            .find(|r| !r.is_custom && r.long_url == long_url)
            .map(|r| r.short_code.clone()))
    }

    async fn exists(&self, short_code: &str) -> Result<bool> {
        Ok(self.records.read().contains_key(short_code))
    }

    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        let mut records = self.records.write();
        if records.contains_key(&record.short_code) {
            return Err(RepositoryError::Conflict(format!(
                "Short code '{}' already exists",
                record.short_code
            )));
        }
        // Mirrors the unique partial index on generated mappings
        if !record.is_custom
            && records
                .values()
                .any(|r| !r.is_custom && r.long_url == record.long_url)
        {
            return Err(RepositoryError::Conflict(format!(
                "A generated code already exists for '{}'",
                record.long_url
            )));
        }

        let record = UrlRecord::from(record);
        records.insert(record.short_code.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>> {
        Ok(self.records.read().get(short_code).cloned())
    }

    async fn increment_access(&self, short_code: &str) -> Result<bool> {
        match self.records.write().get_mut(short_code) {
            Some(record) => {
                record.access_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>> {
        Ok(self.records.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_record(code: &str, url: &str, is_custom: bool) -> NewUrlRecord {
        NewUrlRecord {
            long_url: url.to_string(),
            short_code: code.to_string(),
            is_custom,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_then_exists() {
        let repo = InMemoryUrlRecordRepository::new();
        assert!(!repo.exists("abc123").await.unwrap());

        let stored = repo
            .insert(new_record("abc123", "https://example.com", false))
            .await
            .unwrap();
        assert_eq!(stored.access_count, 0);
        assert!(repo.exists("abc123").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let repo = InMemoryUrlRecordRepository::new();
        repo.insert(new_record("abc123", "https://a.example", false))
            .await
            .unwrap();

        let result = repo
            .insert(new_record("abc123", "https://b.example", true))
            .await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(
            repo.get("abc123").await.unwrap().unwrap().long_url,
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn test_find_by_long_url_skips_custom_aliases() {
        let repo = InMemoryUrlRecordRepository::new();
        repo.insert(new_record("mine", "https://example.com", true))
            .await
            .unwrap();
        assert_eq!(repo.find_by_long_url("https://example.com").await.unwrap(), None);

        repo.insert(new_record("abc123", "https://example.com", false))
            .await
            .unwrap();
        assert_eq!(
            repo.find_by_long_url("https://example.com").await.unwrap(),
            Some("abc123".to_string())
        );
    }

    #[tokio::test]
    async fn test_one_generated_code_per_url() {
        let repo = InMemoryUrlRecordRepository::new();
        repo.insert(new_record("abc123", "https://example.com", false))
            .await
            .unwrap();

        let second = repo
            .insert(new_record("def456", "https://example.com", false))
            .await;
        assert!(matches!(second, Err(RepositoryError::Conflict(_))));
        assert!(!repo.exists("def456").await.unwrap());

        repo.insert(new_record("mine", "https://example.com", true))
            .await
            .unwrap();
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_increment_access() {
        let repo = InMemoryUrlRecordRepository::new();
        assert!(!repo.increment_access("nope").await.unwrap());

        repo.insert(new_record("abc123", "https://example.com", false))
            .await
            .unwrap();
        assert!(repo.increment_access("abc123").await.unwrap());
        assert!(repo.increment_access("abc123").await.unwrap());
        assert_eq!(repo.get("abc123").await.unwrap().unwrap().access_count, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = Arc::new(InMemoryUrlRecordRepository::new());
        repo.insert(new_record("hot", "https://example.com", false))
            .await
            .unwrap();

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_access("hot").await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.get("hot").await.unwrap().unwrap().access_count, 100);
    }

    #[tokio::test]
    async fn test_list_all_returns_every_record() {
        let repo = InMemoryUrlRecordRepository::new();
        for (code, url) in [("a1", "https://a.example"), ("b2", "https://b.example")] {
            repo.insert(new_record(code, url, false)).await.unwrap();
        }

        let mut codes: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.short_code)
            .collect();
        codes.sort();
        assert_eq!(codes, vec!["a1", "b2"]);
    }
}
