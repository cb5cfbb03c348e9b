// src/store/memory.rs

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::RwLock;

use super::{QuestionStore, StoreError, StoreResult, check_count};
use crate::models::question::{NewQuestion, Question};

/// In-process question store.
///
/// Mirrors the PostgreSQL store: ids start at 1, reads are ordered by id and
/// answers longer than the column bound are rejected as write failures.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: Vec<Question>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, ordered by id.
    pub async fn all(&self) -> Vec<Question> {
        self.inner.read().await.rows.clone()
    }
}

fn check_bounds(question: &NewQuestion) -> StoreResult<()> {
    match question.oversized_field() {
        Some(field) => Err(StoreError::WriteFailed(format!(
            "value too long for column {field}"
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn create(&self, question: NewQuestion) -> StoreResult<Question> {
        check_bounds(&question)?;

        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let created = question.with_id(inner.last_id);
        inner.rows.push(created.clone());

        Ok(created)
    }

    async fn create_many(&self, questions: Vec<NewQuestion>) -> StoreResult<Vec<Question>> {
        // Validate the whole batch first so a failure leaves no rows behind.
        for question in &questions {
            check_bounds(question)?;
        }

        let mut inner = self.inner.write().await;
        let mut created = Vec::with_capacity(questions.len());
        for question in questions {
            inner.last_id += 1;
            created.push(question.with_id(inner.last_id));
        }
        inner.rows.extend(created.iter().cloned());

        Ok(created)
    }

    async fn get_many(&self, count: i64) -> StoreResult<Vec<Question>> {
        check_count(count)?;

        let inner = self.inner.read().await;
        let limit = usize::try_from(count).unwrap_or(usize::MAX);
        Ok(inner.rows.iter().take(limit).cloned().collect())
    }

    async fn get_single(&self) -> StoreResult<Question> {
        let inner = self.inner.read().await;
        inner.rows.first().cloned().ok_or(StoreError::NotFound)
    }

    async fn get_random(&self) -> StoreResult<Question> {
        let inner = self.inner.read().await;
        if inner.rows.is_empty() {
            return Err(StoreError::NotFound);
        }
        let index = rand::thread_rng().gen_range(0..inner.rows.len());
        Ok(inner.rows[index].clone())
    }

    async fn count(&self) -> StoreResult<i64> {
        let rows = self.inner.read().await.rows.len();
        Ok(i64::try_from(rows).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::MAX_ANSWER_CHARS;

    fn sample(n: usize) -> NewQuestion {
        NewQuestion {
            question: format!("Question {n}"),
            answer_a: "A".to_string(),
            answer_b: "B".to_string(),
            answer_c: "C".to_string(),
            answer_d: "D".to_string(),
            correct_answer: "A".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let store = MemoryStore::new();
        let first = store.create(sample(0)).await.unwrap();
        let batch = store.create_many(vec![sample(1), sample(2)]).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(batch.iter().map(|q| q.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn get_many_is_ordered_by_id() {
        let store = MemoryStore::new();
        store
            .create_many((0..5).map(sample).collect())
            .await
            .unwrap();

        let rows = store.get_many(3).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failing_batch_leaves_no_rows() {
        let store = MemoryStore::new();
        let mut bad = sample(1);
        bad.answer_d = "d".repeat(MAX_ANSWER_CHARS + 1);

        let result = store.create_many(vec![sample(0), bad, sample(2)]).await;
        assert!(matches!(result, Err(StoreError::WriteFailed(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn random_pick_covers_every_row() {
        let store = MemoryStore::new();
        store
            .create_many((0..3).map(sample).collect())
            .await
            .unwrap();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(store.get_random().await.unwrap().id);
        }
        assert_eq!(seen.len(), 3);
    }
}
