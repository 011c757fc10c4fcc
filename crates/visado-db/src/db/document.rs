use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use visado_core::models::Document;
use visado_core::AppError;

/// Repository for document registry rows. Blob bytes live in object
/// storage; this table records ownership and the opaque storage key.
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "insert"))]
    pub async fn create(
        &self,
        application_id: Uuid,
        original_filename: String,
        document_type: String,
        storage_key: String,
        content_type: String,
        file_size: i64,
    ) -> Result<Document, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(
            r#"
            INSERT INTO documents (
                id, application_id, original_filename, document_type,
                storage_key, content_type, file_size, uploaded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application_id)
        .bind(original_filename)
        .bind(document_type)
        .bind(storage_key)
        .bind(content_type)
        .bind(file_size)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document =
            sqlx::query_as::<Postgres, Document>("SELECT * FROM documents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(document)
    }

    /// Fetch a document only if it belongs to the given application. Used by
    /// the review flow, where a document id from one application must not
    /// resolve under another.
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn get_for_application(
        &self,
        id: Uuid,
        application_id: Uuid,
    ) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<Postgres, Document>(
            "SELECT * FROM documents WHERE id = $1 AND application_id = $2",
        )
        .bind(id)
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    pub async fn list_for_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<Postgres, Document>(
            "SELECT * FROM documents WHERE application_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
