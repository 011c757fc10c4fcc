use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use visado_core::models::{AiReview, Application, ApplicationStatus};
use visado_core::AppError;

/// Row shape for `visa_applications`. The stored AI review is jsonb and is
/// decoded into the typed model on the way out; a row whose stored review no
/// longer matches the schema surfaces as an error instead of being silently
/// dropped.
#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    user_id: Uuid,
    destination_country: String,
    origin_country: String,
    visa_type: String,
    status: ApplicationStatus,
    purpose: Option<String>,
    travel_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    ai_review: Option<serde_json::Value>,
    submitted_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl ApplicationRow {
    fn into_application(self) -> Result<Application, AppError> {
        let ai_review = self
            .ai_review
            .map(serde_json::from_value::<AiReview>)
            .transpose()
            .map_err(|e| {
                AppError::InternalWithSource {
                    message: format!("Stored AI review for application {} is corrupt", self.id),
                    source: e.into(),
                }
            })?;

        Ok(Application {
            id: self.id,
            user_id: self.user_id,
            destination_country: self.destination_country,
            origin_country: self.origin_country,
            visa_type: self.visa_type,
            status: self.status,
            purpose: self.purpose,
            travel_date: self.travel_date,
            return_date: self.return_date,
            ai_review,
            submitted_at: self.submitted_at,
            reviewed_at: self.reviewed_at,
        })
    }
}

fn rows_to_applications(rows: Vec<ApplicationRow>) -> Result<Vec<Application>, AppError> {
    rows.into_iter().map(ApplicationRow::into_application).collect()
}

/// Repository for visa applications.
///
/// Status and AI review are independent columns with independent update
/// methods; neither write touches the other.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "visa_applications", db.operation = "insert"))]
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: Uuid,
        destination_country: String,
        origin_country: String,
        visa_type: String,
        purpose: Option<String>,
        travel_date: Option<NaiveDate>,
        return_date: Option<NaiveDate>,
    ) -> Result<Application, AppError> {
        let row = sqlx::query_as::<Postgres, ApplicationRow>(
            r#"
            INSERT INTO visa_applications (
                id, user_id, destination_country, origin_country, visa_type,
                status, purpose, travel_date, return_date, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(destination_country)
        .bind(origin_country)
        .bind(visa_type)
        .bind(ApplicationStatus::Pending)
        .bind(purpose)
        .bind(travel_date)
        .bind(return_date)
        .fetch_one(&self.pool)
        .await?;

        row.into_application()
    }

    #[tracing::instrument(skip(self), fields(db.table = "visa_applications", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<Postgres, ApplicationRow>(
            "SELECT * FROM visa_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApplicationRow::into_application).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "visa_applications", db.operation = "select"))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<Postgres, ApplicationRow>(
            "SELECT * FROM visa_applications WHERE user_id = $1 ORDER BY submitted_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows_to_applications(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "visa_applications", db.operation = "select"))]
    pub async fn list_all(&self) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<Postgres, ApplicationRow>(
            "SELECT * FROM visa_applications ORDER BY submitted_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows_to_applications(rows)
    }

    /// Write a decided status and its review timestamp in one statement.
    #[tracing::instrument(skip(self), fields(db.table = "visa_applications", db.operation = "update"))]
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Application, AppError> {
        let row = sqlx::query_as::<Postgres, ApplicationRow>(
            r#"
            UPDATE visa_applications
            SET status = $2, reviewed_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewed_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_application()
    }

    /// Overwrite the stored AI review. One review per application, no
    /// history.
    #[tracing::instrument(skip(self, review), fields(db.table = "visa_applications", db.operation = "update"))]
    pub async fn set_ai_review(
        &self,
        id: Uuid,
        review: &AiReview,
    ) -> Result<Application, AppError> {
        let review_json = serde_json::to_value(review).map_err(|e| {
            AppError::InternalWithSource {
                message: "Failed to serialize AI review".to_string(),
                source: e.into(),
            }
        })?;

        let row = sqlx::query_as::<Postgres, ApplicationRow>(
            r#"
            UPDATE visa_applications
            SET ai_review = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(review_json)
        .fetch_one(&self.pool)
        .await?;

        row.into_application()
    }
}
