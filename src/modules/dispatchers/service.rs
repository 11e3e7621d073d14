use anyhow::{Context, anyhow};
use courierds_core::AppError;
use courierds_db::with_timeout;
use courierds_models::{
    ApplicationId, ApplicationStatus, ApplyDispatcherDto, Dispatcher, DispatcherApplication,
    User, UserId, UserRole,
};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use super::review::{ReviewDecision, review_application};
use crate::metrics::{track_application_reviewed, track_application_submitted};

const APPLICATION_COLUMNS: &str = "id, user_id, vehicle_type, vehicle_plate_number, vehicle_year, \
     vehicle_model, driver_license, status, created_at, updated_at";

const DISPATCHER_COLUMNS: &str = "id, user_id, application_id, vehicle_type, vehicle_plate_number, \
     vehicle_year, vehicle_model, driver_license, approved_at, is_active, rating, created_at, updated_at";

/// Result of reviewing one application.
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    AlreadyApproved,
    Rejected,
    Approved(Dispatcher),
}

impl ReviewOutcome {
    /// Metric and log label.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewOutcome::AlreadyApproved => "already_approved",
            ReviewOutcome::Rejected => "rejected",
            ReviewOutcome::Approved(_) => "approved",
        }
    }
}

pub struct DispatcherService;

impl DispatcherService {
    /// Files an application for `user`. Admins cannot apply and each user
    /// holds at most one application.
    #[instrument(skip(db, user, dto), fields(db.operation = "INSERT", db.table = "dispatcher_applications", user_id = %user.id))]
    pub async fn apply(
        db: &PgPool,
        user: &User,
        dto: ApplyDispatcherDto,
    ) -> Result<DispatcherApplication, AppError> {
        if user.role == UserRole::Admin {
            return Err(AppError::forbidden("admins cannot apply to become dispatchers"));
        }

        if Self::find_by_user_id(db, user.id).await?.is_some() {
            return Err(AppError::conflict(anyhow!("user already has an application")));
        }

        let query = format!(
            "INSERT INTO dispatcher_applications \
             (user_id, vehicle_type, vehicle_plate_number, vehicle_year, vehicle_model, driver_license, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 'pending') RETURNING {}",
            APPLICATION_COLUMNS
        );

        let application = with_timeout(
            sqlx::query_as::<_, DispatcherApplication>(&query)
                .bind(user.id)
                .bind(dto.vehicle_type)
                .bind(&dto.vehicle_plate_number)
                .bind(dto.vehicle_year)
                .bind(&dto.vehicle_model)
                .bind(&dto.driver_license)
                .fetch_one(db),
        )
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow!("user already has an application"));
                }
            }
            error!(error = %e, "Failed to insert dispatcher application");
            AppError::database(anyhow::Error::from(e).context("failed to submit application"))
        })?;

        info!(application_id = %application.id, "Dispatcher application submitted");
        track_application_submitted(application.vehicle_type.as_str());
        Ok(application)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "dispatcher_applications"))]
    pub async fn list_applications(db: &PgPool) -> Result<Vec<DispatcherApplication>, AppError> {
        let query = format!(
            "SELECT {} FROM dispatcher_applications ORDER BY created_at",
            APPLICATION_COLUMNS
        );
        let applications = with_timeout(sqlx::query_as::<_, DispatcherApplication>(&query).fetch_all(db))
            .await
            .context("failed to fetch dispatcher applications")
            .map_err(AppError::database)?;

        debug!(count = applications.len(), "Fetched dispatcher applications");
        Ok(applications)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "dispatcher_applications"))]
    pub async fn find_by_id(
        db: &PgPool,
        id: ApplicationId,
    ) -> Result<Option<DispatcherApplication>, AppError> {
        let query = format!(
            "SELECT {} FROM dispatcher_applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        with_timeout(
            sqlx::query_as::<_, DispatcherApplication>(&query)
                .bind(id)
                .fetch_optional(db),
        )
        .await
        .context("failed to fetch dispatcher application")
        .map_err(AppError::database)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "dispatcher_applications"))]
    pub async fn find_by_user_id(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<Option<DispatcherApplication>, AppError> {
        let query = format!(
            "SELECT {} FROM dispatcher_applications WHERE user_id = $1",
            APPLICATION_COLUMNS
        );
        with_timeout(
            sqlx::query_as::<_, DispatcherApplication>(&query)
                .bind(user_id)
                .fetch_optional(db),
        )
        .await
        .context("failed to fetch dispatcher application")
        .map_err(AppError::database)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "dispatchers"))]
    pub async fn list_dispatchers(db: &PgPool) -> Result<Vec<Dispatcher>, AppError> {
        let query = format!("SELECT {} FROM dispatchers ORDER BY approved_at", DISPATCHER_COLUMNS);
        with_timeout(sqlx::query_as::<_, Dispatcher>(&query).fetch_all(db))
            .await
            .context("failed to fetch dispatchers")
            .map_err(AppError::database)
    }

    /// Approves, rejects or skips `application` according to
    /// [`review_application`].
    #[instrument(skip(db, application), fields(application_id = %application.id, user_id = %application.user_id))]
    pub async fn review(
        db: &PgPool,
        application: DispatcherApplication,
    ) -> Result<ReviewOutcome, AppError> {
        let decision = review_application(&application);

        let outcome = match decision {
            ReviewDecision::AlreadyApproved => ReviewOutcome::AlreadyApproved,
            ReviewDecision::Reject => Self::reject(db, &application).await?,
            ReviewDecision::Approve => Self::promote(db, &application).await?,
        };

        let label = outcome.label();
        info!(outcome = label, "Dispatcher application reviewed");
        track_application_reviewed(label);

        Ok(outcome)
    }

    /// Deletes the application. An approval that landed concurrently is left
    /// untouched and reported as such.
    async fn reject(
        db: &PgPool,
        application: &DispatcherApplication,
    ) -> Result<ReviewOutcome, AppError> {
        let result = with_timeout(
            sqlx::query(
                "DELETE FROM dispatcher_applications WHERE user_id = $1 AND status <> 'approved'",
            )
            .bind(application.user_id)
            .execute(db),
        )
        .await
        .context("failed to delete dispatcher application")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Self::settled_outcome(db, application).await;
        }

        Ok(ReviewOutcome::Rejected)
    }

    /// Marks the application approved, creates the dispatcher and promotes
    /// the user, all in one transaction. The status flip only matches a
    /// pending row, so concurrent reviews promote at most once.
    async fn promote(
        db: &PgPool,
        application: &DispatcherApplication,
    ) -> Result<ReviewOutcome, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("failed to start promotion")
            .map_err(AppError::database)?;

        let flipped = with_timeout(
            sqlx::query(
                "UPDATE dispatcher_applications SET status = 'approved', updated_at = NOW() \
                 WHERE id = $1 AND status = 'pending'",
            )
            .bind(application.id)
            .execute(&mut *tx),
        )
        .await
        .context("failed to approve dispatcher application")
        .map_err(AppError::database)?;

        if flipped.rows_affected() == 0 {
            tx.rollback()
                .await
                .context("failed to roll back promotion")
                .map_err(AppError::database)?;
            warn!("Application was no longer pending at approval time");
            return Self::settled_outcome(db, application).await;
        }

        let insert = format!(
            "INSERT INTO dispatchers \
             (user_id, application_id, vehicle_type, vehicle_plate_number, vehicle_year, vehicle_model, \
              driver_license, approved_at, is_active, rating) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), TRUE, 0) RETURNING {}",
            DISPATCHER_COLUMNS
        );
        let dispatcher = with_timeout(
            sqlx::query_as::<_, Dispatcher>(&insert)
                .bind(application.user_id)
                .bind(application.id)
                .bind(application.vehicle_type)
                .bind(&application.vehicle_plate_number)
                .bind(application.vehicle_year)
                .bind(&application.vehicle_model)
                .bind(&application.driver_license)
                .fetch_one(&mut *tx),
        )
        .await
        .context("failed to create dispatcher")
        .map_err(AppError::database)?;

        let promoted = with_timeout(
            sqlx::query("UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2")
                .bind(UserRole::Dispatcher)
                .bind(application.user_id)
                .execute(&mut *tx),
        )
        .await
        .context("failed to promote user")
        .map_err(AppError::database)?;

        if promoted.rows_affected() == 0 {
            // dropping `tx` rolls the promotion back
            return Err(AppError::database(anyhow!("failed to promote user: user not found")));
        }

        tx.commit()
            .await
            .context("failed to commit promotion")
            .map_err(AppError::database)?;

        info!(dispatcher_id = %dispatcher.id, "User promoted to dispatcher");
        Ok(ReviewOutcome::Approved(dispatcher))
    }

    /// Re-reads an application whose row changed under a review.
    async fn settled_outcome(
        db: &PgPool,
        application: &DispatcherApplication,
    ) -> Result<ReviewOutcome, AppError> {
        match Self::find_by_id(db, application.id).await? {
            Some(current) if current.status == ApplicationStatus::Approved => {
                Ok(ReviewOutcome::AlreadyApproved)
            }
            _ => Err(AppError::not_found(anyhow!("dispatcher application not found"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(ReviewOutcome::Rejected.label(), "rejected");
        assert_eq!(ReviewOutcome::AlreadyApproved.label(), "already_approved");
    }
}
