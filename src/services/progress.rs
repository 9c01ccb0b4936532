//! Challenge-progress tracker.
//!
//! Maintains per-user completion state for a challenge's steps and cascades
//! unlocking: flipping a step recomputes the challenge percentage, marks the
//! challenge completed at exactly 100%, and unblocks the next challenge in
//! sequence. The step write and the percentage/completed write run inside one
//! transaction so a reader never observes them apart.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::user_challenge_step::StepState;
use crate::models::{challenge, step, user_challenge, user_challenge_step};
use crate::state::DbConn;

/// Result of a step-state update.
#[derive(Debug)]
pub enum StepUpdateOutcome {
    /// The requested state equals the current one; nothing was recomputed.
    NoOp(user_challenge_step::Model),
    Updated {
        step: user_challenge_step::Model,
        progress: user_challenge::Model,
        /// True when this update completed the challenge and a next
        /// challenge was unblocked for the user.
        unblocked_next: bool,
    },
}

/// Completed-over-total as an integer percentage, rounded to nearest.
/// A challenge with zero steps reports 0%.
pub fn completion_percentage(done: u64, total: u64) -> i32 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as i32
}

/// Update the state of one step for a (user, challenge) pair and recompute
/// the challenge progress.
///
/// Missing (user, challenge, step) row → NotFound. Same-state update is a
/// no-op that returns the unchanged record. At exactly 100% the challenge is
/// marked completed and the next challenge is unblocked in process.
pub async fn update_step_state(
    db: &DbConn,
    user_id: i64,
    challenge_id: i64,
    step_id: i64,
    new_state: StepState,
) -> Result<StepUpdateOutcome> {
    let step_row = UserChallengeStep::find()
        .filter(user_challenge_step::Column::UserId.eq(user_id))
        .filter(user_challenge_step::Column::ChallengeId.eq(challenge_id))
        .filter(user_challenge_step::Column::StepId.eq(step_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Step progress not found for this user and challenge".to_string())
        })?;

    if step_row.state == new_state {
        return Ok(StepUpdateOutcome::NoOp(step_row));
    }

    let txn = db.begin().await?;

    let mut step_model: user_challenge_step::ActiveModel = step_row.into();
    step_model.state = Set(new_state);
    let updated_step = step_model.update(&txn).await?;

    let total = Step::find()
        .filter(step::Column::ChallengeId.eq(challenge_id))
        .count(&txn)
        .await?;
    let done = UserChallengeStep::find()
        .filter(user_challenge_step::Column::UserId.eq(user_id))
        .filter(user_challenge_step::Column::ChallengeId.eq(challenge_id))
        .filter(user_challenge_step::Column::State.eq(StepState::Done))
        .count(&txn)
        .await?;

    let percentage = completion_percentage(done, total);

    let progress_row = UserChallenge::find()
        .filter(user_challenge::Column::UserId.eq(user_id))
        .filter(user_challenge::Column::ChallengeId.eq(challenge_id))
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Challenge is not enrolled for this user".to_string())
        })?;

    let mut progress_model: user_challenge::ActiveModel = progress_row.into();
    progress_model.progress_percentage = Set(percentage);
    progress_model.completed = Set(percentage == 100);
    let progress = progress_model.update(&txn).await?;

    txn.commit().await?;

    let mut unblocked_next = false;
    if percentage == 100 {
        match unblock_next_challenge(db, user_id, challenge_id).await {
            Ok(_) => unblocked_next = true,
            // Highest-numbered challenge has no successor
            Err(AppError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(StepUpdateOutcome::Updated {
        step: updated_step,
        progress,
        unblocked_next,
    })
}

/// Make the next-numbered challenge available to a user.
///
/// Creates the enrollment (unblocked, 0%) and seeds one progress row per step
/// when none exists; an existing (pre-seeded blocked) enrollment just gets its
/// blocked flag cleared. NotFound when there is no next challenge.
pub async fn unblock_next_challenge(
    db: &DbConn,
    user_id: i64,
    current_challenge_id: i64,
) -> Result<user_challenge::Model> {
    let current = Challenge::find_by_id(current_challenge_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

    let next = Challenge::find()
        .filter(challenge::Column::Number.gt(current.number))
        .order_by_asc(challenge::Column::Number)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("No next challenge to unblock".to_string()))?;

    let existing = UserChallenge::find()
        .filter(user_challenge::Column::UserId.eq(user_id))
        .filter(user_challenge::Column::ChallengeId.eq(next.id))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut model: user_challenge::ActiveModel = row.into();
        model.blocked = Set(false);
        return Ok(model.update(db).await?);
    }

    let txn = db.begin().await?;

    let enrollment = user_challenge::ActiveModel {
        user_id: Set(user_id),
        challenge_id: Set(next.id),
        progress_percentage: Set(0),
        completed: Set(false),
        blocked: Set(false),
        detail_seen: Set(false),
        ..Default::default()
    };
    let created = enrollment.insert(&txn).await?;

    let steps = Step::find()
        .filter(step::Column::ChallengeId.eq(next.id))
        .all(&txn)
        .await?;
    for s in steps {
        let seeded = user_challenge_step::ActiveModel {
            user_id: Set(user_id),
            challenge_id: Set(next.id),
            step_id: Set(s.id),
            state: Set(StepState::NotStarted),
            ..Default::default()
        };
        seeded.insert(&txn).await?;
    }

    txn.commit().await?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        create_test_challenge, create_test_db, create_test_step, create_test_user, enroll_user,
    };

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(completion_percentage(0, 2), 0);
        assert_eq!(completion_percentage(1, 2), 50);
        assert_eq!(completion_percentage(2, 2), 100);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
    }

    #[test]
    fn zero_step_challenge_reports_zero_percent() {
        assert_eq!(completion_percentage(0, 0), 0);
    }

    #[tokio::test]
    async fn update_rejects_unknown_triple() {
        let db = create_test_db().await;
        let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;

        let result = update_step_state(&db, user.id, 1, 1, StepState::Done).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn two_step_challenge_reaches_100_and_unblocks_next() {
        let db = create_test_db().await;
        let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
        let first = create_test_challenge(&db, 1, "Reading odds").await;
        let second = create_test_challenge(&db, 2, "Value betting").await;
        let step_a = create_test_step(&db, first.id).await;
        let step_b = create_test_step(&db, first.id).await;
        let next_step = create_test_step(&db, second.id).await;
        enroll_user(&db, user.id, first.id).await;

        // First step done → 50%, not completed
        let outcome = update_step_state(&db, user.id, first.id, step_a.id, StepState::Done)
            .await
            .unwrap();
        match outcome {
            StepUpdateOutcome::Updated {
                progress,
                unblocked_next,
                ..
            } => {
                assert_eq!(progress.progress_percentage, 50);
                assert!(!progress.completed);
                assert!(!unblocked_next);
            }
            other => panic!("expected update, got {:?}", other),
        }

        // Second step done → 100%, completed, next challenge unblocked
        let outcome = update_step_state(&db, user.id, first.id, step_b.id, StepState::Done)
            .await
            .unwrap();
        match outcome {
            StepUpdateOutcome::Updated {
                progress,
                unblocked_next,
                ..
            } => {
                assert_eq!(progress.progress_percentage, 100);
                assert!(progress.completed);
                assert!(unblocked_next);
            }
            other => panic!("expected update, got {:?}", other),
        }

        // Enrollment for challenge #2 was created unblocked at 0% with seeded steps
        let next_enrollment = UserChallenge::find()
            .filter(user_challenge::Column::UserId.eq(user.id))
            .filter(user_challenge::Column::ChallengeId.eq(second.id))
            .one(&db)
            .await
            .unwrap()
            .expect("next challenge enrollment");
        assert!(!next_enrollment.blocked);
        assert_eq!(next_enrollment.progress_percentage, 0);
        assert!(!next_enrollment.completed);

        let seeded = UserChallengeStep::find()
            .filter(user_challenge_step::Column::UserId.eq(user.id))
            .filter(user_challenge_step::Column::StepId.eq(next_step.id))
            .one(&db)
            .await
            .unwrap()
            .expect("seeded step row");
        assert_eq!(seeded.state, StepState::NotStarted);
    }

    #[tokio::test]
    async fn same_state_update_is_a_noop() {
        let db = create_test_db().await;
        let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
        let challenge = create_test_challenge(&db, 1, "Reading odds").await;
        let step_a = create_test_step(&db, challenge.id).await;
        create_test_step(&db, challenge.id).await;
        enroll_user(&db, user.id, challenge.id).await;

        let first = update_step_state(&db, user.id, challenge.id, step_a.id, StepState::Done)
            .await
            .unwrap();
        assert!(matches!(first, StepUpdateOutcome::Updated { .. }));

        // Second identical update short-circuits; stored percentage unchanged
        let second = update_step_state(&db, user.id, challenge.id, step_a.id, StepState::Done)
            .await
            .unwrap();
        match second {
            StepUpdateOutcome::NoOp(row) => assert_eq!(row.state, StepState::Done),
            other => panic!("expected no-op, got {:?}", other),
        }

        let progress = UserChallenge::find()
            .filter(user_challenge::Column::UserId.eq(user.id))
            .filter(user_challenge::Column::ChallengeId.eq(challenge.id))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(progress.progress_percentage, 50);
    }

    #[tokio::test]
    async fn reverting_a_step_clears_completion() {
        let db = create_test_db().await;
        let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
        let challenge = create_test_challenge(&db, 1, "Reading odds").await;
        let step_a = create_test_step(&db, challenge.id).await;
        enroll_user(&db, user.id, challenge.id).await;

        update_step_state(&db, user.id, challenge.id, step_a.id, StepState::Done)
            .await
            .unwrap();
        let outcome =
            update_step_state(&db, user.id, challenge.id, step_a.id, StepState::NotStarted)
                .await
                .unwrap();
        match outcome {
            StepUpdateOutcome::Updated { progress, .. } => {
                assert_eq!(progress.progress_percentage, 0);
                assert!(!progress.completed);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unblock_on_highest_challenge_is_not_found() {
        let db = create_test_db().await;
        let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
        let only = create_test_challenge(&db, 1, "Reading odds").await;

        let result = unblock_next_challenge(&db, user.id, only.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn unblock_clears_flag_on_preseeded_enrollment() {
        let db = create_test_db().await;
        let user = create_test_user(&db, "Lia", "lia@example.com", "password123").await;
        let first = create_test_challenge(&db, 1, "Reading odds").await;
        let second = create_test_challenge(&db, 2, "Value betting").await;

        // Pre-seed a blocked enrollment for challenge #2
        let blocked = user_challenge::ActiveModel {
            user_id: Set(user.id),
            challenge_id: Set(second.id),
            progress_percentage: Set(0),
            completed: Set(false),
            blocked: Set(true),
            detail_seen: Set(false),
            ..Default::default()
        };
        blocked.insert(&db).await.unwrap();

        let unblocked = unblock_next_challenge(&db, user.id, first.id).await.unwrap();
        assert!(!unblocked.blocked);

        // Still a single row for the pair
        let count = UserChallenge::find()
            .filter(user_challenge::Column::UserId.eq(user.id))
            .filter(user_challenge::Column::ChallengeId.eq(second.id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
