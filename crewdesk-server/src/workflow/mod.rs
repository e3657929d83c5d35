//! Job workflow rules.
//!
//! The normal path is Pending -> InProgress -> Submitted -> Verified.
//! Employees walk exactly the first two steps, and only on jobs
//! assigned to them; Verified is out of their reach entirely. Anyone
//! holding the verify capability may move any job to any status,
//! including reopening a Verified job.
//!
//! Everything here is pure; callers fetch the job, check, then write.

use shared::models::{Job, JobStatus};
use shared::{AppError, ErrorCode};

use crate::server::auth::{Capability, CurrentUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Employee touched a job assigned to someone else (or nobody).
    #[error("job is assigned to a different user")]
    NotAssignee,
    /// The requested move is not in the actor's transition table.
    #[error("cannot move job from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::NotAssignee => AppError::new(ErrorCode::NotAssignee),
            WorkflowError::InvalidTransition { from, to } => {
                AppError::new(ErrorCode::InvalidTransition)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
        }
    }
}

/// Decide whether `actor` may move `job` to `to`.
///
/// Ownership is checked before the transition table: an employee
/// poking at someone else's job always gets NotAssignee, even when the
/// requested move would otherwise be legal.
pub fn check_transition(actor: &CurrentUser, job: &Job, to: JobStatus) -> Result<(), WorkflowError> {
    if actor.can(Capability::VerifyJobs) {
        return Ok(());
    }

    if job.assigned_to != Some(actor.id) {
        return Err(WorkflowError::NotAssignee);
    }

    match (job.status, to) {
        (JobStatus::Pending, JobStatus::InProgress)
        | (JobStatus::InProgress, JobStatus::Submitted) => Ok(()),
        (from, to) => Err(WorkflowError::InvalidTransition { from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    const ALL_STATUSES: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::InProgress,
        JobStatus::Submitted,
        JobStatus::Verified,
    ];

    fn actor(id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            username: format!("user{id}"),
            role,
        }
    }

    fn job(status: JobStatus, assigned_to: Option<i64>) -> Job {
        Job {
            id: 900,
            title: "Restock".to_string(),
            description: String::new(),
            status,
            assigned_to,
            created_by: Some(1),
            due_date: None,
            completed_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_employee_may_start_own_pending_job() {
        let worker = actor(7, Role::Employee);
        let result = check_transition(&worker, &job(JobStatus::Pending, Some(7)), JobStatus::InProgress);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_employee_may_submit_own_started_job() {
        let worker = actor(7, Role::Employee);
        let result =
            check_transition(&worker, &job(JobStatus::InProgress, Some(7)), JobStatus::Submitted);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_employee_may_not_skip_to_submitted() {
        let worker = actor(7, Role::Employee);
        let result = check_transition(&worker, &job(JobStatus::Pending, Some(7)), JobStatus::Submitted);
        assert_eq!(
            result,
            Err(WorkflowError::InvalidTransition {
                from: JobStatus::Pending,
                to: JobStatus::Submitted,
            })
        );
    }

    #[test]
    fn test_employee_may_never_verify() {
        let worker = actor(7, Role::Employee);
        for from in ALL_STATUSES {
            let result = check_transition(&worker, &job(from, Some(7)), JobStatus::Verified);
            assert_eq!(
                result,
                Err(WorkflowError::InvalidTransition {
                    from,
                    to: JobStatus::Verified,
                }),
                "verify must be refused from {from}"
            );
        }
    }

    #[test]
    fn test_employee_may_not_move_backward() {
        let worker = actor(7, Role::Employee);
        let result =
            check_transition(&worker, &job(JobStatus::Submitted, Some(7)), JobStatus::InProgress);
        assert!(matches!(result, Err(WorkflowError::InvalidTransition { .. })));
    }

    #[test]
    fn test_employee_no_op_move_is_invalid() {
        let worker = actor(7, Role::Employee);
        let result = check_transition(&worker, &job(JobStatus::Pending, Some(7)), JobStatus::Pending);
        assert!(matches!(result, Err(WorkflowError::InvalidTransition { .. })));
    }

    #[test]
    fn test_employee_full_table() {
        // Exactly two cells of the 4x4 matrix are open to an assignee.
        let worker = actor(7, Role::Employee);
        let mut allowed = Vec::new();
        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                if check_transition(&worker, &job(from, Some(7)), to).is_ok() {
                    allowed.push((from, to));
                }
            }
        }
        assert_eq!(
            allowed,
            vec![
                (JobStatus::Pending, JobStatus::InProgress),
                (JobStatus::InProgress, JobStatus::Submitted),
            ]
        );
    }

    #[test]
    fn test_ownership_is_checked_before_the_table() {
        let worker = actor(7, Role::Employee);
        // Legal pair, wrong assignee
        let result = check_transition(&worker, &job(JobStatus::Pending, Some(8)), JobStatus::InProgress);
        assert_eq!(result, Err(WorkflowError::NotAssignee));
        // Illegal pair, wrong assignee still reports ownership
        let result = check_transition(&worker, &job(JobStatus::Pending, Some(8)), JobStatus::Verified);
        assert_eq!(result, Err(WorkflowError::NotAssignee));
    }

    #[test]
    fn test_unassigned_job_is_not_the_employees() {
        let worker = actor(7, Role::Employee);
        let result = check_transition(&worker, &job(JobStatus::Pending, None), JobStatus::InProgress);
        assert_eq!(result, Err(WorkflowError::NotAssignee));
    }

    #[test]
    fn test_staff_move_anything_anywhere() {
        for role in [Role::Supervisor, Role::Admin] {
            let staff = actor(1, role);
            for from in ALL_STATUSES {
                for to in ALL_STATUSES {
                    // Including jobs assigned to other people and reopening
                    let result = check_transition(&staff, &job(from, Some(99)), to);
                    assert_eq!(result, Ok(()), "{role} {from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn test_supervisor_can_reopen_verified() {
        let supervisor = actor(1, Role::Supervisor);
        let result =
            check_transition(&supervisor, &job(JobStatus::Verified, Some(7)), JobStatus::Pending);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_app_error_carries_transition_details() {
        let err: AppError = WorkflowError::InvalidTransition {
            from: JobStatus::Submitted,
            to: JobStatus::Pending,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        let details = err.details.expect("transition details");
        assert_eq!(details["from"], "SUBMITTED");
        assert_eq!(details["to"], "PENDING");
    }

    #[test]
    fn test_not_assignee_maps_to_its_code() {
        let err: AppError = WorkflowError::NotAssignee.into();
        assert_eq!(err.code, ErrorCode::NotAssignee);
    }
}
