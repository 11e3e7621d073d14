//! Admin review of a dispatcher application.
//!
//! ```text
//! [none] --apply--> pending --(passes checks)--> approved (terminal)
//!                   pending --(fails checks)---> [deleted]
//!                   approved --(review again)--> approved (no-op)
//! ```

use courierds_models::{ApplicationStatus, DispatcherApplication};

pub const PLATE_NUMBER_LEN: usize = 8;
pub const DRIVER_LICENSE_LEN: usize = 12;
pub const MIN_VEHICLE_YEAR: i32 = 2008;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Already approved; nothing changes.
    AlreadyApproved,
    /// Delete the application.
    Reject,
    /// Promote the applicant.
    Approve,
}

/// Checks run in a fixed order: an approved application short-circuits
/// before any field is looked at. Lengths are byte lengths.
pub fn review_application(application: &DispatcherApplication) -> ReviewDecision {
    if application.status == ApplicationStatus::Approved {
        return ReviewDecision::AlreadyApproved;
    }

    let reject = application.status != ApplicationStatus::Pending
        || application.vehicle_plate_number.len() != PLATE_NUMBER_LEN
        || application.driver_license.len() != DRIVER_LICENSE_LEN
        || application.vehicle_year < MIN_VEHICLE_YEAR;

    if reject {
        ReviewDecision::Reject
    } else {
        ReviewDecision::Approve
    }
}
