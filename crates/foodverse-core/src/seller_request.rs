//! Seller application rules: who may apply, what may be reviewed, and the
//! admin console's search and tally.

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellerRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl SellerRequestStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SellerRequestStatus::Pending => "pending",
            SellerRequestStatus::Approved => "approved",
            SellerRequestStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for SellerRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SellerRequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(SellerRequestStatus::Pending),
            "approved" => Ok(SellerRequestStatus::Approved),
            "rejected" => Ok(SellerRequestStatus::Rejected),
            _ => Err(CoreError::InvalidSellerRequestStatus(s.to_string())),
        }
    }
}

/// An admin's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    #[must_use]
    pub fn status(self) -> SellerRequestStatus {
        match self {
            ReviewDecision::Approve => SellerRequestStatus::Approved,
            ReviewDecision::Reject => SellerRequestStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("seller request is already {0}")]
    AlreadyReviewed(SellerRequestStatus),

    #[error("a rejection must include admin comments")]
    MissingComments,
}

/// Checks that a request in `current` status may receive `decision`.
///
/// # Errors
///
/// - [`ReviewError::AlreadyReviewed`] unless the request is still pending.
/// - [`ReviewError::MissingComments`] when rejecting without an explanation.
pub fn review_allowed(
    current: SellerRequestStatus,
    decision: ReviewDecision,
    comments: &str,
) -> Result<(), ReviewError> {
    if current != SellerRequestStatus::Pending {
        return Err(ReviewError::AlreadyReviewed(current));
    }
    if decision == ReviewDecision::Reject && comments.trim().is_empty() {
        return Err(ReviewError::MissingComments);
    }
    Ok(())
}

/// A user may apply when they have no request or their last one was rejected.
#[must_use]
pub fn can_submit(existing: Option<SellerRequestStatus>) -> bool {
    matches!(existing, None | Some(SellerRequestStatus::Rejected))
}

/// The fields the admin console searches over.
pub trait SellerRequestFields {
    fn status(&self) -> SellerRequestStatus;
    fn searchable_fields(&self) -> [&str; 5];
}

/// Case-insensitive substring match over applicant name, email, id number,
/// location and reason. An empty query matches everything.
pub fn matches_query<R: SellerRequestFields>(request: &R, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    request
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestTally {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total: usize,
}

#[must_use]
pub fn tally<R: SellerRequestFields>(requests: &[R]) -> RequestTally {
    requests.iter().fold(RequestTally::default(), |mut acc, r| {
        match r.status() {
            SellerRequestStatus::Pending => acc.pending += 1,
            SellerRequestStatus::Approved => acc.approved += 1,
            SellerRequestStatus::Rejected => acc.rejected += 1,
        }
        acc.total += 1;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Req {
        status: SellerRequestStatus,
        fields: [&'static str; 5],
    }

    impl SellerRequestFields for Req {
        fn status(&self) -> SellerRequestStatus {
            self.status
        }

        fn searchable_fields(&self) -> [&str; 5] {
            self.fields
        }
    }

    fn req(status: SellerRequestStatus, name: &'static str, location: &'static str) -> Req {
        Req {
            status,
            fields: [name, "someone@example.com", "3171000000000001", location, "Open a bakery"],
        }
    }

    #[test]
    fn review_allowed_only_for_pending() {
        assert!(review_allowed(SellerRequestStatus::Pending, ReviewDecision::Approve, "").is_ok());
        assert_eq!(
            review_allowed(SellerRequestStatus::Approved, ReviewDecision::Reject, "late"),
            Err(ReviewError::AlreadyReviewed(SellerRequestStatus::Approved))
        );
    }

    #[test]
    fn rejection_requires_comments() {
        assert_eq!(
            review_allowed(SellerRequestStatus::Pending, ReviewDecision::Reject, "  "),
            Err(ReviewError::MissingComments)
        );
        assert!(
            review_allowed(SellerRequestStatus::Pending, ReviewDecision::Reject, "blurry photo")
                .is_ok()
        );
    }

    #[test]
    fn can_submit_blocks_pending_and_approved() {
        assert!(can_submit(None));
        assert!(can_submit(Some(SellerRequestStatus::Rejected)));
        assert!(!can_submit(Some(SellerRequestStatus::Pending)));
        assert!(!can_submit(Some(SellerRequestStatus::Approved)));
    }

    #[test]
    fn matches_query_searches_all_fields() {
        let r = req(SellerRequestStatus::Pending, "Siti Rahma", "Jakarta Selatan");
        assert!(matches_query(&r, ""));
        assert!(matches_query(&r, "siti"));
        assert!(matches_query(&r, "SELATAN"));
        assert!(matches_query(&r, "example.com"));
        assert!(matches_query(&r, "bakery"));
        assert!(!matches_query(&r, "surabaya"));
    }

    #[test]
    fn tally_counts_each_status() {
        let requests = vec![
            req(SellerRequestStatus::Pending, "A", "X"),
            req(SellerRequestStatus::Pending, "B", "X"),
            req(SellerRequestStatus::Approved, "C", "X"),
            req(SellerRequestStatus::Rejected, "D", "X"),
        ];
        assert_eq!(
            tally(&requests),
            RequestTally {
                pending: 2,
                approved: 1,
                rejected: 1,
                total: 4
            }
        );
    }

    #[test]
    fn decision_maps_to_status() {
        assert_eq!(ReviewDecision::Approve.status(), SellerRequestStatus::Approved);
        assert_eq!(ReviewDecision::Reject.status(), SellerRequestStatus::Rejected);
    }
}
