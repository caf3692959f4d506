//! Group membership filtering.

use shared::Group;

/// Keep the groups whose assigned-student list contains `match_email`.
///
/// Groups without an assigned-student list are excluded, not treated as an
/// error. Matching deliberately uses the actor's own email even when the
/// view is showing a child's records; the school backend enrolls the parent
/// account's email in the group, and child-email matching has never been
/// wired up upstream.
pub fn enrolled_groups(groups: &[Group], match_email: &str) -> Vec<Group> {
    groups
        .iter()
        .filter(|group| {
            group
                .students_assigned
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|student| student.email.as_deref() == Some(match_email))
        })
        .cloned()
        .collect()
}
