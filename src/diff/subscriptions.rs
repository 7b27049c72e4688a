use crate::catalog::subscription::Subscription;
use crate::diff::operations::{MigrationStep, SubscriptionOperation};
use tracing::warn;

/// Diff a single subscription. Subscriptions can't be created declaratively because the
/// connection string (which carries credentials) is never fetched into the catalog; a
/// subscription present only in the desired state is reported and skipped.
pub fn diff(old: Option<&Subscription>, new: Option<&Subscription>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_s)) => {
            warn!(
                "Subscription \"{}\" exists only in the desired state; CREATE SUBSCRIPTION requires a connection string this tool does not manage, so it must be created manually",
                new_s.name
            );
            vec![]
        }
        (Some(old_s), None) => vec![MigrationStep::Subscription(SubscriptionOperation::Drop {
            name: old_s.name.clone(),
        })],
        (Some(old_s), Some(new_s)) => {
            let mut steps = Vec::new();
            if old_s.owner != new_s.owner {
                steps.push(MigrationStep::Subscription(
                    SubscriptionOperation::AlterOwner {
                        name: new_s.name.clone(),
                        owner: new_s.owner.clone(),
                    },
                ));
            }
            if old_s.enabled != new_s.enabled {
                steps.push(MigrationStep::Subscription(
                    SubscriptionOperation::AlterEnabled {
                        name: new_s.name.clone(),
                        enabled: new_s.enabled,
                    },
                ));
            }
            if old_s.publications != new_s.publications {
                steps.push(MigrationStep::Subscription(
                    SubscriptionOperation::SetPublications {
                        name: new_s.name.clone(),
                        publications: new_s.publications.clone(),
                    },
                ));
            }
            steps
        }
        (None, None) => vec![],
    }
}
