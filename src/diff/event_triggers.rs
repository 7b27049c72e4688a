use crate::catalog::event_trigger::EventTrigger;
use crate::diff::operations::{EventTriggerOperation, MigrationStep};

/// Diff a single event trigger
pub fn diff(old: Option<&EventTrigger>, new: Option<&EventTrigger>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_t)) => vec![MigrationStep::EventTrigger(EventTriggerOperation::Create {
            trigger: Box::new(new_t.clone()),
        })],
        (Some(old_t), None) => vec![MigrationStep::EventTrigger(EventTriggerOperation::Drop {
            name: old_t.name.clone(),
        })],
        (Some(old_t), Some(new_t)) => {
            let mut steps = Vec::new();
            if old_t.owner != new_t.owner {
                steps.push(MigrationStep::EventTrigger(
                    EventTriggerOperation::AlterOwner {
                        name: new_t.name.clone(),
                        owner: new_t.owner.clone(),
                    },
                ));
            }
            if old_t.enabled != new_t.enabled {
                steps.push(MigrationStep::EventTrigger(
                    EventTriggerOperation::AlterEnabled {
                        name: new_t.name.clone(),
                        enabled: new_t.enabled.clone(),
                    },
                ));
            }
            steps
        }
        (None, None) => vec![],
    }
}
