use std::fmt;

use sha2::{Digest, Sha256};

use lark_model::RecordRule;

/// Content hash identifying a running evaluation task.
///
/// Derived from the rule fields a task bakes in at start time: `id`,
/// `metric`, `query` and `eval_interval_secs`. Append tags are not part of
/// the identity, so a tags-only edit does not restart the task and the old
/// tags keep being stamped until another identity field changes.
///
/// Identity, not rule id, keys the running-task set: a content change under
/// the same id tears the old task down and starts a new one, which keeps a
/// task's parameters immutable for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerIdentity(String);

impl WorkerIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the identity of a rule snapshot.
///
/// Pure function: equal inputs always yield equal identities.
pub fn worker_identity(rule: &RecordRule) -> WorkerIdentity {
    let digest = Sha256::digest(format!(
        "{}_{}_{}_{}",
        rule.id, rule.metric, rule.query, rule.eval_interval_secs,
    ));
    WorkerIdentity(format!("{digest:x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> RecordRule {
        RecordRule {
            id: 1,
            cluster: "default".to_string(),
            note: String::new(),
            metric: "cpu_used".to_string(),
            query: "up".to_string(),
            eval_interval_secs: 15,
            append_tags: String::new(),
            disabled: false,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn equal_inputs_yield_equal_identity() {
        assert_eq!(worker_identity(&rule()), worker_identity(&rule()));
    }

    #[test]
    fn each_identity_field_changes_the_hash() {
        let base = worker_identity(&rule());

        let mut r = rule();
        r.id = 2;
        assert_ne!(worker_identity(&r), base);

        let mut r = rule();
        r.metric = "mem_used".to_string();
        assert_ne!(worker_identity(&r), base);

        let mut r = rule();
        r.query = "up == 1".to_string();
        assert_ne!(worker_identity(&r), base);

        let mut r = rule();
        r.eval_interval_secs = 30;
        assert_ne!(worker_identity(&r), base);
    }

    #[test]
    fn non_identity_fields_do_not_change_the_hash() {
        let base = worker_identity(&rule());

        let mut r = rule();
        r.append_tags = "region=us".to_string();
        r.note = "edited".to_string();
        r.updated_at = 99;
        assert_eq!(worker_identity(&r), base);
    }
}
