use crate::models::ExclusionSnapshot;
use std::collections::HashSet;

/// Build the exclusion set for a user's candidate pool
///
/// Contains the user themselves, every id they have already swiped (either
/// decision), every id they are matched with, and every id blocked in either
/// direction. The snapshot is read once per ranking request so a match or
/// block landing mid-request cannot leak a candidate back in.
pub fn excluded_ids(user_id: &str, snapshot: &ExclusionSnapshot) -> HashSet<String> {
    let mut excluded = HashSet::with_capacity(
        1 + snapshot.swiped.len() + snapshot.matched.len() + snapshot.blocked.len(),
    );
    excluded.insert(user_id.to_string());
    excluded.extend(snapshot.swiped.iter().cloned());
    excluded.extend(snapshot.matched.iter().cloned());
    excluded.extend(snapshot.blocked.iter().cloned());
    excluded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_excluded_ids_always_contains_self() {
        let excluded = excluded_ids("alice", &ExclusionSnapshot::default());
        assert_eq!(excluded, ids(&["alice"]));
    }

    #[test]
    fn test_excluded_ids_unions_all_sources() {
        let snapshot = ExclusionSnapshot {
            swiped: ids(&["bob", "carol"]),
            matched: ids(&["dave"]),
            blocked: ids(&["eve", "bob"]),
        };

        let excluded = excluded_ids("alice", &snapshot);
        assert_eq!(excluded, ids(&["alice", "bob", "carol", "dave", "eve"]));
    }
}
