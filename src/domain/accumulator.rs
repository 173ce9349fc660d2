use std::collections::BTreeMap;

use crate::domain::{Database, ExtensionVersion, Requirement, SdkLevel, SdkModule};

/// Computes the full set of requirements for a new extension SDK level.
///
/// Every module mentioned anywhere in the database keeps the value recorded
/// by the highest-numbered version that mentions it. The `advanced` modules
/// are then raised to `new_version`. Versions are visited in numeric order,
/// never in storage order, and a later mention always overwrites an earlier
/// one, even if it records a lower value.
///
/// Duplicates in `advanced` collapse to one requirement. An empty `advanced`
/// list yields a snapshot of the carried-forward requirements.
///
/// The returned requirements are sorted by module code. The database is not
/// modified.
#[must_use]
pub fn compute_new_version(
    database: &Database,
    new_version: SdkLevel,
    advanced: &[SdkModule],
) -> ExtensionVersion {
    let mut history: Vec<&ExtensionVersion> = database.versions().iter().collect();
    history.sort_by_key(|version| version.version);

    let mut carried: BTreeMap<SdkModule, SdkLevel> = BTreeMap::new();
    for version in history {
        for requirement in &version.requirements {
            carried.insert(requirement.module, requirement.version);
        }
    }

    for &module in advanced {
        carried.insert(module, new_version);
    }

    let requirements = carried
        .into_iter()
        .map(|(module, version)| Requirement::new(module, version))
        .collect();

    ExtensionVersion::new(new_version, requirements)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    const A: SdkModule = SdkModule::Ipsec;
    const B: SdkModule = SdkModule::Media;
    const C: SdkModule = SdkModule::Tethering;

    fn level(value: i32) -> SdkLevel {
        SdkLevel::new(value).unwrap()
    }

    fn version(number: i32, requirements: &[(SdkModule, i32)]) -> ExtensionVersion {
        ExtensionVersion::new(
            level(number),
            requirements
                .iter()
                .map(|&(module, v)| Requirement::new(module, level(v)))
                .collect(),
        )
    }

    fn two_versions() -> Database {
        Database::new(vec![
            version(1, &[(A, 1), (B, 1)]),
            version(2, &[(A, 2)]),
        ])
    }

    #[test]
    fn advanced_module_overrides_carried_value() {
        let result = compute_new_version(&two_versions(), level(3), &[B]);
        assert_eq!(result, version(3, &[(A, 2), (B, 3)]));
    }

    #[test]
    fn empty_advance_is_a_snapshot() {
        let result = compute_new_version(&two_versions(), level(3), &[]);
        assert_eq!(result, version(3, &[(A, 2), (B, 1)]));
    }

    #[test]
    fn storage_order_does_not_matter() {
        let forward = two_versions();
        let reversed = Database::new(forward.versions().iter().rev().cloned().collect());

        assert_eq!(
            compute_new_version(&forward, level(3), &[C]),
            compute_new_version(&reversed, level(3), &[C]),
        );
    }

    #[test]
    fn every_permutation_gives_the_same_result() {
        let versions = [
            version(1, &[(A, 1), (B, 1)]),
            version(4, &[(B, 4)]),
            version(2, &[(A, 2), (C, 2)]),
        ];
        let expected = version(5, &[(A, 2), (B, 4), (C, 5)]);

        let permutations = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in permutations {
            let db = Database::new(order.iter().map(|&i| versions[i].clone()).collect());
            assert_eq!(compute_new_version(&db, level(5), &[C]), expected);
        }
    }

    #[test]
    fn last_mention_wins_over_maximum_value() {
        let db = Database::new(vec![version(2, &[(A, 2)]), version(1, &[(A, 5)])]);
        let result = compute_new_version(&db, level(3), &[]);
        assert_eq!(result.requirement(A), Some(level(2)));
    }

    #[test]
    fn duplicate_advanced_modules_collapse() {
        let result = compute_new_version(&two_versions(), level(3), &[B, A, B]);
        assert_eq!(result, version(3, &[(A, 3), (B, 3)]));
    }

    #[test]
    fn new_module_is_added() {
        let result = compute_new_version(&two_versions(), level(3), &[C]);
        assert_eq!(result, version(3, &[(A, 2), (B, 1), (C, 3)]));
    }

    #[test]
    fn result_covers_referenced_and_advanced_modules() {
        let db = two_versions();
        let advanced = [C, SdkModule::Art];
        let result = compute_new_version(&db, level(9), &advanced);

        let mut expected = db.modules_referenced();
        expected.extend(advanced);
        let actual: BTreeSet<_> = result.requirements.iter().map(|r| r.module).collect();

        assert_eq!(actual, expected);
        assert_eq!(result.requirements.len(), expected.len());
    }

    #[test]
    fn advanced_modules_get_the_new_level_regardless_of_history() {
        let db = Database::new(vec![version(10, &[(A, 10)])]);
        let result = compute_new_version(&db, level(4), &[A]);
        assert_eq!(result.requirement(A), Some(level(4)));
    }

    #[test]
    fn empty_database() {
        let result = compute_new_version(&Database::default(), level(1), &[B, A]);
        assert_eq!(result, version(1, &[(A, 1), (B, 1)]));
    }

    #[test]
    fn database_is_not_modified() {
        let db = two_versions();
        let before = db.clone();
        let _ = compute_new_version(&db, level(3), &[B]);
        assert_eq!(db, before);
    }
}
