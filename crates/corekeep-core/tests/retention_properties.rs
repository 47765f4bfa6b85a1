//! Property-based tests for the retention engine and dump naming.
//!
//! Verifies invariants across arbitrary dump directory populations:
//! - Plans partition the matched names into survivors and evictions
//! - Survivor counts follow the quota, survivors outrank evictions
//! - Enforcement converges to the quota and never touches other files
//! - Generated names are always retention candidates
//! - Config validation accepts exactly the documented shapes

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use corekeep_core::config::HandlerConfig;
use corekeep_core::naming::{DUMP_PREFIX, dump_file_name};
use corekeep_core::retention::{enforce_retention, plan_retention};

// =============================================================================
// Proptest strategies
// =============================================================================

/// Generate a dump-shaped file name with arbitrary numeric fields.
fn arb_dump_name() -> impl Strategy<Value = String> {
    (
        1970u32..=9999,
        0u32..=11,
        1u32..=31,
        0u64..=99_999_999_999,
        "[a-z]{1,8}",
    )
        .prop_map(|(year, month, day, epoch, exe)| {
            format!("{DUMP_PREFIX}{year}-{month}-{day}_{epoch}.{exe}")
        })
}

/// Generate a file name that is never a retention candidate.
fn arb_other_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._-]{1,24}".prop_filter("must not carry the dump prefix", |name| {
        !name.starts_with(DUMP_PREFIX) && name != "." && name != ".."
    })
}

/// Generate a unique population of dump names.
fn arb_population() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(arb_dump_name(), 0..40).prop_map(|set| set.into_iter().collect())
}

fn touch_all(dir: &Path, names: &[String]) {
    for name in names {
        File::create(dir.join(name)).unwrap();
    }
}

// =============================================================================
// 1. Plans partition the matched set
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn plan_partitions_the_population(names in arb_population(), quota in 1usize..=50) {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &names);

        let plan = plan_retention(tmp.path(), quota).unwrap();

        let survivors: HashSet<_> = plan.survivors.iter().cloned().collect();
        let evictions: HashSet<_> = plan.evictions.iter().cloned().collect();
        let expected: HashSet<_> = names.iter().cloned().collect();

        prop_assert!(survivors.is_disjoint(&evictions), "a name must not appear on both sides");
        let union: HashSet<_> = survivors.union(&evictions).cloned().collect();
        prop_assert_eq!(union, expected, "plan must cover exactly the matched names");
    }
}

// =============================================================================
// 2. Survivor count follows the quota
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn survivor_count_is_min_of_population_and_quota(
        names in arb_population(),
        quota in 1usize..=50,
    ) {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &names);

        let plan = plan_retention(tmp.path(), quota).unwrap();
        prop_assert_eq!(
            plan.survivors.len(),
            names.len().min(quota),
            "survivors must be min(population, quota)"
        );
        prop_assert_eq!(
            plan.evictions.len(),
            names.len().saturating_sub(quota),
            "evictions must be the remainder"
        );
    }
}

// =============================================================================
// 3. Survivors outrank evictions
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_survivor_outranks_every_eviction(
        names in arb_population(),
        quota in 1usize..=10,
    ) {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &names);

        let plan = plan_retention(tmp.path(), quota).unwrap();
        if let (Some(lowest_survivor), Some(highest_eviction)) =
            (plan.survivors.last(), plan.evictions.first())
        {
            prop_assert!(
                lowest_survivor.as_str() > highest_eviction.as_str(),
                "lowest survivor {} must outrank highest eviction {}",
                lowest_survivor,
                highest_eviction
            );
        }
    }
}

// =============================================================================
// 4. Plans are deterministic
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn plans_are_deterministic(names in arb_population(), quota in 1usize..=20) {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &names);

        let first = plan_retention(tmp.path(), quota).unwrap();
        let second = plan_retention(tmp.path(), quota).unwrap();
        prop_assert_eq!(first.survivors, second.survivors);
        prop_assert_eq!(first.evictions, second.evictions);
    }
}

// =============================================================================
// 5. Enforcement converges and leaves other files alone
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn enforcement_converges_to_the_quota(
        names in arb_population(),
        others in prop::collection::hash_set(arb_other_name(), 0..10),
        quota in 1usize..=10,
    ) {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &names);
        for name in &others {
            File::create(tmp.path().join(name)).unwrap();
        }

        let report = enforce_retention(tmp.path(), quota).unwrap();
        prop_assert!(report.failure.is_none());
        prop_assert_eq!(
            report.deleted,
            names.len().saturating_sub(quota),
            "one pass deletes everything over quota"
        );

        let after = plan_retention(tmp.path(), usize::MAX).unwrap();
        prop_assert_eq!(after.scanned(), names.len().min(quota));

        for name in &others {
            prop_assert!(
                tmp.path().join(name).exists(),
                "non-matching file {} must survive",
                name
            );
        }
    }
}

// =============================================================================
// 6. Enforcement is idempotent
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn second_enforcement_deletes_nothing(names in arb_population(), quota in 1usize..=10) {
        let tmp = TempDir::new().unwrap();
        touch_all(tmp.path(), &names);

        enforce_retention(tmp.path(), quota).unwrap();
        let second = enforce_retention(tmp.path(), quota).unwrap();
        prop_assert_eq!(second.deleted, 0, "a converged directory has nothing to delete");
    }
}

// =============================================================================
// 7. Generated names are retention candidates
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generated_names_are_candidates(exe in "[a-zA-Z0-9_-]{1,16}") {
        let name = dump_file_name(Some(&exe));
        prop_assert!(name.starts_with(DUMP_PREFIX), "name {} must carry the prefix", name);
        prop_assert!(name.ends_with(&format!(".{exe}")), "name {} must carry the suffix", name);
    }
}

// =============================================================================
// 8. Config validation
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn nonzero_quota_with_an_executable_validates(
        exe in "[a-z]{1,12}",
        max_dumps in 1usize..=1_000_000,
    ) {
        let config = HandlerConfig {
            exe_name: exe,
            max_dumps,
            ..Default::default()
        };
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_quota_never_validates(exe in "[a-z]{1,12}") {
        let config = HandlerConfig {
            exe_name: exe,
            max_dumps: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        prop_assert!(err.contains("max_dumps"), "message was: {}", err);
    }
}
