//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{
        folder_chain, normalize_key, normalize_lexically, resolve_relative, windows_relative,
    };
    use proptest::prelude::*;
    use std::path::PathBuf;

    /// Path segments that are plain names: never `.`, `..`, or empty.
    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9_]{0,8}"
    }

    fn segments(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(segment(), 1..max)
    }

    // ============================================================================
    // normalize_key property tests
    // ============================================================================

    proptest! {
        /// Property: keys are identical regardless of input casing
        #[test]
        fn normalize_key_ignores_case(segs in segments(5)) {
            let lower = PathBuf::from(format!("/{}", segs.join("/").to_lowercase()));
            let upper = PathBuf::from(format!("/{}", segs.join("/").to_uppercase()));
            prop_assert_eq!(normalize_key(&lower), normalize_key(&upper));
        }

        /// Property: keys never contain a backslash
        #[test]
        fn normalize_key_strips_backslashes(segs in segments(5)) {
            let windows_style = PathBuf::from(segs.join("\\"));
            let key = normalize_key(&windows_style);
            prop_assert!(!key.contains('\\'), "key '{}' retained a backslash", key);
        }

        /// Property: normalize_key is deterministic
        #[test]
        fn normalize_key_is_deterministic(segs in segments(5)) {
            let path = PathBuf::from(format!("/{}", segs.join("/")));
            prop_assert_eq!(normalize_key(&path), normalize_key(&path));
        }
    }

    // ============================================================================
    // normalize_lexically property tests
    // ============================================================================

    proptest! {
        /// Property: normalization is idempotent
        #[test]
        fn normalize_lexically_is_idempotent(segs in segments(6)) {
            let path = PathBuf::from(format!("/{}", segs.join("/")));
            let once = normalize_lexically(&path);
            let twice = normalize_lexically(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: an absolute input never normalizes to a path containing `..`
        #[test]
        fn normalize_lexically_absolute_has_no_parent_components(
            segs in segments(4),
            parents in 0usize..6,
        ) {
            let mut raw = String::from("/");
            raw.push_str(&segs.join("/"));
            for _ in 0..parents {
                raw.push_str("/..");
            }
            let normalized = normalize_lexically(&PathBuf::from(raw));
            let has_parent = normalized
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir));
            prop_assert!(!has_parent, "normalized path {:?} kept a '..'", normalized);
        }
    }

    // ============================================================================
    // resolve_relative / windows_relative property tests
    // ============================================================================

    proptest! {
        /// Property: resolving against an absolute base yields an absolute path
        #[test]
        fn resolve_relative_stays_absolute(
            base in segments(4),
            include in segments(4),
        ) {
            let base_dir = PathBuf::from(format!("/{}", base.join("/")));
            let resolved = resolve_relative(&base_dir, &include.join("\\"));
            prop_assert!(resolved.is_absolute());
        }

        /// Property: joining the relative rendering back onto the base recovers
        /// the target, up to case (component comparison is case-insensitive)
        #[test]
        fn windows_relative_round_trips(
            shared in segments(3),
            base_tail in segments(3),
            target_tail in segments(3),
        ) {
            let root = PathBuf::from(format!("/{}", shared.join("/")));
            let base_dir = root.join(base_tail.join("/"));
            let target = root.join(target_tail.join("/")).join("Proj.csproj");

            let rel = windows_relative(&target, &base_dir);
            let rejoined = normalize_lexically(&base_dir.join(rel.replace('\\', "/")));
            prop_assert_eq!(
                normalize_key(&rejoined),
                normalize_key(&normalize_lexically(&target))
            );
        }

        /// Property: the rendering uses backslashes only and no `.\` prefix
        #[test]
        fn windows_relative_shape(
            base in segments(4),
            tail in segments(3),
        ) {
            let base_dir = PathBuf::from(format!("/{}", base.join("/")));
            let target = base_dir.join(tail.join("/")).join("Proj.csproj");
            let rel = windows_relative(&target, &base_dir);
            prop_assert!(!rel.contains('/'), "rendering '{}' contains a forward slash", rel);
            prop_assert!(!rel.starts_with(".\\"), "rendering '{}' starts with .\\", rel);
        }
    }

    // ============================================================================
    // folder_chain property tests
    // ============================================================================

    proptest! {
        /// Property: the chain reproduces exactly the directories between the
        /// root and the manifest
        #[test]
        fn folder_chain_matches_intermediate_directories(
            root_segs in segments(3),
            chain_segs in segments(4),
        ) {
            let root = PathBuf::from(format!("/{}", root_segs.join("/")));
            let manifest = root.join(chain_segs.join("/")).join("Proj.csproj");
            let chain = folder_chain(&root, &manifest);
            prop_assert_eq!(chain, Some(chain_segs));
        }

        /// Property: a manifest outside the root never yields a chain
        #[test]
        fn folder_chain_rejects_foreign_roots(
            root_segs in segments(3),
            other_segs in segments(3),
        ) {
            prop_assume!(root_segs[0].to_lowercase() != other_segs[0].to_lowercase());
            let root = PathBuf::from(format!("/{}", root_segs.join("/")));
            let manifest = PathBuf::from(format!("/{}", other_segs.join("/"))).join("P.csproj");
            prop_assert_eq!(folder_chain(&root, &manifest), None);
        }
    }
}
