use std::path::{Component, Path};

use pathward::sanitize;
use proptest::prelude::*;

const DISALLOWED: &[char] = &[':', '$', '!', '\'', '"', '@', '+', '`', '|', '='];

/// Path-ish text built from the pieces attacks are made of.
fn hostile_path() -> impl Strategy<Value = String> {
    let marker = prop::sample::select(vec![
        "..", ".", "/", "\\", "%2e", "%2f", "%5c", "%2", "e", "=", ":",
    ])
    .prop_map(str::to_string);
    let piece = prop_oneof![
        3 => marker,
        2 => "[a-z0-9]{1,4}",
        1 => "[:$!'\"@+`|=]",
    ];
    prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
}

fn any_path() -> impl Strategy<Value = String> {
    prop_oneof![hostile_path(), any::<String>()]
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(input in any_path()) {
        let once = sanitize(&input);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn no_traversal_or_backslash_survives(input in any_path()) {
        let output = sanitize(&input);
        prop_assert!(!output.contains('\\'), "backslash in {:?}", output);
        prop_assert!(
            !output.split('/').any(|segment| segment == ".."),
            "traversal in {:?} from {:?}",
            output,
            input
        );
        let bounded = format!("/{}/", output);
        prop_assert!(!bounded.contains("/../"), "traversal in {:?}", output);
    }

    #[test]
    fn no_disallowed_characters_survive(input in any_path()) {
        let output = sanitize(&input);
        prop_assert!(!output.contains(DISALLOWED), "disallowed char in {:?}", output);
    }

    #[test]
    fn no_leading_or_trailing_separator(input in any_path()) {
        let output = sanitize(&input);
        prop_assert!(!output.starts_with('/'));
        prop_assert!(!output.ends_with('/'));
    }

    #[test]
    fn joined_path_stays_within_base(input in any_path()) {
        let base = Path::new("/srv/data");
        let joined = pathward::join(base, &input);
        prop_assert!(joined.starts_with(base));
        prop_assert!(joined
            .components()
            .all(|c| !matches!(c, Component::ParentDir | Component::CurDir)));
    }
}
