use proptest::prelude::*;
use vhost_fs::NormalizedPath;

proptest! {
    #[test]
    fn normalized_paths_never_contain_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }

    #[test]
    fn native_roundtrip_is_identity(s in "[a-z0-9./-]{0,40}") {
        let path = NormalizedPath::new(&s);
        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn join_keeps_the_base_prefix(name in "[a-z0-9][a-z0-9.-]{0,30}") {
        let base = NormalizedPath::new("/srv");
        let joined = base.join(&name);
        prop_assert!(joined.as_str().starts_with("/srv"));
        prop_assert!(!joined.as_str().contains("//"));
    }
}
