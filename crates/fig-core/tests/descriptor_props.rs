use fig_core::Descriptor;
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._-]{1,12}"
}

fn optional_name() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), name()]
}

proptest! {
    #[test]
    fn descriptor_text_round_trips(
        package in name(),
        version in optional_name(),
        config in optional_name(),
    ) {
        let descriptor = Descriptor::new(package, version, config);
        let parsed: Descriptor = descriptor.to_string().parse().unwrap();
        prop_assert_eq!(parsed, descriptor);
    }

    #[test]
    fn display_never_emits_empty_segments(
        package in name(),
        version in optional_name(),
    ) {
        let text = Descriptor::new(package, version, "").to_string();
        prop_assert!(!text.ends_with('/'));
        prop_assert!(!text.contains(':'));
    }
}
