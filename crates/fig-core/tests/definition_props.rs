use fig_core::parser::parse_package;
use fig_core::unparser::unparse_package;
use fig_core::{Configuration, Modifier, Package, PackageStatement};
use proptest::prelude::*;

fn variable() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}"
}

fn modifier() -> impl Strategy<Value = Modifier> {
    prop_oneof![
        (variable(), any::<String>()).prop_map(|(name, value)| Modifier::set(name, value)),
        (variable(), any::<String>()).prop_map(|(name, value)| Modifier::path(name, value)),
    ]
}

proptest! {
    #[test]
    fn unparsed_modifiers_parse_back(modifiers in prop::collection::vec(modifier(), 0..6)) {
        let package = Package::new(
            "pkg",
            "1.0",
            vec![PackageStatement::Config(Configuration::new("default", modifiers))],
        );
        let text = unparse_package(&package);
        prop_assert_eq!(parse_package("pkg.fig", "pkg", "1.0", &text).unwrap(), package);
    }

    #[test]
    fn unparsed_paths_parse_back(resource in any::<String>(), archive in any::<String>()) {
        let package = Package::builder("pkg", "1.0")
            .resource(resource)
            .archive(archive)
            .build();
        let text = unparse_package(&package);
        prop_assert_eq!(parse_package("pkg.fig", "pkg", "1.0", &text).unwrap(), package);
    }
}
