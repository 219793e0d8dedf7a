//! Render packages back to definition text

use crate::package::{Modifier, Package, PackageStatement};
use std::borrow::Cow;
use std::fmt::{self, Write};

/// Render a package in the form accepted by [`crate::parser::parse_package`]
pub fn unparse_package(package: &Package) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_package(&mut out, package);
    out
}

fn write_package(out: &mut String, package: &Package) -> fmt::Result {
    for statement in &package.statements {
        match statement {
            PackageStatement::Name { package, version } if version.is_empty() => {
                writeln!(out, "package {}", package)?
            }
            PackageStatement::Name { package, version } => {
                writeln!(out, "package {}/{}", package, version)?
            }
            PackageStatement::Resource { path } => writeln!(out, "resource {}", quote(path))?,
            PackageStatement::Archive { path } => writeln!(out, "archive {}", quote(path))?,
            PackageStatement::Config(config) => {
                writeln!(out, "config {}", config.name)?;
                for modifier in &config.modifiers {
                    match modifier {
                        Modifier::Set { name, value } => {
                            writeln!(out, "  set {}={}", name, quote(value))?
                        }
                        Modifier::Path { name, value } => {
                            writeln!(out, "  path {}={}", name, quote(value))?
                        }
                        Modifier::Include { descriptor } => {
                            writeln!(out, "  include {}", descriptor)?
                        }
                    }
                }
                writeln!(out, "end")?;
            }
        }
    }
    Ok(())
}

/// Quote text that would otherwise not survive tokenizing
fn quote(text: &str) -> Cow<'_, str> {
    let plain = !text.is_empty()
        && !text.contains(|c: char| c.is_whitespace() || matches!(c, '"' | '#'));
    if plain {
        return Cow::Borrowed(text);
    }

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}
