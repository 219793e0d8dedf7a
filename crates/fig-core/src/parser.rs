//! Package definition language
//!
//! ```text
//! package foo/1.2.3
//! resource lib/foo.jar
//! archive foo.tar.gz
//!
//! config default
//!   set FOO_HOME=/opt/foo
//!   path PATH=/opt/foo/bin
//!   include bar/4.5.6:runtime
//! end
//! ```
//!
//! Statements are whitespace separated and `#` starts a comment that runs to
//! the end of the line. Descriptors are written `package[/version][:config]`.
//! Values and paths may be double-quoted to hold whitespace; inside quotes
//! `\"`, `\\`, `\n`, `\r` and `\t` are escapes.

use crate::descriptor::Descriptor;
use crate::package::{Configuration, Modifier, Package, PackageStatement};
use std::fmt;

const PACKAGE_KEYWORD_ERROR: &str = r#"invalid keyword, expected "package", "resource", "archive", or "config""#;
const CONFIG_KEYWORD_ERROR: &str = r#"invalid keyword, expected "set", "path", "include", or "end""#;
const PACKAGE_NAME_ERROR: &str = "invalid character in package name, expected [a-z A-Z 0-9 . - _]";
const VERSION_NAME_ERROR: &str = "invalid character in version name, expected [a-z A-Z 0-9 . - _]";
const CONFIG_NAME_ERROR: &str = "invalid character in config name, expected [a-z A-Z 0-9 . - _]";
const VARIABLE_NAME_ERROR: &str = "invalid character in variable name, expected [a-z A-Z 0-9 _]";

/// A syntax error with enough context to point at the offending text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
    pub message: String,
    pub line_text: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = self.line_text.len() - self.line_text.trim_start().len();
        let padding = self.column.saturating_sub(indent + 1);
        writeln!(
            f,
            "{}:{}:{}: {}",
            self.file, self.line, self.column, self.message
        )?;
        writeln!(f, "  {}", self.line_text.trim_start())?;
        writeln!(
            f,
            "  {}{}",
            " ".repeat(padding),
            "^".repeat(self.length.max(1))
        )
    }
}

impl std::error::Error for ParseError {}

/// Parse a descriptor given on its own, such as a command-line argument
pub fn parse_descriptor(text: &str) -> Result<Descriptor, ParseError> {
    let token = Token {
        text,
        line: 1,
        column: 1,
        line_text: text,
    };
    token.descriptor("<arg>")
}

/// Parse the definition of `package`/`version` read from `source`
pub fn parse_package(
    source: &str,
    package: &str,
    version: &str,
    text: &str,
) -> Result<Package, ParseError> {
    let mut parser = Parser {
        source,
        tokens: tokenize(text),
        pos: 0,
        last_line: text.lines().count().max(1),
        last_line_text: text.lines().last().unwrap_or(""),
    };

    let mut statements = Vec::new();
    while let Some(statement) = parser.package_statement()? {
        statements.push(statement);
    }
    Ok(Package::new(package, version, statements))
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    line: usize,
    column: usize,
    line_text: &'a str,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for (index, line_text) in text.lines().enumerate() {
        let mut start = None;
        let mut quoted = false;
        let mut escaped = false;
        for (offset, c) in line_text.char_indices().chain([(line_text.len(), ' ')]) {
            if quoted && offset < line_text.len() {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => quoted = false,
                    _ => {}
                }
                continue;
            }
            match (start, c.is_whitespace()) {
                (None, false) if c == '#' => break,
                (None, false) => {
                    start = Some(offset);
                    quoted = c == '"';
                }
                (Some(_), false) if c == '"' => quoted = true,
                (Some(begin), true) => {
                    tokens.push(Token {
                        text: &line_text[begin..offset],
                        line: index + 1,
                        column: begin + 1,
                        line_text,
                    });
                    start = None;
                }
                _ => {}
            }
        }
    }
    tokens
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

fn is_variable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Token<'a> {
    fn error(&self, source: &str, offset: usize, length: usize, message: &str) -> ParseError {
        ParseError {
            file: source.to_string(),
            line: self.line,
            column: self.column + offset,
            length,
            message: message.to_string(),
            line_text: self.line_text.to_string(),
        }
    }

    fn token_error(&self, source: &str, message: &str) -> ParseError {
        self.error(source, 0, self.text.len(), message)
    }

    /// Strip the quotes from the token text starting at `offset`
    fn unquote(&self, source: &str, offset: usize) -> Result<String, ParseError> {
        let text = &self.text[offset..];
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        let mut quoted = false;
        while let Some(c) = chars.next() {
            match c {
                '"' => quoted = !quoted,
                '\\' if quoted => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => break,
                },
                c => out.push(c),
            }
        }
        if quoted {
            return Err(self.error(source, offset, text.len(), "unterminated quote"));
        }
        Ok(out)
    }

    /// Scan `name? ('/' version)? (':' config)?` covering the whole token
    fn descriptor(&self, source: &str) -> Result<Descriptor, ParseError> {
        let text = self.text;
        if text.is_empty() {
            return Err(self.error(source, 0, 1, "expected a descriptor (e.g. foo/1.2.3)"));
        }

        let package_end = text.find(|c: char| !is_name_char(c)).unwrap_or(text.len());
        let package = &text[..package_end];
        let mut rest = &text[package_end..];
        let mut offset = package_end;
        let mut message = PACKAGE_NAME_ERROR;

        let mut version = "";
        if let Some(after) = rest.strip_prefix('/') {
            let end = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
            if end == 0 {
                return Err(self.error(source, offset + 1, 1, VERSION_NAME_ERROR));
            }
            version = &after[..end];
            rest = &after[end..];
            offset += 1 + end;
            message = VERSION_NAME_ERROR;
        }

        let mut config = "";
        if let Some(after) = rest.strip_prefix(':') {
            let end = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
            if end == 0 {
                return Err(self.error(source, offset + 1, 1, CONFIG_NAME_ERROR));
            }
            config = &after[..end];
            rest = &after[end..];
            offset += 1 + end;
            message = CONFIG_NAME_ERROR;
        }

        if !rest.is_empty() {
            return Err(self.error(source, offset, 1, message));
        }
        if package.is_empty() && config.is_empty() {
            return Err(self.error(source, 0, 1, PACKAGE_NAME_ERROR));
        }

        Ok(Descriptor::new(package, version, config))
    }

    /// Split `NAME=VALUE`; whitespace around `=` ends the token early
    fn name_value(&self, source: &str) -> Result<(String, String), ParseError> {
        let Some((name, value)) = self.text.split_once('=') else {
            return Err(self.token_error(source, "expected NAME=VALUE (no whitespace around '=')"));
        };
        if name.is_empty() {
            return Err(self.error(source, 0, 1, VARIABLE_NAME_ERROR));
        }
        if let Some(bad) = name.find(|c: char| !is_variable_char(c)) {
            return Err(self.error(source, bad, 1, VARIABLE_NAME_ERROR));
        }
        if value.is_empty() {
            return Err(self.error(
                source,
                name.len(),
                1,
                "expected a value after '=' (no whitespace around '=')",
            ));
        }
        Ok((name.to_string(), self.unquote(source, name.len() + 1)?))
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    last_line: usize,
    last_line_text: &'a str,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eof_error(&self, expected: &str) -> ParseError {
        ParseError {
            file: self.source.to_string(),
            line: self.last_line,
            column: self.last_line_text.len() + 1,
            length: 1,
            message: format!("unexpected end-of-file, expected {}", expected),
            line_text: self.last_line_text.to_string(),
        }
    }

    fn expect(&mut self, expected: &str) -> Result<Token<'a>, ParseError> {
        self.next().ok_or_else(|| self.eof_error(expected))
    }

    fn package_statement(&mut self) -> Result<Option<PackageStatement>, ParseError> {
        let Some(keyword) = self.next() else {
            return Ok(None);
        };

        let statement = match keyword.text {
            "package" => {
                let token = self.expect("a package descriptor")?;
                let descriptor = token.descriptor(self.source)?;
                PackageStatement::Name {
                    package: descriptor.package().to_string(),
                    version: descriptor.version().to_string(),
                }
            }
            "resource" => PackageStatement::Resource {
                path: self.expect("a resource path")?.unquote(self.source, 0)?,
            },
            "archive" => PackageStatement::Archive {
                path: self.expect("an archive path")?.unquote(self.source, 0)?,
            },
            "config" => PackageStatement::Config(self.config()?),
            _ => return Err(keyword.token_error(self.source, PACKAGE_KEYWORD_ERROR)),
        };
        Ok(Some(statement))
    }

    fn config(&mut self) -> Result<Configuration, ParseError> {
        let name = self.expect("a config name")?;
        if let Some(bad) = name.text.find(|c: char| !is_name_char(c)) {
            return Err(name.error(self.source, bad, 1, CONFIG_NAME_ERROR));
        }

        let mut modifiers = Vec::new();
        loop {
            let keyword = self.expect(r#""end""#)?;
            let modifier = match keyword.text {
                "end" => break,
                "set" => {
                    let (name, value) = self.expect("NAME=VALUE")?.name_value(self.source)?;
                    Modifier::Set { name, value }
                }
                "path" | "append" => {
                    let (name, value) = self.expect("NAME=VALUE")?.name_value(self.source)?;
                    Modifier::Path { name, value }
                }
                "include" => Modifier::Include {
                    descriptor: self.expect("a descriptor")?.descriptor(self.source)?,
                },
                _ => return Err(keyword.token_error(self.source, CONFIG_KEYWORD_ERROR)),
            };
            modifiers.push(modifier);
        }

        Ok(Configuration::new(name.text, modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::ConfigBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(text: &str) -> Result<Package, ParseError> {
        parse_package("test.fig", "test", "1.2.3", text)
    }

    #[test]
    fn test_empty_package() {
        assert_eq!(parse("\n").unwrap(), Package::builder("test", "1.2.3").build());
    }

    #[test]
    fn test_package_with_name() {
        assert_eq!(
            parse("package foo/1.2.3").unwrap(),
            Package::builder("test", "1.2.3").name("foo", "1.2.3").build()
        );
    }

    #[test]
    fn test_resource_and_archive() {
        let text = "\nresource foo/bar.baz\narchive foo/bar.tar.gz\n";
        assert_eq!(
            parse(text).unwrap(),
            Package::builder("test", "1.2.3")
                .resource("foo/bar.baz")
                .archive("foo/bar.tar.gz")
                .build()
        );
    }

    #[test]
    fn test_config_with_modifiers() {
        let text = r#"
config foo
  set FOO1=BAR1
  path FOO2=BAR2
  append FOO3=BAR3
  include bar/4.5.6:debug
end
"#;
        let expected = ConfigBuilder::new("foo")
            .set("FOO1", "BAR1")
            .path("FOO2", "BAR2")
            .path("FOO3", "BAR3")
            .include(Descriptor::new("bar", "4.5.6", "debug"))
            .build();

        let package = parse(text).unwrap();
        assert_eq!(package.find_config("foo"), Some(&expected));
    }

    #[test]
    fn test_comments_are_ignored() {
        let text = "# leading comment\nconfig default # trailing\n  set A=1\n  # set B=2\nend\n";
        let package = parse(text).unwrap();
        assert_eq!(package.find_config("default").unwrap().modifiers.len(), 1);
    }

    #[rstest]
    #[case("foo", Descriptor::new("foo", "", ""))]
    #[case("foo/1.2.3", Descriptor::new("foo", "1.2.3", ""))]
    #[case("foo:debug", Descriptor::new("foo", "", "debug"))]
    #[case("foo/1.2.3:debug", Descriptor::new("foo", "1.2.3", "debug"))]
    #[case(":debug", Descriptor::new("", "", "debug"))]
    #[case("my-lib_2/2024.01.rc1:win-x64", Descriptor::new("my-lib_2", "2024.01.rc1", "win-x64"))]
    fn test_parse_descriptor(#[case] text: &str, #[case] expected: Descriptor) {
        assert_eq!(parse_descriptor(text).unwrap(), expected);
    }

    #[rstest]
    #[case("", 1)]
    #[case("foo/", 5)]
    #[case("foo:", 5)]
    #[case("foo bar", 4)]
    #[case("foo/1.0!", 8)]
    #[case("fo$o", 3)]
    fn test_parse_descriptor_errors(#[case] text: &str, #[case] column: usize) {
        let err = parse_descriptor(text).unwrap_err();
        assert_eq!(err.file, "<arg>");
        assert_eq!(err.column, column);
    }

    #[test]
    fn test_unknown_package_keyword() {
        let err = parse("\n  bogus foo\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert_eq!(err.length, 5);
        assert_eq!(err.message, PACKAGE_KEYWORD_ERROR);
    }

    #[test]
    fn test_unknown_config_keyword() {
        let err = parse("config default\n  frobnicate X=1\nend\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.message, CONFIG_KEYWORD_ERROR);
    }

    #[test]
    fn test_whitespace_around_equals() {
        let err = parse("config default\n  set FOO = BAR\nend\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 7);
        assert!(err.message.contains("NAME=VALUE"));
    }

    #[test]
    fn test_quoted_values_keep_whitespace() {
        let text = "resource \"a b.jar\"\nconfig default\n  set MSG=\"hi # there\" # note\n  path P=\"x\\\\y\\\"z\"\nend\n";
        let package = parse(text).unwrap();
        assert_eq!(
            package,
            Package::builder("test", "1.2.3")
                .resource("a b.jar")
                .config("default", |c| c.set("MSG", "hi # there").path("P", "x\\y\"z"))
                .build()
        );
    }

    #[test]
    fn test_backslash_outside_quotes_is_literal() {
        let package = parse("config default\n  set DIR=C:\\tools\nend\n").unwrap();
        let config = package.find_config("default").unwrap();
        assert_eq!(config.modifiers, vec![Modifier::set("DIR", "C:\\tools")]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("config default\n  set MSG=\"hello\nend\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 11);
        assert_eq!(err.message, "unterminated quote");
    }

    #[test]
    fn test_bad_variable_name() {
        let err = parse("config default\n  set FO-O=BAR\nend\n").unwrap_err();
        assert_eq!(err.column, 9);
        assert_eq!(err.message, VARIABLE_NAME_ERROR);
    }

    #[test]
    fn test_missing_end() {
        let err = parse("config default\n  set FOO=BAR\n").unwrap_err();
        assert!(err.message.starts_with("unexpected end-of-file"));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_error_rendering() {
        let err = parse("config default\n    set FOO = BAR\nend\n").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r"
        test.fig:2:9: expected NAME=VALUE (no whitespace around '=')
          set FOO = BAR
              ^^^
        ");
    }
}
