//! Command-string splitting as seen by library users.

use wgrib_shim::args::{Grammar, TokenizeError, UnterminatedQuote, DEFAULT_MAX_ARGS};
use wgrib_shim::{tokenize, Splitter};

#[test]
fn plain_words() {
    assert_eq!(tokenize("a b c").unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn quoted_words_keep_inner_space() {
    assert_eq!(tokenize(r#"a "b c" d"#).unwrap(), vec!["a", "b c", "d"]);
}

#[test]
fn typical_wgrib2_invocation() {
    let tokens = tokenize(
        r#"wgrib2 gfs.t00z.pgrb2.0p25.f000 -match ":(UGRD|VGRD):10 m above ground:" -netcdf "wind 10m.nc""#,
    )
    .unwrap();
    assert_eq!(
        tokens,
        vec![
            "wgrib2",
            "gfs.t00z.pgrb2.0p25.f000",
            "-match",
            ":(UGRD|VGRD):10 m above ground:",
            "-netcdf",
            "wind 10m.nc",
        ]
    );
}

#[test]
fn default_bound_truncates_instead_of_overflowing() {
    let text = vec!["x"; DEFAULT_MAX_ARGS + 25].join(" ");
    let tokens = tokenize(&text).unwrap();
    assert_eq!(tokens.len(), DEFAULT_MAX_ARGS);
}

#[test]
fn checked_split_reports_overflow() {
    let text = vec!["x"; DEFAULT_MAX_ARGS + 1].join(" ");
    assert_eq!(
        Splitter::default().split_checked(&text),
        Err(TokenizeError::TooManyTokens {
            limit: DEFAULT_MAX_ARGS,
            found: DEFAULT_MAX_ARGS + 1
        })
    );
}

#[test]
fn quote_policies() {
    let text = r#"wgrib2 -s "unclosed value"#;
    assert_eq!(
        tokenize(text),
        Err(TokenizeError::UnterminatedQuote { offset: 10 })
    );

    let lenient = Splitter::default().unterminated(UnterminatedQuote::ExtendToEnd);
    assert_eq!(
        lenient.split(text).unwrap(),
        vec!["wgrib2", "-s", "unclosed value"]
    );
}

#[test]
fn posix_grammar_uses_shell_rules() {
    let posix = Splitter::default().grammar(Grammar::Posix);
    assert_eq!(
        posix.split(r#"wgrib2 -match ':TMP:' "a\"b""#).unwrap(),
        vec!["wgrib2", "-match", ":TMP:", r#"a"b"#]
    );
}
