//! Number surface syntax as regular expressions, and the process-wide cache of compiled patterns.

use crate::options::Separators;
use dashmap::DashMap;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

const DIGITS: &str = "[0-9]";
const SIGN: &str = r"(?P<sign>[-+])?";
// The regex crate has no lookahead; the parser checks that an opening bracket was closed.
const BRACKETS: &str = r"(?P<sign>\()?\s*";
const BRACKET_CLOSE: &str = r"(?P<close>\))?";
const CCY: &str = "(?P<ccy>[^0-9(),. '+\u{00A0}\u{202F}-]+)";
const EXP: &str = "(?P<exp>[eE][+-]?[0-9]+)?";
const SPACE: &str = r"\s*";

/// Thousand and decimal separator pairs tried when separators are inferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Convention {
    /// `1,234.5`
    British,
    /// `1.234,5`
    German,
    /// `1 234,5`, with a plain, no-break or narrow no-break space.
    French,
    /// `1'234,5`
    Swiss,
    Fixed(Separators),
}

impl Convention {
    /// Inference order.
    pub const AUTO: [Convention; 4] = [
        Convention::British,
        Convention::German,
        Convention::French,
        Convention::Swiss,
    ];

    /// Regex class body matching the thousand separator, `None` when digits are not grouped.
    fn thousand_class(self) -> Option<String> {
        match self {
            Convention::British => Some(",".to_string()),
            Convention::German => Some(r"\.".to_string()),
            Convention::French => Some(" \u{00A0}\u{202F}".to_string()),
            Convention::Swiss => Some("'".to_string()),
            Convention::Fixed(separators) => separators.thousand.map(escape_char),
        }
    }

    fn decimal_class(self) -> String {
        match self {
            Convention::British => r"\.".to_string(),
            Convention::German | Convention::French | Convention::Swiss => ",".to_string(),
            Convention::Fixed(separators) => escape_char(separators.decimal.unwrap_or('.')),
        }
    }
}

fn escape_char(c: char) -> String {
    let mut buf = [0u8; 4];
    regex::escape(c.encode_utf8(&mut buf))
}

/// Arrangements of sign, brackets and currency around the digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `-1234`
    Signed,
    /// `(1234)`
    Bracketed,
    /// `-$1234`
    CurrencyAfterSign,
    /// `$-1234`
    CurrencyBeforeSign,
    /// `-1234€`
    CurrencySuffix,
    /// `($1234)`
    BracketedCurrency,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Signed,
        Shape::Bracketed,
        Shape::CurrencyAfterSign,
        Shape::CurrencyBeforeSign,
        Shape::CurrencySuffix,
        Shape::BracketedCurrency,
    ];

    /// The shapes a parser tries, currency shapes last.
    pub fn allowed(allow_currency: bool) -> &'static [Shape] {
        if allow_currency {
            &Self::ALL
        } else {
            &Self::ALL[..2]
        }
    }
}

/// Everything that determines the text of one number pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatternKey {
    pub convention: Convention,
    pub shape: Shape,
    pub allow_decimal: bool,
    pub allow_scientific: bool,
    pub trim_values: bool,
}

impl PatternKey {
    pub fn source(&self) -> String {
        let integer = match self.convention.thousand_class() {
            Some(thousand) => format!(
                "(?P<integer>{DIGITS}*|{DIGITS}{{1,3}}(?:[{thousand}]{DIGITS}{{3}})*)"
            ),
            None => format!("(?P<integer>{DIGITS}*)"),
        };

        let mut number = integer;
        if self.allow_decimal {
            let decimal = self.convention.decimal_class();
            number.push_str(&format!("(?P<decimal>[{decimal}]{DIGITS}*)?"));
        }
        if self.allow_scientific {
            number.push_str(EXP);
        }

        let body = match self.shape {
            Shape::Signed => format!("{SIGN}{number}"),
            Shape::Bracketed => format!("{BRACKETS}{number}{BRACKET_CLOSE}"),
            Shape::CurrencyAfterSign => format!("{SIGN}{CCY}{SPACE}{number}"),
            Shape::CurrencyBeforeSign => format!("{CCY}{SPACE}{SIGN}{number}"),
            Shape::CurrencySuffix => format!("{SIGN}{number}{CCY}"),
            Shape::BracketedCurrency => format!("{BRACKETS}{CCY}{SPACE}{number}{BRACKET_CLOSE}"),
        };

        if self.trim_values {
            format!("^{SPACE}{body}{SPACE}$")
        } else {
            format!("^{body}$")
        }
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.convention {
            Convention::Fixed(separators) => write!(
                f,
                "{:?} with thousand {:?} and decimal {:?}",
                self.shape, separators.thousand, separators.decimal
            ),
            convention => write!(f, "{:?} {convention:?}", self.shape),
        }
    }
}

/// Memoized compiled patterns keyed by their source text.
///
/// Only ever grows, and only with distinct pattern texts, of which there are a few dozen per
/// parser configuration.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: DashMap<Arc<str>, Regex>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by every parser built without an explicit one.
    pub fn global() -> Arc<PatternCache> {
        static GLOBAL: OnceLock<Arc<PatternCache>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(PatternCache::new())).clone()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get_or_compile(&self, key: &PatternKey) -> Regex {
        let source: Arc<str> = Arc::from(key.source());
        let source_for_compile = source.clone();
        self.patterns
            .entry(source)
            .or_insert_with(|| {
                log::trace!("compiling number pattern {source_for_compile}");
                Regex::new(&source_for_compile).expect("valid regex")
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(convention: Convention, shape: Shape) -> PatternKey {
        PatternKey {
            convention,
            shape,
            allow_decimal: true,
            allow_scientific: false,
            trim_values: false,
        }
    }

    #[test]
    fn thousands_need_full_groups() {
        let cache = PatternCache::new();
        let british = cache.get_or_compile(&key(Convention::British, Shape::Signed));
        assert!(british.is_match("1,234,567.5"));
        assert!(british.is_match("1234567.5"));
        assert!(!british.is_match("1,23.5"));
        assert!(!british.is_match("1234,567"));

        let french = cache.get_or_compile(&key(Convention::French, Shape::Signed));
        assert!(french.is_match("1 234,5"));
        assert!(french.is_match("1\u{00A0}234\u{202F}567,5"));
    }

    #[test]
    fn currency_groups_capture_the_symbol() {
        let cache = PatternCache::new();
        let pattern = cache.get_or_compile(&key(Convention::British, Shape::CurrencyBeforeSign));
        let caps = pattern.captures("$ -12.5").unwrap();
        assert_eq!(&caps["ccy"], "$");
        assert_eq!(&caps["sign"], "-");
        assert_eq!(&caps["integer"], "12");
        assert_eq!(&caps["decimal"], ".5");
    }

    #[test]
    fn fixed_separators_are_escaped() {
        let convention = Convention::Fixed(Separators {
            thousand: Some('^'),
            decimal: Some(']'),
        });
        let cache = PatternCache::new();
        let pattern = cache.get_or_compile(&key(convention, Shape::Signed));
        assert!(pattern.is_match("1^000]25"));
        assert!(!pattern.is_match("1,000.25"));
    }

    #[test]
    fn cache_grows_only_with_distinct_patterns() {
        let cache = PatternCache::new();
        assert!(cache.is_empty());
        for _ in 0..3 {
            cache.get_or_compile(&key(Convention::German, Shape::Bracketed));
        }
        assert_eq!(cache.len(), 1);

        cache.get_or_compile(&PatternKey {
            trim_values: true,
            ..key(Convention::German, Shape::Bracketed)
        });
        assert_eq!(cache.len(), 2);
    }
}
