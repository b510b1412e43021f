use crate::error::{NumberParserError, NumberParserResult};
use crate::options::{
    single_char, thousand_separator as parse_thousand, NumberParserOptions, Separators,
};
use crate::pattern::{Convention, PatternCache, PatternKey, Shape};
use regex::{Captures, Regex};
use tabula_column::{
    Builder, CancellationSignal, ProblemAggregator, Safepoint, Storage, StorageType, TextStorage,
    Value, WithProblems,
};

/// A candidate format: the direct scan at index 0, a compiled pattern everywhere else.
#[derive(Debug)]
struct Format {
    key: PatternKey,
    regex: Regex,
}

/// Parses text into `i64` or `f64` values.
///
/// Besides plain numbers the parser understands thousand separators in British, German, French
/// and Swiss conventions (or a fixed pair), bracketed negatives and, optionally, currency
/// symbols and scientific notation.
///
/// Formats are addressed by index: index 0 is a direct character scan, every further index is
/// one (convention, shape) pair, conventions in inference order and shapes within each
/// convention. When parsing a whole column the first format that parses every row is used; if
/// none does, the format that got furthest before its first failure is applied and the rows it
/// rejects are reported.
#[derive(Debug)]
pub struct NumberParser {
    options: NumberParserOptions,
    formats: Vec<Format>,
}

impl NumberParser {
    /// An integer parser. `thousand_separator = None` infers the separator; `Some("")` disables
    /// digit grouping.
    pub fn integer(
        allow_currency: bool,
        allow_leading_zeros: bool,
        trim_values: bool,
        thousand_separator: Option<&str>,
    ) -> NumberParserResult<Self> {
        let separators = thousand_separator
            .map(|text| {
                parse_thousand(text).map(|thousand| Separators {
                    thousand,
                    decimal: None,
                })
            })
            .transpose()?;

        Self::from_options(NumberParserOptions {
            allow_decimal: false,
            allow_currency,
            allow_leading_zeros,
            trim_values,
            allow_scientific: false,
            separators,
            fast_only: false,
        })
    }

    /// A decimal parser inferring its separators.
    pub fn auto_decimal(
        allow_currency: bool,
        allow_leading_zeros: bool,
        trim_values: bool,
        allow_scientific: bool,
    ) -> Self {
        Self::build(
            NumberParserOptions {
                allow_decimal: true,
                allow_currency,
                allow_leading_zeros,
                trim_values,
                allow_scientific,
                separators: None,
                fast_only: false,
            },
            &PatternCache::global(),
        )
    }

    /// A decimal parser with fixed separators. An empty or missing thousand separator disables
    /// digit grouping.
    pub fn fixed_decimal(
        allow_currency: bool,
        allow_leading_zeros: bool,
        trim_values: bool,
        allow_scientific: bool,
        thousand_separator: Option<&str>,
        decimal_separator: &str,
    ) -> NumberParserResult<Self> {
        let decimal = single_char(decimal_separator).ok_or_else(|| {
            NumberParserError::InvalidDecimalSeparator(decimal_separator.to_string())
        })?;
        let thousand = match thousand_separator {
            Some(text) => parse_thousand(text)?,
            None => None,
        };

        Self::from_options(NumberParserOptions {
            allow_decimal: true,
            allow_currency,
            allow_leading_zeros,
            trim_values,
            allow_scientific,
            separators: Some(Separators {
                thousand,
                decimal: Some(decimal),
            }),
            fast_only: false,
        })
    }

    /// A parser running only the direct scan. Leading zeros are accepted and decimal parsers
    /// accept exponents.
    pub fn fast_only(allow_decimal: bool, trim_values: bool) -> Self {
        Self::build(
            NumberParserOptions {
                allow_decimal,
                allow_currency: false,
                allow_leading_zeros: true,
                trim_values,
                allow_scientific: allow_decimal,
                separators: None,
                fast_only: true,
            },
            &PatternCache::global(),
        )
    }

    pub fn from_options(options: NumberParserOptions) -> NumberParserResult<Self> {
        Self::with_pattern_cache(options, &PatternCache::global())
    }

    /// Like [`NumberParser::from_options`], compiling patterns through `cache`.
    pub fn with_pattern_cache(
        options: NumberParserOptions,
        cache: &PatternCache,
    ) -> NumberParserResult<Self> {
        options.validate()?;
        Ok(Self::build(options, cache))
    }

    fn build(options: NumberParserOptions, cache: &PatternCache) -> Self {
        let conventions: Vec<Convention> = if options.fast_only {
            Vec::new()
        } else {
            match options.separators {
                Some(separators) => vec![Convention::Fixed(separators)],
                None => Convention::AUTO.to_vec(),
            }
        };

        let formats = conventions
            .into_iter()
            .flat_map(|convention| {
                Shape::allowed(options.allow_currency)
                    .iter()
                    .map(move |&shape| PatternKey {
                        convention,
                        shape,
                        allow_decimal: options.allow_decimal,
                        allow_scientific: options.allow_scientific,
                        trim_values: options.trim_values,
                    })
            })
            .map(|key| Format {
                regex: cache.get_or_compile(&key),
                key,
            })
            .collect();

        Self { options, formats }
    }

    pub fn options(&self) -> &NumberParserOptions {
        &self.options
    }

    /// Number of candidate formats, the direct scan included.
    pub fn pattern_count(&self) -> usize {
        self.formats.len() + 1
    }

    pub fn result_type(&self) -> StorageType {
        if self.options.allow_decimal {
            StorageType::FLOAT_64
        } else {
            StorageType::INTEGER_64
        }
    }

    /// Parse one value, trying every format in order.
    ///
    /// Text no format accepts yields [`Value::Null`] and one invalid-format problem.
    pub fn parse_single_value(&self, text: &str, problems: &mut ProblemAggregator) -> Value {
        match (0..self.pattern_count()).find_map(|index| self.parse_with(text, index)) {
            Some(value) => value,
            None => {
                problems.report_invalid_format(None, text);
                Value::Null
            }
        }
    }

    /// Parse a whole text column, inferring a single format for all of it.
    ///
    /// Missing rows stay missing. Rows the chosen format rejects become missing values with one
    /// invalid-format problem each.
    pub fn parse_column(
        &self,
        column_name: &str,
        source: &TextStorage,
        cancel: &dyn CancellationSignal,
    ) -> NumberParserResult<WithProblems<Storage>> {
        // (index, rows parsed before the first failure)
        let mut best: Option<(usize, usize)> = None;

        for index in 0..self.pattern_count() {
            let mut builder = Builder::for_type(self.result_type(), source.len())?;
            match self.parse_rows(index, source, &mut builder, None, cancel)? {
                None => {
                    log::debug!(
                        "column {column_name}: all {} rows parsed as {}",
                        source.len(),
                        self.describe(index)
                    );
                    return Ok(WithProblems::clean(builder.seal()?));
                }
                Some(failed_at) => {
                    if best.map_or(true, |(_, furthest)| failed_at > furthest) {
                        best = Some((index, failed_at));
                    }
                }
            }
        }

        let (index, failed_at) = best.unwrap_or((0, 0));
        log::debug!(
            "column {column_name}: no format parses every row, using {} which parsed {failed_at} rows before failing",
            self.describe(index)
        );

        let mut problems = ProblemAggregator::new(column_name);
        let mut builder = Builder::for_type(self.result_type(), source.len())?;
        self.parse_rows(index, source, &mut builder, Some(&mut problems), cancel)?;
        Ok(WithProblems::new(builder.seal()?, problems.into_problems()))
    }

    /// Parse `source` with the format at `index`.
    ///
    /// Without a problem sink the scan stops at the first rejected row and returns its index;
    /// with one, rejected rows are reported and the scan always completes.
    fn parse_rows(
        &self,
        index: usize,
        source: &TextStorage,
        builder: &mut Builder,
        mut problems: Option<&mut ProblemAggregator>,
        cancel: &dyn CancellationSignal,
    ) -> NumberParserResult<Option<usize>> {
        let mut safepoint = Safepoint::new(cancel);
        for (row, text) in source.iter().enumerate() {
            safepoint.poll()?;

            let Some(text) = text else {
                builder.append_nulls(1)?;
                continue;
            };

            match self.parse_with(text, index) {
                Some(value) => builder.append_no_grow(value)?,
                None => match problems.as_deref_mut() {
                    Some(problems) => {
                        problems.report_invalid_format(Some(row), text);
                        builder.append_nulls(1)?;
                    }
                    None => return Ok(Some(row)),
                },
            }
        }
        Ok(None)
    }

    fn describe(&self, index: usize) -> String {
        match index.checked_sub(1).and_then(|i| self.formats.get(i)) {
            Some(format) => format!("format {index} ({})", format.key),
            None => "the direct scan".to_string(),
        }
    }

    fn parse_with(&self, text: &str, index: usize) -> Option<Value> {
        if self.options.allow_decimal {
            let trimmed = self.trim(text);
            match trimmed {
                "NaN" => return Some(Value::Double(f64::NAN)),
                "Infinity" => return Some(Value::Double(f64::INFINITY)),
                "-Infinity" => return Some(Value::Double(f64::NEG_INFINITY)),
                _ => {}
            }
            if index == 0 {
                return self.scan_double(trimmed).map(Value::Double);
            }
        } else if index == 0 {
            return self.scan_long(self.trim(text)).map(Value::Long);
        }

        let format = self.formats.get(index - 1)?;
        let captures = format.regex.captures(text)?;
        self.interpret(&captures)
    }

    fn trim<'t>(&self, text: &'t str) -> &'t str {
        if self.options.trim_values {
            text.trim()
        } else {
            text
        }
    }

    fn rejects_leading_zero(&self, digits: &str) -> bool {
        !self.options.allow_leading_zeros && digits.len() > 1 && digits.starts_with('0')
    }

    /// Direct integer scan: an optional `-` followed by ASCII digits.
    fn scan_long(&self, text: &str) -> Option<i64> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if digits.is_empty() || self.rejects_leading_zero(digits) {
            return None;
        }

        let mut accum: i64 = 0;
        for b in digits.bytes() {
            if !b.is_ascii_digit() {
                return None;
            }
            let digit = i64::from(b - b'0');
            // Accumulate towards the sign so `i64::MIN` is reachable.
            accum = accum.checked_mul(10)?;
            accum = if negative {
                accum.checked_sub(digit)?
            } else {
                accum.checked_add(digit)?
            };
        }
        Some(accum)
    }

    /// Direct decimal scan: `[+-] digits [. digits] [e [+-] digits]`.
    fn scan_double(&self, text: &str) -> Option<f64> {
        let bytes = text.as_bytes();
        let digits_from = |mut idx: usize| {
            while idx < bytes.len() && bytes[idx].is_ascii_digit() {
                idx += 1;
            }
            idx
        };

        let mut idx = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
        let integer_start = idx;
        idx = digits_from(idx);
        let integer = &text[integer_start..idx];

        let mut fraction_digits = 0;
        if bytes.get(idx) == Some(&b'.') {
            let fraction_start = idx + 1;
            idx = digits_from(fraction_start);
            fraction_digits = idx - fraction_start;
        }
        if integer.is_empty() && fraction_digits == 0 {
            return None;
        }

        if matches!(bytes.get(idx), Some(b'e' | b'E')) {
            if !self.options.allow_scientific || integer.len() > 1 {
                return None;
            }
            idx += 1;
            if matches!(bytes.get(idx), Some(b'+' | b'-')) {
                idx += 1;
            }
            let exponent_start = idx;
            idx = digits_from(idx);
            if idx == exponent_start {
                return None;
            }
        }

        if idx != bytes.len() || self.rejects_leading_zero(integer) {
            return None;
        }
        text.parse::<f64>().ok()
    }

    /// Semantic checks and conversion after a pattern matched.
    fn interpret(&self, captures: &Captures<'_>) -> Option<Value> {
        let sign = captures.name("sign").map(|m| m.as_str());
        let bracketed = sign == Some("(");
        if bracketed != captures.name("close").is_some() {
            return None;
        }
        let negative = matches!(sign, Some("-" | "("));

        let integer: String = captures
            .name("integer")
            .map_or("", |m| m.as_str())
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if self.rejects_leading_zero(&integer) {
            return None;
        }

        if !self.options.allow_decimal {
            if integer.is_empty() {
                return None;
            }
            let literal = if negative {
                format!("-{integer}")
            } else {
                integer
            };
            // Overflow is a non-match.
            return literal.parse::<i64>().ok().map(Value::Long);
        }

        let fraction = captures.name("decimal").map_or("", |m| {
            let mut chars = m.as_str().chars();
            chars.next();
            chars.as_str()
        });
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        let integer = if integer.is_empty() { "0" } else { integer.as_str() };

        let exponent = match captures.name("exp") {
            Some(_) if integer.len() > 1 => return None,
            Some(m) => m.as_str(),
            None => "",
        };

        let magnitude = format!("{integer}.{fraction}{exponent}").parse::<f64>().ok()?;
        Some(Value::Double(if negative { -magnitude } else { magnitude }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integers() -> NumberParser {
        NumberParser::integer(false, false, true, None).unwrap()
    }

    #[test]
    fn direct_scan_handles_the_long_range() {
        let parser = integers();
        assert_eq!(parser.scan_long("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parser.scan_long("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parser.scan_long("9223372036854775808"), None);
        assert_eq!(parser.scan_long("-"), None);
        assert_eq!(parser.scan_long("+1"), None);
        assert_eq!(parser.scan_long("1 2"), None);
        assert_eq!(parser.scan_long("0"), Some(0));
        assert_eq!(parser.scan_long("012"), None);
    }

    #[test]
    fn direct_decimal_scan_shapes() {
        let parser = NumberParser::auto_decimal(false, false, false, true);
        assert_eq!(parser.scan_double("+1.5"), Some(1.5));
        assert_eq!(parser.scan_double(".5"), Some(0.5));
        assert_eq!(parser.scan_double("5."), Some(5.0));
        assert_eq!(parser.scan_double("1.5e-1"), Some(0.15));
        assert_eq!(parser.scan_double("15e1"), None);
        assert_eq!(parser.scan_double("1e"), None);
        assert_eq!(parser.scan_double("."), None);
        assert_eq!(parser.scan_double("00.5"), None);
        assert_eq!(parser.scan_double("1,5"), None);
    }

    #[test]
    fn format_indices_enumerate_conventions_then_shapes() {
        let parser = NumberParser::auto_decimal(true, false, false, false);
        assert_eq!(parser.pattern_count(), 1 + 4 * 6);
        assert_eq!(parser.formats[0].key.convention, Convention::British);
        assert_eq!(parser.formats[5].key.shape, Shape::BracketedCurrency);
        assert_eq!(parser.formats[6].key.convention, Convention::German);
        assert_eq!(parser.formats[6].key.shape, Shape::Signed);

        let fixed = NumberParser::fixed_decimal(false, false, false, false, Some("."), ",").unwrap();
        assert_eq!(fixed.pattern_count(), 1 + 2);

        assert_eq!(NumberParser::fast_only(true, true).pattern_count(), 1);
    }

    #[test]
    fn unbalanced_brackets_do_not_match() {
        let parser = integers();
        let mut problems = ProblemAggregator::new("n");
        assert_eq!(parser.parse_single_value("(12", &mut problems), Value::Null);
        assert_eq!(parser.parse_single_value("12)", &mut problems), Value::Null);
        assert_eq!(problems.len(), 2);
    }
}
