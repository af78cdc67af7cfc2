//! Specifier grammar parsing
//! Refer to `man printf(3)` for details about the conversion specification format

use crate::error::FormatError;

/// Conversion selected by the final letter of a specification
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// `%%`
    Percent,
    /// `d` / `i`
    Decimal,
    /// `u`
    Unsigned,
    /// `f` / `F`
    FixedFloat,
    /// `e` / `E`
    SciFloat,
    /// `g` / `G`
    GeneralFloat,
    /// `x` / `X`
    Hex,
    /// `o`
    Octal,
    /// `s`
    Str,
    /// `c`
    Char,
    /// `p`. Parsed but never rendered.
    Pointer,
    /// `a` / `A`. Parsed but never rendered.
    HexFloat,
    /// `n`. Parsed but never rendered.
    WriteCount,
    /// No conversion letter was found before the template ended.
    Undefined,
}

impl Conversion {
    fn from_byte(c: u8) -> Option<Conversion> {
        use Conversion::*;
        match c {
            b'%' => Some(Percent),
            b'd' | b'i' => Some(Decimal),
            b'u' => Some(Unsigned),
            b'f' | b'F' => Some(FixedFloat),
            b'e' | b'E' => Some(SciFloat),
            b'g' | b'G' => Some(GeneralFloat),
            b'x' | b'X' => Some(Hex),
            b'o' => Some(Octal),
            b's' => Some(Str),
            b'c' => Some(Char),
            b'p' => Some(Pointer),
            b'a' | b'A' => Some(HexFloat),
            b'n' => Some(WriteCount),
            _ => None,
        }
    }
}

impl core::fmt::Display for Conversion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use Conversion::*;
        let letter = match self {
            Percent => '%',
            Decimal => 'd',
            Unsigned => 'u',
            FixedFloat => 'f',
            SciFloat => 'e',
            GeneralFloat => 'g',
            Hex => 'x',
            Octal => 'o',
            Str => 's',
            Char => 'c',
            Pointer => 'p',
            HexFloat => 'a',
            WriteCount => 'n',
            Undefined => '?',
        };
        write!(f, "{letter}")
    }
}

/// Conversion flags
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// Adjust to left. Corresponds to `-`.
    pub left: bool,
    /// Always put sign before a number. Corresponds to `+`.
    pub plus: bool,
    /// Produce whitespace before a non-negative number. Corresponds to ` `.
    pub space: bool,
    /// Zero-padding. Corresponds to `0`.
    pub zero: bool,
    /// Group thousands. Corresponds to `'`. Parsed, no rendering effect.
    pub group: bool,
    /// Alternate representation. Corresponds to `#`.
    pub alt: bool,
}

/// Minimum field width
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Width {
    /// Literal width from the template. Absent digits yield `Fixed(0)`.
    Fixed(usize),
    /// `*`: the width is read from the argument list at render time.
    FromArgs,
}

/// Length modifier. Parsed for C compatibility, behaviorally inert.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LenModifier {
    #[default]
    None,
    /// Corresponds to `h`.
    Short,
    /// Corresponds to `hh`.
    Shorter,
    /// Corresponds to `l`.
    Long,
    /// Corresponds to `ll`.
    Longer,
    /// Corresponds to `L`.
    LongDouble,
    /// Corresponds to `z`.
    Size,
    /// Corresponds to `j`.
    Longest,
    /// Corresponds to `t`.
    PtrDiff,
}

/// One parsed `%...` directive
///
/// Built fresh for every `%` in the template, used once by the renderer,
/// then discarded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Specifier {
    pub conversion: Conversion,
    pub flags: Flags,
    pub width: Width,
    /// `None` when the template carries no `.`; floating conversions
    /// default to 6 fractional/significant digits, `%s` treats it as an
    /// upper bound on copied characters.
    pub precision: Option<usize>,
    pub length: LenModifier,
    /// Case of the conversion letter. Selects `E` vs `e`, `0X` vs `0x`,
    /// hex digit case.
    pub upper: bool,
}

/// Parses one conversion specification beginning at `start`.
///
/// Returns the specifier together with the offset one past its consumed
/// span. `start` must point at a `%` inside `template`; anything else is a
/// contract violation and fails with a structural error.
///
/// The grammar is deliberately tolerant: unknown characters between the
/// length modifier and the conversion letter are skipped, and a template
/// that ends before a conversion letter is found yields
/// [`Conversion::Undefined`] with the end offset rewound to where the
/// letter scan began, so trailing text stays outside the consumed span.
pub fn parse(template: &[u8], start: usize) -> Result<(Specifier, usize), FormatError> {
    let n = template.len();
    if start >= n {
        return Err(FormatError::OutOfBounds {
            offset: start,
            len: n,
        });
    }
    if template[start] != b'%' {
        return Err(FormatError::BadStart(start));
    }
    let mut i = start + 1;

    let mut flags = Flags::default();
    while i < n {
        match template[i] {
            b'-' => flags.left = true,
            b'+' => flags.plus = true,
            b' ' => flags.space = true,
            b'0' => flags.zero = true,
            b'\'' => flags.group = true,
            b'#' => flags.alt = true,
            _ => break,
        }
        i += 1;
    }
    // left alignment always wins over zero-padding
    if flags.left {
        flags.zero = false;
    }

    let width = if i < n && template[i] == b'*' {
        i += 1;
        Width::FromArgs
    } else {
        Width::Fixed(read_number(template, &mut i))
    };

    let mut precision = None;
    if i < n && template[i] == b'.' {
        i += 1;
        precision = Some(read_number(template, &mut i));
    }

    let length = read_length(template, &mut i);

    let mut conversion = Conversion::Undefined;
    let mut upper = false;
    let mut scan = i;
    while scan < n {
        let c = template[scan];
        scan += 1;
        if let Some(found) = Conversion::from_byte(c) {
            conversion = found;
            upper = c.is_ascii_uppercase();
            i = scan;
            break;
        }
    }

    Ok((
        Specifier {
            conversion,
            flags,
            width,
            precision,
            length,
            upper,
        },
        i,
    ))
}

/// Maximal decimal digit run; no digits at all yields 0
fn read_number(template: &[u8], i: &mut usize) -> usize {
    let mut num = 0usize;
    while *i < template.len() && template[*i].is_ascii_digit() {
        num = num
            .saturating_mul(10)
            .saturating_add(usize::from(template[*i] - b'0'));
        *i += 1;
    }
    num
}

fn read_length(template: &[u8], i: &mut usize) -> LenModifier {
    let Some(&first) = template.get(*i) else {
        return LenModifier::None;
    };
    let doubled = matches!(first, b'h' | b'l') && template.get(*i + 1) == Some(&first);
    let modifier = match (first, doubled) {
        (b'h', true) => LenModifier::Shorter,
        (b'h', false) => LenModifier::Short,
        (b'l', true) => LenModifier::Longer,
        (b'l', false) => LenModifier::Long,
        (b'L', _) => LenModifier::LongDouble,
        (b'z', _) => LenModifier::Size,
        (b'j', _) => LenModifier::Longest,
        (b't', _) => LenModifier::PtrDiff,
        _ => return LenModifier::None,
    };
    *i += if doubled { 2 } else { 1 };
    modifier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(template: &[u8]) -> (Specifier, usize) {
        parse(template, 0).unwrap()
    }

    #[test]
    fn simple_decimal() {
        let (spec, end) = parse_one(b"%d");
        assert_eq!(spec.conversion, Conversion::Decimal);
        assert_eq!(spec.flags, Flags::default());
        assert_eq!(spec.width, Width::Fixed(0));
        assert_eq!(spec.precision, None);
        assert_eq!(spec.length, LenModifier::None);
        assert!(!spec.upper);
        assert_eq!(end, 2);
    }

    #[test]
    fn escaped_percent_is_a_plain_specifier() {
        let (spec, end) = parse_one(b"%%");
        assert_eq!(spec.conversion, Conversion::Percent);
        assert_eq!(end, 2);
    }

    #[test]
    fn all_flags() {
        let (spec, _) = parse_one(b"%+ '#d");
        assert!(spec.flags.plus);
        assert!(spec.flags.space);
        assert!(spec.flags.group);
        assert!(spec.flags.alt);
        assert!(!spec.flags.left);
        assert!(!spec.flags.zero);
    }

    #[test]
    fn left_alignment_clears_zero() {
        let (spec, _) = parse_one(b"%-0d");
        assert!(spec.flags.left);
        assert!(!spec.flags.zero);

        let (spec, _) = parse_one(b"%0-d");
        assert!(!spec.flags.zero);
    }

    #[test]
    fn literal_width() {
        let (spec, end) = parse_one(b"%12d");
        assert_eq!(spec.width, Width::Fixed(12));
        assert_eq!(end, 4);
    }

    #[test]
    fn indirect_width() {
        let (spec, _) = parse_one(b"%*d");
        assert_eq!(spec.width, Width::FromArgs);
    }

    #[test]
    fn precision() {
        let (spec, _) = parse_one(b"%.4f");
        assert_eq!(spec.precision, Some(4));

        // a bare dot means "precision 0", not "no precision"
        let (spec, _) = parse_one(b"%.f");
        assert_eq!(spec.precision, Some(0));

        let (spec, _) = parse_one(b"%10.2f");
        assert_eq!(spec.width, Width::Fixed(10));
        assert_eq!(spec.precision, Some(2));
    }

    #[test]
    fn length_modifiers_are_parsed() {
        let cases: &[(&[u8], LenModifier)] = &[
            (b"%hhd", LenModifier::Shorter),
            (b"%hd", LenModifier::Short),
            (b"%ld", LenModifier::Long),
            (b"%lld", LenModifier::Longer),
            (b"%Lf", LenModifier::LongDouble),
            (b"%zu", LenModifier::Size),
            (b"%jd", LenModifier::Longest),
            (b"%td", LenModifier::PtrDiff),
        ];
        for &(template, expected) in cases {
            let (spec, end) = parse_one(template);
            assert_eq!(spec.length, expected);
            assert_eq!(end, template.len());
            assert_ne!(spec.conversion, Conversion::Undefined);
        }
    }

    #[test]
    fn unknown_characters_before_conversion_are_skipped() {
        let (spec, end) = parse_one(b"%q_d");
        assert_eq!(spec.conversion, Conversion::Decimal);
        assert_eq!(end, 4);
    }

    #[test]
    fn uppercase_letter_sets_upper() {
        for template in [&b"%X"[..], b"%E", b"%G", b"%F", b"%A"] {
            let (spec, _) = parse_one(template);
            assert!(spec.upper, "{:?}", template);
        }
        for template in [&b"%x"[..], b"%e", b"%g", b"%f", b"%a"] {
            let (spec, _) = parse_one(template);
            assert!(!spec.upper, "{:?}", template);
        }
    }

    #[test]
    fn truncated_specifier_yields_undefined() {
        let (spec, end) = parse_one(b"%");
        assert_eq!(spec.conversion, Conversion::Undefined);
        assert_eq!(end, 1);

        let (spec, end) = parse_one(b"%-+ 0#5.5");
        assert_eq!(spec.conversion, Conversion::Undefined);
        assert_eq!(end, 9);
    }

    #[test]
    fn failed_letter_scan_consumes_nothing() {
        // the comma stays outside the consumed span
        let (spec, end) = parse_one(b"%2,");
        assert_eq!(spec.conversion, Conversion::Undefined);
        assert_eq!(spec.width, Width::Fixed(2));
        assert_eq!(end, 2);

        let (spec, end) = parse_one(b"%0b");
        assert_eq!(spec.conversion, Conversion::Undefined);
        assert_eq!(end, 2);
        assert!(spec.flags.zero);
    }

    #[test]
    fn parse_mid_template() {
        let template = b"abc%5xdef";
        let (spec, end) = parse(template, 3).unwrap();
        assert_eq!(spec.conversion, Conversion::Hex);
        assert_eq!(spec.width, Width::Fixed(5));
        assert_eq!(end, 6);
    }

    #[test]
    fn structural_errors() {
        assert_eq!(
            parse(b"%d", 5),
            Err(FormatError::OutOfBounds { offset: 5, len: 2 })
        );
        assert_eq!(parse(b"abc", 1), Err(FormatError::BadStart(1)));
    }
}
