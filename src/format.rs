use crate::{
    error::FormatError,
    parser::{self, Conversion, Specifier, Width},
    Value,
};

/// Default fractional (or significant, for `%g`) digits for floating
/// conversions without an explicit precision.
const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Formatter actually implements formatting.
///
/// It owns a reusable output buffer which is cleared at the start of every
/// call, so a single instance must not be shared between concurrent calls.
/// For one-shot use, the free function [`format`] is more convenient.
///
/// [`format`]: crate::format()
#[derive(Default)]
pub struct Formatter {
    buf: String,
}

impl Formatter {
    pub fn new() -> Formatter {
        Formatter::default()
    }

    /// Renders `template`, consuming `args` strictly left to right.
    ///
    /// The returned slice borrows the internal buffer and is valid until
    /// the next call. On error, partial output is discarded.
    pub fn format(&mut self, template: &str, args: &[Value]) -> Result<&str, FormatError> {
        self.buf.clear();
        let bytes = template.as_bytes();
        let mut pos = 0;
        let mut next_arg = 0;
        while pos < bytes.len() {
            match bytes[pos..].iter().position(|&b| b == b'%') {
                Some(0) => {
                    let (spec, end) = parser::parse(bytes, pos)?;
                    next_arg = self.render(&spec, args, next_arg)?;
                    pos = end;
                }
                Some(literal) => {
                    self.buf.push_str(&template[pos..pos + literal]);
                    pos += literal;
                }
                None => {
                    self.buf.push_str(&template[pos..]);
                    break;
                }
            }
        }
        Ok(&self.buf)
    }

    /// Renders one specifier into the buffer and returns the advanced
    /// argument cursor.
    fn render(
        &mut self,
        spec: &Specifier,
        args: &[Value],
        mut next_arg: usize,
    ) -> Result<usize, FormatError> {
        if spec.conversion == Conversion::Undefined {
            // truncated specifier: renders nothing, consumes nothing
            return Ok(next_arg);
        }

        let width = match spec.width {
            // indirect width is consumed before the value argument
            Width::FromArgs => {
                let w = take_int(args, &mut next_arg)?;
                usize::try_from(w).unwrap_or(0)
            }
            Width::Fixed(w) => w,
        };

        let start = self.buf.len();
        // bytes of prefix that zero-fill must stay behind
        let mut pad_offset = 0;

        match spec.conversion {
            Conversion::Percent => self.buf.push('%'),
            Conversion::Decimal => {
                let value = take_int(args, &mut next_arg)?;
                self.push_sign(value >= 0, spec);
                let mut digits = itoa::Buffer::new();
                self.buf.push_str(digits.format(value));
            }
            Conversion::Unsigned => {
                let value = take_int(args, &mut next_arg)?;
                let value = u64::try_from(value).map_err(|_| FormatError::NumOverflow(value))?;
                let mut digits = itoa::Buffer::new();
                self.buf.push_str(digits.format(value));
            }
            Conversion::FixedFloat => {
                let value = take_float(args, &mut next_arg)?;
                self.push_sign(value >= 0.0, spec);
                let precision = spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                self.buf.push_str(&fixed(value, precision, spec.upper));
            }
            Conversion::SciFloat => {
                let value = take_float(args, &mut next_arg)?;
                self.push_sign(value >= 0.0, spec);
                let precision = spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                self.buf.push_str(&scientific(value, precision, spec.upper));
            }
            Conversion::GeneralFloat => {
                let value = take_float(args, &mut next_arg)?;
                self.push_sign(value >= 0.0, spec);
                let precision = spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                self.buf.push_str(&general(value, precision, spec.upper));
            }
            Conversion::Hex => {
                let value = take_int(args, &mut next_arg)?;
                if spec.flags.alt {
                    self.buf.push_str(if spec.upper { "0X" } else { "0x" });
                    if spec.flags.zero {
                        // zero-fill goes after the prefix, space padding before it
                        pad_offset = 2;
                    }
                }
                let magnitude = value.unsigned_abs();
                if spec.upper {
                    self.buf.push_str(&format!("{magnitude:X}"));
                } else {
                    self.buf.push_str(&format!("{magnitude:x}"));
                }
            }
            Conversion::Octal => {
                let value = take_int(args, &mut next_arg)?;
                if spec.flags.alt {
                    self.buf.push('0');
                    if spec.flags.zero {
                        pad_offset = 1;
                    }
                }
                let magnitude = value.unsigned_abs();
                self.buf.push_str(&format!("{magnitude:o}"));
            }
            Conversion::Str => {
                let text = match *take(args, &mut next_arg)? {
                    Value::Str(text) => text,
                    ref other => return Err(bad_type("string", other)),
                };
                match spec.precision {
                    // upper bound on copied characters, never pads up to it
                    Some(limit) => self.buf.extend(text.chars().take(limit)),
                    None => self.buf.push_str(text),
                }
            }
            Conversion::Char => match *take(args, &mut next_arg)? {
                Value::Char(c) => self.buf.push(c),
                ref other => return Err(bad_type("character", other)),
            },
            Conversion::Pointer | Conversion::HexFloat | Conversion::WriteCount => {
                return Err(FormatError::Unsupported(spec.conversion));
            }
            Conversion::Undefined => unreachable!("handled above"),
        }

        let rendered = self.buf[start..].chars().count();
        let pad = width.saturating_sub(rendered);
        if pad > 0 {
            if spec.flags.left {
                // left alignment always pads with spaces; the parser has
                // already cleared the zero flag
                for _ in 0..pad {
                    self.buf.push(' ');
                }
            } else {
                let fill = if spec.flags.zero { "0" } else { " " };
                self.buf.insert_str(start + pad_offset, &fill.repeat(pad));
            }
        }

        Ok(next_arg)
    }

    /// Sign/space rule shared by all numeric conversions: `+` wins over
    /// space, negative values keep their natural minus sign.
    fn push_sign(&mut self, non_negative: bool, spec: &Specifier) {
        if !non_negative {
            return;
        }
        if spec.flags.plus {
            self.buf.push('+');
        } else if spec.flags.space {
            self.buf.push(' ');
        }
    }
}

fn take<'v, 'a>(args: &'v [Value<'a>], next_arg: &mut usize) -> Result<&'v Value<'a>, FormatError> {
    let value = args.get(*next_arg).ok_or(FormatError::NotEnoughArguments)?;
    *next_arg += 1;
    Ok(value)
}

fn take_int(args: &[Value], next_arg: &mut usize) -> Result<i64, FormatError> {
    match *take(args, next_arg)? {
        Value::Int(value) => Ok(value),
        ref other => Err(bad_type("integer", other)),
    }
}

/// Integers widen losslessly into floating conversions.
fn take_float(args: &[Value], next_arg: &mut usize) -> Result<f64, FormatError> {
    match *take(args, next_arg)? {
        Value::Float(value) => Ok(value),
        Value::Int(value) => Ok(value as f64),
        ref other => Err(bad_type("number", other)),
    }
}

fn bad_type(expected: &'static str, found: &Value) -> FormatError {
    FormatError::BadType {
        expected,
        found: found.kind(),
    }
}

fn fixed(value: f64, precision: usize, upper: bool) -> String {
    if !value.is_finite() {
        return non_finite(value, upper);
    }
    format!("{value:.precision$}")
}

/// Scientific notation with an explicit exponent sign and at least three
/// exponent digits, e.g. `1.250000e+000`.
fn scientific(value: f64, precision: usize, upper: bool) -> String {
    if !value.is_finite() {
        return non_finite(value, upper);
    }
    let raw = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(rest) => ('-', rest),
        None => ('+', exponent),
    };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{digits:0>3}")
}

/// General notation: `precision` total significant digits, fixed form when
/// the decimal exponent fits in `[-4, precision)`, scientific otherwise.
/// Trailing zeros and a bare trailing point are trimmed.
fn general(value: f64, precision: usize, upper: bool) -> String {
    if !value.is_finite() {
        return non_finite(value, upper);
    }
    let digits = precision.max(1);
    // round to the significant-digit boundary first to learn the exponent
    let probe = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = probe.split_once('e').unwrap_or((probe.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    if exponent >= -4 && exponent < digits as i64 {
        let fraction = usize::try_from(digits as i64 - 1 - exponent).unwrap_or(0);
        trim_fraction(format!("{value:.fraction$}"))
    } else {
        let mantissa = trim_fraction(mantissa.to_string());
        let marker = if upper { 'E' } else { 'e' };
        let (sign, magnitude) = if exponent < 0 {
            ('-', -exponent)
        } else {
            ('+', exponent)
        };
        format!("{mantissa}{marker}{sign}{magnitude:03}")
    }
}

fn trim_fraction(mut text: String) -> String {
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

fn non_finite(value: f64, upper: bool) -> String {
    let text = if value.is_nan() {
        "nan"
    } else if value > 0.0 {
        "inf"
    } else {
        "-inf"
    };
    if upper {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}
