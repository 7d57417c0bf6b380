//! # Assertion Messages
//!
//! Resolves the optional message arguments every assertion accepts into the
//! `Description` line of a report.
//!
//! - no arguments: no description
//! - one string: used literally
//! - one non-string: rendered with the `%+v` layout (`{:#}`)
//! - several: the first is a printf-style template applied to the rest
//!
//! Template verbs: `%v %+v %d %s %q %x %X %o %b %c %t %f %e %g %T %%`, with
//! optional `-`, `+`, `0` flags, width and precision. A verb with no argument
//! left renders `%!d(MISSING)`, a verb that does not fit its argument renders
//! `%!d(String=abc)`, a template ending in a lone `%` renders `%!(NOVERB)`,
//! and leftover arguments are listed as `%!(EXTRA i32=1, bool=true)`.
//!
//! `%x` and `%X` on floats print the hexadecimal mantissa and binary exponent,
//! as in `0x1.8p+00`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::MessageError;
use crate::value::Value;

static VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%([-+# 0]*)(\d+)?(?:\.(\d*))?(?:([a-zA-Z%])|$)").expect("verb pattern is valid")
});

const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Resolves message arguments into a description; empty when there is none.
///
/// # Examples
///
/// ```rust
/// use verity::{message::describe, Value};
/// let args = [Value::from("count=%d"), Value::from(3)];
/// assert_eq!(describe(&args).unwrap(), "count=3");
/// assert_eq!(describe(&[Value::from(vec![1, 2])]).unwrap(), "[1 2]");
/// assert!(describe(&[Value::from(1), Value::from(2)]).is_err());
/// ```
pub fn describe(msg_and_args: &[Value]) -> Result<String, MessageError> {
    match msg_and_args {
        [] => Ok(String::new()),
        [Value::Str(msg)] => Ok(msg.clone()),
        [single] => Ok(format!("{:#}", single)),
        [Value::Str(template), args @ ..] => Ok(interpolate(template, args)),
        [other, ..] => Err(MessageError::TemplateNotString {
            found: other.type_name(),
        }),
    }
}

/// Applies `args` positionally to the verbs of `template`.
pub fn interpolate(template: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut remaining = args.iter();
    let mut last = 0;

    for caps in VERB.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        if caps.get(4).is_none() {
            out.push_str("%!(NOVERB)");
            continue;
        }
        let spec = Spec::from_captures(&caps);
        if spec.verb == '%' {
            out.push('%');
            continue;
        }
        match remaining.next() {
            Some(arg) => out.push_str(&spec.apply(arg)),
            None => out.push_str(&format!("%!{}(MISSING)", spec.verb)),
        }
    }
    out.push_str(&template[last..]);

    let extra: Vec<String> = remaining
        .map(|arg| format!("{}={}", arg.type_name(), arg))
        .collect();
    if !extra.is_empty() {
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}

// ============================================================================
// VERB SPECIFICATION
// ============================================================================

struct Spec {
    left_align: bool,
    plus: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

impl Spec {
    fn from_captures(caps: &Captures<'_>) -> Self {
        let flags = caps.get(1).map_or("", |m| m.as_str());
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<usize>().ok());
        let precision = caps.get(3).map(|m| m.as_str().parse::<usize>().unwrap_or(0));
        Self {
            left_align: flags.contains('-'),
            plus: flags.contains('+'),
            zero_pad: flags.contains('0'),
            width: number(2),
            precision,
            verb: caps
                .get(4)
                .and_then(|m| m.as_str().chars().next())
                .unwrap_or('v'),
        }
    }

    fn apply(&self, arg: &Value) -> String {
        match self.render(arg) {
            Some(text) => self.pad(text, matches!(arg, Value::Int(..) | Value::Float(..))),
            None => self.bad_verb(arg),
        }
    }

    /// Renders `arg` for this verb, or `None` when the verb does not apply.
    fn render(&self, arg: &Value) -> Option<String> {
        match (self.verb, arg) {
            ('v', v) if self.plus => Some(format!("{:#}", v)),
            ('v', v) => Some(v.to_string()),
            ('T', v) => Some(v.type_name()),
            ('d', Value::Int(n, _)) => Some(self.signed(*n, n.to_string())),
            ('x', Value::Float(x, _)) => Some(self.signed_float(*x, hex_float(*x))),
            ('X', Value::Float(x, _)) => {
                Some(self.signed_float(*x, hex_float(*x).to_uppercase()))
            }
            ('x', v) => radix(v, 16, false),
            ('X', v) => radix(v, 16, true),
            ('o', Value::Int(..)) => radix(arg, 8, false),
            ('b', Value::Int(..)) => radix(arg, 2, false),
            ('c', Value::Int(n, _)) => u32::try_from(*n)
                .ok()
                .and_then(char::from_u32)
                .map(String::from),
            ('c', Value::Char(c)) => Some(c.to_string()),
            ('s', Value::Str(s)) => Some(self.truncate(s)),
            ('s', Value::Bytes(Some(b))) => Some(self.truncate(&String::from_utf8_lossy(b))),
            ('s', v @ (Value::List(_) | Value::Array(_) | Value::Map(_) | Value::Struct(_))) => {
                Some(v.to_string())
            }
            ('q', Value::Str(s)) => Some(format!("{:?}", s)),
            ('q', Value::Char(c)) => Some(format!("{:?}", c)),
            ('t', Value::Bool(b)) => Some(b.to_string()),
            ('f' | 'F', Value::Float(x, _)) => {
                let precision = self.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                Some(self.signed_float(*x, format!("{:.*}", precision, x)))
            }
            ('e', Value::Float(x, _)) => {
                let precision = self.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                Some(self.signed_float(*x, exponent(&format!("{:.*e}", precision, x))))
            }
            ('g', Value::Float(..)) => Some(arg.to_string()),
            _ => None,
        }
    }

    fn signed(&self, n: i128, text: String) -> String {
        if self.plus && n >= 0 {
            format!("+{}", text)
        } else {
            text
        }
    }

    fn signed_float(&self, x: f64, text: String) -> String {
        if self.plus && x >= 0.0 && !text.starts_with('+') {
            format!("+{}", text)
        } else {
            text
        }
    }

    fn truncate(&self, s: &str) -> String {
        match self.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.to_string(),
        }
    }

    fn pad(&self, text: String, numeric: bool) -> String {
        let len = text.chars().count();
        let Some(width) = self.width.filter(|w| *w > len) else {
            return text;
        };
        let fill = width - len;
        if self.left_align {
            format!("{}{}", text, " ".repeat(fill))
        } else if self.zero_pad && numeric {
            let (sign, digits) = match text.strip_prefix(['-', '+']) {
                Some(rest) => text.split_at(text.len() - rest.len()),
                None => ("", text.as_str()),
            };
            format!("{}{}{}", sign, "0".repeat(fill), digits)
        } else {
            format!("{}{}", " ".repeat(fill), text)
        }
    }

    fn bad_verb(&self, arg: &Value) -> String {
        match arg {
            Value::Nil => format!("%!{}(<nil>)", self.verb),
            other => format!("%!{}({}={})", self.verb, other.type_name(), other),
        }
    }
}

fn radix(arg: &Value, base: u32, upper: bool) -> Option<String> {
    let text = match arg {
        Value::Int(n, _) => {
            let digits = match base {
                16 => format!("{:x}", n.unsigned_abs()),
                8 => format!("{:o}", n.unsigned_abs()),
                _ => format!("{:b}", n.unsigned_abs()),
            };
            if *n < 0 {
                format!("-{}", digits)
            } else {
                digits
            }
        }
        Value::Str(s) if base == 16 => hex(s.as_bytes()),
        Value::Bytes(Some(b)) if base == 16 => hex(b),
        _ => return None,
    };
    Some(if upper { text.to_uppercase() } else { text })
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Formats a float as `0x1.8p+00`: normalized mantissa in hex, shortest digits,
/// and a signed binary exponent of at least two digits.
fn hex_float(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let sign = if x.is_sign_negative() { "-" } else { "" };
    let bits = x.abs().to_bits();
    let mut mantissa = bits & MANTISSA_MASK;
    let biased = (bits >> 52) as i32;
    let exp = if biased == 0 {
        if mantissa == 0 {
            return format!("{}0x0p+00", sign);
        }
        // subnormal: shift the leading one into the implicit position
        let shift = mantissa.leading_zeros() as i32 - 11;
        mantissa = (mantissa << shift) & MANTISSA_MASK;
        -1022 - shift
    } else {
        biased - 1023
    };
    let digits = format!("{:013x}", mantissa);
    let digits = digits.trim_end_matches('0');
    if digits.is_empty() {
        format!("{}0x1p{:+03}", sign, exp)
    } else {
        format!("{}0x1.{}p{:+03}", sign, digits, exp)
    }
}

const MANTISSA_MASK: u64 = (1 << 52) - 1;

/// Rewrites Rust's `1.5e0` exponent as `1.5e+00`.
fn exponent(text: &str) -> String {
    let Some((mantissa, exp)) = text.split_once('e') else {
        return text.to_string();
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exp),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Struct;

    fn fmt(template: &str, args: &[Value]) -> String {
        interpolate(template, args)
    }

    #[test]
    fn no_args_means_no_description() {
        assert_eq!(describe(&[]).unwrap(), "");
    }

    #[test]
    fn single_string_is_literal() {
        // verbs are not expanded when there is nothing to apply
        assert_eq!(describe(&["100%d done".into()]).unwrap(), "100%d done");
    }

    #[test]
    fn single_value_uses_plus_v() {
        let record = Struct::new("Job").field("id", 4).field("name", "sync");
        assert_eq!(describe(&[record.into()]).unwrap(), "{id:4 name:sync}");
    }

    #[test]
    fn template_must_be_a_string() {
        assert_eq!(
            describe(&[Value::from(1), "x".into()]),
            Err(MessageError::TemplateNotString {
                found: "i32".to_string()
            })
        );
    }

    #[test]
    fn positional_verbs() {
        assert_eq!(fmt("count=%d", &[3.into()]), "count=3");
        assert_eq!(
            fmt("%s has %d items (%t)", &["cart".into(), 2.into(), true.into()]),
            "cart has 2 items (true)"
        );
        assert_eq!(fmt("%q", &["a\"b".into()]), r#""a\"b""#);
        assert_eq!(
            fmt("%x %X %o %b", &[255.into(), 255.into(), 8.into(), 5.into()]),
            "ff FF 10 101"
        );
        assert_eq!(fmt("%x", &[(-255).into()]), "-ff");
        assert_eq!(fmt("%x", &["hi".into()]), "6869");
        assert_eq!(fmt("%c", &[65.into()]), "A");
        assert_eq!(fmt("%T", &[1.5f32.into()]), "f32");
        assert_eq!(fmt("100%%", &[]), "100%");
    }

    #[test]
    fn floats() {
        assert_eq!(fmt("%f", &[1.5.into()]), "1.500000");
        assert_eq!(fmt("%.2f", &[3.14159.into()]), "3.14");
        assert_eq!(fmt("%e", &[1500.0.into()]), "1.500000e+03");
        assert_eq!(fmt("%g", &[0.25.into()]), "0.25");
    }

    #[test]
    fn hex_floats() {
        assert_eq!(fmt("%x", &[1.5.into()]), "0x1.8p+00");
        assert_eq!(fmt("%X", &[1.5.into()]), "0X1.8P+00");
        assert_eq!(fmt("%x", &[1.0.into()]), "0x1p+00");
        assert_eq!(fmt("%x", &[0.0.into()]), "0x0p+00");
        assert_eq!(fmt("%x", &[(-0.0).into()]), "-0x0p+00");
        assert_eq!(fmt("%x", &[(-10.0).into()]), "-0x1.4p+03");
        assert_eq!(fmt("%x", &[0.25f32.into()]), "0x1p-02");
        assert_eq!(fmt("%x", &[1024.0.into()]), "0x1p+10");
        assert_eq!(fmt("%x", &[f64::from_bits(1).into()]), "0x1p-1074");
        assert_eq!(fmt("%+x", &[2.0.into()]), "+0x1p+01");
        assert_eq!(fmt("%x", &[f64::INFINITY.into()]), "+Inf");
        assert_eq!(fmt("%+x", &[f64::INFINITY.into()]), "+Inf");
        assert_eq!(fmt("%x", &[f64::NAN.into()]), "NaN");
    }

    #[test]
    fn trailing_percent_has_no_verb() {
        assert_eq!(fmt("100%", &[]), "100%!(NOVERB)");
        assert_eq!(fmt("%d%", &[1.into()]), "1%!(NOVERB)");
        assert_eq!(fmt("50%-", &[]), "50%!(NOVERB)");
        // the lone percent consumes no argument
        assert_eq!(fmt("%", &[1.into()]), "%!(NOVERB)%!(EXTRA i32=1)");
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(fmt("[%5d]", &[42.into()]), "[   42]");
        assert_eq!(fmt("[%-5d]", &[42.into()]), "[42   ]");
        assert_eq!(fmt("[%05d]", &[(-42).into()]), "[-0042]");
        assert_eq!(fmt("[%+d]", &[7.into()]), "[+7]");
        assert_eq!(fmt("[%.3s]", &["abcdef".into()]), "[abc]");
    }

    #[test]
    fn mismatches_are_rendered_inline() {
        assert_eq!(fmt("%d", &["abc".into()]), "%!d(String=abc)");
        assert_eq!(fmt("%d %d", &[1.into()]), "1 %!d(MISSING)");
        assert_eq!(fmt("%d", &[1.into(), 2.into()]), "1%!(EXTRA i32=2)");
        assert_eq!(fmt("%d", &[Value::Nil]), "%!d(<nil>)");
    }
}
