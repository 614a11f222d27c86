//! Shared nom plumbing for the text grammars (timezones, angles, dates and times).

use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    error::{VerboseError, VerboseErrorKind},
    sequence::{pair, preceded},
};
use serde::{Deserialize, Serialize};

pub type Input<'a> = &'a str;
pub type Result<'a, O> = nom::IResult<Input<'a>, O, VerboseError<Input<'a>>>;
pub type Error<'a> = nom::Err<VerboseError<Input<'a>>>;

/// Sign of an angle or a timezone offset. A missing sign reads as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn factor(self) -> f64 {
        match self {
            Sign::Positive => 1.,
            Sign::Negative => -1.,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// Parse an optional leading `+` or `-`.
pub fn sign(i: Input) -> Result<Sign> {
    map(opt(one_of("+-")), |c| match c {
        Some('-') => Sign::Negative,
        _ => Sign::Positive,
    })(i)
}

/// Parse between `min` and `max` ASCII digits as an unsigned integer.
pub fn digits<'a>(min: usize, max: usize) -> impl FnMut(Input<'a>) -> Result<'a, u32> {
    map_res(
        take_while_m_n(min, max, |c: char| c.is_ascii_digit()),
        |s: Input<'a>| s.parse::<u32>(),
    )
}

/// Parse an unsigned decimal number such as `37`, `37.5`, `37.` or `.5`.
pub fn unsigned_decimal(i: Input) -> Result<f64> {
    let number = nom::branch::alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    map_res(number, |s: Input| s.parse::<f64>())(i)
}

/// Parse a `.` followed by fractional digits into nanoseconds. Digits past the ninth are
/// dropped.
pub fn fraction_nanos(i: Input) -> Result<u32> {
    map_res(preceded(char('.'), digit1), |s: Input| {
        let s = &s[..s.len().min(9)];
        format!("{:0<9}", s).parse::<u32>()
    })(i)
}

/// Run `parser` over the whole of `i` (surrounding whitespace is ignored) and return its output.
pub fn complete<'a, O, F>(i: Input<'a>, parser: F) -> std::result::Result<O, Error<'a>>
where
    F: FnMut(Input<'a>) -> Result<'a, O>,
{
    let (_, out) = all_consuming(parser)(i.trim())?;
    Ok(out)
}

/// Flatten a nom error into a single line of the form `what => context => context`.
pub fn describe_error(what: &str, e: Error) -> String {
    match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => e
            .errors
            .iter()
            .map(|err| match err {
                (_, VerboseErrorKind::Context(ctx)) => ctx.to_string(),
                (rest, VerboseErrorKind::Char(c)) => format!("expected '{}' at {:?}", c, rest),
                (rest, VerboseErrorKind::Nom(kind)) => format!("{:?} at {:?}", kind, rest),
            })
            .rev()
            .fold(what.to_string(), |acc, x| format!("{} => {}", acc, x)),
        nom::Err::Incomplete(_) => format!("{} => incomplete input", what),
    }
}
