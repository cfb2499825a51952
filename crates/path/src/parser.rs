//! A `nom`-based parser for rendered path strings.
//!
//! Grammar: `segment ('.' segment)*` where `segment = name ('[' digits ']')?`.
//! Inside a name, `\` escapes the next character, so `.`, `[`, `]` and `\` can
//! appear in field names.

use crate::ast::Step;
use crate::error::PathError;
use arbor_value::{Location, Segment, escape_field_name};
use nom::{
    IResult, Parser,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{delimited, pair},
};

// --- Main Public Parser ---

pub fn parse_location(input: &str) -> Result<Location, PathError> {
    match location(input) {
        Ok(("", location)) => Ok(location),
        Ok((rem, _)) => Err(PathError::Parse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(PathError::Parse(input.to_string(), e.to_string())),
    }
}

/// Renders field and index steps as path-string text, ready to be appended to
/// an existing path string.
pub fn render_suffix(steps: &[Step]) -> Result<String, PathError> {
    let mut rendered = String::new();
    for step in steps {
        match step {
            Step::Field(name) => {
                rendered.push('.');
                rendered.push_str(&escape_field_name(name));
            }
            Step::ArrayIndex(index) => rendered.push_str(&format!("[{}]", index)),
            other => return Err(PathError::NotAddressable(other.to_string())),
        }
    }
    Ok(rendered)
}

// --- Combinators ---

fn location(input: &str) -> IResult<&str, Location> {
    map(separated_list1(char('.'), segment), Location::new).parse(input)
}

fn segment(input: &str) -> IResult<&str, Segment> {
    map(pair(field_name, opt(index)), |(name, index)| Segment {
        name,
        index,
    })
    .parse(input)
}

fn index(input: &str) -> IResult<&str, usize> {
    delimited(char('['), map_res(digit1, str::parse::<usize>), char(']')).parse(input)
}

/// A non-empty field name, ending at the first unescaped `.`, `[` or `]`.
fn field_name(input: &str) -> IResult<&str, String> {
    let mut name = String::new();
    let mut end = input.len();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => name.push(escaped),
                None => {
                    return Err(nom::Err::Error(Error::new(&input[i..], ErrorKind::Escaped)));
                }
            },
            '.' | '[' | ']' => {
                end = i;
                break;
            }
            _ => name.push(c),
        }
    }
    if end == 0 {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Alpha)));
    }
    Ok((&input[end..], name))
}
