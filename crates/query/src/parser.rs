//! A `nom`-based parser for the textual query language.
//!
//! ```text
//! values items[*] where $.score > 5
//! paths doc..id where $ == "x"
//! pval(r.results[1]).score
//! #items + $# * 2
//! ```

use crate::ast::*;
use crate::error::QueryError;
use arbor_path::Step;
use arbor_value::{Location, Scalar, Segment};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{map, map_res, not, opt, recognize, verify},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};

const KEYWORDS: [&str; 6] = ["paths", "values", "pval", "where", "true", "false"];

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, QueryError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(QueryError::Parse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(QueryError::Parse(input.to_string(), e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expression::binary(left, op, right);
        }
        Ok((input, left))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A reserved word not followed by another identifier character.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| terminated(tag(word), not(satisfy(is_ident_char))).parse(input)
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    or_expr(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("||"), |_| BinaryOperator::Or).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("&&"), |_| BinaryOperator::And).parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(and_expr, or_op)(input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(not_expr, and_op)(input)
}

fn not_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(char('!')), not_expr), Expression::not),
        comparison_expr,
    ))
    .parse(input)
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("=="), |_| BinaryOperator::Equals),
        map(tag("!="), |_| BinaryOperator::NotEquals),
        map(tag("<="), |_| BinaryOperator::LessThanOrEqual),
        map(tag(">="), |_| BinaryOperator::GreaterThanOrEqual),
        map(char('<'), |_| BinaryOperator::LessThan),
        map(char('>'), |_| BinaryOperator::GreaterThan),
    ))
    .parse(input)
}

/// Comparisons do not chain: `a < b < c` is rejected.
fn comparison_expr(input: &str) -> IResult<&str, Expression> {
    let (i, left) = additive_expr(input)?;
    let (i, rest) = opt(pair(ws(comparison_op), additive_expr)).parse(i)?;
    match rest {
        Some((op, right)) => Ok((i, Expression::binary(left, op, right))),
        None => Ok((i, left)),
    }
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('+'), |_| BinaryOperator::Plus),
        map(char('-'), |_| BinaryOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('*'), |_| BinaryOperator::Multiply),
        map(char('/'), |_| BinaryOperator::Divide),
        map(char('%'), |_| BinaryOperator::Modulo),
    ))
    .parse(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(unary_expr, multiplicative_op)(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(char('-')), unary_expr), |expr| Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(expr),
        }),
        primary_expr,
    ))
    .parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        map(literal, Expression::Literal),
        delimited(ws(char('(')), expression, ws(char(')'))),
        map(preceded(ws(keyword("paths")), path_query), Expression::Paths),
        map(preceded(ws(keyword("values")), path_query), Expression::Values),
        pval_expr,
        map(tag("$#"), |_| Expression::CurrentValueSize),
        map(preceded(char('$'), many0(step)), Expression::CurrentValue),
        map(preceded(char('#'), location), Expression::VectorSize),
        map(location, Expression::Variable),
    )))
    .parse(input)
}

// --- Query Forms ---

fn path_query(input: &str) -> IResult<&str, PathQuery> {
    let (i, start) = variable_name(input)?;
    let (i, steps) = many0(step).parse(i)?;
    let (i, predicate) = opt(preceded(ws(keyword("where")), expression)).parse(i)?;
    let query = PathQuery::new(Location::variable(start), steps);
    Ok((
        i,
        match predicate {
            Some(predicate) => query.with_where(predicate),
            None => query,
        },
    ))
}

fn pval_expr(input: &str) -> IResult<&str, Expression> {
    let (i, _) = keyword("pval")(input)?;
    let (i, source) = delimited(ws(char('(')), expression, ws(char(')'))).parse(i)?;
    let (i, suffix) = many0(alt((
        map(preceded(char('.'), field_name), Step::Field),
        map(delimited(char('['), index, char(']')), Step::ArrayIndex),
    )))
    .parse(i)?;
    Ok((
        i,
        Expression::Pval {
            source: Box::new(source),
            suffix,
        },
    ))
}

// --- Path Parsers ---

fn step(input: &str) -> IResult<&str, Step> {
    alt((
        preceded(
            tag(".."),
            alt((
                map(char('*'), |_| Step::RecursiveWildcard),
                map(field_name, Step::RecursiveField),
            )),
        ),
        preceded(
            char('.'),
            alt((
                map(char('*'), |_| Step::FieldWildcard),
                map(field_name, Step::Field),
            )),
        ),
        delimited(
            char('['),
            alt((map(char('*'), |_| Step::ArrayWildcard), map(index, Step::ArrayIndex))),
            char(']'),
        ),
    ))
    .parse(input)
}

fn location(input: &str) -> IResult<&str, Location> {
    let (i, name) = variable_name(input)?;
    let (i, first_index) = opt(delimited(char('['), index, char(']'))).parse(i)?;
    let (i, rest) = many0(preceded(
        char('.'),
        pair(field_name, opt(delimited(char('['), index, char(']')))),
    ))
    .parse(i)?;

    let mut segments = vec![Segment {
        name,
        index: first_index,
    }];
    segments.extend(rest.into_iter().map(|(name, index)| Segment { name, index }));
    Ok((i, Location::new(segments)))
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>).parse(input)
}

// --- Name Parsers ---

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))
    .parse(input)
}

/// A top-level variable name: an identifier that is not a keyword.
fn variable_name(input: &str) -> IResult<&str, String> {
    map(
        verify(identifier, |name: &str| !KEYWORDS.contains(&name)),
        str::to_string,
    )
    .parse(input)
}

/// A field name after `.`: an identifier (keywords allowed) or a quoted string.
fn field_name(input: &str) -> IResult<&str, String> {
    alt((string_literal, map(identifier, str::to_string))).parse(input)
}

// --- Literal Parsers ---

fn literal(input: &str) -> IResult<&str, Scalar> {
    alt((
        map(keyword("true"), |_| Scalar::Bool(true)),
        map(keyword("false"), |_| Scalar::Bool(false)),
        map(string_literal, Scalar::Str),
        number,
    ))
    .parse(input)
}

/// `42` is an int (a long if it does not fit), `42L` a long, `4.2` a double.
fn number(input: &str) -> IResult<&str, Scalar> {
    let (i, text) = recognize(pair(digit1, opt(pair(char('.'), digit1)))).parse(input)?;
    let (i, long_suffix) = opt(char('L')).parse(i)?;
    let (i, _) = not(satisfy(is_ident_char)).parse(i)?;

    let scalar = if text.contains('.') {
        text.parse::<f64>().map(Scalar::Double).ok()
    } else {
        text.parse::<i64>().ok().map(|n| match (long_suffix, i32::try_from(n)) {
            (None, Ok(int)) => Scalar::Int(int),
            _ => Scalar::Long(n),
        })
    };
    scalar
        .map(|s| (i, s))
        .ok_or_else(|| nom::Err::Error(Error::new(input, ErrorKind::Digit)))
}

/// A double-quoted string. `\n`, `\t`, `\"` and `\\` are unescaped.
fn string_literal(input: &str) -> IResult<&str, String> {
    let Some(body) = input.strip_prefix('"') else {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    };
    let mut text = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((&body[i + 1..], text)),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            _ => text.push(c),
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Escaped)))
}
