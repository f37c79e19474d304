use nom::{
    IResult, Parser,
    bytes::complete::is_not,
    character::complete::multispace0,
    multi::many0,
    sequence::preceded,
};

// ── Low-level nom parsers ──────────────────────────────────────────────────

/// A single whitespace-delimited token. The pipe delimiter never reaches
/// this parser (the splitter consumes it first) but is excluded anyway.
pub fn parse_token(input: &str) -> IResult<&str, String> {
    let (input, content) = is_not(" \t\r\n|")(input)?;
    // The byte class above only stops at ASCII whitespace; trimming here
    // also strips any other embedded leading/trailing whitespace.
    Ok((input, content.trim().to_string()))
}

/// All tokens of one stage, in input order. Runs of whitespace collapse and
/// tokens that end up empty are discarded, so the result never contains
/// empty strings.
pub fn parse_tokens(input: &str) -> IResult<&str, Vec<String>> {
    let (input, tokens) = many0(preceded(multispace0, parse_token)).parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, tokens.into_iter().filter(|t| !t.is_empty()).collect()))
}
