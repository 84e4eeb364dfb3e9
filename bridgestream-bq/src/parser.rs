use nom::{
    character::complete::{char, digit1, none_of},
    Finish,
    IResult,
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while},
};
use anyhow::{anyhow, Result};
use crate::item::{Item, Layout};

const WHITESPACE: &str = " \t\r\n";
const SEPARATORS: &str = " \t\r\n,";
const B64_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn white(i: &str) -> IResult<&str, &str> {
    take_while(move |c| WHITESPACE.contains(c))(i)
}

fn sep(i: &str) -> IResult<&str, &str> {
    take_while(move |c| SEPARATORS.contains(c))(i)
}

// Values

fn keyword(i: &str) -> IResult<&str, Item> {
    alt((
            value(Item::Null, tag("null")),
            value(Item::Bool(true), tag("true")),
            value(Item::Bool(false), tag("false")),
    ))(i)
}

fn float(i: &str) -> IResult<&str, &str> {
    alt((
            tag("NaN"),
            tag("inf"),
            tag("-inf"),
            recognize(tuple((opt(tag("-")), opt(digit1), opt(tag(".")), opt(digit1)))),
    ))(i)
}

fn float32(i: &str) -> IResult<&str, f32> {
    map_res(preceded(tag("$"), float), |n: &str| n.parse())(i)
}

fn int(i: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(tag("-")), digit1)), |n: &str| n.parse())(i)
}

fn byte(i: &str) -> IResult<&str, u8> {
    map_res(preceded(tag("#"), digit1), |n: &str| n.parse())(i)
}

fn b64(i: &str) -> IResult<&str, &str> {
    recognize(tuple((take_while(move |c| B64_CHARS.contains(c)), opt(tag("=")), opt(tag("=")))))(i)
}

fn bytes(i: &str) -> IResult<&str, Vec<u8>> {
    map_res(preceded(tag(":"), b64), base64::decode)(i)
}

fn string(i: &str) -> IResult<&str, String> {
    delimited(
            tag("\""),
            map(opt(escaped_transform(
                none_of("\\\""),
                '\\',
                alt((
                        tag("\\"),
                        tag("\""),
                )))), Option::unwrap_or_default),
            tag("\"")
    )(i)
}

fn items(i: &str) -> IResult<&str, Vec<Item>> {
    terminated(many0(preceded(sep, item)), sep)(i)
}

fn item(i: &str) -> IResult<&str, Item> {
    alt((
        map(string, Item::Str),
        map(bytes, Item::Bytes),
        map(byte, Item::Byte),
        map(float32, Item::Float),
        map(int, Item::Int),
        keyword,
        map(delimited(char('['), items, char(']')), Item::List),
        map(delimited(char('{'), items, char('}')), Item::Frame),
        map(delimited(char('('), items, char(')')), Item::Tuple),
    ))(i)
}

/// Parse the textual form of a sequence of items, as printed when decoding.
pub fn parse_items(i: &str) -> Result<Vec<Item>> {
    Ok(all_consuming(items)(i).finish().map_err(|e| anyhow!("{}", e))?.1)
}

// Layouts

fn atom(i: &str) -> IResult<&str, Layout> {
    alt((
        value(Layout::Byte, tag("byte")),
        value(Layout::Bool, tag("bool")),
        value(Layout::I32, tag("i32")),
        value(Layout::F32, tag("f32")),
        value(Layout::Str, tag("str")),
        value(Layout::Bin, tag("bin")),
        value(Layout::Vec3, tag("vec3")),
        value(Layout::Quat, tag("quat")),
        // a list's element count is fixed, so `*` directly inside `[..]` is not accepted
        map(delimited(pair(char('['), white), atom, pair(white, char(']'))), |l| Layout::List(Box::new(l))),
        map(delimited(char('{'), layouts, char('}')), Layout::Frame),
    ))(i)
}

fn layout(i: &str) -> IResult<&str, Layout> {
    map(pair(atom, opt(char('*'))), |(l, repeat)| match repeat {
        Some(_) => Layout::Repeat(Box::new(l)),
        None => l,
    })(i)
}

fn layouts(i: &str) -> IResult<&str, Vec<Layout>> {
    terminated(many0(preceded(white, layout)), white)(i)
}

/// Parse a whitespace separated list of layouts, e.g. `i32 str {i32 [str]}*`.
pub fn parse_layouts(i: &str) -> Result<Vec<Layout>> {
    let layouts = all_consuming(layouts)(i).finish().map_err(|e| anyhow!("{}", e))?.1;
    if layouts.is_empty() {
        Err(anyhow!("empty layout"))
    } else {
        Ok(layouts)
    }
}
