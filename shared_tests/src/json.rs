//! A JSON-like codec built on the notation: values are encoded as calls of the
//! `json:*` handlers, and decoded by evaluating them with a resolver that binds
//! those names.
//!
//! Every number is an `f64`.  Map keys and strings are atomic arguments,
//! escaped when encoded and unescaped when decoded, so any text round-trips.

use std::{collections::BTreeMap, num::ParseFloatError, string::FromUtf8Error};

use tracing::debug;

use callex::{
    Error, Handler, Value, Resolver, HandlerOf, ValueOf, OutcomeOf,
    OPEN, CLOSE, PIPE,
    evaluate, evaluate_args,
    escape::{escape, unescape},
};


/// The values of the codec.
#[derive(Clone, PartialEq, Debug)]
pub enum Json {
    /// `(json:null)`
    Null,
    /// `(json:number|N)`
    Number(f64),
    /// `(json:string|S)`
    String(String),
    /// `(json:array|E|...)`
    Array(Vec<Json>),
    /// `(json:map|K|V|...)`
    Map(BTreeMap<String, Json>),
}

impl From<f64> for Json {
    fn from(n: f64) -> Self { Json::Number(n) }
}

impl From<&str> for Json {
    fn from(s: &str) -> Self { Json::String(s.to_owned()) }
}

impl From<String> for Json {
    fn from(s: String) -> Self { Json::String(s) }
}

impl From<Vec<Json>> for Json {
    fn from(v: Vec<Json>) -> Self { Json::Array(v) }
}

impl From<BTreeMap<String, Json>> for Json {
    fn from(m: BTreeMap<String, Json>) -> Self { Json::Map(m) }
}


/// The errors of the `json:*` handlers.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum JsonError {
    /// A name that is not one of ours
    #[error("json: unknown type: {0}")]
    UnknownType(String),
    /// `json:string` or `json:number` not given exactly one argument
    #[error("json: incorrect number of args")]
    IncorrectArgCount,
    /// An argument that is atomic where a value is expected, or vice versa
    #[error("json: incorrect type")]
    IncorrectType,
    /// `json:map` given a key without a value
    #[error("json:map expects even number of args")]
    OddMapArgs,
    /// `json:map` given a key that is not atomic
    #[error("json:map allows string keys only")]
    NonStringKey,
    /// `json:number` given something that does not parse
    #[error("json: {0}")]
    Number(#[from] ParseFloatError),
    /// An unescaped string or key that is not UTF-8
    #[error("json: {0}")]
    Utf8(#[from] FromUtf8Error),
}


/// Resolves the `json:*` names, and nothing else.
#[derive(Copy, Clone, Default, Debug)]
pub struct JsonResolver;

impl<'s> Resolver<'s> for JsonResolver {
    type Extra = Json;
    type HandlerError = JsonError;

    fn lookup(&self, name: &'s [u8]) -> HandlerOf<'s, Self> {
        lookup(name)
    }
}

/// Look up the handler of one of the `json:*` names.  Other names give a
/// handler that fails with [`JsonError::UnknownType`].  This is generic so
/// that other resolvers can delegate to it for the names they do not bind
/// themselves.
pub fn lookup<'s, R>(name: &[u8]) -> HandlerOf<'s, R>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    match name {
        b"json:null" => Handler::Func(null),
        b"json:number" => Handler::Func(number),
        b"json:string" => Handler::Func(string),
        b"json:array" => Handler::Func(array),
        b"json:map" => Handler::Func(map),
        _ => {
            let name = String::from_utf8_lossy(name).into_owned();
            debug!(%name, "unknown json type");
            Handler::Fail(Error::Handler(JsonError::UnknownType(name)))
        }
    }
}


/// Encode the value.
pub fn encode(json: &Json) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(&mut out, json);
    out
}

/// Encode the value, appending to the given buffer.
pub fn encode_into(out: &mut Vec<u8>, json: &Json) {
    fn arg(out: &mut Vec<u8>, bytes: &[u8]) {
        out.push(PIPE);
        out.extend_from_slice(bytes);
    }

    out.push(OPEN);
    match json {
        Json::Null => out.extend_from_slice(b"json:null"),
        Json::Number(n) => {
            out.extend_from_slice(b"json:number");
            arg(out, format!("{n:E}").as_bytes());
        }
        Json::String(s) => {
            out.extend_from_slice(b"json:string");
            arg(out, &escape(s.as_bytes()));
        }
        Json::Array(elems) => {
            out.extend_from_slice(b"json:array");
            for elem in elems {
                out.push(PIPE);
                encode_into(out, elem);
            }
        }
        Json::Map(entries) => {
            out.extend_from_slice(b"json:map");
            for (key, val) in entries {
                arg(out, &escape(key.as_bytes()));
                out.push(PIPE);
                encode_into(out, val);
            }
        }
    }
    out.push(CLOSE);
}

/// Decode the bytes by evaluating them with [`JsonResolver`].  They must
/// evaluate to a value of the codec, not to an atomic value.
pub fn decode(bytes: &[u8]) -> Result<Json, Error<JsonError>> {
    into_json::<JsonResolver>(evaluate(&JsonResolver, bytes)?)
}


fn into_json<'s, R>(value: ValueOf<'s, R>) -> Result<Json, Error<JsonError>>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    match value {
        Value::Extra(json) => Ok(json),
        Value::Raw(_) | Value::Handler(_) => Err(Error::Handler(JsonError::IncorrectType)),
    }
}

fn text(raw: &[u8]) -> Result<String, JsonError> {
    Ok(String::from_utf8(unescape(raw).into_owned())?)
}

/// The text of the single atomic argument.
fn single_text<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> Result<String, Error<JsonError>>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    let mut values = evaluate_args(resolver, args)?;
    if values.len() != 1 {
        return Err(JsonError::IncorrectArgCount.into());
    }
    match values.pop() {
        Some(Value::Raw(raw)) => Ok(text(raw)?),
        _ => Err(JsonError::IncorrectType.into()),
    }
}

fn null<'s, R>(_: &R, _: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    Ok(Value::Extra(Json::Null))
}

fn number<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    let n = single_text(resolver, args)?.parse::<f64>().map_err(JsonError::from)?;
    Ok(Value::Extra(Json::Number(n)))
}

fn string<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    Ok(Value::Extra(Json::String(single_text(resolver, args)?)))
}

fn array<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    let elems = evaluate_args(resolver, args)?
        .into_iter()
        .map(into_json::<R>)
        .collect::<Result<_, _>>()?;
    Ok(Value::Extra(Json::Array(elems)))
}

fn map<'s, R>(resolver: &R, args: Option<&'s [u8]>) -> OutcomeOf<'s, R>
    where R: Resolver<'s, Extra = Json, HandlerError = JsonError> + ?Sized,
{
    let values = evaluate_args(resolver, args)?;
    if values.len() % 2 != 0 {
        return Err(JsonError::OddMapArgs.into());
    }
    let mut entries = BTreeMap::new();
    let mut values = values.into_iter();
    while let (Some(key), Some(val)) = (values.next(), values.next()) {
        let Value::Raw(key) = key else {
            return Err(JsonError::NonStringKey.into());
        };
        let _ = entries.insert(text(key)?, into_json::<R>(val)?);
    }
    Ok(Value::Extra(Json::Map(entries)))
}
