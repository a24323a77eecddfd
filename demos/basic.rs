//! A calculator whose handlers keep their state in the resolver, evaluate
//! their arguments only as needed, and produce values of their own type.

use std::collections::HashMap;

use callex::{
    Error, Handler, Value, Resolver, HandlerOf, OutcomeOf,
    evaluate, evaluate_args, iter_args,
    escape::{escape, unescape},
};

/// Extends the types of values that our handlers produce.
#[derive(Debug)]
enum Val {
    Num(f64),
    Text(String),
}

/// The errors of our handlers.
#[derive(Debug, thiserror::Error)]
enum CalcError {
    #[error("no such handler: {0}")]
    Unbound(String),
    #[error("no such variable: {0}")]
    NoVar(String),
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("expected text")]
    NotText,
}

/// Our resolver.  Handlers find their state here, e.g. the variables.
struct Calc {
    vars: HashMap<Vec<u8>, f64>,
}

type Outcome<'s> = OutcomeOf<'s, Calc>;

fn num(value: OutcomeOf<'_, Calc>) -> Result<f64, Error<CalcError>> {
    match value? {
        Value::Extra(Val::Num(n)) => Ok(n),
        Value::Raw(raw) => {
            let text = String::from_utf8_lossy(&unescape(raw)).into_owned();
            text.trim().parse().map_err(|_| CalcError::NotANumber(text).into())
        }
        other => Err(CalcError::NotANumber(format!("{other:?}")).into()),
    }
}

fn text(value: OutcomeOf<'_, Calc>) -> Result<String, Error<CalcError>> {
    match value? {
        Value::Raw(raw) => Ok(String::from_utf8_lossy(&unescape(raw)).into_owned()),
        Value::Extra(Val::Text(s)) => Ok(s),
        Value::Extra(Val::Num(n)) => Ok(n.to_string()),
        Value::Handler(_) => Err(CalcError::NotText.into()),
    }
}

fn sum<'s>(calc: &Calc, args: Option<&'s [u8]>) -> Outcome<'s> {
    let mut total = 0.0;
    for value in iter_args(calc, args) {
        total += num(value)?;
    }
    Ok(Value::Extra(Val::Num(total)))
}

fn product<'s>(calc: &Calc, args: Option<&'s [u8]>) -> Outcome<'s> {
    iter_args(calc, args)
        .try_fold(1.0, |acc, value| -> Result<f64, Error<CalcError>> { Ok(acc * num(value)?) })
        .map(|n| Value::Extra(Val::Num(n)))
}

fn var<'s>(calc: &Calc, args: Option<&'s [u8]>) -> Outcome<'s> {
    let name = text(iter_args(calc, args).next().unwrap_or(Ok(Value::Raw(b""))))?;
    calc.vars.get(name.as_bytes())
        .map(|&n| Value::Extra(Val::Num(n)))
        .ok_or_else(|| CalcError::NoVar(name).into())
}

fn upper<'s>(calc: &Calc, args: Option<&'s [u8]>) -> Outcome<'s> {
    let mut out = String::new();
    for value in evaluate_args(calc, args)? {
        out += &text(Ok(value))?.to_uppercase();
    }
    Ok(Value::Extra(Val::Text(out)))
}

/// Evaluates its second argument only when its first is positive.
fn if_positive<'s>(calc: &Calc, args: Option<&'s [u8]>) -> Outcome<'s> {
    let mut args = iter_args(calc, args);
    let test = num(args.next().unwrap_or(Ok(Value::Raw(b"0"))))?;
    if test > 0.0 {
        args.next().unwrap_or(Ok(Value::Raw(b"")))
    } else {
        Ok(Value::Raw(b""))
    }
}

/// Returns a handler, for names that are calls.
fn op<'s>(calc: &Calc, args: Option<&'s [u8]>) -> Outcome<'s> {
    let which = text(iter_args(calc, args).next().unwrap_or(Ok(Value::Raw(b""))))?;
    Ok(Value::Handler(calc.lookup(if which == "*" { b"*" } else { b"+" })))
}

impl<'s> Resolver<'s> for Calc {
    type Extra = Val;
    type HandlerError = CalcError;

    fn lookup(&self, name: &'s [u8]) -> HandlerOf<'s, Self> {
        match name {
            b"+" => Handler::Func(sum),
            b"*" => Handler::Func(product),
            b"var" => Handler::Func(var),
            b"upper" => Handler::Func(upper),
            b"if+" => Handler::Func(if_positive),
            b"op" => Handler::Func(op),
            _ => Handler::Fail(Error::Handler(
                CalcError::Unbound(String::from_utf8_lossy(name).into_owned()))),
        }
    }
}

fn show(calc: &Calc, input: &[u8]) {
    println!("{} => {:?}", String::from_utf8_lossy(input), evaluate(calc, input));
}

fn main() {
    let calc = Calc { vars: HashMap::from([(b"x".to_vec(), 3.0), (b"y".to_vec(), 0.5)]) };

    show(&calc, b"just text");
    show(&calc, b"(+|1|2|(*|3|(var|x)))");
    show(&calc, b"(upper|hello, |(+|1|1)| worlds)");
    show(&calc, b"((op|*)|2|(var|y))");
    show(&calc, b"(if+|(var|x)|yes)");
    show(&calc, b"(if+|-1|(never evaluated|)|)");
    show(&calc, b"(var|z)");
    show(&calc, b"(+|1|(2)");
    show(&calc, b"(+|1))");

    // Escaping makes any text an atomic argument.
    let arg = escape(b"a (tricky) | value");
    let parts: [&[u8]; 3] = [b"(upper|", &arg, b")"];
    show(&calc, &parts.concat());
}
