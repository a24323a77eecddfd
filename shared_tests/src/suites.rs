//! Suites of tests applied across multiple resolver types


use pretty_assertions::assert_eq;

use callex::{Error, Resolver, evaluate, evaluate_args};

use super::*;
use crate::handlers::TestError;


type Expected = Result<Shape<i64>, Error<TestError>>;

fn num(n: i64) -> Expected {
    Ok(Shape::Extra(n))
}

fn text(s: &str) -> Expected {
    Ok(raw(s))
}

fn err(e: TestError) -> Expected {
    Err(Error::Handler(e))
}

fn unbound(name: &str) -> Expected {
    err(TestError::Unbound(name.to_owned()))
}


/// Basic test suite that checks the syntax, the laziness of argument
/// evaluation, recursive resolution of names, and the errors.  The resolver
/// must bind [`handlers::bindings`] and make errors for unbound names with
/// [`handlers::unbound`].
pub fn test_suite0<'s, R>(r: &R)
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    macro_rules! test {
        ($input:expr => $expected:expr) => {
            assert_eq!(shape::<R>(evaluate(r, $input)), $expected, "input: {:?}",
                       String::from_utf8_lossy($input))
        };
    }

    // Atomic
    test!(b"" => text(""));
    test!(b"a" => text("a"));
    test!(b" a b " => text(" a b "));
    test!(b"a(b|c)" => text("a(b|c)"));
    test!(b"a)" => text("a)"));
    test!(b"|" => text("|"));
    test!(br"\(x" => text(r"\(x"));
    test!(br"\" => text(r"\"));
    test!("λ▷".as_bytes() => text("λ▷"));

    // Calls
    test!(b"(add)" => num(0));
    test!(b"(add|)" => err(TestError::NotANumber(String::new())));
    test!(b"(add|1)" => num(1));
    test!(b"(add|1|2|3)" => num(6));
    test!(b"(add|1|(add|2|3)|(num|4))" => num(10));
    test!(b"(add|-1|(add|(add|(add|(add|-2)))))" => num(-3));
    test!(b"(id|x)" => text("x"));
    test!(b"(id|)" => text(""));
    test!(b"(id|(id|(id|deep)))" => text("deep"));
    test!(br"(id|a\|b)" => text(r"a\|b"));
    test!(br"(id|a\(b\)c)" => text(r"a\(b\)c"));
    test!(br"(id|\\)" => text(r"\\"));
    test!(b"(id)" => err(TestError::Arity { expected: 1, got: 0 }));
    test!(b"(id|a|b|c)" => err(TestError::Arity { expected: 1, got: 3 }));
    test!(b"(num|x)" => err(TestError::NotANumber("x".into())));
    test!(b"(num|(adder))" => err(TestError::HandlerArg));

    // Absent versus empty arguments
    test!(b"(count)" => num(0));
    test!(b"(count|)" => num(1));
    test!(b"(count||)" => num(2));
    test!(b"(count|||)" => num(3));
    test!(b"(count|a|(count|b|c)|d)" => num(3));
    test!(br"(count|a\|b|c)" => num(2));
    test!(b"(quote)" => text(""));

    // Arguments are evaluated only by handlers that want them
    test!(b"(quote|(nope)|x)" => text("(nope)|x"));
    test!(b"(quote|(x|y))" => text("(x|y)"));
    test!(b"(quote|))" => text(")"));
    test!(b"(quote|(()" => text("(("));
    test!(b"(first|a|(nope))" => text("a"));
    test!(b"(first|a|))" => text("a"));
    test!(b"(first|a|(()" => text("a"));
    test!(b"(first|(nope)|a)" => unbound("nope"));
    test!(b"(fail|(nope))" => err(TestError::Boom));
    test!(b"(fail|)|(|)" => err(TestError::Boom));
    test!(b"(count|a|(fail)|(nope))" => err(TestError::Boom));
    test!(b"(count|a|(nope)|(fail))" => unbound("nope"));

    // Names that are calls
    test!(b"((adder)|1|2)" => num(3));
    test!(b"((adder))" => num(0));
    test!(b"(((adder)))" => Err(Error::NotAFunction));
    test!(b"((id|x)|y)" => Err(Error::NotAFunction));
    test!(b"((add|1)|y)" => Err(Error::NotAFunction));
    test!(b"(()|y)" => unbound(""));
    test!(b"((nope)|y)" => unbound("nope"));
    test!(b"((fail|x)|y)" => err(TestError::Boom));
    test!(b"((adder|(x)|1)" => Err(Error::MismatchedOpenBracket));

    // Names that are not bound
    test!(b"()" => unbound(""));
    test!(b"(nope)" => unbound("nope"));
    test!(b"(nope|1)" => unbound("nope"));
    test!(b"( add|1)" => unbound(" add"));
    test!(br"(a\dd|1)" => unbound(r"a\dd"));

    // Structural errors
    test!(b"(" => Err(Error::MissingCloseBracket));
    test!(b"(x" => Err(Error::MissingCloseBracket));
    test!(b"(add|1" => Err(Error::MissingCloseBracket));
    test!(b"(add|1|(add|2)" => Err(Error::MismatchedOpenBracket));
    test!(br"(add|1\)" => num(1));
    test!(b"(x))" => Err(Error::MismatchedCloseBracket));
    test!(b"((x)" => Err(Error::MismatchedOpenBracket));
    test!(b"(add|(1)))" => Err(Error::MismatchedCloseBracket));
    test!(b"(add|(1|2)" => Err(Error::MismatchedOpenBracket));
    test!(b"(add|()" => Err(Error::MismatchedOpenBracket));
    test!(b"(add|1)|2)" => Err(Error::MismatchedCloseBracket));
    test!(b"(add|(num|1)x)" => Err(Error::MissingCloseBracket));
}

/// Test suite for the argument list evaluator on its own, with the same
/// bindings as [`test_suite0`].
pub fn test_suite_args<'s, R>(r: &R)
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    macro_rules! test {
        ($args:expr => $expected:expr) => {
            assert_eq!(evaluate_args(r, $args)
                           .map(|vals| vals.into_iter()
                                           .map(|v| shape::<R>(Ok(v)))
                                           .collect::<Vec<_>>()),
                       $expected,
                       "args: {:?}", $args.map(String::from_utf8_lossy))
        };
    }

    let none: Option<&[u8]> = None;
    test!(none => Ok(vec![]));
    test!(Some(&b""[..]) => Ok(vec![text("")]));
    test!(Some(&b"|"[..]) => Ok(vec![text(""), text("")]));
    test!(Some(&b"a|b"[..]) => Ok(vec![text("a"), text("b")]));
    test!(Some(&b"(add|1|2)|b|(quote|x|y)"[..]) => Ok(vec![num(3), text("b"), text("x|y")]));
    test!(Some(&br"a\|b|\(|\)"[..]) => Ok(vec![text(r"a\|b"), text(r"\("), text(r"\)")]));
    test!(Some(&b"(adder)"[..]) => Ok(vec![Ok(Shape::Handler)]));
    test!(Some(&b"a|(nope)|(fail)"[..]) => Err(Error::Handler(TestError::Unbound("nope".into()))));
    test!(Some(&b"a|b)|c"[..]) => Err(Error::MismatchedCloseBracket));
    test!(Some(&b"a|(b|c"[..]) => Err(Error::MismatchedOpenBracket));
    test!(Some(&b"a|(b)c"[..]) => Err(Error::MissingCloseBracket));
}

/// Test suite for the nesting limit.  The resolver must have the bindings of
/// [`test_suite0`] and a nesting limit of at least 2.
pub fn test_suite_nesting<'s, R>(r: &R)
    where R: Resolver<'s, Extra = i64, HandlerError = TestError> + ?Sized,
{
    fn nested(depth: usize) -> Vec<u8> {
        let mut expr = b"1".to_vec();
        for _ in 0 .. depth {
            let parts: [&[u8]; 3] = [b"(add|", &expr, b")"];
            expr = parts.concat();
        }
        expr
    }

    fn nested_name(depth: usize) -> Vec<u8> {
        let mut expr = b"adder".to_vec();
        for _ in 0 .. depth {
            let parts: [&[u8]; 3] = [b"(", &expr, b")"];
            expr = parts.concat();
        }
        expr
    }

    let limit = r.nesting_limit();
    assert!(limit >= 2);

    // Calls of calls are nested one deeper than their outer argument list, so
    // the outermost scan sees one less than the depth.
    let ok = nested(limit + 1);
    let deep = nested(limit + 2);
    // The input must outlive `'s`, which only a leak can give here.
    let ok: &'s [u8] = Box::leak(ok.into_boxed_slice());
    let deep: &'s [u8] = Box::leak(deep.into_boxed_slice());
    assert_eq!(shape::<R>(evaluate(r, ok)), num(1));
    assert_eq!(shape::<R>(evaluate(r, deep)), Err(Error::NestingTooDeep { limit }));

    // A name nested as deep as allowed within its call's scan
    let name = [&b"("[..], &nested_name(limit)[..], &b"|1|2)"[..]].concat();
    let name: &'s [u8] = Box::leak(name.into_boxed_slice());
    assert_eq!(shape::<R>(evaluate(r, name)), Err(Error::NotAFunction));
    let name = [&b"("[..], &nested_name(limit + 1)[..], &b"|1|2)"[..]].concat();
    let name: &'s [u8] = Box::leak(name.into_boxed_slice());
    assert_eq!(shape::<R>(evaluate(r, name)), Err(Error::NestingTooDeep { limit }));
}
