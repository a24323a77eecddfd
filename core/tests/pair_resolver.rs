use callex_core::{
    Error, Value, Resolver, evaluate, iter_args,
    resolver::premade::PairResolver,
};
use callex_shared_tests::{
    handlers::{TestError, Bindings, bindings, unbound},
    suites::{test_suite0, test_suite_args, test_suite_nesting},
};
use tracing_subscriber::{util::SubscriberInitExt as _, EnvFilter, FmtSubscriber};


#[ctor::ctor]
fn init_tests() {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .init();
}


type PR<'p, 's> = PairResolver<'p, 's, i64, TestError>;


#[test]
fn suite0() {
    let pairs: Bindings<'_, PR<'_, '_>> = bindings();
    let r = PR::new(&pairs, unbound);
    test_suite0(&r);
}

#[test]
fn suite_args() {
    let pairs: Bindings<'_, PR<'_, '_>> = bindings();
    let r = PR::new(&pairs, unbound);
    test_suite_args(&r);
}

#[test]
fn suite_nesting() {
    let pairs: Bindings<'_, PR<'_, '_>> = bindings();
    let mut r = PR::new(&pairs, unbound);
    test_suite_nesting(&r);
    r.nesting_limit = 2;
    test_suite_nesting(&r);
    r.nesting_limit = 7;
    test_suite_nesting(&r);
}

#[test]
fn stack_only() {
    // Handlers that keep their results on the stack, without allocation.
    fn sum_digits<'p, 's>(r: &PR<'p, 's>, args: Option<&'s [u8]>)
                          -> callex_core::OutcomeOf<'s, PR<'p, 's>>
    {
        let mut sum = 0;
        for value in iter_args(r, args) {
            match value? {
                Value::Raw(raw) => sum += raw.iter()
                                             .filter(|b| b.is_ascii_digit())
                                             .map(|b| i64::from(b - b'0'))
                                             .sum::<i64>(),
                Value::Extra(n) => sum += n,
                Value::Handler(_) => return Err(Error::Handler(TestError::HandlerArg)),
            }
        }
        Ok(Value::Extra(sum))
    }

    let pairs: [callex_core::resolver::premade::PairBinding<'_, '_, i64, TestError>; 1] =
        [(b"sum", sum_digits)];
    let r = PR::new(&pairs, unbound);
    assert!(matches!(evaluate(&r, b"(sum|12|(sum|3|4x5))"), Ok(Value::Extra(15))));
    assert!(matches!(evaluate(&r, b"(add|1)"),
                     Err(Error::Handler(TestError::Unbound(name))) if name == "add"));
    assert!(r.lookup(b"sum").invoke(&r, None).is_ok());
}
