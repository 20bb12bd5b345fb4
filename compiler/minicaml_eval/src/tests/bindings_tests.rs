//! Tests for binding forms, laziness, recursion and declarations.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use minicaml_ir::{Expr, LetBinding};
use pretty_assertions::assert_eq;

use crate::{
    eval, CallStack, Environment, ErrorCategory, EvalConfig, EvalErrorKind, Evaluator,
    LazyStrategy, Thunk, Value,
};

fn boom() -> Expr {
    Expr::head(Expr::list(Vec::<Expr>::new()))
}

fn fib_lambda() -> Expr {
    let n = || Expr::symbol("n");
    let call = |k| Expr::apply(Expr::symbol("fib"), [Expr::sub(n(), Expr::int(k))]);
    Expr::lambda(
        ["n"],
        Expr::if_(Expr::lt(n(), Expr::int(2)), n(), Expr::add(call(1), call(2))),
    )
}

fn fib_call(k: i64) -> Expr {
    Expr::apply(Expr::symbol("fib"), [Expr::int(k)])
}

mod eager {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn let_binds_for_body() {
        let expr = Expr::let_(
            vec![LetBinding::new("x", Expr::int(2))],
            Expr::mul(Expr::symbol("x"), Expr::symbol("x")),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(4));
    }

    #[test]
    fn nested_let_shadows() {
        let expr = Expr::let_(
            vec![LetBinding::new("x", Expr::int(1))],
            Expr::let_(vec![LetBinding::new("x", Expr::int(2))], Expr::symbol("x")),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(2));
    }

    #[test]
    fn bindings_of_one_let_do_not_see_each_other() {
        let expr = Expr::let_(
            vec![
                LetBinding::new("a", Expr::int(1)),
                LetBinding::new("b", Expr::symbol("a")),
            ],
            Expr::symbol("b"),
        );
        let err = eval(expr).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UnboundVariable {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn bindings_see_the_outer_scope() {
        let expr = Expr::let_(
            vec![LetBinding::new("a", Expr::int(1))],
            Expr::let_(
                vec![
                    LetBinding::new("a", Expr::int(5)),
                    LetBinding::new("b", Expr::symbol("a")),
                ],
                Expr::add(Expr::symbol("a"), Expr::symbol("b")),
            ),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(6));
    }

    #[test]
    fn eager_binding_of_failing_expression_fails() {
        let expr = Expr::let_(vec![LetBinding::new("x", boom())], Expr::int(1));
        assert_eq!(eval(expr).unwrap_err().category(), ErrorCategory::List);
    }
}

mod lazy {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unused_lazy_binding_is_never_evaluated() {
        let expr = Expr::let_lazy(vec![LetBinding::new("x", boom())], Expr::int(1));
        assert_eq!(eval(expr).unwrap(), Value::Int(1));
    }

    #[test]
    fn used_lazy_binding_fails_on_use() {
        let expr = Expr::let_lazy(vec![LetBinding::new("x", boom())], Expr::symbol("x"));
        assert_eq!(eval(expr).unwrap_err().category(), ErrorCategory::List);
    }

    #[test]
    fn thunk_uses_its_own_environment() {
        // let x = 1 in let lazy y = x in let x = 2 in y  ==>  1
        let expr = Expr::let_(
            vec![LetBinding::new("x", Expr::int(1))],
            Expr::let_lazy(
                vec![LetBinding::new("y", Expr::symbol("x"))],
                Expr::let_(vec![LetBinding::new("x", Expr::int(2))], Expr::symbol("y")),
            ),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(1));
    }

    fn force_twice(lazy: LazyStrategy) -> Thunk {
        let thunk = Thunk::new(
            Arc::new(Expr::add(Expr::int(20), Expr::int(22))),
            Environment::new(),
        );
        let env = Environment::new().bind_thunk("x".into(), thunk.clone());
        let evaluator = Evaluator::with_config(EvalConfig::new().with_lazy(lazy));
        let body = Arc::new(Expr::add(Expr::symbol("x"), Expr::symbol("x")));
        let value = evaluator.eval(&body, &env, &CallStack::new()).unwrap();
        assert_eq!(value, Value::Int(84));
        thunk
    }

    #[test]
    fn by_name_does_not_memoize() {
        assert!(force_twice(LazyStrategy::ByName).forced().is_none());
    }

    #[test]
    fn by_need_memoizes() {
        let thunk = force_twice(LazyStrategy::ByNeed);
        assert_eq!(thunk.forced(), Some(&Value::Int(42)));
    }

    #[test]
    fn by_need_agrees_with_by_name() {
        let expr = Expr::let_lazy(
            vec![LetBinding::new("x", Expr::mul(Expr::int(6), Expr::int(7)))],
            Expr::add(Expr::symbol("x"), Expr::symbol("x")),
        );
        let by_need = Evaluator::with_config(EvalConfig::new().with_lazy(LazyStrategy::ByNeed));
        assert_eq!(by_need.eval_program(expr.clone()).unwrap(), Value::Int(84));
        assert_eq!(eval(expr).unwrap(), Value::Int(84));
    }
}

mod recursion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn letrec_fib() {
        let expr = Expr::let_rec("fib", fib_lambda(), fib_call(10));
        assert_eq!(eval(expr).unwrap(), Value::Int(55));
    }

    #[test]
    fn letreclazy_fib() {
        let expr = Expr::let_rec_lazy("fib", fib_lambda(), fib_call(10));
        assert_eq!(eval(expr).unwrap(), Value::Int(55));
    }

    #[test]
    fn letreclazy_fib_by_need() {
        let expr = Expr::let_rec_lazy("fib", fib_lambda(), fib_call(10));
        let evaluator = Evaluator::with_config(EvalConfig::new().with_lazy(LazyStrategy::ByNeed));
        assert_eq!(evaluator.eval_program(expr).unwrap(), Value::Int(55));
    }

    #[test]
    fn letrec_requires_a_lambda() {
        let err = eval(Expr::let_rec("x", Expr::int(1), Expr::symbol("x"))).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::WrongBindingList {
                name: "x".to_string()
            }
        );
        assert_eq!(err.category(), ErrorCategory::WrongBindingList);
    }

    #[test]
    fn letreclazy_requires_a_lambda_even_unused() {
        let err = eval(Expr::let_rec_lazy("x", Expr::int(1), Expr::int(0))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::WrongBindingList);
    }

    #[test]
    fn recursive_closure_value() {
        let expr = Expr::let_rec("fib", fib_lambda(), Expr::symbol("fib"));
        let value = eval(expr).unwrap();
        assert_eq!(value.type_name(), "recursive closure");
        assert_eq!(value.to_string(), "fib = (rec fun n -> ...)");
    }

    #[test]
    fn partially_applied_recursive_closure_keeps_self() {
        // let rec sum = fun acc n -> if n < 1 then acc else sum (acc + n) (n - 1)
        let body = Expr::if_(
            Expr::lt(Expr::symbol("n"), Expr::int(1)),
            Expr::symbol("acc"),
            Expr::apply(
                Expr::symbol("sum"),
                [
                    Expr::add(Expr::symbol("acc"), Expr::symbol("n")),
                    Expr::sub(Expr::symbol("n"), Expr::int(1)),
                ],
            ),
        );
        let expr = Expr::let_rec(
            "sum",
            Expr::lambda(["acc", "n"], body),
            Expr::let_(
                vec![LetBinding::new(
                    "from_zero",
                    Expr::apply(Expr::symbol("sum"), [Expr::int(0)]),
                )],
                Expr::apply(Expr::symbol("from_zero"), [Expr::int(4)]),
            ),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(10));
    }

    #[test]
    fn parameter_shadows_self_name() {
        let expr = Expr::let_rec(
            "f",
            Expr::lambda(["f"], Expr::symbol("f")),
            Expr::apply(Expr::symbol("f"), [Expr::int(3)]),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(3));
    }

    #[test]
    fn recursive_arity_error_names_function() {
        let expr = Expr::let_rec(
            "fib",
            fib_lambda(),
            Expr::apply(Expr::symbol("fib"), [Expr::int(1), Expr::int(2)]),
        );
        let err = eval(expr).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::ArityMismatch {
                name: "fib".to_string(),
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn deep_recursion_grows_the_stack() {
        // let rec count = fun n -> if n = 0 then 0 else 1 + count (n - 1) in count 20000
        let body = Expr::if_(
            Expr::equals(Expr::symbol("n"), Expr::int(0)),
            Expr::int(0),
            Expr::add(
                Expr::int(1),
                Expr::apply(
                    Expr::symbol("count"),
                    [Expr::sub(Expr::symbol("n"), Expr::int(1))],
                ),
            ),
        );
        let expr = Expr::let_rec(
            "count",
            Expr::lambda(["n"], body),
            Expr::apply(Expr::symbol("count"), [Expr::int(20_000)]),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(20_000));
    }
}

mod declarations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn def_is_visible_to_later_elements() {
        let expr = Expr::sequence([
            Expr::Def(vec![LetBinding::new("x", Expr::int(4))]),
            Expr::add(Expr::symbol("x"), Expr::int(1)),
        ]);
        assert_eq!(eval(expr).unwrap(), Value::Int(5));
    }

    #[test]
    fn defrec_in_sequence() {
        let expr = Expr::sequence([
            Expr::Defrec(LetBinding::new("fib", fib_lambda())),
            fib_call(10),
        ]);
        assert_eq!(eval(expr).unwrap(), Value::Int(55));
    }

    #[test]
    fn defreclazy_in_sequence() {
        let expr = Expr::sequence([
            Expr::Defreclazy(LetBinding::new("fib", fib_lambda())),
            fib_call(7),
        ]);
        assert_eq!(eval(expr).unwrap(), Value::Int(13));
    }

    #[test]
    fn deflazy_defers_evaluation() {
        let expr = Expr::sequence([
            Expr::Deflazy(vec![LetBinding::new("x", boom())]),
            Expr::int(2),
        ]);
        assert_eq!(eval(expr).unwrap(), Value::Int(2));
    }

    #[test]
    fn trailing_declaration_yields_unit() {
        let expr = Expr::sequence([Expr::Def(vec![LetBinding::new("x", Expr::int(1))])]);
        assert_eq!(eval(expr).unwrap(), Value::Unit);
    }

    #[test]
    fn declaration_outside_sequence_yields_unit() {
        let expr = Expr::Def(vec![LetBinding::new("x", Expr::int(1))]);
        assert_eq!(eval(expr).unwrap(), Value::Unit);
        let err = eval(Expr::Def(vec![LetBinding::new("x", boom())])).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::List);
    }

    #[test]
    fn failing_declaration_has_its_own_frame() {
        let def = Expr::Def(vec![LetBinding::new("x", boom())]);
        let expr = Expr::sequence([def.clone(), Expr::symbol("x")]);
        let backtrace = eval(expr).unwrap_err().backtrace.unwrap();
        let exprs: Vec<&str> = backtrace.frames().iter().map(|f| f.expr.as_str()).collect();
        assert_eq!(backtrace.len(), 3);
        assert_eq!(exprs[0], "head []");
        assert_eq!(exprs[1], def.to_string());
    }

    #[test]
    fn declaration_frames_count_toward_max_depth() {
        let expr = Arc::new(Expr::sequence([
            Expr::Def(vec![LetBinding::new("x", Expr::int(1))]),
            Expr::symbol("x"),
        ]));
        let shallow = Evaluator::with_config(EvalConfig::new().with_max_depth(2));
        let err = shallow.eval_program(Arc::clone(&expr)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 2 });

        let roomy = Evaluator::with_config(EvalConfig::new().with_max_depth(3));
        assert_eq!(roomy.eval_program(expr).unwrap(), Value::Int(1));
    }

    #[test]
    fn declarations_do_not_leak_out_of_sequence() {
        let expr = Expr::sequence([
            Expr::sequence([
                Expr::Def(vec![LetBinding::new("x", Expr::int(1))]),
                Expr::symbol("x"),
            ]),
            Expr::symbol("x"),
        ]);
        assert_eq!(eval(expr).unwrap_err().category(), ErrorCategory::UnboundVariable);
    }
}

#[test]
fn closure_captures_defining_environment() {
    // let y = 10 in let f = fun x -> x + y in let y = 0 in f 5  ==>  15
    let expr = Expr::let_(
        vec![LetBinding::new("y", Expr::int(10))],
        Expr::let_(
            vec![LetBinding::new(
                "f",
                Expr::lambda(["x"], Expr::add(Expr::symbol("x"), Expr::symbol("y"))),
            )],
            Expr::let_(
                vec![LetBinding::new("y", Expr::int(0))],
                Expr::apply(Expr::symbol("f"), [Expr::int(5)]),
            ),
        ),
    );
    assert_eq!(eval(expr).unwrap(), Value::Int(15));
}
