//! Tests for expression dispatch: literals, data primitives, control flow,
//! combinators, backtraces and batch evaluation.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use minicaml_ir::{BinaryOp, Expr, LetBinding};
use pretty_assertions::assert_eq;

use crate::{
    eval, CallStack, Environment, ErrorCategory, EvalConfig, EvalErrorKind, Evaluator, Value,
};

fn ints(items: &[i64]) -> Value {
    Value::list(items.iter().copied().map(Value::Int))
}

fn int_list(items: &[i64]) -> Expr {
    Expr::list(items.iter().copied().map(Expr::int).collect::<Vec<_>>())
}

fn add_one() -> Expr {
    Expr::lambda(["x"], Expr::add(Expr::symbol("x"), Expr::int(1)))
}

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_evaluate_to_themselves() {
        assert_eq!(eval(Expr::Unit).unwrap(), Value::Unit);
        assert_eq!(eval(Expr::int(42)).unwrap(), Value::Int(42));
        assert_eq!(eval(Expr::bool(false)).unwrap(), Value::Bool(false));
        assert_eq!(eval(Expr::string("hi")).unwrap(), Value::string("hi"));
    }

    #[test]
    fn list_literal_evaluates_elements() {
        let expr = Expr::list(vec![Expr::int(1), Expr::add(Expr::int(1), Expr::int(1))]);
        assert_eq!(eval(expr).unwrap(), ints(&[1, 2]));
        assert_eq!(eval(int_list(&[])).unwrap(), ints(&[]));
    }

    #[test]
    fn dict_literal_with_repeated_key_keeps_position() {
        let expr = Expr::dict([
            (Expr::string("a"), Expr::int(1)),
            (Expr::string("b"), Expr::int(2)),
            (Expr::string("a"), Expr::int(3)),
        ]);
        assert_eq!(
            eval(expr).unwrap(),
            Value::dict([
                (Value::string("a"), Value::Int(3)),
                (Value::string("b"), Value::Int(2)),
            ])
        );
    }
}

mod symbols {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unbound_symbol() {
        let err = eval(Expr::symbol("nope")).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UnboundVariable {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn empty_symbol_is_unbound() {
        let err = eval(Expr::symbol("")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnboundVariable);
    }

    #[test]
    fn builtins_are_in_scope() {
        let expr = Expr::apply(Expr::symbol("length"), [int_list(&[1, 2, 3])]);
        assert_eq!(eval(expr).unwrap(), Value::Int(3));
    }

    #[test]
    fn custom_environment() {
        let env = Environment::new().bind("answer".into(), Value::Int(42));
        let value = Evaluator::new()
            .eval(&Arc::new(Expr::symbol("answer")), &env, &CallStack::new())
            .unwrap();
        assert_eq!(value, Value::Int(42));
    }
}

mod control {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn if_then_else() {
        let pick = |cond| Expr::if_(Expr::bool(cond), Expr::int(1), Expr::int(2));
        assert_eq!(eval(pick(true)).unwrap(), Value::Int(1));
        assert_eq!(eval(pick(false)).unwrap(), Value::Int(2));
    }

    #[test]
    fn untaken_branch_is_not_evaluated() {
        let expr = Expr::if_(Expr::bool(true), Expr::int(1), Expr::symbol("missing"));
        assert_eq!(eval(expr).unwrap(), Value::Int(1));
    }

    #[test]
    fn non_boolean_condition_is_a_type_error() {
        let err = eval(Expr::if_(Expr::int(1), Expr::int(1), Expr::int(2))).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::TypeMismatch {
                expected: "bool".to_string(),
                got: "int".to_string()
            }
        );
    }

    #[test]
    fn empty_sequence_fails() {
        let err = eval(Expr::sequence(Vec::<Expr>::new())).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::EmptySequence);
        assert_eq!(err.category(), ErrorCategory::Syntax);
    }

    #[test]
    fn sequence_yields_last_value() {
        let expr = Expr::sequence([Expr::int(1), Expr::int(2)]);
        assert_eq!(eval(expr).unwrap(), Value::Int(2));
    }

    #[test]
    fn sequence_stops_at_first_error() {
        let expr = Expr::sequence([Expr::head(int_list(&[])), Expr::int(2)]);
        assert_eq!(eval(expr).unwrap_err().category(), ErrorCategory::List);
    }

    #[test]
    fn unary_not_and_neg() {
        assert_eq!(eval(Expr::bool_not(Expr::bool(true))).unwrap(), Value::Bool(false));
        assert_eq!(eval(Expr::int_neg(Expr::int(3))).unwrap(), Value::Int(-3));
    }
}

mod lists {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn head_tail_cons() {
        assert_eq!(eval(Expr::head(int_list(&[1, 2]))).unwrap(), Value::Int(1));
        assert_eq!(eval(Expr::tail(int_list(&[1, 2]))).unwrap(), ints(&[2]));
        assert_eq!(
            eval(Expr::cons(Expr::int(0), int_list(&[1]))).unwrap(),
            ints(&[0, 1])
        );
    }

    #[test]
    fn head_of_empty_list() {
        let err = eval(Expr::head(int_list(&[]))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::List);
    }

    #[test]
    fn tail_of_non_list() {
        let err = eval(Expr::tail(Expr::int(1))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Type);
    }

    #[test]
    fn concat_lists() {
        let expr = Expr::binary(BinaryOp::Concat, int_list(&[1]), int_list(&[2, 3]));
        assert_eq!(eval(expr).unwrap(), ints(&[1, 2, 3]));
    }
}

mod dicts {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dict() -> Expr {
        Expr::dict([
            (Expr::string("a"), Expr::int(1)),
            (Expr::string("b"), Expr::int(2)),
        ])
    }

    #[test]
    fn insert_then_get() {
        let expr = Expr::get_key(
            Expr::string("c"),
            Expr::insert(Expr::string("c"), Expr::int(3), dict()),
        );
        assert_eq!(eval(expr).unwrap(), Value::Int(3));
    }

    #[test]
    fn delete_then_has_key() {
        let expr = Expr::has_key(Expr::string("a"), Expr::delete(Expr::string("a"), dict()));
        assert_eq!(eval(expr).unwrap(), Value::Bool(false));
    }

    #[test]
    fn get_missing_key() {
        let err = eval(Expr::get_key(Expr::string("z"), dict())).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::KeyNotFound {
                key: "\"z\"".to_string()
            }
        );
        assert_eq!(err.category(), ErrorCategory::Dict);
    }
}

mod combinators {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn map_over_list() {
        let expr = Expr::map(int_list(&[1, 2, 3]), add_one());
        assert_eq!(eval(expr).unwrap(), ints(&[2, 3, 4]));
    }

    #[test]
    fn map_over_dict_values_keeps_keys() {
        let expr = Expr::map(
            Expr::dict([(Expr::string("a"), Expr::int(1))]),
            add_one(),
        );
        assert_eq!(
            eval(expr).unwrap(),
            Value::dict([(Value::string("a"), Value::Int(2))])
        );
    }

    #[test]
    fn filter_keeps_matching() {
        let even = Expr::lambda(
            ["x"],
            Expr::equals(
                Expr::binary(BinaryOp::Mod, Expr::symbol("x"), Expr::int(2)),
                Expr::int(0),
            ),
        );
        let expr = Expr::filter(int_list(&[1, 2, 3, 4]), even);
        assert_eq!(eval(expr).unwrap(), ints(&[2, 4]));
    }

    #[test]
    fn filter_predicate_must_return_bool() {
        let expr = Expr::filter(int_list(&[1]), add_one());
        assert_eq!(eval(expr).unwrap_err().category(), ErrorCategory::Type);
    }

    #[test]
    fn fold_is_left_to_right_from_first_element() {
        let minus = Expr::lambda(["acc", "x"], Expr::sub(Expr::symbol("acc"), Expr::symbol("x")));
        let expr = Expr::fold(int_list(&[10, 1, 2]), minus);
        assert_eq!(eval(expr).unwrap(), Value::Int(7));
    }

    #[test]
    fn fold_of_empty_list() {
        let plus = Expr::lambda(["a", "b"], Expr::add(Expr::symbol("a"), Expr::symbol("b")));
        let err = eval(Expr::fold(int_list(&[]), plus)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::EmptyFold);
        assert_eq!(err.category(), ErrorCategory::List);
    }

    #[test]
    fn combinators_need_a_function() {
        let err = eval(Expr::map(int_list(&[]), Expr::int(3))).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::NotCallable {
                type_name: "int".to_string()
            }
        );
    }

    #[test]
    fn map_builtin_curries() {
        let incr_all = Expr::apply(Expr::symbol("map"), [add_one()]);
        let expr = Expr::apply(incr_all, [int_list(&[1, 2])]);
        assert_eq!(eval(expr).unwrap(), ints(&[2, 3]));
    }

    #[test]
    fn fold_and_filter_builtins() {
        let plus = Expr::lambda(["a", "b"], Expr::add(Expr::symbol("a"), Expr::symbol("b")));
        let sum = Expr::apply(Expr::symbol("fold"), [plus, int_list(&[1, 2, 3])]);
        assert_eq!(eval(sum).unwrap(), Value::Int(6));

        let positive = Expr::lambda(["x"], Expr::lt(Expr::int(0), Expr::symbol("x")));
        let kept = Expr::apply(Expr::symbol("filter"), [positive, int_list(&[-1, 2])]);
        assert_eq!(eval(kept).unwrap(), ints(&[2]));
    }
}

mod backtraces {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn backtrace_lists_innermost_first() {
        let failing = Expr::head(int_list(&[]));
        let expr = Expr::add(Expr::int(1), failing);
        let err = eval(expr).unwrap_err();
        let backtrace = err.backtrace.unwrap();
        let exprs: Vec<&str> = backtrace.frames().iter().map(|f| f.expr.as_str()).collect();
        assert_eq!(exprs, vec!["head []", "1 + (head [])"]);
        assert_eq!(backtrace.frames()[0].depth, 2);
    }

    #[test]
    fn backtrace_follows_function_calls() {
        let body = Expr::head(Expr::symbol("xs"));
        let expr = Expr::let_(
            vec![LetBinding::new("first", Expr::lambda(["xs"], body))],
            Expr::apply(Expr::symbol("first"), [int_list(&[])]),
        );
        let err = eval(expr).unwrap_err();
        let frames = err.backtrace.unwrap();
        let exprs: Vec<&str> = frames.frames().iter().map(|f| f.expr.as_str()).collect();
        assert_eq!(exprs[0], "head xs");
        assert_eq!(exprs[1], "first []");
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn max_depth_is_fatal() {
        let expr = Expr::add(Expr::int(1), Expr::add(Expr::int(2), Expr::int(3)));
        let evaluator = Evaluator::with_config(EvalConfig::new().with_max_depth(2));
        let err = evaluator.eval_program(expr).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::RecursionLimit { depth: 2 });
        assert!(err.is_fatal());
    }

    #[test]
    fn max_depth_allows_shallow_programs() {
        let evaluator = Evaluator::with_config(EvalConfig::new().with_max_depth(3));
        let expr = Expr::add(Expr::int(1), Expr::add(Expr::int(2), Expr::int(3)));
        assert_eq!(evaluator.eval_program(expr).unwrap(), Value::Int(6));
    }
}

mod batch {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn results_keep_input_order() {
        let exprs: Vec<Arc<Expr>> = vec![
            Arc::new(Expr::int(1)),
            Arc::new(Expr::head(int_list(&[]))),
            Arc::new(Expr::add(Expr::symbol("x"), Expr::int(1))),
        ];
        let env = Environment::with_builtins().bind("x".into(), Value::Int(9));
        let results = Evaluator::new().eval_batch(&exprs, &env);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok(Value::Int(1)));
        assert_eq!(
            results[1].as_ref().map_err(crate::EvalError::category),
            Err(ErrorCategory::List)
        );
        assert_eq!(results[2], Ok(Value::Int(10)));
    }

    #[test]
    fn empty_batch() {
        assert!(Evaluator::new()
            .eval_batch(&[], &Environment::new())
            .is_empty());
    }
}
