//! A stock table of integer operators.

use crate::{eval::{Datum, EvalError, Evaluator}, tree::Node};

fn int_args<const N: usize>(node: &Node, args: &[Datum]) -> Result<[i64; N], EvalError> {
    if args.len() != N {
        return Err(EvalError::operator(
            node.name(),
            format!("expected {N} arguments, got {}", args.len()),
        ));
    }

    let mut res = [0; N];
    for (slot, arg) in res.iter_mut().zip(args) {
        *slot = arg.as_int()
            .ok_or_else(|| EvalError::operator(node.name(), format!("{arg} is not an integer")))?;
    }

    Ok(res)
}

fn binop<F>(f: F) -> impl Fn(&Node, &[Datum]) -> Result<Datum, EvalError>
where
    F: Fn(i64, i64) -> Option<i64>,
{
    move |node, args| {
        let [l, r] = int_args(node, args)?;

        f(l, r)
            .map(Datum::Int)
            .ok_or_else(|| EvalError::operator(node.name(), format!("undefined for {l} and {r}")))
    }
}

/// `add sub mul div floordiv shl shr pow lt ge ite` over `i64`. Overflow,
/// division by zero and out-of-range shifts are reported as operator errors.
pub fn arithmetic() -> Evaluator {
    Evaluator::new()
        .with_op("add", binop(i64::checked_add))
        .with_op("sub", binop(i64::checked_sub))
        .with_op("mul", binop(i64::checked_mul))
        .with_op("div", binop(i64::checked_div))
        .with_op("floordiv", binop(|l, r| {
            let q = l.checked_div(r)?;
            // Round towards negative infinity
            if (l % r != 0) && ((l < 0) != (r < 0)) {
                Some(q - 1)
            } else {
                Some(q)
            }
        }))
        .with_op("shl", binop(|l, r| l.checked_shl(u32::try_from(r).ok()?)))
        .with_op("shr", binop(|l, r| l.checked_shr(u32::try_from(r).ok()?)))
        .with_op("pow", binop(|l, r| l.checked_pow(u32::try_from(r).ok()?)))
        .with_op("lt", binop(|l, r| Some(i64::from(l < r))))
        .with_op("ge", binop(|l, r| Some(i64::from(l >= r))))
        .with_op("ite", |node: &Node, args: &[Datum]| {
            let [cond, then, otherwise] = int_args(node, args)?;

            Ok(Datum::Int(if cond != 0 { then } else { otherwise }))
        })
}
