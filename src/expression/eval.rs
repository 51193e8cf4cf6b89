use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::expression::ast::{BinaryOp, Builtin, Expr, TimeAnchor, TimeUnit};
use crate::expression::parser::parse_expr;
use crate::foundation::core::Fps;
use crate::foundation::error::{TimecueError, TimecueResult};
use crate::foundation::math::round_half_up;

/// Source of absolute anchor times (seconds) for expression evaluation.
///
/// Returning `None` means "not resolvable yet"; the evaluator turns that into
/// [`TimecueError::MissingReference`] rather than defaulting to zero.
pub trait AnchorResolver {
    /// Absolute time of `anchor` in seconds, if known.
    fn resolve_anchor(&self, anchor: &TimeAnchor) -> Option<f64>;
}

/// Plain anchor map, handy for evaluating expressions outside the resolver.
#[derive(Debug, Clone, Default)]
pub struct AnchorTable {
    entries: BTreeMap<TimeAnchor, f64>,
}

impl AnchorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `anchor` to `secs`, returning the table for chaining.
    pub fn with(mut self, anchor: TimeAnchor, secs: f64) -> Self {
        self.entries.insert(anchor, secs);
        self
    }

    /// Set `anchor` to `secs`.
    pub fn insert(&mut self, anchor: TimeAnchor, secs: f64) {
        self.entries.insert(anchor, secs);
    }
}

impl AnchorResolver for AnchorTable {
    fn resolve_anchor(&self, anchor: &TimeAnchor) -> Option<f64> {
        self.entries.get(anchor).copied()
    }
}

/// Everything an expression needs at evaluation time.
#[derive(Clone, Copy)]
pub struct TimeEvalContext<'a> {
    /// Frame rate used by the `f` unit suffix.
    pub fps: Fps,
    /// Anchor lookup.
    pub anchors: &'a dyn AnchorResolver,
}

impl<'a> TimeEvalContext<'a> {
    /// Bundle `fps` and an anchor source.
    pub fn new(fps: Fps, anchors: &'a dyn AnchorResolver) -> Self {
        Self { fps, anchors }
    }
}

/// A parsed, immutable time expression such as `scene(intro).end + 0.5s`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeExpr {
    source: String,
    expr: Expr,
}

impl TimeExpr {
    /// Parse `src`; syntax problems become [`TimecueError::Parse`].
    pub fn parse(src: &str) -> TimecueResult<Self> {
        let expr = parse_expr(src).map_err(|e| TimecueError::parse(src, e))?;
        Ok(Self {
            source: src.to_owned(),
            expr,
        })
    }

    /// Original expression text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Anchors referenced by this expression, in evaluation order.
    pub fn anchors(&self) -> Vec<&TimeAnchor> {
        let mut out = Vec::new();
        self.expr.visit_anchors(&mut out);
        out
    }

    /// Evaluate to absolute seconds.
    pub fn eval(&self, ctx: &TimeEvalContext<'_>) -> TimecueResult<f64> {
        let v = eval_expr(&self.expr, ctx)?;
        if !v.is_finite() {
            return Err(TimecueError::evaluation(format!(
                "`{}` evaluated to a non-finite value",
                self.source
            )));
        }
        Ok(v)
    }
}

impl FromStr for TimeExpr {
    type Err = TimecueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse and evaluate `input` in one step, returning seconds.
pub fn parse_time_value(input: &str, ctx: &TimeEvalContext<'_>) -> TimecueResult<f64> {
    TimeExpr::parse(input)?.eval(ctx)
}

fn eval_expr(e: &Expr, ctx: &TimeEvalContext<'_>) -> TimecueResult<f64> {
    match e {
        Expr::Lit { value, unit } => Ok(match unit {
            TimeUnit::Seconds => *value,
            TimeUnit::Millis => *value / 1000.0,
            TimeUnit::Frames => ctx.fps.frames_to_secs(*value),
        }),
        Expr::Anchor(TimeAnchor::TimelineStart) => Ok(0.0),
        Expr::Anchor(anchor) => ctx
            .anchors
            .resolve_anchor(anchor)
            .ok_or_else(|| TimecueError::missing(anchor.to_string())),
        Expr::Neg(inner) => Ok(-eval_expr(inner, ctx)?),
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, ctx)?;
            let r = eval_expr(right, ctx)?;
            match op {
                BinaryOp::Add => Ok(l + r),
                BinaryOp::Sub => Ok(l - r),
                BinaryOp::Mul => Ok(l * r),
                BinaryOp::Div => {
                    if r == 0.0 {
                        return Err(TimecueError::evaluation("division by zero"));
                    }
                    Ok(l / r)
                }
            }
        }
        Expr::Call { func, args } => {
            let mut vals = Vec::with_capacity(args.len());
            for a in args {
                vals.push(eval_expr(a, ctx)?);
            }
            Ok(match func {
                Builtin::Min => vals.iter().copied().fold(f64::INFINITY, f64::min),
                Builtin::Max => vals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                Builtin::Clamp => vals[0].max(vals[1]).min(vals[2]),
                Builtin::Snap => snap(vals[0], vals[1]),
            })
        }
    }
}

/// Round `value` to the nearest multiple of `grid`; a zero grid leaves `value` unchanged.
pub fn snap(value: f64, grid: f64) -> f64 {
    if grid == 0.0 {
        return value;
    }
    round_half_up(value / grid) * grid
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
