use std::fmt;

/// A named reference point in the global timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeAnchor {
    /// `scene(id)` / `scene(id).start`
    SceneStart(String),
    /// `scene(id).end`
    SceneEnd(String),
    /// `cue(id)` / `cue(id).start`
    CueStart(String),
    /// `cue(id).end`
    CueEnd(String),
    /// `mark(id)` / `mark(id).start`
    MarkStart(String),
    /// `prev.start`
    PrevStart,
    /// `prev.end`
    PrevEnd,
    /// `next.start`
    NextStart,
    /// `timeline.start`, always zero.
    TimelineStart,
}

impl fmt::Display for TimeAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SceneStart(id) => write!(f, "scene({id}).start"),
            Self::SceneEnd(id) => write!(f, "scene({id}).end"),
            Self::CueStart(id) => write!(f, "cue({id}).start"),
            Self::CueEnd(id) => write!(f, "cue({id}).end"),
            Self::MarkStart(id) => write!(f, "mark({id})"),
            Self::PrevStart => f.write_str("prev.start"),
            Self::PrevEnd => f.write_str("prev.end"),
            Self::NextStart => f.write_str("next.start"),
            Self::TimelineStart => f.write_str("timeline.start"),
        }
    }
}

/// Unit suffix of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// `f`, divided by the context fps.
    Frames,
    /// `s` or no suffix.
    Seconds,
    /// `ms`, divided by 1000.
    Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Min,
    Max,
    Clamp,
    Snap,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Lit {
        value: f64,
        unit: TimeUnit,
    },
    Anchor(TimeAnchor),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: Builtin,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub(crate) fn visit_anchors<'a>(&'a self, out: &mut Vec<&'a TimeAnchor>) {
        match self {
            Self::Lit { .. } => {}
            Self::Anchor(a) => out.push(a),
            Self::Neg(e) => e.visit_anchors(out),
            Self::Binary { left, right, .. } => {
                left.visit_anchors(out);
                right.visit_anchors(out);
            }
            Self::Call { args, .. } => {
                for a in args {
                    a.visit_anchors(out);
                }
            }
        }
    }
}
