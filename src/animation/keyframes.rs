use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Point, Vec2},
        error::{TimecueError, TimecueResult},
    },
};

/// Values that can be interpolated between two keyframes.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` at eased progress `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for String {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t >= 0.5 { b.clone() } else { a.clone() }
    }
}

/// A value pinned to a frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Frame relative to the animation's zero point. Fractional frames are allowed.
    pub frame: f64,
    /// Value at `frame`.
    pub value: T,
    /// Easing used on the segment that ends at this keyframe.
    #[serde(default)]
    pub easing: Ease,
}

impl<T> Keyframe<T> {
    /// Keyframe with linear easing.
    pub fn new(frame: f64, value: T) -> Self {
        Self {
            frame,
            value,
            easing: Ease::Linear,
        }
    }

    /// Replace the easing of the segment arriving at this keyframe.
    pub fn eased(mut self, easing: Ease) -> Self {
        self.easing = easing;
        self
    }
}

/// Evaluate a raw keyframe slice at `frame`; `None` when `keys` is empty.
///
/// `keys` must be sorted by frame. Outside the keyed range the boundary value is held.
pub fn evaluate_keyframes<T>(keys: &[Keyframe<T>], frame: f64) -> Option<T>
where
    T: Lerp + Clone,
{
    let first = keys.first()?;
    if frame.is_nan() {
        return Some(first.value.clone());
    }

    let idx = keys.partition_point(|k| k.frame <= frame);
    if idx == 0 {
        return Some(first.value.clone());
    }
    if idx >= keys.len() {
        return Some(keys[keys.len() - 1].value.clone());
    }

    let a = &keys[idx - 1];
    let b = &keys[idx];
    let denom = b.frame - a.frame;
    if denom <= 0.0 {
        return Some(b.value.clone());
    }

    let t = (frame - a.frame) / denom;
    let te = b.easing.apply(t);
    Some(T::lerp(&a.value, &b.value, te))
}

/// Non-empty, frame-sorted keyframe list for one property.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(try_from = "Vec<Keyframe<T>>")]
pub struct PropertyTimeline<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> PropertyTimeline<T> {
    /// Validate and wrap `keys`.
    pub fn new(keys: Vec<Keyframe<T>>) -> TimecueResult<Self> {
        if keys.is_empty() {
            return Err(TimecueError::animation(
                "property timeline must have at least one keyframe",
            ));
        }
        if keys.iter().any(|k| !k.frame.is_finite()) {
            return Err(TimecueError::animation("keyframe frames must be finite"));
        }
        if !keys.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(TimecueError::animation(
                "keyframes must be sorted by frame",
            ));
        }
        Ok(Self { keys })
    }

    /// Keyframes in frame order.
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// First and last keyed frame.
    pub fn frame_span(&self) -> (f64, f64) {
        let first = self.keys.first().map_or(0.0, |k| k.frame);
        let last = self.keys.last().map_or(0.0, |k| k.frame);
        (first, last)
    }
}

impl<T> PropertyTimeline<T>
where
    T: Lerp + Clone,
{
    /// Value at `frame`.
    pub fn evaluate(&self, frame: f64) -> T {
        match evaluate_keyframes(&self.keys, frame) {
            Some(v) => v,
            // Unreachable for a validated timeline.
            None => self.keys[0].value.clone(),
        }
    }
}

impl<T> TryFrom<Vec<Keyframe<T>>> for PropertyTimeline<T> {
    type Error = TimecueError;

    fn try_from(keys: Vec<Keyframe<T>>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl<T> serde::Serialize for PropertyTimeline<T>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.keys.serialize(serializer)
    }
}

/// Value of `timeline` at `frame`.
pub fn evaluate_property<T>(timeline: &PropertyTimeline<T>, frame: f64) -> T
where
    T: Lerp + Clone,
{
    timeline.evaluate(frame)
}

/// One evaluated property value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Scalar such as opacity or rotation.
    Number(f64),
    /// 2D position.
    Point(Point),
    /// Discrete text.
    Text(String),
}

impl PropertyValue {
    /// The scalar, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The point, if this is a point.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// The text, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Typed keyframe track for a single named property.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "keyframes", rename_all = "snake_case")]
pub enum PropertyTrack {
    /// Numeric track.
    Number(PropertyTimeline<f64>),
    /// Point track.
    Point(PropertyTimeline<Point>),
    /// Text track.
    Text(PropertyTimeline<String>),
}

impl PropertyTrack {
    /// Value of this track at `frame`.
    pub fn evaluate(&self, frame: f64) -> PropertyValue {
        match self {
            Self::Number(t) => PropertyValue::Number(t.evaluate(frame)),
            Self::Point(t) => PropertyValue::Point(t.evaluate(frame)),
            Self::Text(t) => PropertyValue::Text(t.evaluate(frame)),
        }
    }
}

impl From<PropertyTimeline<f64>> for PropertyTrack {
    fn from(t: PropertyTimeline<f64>) -> Self {
        Self::Number(t)
    }
}

impl From<PropertyTimeline<Point>> for PropertyTrack {
    fn from(t: PropertyTimeline<Point>) -> Self {
        Self::Point(t)
    }
}

impl From<PropertyTimeline<String>> for PropertyTrack {
    fn from(t: PropertyTimeline<String>) -> Self {
        Self::Text(t)
    }
}

/// Named property tracks evaluated together.
///
/// ```json
/// { "opacity": { "type": "number", "keyframes": [{ "frame": 0, "value": 0 }, { "frame": 15, "value": 1 }] } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AnimatedProperties {
    tracks: BTreeMap<String, PropertyTrack>,
}

impl AnimatedProperties {
    /// Empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the track for `name`, returning `self` for chaining.
    pub fn with(mut self, name: impl Into<String>, track: impl Into<PropertyTrack>) -> Self {
        self.insert(name, track);
        self
    }

    /// Add or replace the track for `name`.
    pub fn insert(&mut self, name: impl Into<String>, track: impl Into<PropertyTrack>) {
        self.tracks.insert(name.into(), track.into());
    }

    /// Track for `name`.
    pub fn get(&self, name: &str) -> Option<&PropertyTrack> {
        self.tracks.get(name)
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// `true` when no track is set.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyTrack)> {
        self.tracks.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Evaluate every property at `frame`.
pub fn evaluate_timeline(props: &AnimatedProperties, frame: f64) -> BTreeMap<String, PropertyValue> {
    props
        .tracks
        .iter()
        .map(|(name, track)| (name.clone(), track.evaluate(frame)))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
