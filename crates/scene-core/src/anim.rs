//! Time-based tweening of element opacity and vertical offset.
//!
//! Elements are addressed by [`ElementId`]; the front-end maps ids to DOM
//! nodes and writes the sampled [`ElementStyle`]s back as inline CSS.

use crate::constants::DEFAULT_TWEEN_DURATION_SEC;
use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    /// CSS `ease`.
    pub const EASE: Easing = Easing::CubicBezier {
        x1: 0.25,
        y1: 0.1,
        x2: 0.25,
        y2: 1.0,
    };

    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_x(x1, x2, t);
                bezier(y1, y2, s)
            }
        }
    }
}

// One coordinate of a cubic bezier with endpoints fixed at 0 and 1.
#[inline]
fn bezier(p1: f32, p2: f32, s: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    ((a * s + b) * s + c) * s
}

#[inline]
fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (3.0 * a * s + 2.0 * b) * s + c
}

// Parameter `s` whose x equals `x`: Newton first, bisection if it stalls.
fn solve_bezier_x(x1: f32, x2: f32, x: f32) -> f32 {
    const EPS: f32 = 1e-6;
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(x1, x2, s) - x;
        if err.abs() < EPS {
            return s;
        }
        let d = bezier_slope(x1, x2, s);
        if d.abs() < EPS {
            break;
        }
        s -= err / d;
    }
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let v = bezier(x1, x2, s);
        if (v - x).abs() < EPS {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    s
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    TranslateY,
}

/// The animated subset of an element's inline style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementStyle {
    pub opacity: f32,
    /// CSS pixels.
    pub translate_y: f32,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate_y: 0.0,
        }
    }
}

impl ElementStyle {
    #[inline]
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::Opacity => self.opacity,
            Property::TranslateY => self.translate_y,
        }
    }

    #[inline]
    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::TranslateY => self.translate_y = value,
        }
    }

    pub fn css_transform(&self) -> String {
        format!("translateY({}px)", self.translate_y)
    }
}

/// Target value, optionally with an explicit start value. Without one the
/// animation starts from whatever the element currently shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframes {
    pub from: Option<f32>,
    pub to: f32,
}

impl Keyframes {
    pub const fn to(to: f32) -> Self {
        Self { from: None, to }
    }

    pub const fn from_to(from: f32, to: f32) -> Self {
        Self {
            from: Some(from),
            to,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub duration: f64,
    pub delay: f64,
    pub easing: Easing,
}

impl Transition {
    pub const DEFAULT: Transition = Transition {
        duration: DEFAULT_TWEEN_DURATION_SEC,
        delay: 0.0,
        easing: Easing::EASE,
    };

    pub const fn timed(duration: f64, delay: f64) -> Self {
        Self {
            duration,
            delay,
            easing: Easing::EASE,
        }
    }

    #[inline]
    pub fn end(&self, start: f64) -> f64 {
        start + self.delay + self.duration.max(0.0)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug)]
struct Track {
    property: Property,
    from: f32,
    to: f32,
    start: f64,
    transition: Transition,
}

impl Track {
    fn value_at(&self, now: f64) -> f32 {
        let begin = self.start + self.transition.delay;
        if now < begin {
            // held at the first keyframe during the delay
            return self.from;
        }
        let t = if self.transition.duration <= 0.0 {
            1.0
        } else {
            ((now - begin) / self.transition.duration) as f32
        };
        let e = self.transition.easing.evaluate(t);
        self.from + (self.to - self.from) * e
    }

    #[inline]
    fn finished(&self, now: f64) -> bool {
        now >= self.transition.end(self.start)
    }
}

#[derive(Debug, Default)]
struct ElementState {
    style: ElementStyle,
    tracks: SmallVec<[Track; 2]>,
    dirty: bool,
}

impl ElementState {
    fn advance(&mut self, now: f64) {
        for track in &self.tracks {
            let v = track.value_at(now);
            if self.style.get(track.property) != v {
                self.style.set(track.property, v);
                self.dirty = true;
            }
        }
        self.tracks.retain(|t| !t.finished(now));
    }
}

#[derive(Debug, Default)]
pub struct Animator {
    elements: FnvHashMap<ElementId, ElementState>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `props` on `element`. A running animation of the same
    /// property is replaced; the new one starts from the value shown at `now`.
    pub fn animate(
        &mut self,
        element: ElementId,
        props: &[(Property, Keyframes)],
        transition: Transition,
        now: f64,
    ) {
        let state = self.elements.entry(element).or_default();
        state.advance(now);
        for &(property, keyframes) in props {
            let from = keyframes.from.unwrap_or_else(|| state.style.get(property));
            state.tracks.retain(|t| t.property != property);
            state.tracks.push(Track {
                property,
                from,
                to: keyframes.to,
                start: now,
                transition,
            });
        }
        state.dirty = true;
    }

    /// Advance every element to `now` and return the styles that changed since
    /// the previous call, ordered by element id.
    pub fn sample(&mut self, now: f64) -> Vec<(ElementId, ElementStyle)> {
        let mut changed = Vec::new();
        for (id, state) in self.elements.iter_mut() {
            state.advance(now);
            if state.dirty {
                state.dirty = false;
                changed.push((*id, state.style));
            }
        }
        changed.sort_by_key(|(id, _)| *id);
        changed
    }

    #[inline]
    pub fn style(&self, element: ElementId) -> Option<ElementStyle> {
        self.elements.get(&element).map(|s| s.style)
    }

    pub fn is_idle(&self) -> bool {
        self.elements.values().all(|s| s.tracks.is_empty())
    }
}
