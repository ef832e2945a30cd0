//! Entrance and scroll-reveal sequences for the page text.
//!
//! The sequences are plain data; [`Choreography`] resolves selectors through an
//! [`ElementResolver`] and hands the resulting tweens to the [`Animator`].
//! Selectors that match nothing simply produce no tweens.

use crate::anim::{Animator, ElementId, Keyframes, Property, Transition};
use fnv::FnvHashSet;

pub const HEADER: &str = "header";
pub const SECTION: &str = "section";
pub const TEXT: &str = ".text";
pub const INTRO: &str = ".intro";

/// Looks up page elements by CSS selector.
pub trait ElementResolver {
    fn select_all(&mut self, selector: &str) -> Vec<ElementId>;
    /// First descendant of `parent` matching `selector`.
    fn select_within(&mut self, parent: ElementId, selector: &str) -> Option<ElementId>;
}

#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub selector: &'static str,
    pub props: &'static [(Property, Keyframes)],
    pub transition: Transition,
}

/// Applied while the model is still loading.
pub const PRELOAD: &[Step] = &[Step {
    selector: HEADER,
    props: &[
        (Property::TranslateY, Keyframes::to(-100.0)),
        (Property::Opacity, Keyframes::to(0.0)),
    ],
    transition: Transition::DEFAULT,
}];

/// Applied once the model is attached. Order matters: later steps replace
/// earlier ones on the same element.
pub const ENTRANCE: &[Step] = &[
    Step {
        selector: SECTION,
        props: &[
            (Property::Opacity, Keyframes::to(0.0)),
            (Property::TranslateY, Keyframes::to(-50.0)),
        ],
        transition: Transition::DEFAULT,
    },
    Step {
        selector: TEXT,
        props: &[
            (Property::Opacity, Keyframes::to(0.0)),
            (Property::TranslateY, Keyframes::to(50.0)),
        ],
        transition: Transition::DEFAULT,
    },
    Step {
        selector: INTRO,
        props: &[(Property::Opacity, Keyframes::to(0.0))],
        transition: Transition::DEFAULT,
    },
    Step {
        selector: HEADER,
        props: &[
            (Property::TranslateY, Keyframes::to(0.0)),
            (Property::Opacity, Keyframes::to(1.0)),
        ],
        transition: Transition::timed(2.0, 1.0),
    },
    Step {
        selector: INTRO,
        props: &[(Property::Opacity, Keyframes::from_to(0.0, 1.0))],
        transition: Transition::timed(2.0, 1.0),
    },
];

const SHOWN: &[(Property, Keyframes)] = &[
    (Property::Opacity, Keyframes::to(1.0)),
    (Property::TranslateY, Keyframes::to(0.0)),
];

/// Section itself when it scrolls into view.
pub const SECTION_REVEAL: Transition = Transition::timed(1.0, 0.5);
/// The section's `.text` child, trailing the section.
pub const SECTION_TEXT_REVEAL: Transition = Transition::timed(1.0, 1.0);

#[derive(Debug, Default)]
pub struct Choreography {
    entrance_started: bool,
    revealed: FnvHashSet<ElementId>,
}

impl Choreography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload<R: ElementResolver>(&self, animator: &mut Animator, resolver: &mut R, now: f64) {
        run_steps(PRELOAD, animator, resolver, now);
    }

    /// Run the entrance once. Returns the sections to watch for visibility;
    /// empty on repeated calls.
    pub fn entrance<R: ElementResolver>(
        &mut self,
        animator: &mut Animator,
        resolver: &mut R,
        now: f64,
    ) -> Vec<ElementId> {
        if self.entrance_started {
            log::warn!("[choreo] entrance already ran; ignoring");
            return Vec::new();
        }
        self.entrance_started = true;
        run_steps(ENTRANCE, animator, resolver, now);
        let sections = resolver.select_all(SECTION);
        log::info!("[choreo] entrance started, {} sections to reveal", sections.len());
        sections
    }

    #[inline]
    pub fn entrance_started(&self) -> bool {
        self.entrance_started
    }

    /// Reveal `section` and its text. Returns false if it was already revealed.
    pub fn reveal<R: ElementResolver>(
        &mut self,
        animator: &mut Animator,
        resolver: &mut R,
        section: ElementId,
        now: f64,
    ) -> bool {
        if !self.revealed.insert(section) {
            return false;
        }
        animator.animate(section, SHOWN, SECTION_REVEAL, now);
        if let Some(text) = resolver.select_within(section, TEXT) {
            animator.animate(text, SHOWN, SECTION_TEXT_REVEAL, now);
        }
        log::debug!("[choreo] revealed section {:?}", section);
        true
    }
}

fn run_steps<R: ElementResolver>(
    steps: &[Step],
    animator: &mut Animator,
    resolver: &mut R,
    now: f64,
) {
    for step in steps {
        for id in resolver.select_all(step.selector) {
            animator.animate(id, step.props, step.transition, now);
        }
    }
}
