//! Session router: owns both editing modes and routes events to them.
//!
//! The Create and Animate screens each keep their own copy of the seed tree,
//! so edits made in one are not visible in the other. They share a single
//! [`IdCounter`] and [`FormulaEngine`].

use serde::{Deserialize, Serialize};

use crate::animate::{AnimateEvent, SkeletonAnimator};
use crate::bone::Bone;
use crate::config::Config;
use crate::create::{CreateEvent, SkeletonCreator};
use crate::error::SkeletonError;
use crate::formula::FormulaEngine;
use crate::ids::{BoneId, IdCounter};
use crate::outputs::Frame;
use crate::seed::Seed;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Creating,
    #[default]
    Animating,
}

/// Input to a session.
///
/// Externally tagged in JSON, e.g. `{"switch_mode": "creating"}` or
/// `{"create": {"type": "pointer_up"}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudioEvent {
    SwitchMode(ModeKind),
    Create(CreateEvent),
    Animate(AnimateEvent),
}

impl From<CreateEvent> for StudioEvent {
    fn from(ev: CreateEvent) -> Self {
        StudioEvent::Create(ev)
    }
}

impl From<AnimateEvent> for StudioEvent {
    fn from(ev: AnimateEvent) -> Self {
        StudioEvent::Animate(ev)
    }
}

/// Borrowed view of whichever mode is on screen.
#[derive(Debug)]
pub enum ActiveMode<'a> {
    Creating(&'a SkeletonCreator),
    Animating(&'a SkeletonAnimator),
}

#[derive(Debug)]
pub enum ActiveModeMut<'a> {
    Creating(&'a mut SkeletonCreator),
    Animating(&'a mut SkeletonAnimator),
}

#[derive(Debug)]
pub struct Studio {
    mode: ModeKind,
    creator: SkeletonCreator,
    animator: SkeletonAnimator,
    ids: IdCounter,
    formulas: FormulaEngine,
    config: Config,
}

impl Studio {
    /// Validate `config`, build the seed tree and start in `config.initial_mode`.
    pub fn new(config: Config, seed: Seed) -> Result<Self, SkeletonError> {
        config.validate()?;
        let root = seed.build()?;
        Ok(Self::from_parts(config, root))
    }

    /// Default configuration with the built-in figure.
    pub fn with_defaults() -> Result<Self, SkeletonError> {
        Self::new(Config::default(), Seed::default())
    }

    fn from_parts(config: Config, root: Bone) -> Self {
        let ids = IdCounter::starting_after(&root);
        log::debug!(
            "studio started with {} bones, next id {:?}",
            root.bone_count(),
            ids.peek()
        );
        Self {
            mode: config.initial_mode,
            creator: SkeletonCreator::new(root.clone()),
            animator: SkeletonAnimator::new(root, &config),
            ids,
            formulas: FormulaEngine::new(&config.formula),
            config,
        }
    }

    pub fn mode(&self) -> ModeKind {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn creator(&self) -> &SkeletonCreator {
        &self.creator
    }

    pub fn animator(&self) -> &SkeletonAnimator {
        &self.animator
    }

    /// The id the next created bone will receive, `None` once ids run out.
    pub fn next_id(&self) -> Option<BoneId> {
        self.ids.peek()
    }

    pub fn active(&self) -> ActiveMode<'_> {
        match self.mode {
            ModeKind::Creating => ActiveMode::Creating(&self.creator),
            ModeKind::Animating => ActiveMode::Animating(&self.animator),
        }
    }

    pub fn active_mut(&mut self) -> ActiveModeMut<'_> {
        match self.mode {
            ModeKind::Creating => ActiveModeMut::Creating(&mut self.creator),
            ModeKind::Animating => ActiveModeMut::Animating(&mut self.animator),
        }
    }

    /// Route one event. Returns the id of a bone created by the event, if any.
    ///
    /// Ticks always reach the animator so the wave clock keeps running while
    /// the Create screen is shown. Any other event aimed at the inactive mode
    /// is dropped.
    pub fn apply(&mut self, event: StudioEvent) -> Result<Option<BoneId>, SkeletonError> {
        match event {
            StudioEvent::SwitchMode(mode) => {
                if mode != self.mode {
                    log::debug!("switching mode {:?} -> {:?}", self.mode, mode);
                    self.mode = mode;
                }
                Ok(None)
            }
            StudioEvent::Create(ev) => {
                if self.mode != ModeKind::Creating {
                    log::debug!("dropping create event while animating: {ev:?}");
                    return Ok(None);
                }
                self.creator.apply(ev, &mut self.ids)
            }
            StudioEvent::Animate(ev) => {
                let is_tick = matches!(ev, AnimateEvent::Tick { .. });
                if self.mode != ModeKind::Animating && !is_tick {
                    log::debug!("dropping animate event while creating: {ev:?}");
                    return Ok(None);
                }
                self.animator.apply(ev, &mut self.formulas)?;
                Ok(None)
            }
        }
    }

    /// Apply events in order, stopping at the first error.
    pub fn apply_all<I>(&mut self, events: I) -> Result<Vec<BoneId>, SkeletonError>
    where
        I: IntoIterator<Item = StudioEvent>,
    {
        let mut created = Vec::new();
        for event in events {
            if let Some(id) = self.apply(event)? {
                created.push(id);
            }
        }
        Ok(created)
    }

    /// Render the active mode.
    pub fn frame(&mut self) -> Result<Frame, SkeletonError> {
        match self.mode {
            ModeKind::Creating => self.creator.frame(&self.config, &mut self.formulas),
            ModeKind::Animating => self.animator.frame(&self.config, &mut self.formulas),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::vector::Vector;

    fn studio(mode: ModeKind) -> Studio {
        let config = Config {
            initial_mode: mode,
            ..Config::default()
        };
        Studio::new(config, Seed::Origin).unwrap()
    }

    #[test]
    fn starts_in_configured_mode() {
        assert_eq!(Studio::with_defaults().unwrap().mode(), ModeKind::Animating);
        assert!(matches!(
            studio(ModeKind::Creating).active(),
            ActiveMode::Creating(_)
        ));
    }

    #[test]
    fn ticks_reach_animator_while_creating() {
        let mut s = studio(ModeKind::Creating);
        s.apply(AnimateEvent::Tick { delta_ms: 40.0 }.into()).unwrap();
        assert_eq!(s.animator().wave_progress(), 40.0);
    }

    #[test]
    fn inactive_mode_events_are_dropped() {
        let mut s = studio(ModeKind::Animating);
        s.apply(CreateEvent::PointerDown { address: Address::root() }.into())
            .unwrap();
        assert_eq!(*s.creator().phase(), crate::create::CreatePhase::Idle);
    }

    #[test]
    fn created_bone_uses_shared_counter() {
        let mut s = studio(ModeKind::Creating);
        let created = s
            .apply_all([
                CreateEvent::PointerMove { position: Vector::new(5.0, 5.0) }.into(),
                CreateEvent::PointerDown { address: Address::root() }.into(),
                CreateEvent::PointerUp.into(),
            ])
            .unwrap();
        assert_eq!(created, vec![BoneId(1)]);
        assert_eq!(s.next_id(), Some(BoneId(2)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            wave_samples: 0,
            ..Config::default()
        };
        assert!(matches!(
            Studio::new(config, Seed::Origin),
            Err(SkeletonError::InvalidConfig(_))
        ));
    }

    #[test]
    fn events_deserialize_from_json() {
        let ev: StudioEvent = serde_json::from_str(r#"{"switch_mode": "creating"}"#).unwrap();
        assert_eq!(ev, StudioEvent::SwitchMode(ModeKind::Creating));
        let ev: StudioEvent = serde_json::from_str(r#"{"create": {"type": "pointer_up"}}"#).unwrap();
        assert_eq!(ev, StudioEvent::Create(CreateEvent::PointerUp));
    }
}
