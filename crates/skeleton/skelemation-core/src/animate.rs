//! Animate screen: a wave clock drives per-bone rotation formulas.
//!
//! Time ticks accumulate into `wave_progress` (milliseconds, never reset).
//! The phase within one wave period is `(wave_progress / wave_length) mod 1`;
//! the wave formula is sampled at `x = 2π·phase` and the result is bound to
//! `s` in every rotation formula. Formula text is stored exactly as typed;
//! broken formulas show up as status lines on the next frame.
//!
//! `s` is the wave formula's value as written, not its screen-space
//! negation: with `sin(x)`, a bone using `a + s` turns clockwise on screen
//! during the first half period. Formulas written against a negated sample
//! need `-s` in place of `s`.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::address::Address;
use crate::bone::{Bone, BonePatch};
use crate::config::Config;
use crate::dump;
use crate::error::SkeletonError;
use crate::formula::{FormulaEngine, FormulaError};
use crate::kinematics::{self, BoneStyle};
use crate::outputs::{FormulaFailure, Frame, Primitive, SelectedBonePanel, Stroke, WavePanel};
use crate::vector::Vector;

/// Wave panel coordinate space: one period wide, centered on y = 0.
pub const WAVE_VIEW_BOX: [f64; 4] = [0.0, -0.5, TAU, 1.0];

const WAVE_STROKE_WIDTH: f64 = 0.03;
const BASELINE_STROKE_WIDTH: f64 = 0.01;
const CURSOR_STROKE_WIDTH: f64 = 0.02;
const CURSOR_HALF_HEIGHT: f64 = 3.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimateEvent {
    /// Time elapsed since the previous tick.
    Tick { delta_ms: f64 },
    /// Anchor clicked; its bone becomes the target of rotation edits.
    SelectBone { address: Address },
    SetWaveFormula { formula: String },
    /// Replace the selected bone's rotation formula.
    SetRotationFormula { formula: String },
}

#[derive(Clone, Debug)]
pub struct SkeletonAnimator {
    skeleton: Bone,
    wave_progress: f64,
    wave_length: f64,
    wave_formula: String,
    selected_bone: Option<Address>,
}

impl SkeletonAnimator {
    pub fn new(skeleton: Bone, cfg: &Config) -> Self {
        Self {
            skeleton,
            wave_progress: 0.0,
            wave_length: cfg.wave_length_ms,
            wave_formula: cfg.default_wave_formula.clone(),
            selected_bone: None,
        }
    }

    pub fn skeleton(&self) -> &Bone {
        &self.skeleton
    }

    pub fn wave_progress(&self) -> f64 {
        self.wave_progress
    }

    pub fn wave_formula(&self) -> &str {
        &self.wave_formula
    }

    pub fn selected_bone(&self) -> Option<&Address> {
        self.selected_bone.as_ref()
    }

    /// Apply one event. Only selecting an unresolvable anchor (or editing a
    /// selection that stopped resolving) fails; the state is then unchanged.
    pub fn apply(&mut self, event: AnimateEvent, formulas: &mut FormulaEngine) -> Result<(), SkeletonError> {
        match event {
            AnimateEvent::Tick { delta_ms } => {
                if delta_ms.is_finite() && delta_ms >= 0.0 {
                    self.wave_progress += delta_ms;
                } else {
                    log::debug!("ignoring tick with delta {delta_ms}");
                }
            }
            AnimateEvent::SelectBone { address } => {
                if let Err(err) = self.skeleton.find_bone(&address) {
                    log::error!("selected anchor does not resolve: {err}");
                    return Err(err);
                }
                log::debug!("selected bone [{address}]");
                self.selected_bone = Some(address);
            }
            AnimateEvent::SetWaveFormula { formula } => {
                if let Err(err) = formulas.check(&formula) {
                    log::warn!("{err}");
                }
                self.wave_formula = formula;
            }
            AnimateEvent::SetRotationFormula { formula } => {
                let Some(address) = self.selected_bone.clone() else {
                    log::warn!("rotation formula edit with no bone selected; ignored");
                    return Ok(());
                };
                if formula != crate::bone::IDENTITY_FORMULA {
                    if let Err(err) = formulas.check(&formula) {
                        log::warn!("bone [{address}]: {err}");
                    }
                }
                self.skeleton
                    .update_bone(&address, BonePatch::with_rotation_formula(formula))
                    .map_err(|err| {
                        log::error!("rotation formula edit failed: {err}");
                        err
                    })?;
            }
        }
        Ok(())
    }

    /// Position within the current wave period, in `[0, 1)`.
    pub fn wave_phase(&self) -> f64 {
        if !(self.wave_length.is_finite() && self.wave_length > 0.0) {
            return 0.0;
        }
        let phase = (self.wave_progress / self.wave_length).rem_euclid(1.0);
        if phase < 1.0 {
            phase
        } else {
            0.0
        }
    }

    /// The wave formula evaluated at the current phase.
    pub fn wave_sample(&self, formulas: &mut FormulaEngine) -> Result<f64, FormulaError> {
        formulas.eval_wave(&self.wave_formula, TAU * self.wave_phase())
    }

    /// Render the posed skeleton and the wave panel.
    pub fn frame(&self, cfg: &Config, formulas: &mut FormulaEngine) -> Result<Frame, SkeletonError> {
        let mut status = Vec::new();
        let phase = self.wave_phase();
        let sample = match self.wave_sample(formulas) {
            Ok(s) => s,
            Err(err) => {
                log::debug!("wave sample falls back to 0: {err}");
                status.push(FormulaFailure::for_wave(&err));
                0.0
            }
        };

        let pose = kinematics::pose(&self.skeleton, sample, formulas);
        let primitives = pose.primitives(&BoneStyle::from_config(cfg));
        status.extend(pose.failures);

        let (curve, curve_error) = self.wave_curve(cfg.wave_samples, formulas);
        if let Some(err) = curve_error {
            if !status.iter().any(|f| f.address.is_none()) {
                status.push(FormulaFailure::for_wave(&err));
            }
        }

        let cursor_x = TAU * phase;
        let panel_primitives = vec![
            Primitive::Line {
                from: Vector::new(0.0, 0.0),
                to: Vector::new(TAU, 0.0),
                stroke: Stroke::new(cfg.palette.baseline.clone(), BASELINE_STROKE_WIDTH),
            },
            Primitive::Polyline {
                points: curve,
                stroke: Stroke::new(cfg.palette.wave.clone(), WAVE_STROKE_WIDTH),
            },
            Primitive::Line {
                from: Vector::new(cursor_x, -CURSOR_HALF_HEIGHT),
                to: Vector::new(cursor_x, CURSOR_HALF_HEIGHT),
                stroke: Stroke::new(cfg.palette.cursor.clone(), CURSOR_STROKE_WIDTH),
            },
        ];

        let selected = match &self.selected_bone {
            Some(address) => {
                let bone = self.skeleton.find_bone(address)?;
                Some(SelectedBonePanel {
                    address: address.clone(),
                    rotation_formula: bone.rotation_formula.clone(),
                    dump: dump::to_pretty_json(bone),
                })
            }
            None => None,
        };

        Ok(Frame {
            view_box: cfg.view_box,
            primitives,
            dump: dump::to_pretty_json(&self.skeleton),
            listing: dump::listing(&self.skeleton),
            status,
            wave_panel: Some(WavePanel {
                view_box: WAVE_VIEW_BOX,
                primitives: panel_primitives,
                wave_formula: self.wave_formula.clone(),
                phase,
                sample,
                selected,
            }),
        })
    }

    /// Sample the wave over one period for display. Screen y grows downward,
    /// so each point is plotted at `-sample`. Failed samples are skipped and
    /// the first failure is returned.
    fn wave_curve(&self, samples: usize, formulas: &mut FormulaEngine) -> (Vec<Vector>, Option<FormulaError>) {
        let mut points = Vec::with_capacity(samples);
        let mut first_error = None;
        for i in 0..samples {
            let x = i as f64 / samples as f64 * TAU;
            match formulas.eval_wave(&self.wave_formula, x) {
                Ok(y) => points.push(Vector::new(x, -y)),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        (points, first_error)
    }
}
