use std::f64::consts::TAU;

use anyhow::Result;
use skelemation_core::{
    parse_skeleton_json, Address, AnimateEvent, Config, FormulaEngine, Primitive,
    SkeletonAnimator, Vector,
};
use skelemation_test_fixtures::skeletons;

fn animator(name: &str) -> Result<SkeletonAnimator> {
    let root = parse_skeleton_json(&skeletons::json(name)?)?;
    Ok(SkeletonAnimator::new(root, &Config::default()))
}

#[test]
fn wave_sample_drives_rotation_formulas() -> Result<()> {
    let cfg = Config::default();
    let mut formulas = FormulaEngine::default();
    let mut an = animator("formula_chain")?;

    // Phase 0: sin(0) = 0, so the "s" bone points straight down its rest-relative axis.
    let frame = an.frame(&cfg, &mut formulas)?;
    let panel = frame.wave_panel.as_ref().unwrap();
    assert_eq!(panel.phase, 0.0);
    assert_eq!(panel.sample, 0.0);

    an.apply(AnimateEvent::Tick { delta_ms: 250.0 }, &mut formulas)?;
    let frame = an.frame(&cfg, &mut formulas)?;
    let panel = frame.wave_panel.as_ref().unwrap();
    assert!((panel.sample - 1.0).abs() < 1e-12);

    let tip = frame
        .primitives
        .iter()
        .find_map(|p| match p {
            Primitive::Anchor { center, address, .. } if *address == Address::from(vec![1]) => {
                Some(*center)
            }
            _ => None,
        })
        .unwrap();
    assert!(tip.approx_eq(Vector::new(10.0 * 1f64.cos(), 10.0 * 1f64.sin()), 1e-9));
    Ok(())
}

#[test]
fn clock_only_moves_forward() -> Result<()> {
    let mut formulas = FormulaEngine::default();
    let mut an = animator("chain")?;
    let mut last = an.wave_progress();
    for delta in [16.0, 0.0, -100.0, 33.3, f64::INFINITY, 1_000_000.0] {
        an.apply(AnimateEvent::Tick { delta_ms: delta }, &mut formulas)?;
        assert!(an.wave_progress() >= last);
        assert!((0.0..1.0).contains(&an.wave_phase()));
        last = an.wave_progress();
    }
    Ok(())
}

#[test]
fn selected_bone_formula_is_edited_and_shown() -> Result<()> {
    let cfg = Config::default();
    let mut formulas = FormulaEngine::default();
    let mut an = animator("chain")?;
    let target = Address::from(vec![1, 2]);

    an.apply(AnimateEvent::SelectBone { address: target.clone() }, &mut formulas)?;
    an.apply(
        AnimateEvent::SetRotationFormula { formula: "a + s / 2".into() },
        &mut formulas,
    )?;

    assert_eq!(an.skeleton().find_bone(&target)?.rotation_formula, "a + s / 2");
    let frame = an.frame(&cfg, &mut formulas)?;
    let selected = frame.wave_panel.unwrap().selected.unwrap();
    assert_eq!(selected.address, target);
    assert_eq!(selected.rotation_formula, "a + s / 2");
    assert!(selected.dump.contains("\"id\": 2"));
    let frame = an.frame(&cfg, &mut formulas)?;
    assert!(frame.listing.contains("[1,2] #2 (0.00, -10.00) a + s / 2"));
    Ok(())
}

#[test]
fn selecting_missing_bone_fails_and_keeps_selection() -> Result<()> {
    let mut formulas = FormulaEngine::default();
    let mut an = animator("chain")?;
    an.apply(AnimateEvent::SelectBone { address: Address::from(vec![1]) }, &mut formulas)?;
    assert!(an
        .apply(AnimateEvent::SelectBone { address: Address::from(vec![9]) }, &mut formulas)
        .is_err());
    assert_eq!(an.selected_bone(), Some(&Address::from(vec![1])));
    Ok(())
}

#[test]
fn broken_wave_formula_falls_back_to_zero_sample() -> Result<()> {
    let cfg = Config::default();
    let mut formulas = FormulaEngine::default();
    let mut an = animator("formula_chain")?;
    an.apply(AnimateEvent::SetWaveFormula { formula: "sin(".into() }, &mut formulas)?;
    an.apply(AnimateEvent::Tick { delta_ms: 250.0 }, &mut formulas)?;

    let frame = an.frame(&cfg, &mut formulas)?;
    let panel = frame.wave_panel.as_ref().unwrap();
    assert_eq!(panel.wave_formula, "sin(");
    assert_eq!(panel.sample, 0.0);
    let wave_failures = frame.status.iter().filter(|f| f.address.is_none()).count();
    assert_eq!(wave_failures, 1);
    // No curve points survive a formula that never compiles.
    assert!(panel.primitives.iter().any(|p| matches!(
        p,
        Primitive::Polyline { points, .. } if points.is_empty()
    )));
    Ok(())
}

#[test]
fn wave_panel_layout() -> Result<()> {
    let cfg = Config::default();
    let mut formulas = FormulaEngine::default();
    let mut an = animator("chain")?;
    an.apply(AnimateEvent::Tick { delta_ms: 500.0 }, &mut formulas)?;

    let panel = an.frame(&cfg, &mut formulas)?.wave_panel.unwrap();
    assert_eq!(panel.view_box, [0.0, -0.5, TAU, 1.0]);
    assert_eq!(panel.primitives.len(), 3);
    match &panel.primitives[1] {
        Primitive::Polyline { points, stroke } => {
            assert_eq!(points.len(), cfg.wave_samples);
            assert_eq!(stroke.color, cfg.palette.wave);
        }
        other => panic!("expected curve, got {other:?}"),
    }
    match &panel.primitives[2] {
        Primitive::Line { from, to, .. } => {
            assert!((from.x - TAU * 0.5).abs() < 1e-12);
            assert_eq!((from.y, to.y), (-3.0, 3.0));
        }
        other => panic!("expected cursor, got {other:?}"),
    }
    Ok(())
}
