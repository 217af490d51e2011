//! Script a short editing session without a renderer and print what it produces.

use serde_json::to_string_pretty;
use skelemation_core::{
    dump, Address, AnimateEvent, Config, CreateEvent, ModeKind, Seed, Studio, StudioEvent, Vector,
};

fn main() -> anyhow::Result<()> {
    let config = Config {
        initial_mode: ModeKind::Creating,
        ..Config::default()
    };
    let mut studio = Studio::new(config, Seed::Origin)?;

    // Grow a two-bone arm out of the root.
    let created = studio.apply_all([
        CreateEvent::PointerMove { position: Vector::new(0.0, -40.0) }.into(),
        CreateEvent::PointerDown { address: Address::root() }.into(),
        CreateEvent::PointerUp.into(),
    ])?;
    let shoulder = Address::new(created);
    studio.apply_all([
        CreateEvent::PointerMove { position: Vector::new(30.0, -40.0) }.into(),
        CreateEvent::PointerDown { address: shoulder.clone() }.into(),
        CreateEvent::PointerUp.into(),
    ])?;
    println!("{}", dump::listing(studio.creator().root()));

    // The animator keeps the seed tree; drive its root with the wave.
    studio.apply(StudioEvent::SwitchMode(ModeKind::Animating))?;
    studio.apply(AnimateEvent::SelectBone { address: Address::root() }.into())?;
    studio.apply(AnimateEvent::SetRotationFormula { formula: "a + s".into() }.into())?;

    for _ in 0..4 {
        studio.apply(AnimateEvent::Tick { delta_ms: 250.0 }.into())?;
        let frame = studio.frame()?;
        if let Some(panel) = &frame.wave_panel {
            println!("phase {:.2} sample {:+.3}", panel.phase, panel.sample);
        }
    }

    studio.apply(StudioEvent::SwitchMode(ModeKind::Creating))?;
    println!("{}", to_string_pretty(&studio.frame()?)?);
    Ok(())
}
