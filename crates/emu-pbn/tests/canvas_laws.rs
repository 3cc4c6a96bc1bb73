//! Property tests over canvas sizes, paint scripts and save states.

use emu_pbn::{PaintPoint, PaintScript, Pbn, PbnConfig, Scale, ScriptHost};
use proptest::prelude::*;

fn config(width: u16, height: u16) -> PbnConfig {
    PbnConfig {
        width,
        height,
        paint_limit: None,
    }
}

fn point_strategy() -> impl Strategy<Value = PaintPoint> {
    (-8i16..72, -8i16..64, 0u32..=0xFF_FFFF).prop_map(|(x, y, color)| PaintPoint::new(x, y, color))
}

fn paint(core: &mut Pbn, points: Vec<PaintPoint>) -> u32 {
    let mut host = ScriptHost::new(PaintScript {
        frames: vec![points],
    });
    core.emulate(&mut host)
}

proptest! {
    #[test]
    fn fresh_canvas_is_blank_and_unscaled(width in 1u16..=256, height in 1u16..=256) {
        let core = Pbn::new(&config(width, height));
        let canvas = core.canvas();
        prop_assert_eq!(canvas.len(), usize::from(width) * usize::from(height));
        prop_assert!(canvas.pixels().iter().all(|&p| p == 0));
        prop_assert!(!canvas.is_painted());
        prop_assert_eq!(core.compute_scale(), Scale { horizontal: 1, vertical: 1 });
    }

    #[test]
    fn painted_scale_targets_512(width in 1u16..=256, height in 1u16..=256) {
        let mut core = Pbn::new(&config(width, height));
        paint(&mut core, Vec::new());
        let scale = core.compute_scale();
        prop_assert_eq!(scale.horizontal, (512 / u32::from(width)).max(1));
        prop_assert_eq!(scale.vertical, (512 / u32::from(height)).max(1));
        prop_assert!(scale.horizontal * u32::from(width) <= 512);
    }

    #[test]
    fn last_write_wins_and_bounds_hold(points in prop::collection::vec(point_strategy(), 0..40)) {
        let mut core = Pbn::new(&config(64, 56));
        let submitted = paint(&mut core, points.clone());
        prop_assert_eq!(submitted as usize, points.len());

        let mut expected = vec![0u32; 64 * 56];
        for p in &points {
            if (0..64).contains(&p.x) && (0..56).contains(&p.y) {
                expected[p.y as usize * 64 + p.x as usize] = p.color;
            }
        }
        prop_assert_eq!(core.canvas().pixels(), expected.as_slice());
    }

    #[test]
    fn save_load_restores_painted_canvas(
        width in 1u16..=32,
        height in 1u16..=32,
        points in prop::collection::vec(point_strategy(), 0..20),
    ) {
        let mut core = Pbn::new(&config(width, height));
        paint(&mut core, points);
        let saved = core.save_state().to_vec();
        prop_assert_eq!(saved.len(), usize::from(width) * usize::from(height) * 3 + 1);

        let mut restored = Pbn::new(&config(width, height));
        prop_assert!(restored.load_state(&saved).is_ok());
        prop_assert_eq!(restored.canvas().pixels(), core.canvas().pixels());
        prop_assert!(restored.canvas().is_painted());
        prop_assert_eq!(restored.save_state(), saved.as_slice());
    }

    #[test]
    fn mis_sized_state_changes_nothing(extra in 1usize..8, shorter in any::<bool>()) {
        let mut core = Pbn::new(&config(5, 3));
        paint(&mut core, vec![PaintPoint::new(2, 1, 0x12_3456)]);
        let before = core.save_state().to_vec();

        let len = if shorter { before.len() - extra } else { before.len() + extra };
        prop_assert!(core.load_state(&vec![0xAA; len]).is_err());
        prop_assert_eq!(core.save_state(), before.as_slice());
    }
}
