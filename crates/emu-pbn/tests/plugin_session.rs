//! Drive the core the way a host does: through the operation table, with a
//! scripted input driver registered at enumerate time.

use emu_core::Rational;
use emu_pbn::plugin::{ERROR_MESSAGE, STATUS_ERROR, STATUS_OK};
use emu_pbn::{Operation, PaintPoint, PaintScript, Params, Plugin, Scale, ScriptHost, Setting};

fn call(
    plugin: &mut Plugin<ScriptHost>,
    operation: Operation,
    params: &mut Params<'_, ScriptHost>,
) -> (i32, Option<&'static str>) {
    let mut error = None;
    let status = plugin.entrypoint(operation.code(), params, &mut error);
    (status, error)
}

fn session(script: PaintScript, width: &str, height: &str) -> Plugin<ScriptHost> {
    let mut plugin = Plugin::new();
    let mut enumerate = Params::EnumerateCores {
        host: Some(ScriptHost::new(script)),
        sysregions: None,
    };
    assert_eq!(call(&mut plugin, Operation::EnumerateCores, &mut enumerate).0, STATUS_OK);

    let settings = [Setting::new("width", width), Setting::new("height", height)];
    let mut load = Params::LoadRom {
        image: b"pbn",
        settings: &settings,
    };
    assert_eq!(call(&mut plugin, Operation::LoadRom, &mut load).0, STATUS_OK);
    plugin
}

fn emulate(plugin: &mut Plugin<ScriptHost>) -> u32 {
    let mut params = Params::Emulate { points: None };
    assert_eq!(call(plugin, Operation::Emulate, &mut params).0, STATUS_OK);
    match params {
        Params::Emulate { points: Some(n) } => n,
        other => panic!("unexpected record {other:?}"),
    }
}

fn save(plugin: &mut Plugin<ScriptHost>) -> Vec<u8> {
    let mut params = Params::SaveState { data: Vec::new() };
    assert_eq!(call(plugin, Operation::SaveState, &mut params).0, STATUS_OK);
    match params {
        Params::SaveState { data } => data,
        other => panic!("unexpected record {other:?}"),
    }
}

fn scale(plugin: &mut Plugin<ScriptHost>) -> Scale {
    let mut params = Params::ComputeScale { out: None };
    assert_eq!(call(plugin, Operation::ComputeScale, &mut params).0, STATUS_OK);
    match params {
        Params::ComputeScale { out: Some(scale) } => scale,
        other => panic!("unexpected record {other:?}"),
    }
}

#[test]
fn single_red_point_on_default_canvas() {
    let script = PaintScript {
        frames: vec![vec![PaintPoint::new(10, 5, 0xFF_0000)]],
    };
    let mut plugin = session(script, "64", "56");

    assert_eq!(
        scale(&mut plugin),
        Scale {
            horizontal: 1,
            vertical: 1
        }
    );
    assert_eq!(emulate(&mut plugin), 1);

    let core = plugin.core();
    assert_eq!(core.canvas().pixels()[5 * 64 + 10], 0xFF_0000);
    assert_eq!(core.canvas().pixels().iter().filter(|&&p| p != 0).count(), 1);
    assert!(core.canvas().is_painted());
    assert_eq!(
        scale(&mut plugin),
        Scale {
            horizontal: 8,
            vertical: 9
        }
    );

    let host = plugin.host().expect("host registered");
    assert_eq!(host.frames_submitted(), 1);
    assert_eq!(host.audio_frames_submitted(), 200);
    let frame = host.last_frame().expect("frame submitted");
    assert_eq!((frame.width, frame.height), (64, 56));
    assert_eq!(frame.pixels[5 * 64 + 10], 0xFF_0000);
}

#[test]
fn empty_frame_still_marks_painted_and_presents() {
    let mut plugin = session(PaintScript::default(), "8", "8");
    assert_eq!(emulate(&mut plugin), 0);
    assert!(plugin.core().canvas().is_painted());
    assert!(plugin.core().canvas().pixels().iter().all(|&p| p == 0));
    assert_eq!(plugin.host().map(ScriptHost::frames_submitted), Some(1));
}

#[test]
fn out_of_bounds_points_are_read_but_not_drawn() {
    let script = PaintScript {
        frames: vec![vec![
            PaintPoint::new(-1, 0, 0x11_1111),
            PaintPoint::new(4, 0, 0x22_2222),
            PaintPoint::new(3, 3, 0x33_3333),
        ]],
    };
    let mut plugin = session(script, "4", "4");
    assert_eq!(emulate(&mut plugin), 3);
    let pixels = plugin.core().canvas().pixels();
    assert_eq!(pixels[15], 0x33_3333);
    assert_eq!(pixels.iter().filter(|&&p| p != 0).count(), 1);
}

#[test]
fn save_then_load_restores_canvas_across_sessions() {
    let script = PaintScript {
        frames: vec![vec![PaintPoint::new(1, 2, 0x12_3456), PaintPoint::new(0, 0, 0xAB_CDEF)]],
    };
    let mut first = session(script, "3", "4");
    emulate(&mut first);
    let state = save(&mut first);
    assert_eq!(state.len(), 3 * 4 * 3 + 1);
    assert_eq!(state.last(), Some(&1));

    let mut second = session(PaintScript::default(), "3", "4");
    let mut load = Params::LoadState { data: &state };
    assert_eq!(call(&mut second, Operation::LoadState, &mut load).0, STATUS_OK);
    assert_eq!(second.core().canvas().pixels(), first.core().canvas().pixels());
    assert!(second.core().canvas().is_painted());
}

#[test]
fn wrong_length_state_is_rejected_without_change() {
    let script = PaintScript {
        frames: vec![vec![PaintPoint::new(0, 0, 0x00_FF00)]],
    };
    let mut plugin = session(script, "4", "4");
    emulate(&mut plugin);
    let before = save(&mut plugin);

    let short = vec![0xFF; before.len() - 1];
    let mut load = Params::LoadState { data: &short };
    assert_eq!(
        call(&mut plugin, Operation::LoadState, &mut load),
        (STATUS_ERROR, Some(ERROR_MESSAGE))
    );
    assert_eq!(save(&mut plugin), before);
}

#[test]
fn emulate_without_host_fails() {
    let mut plugin: Plugin<ScriptHost> = Plugin::new();
    let mut params = Params::Emulate { points: None };
    assert_eq!(
        call(&mut plugin, Operation::Emulate, &mut params),
        (STATUS_ERROR, Some(ERROR_MESSAGE))
    );
    assert!(matches!(params, Params::Emulate { points: None }));
}

#[test]
fn unusable_settings_fall_back_to_defaults() {
    let mut plugin = session(PaintScript::default(), "0", "300");
    assert_eq!(plugin.core().canvas().width(), 64);
    assert_eq!(plugin.core().canvas().height(), 56);
    emulate(&mut plugin);
    assert_eq!(
        scale(&mut plugin),
        Scale {
            horizontal: 8,
            vertical: 9
        }
    );
}

#[test]
fn paint_limit_ends_frame_early() {
    let script = PaintScript {
        frames: vec![
            (0..5).map(|x| PaintPoint::new(x, 0, 0xFF_FFFF)).collect(),
            vec![PaintPoint::new(0, 1, 0x00_00FF)],
        ],
    };
    let mut plugin = session(script, "8", "2").with_paint_limit(Some(2));
    assert_eq!(emulate(&mut plugin), 2);
    assert_eq!(emulate(&mut plugin), 1);
    let pixels = plugin.core().canvas().pixels();
    assert_eq!(&pixels[..3], &[0xFF_FFFF, 0xFF_FFFF, 0]);
    assert_eq!(pixels[8], 0x00_00FF);
}

#[test]
fn static_tables_are_served() {
    let mut plugin = session(PaintScript::default(), "64", "56");

    let mut info = Params::CoreInfo { out: None };
    assert_eq!(call(&mut plugin, Operation::CoreInfo, &mut info).0, STATUS_OK);
    let Params::CoreInfo { out: Some(info) } = info else {
        panic!("core info not filled");
    };
    assert_eq!(info.short_name, "pbn");

    let mut av = Params::AvState { out: None };
    assert_eq!(call(&mut plugin, Operation::AvState, &mut av).0, STATUS_OK);
    let Params::AvState { out: Some(av) } = av else {
        panic!("av state not filled");
    };
    assert_eq!(av.sample_rate, Rational::whole(12_000));
    assert_eq!(av.fps, Rational::whole(60));
    assert_eq!((av.lightgun_width, av.lightgun_height), (64, 56));
}

#[test]
fn unknown_operation_reports_error() {
    let mut plugin = session(PaintScript::default(), "64", "56");
    let mut params = Params::ComputeScale { out: None };
    let mut error = None;
    assert_eq!(plugin.entrypoint(99, &mut params, &mut error), STATUS_ERROR);
    assert_eq!(error, Some(ERROR_MESSAGE));
}
