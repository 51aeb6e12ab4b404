//! End-to-end editor scenarios driven with simulated time.

use flipbook_core::{
    CaptureOptions, CaptureSink, Command, EditorConfig, EditorError, EncoderError, Key, Layer, Mode, Editor,
    Rejection, Rgba, Services, StillSink, Stroke, Surface, View,
};
use kurbo::Point;
use std::sync::Arc;

#[derive(Default)]
struct FakeCapture {
    started: Option<(String, usize, CaptureOptions)>,
    frames: Vec<Layer>,
    fail_start: bool,
    fail_on_frame: Option<usize>,
    completion: Option<Result<String, EncoderError>>,
}

impl CaptureSink for FakeCapture {
    fn start(&mut self, name: &str, frame_count: usize, options: &CaptureOptions) -> Result<(), EncoderError> {
        if self.fail_start {
            return Err(EncoderError::Start("no encoder".into()));
        }
        self.started = Some((name.to_string(), frame_count, *options));
        Ok(())
    }

    fn push_frame(&mut self, frame: &Layer) -> Result<(), EncoderError> {
        if self.fail_on_frame == Some(self.frames.len()) {
            return Err(EncoderError::Frame("disk full".into()));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn poll_completion(&mut self) -> Option<Result<String, EncoderError>> {
        self.completion.take()
    }
}

#[derive(Default)]
struct FakeStills {
    written: Vec<(String, Layer)>,
}

impl StillSink for FakeStills {
    fn write_still(&mut self, filename: &str, frame: &Layer) -> Result<(), EncoderError> {
        self.written.push((filename.to_string(), frame.clone()));
        Ok(())
    }
}

fn editor() -> Editor {
    Editor::new(EditorConfig::with_base_size(160, 120))
}

fn scribble(editor: &mut Editor, seed: u32) {
    let s = f64::from(seed);
    let color = Rgba::new((seed * 40 % 256) as u8, 30, (255 - seed * 25 % 256) as u8, 200);
    editor
        .begin_stroke(Point::new(10.0 + s * 7.0, 15.0), 3.0 + s, color)
        .unwrap();
    editor.extend_stroke(Point::new(60.0, 40.0 + s * 5.0)).unwrap();
    editor.extend_stroke(Point::new(120.0 - s * 3.0, 90.0)).unwrap();
    editor.end_stroke().unwrap();
}

fn commit_frames(editor: &mut Editor, count: u32) {
    for i in 0..count {
        scribble(editor, i);
        editor.commit(u64::from(i) * 1000).unwrap();
    }
}

/// Tick every 16 ms from `from` until record mode ends. Returns the time
/// of the last tick.
fn run_capture(editor: &mut Editor, capture: &mut FakeCapture, from: u64) -> u64 {
    let mut now = from;
    while editor.mode() == Mode::Record {
        now += 16;
        editor.tick(now, capture);
        assert!(now < from + 60_000, "capture never finished");
    }
    now
}

#[test]
fn undo_matches_replay_of_remaining_strokes() {
    let mut editor = editor();
    for seed in 0..5 {
        scribble(&mut editor, seed);
    }

    while !editor.store().active().strokes().is_empty() {
        editor.undo(0).unwrap();
        let mut replay = Layer::new(160, 120);
        for stroke in editor.store().active().strokes() {
            stroke.draw(&mut replay, editor.config().tuning.interp_spacing);
        }
        assert_eq!(*editor.store().active().layer(), replay);
    }
    assert!(editor.store().active().layer().is_blank());
    assert_eq!(editor.undo(0), Err(Rejection::NothingToUndo.into()));
}

#[test]
fn commit_grows_sequence_by_one_and_resets_active() {
    let mut editor = editor();
    assert_eq!(editor.commit(0), Err(Rejection::EmptyLayer.into()));
    assert!(editor.store().committed().is_empty());

    scribble(&mut editor, 1);
    editor.commit(1000).unwrap();
    assert_eq!(editor.store().committed_len(), 1);
    assert!(!editor.store().active().has_content());
    assert!(editor.store().active().strokes().is_empty());

    assert!(editor.commit(2000).is_err());
    assert_eq!(editor.store().committed_len(), 1);
}

#[test]
fn sequence_counts_active_only_with_content() {
    let mut editor = editor();
    commit_frames(&mut editor, 2);
    assert_eq!(editor.sequence().len(), 2);

    scribble(&mut editor, 7);
    assert_eq!(editor.sequence().len(), 3);

    editor.clear_active(10_000).unwrap();
    assert_eq!(editor.sequence().len(), 2);
}

#[test]
fn export_restores_draw_mode() {
    let mut editor = editor();
    commit_frames(&mut editor, 3);
    let mut capture = FakeCapture::default();

    assert_eq!(editor.export_animation(&mut capture, 10_000), Ok(3));
    assert_eq!(editor.mode(), Mode::Record);
    run_capture(&mut editor, &mut capture, 10_000);

    assert_eq!(editor.mode(), Mode::Draw);
    assert_eq!(capture.frames.len(), 3);
    let (name, count, options) = capture.started.clone().unwrap();
    assert!(name.starts_with("flipbook_"));
    assert_eq!(count, 3);
    assert_eq!(options.fps, 12);
    assert_eq!(options.background, Rgba::WHITE);
}

#[test]
fn export_restores_play_mode() {
    let mut editor = editor();
    commit_frames(&mut editor, 2);
    editor.toggle_play(5000).unwrap();
    let mut capture = FakeCapture::default();

    editor.export_animation(&mut capture, 5000).unwrap();
    run_capture(&mut editor, &mut capture, 5000);
    assert_eq!(editor.mode(), Mode::Play);
}

#[test]
fn playback_resumes_with_fresh_clock_after_export() {
    let mut editor = editor();
    commit_frames(&mut editor, 3);
    editor.toggle_play(5000).unwrap();
    let mut capture = FakeCapture::default();

    editor.export_animation(&mut capture, 5000).unwrap();
    let end = run_capture(&mut editor, &mut capture, 5000);
    assert_eq!(editor.mode(), Mode::Play);
    assert_eq!(editor.play_index(), 0);

    // fps 12: the next frame is due ~83 ms after the export ended.
    editor.tick(end + 16, &mut capture);
    assert_eq!(editor.play_index(), 0);
    editor.tick(end + 84, &mut capture);
    assert_eq!(editor.play_index(), 1);
}

#[test]
fn export_failure_restores_previous_mode() {
    for play_first in [false, true] {
        let mut editor = editor();
        commit_frames(&mut editor, 3);
        if play_first {
            editor.toggle_play(5000).unwrap();
        }
        let before = editor.mode();

        let mut capture = FakeCapture {
            fail_on_frame: Some(1),
            ..FakeCapture::default()
        };
        editor.export_animation(&mut capture, 5000).unwrap();
        run_capture(&mut editor, &mut capture, 5000);
        assert_eq!(editor.mode(), before);
        assert_eq!(capture.frames.len(), 1);
        assert!(editor.status(6000).contains("disk full"));

        let mut broken = FakeCapture {
            fail_start: true,
            ..FakeCapture::default()
        };
        assert!(matches!(
            editor.export_animation(&mut broken, 7000),
            Err(EditorError::Encoder(EncoderError::Start(_)))
        ));
        assert_eq!(editor.mode(), before);
        assert!(editor.recording().is_none());
    }
}

#[test]
fn export_presents_snapshot_in_order() {
    let mut editor = editor();
    commit_frames(&mut editor, 3);
    scribble(&mut editor, 9);
    let snapshot = editor.sequence();
    assert_eq!(snapshot.len(), 4);

    let mut capture = FakeCapture::default();
    editor.export_animation(&mut capture, 10_000).unwrap();

    // Edits are refused while recording, so the snapshot cannot drift.
    let mut yes = |_: &str| true;
    assert!(editor.clear_all(&mut yes, 10_001).is_err());
    assert!(editor.commit(10_002).is_err());

    let mut now = 10_000;
    let mut counted = 0;
    while editor.mode() == Mode::Record {
        now += 16;
        let before = capture.frames.len();
        editor.tick(now, &mut capture);
        // The tick presents frame `counted` whether or not it was counted.
        let presented = counted % snapshot.len();
        if capture.frames.len() > before {
            assert_eq!(capture.frames[counted], *snapshot[presented]);
            counted += 1;
        }
        if editor.mode() == Mode::Record {
            match editor.view() {
                View::Frame(frame) => assert_eq!(frame, snapshot[presented].as_ref()),
                View::Draw { .. } => panic!("onion skins shown while recording"),
            }
        }
    }
    assert_eq!(counted, 4);
    assert_eq!(editor.sequence().len(), 4);
}

#[test]
fn export_warm_up_skips_first_ticks() {
    let mut editor = editor();
    commit_frames(&mut editor, 1);
    let mut capture = FakeCapture::default();
    editor.export_animation(&mut capture, 0).unwrap();

    editor.tick(400, &mut capture);
    editor.tick(416, &mut capture);
    assert!(capture.frames.is_empty());
    assert_eq!(editor.mode(), Mode::Record);

    editor.tick(432, &mut capture);
    assert_eq!(capture.frames.len(), 1);
    assert_eq!(editor.mode(), Mode::Draw);
}

#[test]
fn export_of_empty_sequence_is_rejected() {
    let mut editor = editor();
    let mut capture = FakeCapture::default();
    assert_eq!(editor.export_animation(&mut capture, 0), Err(EditorError::EmptySequence));
    assert_eq!(editor.mode(), Mode::Draw);
    assert!(capture.started.is_none());

    let mut stills = FakeStills::default();
    assert_eq!(editor.export_images(&mut stills, 0), Err(EditorError::EmptySequence));
}

#[test]
fn encoder_completion_updates_status() {
    let mut editor = editor();
    let mut capture = FakeCapture {
        completion: Some(Ok("flipbook_20240101_120000.gif".into())),
        ..FakeCapture::default()
    };
    editor.tick(100, &mut capture);
    assert_eq!(editor.status(100), "Saved flipbook_20240101_120000.gif");
    assert_eq!(editor.mode(), Mode::Draw);
}

#[test]
fn late_encoder_failure_is_reported_without_mode_change() {
    let mut editor = editor();
    commit_frames(&mut editor, 2);
    editor.toggle_play(3000).unwrap();
    let mut capture = FakeCapture {
        completion: Some(Err(EncoderError::Delivery("read-only directory".into()))),
        ..FakeCapture::default()
    };

    editor.tick(3010, &mut capture);
    assert!(editor.status(3010).contains("read-only directory"));
    assert_eq!(editor.mode(), Mode::Play);
    assert_eq!(editor.sequence().len(), 2);
}

#[test]
fn tap_commit_produces_single_dot() {
    let mut editor = editor();
    editor.begin_stroke(Point::new(100.0, 100.0), 6.0, Rgba::BLACK).unwrap();
    editor.end_stroke().unwrap();
    editor.commit(0).unwrap();

    assert_eq!(editor.store().committed_len(), 1);
    assert!(!editor.store().active().has_content());
    assert!(editor.store().active().layer().is_blank());

    let frame = &editor.store().committed()[0];
    assert_eq!(frame.pixel(100, 100), Some(Rgba::BLACK));
    assert_eq!(frame.pixel(101, 100).map(|c| c.a), Some(255));
    for (x, y) in [(100, 95), (105, 100), (96, 96), (0, 0), (150, 110)] {
        assert_eq!(frame.pixel(x, y).map(|c| c.a), Some(0), "({x}, {y}) should be transparent");
    }

    let mut expected = Layer::new(160, 120);
    expected.circle(Point::new(100.0, 100.0), 6.0, Rgba::BLACK);
    assert_eq!(**frame, expected);
}

#[test]
fn playback_advances_at_fps() {
    let mut editor = editor();
    editor.set_fps(10);
    commit_frames(&mut editor, 3);
    let mut capture = FakeCapture::default();

    editor.toggle_play(0).unwrap();
    let start = editor.play_index();
    let mut now = 0;
    while now + 16 <= 250 {
        now += 16;
        editor.tick(now, &mut capture);
    }
    assert_eq!(editor.play_index(), (start + 2) % 3);
}

#[test]
fn declined_clear_all_changes_nothing() {
    let mut editor = editor();
    commit_frames(&mut editor, 2);
    scribble(&mut editor, 5);
    editor.toggle_play(9000).unwrap();

    let committed: Vec<Arc<Layer>> = editor.store().committed().to_vec();
    let active = editor.store().active().layer().clone();
    let strokes: Vec<Stroke> = editor.store().active().strokes().to_vec();

    let mut asked = 0;
    let mut no = |_: &str| {
        asked += 1;
        false
    };
    assert_eq!(editor.clear_all(&mut no, 9100), Err(Rejection::ClearAllDeclined.into()));
    assert_eq!(asked, 1);

    assert_eq!(editor.store().committed(), committed.as_slice());
    assert_eq!(*editor.store().active().layer(), active);
    assert_eq!(editor.store().active().strokes(), strokes.as_slice());
    assert_eq!(editor.mode(), Mode::Play);
}

#[test]
fn onion_frames_fade_with_age() {
    let mut editor = editor();
    commit_frames(&mut editor, 5);
    let committed = editor.store().committed().to_vec();

    match editor.view() {
        View::Draw { onion, .. } => {
            assert_eq!(onion.len(), 3);
            for (frame, expected) in onion.iter().zip(&committed[2..]) {
                assert_eq!(frame.layer, expected.as_ref());
            }
            let opacities: Vec<f64> = onion.iter().map(|f| f.opacity).collect();
            let expected = [0.16 * 0.55 * 0.55, 0.16 * 0.55, 0.16];
            for (got, want) in opacities.iter().zip(expected) {
                assert!((got - want).abs() < 1e-9, "{got} != {want}");
            }
        }
        View::Frame(_) => panic!("draw mode should show onion skins"),
    }
}

#[test]
fn png_sequence_names_and_opacity() {
    let mut editor = editor();
    commit_frames(&mut editor, 2);
    scribble(&mut editor, 3);
    let mut stills = FakeStills::default();

    assert_eq!(editor.export_images(&mut stills, 0), Ok(3));
    assert_eq!(editor.mode(), Mode::Draw);
    assert_eq!(stills.written.len(), 3);
    for (i, (name, layer)) in stills.written.iter().enumerate() {
        assert!(name.starts_with("flipbook_"));
        assert!(name.ends_with(&format!("_frame_{i:03}.png")), "{name}");
        assert!(layer.pixels().chunks_exact(4).all(|px| px[3] == 255));
    }
    assert_eq!(stills.written[0].1.pixel(0, 0), Some(Rgba::WHITE));
}

#[test]
fn shortcuts_dispatch_and_are_ignored_while_recording() {
    let mut editor = editor();
    let mut capture = FakeCapture::default();
    let mut stills = FakeStills::default();
    let mut confirm = |_: &str| true;

    scribble(&mut editor, 1);
    {
        let mut services = Services {
            capture: &mut capture,
            stills: &mut stills,
            confirm: &mut confirm,
        };
        assert_eq!(editor.handle_key(Key::Enter, &mut services, 0), Some(Ok(())));
        assert_eq!(editor.handle_key(Key::Char('x'), &mut services, 0), None);
        assert_eq!(editor.handle_key(Key::Char('S'), &mut services, 1000), Some(Ok(())));
        assert_eq!(editor.mode(), Mode::Record);
        assert!(matches!(
            editor.handle_key(Key::Char('z'), &mut services, 1016),
            Some(Err(EditorError::Rejected(Rejection::WrongMode { mode: Mode::Record })))
        ));
        assert!(editor.execute(Command::TogglePlay, &mut services, 1032).is_err());
    }
    assert_eq!(editor.store().committed_len(), 1);
}
