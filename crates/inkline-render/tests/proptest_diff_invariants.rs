//! Property-based invariant tests for frame diffing and presentation.
//!
//! 1. `diff(F, F)` is all `Unchanged`, one edit per row.
//! 2. Applying `diff(A, B)` to the lines of `A` yields the lines of `B`.
//! 3. Presenting `A` then `B` on a terminal leaves exactly `B` on screen,
//!    with the cursor resting just below it.
//! 4. Edits are in ascending row order and cover every row of the taller frame.
//! 5. Plain-mode presentation never emits an escape byte.

use inkline_core::terminal_capabilities::TerminalCapabilities;
use inkline_render::diff::{LineEdit, apply_edits, diff};
use inkline_render::frame::{Frame, Line, Span};
use inkline_render::presenter::Presenter;
use inkline_render::style::{Color, Style};
use inkline_render::terminal_model::TerminalModel;
use inkline_render::terminal_writer::TerminalWriter;
use proptest::prelude::*;

const WIDTH: u16 = 16;

// ── Helpers ─────────────────────────────────────────────────────────────

fn style_strategy() -> impl Strategy<Value = Style> {
    prop_oneof![
        Just(Style::new()),
        Just(Style::new().bold()),
        Just(Style::new().fg(Color::GREEN)),
        Just(Style::new().fg(Color::Rgb(200, 10, 10)).underline()),
    ]
}

fn line_strategy() -> impl Strategy<Value = Line> {
    proptest::collection::vec(("[a-z0-9 %]{0,8}", style_strategy()), 0..3).prop_map(|spans| {
        spans
            .into_iter()
            .map(|(text, style)| Span::styled(text, style))
            .collect()
    })
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    proptest::collection::vec(line_strategy(), 0..8).prop_map(|lines| {
        let mut frame = Frame::new(WIDTH);
        frame.extend(lines);
        frame
    })
}

fn paint(frames: &[&Frame], caps: TerminalCapabilities) -> Vec<u8> {
    let mut presenter = Presenter::new();
    let mut writer = TerminalWriter::new(Vec::new(), caps);
    for frame in frames {
        writer.begin_batch().unwrap();
        if writer.is_interactive() {
            presenter.present(&mut writer, frame).unwrap();
        } else {
            presenter.append(&mut writer, frame).unwrap();
        }
        writer.end_batch().unwrap();
    }
    writer.into_inner()
}

fn expected_rows(frame: &Frame) -> Vec<String> {
    frame
        .plain_lines()
        .into_iter()
        .map(|row| row.trim_end().to_string())
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Diff idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn diff_of_identical_frames_is_all_unchanged(f in frame_strategy()) {
        let edits = diff(&f, &f);
        prop_assert_eq!(edits.len(), f.len());
        for (row, edit) in edits.iter().enumerate() {
            prop_assert_eq!(edit, &LineEdit::Unchanged(row));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Reconciliation on a line vector
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn applying_diff_reconciles(a in frame_strategy(), b in frame_strategy()) {
        let mut lines = a.lines().to_vec();
        apply_edits(&mut lines, &diff(&a, &b));
        prop_assert_eq!(lines.as_slice(), b.lines());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Reconciliation on a terminal
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn presenting_reconciles_terminal(a in frame_strategy(), b in frame_strategy()) {
        let out = paint(&[&a, &b], TerminalCapabilities::modern());
        let mut model = TerminalModel::new(WIDTH as usize, 12);
        model.process(&out);

        let screen = model.screen_text();
        let expected = expected_rows(&b);
        prop_assert_eq!(&screen[..b.len()], expected.as_slice());
        prop_assert!(screen[b.len()..].iter().all(String::is_empty));
        prop_assert_eq!(model.cursor(), (0, b.len()));
        prop_assert!(model.sync_output_balanced());
        prop_assert!(model.sgr_state().is_plain());
    }

    #[test]
    fn presented_styles_match_spans(f in frame_strategy()) {
        let out = paint(&[&f], TerminalCapabilities::basic());
        let mut model = TerminalModel::new(WIDTH as usize, 12);
        model.process(&out);

        for (row, line) in f.lines().iter().enumerate() {
            let mut x = 0;
            for span in line.spans() {
                for ch in span.text().chars() {
                    let cell = model.cell(x, row).unwrap();
                    if ch != ' ' {
                        prop_assert_eq!(cell.style, span.style());
                    }
                    x += 1;
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Edit ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edits_ascend_and_cover_rows(a in frame_strategy(), b in frame_strategy()) {
        let edits = diff(&a, &b);
        prop_assert_eq!(edits.len(), a.len().max(b.len()));
        for (row, edit) in edits.iter().enumerate() {
            prop_assert_eq!(edit.row(), row);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Plain mode is escape-free
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn plain_output_has_no_escapes(f in frame_strategy()) {
        let out = paint(&[&f], TerminalCapabilities::plain());
        prop_assert!(!out.contains(&0x1b));
        let text = String::from_utf8(out).unwrap();
        let expected: String = f.plain_lines().iter().map(|l| format!("{l}\n")).collect();
        prop_assert_eq!(text, expected);
    }
}
