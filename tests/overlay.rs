// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use fixtures::test_overlay::{make_state, CountingSink, TestWindow};

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pidscope::channel::ChannelId;
use pidscope::overlay::{HostWindow, Overlay};
use pidscope::probe::PidState;

fn make_overlay(window: TestWindow) -> Overlay<TestWindow> {
    let probe = Arc::new(Mutex::new(make_state(2.0, 0.1, 0.0, 1.0, 0.0, 0.0)));
    Overlay::new(window, "pitch rate PID", probe, None)
}

// A couple of render periods, enough for the 30 Hz worker to tick at least once
fn settle() {
    thread::sleep(Duration::from_millis(150));
}

#[test]
fn test_construction_opens_and_titles_the_window() {
    let window = TestWindow::with_size(300, 300);
    let overlay = make_overlay(window.clone());

    assert!(overlay.is_open());
    assert_eq!(window.title(), "pitch rate PID");
    assert!(window.front_requests() >= 1);
}

#[test]
#[should_panic(expected = "title must be non-empty")]
fn test_empty_title_is_a_programming_error() {
    let window = TestWindow::with_size(300, 300);
    let probe = Arc::new(Mutex::new(PidState::default()));
    let _ = Overlay::new(window, "", probe, None);
}

#[test]
fn test_hide_and_reshow_preserves_history() {
    let window = TestWindow::with_size(300, 300);
    let mut overlay = make_overlay(window.clone());

    overlay.draw(|_, _| {}).unwrap();
    settle();
    let before = overlay.sample_count();
    assert!(before > 0);

    window.set_visible(false);
    assert!(!overlay.is_open());
    overlay.open();
    assert!(overlay.is_open());
    assert!(overlay.sample_count() >= before);
}

#[test]
fn test_first_draw_creates_target_at_window_size() {
    let window = TestWindow::with_size(300, 300);
    let mut overlay = make_overlay(window);

    assert_eq!(overlay.render_size(), None);
    let mut presented = None;
    overlay
        .draw(|frame, _| presented = Some((frame.width(), frame.height())))
        .unwrap();

    assert_eq!(presented, Some((300, 300)));
    assert_eq!(overlay.render_size(), Some((300, 300)));
}

#[test]
fn test_resize_recreates_target_at_new_size() {
    let window = TestWindow::with_size(300, 300);
    let mut overlay = make_overlay(window.clone());

    overlay.draw(|_, _| {}).unwrap();
    assert_eq!(overlay.render_size(), Some((300, 300)));

    window.resize(600, 400);
    let mut presented = None;
    overlay
        .draw(|frame, geometry| {
            presented = Some((frame.width(), frame.height(), geometry.width()))
        })
        .unwrap();

    // The old worker is joined and replaced before the frame is presented
    assert_eq!(presented, Some((600, 400, 600)));
    assert_eq!(overlay.render_size(), Some((600, 400)));
}

#[test]
fn test_unchanged_size_reuses_the_target() {
    let window = TestWindow::with_size(300, 300);
    let mut overlay = make_overlay(window);

    overlay.draw(|_, _| {}).unwrap();
    settle();
    let samples_before = overlay.sample_count();

    // A second draw at the same size must not tear down the worker; history
    // keeps accumulating in the same ring either way
    overlay.draw(|_, _| {}).unwrap();
    settle();
    assert!(overlay.sample_count() >= samples_before);
    assert_eq!(overlay.render_size(), Some((300, 300)));
}

#[test]
fn test_pause_stops_ring_growth() {
    let window = TestWindow::with_size(300, 300);
    let mut overlay = make_overlay(window);
    overlay.set_paused(true);

    overlay.draw(|_, _| {}).unwrap();
    settle();
    assert_eq!(overlay.sample_count(), 0);

    overlay.set_paused(false);
    settle();
    assert!(overlay.sample_count() > 0);
}

#[test]
fn test_channel_toggle_round_trips_through_the_overlay() {
    let window = TestWindow::with_size(300, 300);
    let overlay = make_overlay(window);

    assert!(overlay.channel_enabled(ChannelId::P));
    assert!(!overlay.channel_enabled(ChannelId::Kp));

    overlay.toggle_channel(ChannelId::Kp);
    assert!(overlay.channel_enabled(ChannelId::Kp));
    overlay.toggle_channel(ChannelId::Kp);
    assert!(!overlay.channel_enabled(ChannelId::Kp));
}

#[test]
fn test_sink_receives_finished_frames() {
    let window = TestWindow::with_size(300, 300);
    let sink = Arc::new(CountingSink::default());
    let probe = Arc::new(Mutex::new(make_state(2.0, 0.1, 0.0, 1.0, 0.0, 0.0)));
    let mut overlay = Overlay::new(window, "sink test", probe, Some(sink.clone()));

    overlay.draw(|_, _| {}).unwrap();
    settle();
    assert!(sink.frames() > 0);
}

#[test]
fn test_drop_joins_the_worker_and_hides_the_window() {
    let window = TestWindow::with_size(300, 300);
    let sink = Arc::new(CountingSink::default());
    let probe = Arc::new(Mutex::new(make_state(2.0, 0.1, 0.0, 1.0, 0.0, 0.0)));
    let mut overlay = Overlay::new(window.clone(), "teardown test", probe, Some(sink.clone()));

    overlay.draw(|_, _| {}).unwrap();
    settle();
    drop(overlay);

    assert!(!window.is_visible());

    // The render thread is joined on drop, so frame production has ceased
    let frames_at_drop = sink.frames();
    settle();
    assert_eq!(sink.frames(), frames_at_drop);
}
