//! Demonstrates channel toggling and the controller-reset indicator frame.
//! This example requires the `--features simulation` flag to be enabled.
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

#[cfg(feature = "simulation")]
fn main() {
    use std::sync::{Arc, Mutex};

    use pidscope::channel::ChannelId;
    use pidscope::render::{draw_frame, OverlayCore};
    use pidscope::sim::DemoPid;
    use pidscope::surface::Framebuffer;

    let pid = Arc::new(Mutex::new(DemoPid::new(2.0, 0.5, 0.1)));
    let mut core = OverlayCore::new(pid.clone());
    let mut frame = Framebuffer::new(400, 300);

    // Plot the raw error next to the P/I/D contributions
    core.channels_mut().toggle(ChannelId::Ep);

    for step in 0..120usize {
        let setpoint = if step < 60 { 1.0 } else { -1.0 };
        pid.lock().unwrap().step(0.0, setpoint, 0.033);
        draw_frame(&mut core, &mut frame).unwrap();
    }
    println!(
        "after 120 ticks: {} samples retained, reset = {}",
        core.ring().len(),
        core.was_reset()
    );

    // A controller reset purges the history and flags the next frame
    pid.lock().unwrap().reset();
    draw_frame(&mut core, &mut frame).unwrap();
    println!(
        "after reset:    {} samples retained, reset = {}",
        core.ring().len(),
        core.was_reset()
    );

    // Recording resumes on the next valid sample
    pid.lock().unwrap().step(0.0, 1.0, 0.033);
    draw_frame(&mut core, &mut frame).unwrap();
    println!(
        "one tick later: {} samples retained, reset = {}",
        core.ring().len(),
        core.was_reset()
    );

    for id in ChannelId::ALL {
        let latest = core.ring().latest().copied().unwrap_or_default();
        println!(
            "{:>2} [{}]: {:.6}",
            id.label(),
            if core.channels().is_enabled(id) { "x" } else { " " },
            id.value(&latest)
        );
    }
}

#[cfg(not(feature = "simulation"))]
fn main() {
    eprintln!("This example requires `--features simulation` to run.");
}
