//! Closed-loop step-response demo: a PID controller driving a
//! mass-spring-damper plant, observed live by the overlay. The final frame is
//! written out as a PPM image for inspection.
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
mod headless {
    use std::sync::atomic::{AtomicBool, Ordering};

    use pidscope::overlay::{HostWindow, WindowGeometry, DEFAULT_GEOMETRY};

    /// A windowless host good enough for driving the overlay off-screen.
    pub struct HeadlessWindow {
        visible: AtomicBool,
    }

    impl HeadlessWindow {
        pub fn new() -> Self {
            Self {
                visible: AtomicBool::new(false),
            }
        }
    }

    impl HostWindow for HeadlessWindow {
        fn geometry(&self) -> WindowGeometry {
            DEFAULT_GEOMETRY
        }

        fn set_title(&self, _title: &str) {}

        fn set_resize_limits(&self, _min_w: u32, _min_h: u32, _max_w: u32, _max_h: u32) {}

        fn set_visible(&self, visible: bool) {
            self.visible.store(visible, Ordering::Relaxed);
        }

        fn is_visible(&self) -> bool {
            self.visible.load(Ordering::Relaxed)
        }

        fn bring_to_front(&self) {}
    }
}

#[cfg(feature = "simulation")]
fn write_ppm(frame: &pidscope::surface::Framebuffer, path: &str) -> std::io::Result<()> {
    use std::io::Write;

    use embedded_graphics::prelude::RgbColor;

    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(out, "P6\n{} {}\n255", frame.width(), frame.height())?;
    for pixel in frame.data() {
        out.write_all(&[pixel.r(), pixel.g(), pixel.b()])?;
    }
    Ok(())
}

#[cfg(feature = "simulation")]
fn main() {
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use nalgebra as na;
    use pidscope::overlay::Overlay;
    use pidscope::sim::{self, DemoPid, SignalGenerator, WaveForm};

    const FIXED_STEP_SIZE_S: f64 = 0.01;

    let pid = Arc::new(Mutex::new(DemoPid::new(10.0, 25.0, 1.0)));
    let mut overlay = Overlay::new(
        headless::HeadlessWindow::new(),
        "mass-spring-damper PID",
        pid.clone(),
        None,
    );

    let mdl = sim::MassSpringDamper {
        natural_frequency: 0.5 * std::f64::consts::PI,
        damping_ratio: 0.2,
    };
    let square = SignalGenerator::new(WaveForm::Square, 0.5, 0.5);

    let mut state = na::Vector2::<f64>::zeros();
    let mut output: f64 = 0.0;

    for step in 0..1000usize {
        let time = step as f64 * FIXED_STEP_SIZE_S;
        let setpoint = square.generate(time);
        let control = pid
            .lock()
            .unwrap()
            .step(output, setpoint, FIXED_STEP_SIZE_S);
        state = sim::rk4_step(|x| mdl.f(x, control), state, FIXED_STEP_SIZE_S);
        output = mdl.h(state);

        overlay.draw(|_, _| {}).unwrap();

        // Keep the loop slower than the 30 Hz sampler so the plot sees the
        // transient instead of just its end state
        thread::sleep(Duration::from_millis(2));
    }

    println!("recorded {} samples", overlay.sample_count());
    overlay
        .draw(|frame, _| write_ppm(frame, "step_response.ppm").unwrap())
        .unwrap();
    println!("wrote step_response.ppm");
}

#[cfg(not(feature = "simulation"))]
fn main() {
    eprintln!("This example requires `--features simulation` to run.");
}
