#![warn(missing_docs)]

//! # pidscope: a host-embedded PID debug overlay
//!
//! This library implements the data-sampling, scaling and rendering pipeline of a floating
//! debug window that observes a PID controller inside a host application (e.g. a
//! flight-simulator plugin): once per rendered frame it snapshots the controller's internal
//! state, keeps a bounded scrolling history, and plots the selected signals as line charts
//! with a live numeric readout.
//!
//! The host remains an external collaborator. It owns the window, the event loop and the
//! controller itself; the crate talks to it through three narrow seams:
//!
//! - [`probe::ControllerProbe`] — how controller state is snapshotted,
//! - [`overlay::HostWindow`] — the window services consumed (geometry, title, visibility),
//! - [`overlay::FrameSink`] — an optional upload path for finished frames.
//!
//! ## Features
//!
//! - Bounded sample history (8192 snapshots) with FIFO eviction and O(1) append.
//! - A fixed catalog of 11 channels: the P/I/D contributions, the raw error terms, and the
//!   controller parameters, each individually toggleable at runtime.
//! - A shared, always-zero-anchored value range so the zero axis stays visible no matter
//!   the sign of the data.
//! - Controller resets (signalled by a NaN error derivative) purge the history and render
//!   an unmistakable indicator frame instead of a misleading chart.
//! - Rendering runs on a dedicated thread at a fixed refresh rate, double-buffered, and is
//!   joined before teardown so destruction never races an in-flight frame.
//!
//! ## Sampling and plotting without a host
//!
//! The pipeline is fully usable headless; any shared [`probe::PidState`] works as a probe:
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use pidscope::probe::PidState;
//! use pidscope::render::{draw_frame, OverlayCore};
//! use pidscope::surface::Framebuffer;
//!
//! let probe = Arc::new(Mutex::new(PidState {
//!     kp: 2.0,
//!     err: 1.5,
//!     ..Default::default()
//! }));
//!
//! let mut core = OverlayCore::new(probe);
//! let mut frame = Framebuffer::new(400, 300);
//!
//! // One call runs the whole per-tick pipeline: sample, rescale, draw
//! draw_frame(&mut core, &mut frame).unwrap();
//! assert_eq!(core.ring().len(), 1);
//! ```
//!
//! ## Working with the pieces directly
//!
//! ```rust
//! use pidscope::channel::{ChannelId, ChannelSet};
//! use pidscope::probe::{PidState, Sample};
//! use pidscope::ring::SampleRing;
//! use pidscope::scale::ScaleRange;
//!
//! let mut ring = SampleRing::new();
//! for err in [1.0, 2.0, 3.0] {
//!     ring.record(Sample::from_state(PidState {
//!         kp: 2.0,
//!         err,
//!         ..Default::default()
//!     }));
//! }
//!
//! let mut channels = ChannelSet::none();
//! channels.enable(ChannelId::P);
//!
//! // The zero baseline is always part of the range
//! let range = ScaleRange::compute(&ring, &channels, 64);
//! assert_eq!((range.min(), range.max()), (0.0, 6.0));
//! ```
//!
//! ## License
//!

/// Controller snapshots and the probe seam to the externally owned controller.
pub mod probe;

/// The bounded, time-ordered history of controller snapshots.
pub mod ring;

/// The fixed catalog of plottable channels and their selection flags.
pub mod channel;

/// The shared min/max value range that normalizes vertical plot positions.
pub mod scale;

/// The per-frame rendering pipeline and its tunable constants.
pub mod render;

/// The owned off-screen surface and the dedicated render thread.
pub mod surface;

/// The overlay lifecycle tying the pipeline to a host window.
pub mod overlay;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
