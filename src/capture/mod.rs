// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture state and control surface

mod buffer;
mod config;
mod context;
mod control;

pub use buffer::LogBuffer;
pub use config::{CaptureConfig, ConfigUpdate, DEFAULT_MAX_LOG_SIZE};
pub use context::CaptureContext;
pub use control::{Capture, CaptureStatus, DirectorySaver, FileSaver};
