// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Layered frame settings for a high-definition render pipeline.
//!
//! The effective rendering configuration of a camera is a large record of boolean features,
//! stored as a 128-bit bit array. It is produced once per frame by three layers:
//!
//! - The [`DefaultFrameSettings`](crate::pipeline::DefaultFrameSettings) hold one preset per kind
//!   of rendering context. The [`RenderType`](crate::context::RenderType) of the
//!   [`FrameContext`](crate::context::FrameContext) selects which one is used.
//!
//! - A [`CustomFrameSettings`](crate::frame_settings::CustomFrameSettings) can be attached to a
//!   camera. Its override mask selects which of its fields replace the preset ones, with
//!   [`FrameSettings::override_with`](crate::frame_settings::FrameSettings::override_with).
//!
//! - [`FrameSettings::sanitize`](crate::frame_settings::FrameSettings::sanitize) then disables
//!   everything the platform does not support, as described by the
//!   [`RenderPipelineSettings`](crate::pipeline::RenderPipelineSettings), or that makes no sense
//!   in the current context (preview cameras, reflection probes, stereo rendering, wireframe).
//!
//! [`FrameSettings::aggregate`](crate::frame_settings::FrameSettings::aggregate) runs all three
//! layers. When a debug interface needs to inspect and tweak the result, the
//! [`FrameSettingsHistoryStore`](crate::frame_settings::history::FrameSettingsHistoryStore) keeps
//! one history per camera on top of that.
//!
//! Frame settings serialized by the earlier format, one boolean per feature with separate
//! override flags, are converted with [`migrate`](crate::frame_settings::migration::migrate).
//!
//! # Cargo features
//!
//! - `serde`: implements `Serialize` and `Deserialize` for the bit arrays, the frame settings,
//!   the override masks, the pipeline configuration and the legacy format.

pub use crate::{
    bit_array::{BitArray, BitArray128, BitArray16, BitArray32, BitArray64, BitArray8},
    context::{FrameContext, RenderType},
    frame_settings::{
        CustomFrameSettings, FrameSettings, FrameSettingsField, FrameSettingsOverrideMask,
        LitShaderMode,
    },
    pipeline::{DefaultFrameSettings, RenderPipelineSettings, SupportedLitShaderMode},
};

#[macro_use]
mod macros;
pub mod bit_array;
pub mod context;
pub mod frame_settings;
pub mod pipeline;

/// A helper type for non-exhaustive structs.
///
/// This type cannot be constructed outside this crate. Structures with a field of this type can
/// only be constructed by calling a constructor function or `Default::default()`. The effect is
/// similar to the standard Rust `#[non_exhaustive]` attribute, except that it does not prevent
/// update syntax from being used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)] // add traits as needed
pub struct NonExhaustive(pub(crate) ());

impl NonExhaustive {
    #[inline]
    pub(crate) const fn new() -> Self {
        NonExhaustive(())
    }
}
