// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Per-camera history of the frame settings aggregation, for debug tools.
//!
//! A debug interface shows the frame settings that a camera uses and lets the user toggle
//! individual fields. Those edits must survive from one frame to the next, but must also be
//! discarded as soon as the aggregated settings change, since they were made against a different
//! state. [`FrameSettingsHistoryStore`] keeps one [`FrameSettingsHistory`] per camera for this
//! purpose. It is owned by the caller and keyed by whatever identifies a camera.

use super::{
    CustomFrameSettings, FrameSettings, FrameSettingsField, FrameSettingsOverrideMask,
    LitShaderMode, PackedEnum,
};
use crate::{
    context::{FrameContext, RenderType},
    pipeline::{DefaultFrameSettings, RenderPipelineSettings},
};
use foldhash::HashMap;
use log::{debug, trace};
use parking_lot::Mutex;
use std::{
    collections::hash_map::Entry,
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
    hash::Hash,
    sync::Arc,
};

/// The successive states of the frame settings of a camera, as of its last aggregation.
#[derive(Clone, Debug)]
pub struct FrameSettingsHistory {
    render_type: RenderType,
    default: FrameSettings,
    custom: FrameSettings,
    custom_mask: FrameSettingsOverrideMask,
    sanitized: FrameSettings,
    debug: FrameSettings,
    reset_requested: bool,
}

impl FrameSettingsHistory {
    fn new(
        render_type: RenderType,
        default: FrameSettings,
        custom: FrameSettings,
        custom_mask: FrameSettingsOverrideMask,
        sanitized: FrameSettings,
    ) -> Self {
        FrameSettingsHistory {
            render_type,
            default,
            custom,
            custom_mask,
            sanitized,
            debug: sanitized,
            reset_requested: false,
        }
    }

    /// Returns the render type that selected the defaults.
    #[inline]
    pub fn render_type(&self) -> RenderType {
        self.render_type
    }

    /// Returns the defaults for the render type.
    #[inline]
    pub fn default_settings(&self) -> &FrameSettings {
        &self.default
    }

    /// Returns the settings after the custom override, before sanitization.
    #[inline]
    pub fn custom(&self) -> &FrameSettings {
        &self.custom
    }

    /// Returns the custom override mask, or an empty mask if there was no custom settings.
    #[inline]
    pub fn custom_mask(&self) -> &FrameSettingsOverrideMask {
        &self.custom_mask
    }

    /// Returns the sanitized settings.
    #[inline]
    pub fn sanitized(&self) -> &FrameSettings {
        &self.sanitized
    }

    /// Returns the sanitized settings with the debug edits applied. These are the settings that
    /// are rendered with.
    #[inline]
    pub fn debug(&self) -> &FrameSettings {
        &self.debug
    }

    /// Returns whether the debug edits will be discarded at the next aggregation.
    #[inline]
    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }
}

/// Shared access to the history of one camera, for a debug interface.
///
/// Handles stay valid after the history is removed from its store, but are then detached from
/// it: their edits no longer affect rendering.
#[derive(Clone, Debug)]
pub struct DebugData {
    history: Arc<Mutex<FrameSettingsHistory>>,
}

impl DebugData {
    /// Returns whether `field` is enabled in the debug settings.
    #[inline]
    pub fn get(&self, field: FrameSettingsField) -> bool {
        self.history.lock().debug.is_enabled(field)
    }

    /// Enables or disables `field` in the debug settings.
    #[inline]
    pub fn set(&self, field: FrameSettingsField, value: bool) {
        self.history.lock().debug.set_enabled(field, value);
    }

    /// Returns the index of the lit shader mode of the debug settings, among
    /// [`LitShaderMode::VALUE_NAMES`].
    #[inline]
    pub fn lit_shader_mode_index(&self) -> u32 {
        self.history.lock().debug.lit_shader_mode_enum_index()
    }

    /// Sets the lit shader mode of the debug settings from its index among
    /// [`LitShaderMode::VALUE_NAMES`].
    pub fn set_lit_shader_mode_index(&self, index: u32) -> Result<(), LitShaderModeIndexError> {
        let mode = LitShaderMode::from_index(index).ok_or(LitShaderModeIndexError { index })?;
        self.history.lock().debug.set_lit_shader_mode(mode);

        Ok(())
    }

    /// Discards the debug edits at the next aggregation.
    #[inline]
    pub fn trigger_reset(&self) {
        self.history.lock().reset_requested = true;
    }

    /// Returns a copy of the whole history.
    #[inline]
    pub fn snapshot(&self) -> FrameSettingsHistory {
        self.history.lock().clone()
    }
}

/// Error that can happen when setting the lit shader mode from an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LitShaderModeIndexError {
    /// The index that names no lit shader mode.
    pub index: u32,
}

impl Error for LitShaderModeIndexError {}

impl Display for LitShaderModeIndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "the index {} is not a lit shader mode; there are {} of them",
            self.index,
            LitShaderMode::VALUE_NAMES.len(),
        )
    }
}

/// Keeps the history of the frame settings aggregation of each camera.
pub struct FrameSettingsHistoryStore<K> {
    histories: HashMap<K, DebugData>,
}

impl<K> Default for FrameSettingsHistoryStore<K> {
    #[inline]
    fn default() -> Self {
        FrameSettingsHistoryStore {
            histories: HashMap::default(),
        }
    }
}

impl<K> FrameSettingsHistoryStore<K>
where
    K: Eq + Hash,
{
    /// Returns an empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates the frame settings of the camera identified by `key`, like
    /// [`FrameSettings::aggregate`], and records every stage in its history.
    ///
    /// Returns the settings to render with. These are the aggregated settings with the debug
    /// edits applied, unless the aggregated settings changed since the previous call or a reset
    /// was requested, in which case the edits are discarded first.
    pub fn aggregate(
        &mut self,
        key: K,
        context: &FrameContext,
        pipeline_settings: &RenderPipelineSettings,
        defaults: &DefaultFrameSettings,
        custom: Option<&CustomFrameSettings>,
    ) -> FrameSettings {
        let default = *defaults.get(context.render_type);
        let mut aggregated = default;
        let custom_mask = custom.map_or(FrameSettingsOverrideMask::none(), |custom| custom.mask);

        if let Some(custom) = custom {
            aggregated.override_with(&custom.settings, &custom.mask);
        }

        let after_custom = aggregated;
        aggregated.sanitize(context, pipeline_settings);

        match self.histories.entry(key) {
            Entry::Occupied(entry) => {
                let mut history = entry.get().history.lock();
                let dirty = history.sanitized != aggregated || history.reset_requested;

                history.render_type = context.render_type;
                history.default = default;
                history.custom = after_custom;
                history.custom_mask = custom_mask;

                if dirty {
                    trace!(
                        "resetting debug frame settings (changed: {}, reset requested: {})",
                        history.sanitized != aggregated,
                        history.reset_requested,
                    );

                    history.debug = aggregated;
                    history.reset_requested = false;
                }

                history.sanitized = aggregated;

                history.debug
            }
            Entry::Vacant(entry) => {
                trace!(
                    "creating frame settings history for render type {:?}",
                    context.render_type,
                );

                entry.insert(DebugData {
                    history: Arc::new(Mutex::new(FrameSettingsHistory::new(
                        context.render_type,
                        default,
                        after_custom,
                        custom_mask,
                        aggregated,
                    ))),
                });

                aggregated
            }
        }
    }

    /// Requests that the debug edits of the camera identified by `key` are discarded at its next
    /// aggregation.
    ///
    /// Returns `false` if the camera has no history.
    #[inline]
    pub fn reset(&self, key: &K) -> bool {
        match self.histories.get(key) {
            Some(debug_data) => {
                debug_data.trigger_reset();
                true
            }
            None => false,
        }
    }

    /// Removes the history of the camera identified by `key`, when it is destroyed.
    ///
    /// Returns the last state of the history, if there was one.
    pub fn remove(&mut self, key: &K) -> Option<FrameSettingsHistory> {
        let debug_data = self.histories.remove(key)?;
        debug!("removed frame settings history");

        Some(debug_data.snapshot())
    }

    /// Returns a handle to the history of the camera identified by `key`, for a debug interface.
    #[inline]
    pub fn debug_data(&self, key: &K) -> Option<DebugData> {
        self.histories.get(key).cloned()
    }

    /// Returns the number of cameras with a history.
    #[inline]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// Returns whether no camera has a history.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}
