// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Conversion from the legacy frame settings format.
//!
//! The legacy format stores one boolean per feature, a raw lit shader mode, and separate flag
//! words for the fields that are overridden: one for most fields, and one for the light loop
//! fields, which live in a nested record. [`migrate`] turns such a record into a
//! [`FrameSettings`] and its [`FrameSettingsOverrideMask`].
//!
//! The legacy `is_fptl_enabled` value is not migrated, since [`FrameSettings::fptl`] is now
//! derived from the other fields. The legacy global dimmers are not migrated either; they are
//! recomputed by [`FrameSettings::sanitize`].

use super::{
    FrameSettings, FrameSettingsField, FrameSettingsOverrideMask, LitShaderMode, PackedEnum,
};
use log::{debug, warn};
use std::{
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
};

legacy_flags! {
    /// The flags word of the legacy format that selects the overridden fields.
    LegacyFrameSettingsOverrides(u32);

    /// A flag of [`LegacyFrameSettingsOverrides`].
    LegacyFrameSettingsOverride;

    Shadow = 1 << 0,
    ContactShadow = 1 << 1,
    ShadowMask = 1 << 2,
    Ssr = 1 << 3,
    Ssao = 1 << 4,
    SubsurfaceScattering = 1 << 5,
    Transmission = 1 << 6,
    AtmosphericScattering = 1 << 7,
    Volumetrics = 1 << 8,
    ReprojectionForVolumetrics = 1 << 9,
    LightLayers = 1 << 10,
    Msaa = 1 << 11,
    TransparentPrepass = 1 << 13,
    TransparentPostpass = 1 << 14,
    MotionVectors = 1 << 15,
    ObjectMotionVectors = 1 << 16,
    Decals = 1 << 17,
    RoughRefraction = 1 << 18,
    Distortion = 1 << 19,
    Postprocess = 1 << 20,
    ShaderLitMode = 1 << 21,
    DepthPrepassWithDeferredRendering = 1 << 22,
    AsyncCompute = 1 << 23,
    OpaqueObjects = 1 << 24,
    TransparentObjects = 1 << 25,
    RealtimePlanarReflection = 1 << 26,
    LightListAsync = 1 << 27,
    SsrAsync = 1 << 28,
    SsaoAsync = 1 << 29,
    ContactShadowsAsync = 1 << 30,
    VolumeVoxelizationsAsync = 1 << 31,
}

legacy_flags! {
    /// The flags word of the legacy light loop record that selects the overridden fields.
    LegacyLightLoopSettingsOverrides(u32);

    /// A flag of [`LegacyLightLoopSettingsOverrides`].
    LegacyLightLoopSettingsOverride;

    FptlForForwardOpaque = 1 << 0,
    BigTilePrepass = 1 << 1,
    ComputeLightEvaluation = 1 << 2,
    ComputeLightVariants = 1 << 3,
    ComputeMaterialVariants = 1 << 4,
    TileAndCluster = 1 << 5,
}

impl LegacyFrameSettingsOverride {
    /// Returns the field that the flag overrides.
    pub const fn field(self) -> FrameSettingsField {
        match self {
            Self::Shadow => FrameSettingsField::Shadow,
            Self::ContactShadow => FrameSettingsField::ContactShadow,
            Self::ShadowMask => FrameSettingsField::ShadowMask,
            Self::Ssr => FrameSettingsField::Ssr,
            Self::Ssao => FrameSettingsField::Ssao,
            Self::SubsurfaceScattering => FrameSettingsField::SubsurfaceScattering,
            Self::Transmission => FrameSettingsField::Transmission,
            Self::AtmosphericScattering => FrameSettingsField::AtmosphericScattering,
            Self::Volumetrics => FrameSettingsField::Volumetrics,
            Self::ReprojectionForVolumetrics => FrameSettingsField::ReprojectionForVolumetrics,
            Self::LightLayers => FrameSettingsField::LightLayers,
            Self::Msaa => FrameSettingsField::Msaa,
            Self::TransparentPrepass => FrameSettingsField::TransparentPrepass,
            Self::TransparentPostpass => FrameSettingsField::TransparentPostpass,
            Self::MotionVectors => FrameSettingsField::MotionVectors,
            Self::ObjectMotionVectors => FrameSettingsField::ObjectMotionVectors,
            Self::Decals => FrameSettingsField::Decals,
            Self::RoughRefraction => FrameSettingsField::RoughRefraction,
            Self::Distortion => FrameSettingsField::Distortion,
            Self::Postprocess => FrameSettingsField::Postprocess,
            Self::ShaderLitMode => FrameSettingsField::LitShaderMode,
            Self::DepthPrepassWithDeferredRendering => {
                FrameSettingsField::DepthPrepassWithDeferredRendering
            }
            Self::AsyncCompute => FrameSettingsField::AsyncCompute,
            Self::OpaqueObjects => FrameSettingsField::OpaqueObjects,
            Self::TransparentObjects => FrameSettingsField::TransparentObjects,
            Self::RealtimePlanarReflection => FrameSettingsField::RealtimePlanarReflection,
            Self::LightListAsync => FrameSettingsField::LightListAsync,
            Self::SsrAsync => FrameSettingsField::SsrAsync,
            Self::SsaoAsync => FrameSettingsField::SsaoAsync,
            Self::ContactShadowsAsync => FrameSettingsField::ContactShadowsAsync,
            Self::VolumeVoxelizationsAsync => FrameSettingsField::VolumeVoxelizationsAsync,
        }
    }
}

impl LegacyLightLoopSettingsOverride {
    /// Returns the field that the flag overrides.
    pub const fn field(self) -> FrameSettingsField {
        match self {
            Self::FptlForForwardOpaque => FrameSettingsField::FptlForForwardOpaque,
            Self::BigTilePrepass => FrameSettingsField::BigTilePrepass,
            Self::ComputeLightEvaluation => FrameSettingsField::ComputeLightEvaluation,
            Self::ComputeLightVariants => FrameSettingsField::ComputeLightVariants,
            Self::ComputeMaterialVariants => FrameSettingsField::ComputeMaterialVariants,
            Self::TileAndCluster => FrameSettingsField::TileAndCluster,
        }
    }
}

/// Frame settings in the legacy format.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct LegacyFrameSettings {
    pub overrides: LegacyFrameSettingsOverrides,

    pub enable_shadow: bool,
    pub enable_contact_shadows: bool,
    pub enable_shadow_mask: bool,
    #[cfg_attr(feature = "serde", serde(rename = "enableSSR"))]
    pub enable_ssr: bool,
    #[cfg_attr(feature = "serde", serde(rename = "enableSSAO"))]
    pub enable_ssao: bool,
    pub enable_subsurface_scattering: bool,
    pub enable_transmission: bool,
    pub enable_atmospheric_scattering: bool,
    pub enable_volumetrics: bool,
    pub enable_reprojection_for_volumetrics: bool,
    pub enable_light_layers: bool,

    pub diffuse_global_dimmer: f32,
    pub specular_global_dimmer: f32,

    /// The raw lit shader mode: `0` for forward, `1` for deferred.
    pub shader_lit_mode: u32,
    pub enable_depth_prepass_with_deferred_rendering: bool,

    pub enable_transparent_prepass: bool,
    pub enable_motion_vectors: bool,
    pub enable_object_motion_vectors: bool,
    #[cfg_attr(feature = "serde", serde(alias = "enableDBuffer"))]
    pub enable_decals: bool,
    pub enable_rough_refraction: bool,
    pub enable_transparent_postpass: bool,
    pub enable_distortion: bool,
    pub enable_postprocess: bool,

    pub enable_opaque_objects: bool,
    pub enable_transparent_objects: bool,
    pub enable_realtime_planar_reflection: bool,

    #[cfg_attr(feature = "serde", serde(rename = "enableMSAA"))]
    pub enable_msaa: bool,

    pub enable_async_compute: bool,
    pub run_light_list_async: bool,
    #[cfg_attr(feature = "serde", serde(rename = "runSSRAsync"))]
    pub run_ssr_async: bool,
    #[cfg_attr(feature = "serde", serde(rename = "runSSAOAsync"))]
    pub run_ssao_async: bool,
    pub run_contact_shadows_async: bool,
    pub run_volume_voxelization_async: bool,

    pub light_loop_settings: LegacyLightLoopSettings,
}

/// The light loop record nested in [`LegacyFrameSettings`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct LegacyLightLoopSettings {
    pub overrides: LegacyLightLoopSettingsOverrides,

    pub enable_tile_and_cluster: bool,
    pub enable_compute_light_evaluation: bool,
    pub enable_compute_light_variants: bool,
    pub enable_compute_material_variants: bool,
    pub enable_fptl_for_forward_opaque: bool,
    pub enable_big_tile_prepass: bool,

    /// Whether the fine pruned tiled lighting was used. Not migrated.
    pub is_fptl_enabled: bool,
}

/// Converts frame settings from the legacy format.
///
/// Returns the settings and the mask of the fields that they override. The legacy record is
/// consumed; it has no further use once converted.
pub fn migrate(
    legacy: LegacyFrameSettings,
) -> Result<(FrameSettings, FrameSettingsOverrideMask), MigrationError> {
    let unknown_bits = legacy.overrides.unknown_bits();

    if unknown_bits != 0 {
        return Err(MigrationError::UnknownOverrides { bits: unknown_bits });
    }

    let light_loop = &legacy.light_loop_settings;
    let unknown_bits = light_loop.overrides.unknown_bits();

    if unknown_bits != 0 {
        return Err(MigrationError::UnknownLightLoopOverrides { bits: unknown_bits });
    }

    let lit_shader_mode = LitShaderMode::from_index(legacy.shader_lit_mode).ok_or(
        MigrationError::UnknownLitShaderMode {
            value: legacy.shader_lit_mode,
        },
    )?;

    let mut settings = FrameSettings::empty();

    settings.set_shadow(legacy.enable_shadow);
    settings.set_contact_shadow(legacy.enable_contact_shadows);
    settings.set_shadow_mask(legacy.enable_shadow_mask);
    settings.set_ssr(legacy.enable_ssr);
    settings.set_ssao(legacy.enable_ssao);
    settings.set_subsurface_scattering(legacy.enable_subsurface_scattering);
    settings.set_transmission(legacy.enable_transmission);
    settings.set_atmospheric_scattering(legacy.enable_atmospheric_scattering);
    settings.set_volumetrics(legacy.enable_volumetrics);
    settings.set_reprojection_for_volumetrics(legacy.enable_reprojection_for_volumetrics);
    settings.set_light_layers(legacy.enable_light_layers);
    settings.set_msaa(legacy.enable_msaa);

    settings.set_lit_shader_mode(lit_shader_mode);
    settings.set_depth_prepass_with_deferred_rendering(
        legacy.enable_depth_prepass_with_deferred_rendering,
    );

    settings.set_transparent_prepass(legacy.enable_transparent_prepass);
    settings.set_transparent_postpass(legacy.enable_transparent_postpass);
    settings.set_motion_vectors(legacy.enable_motion_vectors);
    settings.set_object_motion_vectors(legacy.enable_object_motion_vectors);
    settings.set_decals(legacy.enable_decals);
    settings.set_rough_refraction(legacy.enable_rough_refraction);
    settings.set_distortion(legacy.enable_distortion);
    settings.set_postprocess(legacy.enable_postprocess);

    settings.set_opaque_objects(legacy.enable_opaque_objects);
    settings.set_transparent_objects(legacy.enable_transparent_objects);
    settings.set_realtime_planar_reflection(legacy.enable_realtime_planar_reflection);

    settings.set_async_compute(legacy.enable_async_compute);
    settings.set_light_list_async(legacy.run_light_list_async);
    settings.set_ssr_async(legacy.run_ssr_async);
    settings.set_ssao_async(legacy.run_ssao_async);
    settings.set_contact_shadows_async(legacy.run_contact_shadows_async);
    settings.set_volume_voxelizations_async(legacy.run_volume_voxelization_async);

    settings.set_tile_and_cluster(light_loop.enable_tile_and_cluster);
    settings.set_compute_light_evaluation(light_loop.enable_compute_light_evaluation);
    settings.set_compute_light_variants(light_loop.enable_compute_light_variants);
    settings.set_compute_material_variants(light_loop.enable_compute_material_variants);
    settings.set_fptl_for_forward_opaque(light_loop.enable_fptl_for_forward_opaque);
    settings.set_big_tile_prepass(light_loop.enable_big_tile_prepass);

    let mask = legacy
        .overrides
        .iter()
        .map(LegacyFrameSettingsOverride::field)
        .chain(
            light_loop
                .overrides
                .iter()
                .map(LegacyLightLoopSettingsOverride::field),
        )
        .collect::<FrameSettingsOverrideMask>();

    if light_loop.is_fptl_enabled != settings.fptl() {
        warn!(
            "legacy frame settings stored fptl = {}, but it is now derived as {} from the lit \
            shader mode ({:?}) and fptl for forward opaque ({})",
            light_loop.is_fptl_enabled,
            settings.fptl(),
            settings.lit_shader_mode(),
            settings.fptl_for_forward_opaque(),
        );
    }

    debug!(
        "migrated legacy frame settings with {} overridden fields",
        mask.fields().count(),
    );

    Ok((settings, mask))
}

/// Error that can happen when migrating legacy frame settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationError {
    /// The overrides flags word has bits set that name no flag.
    UnknownOverrides { bits: u32 },

    /// The light loop overrides flags word has bits set that name no flag.
    UnknownLightLoopOverrides { bits: u32 },

    /// The raw lit shader mode names no mode.
    UnknownLitShaderMode { value: u32 },
}

impl Error for MigrationError {}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::UnknownOverrides { bits } => write!(
                f,
                "the legacy overrides have unknown bits set ({:#x})",
                bits,
            ),
            Self::UnknownLightLoopOverrides { bits } => write!(
                f,
                "the legacy light loop overrides have unknown bits set ({:#x})",
                bits,
            ),
            Self::UnknownLitShaderMode { value } => write!(
                f,
                "the legacy lit shader mode {} is not a known lit shader mode",
                value,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        migrate, LegacyFrameSettings, LegacyFrameSettingsOverride, LegacyFrameSettingsOverrides,
        LegacyLightLoopSettingsOverride, LegacyLightLoopSettingsOverrides, MigrationError,
    };
    use crate::frame_settings::{FrameSettingsField, LitShaderMode};
    use foldhash::HashSet;

    fn set_legacy_value(legacy: &mut LegacyFrameSettings, flag: LegacyFrameSettingsOverride) {
        use LegacyFrameSettingsOverride as F;

        match flag {
            F::Shadow => legacy.enable_shadow = true,
            F::ContactShadow => legacy.enable_contact_shadows = true,
            F::ShadowMask => legacy.enable_shadow_mask = true,
            F::Ssr => legacy.enable_ssr = true,
            F::Ssao => legacy.enable_ssao = true,
            F::SubsurfaceScattering => legacy.enable_subsurface_scattering = true,
            F::Transmission => legacy.enable_transmission = true,
            F::AtmosphericScattering => legacy.enable_atmospheric_scattering = true,
            F::Volumetrics => legacy.enable_volumetrics = true,
            F::ReprojectionForVolumetrics => legacy.enable_reprojection_for_volumetrics = true,
            F::LightLayers => legacy.enable_light_layers = true,
            F::Msaa => legacy.enable_msaa = true,
            F::TransparentPrepass => legacy.enable_transparent_prepass = true,
            F::TransparentPostpass => legacy.enable_transparent_postpass = true,
            F::MotionVectors => legacy.enable_motion_vectors = true,
            F::ObjectMotionVectors => legacy.enable_object_motion_vectors = true,
            F::Decals => legacy.enable_decals = true,
            F::RoughRefraction => legacy.enable_rough_refraction = true,
            F::Distortion => legacy.enable_distortion = true,
            F::Postprocess => legacy.enable_postprocess = true,
            F::ShaderLitMode => legacy.shader_lit_mode = 1,
            F::DepthPrepassWithDeferredRendering => {
                legacy.enable_depth_prepass_with_deferred_rendering = true
            }
            F::AsyncCompute => legacy.enable_async_compute = true,
            F::OpaqueObjects => legacy.enable_opaque_objects = true,
            F::TransparentObjects => legacy.enable_transparent_objects = true,
            F::RealtimePlanarReflection => legacy.enable_realtime_planar_reflection = true,
            F::LightListAsync => legacy.run_light_list_async = true,
            F::SsrAsync => legacy.run_ssr_async = true,
            F::SsaoAsync => legacy.run_ssao_async = true,
            F::ContactShadowsAsync => legacy.run_contact_shadows_async = true,
            F::VolumeVoxelizationsAsync => legacy.run_volume_voxelization_async = true,
        }
    }

    fn set_legacy_light_loop_value(
        legacy: &mut LegacyFrameSettings,
        flag: LegacyLightLoopSettingsOverride,
    ) {
        use LegacyLightLoopSettingsOverride as F;

        let light_loop = &mut legacy.light_loop_settings;

        match flag {
            F::FptlForForwardOpaque => light_loop.enable_fptl_for_forward_opaque = true,
            F::BigTilePrepass => light_loop.enable_big_tile_prepass = true,
            F::ComputeLightEvaluation => light_loop.enable_compute_light_evaluation = true,
            F::ComputeLightVariants => light_loop.enable_compute_light_variants = true,
            F::ComputeMaterialVariants => light_loop.enable_compute_material_variants = true,
            F::TileAndCluster => light_loop.enable_tile_and_cluster = true,
        }
    }

    #[test]
    fn every_legacy_flag_maps_to_a_distinct_field() {
        let mut fields = HashSet::default();

        for flag in LegacyFrameSettingsOverride::ALL {
            assert!(fields.insert(flag.field()), "{:?}", flag);
        }

        for flag in LegacyLightLoopSettingsOverride::ALL {
            assert!(fields.insert(flag.field()), "{:?}", flag);
        }

        // Every stored field has a legacy counterpart.
        assert_eq!(fields.len(), FrameSettingsField::COUNT);
    }

    #[test]
    fn override_flags_become_mask_bits() {
        for flag in LegacyFrameSettingsOverride::ALL {
            let legacy = LegacyFrameSettings {
                overrides: flag.into(),
                ..Default::default()
            };
            let (_, mask) = migrate(legacy).unwrap();

            assert_eq!(mask.fields().collect::<Vec<_>>(), vec![flag.field()]);
        }

        for flag in LegacyLightLoopSettingsOverride::ALL {
            let mut legacy = LegacyFrameSettings::default();
            legacy.light_loop_settings.overrides = flag.into();
            let (_, mask) = migrate(legacy).unwrap();

            assert_eq!(mask.fields().collect::<Vec<_>>(), vec![flag.field()]);
        }
    }

    #[test]
    fn values_land_on_their_field() {
        for flag in LegacyFrameSettingsOverride::ALL {
            let mut legacy = LegacyFrameSettings::default();
            set_legacy_value(&mut legacy, flag);
            let (settings, mask) = migrate(legacy).unwrap();

            assert!(mask.is_empty());
            assert_eq!(
                settings.bits().iter_ones().collect::<Vec<_>>(),
                vec![flag.field().index()],
                "{:?}",
                flag,
            );
        }

        for flag in LegacyLightLoopSettingsOverride::ALL {
            let mut legacy = LegacyFrameSettings::default();
            set_legacy_light_loop_value(&mut legacy, flag);
            let (settings, _) = migrate(legacy).unwrap();

            assert_eq!(
                settings.bits().iter_ones().collect::<Vec<_>>(),
                vec![flag.field().index()],
                "{:?}",
                flag,
            );
        }
    }

    #[test]
    fn full_record() {
        let mut legacy = LegacyFrameSettings {
            overrides: LegacyFrameSettingsOverride::Shadow
                | LegacyFrameSettingsOverride::ShaderLitMode,
            enable_shadow: true,
            enable_ssr: true,
            shader_lit_mode: 0,
            diffuse_global_dimmer: 0.5,
            ..Default::default()
        };
        legacy.light_loop_settings.overrides =
            LegacyLightLoopSettingsOverride::TileAndCluster.into();
        legacy.light_loop_settings.enable_fptl_for_forward_opaque = true;
        legacy.light_loop_settings.is_fptl_enabled = true;

        let (settings, mask) = migrate(legacy).unwrap();

        assert!(settings.shadow());
        assert!(settings.ssr());
        assert_eq!(settings.lit_shader_mode(), LitShaderMode::Forward);
        assert!(settings.fptl_for_forward_opaque());
        assert!(settings.fptl());
        assert_eq!(settings.diffuse_global_dimmer(), 1.0);
        assert_eq!(
            mask.fields().collect::<Vec<_>>(),
            vec![
                FrameSettingsField::Shadow,
                FrameSettingsField::LitShaderMode,
                FrameSettingsField::TileAndCluster,
            ],
        );
    }

    #[test]
    fn unknown_bits_are_rejected() {
        let legacy = LegacyFrameSettings {
            overrides: LegacyFrameSettingsOverrides::from_raw((1 << 12) | 1),
            ..Default::default()
        };
        assert_eq!(
            migrate(legacy),
            Err(MigrationError::UnknownOverrides { bits: 1 << 12 }),
        );

        let mut legacy = LegacyFrameSettings::default();
        legacy.light_loop_settings.overrides = LegacyLightLoopSettingsOverrides::from_raw(1 << 6);
        assert_eq!(
            migrate(legacy),
            Err(MigrationError::UnknownLightLoopOverrides { bits: 1 << 6 }),
        );

        let legacy = LegacyFrameSettings {
            shader_lit_mode: 2,
            ..Default::default()
        };
        let err = migrate(legacy).unwrap_err();
        assert_eq!(err, MigrationError::UnknownLitShaderMode { value: 2 });
        assert!(err.to_string().contains("lit shader mode 2"));
    }

    #[test]
    fn legacy_flags_debug() {
        assert_eq!(
            format!("{:?}", LegacyFrameSettingsOverrides::empty()),
            "empty()",
        );
        assert_eq!(
            format!(
                "{:?}",
                LegacyFrameSettingsOverrides::from_raw((1 << 12) | (1 << 3)),
            ),
            "Ssr | 0x1000",
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_field_names() {
        let json = r#"{
            "overrides": 8,
            "enableSSR": true,
            "enableDBuffer": true,
            "runSSAOAsync": true,
            "shaderLitMode": 1,
            "lightLoopSettings": { "overrides": 32, "enableTileAndCluster": true }
        }"#;
        let legacy: LegacyFrameSettings = serde_json::from_str(json).unwrap();

        assert!(legacy.enable_ssr);
        assert!(legacy.enable_decals);
        assert!(legacy.run_ssao_async);

        let (settings, mask) = migrate(legacy).unwrap();
        assert!(settings.ssr() && settings.decals() && settings.ssao_async());
        assert!(settings.tile_and_cluster());
        assert_eq!(
            mask.fields().collect::<Vec<_>>(),
            vec![FrameSettingsField::Ssr, FrameSettingsField::TileAndCluster],
        );
    }
}
