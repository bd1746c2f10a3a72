// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use super::{FrameSettings, LitShaderMode};
use crate::{
    context::FrameContext,
    pipeline::{RenderPipelineSettings, SupportedLitShaderMode},
};

impl FrameSettings {
    /// Disables the features that can't be used in `context` or aren't supported according to
    /// `pipeline_settings`, and sets the global dimmers.
    ///
    /// Features are only ever disabled, except for the lit shader mode: wireframe and stereo
    /// rendering force forward mode, and a pipeline that only supports one mode forces that mode.
    /// Motion vectors in stereo are also forced, to the value required by temporal
    /// post-processing.
    ///
    /// The rules are applied in order, and later rules read the values written by earlier ones.
    pub fn sanitize(
        &mut self,
        context: &FrameContext,
        pipeline_settings: &RenderPipelineSettings,
    ) {
        let preview = context.preview;
        let reflection = context.reflection;
        let stereo = context.stereo;

        self.diffuse_global_dimmer = 1.0;
        self.specular_global_dimmer = if reflection { 0.0 } else { 1.0 };

        if context.wireframe || stereo {
            self.set_lit_shader_mode(LitShaderMode::Forward);
        } else {
            match pipeline_settings.supported_lit_shader_mode {
                SupportedLitShaderMode::ForwardOnly => {
                    self.set_lit_shader_mode(LitShaderMode::Forward)
                }
                SupportedLitShaderMode::DeferredOnly => {
                    self.set_lit_shader_mode(LitShaderMode::Deferred)
                }
                SupportedLitShaderMode::Both => {}
            }
        }

        self.set_shadow(self.shadow() && !preview);
        self.set_shadow_mask(
            self.shadow_mask() && pipeline_settings.support_shadow_mask && !preview,
        );
        self.set_contact_shadow(self.contact_shadow() && !preview);

        // MSAA only exists in forward.
        let msaa = self.msaa()
            && pipeline_settings.support_msaa
            && self.lit_shader_mode() == LitShaderMode::Forward;
        self.set_msaa(msaa);

        self.set_ssr(
            self.ssr() && !reflection && pipeline_settings.support_ssr && !msaa && !preview,
        );
        self.set_ssao(self.ssao() && pipeline_settings.support_ssao && !preview);
        self.set_subsurface_scattering(
            self.subsurface_scattering()
                && !reflection
                && pipeline_settings.support_subsurface_scattering,
        );

        let atmospheric_scattering =
            self.atmospheric_scattering() && context.scene_view_fog && !preview;
        self.set_atmospheric_scattering(atmospheric_scattering);
        self.set_volumetrics(
            self.volumetrics() && pipeline_settings.support_volumetrics && atmospheric_scattering,
        );
        self.set_reprojection_for_volumetrics(self.reprojection_for_volumetrics() && !preview);

        self.set_light_layers(
            self.light_layers() && pipeline_settings.support_light_layers && !preview,
        );

        let postprocess = self.postprocess() && !reflection && !preview;
        self.set_postprocess(postprocess);

        self.set_transparent_prepass(
            self.transparent_prepass()
                && pipeline_settings.support_transparent_depth_prepass
                && !preview,
        );

        // Temporal anti-aliasing in stereo needs motion vectors whenever post-processing runs.
        let motion_vectors = if stereo {
            postprocess && !msaa && !preview
        } else {
            self.motion_vectors()
                && !reflection
                && pipeline_settings.support_motion_vectors
                && !preview
        };
        self.set_motion_vectors(motion_vectors);
        self.set_object_motion_vectors(self.object_motion_vectors() && motion_vectors && !preview);

        self.set_decals(self.decals() && pipeline_settings.support_decals && !preview);
        self.set_transparent_postpass(
            self.transparent_postpass()
                && pipeline_settings.support_transparent_depth_postpass
                && !preview,
        );
        self.set_distortion(
            self.distortion()
                && !reflection
                && pipeline_settings.support_distortion
                && !msaa
                && !preview,
        );

        let async_compute = self.async_compute() && pipeline_settings.supports_async_compute;
        self.set_async_compute(async_compute);
        self.set_light_list_async(self.light_list_async() && async_compute);
        self.set_ssr_async(self.ssr_async() && async_compute);
        self.set_ssao_async(self.ssao_async() && async_compute);
        self.set_contact_shadows_async(self.contact_shadows_async() && async_compute);
        self.set_volume_voxelizations_async(self.volume_voxelizations_async() && async_compute);

        self.set_fptl_for_forward_opaque(
            self.fptl_for_forward_opaque() && !msaa && !pipeline_settings.xr_enabled,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bit_array::BitArray128,
        context::{FrameContext, RenderType},
        frame_settings::{FrameSettings, FrameSettingsField, LitShaderMode},
        pipeline::{RenderPipelineSettings, SupportedLitShaderMode},
    };
    use rand::{rngs::StdRng, Rng};

    fn random_context(rng: &mut StdRng) -> FrameContext {
        FrameContext {
            render_type: RenderType::Camera,
            preview: rng.gen(),
            reflection: rng.gen(),
            stereo: rng.gen(),
            wireframe: rng.gen(),
            scene_view_fog: rng.gen(),
            ..Default::default()
        }
    }

    fn random_pipeline_settings(rng: &mut StdRng) -> RenderPipelineSettings {
        RenderPipelineSettings {
            supported_lit_shader_mode: match rng.gen_range(0..3) {
                0 => SupportedLitShaderMode::ForwardOnly,
                1 => SupportedLitShaderMode::DeferredOnly,
                _ => SupportedLitShaderMode::Both,
            },
            support_shadow_mask: rng.gen(),
            support_ssr: rng.gen(),
            support_ssao: rng.gen(),
            support_subsurface_scattering: rng.gen(),
            support_volumetrics: rng.gen(),
            support_light_layers: rng.gen(),
            support_transparent_depth_prepass: rng.gen(),
            support_transparent_depth_postpass: rng.gen(),
            support_motion_vectors: rng.gen(),
            support_decals: rng.gen(),
            support_distortion: rng.gen(),
            support_msaa: rng.gen(),
            supports_async_compute: rng.gen(),
            xr_enabled: rng.gen(),
            ..Default::default()
        }
    }

    fn sanitized(
        settings: FrameSettings,
        context: &FrameContext,
        pipeline_settings: &RenderPipelineSettings,
    ) -> FrameSettings {
        let mut settings = settings;
        settings.sanitize(context, pipeline_settings);
        settings
    }

    #[test]
    fn never_enables_a_disabled_field() {
        let mut rng = seeded_rng!();

        for _ in 0..1024 {
            let input = FrameSettings::from_bits(BitArray128::new(rng.gen(), rng.gen()));
            let context = random_context(&mut rng);
            let pipeline_settings = random_pipeline_settings(&mut rng);
            let output = sanitized(input, &context, &pipeline_settings);

            for field in FrameSettingsField::ALL {
                match field {
                    FrameSettingsField::LitShaderMode => continue,
                    FrameSettingsField::MotionVectors if context.stereo => continue,
                    _ => {}
                }

                assert!(
                    !output.is_enabled(field) || input.is_enabled(field),
                    "{:?} was enabled by sanitize",
                    field,
                );
            }
        }
    }

    #[test]
    fn sanitize_is_idempotent() {
        let mut rng = seeded_rng!();

        for _ in 0..1024 {
            let input = FrameSettings::from_bits(BitArray128::new(rng.gen(), rng.gen()));
            let context = random_context(&mut rng);
            let pipeline_settings = random_pipeline_settings(&mut rng);

            let once = sanitized(input, &context, &pipeline_settings);
            let twice = sanitized(once, &context, &pipeline_settings);

            assert_eq!(once, twice);
        }
    }

    #[test]
    fn dependent_fields_follow_their_parent() {
        let mut rng = seeded_rng!();

        for _ in 0..1024 {
            let input = FrameSettings::from_bits(BitArray128::new(rng.gen(), rng.gen()));
            let context = random_context(&mut rng);
            let pipeline_settings = random_pipeline_settings(&mut rng);
            let output = sanitized(input, &context, &pipeline_settings);

            if !output.async_compute() {
                assert!(!output.light_list_async());
                assert!(!output.ssr_async());
                assert!(!output.ssao_async());
                assert!(!output.contact_shadows_async());
                assert!(!output.volume_voxelizations_async());
            }

            if output.msaa() {
                assert_eq!(output.lit_shader_mode(), LitShaderMode::Forward);
                assert!(!output.ssr());
                assert!(!output.distortion());
                assert!(!output.fptl_for_forward_opaque());
            }

            assert!(!output.volumetrics() || output.atmospheric_scattering());
            assert!(!output.object_motion_vectors() || output.motion_vectors());
            assert_eq!(
                output.lit_shader_mode_enum_index(),
                output.lit_shader_mode() as u32,
            );
        }
    }

    #[test]
    fn preview_camera() {
        let context = FrameContext {
            preview: true,
            ..Default::default()
        };
        let output = sanitized(
            FrameSettings::CAMERA,
            &context,
            &RenderPipelineSettings::default(),
        );

        assert!(!output.shadow());
        assert!(!output.shadow_mask());
        assert!(!output.contact_shadow());
        assert!(!output.ssao());
        assert!(!output.atmospheric_scattering());
        assert!(!output.volumetrics());
        assert!(!output.postprocess());
        assert!(!output.motion_vectors());
        assert!(!output.object_motion_vectors());
        assert!(!output.decals());
        assert!(!output.transparent_prepass());
        assert!(!output.transparent_postpass());
        assert!(!output.distortion());
        assert!(!output.light_layers());

        // Not preview dependent.
        assert!(output.subsurface_scattering());
        assert!(output.opaque_objects());
        assert!(output.transparent_objects());
    }

    #[test]
    fn wireframe_forces_forward() {
        let context = FrameContext {
            wireframe: true,
            ..Default::default()
        };
        let pipeline_settings = RenderPipelineSettings {
            supported_lit_shader_mode: SupportedLitShaderMode::DeferredOnly,
            ..Default::default()
        };
        let output = sanitized(FrameSettings::CAMERA, &context, &pipeline_settings);

        assert_eq!(output.lit_shader_mode(), LitShaderMode::Forward);
        assert_eq!(output.lit_shader_mode_enum_index(), 0);
        assert!(!output.fptl() || output.fptl_for_forward_opaque());
    }

    #[test]
    fn supported_lit_shader_mode() {
        let context = FrameContext::default();
        let mut forward = FrameSettings::CAMERA;
        forward.set_lit_shader_mode(LitShaderMode::Forward);

        let deferred_only = RenderPipelineSettings {
            supported_lit_shader_mode: SupportedLitShaderMode::DeferredOnly,
            ..Default::default()
        };
        assert_eq!(
            sanitized(forward, &context, &deferred_only).lit_shader_mode(),
            LitShaderMode::Deferred,
        );

        let forward_only = RenderPipelineSettings {
            supported_lit_shader_mode: SupportedLitShaderMode::ForwardOnly,
            ..Default::default()
        };
        assert_eq!(
            sanitized(FrameSettings::CAMERA, &context, &forward_only).lit_shader_mode(),
            LitShaderMode::Forward,
        );

        let both = RenderPipelineSettings::default();
        assert_eq!(
            sanitized(forward, &context, &both).lit_shader_mode(),
            LitShaderMode::Forward,
        );
        assert_eq!(
            sanitized(FrameSettings::CAMERA, &context, &both).lit_shader_mode(),
            LitShaderMode::Deferred,
        );
    }

    #[test]
    fn msaa_disables_ssr_and_distortion() {
        let mut settings = FrameSettings::CAMERA;
        settings.set_lit_shader_mode(LitShaderMode::Forward);
        settings.set_msaa(true);
        settings.set_ssr(true);

        let output = sanitized(
            settings,
            &FrameContext::default(),
            &RenderPipelineSettings::default(),
        );

        assert!(output.msaa());
        assert!(!output.ssr());
        assert!(!output.distortion());
        assert!(!output.fptl_for_forward_opaque());
        assert!(!output.fptl());

        // The same request in deferred mode keeps SSR, and drops MSAA instead.
        settings.set_lit_shader_mode(LitShaderMode::Deferred);
        let output = sanitized(
            settings,
            &FrameContext::default(),
            &RenderPipelineSettings::default(),
        );

        assert!(!output.msaa());
        assert!(output.ssr());
        assert!(output.distortion());
    }

    #[test]
    fn async_compute_unsupported() {
        let pipeline_settings = RenderPipelineSettings {
            supports_async_compute: false,
            ..Default::default()
        };
        let output = sanitized(
            FrameSettings::CAMERA,
            &FrameContext::default(),
            &pipeline_settings,
        );

        assert!(!output.async_compute());
        assert!(!output.light_list_async());
        assert!(!output.ssr_async());
        assert!(!output.ssao_async());
        assert!(!output.contact_shadows_async());
        assert!(!output.volume_voxelizations_async());
        assert!(!output.build_light_list_runs_async(&pipeline_settings));
        assert!(!output.volume_voxelization_runs_async(&pipeline_settings));
    }

    #[test]
    fn stereo_forces_motion_vectors() {
        let context = FrameContext {
            stereo: true,
            ..Default::default()
        };
        let mut settings = FrameSettings::CAMERA;
        settings.set_motion_vectors(false);
        settings.set_object_motion_vectors(true);

        let output = sanitized(settings, &context, &RenderPipelineSettings::default());

        assert_eq!(output.lit_shader_mode(), LitShaderMode::Forward);
        assert!(output.postprocess());
        assert!(output.motion_vectors());
        assert!(output.object_motion_vectors());

        settings.set_postprocess(false);
        let output = sanitized(settings, &context, &RenderPipelineSettings::default());

        assert!(!output.motion_vectors());
        assert!(!output.object_motion_vectors());
    }

    #[test]
    fn reflection_context() {
        let mut settings = FrameSettings::CAMERA;
        settings.set_ssr(true);

        let output = sanitized(
            settings,
            &FrameContext::reflection_probe(RenderType::CustomOrBakedReflection),
            &RenderPipelineSettings::default(),
        );

        assert_eq!(output.diffuse_global_dimmer(), 1.0);
        assert_eq!(output.specular_global_dimmer(), 0.0);
        assert!(!output.ssr());
        assert!(!output.subsurface_scattering());
        assert!(!output.postprocess());
        assert!(!output.motion_vectors());
        assert!(!output.distortion());
        assert!(output.shadow());
    }

    #[test]
    fn scene_view_fog_gates_atmospheric_scattering() {
        let context = FrameContext {
            scene_view_fog: false,
            ..Default::default()
        };
        let output = sanitized(
            FrameSettings::CAMERA,
            &context,
            &RenderPipelineSettings::default(),
        );

        assert!(!output.atmospheric_scattering());
        assert!(!output.volumetrics());

        let output = sanitized(
            FrameSettings::CAMERA,
            &FrameContext::default(),
            &RenderPipelineSettings::default(),
        );

        assert!(output.atmospheric_scattering());
        assert!(output.volumetrics());
    }

    #[test]
    fn xr_disables_fptl_for_forward_opaque() {
        let pipeline_settings = RenderPipelineSettings {
            xr_enabled: true,
            ..Default::default()
        };
        let output = sanitized(
            FrameSettings::CAMERA,
            &FrameContext::default(),
            &pipeline_settings,
        );

        assert!(!output.fptl_for_forward_opaque());
        // Still deferred, so the tiled lighting is used anyway.
        assert!(output.fptl());
    }

    #[test]
    fn minimal_pipeline_disables_optional_features() {
        let output = sanitized(
            FrameSettings::CAMERA,
            &FrameContext::default(),
            &RenderPipelineSettings::minimal(),
        );

        assert_eq!(output.lit_shader_mode(), LitShaderMode::Forward);
        assert!(output.shadow());
        assert!(!output.shadow_mask());
        assert!(!output.ssao());
        assert!(!output.subsurface_scattering());
        assert!(!output.volumetrics());
        assert!(!output.light_layers());
        assert!(!output.motion_vectors());
        assert!(!output.decals());
        assert!(!output.async_compute());
        assert!(output.fptl_for_forward_opaque());
    }
}
