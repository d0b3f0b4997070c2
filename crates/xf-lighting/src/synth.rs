//! Lighting shader synthesis
//!
//! [`generate_lighting`] walks the active channel pairs in order, records
//! the lighting uid and writes the lighting code for each pair into a
//! `{ ... }` block ending in `<dest><j> = ...;`. The same walk serves
//! uid-only passes when handed a [`NullWriter`].

use crate::channel::{mask_lights, ColorSource, LightingConfig, LitChannel, SubChannel, MAX_LIGHTS};
use crate::light::{generate_light, Swizzle};
use crate::uid::LightingUid;
use crate::writer::{NullWriter, ShaderCode, ShaderWriter};
use xf_core::{LightingError, NumericMode, ShaderConfig, StageKind};

/// Resource names and arithmetic of the shader hosting the lighting code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderTarget {
    /// Materials resource: `[0..2]` ambient, `[2..4]` material
    pub materials: String,
    /// Lights resource, five slots per light
    pub lights: String,
    /// Prefix of the per-vertex color inputs (`<in_color><j>`)
    pub in_color: String,
    /// Prefix of the lit color outputs (`<dest><j>`)
    pub dest: String,
    pub numeric_mode: NumericMode,
    /// Log each generated block at trace level
    pub dump_code: bool,
}

impl ShaderTarget {
    /// Per-vertex lighting in the vertex shader
    pub fn vertex(numeric_mode: NumericMode) -> Self {
        Self {
            materials: "I_MATERIALS".to_string(),
            lights: "I_LIGHTS".to_string(),
            in_color: "color".to_string(),
            dest: "o.colors_".to_string(),
            numeric_mode,
            dump_code: false,
        }
    }

    /// Per-pixel lighting in the pixel shader
    pub fn pixel(numeric_mode: NumericMode) -> Self {
        Self {
            materials: "I_PMATERIALS".to_string(),
            lights: "I_PLIGHTS".to_string(),
            in_color: "colors_".to_string(),
            dest: "colors_".to_string(),
            numeric_mode,
            dump_code: false,
        }
    }

    pub fn from_config(config: &ShaderConfig) -> Self {
        let target = match config.stage {
            StageKind::Vertex => Self::vertex(config.numeric_mode),
            StageKind::Pixel => Self::pixel(config.numeric_mode),
        };
        Self {
            dump_code: config.dump_shaders,
            ..target
        }
    }
}

/// What a synthesis pass produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisMode {
    /// Only the uid, for cache lookups
    IdentityOnly,
    /// The uid and the shader text
    IdentityAndCode,
}

/// Result of a synthesis pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub uid: LightingUid,
    /// Present in [`SynthesisMode::IdentityAndCode`] only
    pub code: Option<ShaderCode>,
}

/// Compute the uid and, depending on `mode`, the lighting code for `config`
pub fn synthesize(
    config: &LightingConfig,
    target: &ShaderTarget,
    mode: SynthesisMode,
) -> Result<Synthesis, LightingError> {
    let synthesis = match mode {
        SynthesisMode::IdentityOnly => Synthesis {
            uid: generate_lighting(&mut NullWriter, config, target)?,
            code: None,
        },
        SynthesisMode::IdentityAndCode => {
            let mut code = ShaderCode::new();
            let uid = generate_lighting(&mut code, config, target)?;
            Synthesis {
                uid,
                code: Some(code),
            }
        }
    };

    tracing::debug!(
        "Lighting synthesis ({:?}): {} channel(s), uid {}",
        mode,
        config.channel_count,
        synthesis.uid
    );
    if let Some(code) = synthesis.code.as_ref().filter(|_| target.dump_code) {
        tracing::trace!("Lighting code for uid {}:\n{}", synthesis.uid, code);
    }
    Ok(synthesis)
}

/// Lighting uid of `config`, without generating any text
pub fn lighting_uid(config: &LightingConfig) -> Result<LightingUid, LightingError> {
    // Names and arithmetic are not part of the uid
    let target = ShaderTarget::vertex(NumericMode::Integer);
    generate_lighting(&mut NullWriter, config, &target)
}

/// Walk all active channel pairs, writing code to `out`, and return the uid
pub fn generate_lighting<W: ShaderWriter>(
    out: &mut W,
    config: &LightingConfig,
    target: &ShaderTarget,
) -> Result<LightingUid, LightingError> {
    config.validate()?;

    let mut uid = LightingUid::new();
    uid.record_channel_count(config.channel_count);
    uid.record_vertex_colors(config.observed_vertex_colors());

    for group in config.groups() {
        generate_channel(out, &mut uid, config, target, group)?;
    }
    Ok(uid)
}

/// Which variable a base color read initializes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseColor {
    Material,
    Ambient,
}

impl BaseColor {
    fn variable(self) -> &'static str {
        match self {
            BaseColor::Material => "mat",
            BaseColor::Ambient => "lacc",
        }
    }

    fn register(self, group: usize) -> usize {
        match self {
            BaseColor::Material => group + 2,
            BaseColor::Ambient => group,
        }
    }
}

/// Write `mat`/`lacc` (or their `.w`) from the vertex color or the materials register
fn write_base_color<W: ShaderWriter>(
    out: &mut W,
    config: &LightingConfig,
    target: &ShaderTarget,
    group: usize,
    base: BaseColor,
    sub: SubChannel,
    source: ColorSource,
) {
    let (component, full_intensity) = match sub {
        SubChannel::Color => ("", "float4(255.0,255.0,255.0,255.0)"),
        SubChannel::Alpha => (".w", "255.0"),
    };
    let variable = base.variable();

    match source {
        ColorSource::Vertex => match config.vertex_color_input(group) {
            Some(input) => writeln!(
                out,
                "{}{} = round({}{}{} * 255.0);",
                variable, component, target.in_color, input, component
            ),
            // No vertex color to read, behave as if lighting were off
            None => writeln!(out, "{}{} = {};", variable, component, full_intensity),
        },
        ColorSource::Register => writeln!(
            out,
            "{}{} = {}[{}]{};",
            variable,
            component,
            target.materials,
            base.register(group),
            component
        ),
    }
}

/// Unlit ambient: full intensity, no lights
fn write_unlit_ambient<W: ShaderWriter>(out: &mut W, sub: SubChannel) {
    match sub {
        SubChannel::Color => out.write_str("lacc = float4(255.0,255.0,255.0,255.0);\n"),
        SubChannel::Alpha => out.write_str("lacc.w = 255.0;\n"),
    }
}

fn record_functions(uid: &mut LightingUid, slot: usize, channel: &LitChannel) {
    uid.record_diffuse(slot, channel.diffuse);
    uid.record_attenuation(slot, channel.attenuation);
    uid.record_light_mask(slot, channel.full_light_mask());
}

/// Generate the lighting block of channel pair `group`
fn generate_channel<W: ShaderWriter>(
    out: &mut W,
    uid: &mut LightingUid,
    config: &LightingConfig,
    target: &ShaderTarget,
    group: usize,
) -> Result<(), LightingError> {
    let color = &config.color[group];
    let alpha = &config.alpha[group];
    let color_slot = SubChannel::Color.slot(group);
    let alpha_slot = SubChannel::Alpha.slot(group);

    out.write_str("{\n");

    uid.record_material_source(color_slot, color.material_source);
    write_base_color(
        out,
        config,
        target,
        group,
        BaseColor::Material,
        SubChannel::Color,
        color.material_source,
    );

    uid.record_lighting_enabled(color_slot, color.lighting_enabled);
    if color.lighting_enabled {
        uid.record_ambient_source(color_slot, color.ambient_source);
        write_base_color(
            out,
            config,
            target,
            group,
            BaseColor::Ambient,
            SubChannel::Color,
            color.ambient_source,
        );
    } else {
        write_unlit_ambient(out, SubChannel::Color);
    }

    // Alpha material only needs its own read when it differs
    uid.record_material_source(alpha_slot, alpha.material_source);
    if alpha.material_source != color.material_source {
        write_base_color(
            out,
            config,
            target,
            group,
            BaseColor::Material,
            SubChannel::Alpha,
            alpha.material_source,
        );
    }

    uid.record_lighting_enabled(alpha_slot, alpha.lighting_enabled);
    if alpha.lighting_enabled {
        uid.record_ambient_source(alpha_slot, alpha.ambient_source);
        write_base_color(
            out,
            config,
            target,
            group,
            BaseColor::Ambient,
            SubChannel::Alpha,
            alpha.ambient_source,
        );
    } else {
        write_unlit_ambient(out, SubChannel::Alpha);
    }

    let lights = target.lights.as_str();
    match (color.lighting_enabled, alpha.lighting_enabled) {
        (true, true) => {
            record_functions(uid, color_slot, color);
            record_functions(uid, alpha_slot, alpha);

            let color_mask = color.full_light_mask();
            let alpha_mask = alpha.full_light_mask();
            let shared = if color.shares_light_params(alpha) {
                color_mask & alpha_mask
            } else {
                0
            };

            for index in mask_lights(shared) {
                generate_light(out, lights, index, color, Swizzle::Both)?;
            }
            for index in 0..MAX_LIGHTS {
                let bit = 1 << index;
                if shared & bit != 0 {
                    continue;
                }
                if color_mask & bit != 0 {
                    generate_light(out, lights, index, color, Swizzle::Color)?;
                }
                if alpha_mask & bit != 0 {
                    generate_light(out, lights, index, alpha, Swizzle::Alpha)?;
                }
            }
        }
        (true, false) => {
            record_functions(uid, color_slot, color);
            for index in color.lights() {
                generate_light(out, lights, index, color, Swizzle::Color)?;
            }
        }
        (false, true) => {
            record_functions(uid, alpha_slot, alpha);
            for index in alpha.lights() {
                generate_light(out, lights, index, alpha, Swizzle::Alpha)?;
            }
        }
        (false, false) => {}
    }

    match target.numeric_mode {
        NumericMode::Integer => {
            out.write_str("ilacc = int4(round(lacc));\n");
            out.write_str("ilacc = clamp(ilacc, 0, 255);\n");
            out.write_str("ilacc += ilacc >> 7;\n");
            writeln!(
                out,
                "{}{} = float4((int4(mat) * ilacc) >> 8) / 255.0;",
                target.dest, group
            );
        }
        NumericMode::Float => {
            out.write_str("lacc = clamp(lacc, 0.0, 255.0);\n");
            out.write_str("lacc = lacc + floor(lacc / 128.0);\n");
            writeln!(out, "{}{} = floor((mat * lacc)/256.0)/255.0;", target.dest, group);
        }
    }
    out.write_str("}\n");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{AttenuationFunction, DiffuseFunction, VertexComponents};

    fn code_for(config: &LightingConfig, target: &ShaderTarget) -> String {
        synthesize(config, target, SynthesisMode::IdentityAndCode)
            .unwrap()
            .code
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_unlit_register_channel() {
        let config = LightingConfig::new(1, VertexComponents::empty());
        let code = code_for(&config, &ShaderTarget::vertex(NumericMode::Integer));
        assert_eq!(
            code,
            "{\n\
             mat = I_MATERIALS[2];\n\
             lacc = float4(255.0,255.0,255.0,255.0);\n\
             lacc.w = 255.0;\n\
             ilacc = int4(round(lacc));\n\
             ilacc = clamp(ilacc, 0, 255);\n\
             ilacc += ilacc >> 7;\n\
             o.colors_0 = float4((int4(mat) * ilacc) >> 8) / 255.0;\n\
             }\n"
        );
    }

    #[test]
    fn test_float_finalize_in_pixel_stage() {
        let config = LightingConfig::new(2, VertexComponents::empty());
        let code = code_for(&config, &ShaderTarget::pixel(NumericMode::Float));
        assert!(code.contains("mat = I_PMATERIALS[3];\n"));
        assert!(code.contains("lacc = lacc + floor(lacc / 128.0);\n"));
        assert!(code.contains("colors_1 = floor((mat * lacc)/256.0)/255.0;\n"));
        assert!(!code.contains("ilacc"));
    }

    #[test]
    fn test_vertex_sources() {
        let color = LitChannel {
            material_source: ColorSource::Vertex,
            ambient_source: ColorSource::Vertex,
            ..LitChannel::lit(0, DiffuseFunction::None, AttenuationFunction::None)
        };
        let alpha = LitChannel {
            material_source: ColorSource::Register,
            ambient_source: ColorSource::Register,
            ..LitChannel::lit(0, DiffuseFunction::None, AttenuationFunction::None)
        };
        let config = LightingConfig::new(2, VertexComponents::COLOR0 | VertexComponents::COLOR1)
            .with_group(1, color, alpha);
        let code = code_for(&config, &ShaderTarget::vertex(NumericMode::Integer));

        assert!(code.contains("mat = round(color1 * 255.0);\n"));
        assert!(code.contains("lacc = round(color1 * 255.0);\n"));
        assert!(code.contains("mat.w = I_MATERIALS[3].w;\n"));
        assert!(code.contains("lacc.w = I_MATERIALS[1].w;\n"));
    }

    #[test]
    fn test_vertex_source_without_vertex_color() {
        let color = LitChannel {
            material_source: ColorSource::Vertex,
            ambient_source: ColorSource::Vertex,
            ..LitChannel::lit(0, DiffuseFunction::None, AttenuationFunction::None)
        };
        let alpha = LitChannel {
            material_source: ColorSource::Register,
            ..LitChannel::new()
        };
        let config = LightingConfig::new(1, VertexComponents::empty()).with_group(0, color, alpha);
        let code = code_for(&config, &ShaderTarget::vertex(NumericMode::Integer));

        assert!(code.contains("mat = float4(255.0,255.0,255.0,255.0);\n"));
        assert!(code.contains("lacc = float4(255.0,255.0,255.0,255.0);\n"));
        assert!(code.contains("mat.w = I_MATERIALS[2].w;\n"));
    }

    #[test]
    fn test_alpha_vertex_material_falls_back_to_color0() {
        let alpha = LitChannel {
            material_source: ColorSource::Vertex,
            ..LitChannel::new()
        };
        let config = LightingConfig::new(2, VertexComponents::COLOR0)
            .with_group(1, LitChannel::new(), alpha);
        let code = code_for(&config, &ShaderTarget::pixel(NumericMode::Integer));
        assert!(code.contains("mat.w = round(colors_0.w * 255.0);\n"));
    }

    #[test]
    fn test_shared_and_split_lights() {
        // Color uses lights {0, 2}, alpha {2, 3}, same functions: light 2 is shared
        let color = LitChannel::lit(0b0101, DiffuseFunction::Clamp, AttenuationFunction::Spot);
        let alpha = LitChannel::lit(0b1100, DiffuseFunction::Clamp, AttenuationFunction::Spot);
        let config = LightingConfig::new(1, VertexComponents::empty()).with_group(0, color, alpha);
        let code = code_for(&config, &ShaderTarget::vertex(NumericMode::Integer));

        let accumulations: Vec<&str> = code
            .lines()
            .filter(|l| l.starts_with("lacc.") && l.contains("+="))
            .collect();
        assert_eq!(
            accumulations,
            vec![
                "lacc.xyzw += attn * max(0.0,dot(ldir, _norm0)) * I_LIGHTS[5*2].xyzw;",
                "lacc.xyz += attn * max(0.0,dot(ldir, _norm0)) * I_LIGHTS[5*0].xyz;",
                "lacc.w += attn * max(0.0,dot(ldir, _norm0)) * I_LIGHTS[5*3].w;",
            ]
        );
    }

    #[test]
    fn test_different_functions_never_share() {
        let color = LitChannel::lit(0b1, DiffuseFunction::Clamp, AttenuationFunction::Spot);
        let alpha = LitChannel::lit(0b1, DiffuseFunction::Sign, AttenuationFunction::Spot);
        let config = LightingConfig::new(1, VertexComponents::empty()).with_group(0, color, alpha);
        let code = code_for(&config, &ShaderTarget::vertex(NumericMode::Integer));

        assert!(!code.contains("lacc.xyzw"));
        assert!(code.contains("lacc.xyz += attn * max(0.0,dot(ldir, _norm0)) * I_LIGHTS[5*0].xyz;"));
        assert!(code.contains("lacc.w += attn * (dot(ldir, _norm0)) * I_LIGHTS[5*0].w;"));
    }

    #[test]
    fn test_uid_records_lit_state_only() {
        let color = LitChannel {
            ambient_source: ColorSource::Vertex,
            ..LitChannel::lit(0x21, DiffuseFunction::Clamp, AttenuationFunction::Spot)
        };
        let alpha = LitChannel {
            material_source: ColorSource::Vertex,
            ambient_source: ColorSource::Vertex,
            diffuse: DiffuseFunction::Sign,
            light_mask: 0xFF,
            ..LitChannel::new()
        };
        let config = LightingConfig::new(1, VertexComponents::COLOR0).with_group(0, color, alpha);
        let uid = lighting_uid(&config).unwrap();

        assert_eq!(uid.channel_count(), 1);
        assert_eq!(uid.vertex_colors(), VertexComponents::COLOR0);
        assert_eq!(uid.material_source(0), ColorSource::Register);
        assert_eq!(uid.material_source(2), ColorSource::Vertex);
        assert!(uid.lighting_enabled(0));
        assert!(!uid.lighting_enabled(2));
        assert_eq!(uid.ambient_source(0), ColorSource::Vertex);
        assert_eq!(uid.ambient_source(2), ColorSource::Register);
        assert_eq!(uid.diffuse_code(0), DiffuseFunction::Clamp as u32);
        assert_eq!(uid.attenuation_code(0), AttenuationFunction::Spot as u32);
        assert_eq!(uid.diffuse_code(2), 0);
        assert_eq!(uid.attenuation_code(2), 0);
        assert_eq!(uid.light_mask(0), 0x21);
        assert_eq!(uid.light_mask(2), 0);
    }

    #[test]
    fn test_identity_only_matches_full_pass() {
        let color = LitChannel::lit(0x0F, DiffuseFunction::Sign, AttenuationFunction::Specular);
        let alpha = LitChannel::lit(0xF0, DiffuseFunction::Sign, AttenuationFunction::Specular);
        let config = LightingConfig::new(2, VertexComponents::empty()).with_group(1, color, alpha);
        let target = ShaderTarget::vertex(NumericMode::Integer);

        let cheap = synthesize(&config, &target, SynthesisMode::IdentityOnly).unwrap();
        let full = synthesize(&config, &target, SynthesisMode::IdentityAndCode).unwrap();
        assert!(cheap.code.is_none());
        assert_eq!(cheap.uid, full.uid);
        assert_eq!(cheap.uid, lighting_uid(&config).unwrap());
    }

    #[test]
    fn test_invalid_channel_count() {
        let config = LightingConfig::new(3, VertexComponents::empty());
        let target = ShaderTarget::vertex(NumericMode::Integer);
        assert_eq!(
            synthesize(&config, &target, SynthesisMode::IdentityOnly),
            Err(LightingError::InvalidChannelCount(3))
        );
    }

    #[test]
    fn test_target_from_config() {
        let config = ShaderConfig {
            stage: StageKind::Pixel,
            numeric_mode: NumericMode::Float,
            dump_shaders: false,
        };
        assert_eq!(ShaderTarget::from_config(&config), ShaderTarget::pixel(NumericMode::Float));
    }

    #[test]
    fn test_dump_flag_leaves_output_unchanged() {
        let config = ShaderConfig {
            dump_shaders: true,
            ..ShaderConfig::default()
        };
        let dumping = ShaderTarget::from_config(&config);
        assert!(dumping.dump_code);
        assert!(!ShaderTarget::vertex(NumericMode::Integer).dump_code);

        let lit = LitChannel::lit(0x03, DiffuseFunction::Clamp, AttenuationFunction::Spot);
        let lighting = LightingConfig::new(1, VertexComponents::empty()).with_group(0, lit, lit);
        assert_eq!(
            code_for(&lighting, &dumping),
            code_for(&lighting, &ShaderTarget::vertex(NumericMode::Integer))
        );
    }
}
