//! Per-light lighting formulas
//!
//! Each light occupies five consecutive slots of the lights resource:
//! `[5*i]` color, `[5*i+1]` cosine attenuation, `[5*i+2]` distance
//! attenuation, `[5*i+3]` position and `[5*i+4]` direction.
//!
//! The emitted statements use the locals `ldir`, `attn`, `dist`, `dist2`
//! and `lacc` and the inputs `pos` and `_norm0`, all declared by the
//! enclosing shader template.

use crate::channel::{AttenuationFunction, DiffuseFunction, LitChannel, MAX_LIGHTS};
use crate::writer::ShaderWriter;
use std::fmt;
use xf_core::LightingError;

/// Components of `lacc` a light accumulates into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swizzle {
    /// Color channel only
    Color,
    /// Alpha channel only
    Alpha,
    /// Color and alpha channel sharing the same light
    Both,
}

impl Swizzle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Swizzle::Color => "xyz",
            Swizzle::Alpha => "w",
            Swizzle::Both => "xyzw",
        }
    }
}

impl fmt::Display for Swizzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the five per-light parameter slots
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightField {
    Color = 0,
    CosAtt = 1,
    DistAtt = 2,
    Position = 3,
    Direction = 4,
}

/// Reference to a light parameter inside the lights resource
#[derive(Debug, Clone, Copy)]
pub struct LightSlot<'a> {
    lights: &'a str,
    index: u8,
    field: LightField,
}

impl fmt::Display for LightSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            LightField::Color => write!(f, "{}[5*{}]", self.lights, self.index),
            field => write!(f, "{}[5*{}+{}]", self.lights, self.index, field as u8),
        }
    }
}

/// Reference to `field` of light `index` in the lights resource `lights`
pub fn light_slot(lights: &str, index: u8, field: LightField) -> LightSlot<'_> {
    LightSlot {
        lights,
        index,
        field,
    }
}

/// Emit the accumulation of light `index` into `lacc.<swizzle>`
///
/// `channel` supplies the attenuation and diffuse functions. For
/// [`Swizzle::Both`] both channels of the pair must use the same ones.
pub fn generate_light<W: ShaderWriter>(
    out: &mut W,
    lights: &str,
    index: u8,
    channel: &LitChannel,
    swizzle: Swizzle,
) -> Result<(), LightingError> {
    if index >= MAX_LIGHTS {
        return Err(LightingError::InvalidLightIndex(index));
    }
    if !out.emits_code() {
        return Ok(());
    }

    tracing::trace!(
        "Light {}: attn={:?} diffuse={:?} swizzle={}",
        index,
        channel.attenuation,
        channel.diffuse,
        swizzle
    );

    let color = light_slot(lights, index, LightField::Color);
    let cosatt = light_slot(lights, index, LightField::CosAtt);
    let distatt = light_slot(lights, index, LightField::DistAtt);
    let position = light_slot(lights, index, LightField::Position);
    let direction = light_slot(lights, index, LightField::Direction);

    writeln!(out, "ldir = {}.xyz - pos.xyz;", position);
    out.write_str("if (dot(ldir,ldir) < 0.00001)\n\t ldir = _norm0;\n");

    match channel.attenuation {
        AttenuationFunction::None | AttenuationFunction::Directional => {
            out.write_str("ldir = normalize(ldir);\n");
            out.write_str("attn = 1.0f;\n");
        }
        AttenuationFunction::Specular => {
            // Distance attenuation is only normalized with a diffuse term
            let normalize = match channel.diffuse {
                DiffuseFunction::None => "",
                DiffuseFunction::Sign | DiffuseFunction::Clamp => "normalize",
            };
            out.write_str("ldir = normalize(ldir);\n");
            writeln!(
                out,
                "attn = (dot(_norm0, ldir) >= 0.0) ? max(0.0, dot(_norm0, {}.xyz)) : 0.0;",
                direction
            );
            writeln!(
                out,
                "attn = max(0.0f, dot({}.xyz, float3(1.0, attn, attn*attn))) / dot({}({}.xyz), float3(1.0, attn, attn*attn));",
                cosatt, normalize, distatt
            );
        }
        AttenuationFunction::Spot => {
            out.write_str("dist2 = dot(ldir, ldir);\n");
            out.write_str("dist = sqrt(dist2);\n");
            out.write_str("ldir = ldir / dist;\n");
            writeln!(out, "attn = max(0.0, dot(ldir, {}.xyz));", direction);
            writeln!(
                out,
                "attn = max(0.0, dot({}.xyz, float3(1.0, attn, attn*attn))) / dot({}.xyz, float3(1.0,dist,dist2));",
                cosatt, distatt
            );
        }
    }

    match channel.diffuse {
        DiffuseFunction::None => {
            writeln!(out, "lacc.{} += attn * {}.{};", swizzle, color, swizzle);
        }
        DiffuseFunction::Sign => {
            writeln!(out, "lacc.{} += attn * (dot(ldir, _norm0)) * {}.{};", swizzle, color, swizzle);
        }
        DiffuseFunction::Clamp => {
            writeln!(
                out,
                "lacc.{} += attn * max(0.0,dot(ldir, _norm0)) * {}.{};",
                swizzle, color, swizzle
            );
        }
    }
    out.write_str("\n");

    Ok(())
}
