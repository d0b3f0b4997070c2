//! CPU reference of the lighting math
//!
//! Evaluates the same formulas the generated code contains, for one
//! vertex or pixel. Used to check the numeric behavior of the generated
//! shaders (light sharing, degenerate directions, finalize rounding)
//! without a GPU.

use crate::channel::{AttenuationFunction, DiffuseFunction, LitChannel};
use crate::light::Swizzle;
use glam::{Vec3, Vec4};

/// Squared light distance below which the normal is used as direction
pub const DEGENERATE_DISTANCE_SQ: f32 = 0.00001;

/// One light's parameters, as stored in the five slots of the lights resource
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    /// RGBA in the 0-255 range
    pub color: Vec4,
    pub cosatt: Vec3,
    pub distatt: Vec3,
    pub position: Vec3,
    pub direction: Vec3,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            color: Vec4::splat(255.0),
            cosatt: Vec3::X,
            distatt: Vec3::X,
            position: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}

/// Contribution of `light` to `lacc` for a surface point, all four components
pub fn light_contribution(light: &LightParams, channel: &LitChannel, pos: Vec3, normal: Vec3) -> Vec4 {
    let mut ldir = light.position - pos;
    if ldir.dot(ldir) < DEGENERATE_DISTANCE_SQ {
        ldir = normal;
    }

    let attn = match channel.attenuation {
        AttenuationFunction::None | AttenuationFunction::Directional => {
            ldir = ldir.normalize();
            1.0
        }
        AttenuationFunction::Specular => {
            ldir = ldir.normalize();
            let a = if normal.dot(ldir) >= 0.0 {
                normal.dot(light.direction).max(0.0)
            } else {
                0.0
            };
            let distatt = match channel.diffuse {
                DiffuseFunction::None => light.distatt,
                DiffuseFunction::Sign | DiffuseFunction::Clamp => light.distatt.normalize(),
            };
            let terms = Vec3::new(1.0, a, a * a);
            light.cosatt.dot(terms).max(0.0) / distatt.dot(terms)
        }
        AttenuationFunction::Spot => {
            let dist2 = ldir.dot(ldir);
            let dist = dist2.sqrt();
            ldir /= dist;
            let a = ldir.dot(light.direction).max(0.0);
            light.cosatt.dot(Vec3::new(1.0, a, a * a)).max(0.0)
                / light.distatt.dot(Vec3::new(1.0, dist, dist2))
        }
    };

    let factor = match channel.diffuse {
        DiffuseFunction::None => attn,
        DiffuseFunction::Sign => attn * ldir.dot(normal),
        DiffuseFunction::Clamp => attn * ldir.dot(normal).max(0.0),
    };
    light.color * factor
}

/// Add `contribution` to the components of `lacc` selected by `swizzle`
pub fn accumulate(lacc: &mut Vec4, contribution: Vec4, swizzle: Swizzle) {
    match swizzle {
        Swizzle::Color => {
            lacc.x += contribution.x;
            lacc.y += contribution.y;
            lacc.z += contribution.z;
        }
        Swizzle::Alpha => lacc.w += contribution.w,
        Swizzle::Both => *lacc += contribution,
    }
}

/// Intermediate values of the integer finalize step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegerFinalize {
    pub clamped: [i32; 4],
    pub boosted: [i32; 4],
    pub shifted: [i32; 4],
    /// Lit color in 0-1
    pub output: Vec4,
}

/// Round the float accumulator like `int4(round(lacc))`
pub fn round_accumulator(lacc: Vec4) -> [i32; 4] {
    lacc.to_array().map(|c| c.round() as i32)
}

/// Integer finalize: clamp, `acc += acc >> 7`, `(mat * acc) >> 8`, `/ 255`
pub fn finalize_integer(acc: [i32; 4], mat: [i32; 4]) -> IntegerFinalize {
    let clamped = acc.map(|c| c.clamp(0, 255));
    let boosted = clamped.map(|c| c + (c >> 7));
    let shifted = [0, 1, 2, 3].map(|i| (mat[i] * boosted[i]) >> 8);
    let output = Vec4::from_array(shifted.map(|c| c as f32 / 255.0));

    IntegerFinalize {
        clamped,
        boosted,
        shifted,
        output,
    }
}

/// Float finalize: clamp, `acc + floor(acc / 128)`, `floor(mat * acc / 256) / 255`
pub fn finalize_float(lacc: Vec4, mat: Vec4) -> Vec4 {
    let clamped = lacc.clamp(Vec4::ZERO, Vec4::splat(255.0));
    let boosted = clamped + (clamped / 128.0).floor();
    ((mat * boosted) / 256.0).floor() / 255.0
}
