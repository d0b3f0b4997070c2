//! Fixed-function XF lighting emulation
//!
//! Turns the transform unit's lit channel state into shader source for a
//! programmable GPU, and into a [`LightingUid`] that identifies the
//! generated source in a shader cache.
//!
//! ```
//! use xf_lighting::{synthesize, LightingConfig, ShaderTarget, SynthesisMode, VertexComponents};
//! use xf_core::NumericMode;
//!
//! let config = LightingConfig::new(1, VertexComponents::COLOR0);
//! let target = ShaderTarget::vertex(NumericMode::Integer);
//!
//! // Cheap lookup first, full generation only on a cache miss
//! let key = synthesize(&config, &target, SynthesisMode::IdentityOnly).unwrap().uid;
//! let full = synthesize(&config, &target, SynthesisMode::IdentityAndCode).unwrap();
//! assert_eq!(key, full.uid);
//! assert!(full.code.unwrap().as_str().contains("o.colors_0"));
//! ```

pub mod channel;
pub mod light;
pub mod reference;
pub mod synth;
pub mod uid;
pub mod writer;

pub use channel::{
    AttenuationFunction, ColorSource, DiffuseFunction, LightingConfig, LitChannel, SubChannel,
    VertexComponents, MAX_COLOR_CHANNELS, MAX_LIGHTS,
};
pub use light::{generate_light, light_slot, LightField, Swizzle};
pub use synth::{
    generate_lighting, lighting_uid, synthesize, ShaderTarget, Synthesis, SynthesisMode,
};
pub use uid::{LightingUid, UID_SLOTS};
pub use writer::{NullWriter, ShaderCode, ShaderWriter};
