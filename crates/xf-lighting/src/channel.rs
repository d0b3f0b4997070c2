//! XF lit channel state
//!
//! The transform unit has four lit channels: two color channels and two
//! alpha channels, where `alpha[j]` pairs with `color[j]`. Each channel is
//! controlled by one 32-bit register.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use xf_core::{FunctionField, LightingError};

/// Number of hardware lights
pub const MAX_LIGHTS: u8 = 8;

/// Number of color/alpha channel pairs
pub const MAX_COLOR_CHANNELS: usize = 2;

// Lit channel register layout
const MATSOURCE_BIT: u32 = 0;
const ENABLE_BIT: u32 = 1;
const LIGHTS_0_3_SHIFT: u32 = 2;
const AMBSOURCE_BIT: u32 = 6;
const DIFFUSE_SHIFT: u32 = 7;
const ATTN_SHIFT: u32 = 9;
const LIGHTS_4_7_SHIFT: u32 = 11;

bitflags! {
    /// Vertex format components relevant to lighting
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexComponents: u32 {
        const COLOR0 = 1 << 13;
        const COLOR1 = 1 << 14;
    }
}

impl VertexComponents {
    /// Flag for the per-vertex color of channel `index`
    pub fn color(index: usize) -> Self {
        if index == 0 {
            Self::COLOR0
        } else {
            Self::COLOR1
        }
    }
}

/// Where a channel's material or ambient color comes from
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorSource {
    /// Material register
    #[default]
    Register = 0,
    /// Per-vertex color
    Vertex = 1,
}

impl From<bool> for ColorSource {
    fn from(bit: bool) -> Self {
        if bit {
            ColorSource::Vertex
        } else {
            ColorSource::Register
        }
    }
}

/// How normal alignment modulates a light's intensity
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiffuseFunction {
    #[default]
    None = 0,
    Sign = 1,
    Clamp = 2,
}

impl TryFrom<u32> for DiffuseFunction {
    type Error = LightingError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DiffuseFunction::None),
            1 => Ok(DiffuseFunction::Sign),
            2 => Ok(DiffuseFunction::Clamp),
            _ => Err(LightingError::ReservedFunction {
                field: FunctionField::Diffuse,
                code,
            }),
        }
    }
}

/// How a light falls off with angle and distance
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttenuationFunction {
    Specular = 0,
    Spot = 1,
    #[default]
    None = 2,
    Directional = 3,
}

impl TryFrom<u32> for AttenuationFunction {
    type Error = LightingError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AttenuationFunction::Specular),
            1 => Ok(AttenuationFunction::Spot),
            2 => Ok(AttenuationFunction::None),
            3 => Ok(AttenuationFunction::Directional),
            _ => Err(LightingError::ReservedFunction {
                field: FunctionField::Attenuation,
                code,
            }),
        }
    }
}

/// One lit channel descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LitChannel {
    pub material_source: ColorSource,
    pub ambient_source: ColorSource,
    pub lighting_enabled: bool,
    pub diffuse: DiffuseFunction,
    pub attenuation: AttenuationFunction,
    /// Requested lights, bit `i` for light `i`
    pub light_mask: u8,
}

impl LitChannel {
    /// Unlit channel taking its material from the register
    pub fn new() -> Self {
        Self::default()
    }

    /// Lit channel using the given lights and functions
    pub fn lit(light_mask: u8, diffuse: DiffuseFunction, attenuation: AttenuationFunction) -> Self {
        Self {
            lighting_enabled: true,
            diffuse,
            attenuation,
            light_mask,
            ..Self::default()
        }
    }

    /// Decode a lit channel control register
    pub fn from_register(hex: u32) -> Result<Self, LightingError> {
        let lights_0_3 = (hex >> LIGHTS_0_3_SHIFT) & 0xF;
        let lights_4_7 = (hex >> LIGHTS_4_7_SHIFT) & 0xF;

        Ok(Self {
            material_source: ColorSource::from((hex >> MATSOURCE_BIT) & 1 != 0),
            ambient_source: ColorSource::from((hex >> AMBSOURCE_BIT) & 1 != 0),
            lighting_enabled: (hex >> ENABLE_BIT) & 1 != 0,
            diffuse: DiffuseFunction::try_from((hex >> DIFFUSE_SHIFT) & 0x3)?,
            attenuation: AttenuationFunction::try_from((hex >> ATTN_SHIFT) & 0x3)?,
            light_mask: (lights_0_3 | (lights_4_7 << 4)) as u8,
        })
    }

    /// Encode back into the register layout
    pub fn to_register(&self) -> u32 {
        let mask = self.light_mask as u32;
        (self.material_source as u32) << MATSOURCE_BIT
            | (self.lighting_enabled as u32) << ENABLE_BIT
            | (mask & 0xF) << LIGHTS_0_3_SHIFT
            | (self.ambient_source as u32) << AMBSOURCE_BIT
            | (self.diffuse as u32) << DIFFUSE_SHIFT
            | (self.attenuation as u32) << ATTN_SHIFT
            | (mask >> 4) << LIGHTS_4_7_SHIFT
    }

    /// Lights that actually contribute: empty when lighting is disabled
    pub fn full_light_mask(&self) -> u8 {
        if self.lighting_enabled {
            self.light_mask
        } else {
            0
        }
    }

    /// Whether both channels evaluate lights with the same formula
    pub fn shares_light_params(&self, other: &LitChannel) -> bool {
        self.diffuse == other.diffuse && self.attenuation == other.attenuation
    }

    /// Indices of the contributing lights, ascending
    pub fn lights(&self) -> impl Iterator<Item = u8> {
        mask_lights(self.full_light_mask())
    }

    /// Whether the channel reads per-vertex color at all
    pub fn reads_vertex_color(&self) -> bool {
        self.material_source == ColorSource::Vertex
            || (self.lighting_enabled && self.ambient_source == ColorSource::Vertex)
    }
}

/// Indices of the set bits of a light mask, ascending
pub fn mask_lights(mask: u8) -> impl Iterator<Item = u8> {
    (0..MAX_LIGHTS).filter(move |i| mask & (1 << i) != 0)
}

/// Which half of a channel pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubChannel {
    Color,
    Alpha,
}

impl SubChannel {
    /// Slot index used by the uid: `j` for color, `j + 2` for alpha
    pub fn slot(self, group: usize) -> usize {
        match self {
            SubChannel::Color => group,
            SubChannel::Alpha => group + MAX_COLOR_CHANNELS,
        }
    }
}

/// Lighting state for one shader generation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LightingConfig {
    /// Number of active color channels (0-2)
    pub channel_count: u32,
    pub color: [LitChannel; MAX_COLOR_CHANNELS],
    pub alpha: [LitChannel; MAX_COLOR_CHANNELS],
    /// Per-vertex colors present in the current vertex format
    pub components: VertexComponents,
}

impl LightingConfig {
    /// Create a configuration with `channel_count` unlit channel pairs
    pub fn new(channel_count: u32, components: VertexComponents) -> Self {
        Self {
            channel_count,
            components,
            ..Self::default()
        }
    }

    /// Decode from the channel count register and the four lit channel registers
    pub fn from_registers(
        channel_count: u32,
        color: [u32; MAX_COLOR_CHANNELS],
        alpha: [u32; MAX_COLOR_CHANNELS],
        components: VertexComponents,
    ) -> Result<Self, LightingError> {
        let config = Self {
            channel_count,
            color: [
                LitChannel::from_register(color[0])?,
                LitChannel::from_register(color[1])?,
            ],
            alpha: [
                LitChannel::from_register(alpha[0])?,
                LitChannel::from_register(alpha[1])?,
            ],
            components,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the descriptors of channel pair `group`
    ///
    /// # Panics
    ///
    /// Panics if `group` is not below [`MAX_COLOR_CHANNELS`].
    pub fn with_group(mut self, group: usize, color: LitChannel, alpha: LitChannel) -> Self {
        assert!(
            group < MAX_COLOR_CHANNELS,
            "channel pair {} out of range (hardware has {})",
            group,
            MAX_COLOR_CHANNELS
        );
        self.color[group] = color;
        self.alpha[group] = alpha;
        self
    }

    /// Check the invariants the generator relies on
    pub fn validate(&self) -> Result<(), LightingError> {
        if self.channel_count as usize > MAX_COLOR_CHANNELS {
            return Err(LightingError::InvalidChannelCount(self.channel_count));
        }
        Ok(())
    }

    /// Active channel pair indices, ascending
    pub fn groups(&self) -> std::ops::Range<usize> {
        0..(self.channel_count as usize).min(MAX_COLOR_CHANNELS)
    }

    /// Per-vertex color index read by channel pair `group`, if any is present
    pub fn vertex_color_input(&self, group: usize) -> Option<usize> {
        if self.components.contains(VertexComponents::color(group)) {
            Some(group)
        } else if self.components.contains(VertexComponents::COLOR0) {
            Some(0)
        } else {
            None
        }
    }

    /// Vertex color flags that influence the generated code
    ///
    /// A flag only matters when some active channel pair reads vertex
    /// color and would resolve to that input.
    pub fn observed_vertex_colors(&self) -> VertexComponents {
        let reads = |group: usize| {
            self.groups().contains(&group)
                && (self.color[group].reads_vertex_color() || self.alpha[group].reads_vertex_color())
        };
        let has = |flag| self.components.contains(flag);

        let mut observed = VertexComponents::empty();
        if reads(1) && has(VertexComponents::COLOR1) {
            observed |= VertexComponents::COLOR1;
        }
        if has(VertexComponents::COLOR0)
            && (reads(0) || (reads(1) && !has(VertexComponents::COLOR1)))
        {
            observed |= VertexComponents::COLOR0;
        }
        observed
    }
}
