//! Lighting uid: the shader cache key for a lighting configuration
//!
//! Packed little-endian, LSB first:
//!
//! | bits  | field                                             |
//! |-------|---------------------------------------------------|
//! | 0-3   | material source, 1 bit per slot                   |
//! | 4-7   | lighting enable, 1 bit per slot                   |
//! | 8-11  | ambient source, 1 bit per slot                    |
//! | 12-13 | color channel count                               |
//! | 14-15 | vertex colors observed by the generated code      |
//! | 16-23 | diffuse function, 2 bits per slot                 |
//! | 24-31 | attenuation function, 2 bits per slot             |
//! | 32-63 | light mask, 8 bits per slot                       |
//!
//! Slot `j` is color channel `j`, slot `j + 2` is alpha channel `j`.

use crate::channel::{AttenuationFunction, ColorSource, DiffuseFunction, VertexComponents};
use bytemuck::{Pod, Zeroable};
use std::fmt;

const MATSOURCE_SHIFT: u32 = 0;
const ENABLE_SHIFT: u32 = 4;
const AMBSOURCE_SHIFT: u32 = 8;
const CHANNEL_COUNT_SHIFT: u32 = 12;
const VERTEX_COLOR_SHIFT: u32 = 14;
const DIFFUSE_SHIFT: u32 = 16;
const ATTN_SHIFT: u32 = 24;
const LIGHT_MASK_SHIFT: u32 = 32;

/// Number of uid slots (2 color + 2 alpha)
pub const UID_SLOTS: usize = 4;

/// Canonical identity of a lighting configuration
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
pub struct LightingUid(u64);

impl LightingUid {
    /// Empty uid
    pub fn new() -> Self {
        Self(0)
    }

    /// Rebuild from a raw packed value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw packed value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Packed bytes in native byte order, for use as an exact-match cache key
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    fn set(&mut self, shift: u32, value: u64) {
        self.0 |= value << shift;
    }

    fn get(&self, shift: u32, width: u32) -> u64 {
        (self.0 >> shift) & ((1 << width) - 1)
    }

    pub fn record_material_source(&mut self, slot: usize, source: ColorSource) {
        self.set(MATSOURCE_SHIFT + slot as u32, source as u64);
    }

    pub fn record_lighting_enabled(&mut self, slot: usize, enabled: bool) {
        self.set(ENABLE_SHIFT + slot as u32, enabled as u64);
    }

    pub fn record_ambient_source(&mut self, slot: usize, source: ColorSource) {
        self.set(AMBSOURCE_SHIFT + slot as u32, source as u64);
    }

    pub fn record_diffuse(&mut self, slot: usize, diffuse: DiffuseFunction) {
        self.set(DIFFUSE_SHIFT + 2 * slot as u32, diffuse as u64);
    }

    pub fn record_attenuation(&mut self, slot: usize, attenuation: AttenuationFunction) {
        self.set(ATTN_SHIFT + 2 * slot as u32, attenuation as u64);
    }

    pub fn record_light_mask(&mut self, slot: usize, mask: u8) {
        self.set(LIGHT_MASK_SHIFT + 8 * slot as u32, mask as u64);
    }

    pub fn record_channel_count(&mut self, count: u32) {
        self.set(CHANNEL_COUNT_SHIFT, (count & 0x3) as u64);
    }

    pub fn record_vertex_colors(&mut self, colors: VertexComponents) {
        let bits = colors.contains(VertexComponents::COLOR0) as u64
            | (colors.contains(VertexComponents::COLOR1) as u64) << 1;
        self.set(VERTEX_COLOR_SHIFT, bits);
    }

    pub fn material_source(&self, slot: usize) -> ColorSource {
        ColorSource::from(self.get(MATSOURCE_SHIFT + slot as u32, 1) != 0)
    }

    pub fn lighting_enabled(&self, slot: usize) -> bool {
        self.get(ENABLE_SHIFT + slot as u32, 1) != 0
    }

    pub fn ambient_source(&self, slot: usize) -> ColorSource {
        ColorSource::from(self.get(AMBSOURCE_SHIFT + slot as u32, 1) != 0)
    }

    /// Raw 2-bit diffuse code of a slot
    pub fn diffuse_code(&self, slot: usize) -> u32 {
        self.get(DIFFUSE_SHIFT + 2 * slot as u32, 2) as u32
    }

    /// Raw 2-bit attenuation code of a slot
    pub fn attenuation_code(&self, slot: usize) -> u32 {
        self.get(ATTN_SHIFT + 2 * slot as u32, 2) as u32
    }

    pub fn light_mask(&self, slot: usize) -> u8 {
        self.get(LIGHT_MASK_SHIFT + 8 * slot as u32, 8) as u8
    }

    pub fn channel_count(&self) -> u32 {
        self.get(CHANNEL_COUNT_SHIFT, 2) as u32
    }

    pub fn vertex_colors(&self) -> VertexComponents {
        let bits = self.get(VERTEX_COLOR_SHIFT, 2);
        let mut colors = VertexComponents::empty();
        colors.set(VertexComponents::COLOR0, bits & 1 != 0);
        colors.set(VertexComponents::COLOR1, bits & 2 != 0);
        colors
    }
}

impl fmt::Debug for LightingUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightingUid")
            .field("raw", &format_args!("{:016x}", self.0))
            .field("matsource", &format_args!("{:04b}", self.get(MATSOURCE_SHIFT, 4)))
            .field("enable", &format_args!("{:04b}", self.get(ENABLE_SHIFT, 4)))
            .field("ambsource", &format_args!("{:04b}", self.get(AMBSOURCE_SHIFT, 4)))
            .field("channels", &self.channel_count())
            .field("diffuse", &format_args!("{:08b}", self.get(DIFFUSE_SHIFT, 8)))
            .field("attn", &format_args!("{:08b}", self.get(ATTN_SHIFT, 8)))
            .field("light_mask", &format_args!("{:08x}", self.get(LIGHT_MASK_SHIFT, 32)))
            .finish()
    }
}

impl fmt::Display for LightingUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
