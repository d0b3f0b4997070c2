//! Generated code for fixed channel setups

use serde::Deserialize;
use xf_core::NumericMode;
use xf_lighting::{
    synthesize, AttenuationFunction, ColorSource, DiffuseFunction, LightingConfig, LitChannel,
    ShaderTarget, SynthesisMode, VertexComponents,
};

/// One channel pair described in TOML
#[derive(Debug, Deserialize)]
struct Fixture {
    channel_count: u32,
    #[serde(default)]
    vertex_color0: bool,
    #[serde(default)]
    vertex_color1: bool,
    color: LitChannel,
    alpha: LitChannel,
}

impl Fixture {
    fn config(&self) -> LightingConfig {
        let mut components = VertexComponents::empty();
        components.set(VertexComponents::COLOR0, self.vertex_color0);
        components.set(VertexComponents::COLOR1, self.vertex_color1);
        LightingConfig::new(self.channel_count, components).with_group(0, self.color, self.alpha)
    }
}

const SPOT_SHARED: &str = r#"
channel_count = 1
vertex_color0 = true

[color]
material_source = "Vertex"
ambient_source = "Register"
lighting_enabled = true
diffuse = "Clamp"
attenuation = "Spot"
light_mask = 0x02

[alpha]
material_source = "Register"
ambient_source = "Vertex"
lighting_enabled = true
diffuse = "Clamp"
attenuation = "Spot"
light_mask = 0x06
"#;

#[test]
fn test_spot_shared_golden() {
    let fixture: Fixture = toml::from_str(SPOT_SHARED).unwrap();
    assert_eq!(fixture.color.material_source, ColorSource::Vertex);
    assert_eq!(fixture.alpha.attenuation, AttenuationFunction::Spot);

    let target = ShaderTarget::vertex(NumericMode::Integer);
    let synthesis = synthesize(&fixture.config(), &target, SynthesisMode::IdentityAndCode).unwrap();
    let code = synthesis.code.unwrap();

    assert_eq!(code.as_str(), include_str!("data/spot_shared.txt"));
    assert_eq!(synthesis.uid.light_mask(0), 0x02);
    assert_eq!(synthesis.uid.light_mask(2), 0x06);
}

#[test]
fn test_fixture_defaults_are_unlit() {
    let fixture: Fixture = toml::from_str(
        r#"
channel_count = 1

[color]
lighting_enabled = true
light_mask = 1

[alpha]
"#,
    )
    .unwrap();

    assert_eq!(fixture.color.diffuse, DiffuseFunction::None);
    assert_eq!(fixture.color.attenuation, AttenuationFunction::None);
    assert_eq!(fixture.alpha, LitChannel::new());

    let target = ShaderTarget::pixel(NumericMode::Float);
    let code = synthesize(&fixture.config(), &target, SynthesisMode::IdentityAndCode)
        .unwrap()
        .code
        .unwrap();
    assert!(code.as_str().contains("lacc.xyz += attn * I_PLIGHTS[5*0].xyz;\n"));
    assert!(code.as_str().contains("lacc.w = 255.0;\n"));
}
