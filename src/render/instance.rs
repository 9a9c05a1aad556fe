use bytemuck::{Pod, Zeroable};

use crate::scene::agent::{AgentView, Mode};
use crate::scene::props::Prop;

/// Sprite height for cats, matching the collision layout (body box ends at 92px).
const CAT_HEIGHT: f32 = 96.0;
/// How far a hopping cat is lifted.
const HOP_LIFT: f32 = 14.0;

/// Coat color a hissing cat is blended halfway toward.
const HISS_RED: u32 = 0xE6_32_28_FF;

/// Shader shape selector.
pub const SHAPE_MUSHROOM: u32 = 0;
pub const SHAPE_CAT: u32 = 1;
pub const SHAPE_CAT_CURLED: u32 = 2;

/// Per-instance data uploaded to GPU each frame.
/// Stride = 28 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner in pixels.
    pub position: [f32; 2],
    /// Width and height in pixels.
    pub size: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// One of the `SHAPE_*` constants.
    pub shape: u32,
    /// +1 or -1; mirrors the sprite horizontally.
    pub facing: f32,
}

impl SpriteInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // size
        2 => Uint32,    // color
        3 => Uint32,    // shape
        4 => Float32,   // facing
    ];

    /// One instance per quad; corners come from the vertex index.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn from_prop(prop: &Prop) -> Self {
        Self {
            position: prop.pos.into(),
            size: [prop.width, prop.height],
            color: prop.asset.tint(),
            shape: SHAPE_MUSHROOM,
            facing: 1.0,
        }
    }

    pub fn from_agent(view: &AgentView, width: f32) -> Self {
        let lift = if view.hopping { HOP_LIFT } else { 0.0 };

        let coat = view.kind.traits().color;
        let (shape, color) = match view.mode {
            Mode::Sleep => (SHAPE_CAT_CURLED, coat),
            Mode::Hiss => (SHAPE_CAT, blend_half(coat, HISS_RED)),
            _ => (SHAPE_CAT, coat),
        };

        Self {
            position: [view.pos.x, view.pos.y - lift],
            size: [width, CAT_HEIGHT],
            color,
            shape,
            facing: view.facing,
        }
    }
}

/// Per-channel average of two packed RGBA colors.
fn blend_half(a: u32, b: u32) -> u32 {
    let a = a.to_be_bytes();
    let b = b.to_be_bytes();
    u32::from_be_bytes(std::array::from_fn(|i| ((a[i] as u16 + b[i] as u16) / 2) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::agent::AgentKind;
    use glam::Vec2;

    fn view(mode: Mode, hopping: bool) -> AgentView {
        AgentView {
            kind: AgentKind::Grey,
            mode,
            pos: Vec2::new(100.0, 400.0),
            facing: -1.0,
            hopping,
            sprite: "grey walk",
        }
    }

    #[test]
    fn layout_matches_struct_fields() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 28);
        let offsets: Vec<_> = SpriteInstance::ATTRIBS.iter().map(|a| a.offset).collect();
        let expected = [
            std::mem::offset_of!(SpriteInstance, position),
            std::mem::offset_of!(SpriteInstance, size),
            std::mem::offset_of!(SpriteInstance, color),
            std::mem::offset_of!(SpriteInstance, shape),
            std::mem::offset_of!(SpriteInstance, facing),
        ];
        assert_eq!(offsets, expected.map(|o| o as u64).to_vec());
    }

    #[test]
    fn hissing_visibly_reddens_every_coat() {
        for kind in AgentKind::ROSTER {
            let calm = AgentView { kind, ..view(Mode::Roam, false) };
            let hiss = AgentView { kind, ..view(Mode::Hiss, false) };
            let calm = SpriteInstance::from_agent(&calm, 120.0);
            let hiss = SpriteInstance::from_agent(&hiss, 120.0);
            assert_ne!(calm.color, hiss.color, "{kind:?}");
            let [r, g, b, a] = hiss.color.to_be_bytes();
            assert!(r > g && r > b, "{kind:?}: {:08x}", hiss.color);
            assert_eq!(a, 0xFF);
        }
    }

    #[test]
    fn hopping_lifts_the_sprite() {
        let grounded = SpriteInstance::from_agent(&view(Mode::Roam, false), 120.0);
        let hopping = SpriteInstance::from_agent(&view(Mode::Roam, true), 120.0);
        assert_eq!(grounded.position[1] - hopping.position[1], HOP_LIFT);
        assert_eq!(hopping.facing, -1.0);
    }

    #[test]
    fn sleeping_cats_curl_up() {
        let inst = SpriteInstance::from_agent(&view(Mode::Sleep, false), 120.0);
        assert_eq!(inst.shape, SHAPE_CAT_CURLED);
    }
}
