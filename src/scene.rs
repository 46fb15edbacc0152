//! The demo scene: a lit tiled floor and one marker cube per light
//!
//! Rendering walks the same display list up to three times. With enhanced
//! lighting on, the floor is drawn once per basis direction:
//!
//! 1. plane 0 through the 256-color view, depth test Less
//! 2. plane 0 through the 32-color view, depth test Equal
//! 3. plane 1 through the 32-color view, depth test Equal
//!
//! The first pass lays down opaque texels and depth; the other two blend
//! onto exactly the pixels that pass produced. Every pass carries its own
//! poly id, which keeps shared tile edges and quad diagonals from blending
//! twice within a pass. With enhanced lighting off the floor is a single
//! 256-color pass lit by a straight-up pseudo-normal.
//!
//! Vertex lighting runs on raw 4.12 positions; the same positions divide
//! down to world units for the rasterizer.

use crate::asset::LoadedAsset;
use crate::basis::{BasisSet, FLAT_UP};
use crate::fixed::FixedVec3;
use crate::lighting::{marker_color, vertex_color, LightRig, PointLight};
use crate::rasterizer::{
    draw_quad, Camera, Color15, DepthTest, Framebuffer, PaletteView, Rgb5, TextureBinding, Vec2,
    Vec3, Vertex,
};

/// Half of a floor tile in raw 4.12 units (tiles are one world unit square)
const TILE_HALF_RAW: i32 = 2048;

/// Half-extent of a light marker cube in world units (raw 128)
const MARKER_HALF: f32 = 128.0 / 4096.0;

/// Render one frame of the demo scene into the framebuffer.
///
/// Marker cubes go first so the floor's opening pass depth-tests against
/// them; the Equal passes then skip any pixel a cube already owns.
pub fn render_scene(
    fb: &mut Framebuffer,
    camera: &Camera,
    asset: &LoadedAsset,
    basis: &BasisSet,
    rig: &LightRig,
    enhanced: bool,
) {
    fb.clear(Color15::new(0, 0, 10));

    draw_light_markers(fb, camera, rig);

    if enhanced {
        let passes = [
            (&asset.plane0, PaletteView::Rgb256, DepthTest::Less),
            (&asset.plane0, PaletteView::Rgb32A3, DepthTest::Equal),
            (&asset.plane1, PaletteView::Rgb32A3, DepthTest::Equal),
        ];
        for (pass, (texture, view, depth_test)) in passes.into_iter().enumerate() {
            let binding = TextureBinding {
                texture,
                clut: &asset.clut,
                view,
            };
            draw_floor_pass(
                fb,
                camera,
                binding,
                basis.fixed_dirs[pass],
                rig,
                depth_test,
                pass as u8,
            );
        }
    } else {
        let binding = TextureBinding {
            texture: &asset.plane0,
            clut: &asset.clut,
            view: PaletteView::Rgb256,
        };
        draw_floor_pass(fb, camera, binding, FLAT_UP, rig, DepthTest::Less, 0);
    }
}

/// Draw the whole 3x3 tile grid once with one basis direction.
/// All nine tiles share the pass's poly id, so a pixel on a tile seam or
/// a quad diagonal blends at most once per pass.
fn draw_floor_pass(
    fb: &mut Framebuffer,
    camera: &Camera,
    binding: TextureBinding,
    basis_dir: FixedVec3,
    rig: &LightRig,
    depth_test: DepthTest,
    poly_id: u8,
) {
    for tz in -1..=1 {
        for tx in -1..=1 {
            let quad = floor_tile(tx, tz, basis_dir, &rig.lights);
            draw_quad(fb, camera, &quad, Some(binding), depth_test, poly_id);
        }
    }
}

/// Build one floor tile centered on `(tx, tz)` world units, lit per vertex.
///
/// Corner order starts at the far-left corner and runs clockwise when seen
/// from above, which faces the quad upward.
fn floor_tile(tx: i32, tz: i32, basis_dir: FixedVec3, lights: &[PointLight]) -> [Vertex; 4] {
    let cx = tx * 4096;
    let cz = tz * 4096;

    let corners = [
        (cx - TILE_HALF_RAW, cz + TILE_HALF_RAW, Vec2::new(0.0, 1.0)),
        (cx + TILE_HALF_RAW, cz + TILE_HALF_RAW, Vec2::new(1.0, 1.0)),
        (cx + TILE_HALF_RAW, cz - TILE_HALF_RAW, Vec2::new(1.0, 0.0)),
        (cx - TILE_HALF_RAW, cz - TILE_HALF_RAW, Vec2::new(0.0, 0.0)),
    ];

    corners.map(|(x, z, uv)| {
        let raw = FixedVec3::from_raw(x, 0, z);
        Vertex {
            pos: world_pos(raw),
            uv,
            color: vertex_color(raw, basis_dir, lights),
        }
    })
}

/// One flat-shaded cube per light, floating at the light's position
fn draw_light_markers(fb: &mut Framebuffer, camera: &Camera, rig: &LightRig) {
    for light in &rig.lights {
        let center = world_pos(light.pos);
        let color = marker_color(light.color);
        for quad in cube_faces(center, MARKER_HALF, color) {
            draw_quad(fb, camera, &quad, None, DepthTest::Less, 0);
        }
    }
}

/// The six faces of an axis-aligned cube, each wound to face outward
fn cube_faces(center: Vec3, half: f32, color: Rgb5) -> [[Vertex; 4]; 6] {
    let (x0, x1) = (center.x - half, center.x + half);
    let (y0, y1) = (center.y - half, center.y + half);
    let (z0, z1) = (center.z - half, center.z + half);

    let v = |x, y, z| Vertex {
        pos: Vec3::new(x, y, z),
        uv: Vec2::default(),
        color,
    };

    [
        [v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0), v(x0, y1, z0)],
        [v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)],
        [v(x1, y0, z1), v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1)],
        [v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)],
        [v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)],
        [v(x1, y0, z0), v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0)],
    ]
}

#[inline]
fn world_pos(raw: FixedVec3) -> Vec3 {
    Vec3::new(raw.x.to_f32(), raw.y.to_f32(), raw.z.to_f32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed32;
    use crate::rasterizer::{expand_5bit, Clut, IndexedTexture, HEIGHT, WIDTH};

    fn demo_camera() -> Camera {
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 1.0, -2.0);
        camera.rotation_x = 22.5f32.to_radians();
        camera.rotation_y = 0.0;
        camera.update_basis();
        camera
    }

    /// Asset whose every texel is palette entry 0 with a2 = 3, a3 = 2
    fn white_asset() -> LoadedAsset {
        LoadedAsset {
            plane0: IndexedTexture::new(8, 8, vec![3 << 5; 64]),
            plane1: IndexedTexture::new(8, 8, vec![2 << 5; 64]),
            clut: Clut {
                colors: vec![Color15::new(31, 31, 31); 256],
            },
        }
    }

    /// A light bright enough to pin every floor vertex at full white
    fn saturating_rig() -> LightRig {
        LightRig {
            lights: vec![PointLight {
                pos: FixedVec3::from_raw(0, 4096, 0),
                color: FixedVec3::from_raw(1_000_000, 1_000_000, 1_000_000),
            }],
        }
    }

    fn pixel(fb: &Framebuffer, x: usize, y: usize) -> [u8; 4] {
        let i = (y * fb.width + x) * 4;
        [
            fb.pixels[i],
            fb.pixels[i + 1],
            fb.pixels[i + 2],
            fb.pixels[i + 3],
        ]
    }

    #[test]
    fn test_center_tile_geometry() {
        let tile = floor_tile(0, 0, FLAT_UP, &[]);

        let expected = [
            ((-0.5, 0.5), (0.0, 1.0)),
            ((0.5, 0.5), (1.0, 1.0)),
            ((0.5, -0.5), (1.0, 0.0)),
            ((-0.5, -0.5), (0.0, 0.0)),
        ];
        for (vertex, ((x, z), (u, vv))) in tile.iter().zip(expected) {
            assert_eq!(vertex.pos.x, x);
            assert_eq!(vertex.pos.y, 0.0);
            assert_eq!(vertex.pos.z, z);
            assert_eq!(vertex.uv.x, u);
            assert_eq!(vertex.uv.y, vv);
        }
    }

    #[test]
    fn test_grid_spans_three_units() {
        let mut min = (f32::MAX, f32::MAX);
        let mut max = (f32::MIN, f32::MIN);
        for tz in -1..=1 {
            for tx in -1..=1 {
                for vertex in floor_tile(tx, tz, FLAT_UP, &[]) {
                    assert_eq!(vertex.pos.y, 0.0);
                    min = (min.0.min(vertex.pos.x), min.1.min(vertex.pos.z));
                    max = (max.0.max(vertex.pos.x), max.1.max(vertex.pos.z));
                }
            }
        }
        assert_eq!(min, (-1.5, -1.5));
        assert_eq!(max, (1.5, 1.5));
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let center = Vec3::new(0.3, -0.2, 1.7);
        for face in cube_faces(center, 0.25, Rgb5::WHITE) {
            let edge_a = face[1].pos - face[0].pos;
            let edge_b = face[2].pos - face[0].pos;
            let normal = edge_a.cross(edge_b);

            let mut face_center = Vec3::ZERO;
            for vertex in &face {
                face_center = face_center + vertex.pos.scale(0.25);
            }
            assert!(normal.dot(face_center - center) > 0.0);
        }
    }

    #[test]
    fn test_saturated_floor_renders_white_under_blue_sky() {
        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        render_scene(
            &mut fb,
            &demo_camera(),
            &white_asset(),
            &BasisSet::new(),
            &saturating_rig(),
            false,
        );

        // Screen center looks down onto the floor
        let center = (WIDTH / 2, HEIGHT / 2);
        assert_eq!(pixel(&fb, center.0, center.1), [255, 255, 255, 255]);
        assert!(fb.zbuffer[center.1 * WIDTH + center.0] < f32::MAX);

        // The top row looks above the horizon and keeps the clear color
        let sky = expand_5bit(10);
        assert_eq!(pixel(&fb, WIDTH / 2, 0), [0, 0, sky, 255]);
        assert_eq!(fb.zbuffer[WIDTH / 2], f32::MAX);
    }

    #[test]
    fn test_unlit_enhanced_floor_is_drawn_black() {
        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        let rig = LightRig { lights: Vec::new() };
        render_scene(
            &mut fb,
            &demo_camera(),
            &white_asset(),
            &BasisSet::new(),
            &rig,
            true,
        );

        // No light reaches any vertex, but the floor still occupies depth
        let center = (WIDTH / 2, HEIGHT / 2);
        assert_eq!(pixel(&fb, center.0, center.1), [0, 0, 0, 255]);
        assert!(fb.zbuffer[center.1 * WIDTH + center.0] < f32::MAX);
    }

    #[test]
    fn test_both_modes_produce_identical_depth() {
        // The Equal passes never write depth, so toggling enhanced lighting
        // must not disturb the depth buffer at all
        let camera = demo_camera();
        let asset = white_asset();
        let basis = BasisSet::new();
        let rig = LightRig::default();

        let mut enhanced = Framebuffer::new(WIDTH, HEIGHT);
        render_scene(&mut enhanced, &camera, &asset, &basis, &rig, true);

        let mut flat = Framebuffer::new(WIDTH, HEIGHT);
        render_scene(&mut flat, &camera, &asset, &basis, &rig, false);

        assert_eq!(enhanced.zbuffer, flat.zbuffer);
    }

    #[test]
    fn test_decal_pass_blends_each_covered_floor_pixel_once() {
        // Opaque red base grid, then one alpha-4 green decal grid over the
        // same geometry. Every covered pixel must show exactly one blend,
        // including pixels where two tiles or a quad's triangles meet.
        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        fb.clear(Color15::BLACK);
        let camera = demo_camera();
        let rig = saturating_rig();

        let red_plane = IndexedTexture::new(8, 8, vec![0; 64]);
        let red_clut = Clut {
            colors: vec![Color15::new(31, 0, 0); 256],
        };
        draw_floor_pass(
            &mut fb,
            &camera,
            TextureBinding {
                texture: &red_plane,
                clut: &red_clut,
                view: PaletteView::Rgb256,
            },
            FLAT_UP,
            &rig,
            DepthTest::Less,
            0,
        );

        let green_plane = IndexedTexture::new(8, 8, vec![4 << 5; 64]);
        let green_clut = Clut {
            colors: vec![Color15::new(0, 31, 0); 256],
        };
        draw_floor_pass(
            &mut fb,
            &camera,
            TextureBinding {
                texture: &green_plane,
                clut: &green_clut,
                view: PaletteView::Rgb32A3,
            },
            FLAT_UP,
            &rig,
            DepthTest::Equal,
            1,
        );

        // One alpha-4 blend of green over red: r = 13, g = 18
        let once = [expand_5bit(13), expand_5bit(18), 0, 255];
        let mut covered = 0;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if fb.zbuffer[y * WIDTH + x] < f32::MAX {
                    covered += 1;
                    assert_eq!(pixel(&fb, x, y), once, "pixel ({x}, {y})");
                }
            }
        }
        // The grid fills a good part of the screen from the demo camera
        assert!(covered > 20_000, "covered = {covered}");
    }

    #[test]
    fn test_marker_cube_renders_at_light_position() {
        // Level camera at the light's height puts the cube dead center
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.2, -2.0);
        camera.rotation_x = 0.0;
        camera.rotation_y = 0.0;
        camera.update_basis();

        let rig = LightRig {
            lights: vec![PointLight {
                pos: FixedVec3::from_raw(0, 819, 0),
                color: FixedVec3::from_raw(8192, 8192, 8192),
            }],
        };

        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        render_scene(
            &mut fb,
            &camera,
            &white_asset(),
            &BasisSet::new(),
            &rig,
            true,
        );

        let center = (WIDTH / 2, HEIGHT / 2);
        assert_eq!(pixel(&fb, center.0, center.1), [255, 255, 255, 255]);

        // Near face of the cube sits at z = -0.03125, camera plane at -2
        let depth = fb.zbuffer[center.1 * WIDTH + center.0];
        assert!((depth - 1.96875).abs() < 1e-4, "depth = {depth}");
    }

    #[test]
    fn test_marker_color_follows_light_color() {
        let red = PointLight {
            pos: FixedVec3::from_raw(0, 819, 0),
            color: FixedVec3::from_raw(8192, 0, 0),
        };
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.2, -2.0);
        camera.rotation_x = 0.0;
        camera.update_basis();

        let mut fb = Framebuffer::new(WIDTH, HEIGHT);
        let rig = LightRig { lights: vec![red] };
        render_scene(
            &mut fb,
            &camera,
            &white_asset(),
            &BasisSet::new(),
            &rig,
            false,
        );

        assert_eq!(pixel(&fb, WIDTH / 2, HEIGHT / 2), [255, 0, 0, 255]);
    }

    #[test]
    fn test_raw_819_is_a_fifth_of_a_unit() {
        assert!((Fixed32(819).to_f32() - 0.2).abs() < 1e-3);
    }
}
