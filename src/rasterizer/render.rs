//! Core rendering functions
//!
//! Triangle rasterization with DS-style decal passes. Quads are split into
//! two triangles on a fixed diagonal, clipped against the near plane and
//! filled with incremental edge functions. Decal passes redraw the same
//! geometry under `DepthTest::Equal` and blend with 3-bit fragment alpha;
//! per-draw poly ids cap each pass at one blend per pixel.

use super::camera::Camera;
use super::math::{perspective_transform, project, signed_area, Vec2, Vec3, NEAR_PLANE};
use super::types::{expand_5bit, Color15, DepthTest, PaletteView, TextureBinding, Vertex};

/// Poly id stored for pixels no translucent fragment has touched
const NO_POLY_ID: u8 = 0xFF;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,   // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>, // Depth buffer (camera-space z)
    pub poly_ids: Vec<u8>, // Poly id of the last translucent blend per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            poly_ids: vec![NO_POLY_ID; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color15) {
        let rgba = color.to_rgba();
        for i in 0..(self.width * self.height) {
            self.pixels[i * 4] = rgba[0];
            self.pixels[i * 4 + 1] = rgba[1];
            self.pixels[i * 4 + 2] = rgba[2];
            self.pixels[i * 4 + 3] = rgba[3];
            self.zbuffer[i] = f32::MAX;
            self.poly_ids[i] = NO_POLY_ID;
        }
    }
}

/// A vertex in camera space with its interpolated attributes
#[derive(Debug, Clone, Copy)]
struct CamVertex {
    pos: Vec3,
    uv: Vec2,
    color: [f32; 3], // 5-bit channels widened for interpolation
}

fn lerp_vertex(a: CamVertex, b: CamVertex, t: f32) -> CamVertex {
    CamVertex {
        pos: a.pos + (b.pos - a.pos) * t,
        uv: Vec2::new(
            a.uv.x + (b.uv.x - a.uv.x) * t,
            a.uv.y + (b.uv.y - a.uv.y) * t,
        ),
        color: [
            a.color[0] + (b.color[0] - a.color[0]) * t,
            a.color[1] + (b.color[1] - a.color[1]) * t,
            a.color[2] + (b.color[2] - a.color[2]) * t,
        ],
    }
}

/// Clip a camera-space triangle against the near plane.
/// Returns 0, 1 or 2 triangles (Sutherland-Hodgman against z >= NEAR_PLANE).
fn clip_triangle_to_near_plane(tri: [CamVertex; 3]) -> Vec<[CamVertex; 3]> {
    let mut poly: Vec<CamVertex> = Vec::with_capacity(4);

    for i in 0..3 {
        let cur = tri[i];
        let next = tri[(i + 1) % 3];
        let cur_in = cur.pos.z >= NEAR_PLANE;
        let next_in = next.pos.z >= NEAR_PLANE;

        if cur_in {
            poly.push(cur);
        }
        if cur_in != next_in {
            let t = (NEAR_PLANE - cur.pos.z) / (next.pos.z - cur.pos.z);
            poly.push(lerp_vertex(cur, next, t));
        }
    }

    match poly.len() {
        3 => vec![[poly[0], poly[1], poly[2]]],
        4 => vec![[poly[0], poly[1], poly[2]], [poly[0], poly[2], poly[3]]],
        _ => Vec::new(),
    }
}

/// Modulate a texel channel by a vertex color channel (both 5-bit)
#[inline]
fn modulate5(texel: u8, vertex: u8) -> u8 {
    ((texel as u16 * vertex as u16) / 31) as u8
}

/// Blend src over dst with a 3-bit alpha (0-7), 5-bit channels.
/// Rounds to nearest so an alpha-7 blend reproduces src exactly.
#[inline]
fn blend3(src: u8, dst: u8, alpha: u8) -> u8 {
    ((src as u16 * alpha as u16 + dst as u16 * (7 - alpha) as u16 + 3) / 7) as u8
}

/// Draw a textured quad.
///
/// The quad is split on the v0-v2 diagonal. Splitting, clipping and depth
/// interpolation depend only on positions and the camera, so redrawing the
/// same quad in a later pass reproduces per-pixel depths exactly; that is
/// what makes `DepthTest::Equal` decal passes land on the right pixels.
///
/// `poly_id` gates translucent blending the way DS poly ids do: a
/// translucent fragment is dropped on a pixel whose last blend carried the
/// same id. Pixels on a shared triangle edge rasterize in both triangles,
/// so a decal pass reuses one id for all its quads and consecutive passes
/// use distinct ids.
pub fn draw_quad(
    fb: &mut Framebuffer,
    camera: &Camera,
    quad: &[Vertex; 4],
    texture: Option<TextureBinding>,
    depth_test: DepthTest,
    poly_id: u8,
) {
    let cam: Vec<CamVertex> = quad
        .iter()
        .map(|v| CamVertex {
            pos: perspective_transform(
                v.pos - camera.position,
                camera.basis_x,
                camera.basis_y,
                camera.basis_z,
            ),
            uv: v.uv,
            color: [v.color.r as f32, v.color.g as f32, v.color.b as f32],
        })
        .collect();

    for tri in [[cam[0], cam[1], cam[2]], [cam[0], cam[2], cam[3]]] {
        for clipped in clip_triangle_to_near_plane(tri) {
            rasterize_triangle(fb, &clipped, texture, depth_test, poly_id);
        }
    }
}

fn rasterize_triangle(
    fb: &mut Framebuffer,
    tri: &[CamVertex; 3],
    texture: Option<TextureBinding>,
    depth_test: DepthTest,
    poly_id: u8,
) {
    let v1 = project(tri[0].pos, fb.width, fb.height);
    let v2 = project(tri[1].pos, fb.width, fb.height);
    let v3 = project(tri[2].pos, fb.width, fb.height);

    // Front faces wind to negative area in screen space, so this single
    // test culls backfaces and degenerate slivers together.
    let area = signed_area(v1, v2, v3);
    if area >= -0.00001 {
        return;
    }
    let inv_area = 1.0 / area;

    // Bounding box
    let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y) + 1.0).min(fb.height as f32) as usize;

    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Edge function coefficients
    let a0 = v2.y - v3.y;
    let b0 = v3.x - v2.x;
    let a1 = v3.y - v1.y;
    let b1 = v1.x - v3.x;

    let start_x = min_x as f32;
    let start_y = min_y as f32;
    let mut w0_row = a0 * (start_x - v3.x) + b0 * (start_y - v3.y);
    let mut w1_row = a1 * (start_x - v3.x) + b1 * (start_y - v3.y);

    let inv_z1 = 1.0 / v1.z;
    let inv_z2 = 1.0 / v2.z;
    let inv_z3 = 1.0 / v3.z;

    for y in min_y..max_y {
        let mut w0 = w0_row;
        let mut w1 = w1_row;

        for x in min_x..max_x {
            // Convert to barycentric coordinates
            let bc_x = w0 * inv_area;
            let bc_y = w1 * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;

            const ERR: f32 = -0.0001;
            if bc_x >= ERR && bc_y >= ERR && bc_z >= ERR {
                // 1/z interpolates linearly in screen space, z itself does not
                let inv_z_interp = bc_x * inv_z1 + bc_y * inv_z2 + bc_z * inv_z3;
                let z = 1.0 / inv_z_interp;

                let idx = y * fb.width + x;
                let depth_ok = match depth_test {
                    DepthTest::Less => z < fb.zbuffer[idx],
                    DepthTest::Equal => z == fb.zbuffer[idx],
                };
                if !depth_ok {
                    w0 += a0;
                    w1 += a1;
                    continue;
                }

                // Perspective-correct UV interpolation
                let u_over_z = bc_x * tri[0].uv.x * inv_z1
                    + bc_y * tri[1].uv.x * inv_z2
                    + bc_z * tri[2].uv.x * inv_z3;
                let v_over_z = bc_x * tri[0].uv.y * inv_z1
                    + bc_y * tri[1].uv.y * inv_z2
                    + bc_z * tri[2].uv.y * inv_z3;
                let u = u_over_z / inv_z_interp;
                let v = v_over_z / inv_z_interp;

                // Sample the bound plane and split out fragment alpha
                let (texel, alpha) = match texture {
                    Some(binding) => {
                        let byte = binding.texture.sample_texel(u, v);
                        match binding.view {
                            PaletteView::Rgb256 => (binding.clut.lookup(byte), 7),
                            PaletteView::Rgb32A3 => {
                                (binding.clut.lookup(byte & 0x1F), byte >> 5)
                            }
                        }
                    }
                    None => (Color15::WHITE, 7),
                };

                // Fully transparent fragments leave color and depth alone
                if alpha == 0 {
                    w0 += a0;
                    w1 += a1;
                    continue;
                }

                // Interpolate vertex color (screen-linear is fine for
                // Gouraud) and round to 5 bits
                let vr = (bc_x * tri[0].color[0]
                    + bc_y * tri[1].color[0]
                    + bc_z * tri[2].color[0]
                    + 0.5) as u8;
                let vg = (bc_x * tri[0].color[1]
                    + bc_y * tri[1].color[1]
                    + bc_z * tri[2].color[1]
                    + 0.5) as u8;
                let vb = (bc_x * tri[0].color[2]
                    + bc_y * tri[1].color[2]
                    + bc_z * tri[2].color[2]
                    + 0.5) as u8;

                let r5 = modulate5(texel.r5(), vr);
                let g5 = modulate5(texel.g5(), vg);
                let b5 = modulate5(texel.b5(), vb);

                let p = idx * 4;
                if alpha == 7 {
                    fb.pixels[p] = expand_5bit(r5);
                    fb.pixels[p + 1] = expand_5bit(g5);
                    fb.pixels[p + 2] = expand_5bit(b5);
                    fb.pixels[p + 3] = 255;
                    // An opaque write leaves no translucent id behind
                    fb.poly_ids[idx] = NO_POLY_ID;
                    // Only opaque fragments under the ordinary test claim depth
                    if depth_test == DepthTest::Less {
                        fb.zbuffer[idx] = z;
                    }
                } else {
                    // Shared edges rasterize in both triangles; the stored
                    // poly id keeps the second fragment of a pass from
                    // blending the same pixel again
                    if fb.poly_ids[idx] == poly_id {
                        w0 += a0;
                        w1 += a1;
                        continue;
                    }
                    fb.poly_ids[idx] = poly_id;

                    // Translucent fragment: blend against the stored pixel.
                    // expand_5bit is invertible by >> 3, so the read-back is
                    // exact.
                    let dst_r = fb.pixels[p] >> 3;
                    let dst_g = fb.pixels[p + 1] >> 3;
                    let dst_b = fb.pixels[p + 2] >> 3;
                    fb.pixels[p] = expand_5bit(blend3(r5, dst_r, alpha));
                    fb.pixels[p + 1] = expand_5bit(blend3(g5, dst_g, alpha));
                    fb.pixels[p + 2] = expand_5bit(blend3(b5, dst_b, alpha));
                    fb.pixels[p + 3] = 255;
                }
            }

            w0 += a0;
            w1 += a1;
        }

        w0_row += b0;
        w1_row += b1;
    }
}
