//! Face culling, depth bucketing and packet emission of the render pass.

use glam::{I16Vec3, IVec3};

use fpcam_core::config::{CHAIN_BASE_ADDR, ORDERING_TABLE_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use fpcam_core::gpu::chain::DmaChain;
use fpcam_core::gpu::commands::{self, BlendMode, ColorDepth, FACE_COLORS};
use fpcam_core::gpu::texture::TextureInfo;
use fpcam_core::gte::transform::apply_camera;
use fpcam_core::gte::Gte;
use fpcam_core::render::pass::{classify, render_mesh, PassStats, Shading, Visibility};
use fpcam_core::render::{Face, Mesh, Uv};
use fpcam_core::scene::Camera;

type TestChain = DmaChain<256>;

const NO_UVS: [Uv; 3] = [Uv::new(0, 0); 3];

/// Coprocessor looking down +Z from the origin.
fn gte() -> Gte {
    let mut gte = Gte::new();
    gte.setup(SCREEN_WIDTH, SCREEN_HEIGHT, ORDERING_TABLE_SIZE);
    apply_camera(&mut gte, &Camera::at(IVec3::ZERO));
    gte
}

/// Square of half-size `r` facing the camera at depth `z`: top-left,
/// top-right, bottom-left, bottom-right.
fn quad(r: i16, z: i16) -> [I16Vec3; 4] {
    [
        I16Vec3::new(-r, -r, z),
        I16Vec3::new(r, -r, z),
        I16Vec3::new(-r, r, z),
        I16Vec3::new(r, r, z),
    ]
}

fn render(vertices: &[I16Vec3], faces: &[Face], shading: Shading<'_>) -> (TestChain, PassStats) {
    let mut gte = gte();
    let mut chain = TestChain::new(CHAIN_BASE_ADDR);
    let stats = render_mesh(&mut gte, &mut chain, &Mesh::new(vertices, faces), shading);
    (chain, stats)
}

mod culling {
    use super::*;

    #[test]
    fn front_winding_is_kept() {
        let vertices = quad(100, 1000);
        let (chain, stats) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);
        assert_eq!(stats.drawn, 1);
        assert_eq!(chain.walk().count(), 1);
    }

    #[test]
    fn reversed_winding_is_discarded() {
        let vertices = quad(100, 1000);
        let (chain, stats) = render(&vertices, &[Face::new([0, 2, 1], NO_UVS)], Shading::Flat);
        assert_eq!(
            stats,
            PassStats {
                back_facing: 1,
                ..PassStats::default()
            }
        );
        assert_eq!(chain.walk().count(), 0);
    }

    #[test]
    fn degenerate_face_is_discarded() {
        let vertices = quad(100, 1000);
        let (_, stats) = render(&vertices, &[Face::new([0, 0, 1], NO_UVS)], Shading::Flat);
        assert_eq!(stats.back_facing, 1);
    }

    #[test]
    #[should_panic(expected = "face 0 references a vertex outside the mesh")]
    fn face_with_bad_index_is_fatal() {
        let vertices = quad(100, 1000);
        let faces = [Face::new([0, 1, 9], NO_UVS), Face::new([1, 3, 2], NO_UVS)];
        render(&vertices, &faces, Shading::Flat);
    }
}

mod depth {
    use super::*;

    #[test]
    fn classify_far_boundary() {
        assert_eq!(classify(1, 720, [1, 1, 1], 720), Visibility::BeyondFar);
        assert_eq!(classify(1, 719, [1, 1, 1], 720), Visibility::Visible(719));
    }

    #[test]
    fn classify_zero_depth_with_balanced_raw_depths_is_discarded() {
        assert_eq!(classify(1, 0, [-20, 10, 10], 720), Visibility::BehindCamera);
    }

    #[test]
    fn classify_zero_depth_with_no_vertex_in_front_is_discarded() {
        assert_eq!(classify(1, 0, [-1000, -1000, -1000], 720), Visibility::BehindCamera);
        assert_eq!(classify(1, 0, [-5, 0, 0], 720), Visibility::BehindCamera);
    }

    #[test]
    fn classify_straddling_face_is_kept_in_nearest_bucket() {
        assert_eq!(classify(1, 0, [-20, 10, 11], 720), Visibility::Visible(0));
        assert_eq!(classify(1, 0, [0, 1, 1], 720), Visibility::Visible(0));
    }

    #[test]
    fn classify_checks_area_first() {
        assert_eq!(classify(0, 10, [5, 5, 5], 720), Visibility::BackFacing);
        assert_eq!(classify(-3, 900, [5, 5, 5], 720), Visibility::BackFacing);
    }

    #[test]
    fn average_depth_of_table_size_is_beyond_far() {
        // 90 * 3 * 10923 >> 12 == 720
        let vertices = quad(3000, 10923);
        let (chain, stats) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);
        assert_eq!(stats.beyond_far, 1);
        assert_eq!(chain.walk().count(), 0);
    }

    #[test]
    fn average_depth_just_inside_lands_in_last_bucket() {
        let vertices = quad(3000, 10922);
        let (chain, _) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);
        assert_eq!(chain.bucket(719).count(), 1);
    }

    #[test]
    fn face_at_depth_164_lands_in_bucket_10() {
        // 90 * 3 * 164 >> 12 == 10
        let vertices = quad(50, 164);
        let (chain, _) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);
        assert_eq!(chain.bucket(10).count(), 1);
        let others = (0..ORDERING_TABLE_SIZE)
            .filter(|&b| b != 10)
            .all(|b| chain.is_bucket_empty(b));
        assert!(others);
    }

    #[test]
    fn face_behind_camera_is_culled() {
        // Projects with positive area, but every vertex has negative depth.
        let vertices = quad(100, -1000);
        let (chain, stats) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);
        assert_eq!(
            stats,
            PassStats {
                behind_camera: 1,
                ..PassStats::default()
            }
        );
        assert_eq!(chain.walk().count(), 0);
    }

    #[test]
    fn face_crossing_camera_plane_lands_in_bucket_0() {
        // Depths -50, 10, 10: average rounds to bucket 0, one corner behind.
        let vertices = [
            I16Vec3::new(-100, -100, -50),
            I16Vec3::new(100, -100, 10),
            I16Vec3::new(-100, 100, 10),
        ];
        let (chain, stats) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);
        assert_eq!(stats.drawn, 1);
        assert_eq!(chain.bucket(0).count(), 1);
        assert!((1..ORDERING_TABLE_SIZE).all(|b| chain.is_bucket_empty(b)));
    }

    #[test]
    fn face_crossing_camera_plane_with_balanced_depths_is_culled() {
        let vertices = [
            I16Vec3::new(-100, -100, -20),
            I16Vec3::new(100, -100, 10),
            I16Vec3::new(-100, 100, 10),
        ];
        let (chain, stats) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);
        assert_eq!(stats.behind_camera, 1);
        assert_eq!(chain.walk().count(), 0);
    }

    #[test]
    fn same_bucket_faces_draw_later_first() {
        let vertices = quad(100, 1000);
        let faces = [Face::new([0, 1, 2], NO_UVS), Face::new([1, 3, 2], NO_UVS)];
        let (chain, _) = render(&vertices, &faces, Shading::Flat);

        let colors: Vec<u32> = chain.walk().map(|(_, p)| p.words[0] & 0xFF_FFFF).collect();
        assert_eq!(colors, vec![FACE_COLORS[1], FACE_COLORS[0]]);
    }
}

mod packets {
    use super::*;

    #[test]
    fn flat_triangle_layout() {
        let vertices = quad(100, 320);
        let (chain, _) = render(&vertices, &[Face::new([0, 1, 2], NO_UVS)], Shading::Flat);

        let (_, packet) = chain.walk().next().unwrap();
        assert_eq!(packet.tag.len, 4);
        assert_eq!(packet.words[0], 0x2000_0000 | FACE_COLORS[0]);
        // 100 units at depth 320 with H = 320 is 100 pixels from the centre.
        assert_eq!(packet.words[1], commands::xy(60, 28));
        assert_eq!(packet.words[2], commands::xy(260, 28));
        assert_eq!(packet.words[3], commands::xy(60, 228));
    }

    #[test]
    fn flat_colours_cycle_by_face_index() {
        let vertices = quad(100, 1000);
        let faces: Vec<Face> = (0..7).map(|_| Face::new([0, 1, 2], NO_UVS)).collect();
        let (chain, _) = render(&vertices, &faces, Shading::Flat);

        let mut colors: Vec<u32> = chain.walk().map(|(_, p)| p.words[0] & 0xFF_FFFF).collect();
        colors.reverse();
        let expected: Vec<u32> = (0..7).map(|i| FACE_COLORS[i % 6]).collect();
        assert_eq!(colors, expected);
    }

    #[test]
    fn textured_triangle_carries_clut_and_page() {
        let texture = TextureInfo {
            u: 64,
            v: 0,
            w: 64,
            h: 64,
            page: commands::page(5, 0, BlendMode::SemiTransparent, ColorDepth::Bpp4),
            clut: commands::clut(20, 64),
        };
        let uvs = [Uv::new(0, 0), Uv::new(63, 0), Uv::new(0, 63)];
        let vertices = quad(100, 320);
        let (chain, _) = render(
            &vertices,
            &[Face::new([0, 1, 2], uvs)],
            Shading::Textured(&texture),
        );

        let (_, packet) = chain.walk().next().unwrap();
        assert_eq!(packet.tag.len, 7);
        assert_eq!(packet.words[0], 0x2480_8080);
        assert_eq!(packet.words[1], commands::xy(60, 28));
        assert_eq!(packet.words[2], commands::uv(64, 0, texture.clut));
        assert_eq!(packet.words[3], commands::xy(260, 28));
        assert_eq!(packet.words[4], commands::uv(127, 0, texture.page));
        assert_eq!(packet.words[5], commands::xy(60, 228));
        assert_eq!(packet.words[6], commands::uv(64, 63, 0));
    }
}
