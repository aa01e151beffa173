//! Camera transform composition and projection on the coprocessor model.

use glam::{I16Vec3, IVec3};

use fpcam_core::config::{ORDERING_TABLE_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use fpcam_core::gte::transform::{apply_camera, multiply_current_matrix_by_vectors, rotate_current_matrix};
use fpcam_core::gte::{pack_xy, Gte, Matrix3};
use fpcam_core::scene::Camera;

fn gte() -> Gte {
    let mut gte = Gte::new();
    gte.setup(SCREEN_WIDTH, SCREEN_HEIGHT, ORDERING_TABLE_SIZE);
    gte
}

mod composition {
    use super::*;

    #[test]
    fn single_pitch_equals_elementary_matrix() {
        for angle in [1, 300, 1024, 2900, -700] {
            let mut gte = gte();
            rotate_current_matrix(&mut gte, 0, 0, angle);
            assert_eq!(*gte.rotation(), Matrix3::pitch(angle), "pitch {angle}");
        }
    }

    #[test]
    fn single_yaw_equals_elementary_matrix() {
        for angle in [5, 512, 1500, 4000, -1024] {
            let mut gte = gte();
            rotate_current_matrix(&mut gte, 0, angle, 0);
            assert_eq!(*gte.rotation(), Matrix3::yaw(angle), "yaw {angle}");
        }
    }

    #[test]
    fn single_roll_equals_elementary_matrix() {
        for angle in [7, 777, 2048, -3000] {
            let mut gte = gte();
            rotate_current_matrix(&mut gte, angle, 0, 0);
            assert_eq!(*gte.rotation(), Matrix3::roll(angle), "roll {angle}");
        }
    }

    #[test]
    fn zero_angles_leave_rotation_untouched() {
        let mut gte = gte();
        let m = Matrix3::yaw(345);
        gte.load_rotation(&m);
        rotate_current_matrix(&mut gte, 0, 0, 0);
        assert_eq!(*gte.rotation(), m);
    }

    #[test]
    fn multiplying_by_identity_matches_skipping() {
        let mut gte = gte();
        let m = Matrix3::pitch(123);
        gte.load_rotation(&m);
        gte.load_column_vectors(&Matrix3::IDENTITY);
        assert_eq!(multiply_current_matrix_by_vectors(&mut gte), m);
    }

    #[test]
    fn quarter_yaw_faces_negative_x() {
        let mut gte = gte();
        let camera = Camera {
            yaw: 1024,
            ..Camera::at(IVec3::ZERO)
        };
        apply_camera(&mut gte, &camera);

        let v = I16Vec3::new(-1000, 0, 0);
        gte.load_vertices(v, v, v);
        gte.rtpt();
        assert_eq!(gte.raw_depths(), [1000; 3]);
        assert_eq!(gte.sxy(2), pack_xy(160, 128));
    }
}

mod translation {
    use super::*;

    #[test]
    fn point_ahead_of_camera_projects_to_centre() {
        let mut gte = gte();
        apply_camera(&mut gte, &Camera::default());
        assert_eq!(gte.translation(), IVec3::new(0, 1000, 0));

        let v = I16Vec3::new(0, -1000, 500);
        gte.load_vertices(v, v, v);
        gte.rtpt();
        assert_eq!(gte.sxy(0), pack_xy(160, 128));
        assert_eq!(gte.sz()[3], 500);
    }

    #[test]
    fn offset_point_projects_by_focal_length() {
        let mut gte = gte();
        apply_camera(&mut gte, &Camera::at(IVec3::ZERO));

        // 100 units right at depth 320 with H = 320 lands 100 pixels right.
        let v = I16Vec3::new(100, -50, 320);
        gte.load_vertices(v, v, v);
        gte.rtpt();
        assert_eq!(gte.sxy(2), pack_xy(260, 78));
    }

    #[test]
    fn camera_position_wraps_in_ir() {
        let mut gte = gte();
        apply_camera(&mut gte, &Camera::at(IVec3::new(40_000, 0, -40_000)));
        // -40000 and 40000 keep their low 16 bits.
        assert_eq!(gte.translation(), IVec3::new(25_536, 0, -25_536));
    }

    #[test]
    fn camera_position_in_range_is_exact() {
        let mut gte = gte();
        apply_camera(&mut gte, &Camera::at(IVec3::new(1200, -1000, -32_000)));
        assert_eq!(gte.translation(), IVec3::new(-1200, 1000, 32_000));
    }
}

mod projection {
    use super::*;

    #[test]
    fn setup_scales_average_depth_onto_table() {
        let gte = gte();
        assert_eq!(gte.z_scale_factor(), 90);
    }

    #[test]
    fn vertex_behind_camera_has_negative_raw_depth_and_zero_sz() {
        let mut gte = gte();
        apply_camera(&mut gte, &Camera::at(IVec3::ZERO));
        gte.load_vertices(
            I16Vec3::new(0, 0, -20),
            I16Vec3::new(0, 0, 10),
            I16Vec3::new(0, 0, 10),
        );
        gte.rtpt();
        assert_eq!(gte.raw_depths(), [-20, 10, 10]);
        assert_eq!(&gte.sz()[1..], &[0, 10, 10]);
        assert_eq!(gte.avsz3(), 0);
    }

    #[test]
    fn screen_coordinates_clamp() {
        let mut gte = gte();
        apply_camera(&mut gte, &Camera::at(IVec3::ZERO));
        let v = I16Vec3::new(30_000, -30_000, 1);
        gte.load_vertices(v, v, v);
        gte.rtpt();
        assert_eq!(gte.sxy(2), pack_xy(0x3FF, -0x400));
    }
}
