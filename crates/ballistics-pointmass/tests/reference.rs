// End-to-end checks against published flat-fire tables.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ballistics_models::DragFunction;
use ballistics_pointmass::{
    compute_trajectory, solve_point_blank_range, solve_zero_angle, zeroed_trajectory, Load, PbrStatus, Wind,
};

fn subsonic_g1() -> Load {
    Load::new(DragFunction::G1, 0.5, 1200.0, 1.6)
}

#[test]
fn zero_angle_for_a_slow_g1_load() {
    let angle = solve_zero_angle(&subsonic_g1(), 100.0, 0.0).unwrap();
    assert_abs_diff_eq!(angle, 0.227_188_110_351_562_47, epsilon = 1e-9);
}

#[test]
fn trajectory_table_for_a_slow_g1_load() {
    let load = subsonic_g1();
    let angle = solve_zero_angle(&load, 100.0, 0.0).unwrap();
    let traj = compute_trajectory(&load, 0.0, angle, Wind::calm()).unwrap();

    assert_eq!(traj.len(), 5090);
    assert_relative_eq!(traj[0].path_inches, -1.6);

    let table = [
        (100, 0.021_086_942_030_323_762),
        (200, -25.871_778_035_601_729),
        (300, -82.458_422_497_938_699),
        (400, -172.749_388_912_615_81),
        (500, -299.585_232_786_666_32),
        (600, -465.995_316_842_285_66),
        (700, -674.456_312_293_158_25),
        (800, -927.580_526_265_247_27),
        (900, -1229.033_419_029_846_5),
        (1000, -1580.015_270_659_476_5),
    ];
    for (yards, path_inches) in table {
        assert_abs_diff_eq!(traj[yards].path_inches, path_inches, epsilon = 1e-6);
    }

    for (i, s) in traj.iter().enumerate() {
        assert_eq!(s.range_yards, i);
    }
}

#[test]
fn zeroed_trajectory_matches_the_two_step_call() {
    let load = subsonic_g1();
    let angle = solve_zero_angle(&load, 100.0, 0.0).unwrap();
    let two_step = compute_trajectory(&load, 0.0, angle, Wind::new(5.0, 45.0)).unwrap();
    let one_step = zeroed_trajectory(&load, 100.0, 0.0, Wind::new(5.0, 45.0)).unwrap();
    assert_eq!(one_step, two_step);
}

#[test]
fn runs_are_deterministic() {
    let load = Load::new(DragFunction::G7, 0.3, 2700.0, 1.8);
    let a = compute_trajectory(&load, 5.0, 0.06, Wind::new(12.0, 120.0)).unwrap();
    let b = compute_trajectory(&load, 5.0, 0.06, Wind::new(12.0, 120.0)).unwrap();
    assert_eq!(a, b);

    let first = solve_zero_angle(&load, 250.0, 0.0).unwrap();
    let second = solve_zero_angle(&load, 250.0, 0.0).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());

    let varmint = Load::new(DragFunction::G1, 0.48, 2800.0, 1.5);
    let first = solve_point_blank_range(&varmint, 4.0).unwrap();
    let second = solve_point_blank_range(&varmint, 4.0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn point_blank_range_for_a_varmint_load() {
    let load = Load::new(DragFunction::G1, 0.48, 2800.0, 1.5);
    let pbr = solve_point_blank_range(&load, 4.0).unwrap();

    assert_eq!(pbr.status, PbrStatus::Valid);
    assert_eq!(pbr.near_zero_yards, 29);
    assert_eq!(pbr.far_zero_yards, 203);
    assert_eq!(pbr.min_pbr_yards, 0);
    assert_eq!(pbr.max_pbr_yards, 238);
    assert_eq!(pbr.sight_in_at_100yards, 189);
}

#[test]
fn other_zero_ranges() {
    let load = Load::new(DragFunction::G1, 0.45, 2900.0, 1.5);

    let at_200 = solve_zero_angle(&load, 200.0, 0.0).unwrap();
    assert_abs_diff_eq!(at_200, 0.0849, epsilon = 1e-3);
    let traj = compute_trajectory(&load, 0.0, at_200, Wind::calm()).unwrap();
    assert_abs_diff_eq!(traj[200].path_inches, 0.02, epsilon = 0.01);

    let high_at_100 = solve_zero_angle(&load, 100.0, 1.5).unwrap();
    assert_abs_diff_eq!(high_at_100, 0.082_35, epsilon = 1e-3);
    let traj = compute_trajectory(&load, 0.0, high_at_100, Wind::calm()).unwrap();
    assert_abs_diff_eq!(traj[100].path_inches, 1.5, epsilon = 0.01);

    let flat_at_100 = solve_zero_angle(&load, 100.0, 0.0).unwrap();
    assert_abs_diff_eq!(flat_at_100, 0.0584, epsilon = 1e-3);
}

#[cfg(feature = "serde")]
#[test]
fn results_round_trip_through_json() {
    let load = Load::new(DragFunction::G1, 0.48, 2800.0, 1.5);
    let pbr = solve_point_blank_range(&load, 4.0).unwrap();
    let json = serde_json::to_string(&pbr).unwrap();
    assert_eq!(serde_json::from_str::<ballistics_pointmass::PbrResult>(&json).unwrap(), pbr);

    let traj = compute_trajectory(&load, 0.0, 0.05, Wind::calm()).unwrap();
    let row = serde_json::to_value(traj[300]).unwrap();
    assert_eq!(row["range_yards"], 300);
    assert!(row["path_inches"].is_f64());
}
