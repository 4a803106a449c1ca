use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2};

use crate::error::EvolutionError;
use crate::grid::{Mesh, TimeSchedule};
use crate::scenario::functions::{cut_off_c, kappa, ships_speed, std_mollifier};
use crate::scenario::{InitialShips, ScenarioConfig};

#[test]
fn uniform_mesh_follows_meshgrid_layout() {
    let mesh = Mesh::uniform(0.0, 10.0, 11, 0.0, 20.0, 5).expect("mesh");
    assert_eq!(mesh.dim(), (5, 11));
    assert_abs_diff_eq!(mesh.dx, 1.0, epsilon = 1e-15);
    assert_abs_diff_eq!(mesh.dy, 5.0, epsilon = 1e-15);
    assert_abs_diff_eq!(mesh.xx[(2, 3)], 3.0, epsilon = 1e-15);
    assert_abs_diff_eq!(mesh.yy[(2, 3)], 10.0, epsilon = 1e-15);
    assert_abs_diff_eq!(mesh.cell_area(), 5.0, epsilon = 1e-15);
}

#[test]
fn mesh_rejects_degenerate_and_mismatched_input() {
    assert!(matches!(
        Mesh::uniform(0.0, 1.0, 1, 0.0, 1.0, 4),
        Err(EvolutionError::DegenerateMesh { rows: 4, cols: 1 })
    ));
    assert!(matches!(
        Mesh::uniform(1.0, 0.0, 4, 0.0, 1.0, 4),
        Err(EvolutionError::InvalidConfig(_))
    ));
    assert!(matches!(
        Mesh::from_arrays(Array2::zeros((3, 4)), Array2::zeros((4, 3)), 1.0, 1.0),
        Err(EvolutionError::ShapeMismatch { what: "y-mesh", .. })
    ));
}

#[test]
fn schedule_prints_periodically_and_at_the_end() {
    let schedule = TimeSchedule::new(1.0, 0.1, 3).expect("schedule");
    assert_eq!(schedule.num_steps(), 10);
    let printed: Vec<usize> = (0..schedule.times.len()).filter(|&k| schedule.printing[k]).collect();
    assert_eq!(printed, vec![3, 6, 9, 10]);
    assert_abs_diff_eq!(schedule.times[10], 1.0, epsilon = 1e-12);
}

#[test]
fn kappa_is_a_ramp_between_eps_and_one() {
    let k = kappa(0.2, 1.0);
    assert_eq!(k(0.1), 0.0);
    assert_eq!(k(0.2), 0.0);
    assert_abs_diff_eq!(k(0.6), 0.5, epsilon = 1e-15);
    assert_eq!(k(1.0), 0.0);
    assert_eq!(k(3.0), 0.0);
}

#[test]
fn ship_speed_decreases_with_density() {
    let speed = ships_speed(2.0, 1.0);
    assert_eq!(speed(0.0), 1.0);
    assert_eq!(speed(1.0), 0.5);
    assert_eq!(speed(2.0), 0.0);
}

#[test]
fn cut_off_is_raw_when_support_is_under_resolved() {
    // Radius 0.4 on a 0.05 grid: Σ C · dx · dy ≈ π r⁴ / 2 < 0.3, values stay raw.
    let mesh = Mesh::uniform(-1.0, 1.0, 41, -1.0, 1.0, 41).expect("mesh");
    let c = cut_off_c(0.4)(&mesh.xx, &mesh.yy);
    assert_abs_diff_eq!(c[(20, 20)], 0.16, epsilon = 1e-12);
    assert_eq!(c[(0, 0)], 0.0);
}

#[test]
fn cut_off_is_normalized_when_mass_is_large() {
    let mesh = Mesh::uniform(-3.0, 3.0, 61, -3.0, 3.0, 61).expect("mesh");
    let c = cut_off_c(2.0)(&mesh.xx, &mesh.yy);
    assert_abs_diff_eq!(c.sum() * mesh.cell_area(), 1.0, epsilon = 1e-12);
}

#[test]
fn mollifier_has_unit_integral() {
    let x = Array1::linspace(-1.0, 1.0, 41);
    let y = Array1::linspace(-1.0, 1.0, 41);
    let k = std_mollifier(&x, &y, 0.5);
    // The bump vanishes on the boundary, so trapezoid and plain sums agree.
    assert_abs_diff_eq!(k.sum() * 0.05 * 0.05, 1.0, epsilon = 1e-9);
    assert!(k.iter().all(|&v| v >= 0.0));
    assert_eq!(k[(20, 20)], k.iter().cloned().fold(0.0, f64::max));
}

#[test]
fn default_config_validates_and_builds() {
    let config = ScenarioConfig::default();
    config.validate().expect("default config");

    let scenario = config.build().expect("scenario");
    assert_eq!(scenario.initial.dim(), (100, 200));
    assert_eq!(scenario.initial.num_police(), 3);
    assert_eq!(scenario.params.kernel.dim(), (100, 200));
    assert!(scenario.schedule.num_steps() > 0);
    assert!(scenario.initial.ships.iter().all(|&v| v == 0.0 || v == 1.0));
    assert!(scenario.initial.ships.sum() > 0.0);
}

#[test]
fn partial_json_config_keeps_defaults() {
    let config: ScenarioConfig = serde_json::from_str(
        r#"{ "n_x": 20, "n_y": 10, "dt": 0.01, "initial_ships": { "kind": "uniform", "value": 0.5 } }"#,
    )
    .expect("json");
    assert_eq!(config.n_x, 20);
    assert_eq!(config.dt, Some(0.01));
    assert_eq!(config.initial_ships, InitialShips::Uniform { value: 0.5 });
    assert_eq!(config.a, ScenarioConfig::default().a);
    config.validate().expect("valid");
}

#[test]
fn invalid_configs_are_rejected() {
    let mismatched = ScenarioConfig {
        a: vec![1.0],
        ..ScenarioConfig::default()
    };
    assert!(matches!(
        mismatched.validate(),
        Err(EvolutionError::LengthMismatch { expected: 3, found: 1, .. })
    ));

    let unstable = ScenarioConfig {
        dt: Some(1.0),
        ..ScenarioConfig::default()
    };
    match unstable.validate() {
        Err(EvolutionError::InvalidConfig(msg)) => assert!(msg.contains("unstable")),
        other => panic!("expected unstable dt to be rejected, got {other:?}"),
    }

    let degenerate = ScenarioConfig {
        n_x: 1,
        ..ScenarioConfig::default()
    };
    assert!(matches!(degenerate.validate(), Err(EvolutionError::DegenerateMesh { .. })));
}

#[test]
fn derived_time_step_respects_cfl() {
    let config = ScenarioConfig::default();
    let dx = 10.0 / 199.0;
    // speed = ships_v_max · |drift| + kappa_v_max = 2.
    assert_abs_diff_eq!(config.time_step(), 0.4 * dx / 2.0, epsilon = 1e-15);
}
