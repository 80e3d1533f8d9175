use approx::assert_abs_diff_eq;
use mdpcheck_model::{Model, ModelBuilder, simulate};
use mdpcheck_rl::{QLearningConfig, ValueIterationConfig, q_learning, value_iteration};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A small grid-world corridor: `work` pays 2 per visit but from `tired` only
/// `rest` returns to it; `slack` pays 1 forever.
fn corridor() -> Model {
    let mut b = ModelBuilder::new();
    b.add_state("start", 0.0).unwrap();
    b.add_state("work", 2.0).unwrap();
    b.add_state("tired", 0.0).unwrap();
    b.add_state("slack", 1.0).unwrap();
    b.add_actions(&["hustle", "coast", "rest"]).unwrap();
    b.update_weight("start", "work", Some("hustle"), 1.0).unwrap();
    b.update_weight("start", "slack", Some("coast"), 1.0).unwrap();
    b.update_weight("work", "work", None, 1.0).unwrap();
    b.update_weight("work", "tired", None, 1.0).unwrap();
    b.update_weight("tired", "work", Some("rest"), 1.0).unwrap();
    b.update_weight("tired", "slack", Some("coast"), 1.0).unwrap();
    b.update_weight("slack", "slack", None, 1.0).unwrap();
    b.build(None).unwrap()
}

// ---------------------------------------------------------------------------
// 1. value_iteration_matches_bellman_fixed_point
// ---------------------------------------------------------------------------
#[test]
fn value_iteration_matches_bellman_fixed_point() {
    let m = corridor();
    let gamma = 0.5;
    let cfg = ValueIterationConfig::new()
        .with_gamma(gamma)
        .with_epsilon(1e-12)
        .with_max_iters(500);
    let r = value_iteration(&m, &cfg).unwrap();
    assert!(r.converged());

    // slack = 1 / (1 - g) = 2
    // work = 2 + g (work + tired) / 2, tired = g * max(work, slack)
    // with tired = g * work: work = 2 + g/2 * work (1 + g) -> work = 2 / (1 - 0.375)
    let work = 2.0 / (1.0 - 0.375);
    let v = r.values();
    assert_abs_diff_eq!(v[3], 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(v[1], work, epsilon = 1e-9);
    assert_abs_diff_eq!(v[2], gamma * work, epsilon = 1e-9);
    assert_abs_diff_eq!(v[0], gamma * work, epsilon = 1e-9);

    let labels = r.policy_labels(&m);
    assert_eq!(labels[0], ("start", Some("hustle")));
    assert_eq!(labels[1], ("work", None));
    assert_eq!(labels[2], ("tired", Some("rest")));
    assert_eq!(labels[3], ("slack", None));
}

// ---------------------------------------------------------------------------
// 2. q_learning_agrees_with_value_iteration_policy
// ---------------------------------------------------------------------------
#[test]
fn q_learning_agrees_with_value_iteration_policy() {
    let m = corridor();
    let exact = value_iteration(&m, &ValueIterationConfig::new().with_gamma(0.5)).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let learned = q_learning(
        &m,
        &QLearningConfig::new().with_gamma(0.5).with_max_iters(40_000),
        &mut rng,
    )
    .unwrap();
    assert_eq!(learned.policy(), exact.policy());
}

// ---------------------------------------------------------------------------
// 3. synthesized_policy_drives_simulation
// ---------------------------------------------------------------------------
#[test]
fn synthesized_policy_drives_simulation() {
    let m = corridor();
    let r = value_iteration(&m, &ValueIterationConfig::new().with_gamma(0.5)).unwrap();
    let mut policy = r.to_policy(&m).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let slack = m.state_index("slack").unwrap();
    for _ in 0..50 {
        let path = simulate(&m, 30, &mut policy, None, &mut rng).unwrap();
        assert!(!path.visits(slack), "optimal policy never coasts");
    }
}
