//! Roulette wheel behavior: weight floor, accumulator reset, and the
//! adaptation curve when one operator consistently outperforms the other.

use vrpldtt_alns::alns::roulette_wheel::RouletteWheel;
use vrpldtt_alns::utils::create_seeded_rng;

#[test]
fn weights_never_fall_below_the_floor() {
    let mut rng = create_seeded_rng(3);
    let mut wheel = RouletteWheel::new(3, 0.1, 0.05);

    for _ in 0..50 {
        wheel.get_random_id(&mut rng);
        wheel.update_stats(-10.0);
    }
    wheel.update_weights();

    assert!(wheel
        .weights()
        .iter()
        .all(|&weight| weight >= 0.05 - f64::EPSILON));
}

#[test]
fn update_resets_the_accumulators() {
    let mut rng = create_seeded_rng(4);
    let mut wheel = RouletteWheel::new(2, 0.1, 0.01);

    wheel.get_random_id(&mut rng);
    wheel.update_stats(5.0);
    wheel.update_weights();

    // with the accumulators cleared, a second update sees no uses at all
    // and every weight falls to the floor
    wheel.update_weights();
    assert!(wheel.weights().iter().all(|&weight| weight == 0.01));
    assert!(wheel.nr_uses().iter().all(|&uses| uses == 0));
}

#[test]
fn consistently_good_operator_dominates_the_wheel() {
    let mut rng = create_seeded_rng(5);
    let wheel_parameter = 0.1;
    let min_weight = 0.01;
    let mut wheel = RouletteWheel::new(2, wheel_parameter, min_weight);

    // operator 0 always scores 1.0, operator 1 always 0.0
    for _ in 0..30 {
        for _ in 0..40 {
            let id = wheel.get_random_id(&mut rng);
            wheel.update_stats(if id == 0 { 1.0 } else { 0.0 });
        }
        wheel.update_weights();
    }

    let weights = wheel.weights();
    // the winner's weight approaches the 1 - (1 - p)^k asymptote of the
    // exponential smoothing towards the score of 1.0
    assert!(weights[0] > 0.6, "winner weight stuck at {}", weights[0]);
    assert!(weights[0] <= 1.0 + f64::EPSILON);
    assert!(weights[0] > 10.0 * min_weight);
    // the loser decays towards the floor
    assert!(weights[1] < 0.1);
}

#[test]
fn draws_follow_the_weights() {
    let mut rng = create_seeded_rng(6);
    let mut wheel = RouletteWheel::new(2, 0.5, 0.001);

    // skew the wheel hard towards operator 1
    for _ in 0..20 {
        let id = wheel.get_random_id(&mut rng);
        wheel.update_stats(if id == 1 { 100.0 } else { 0.0 });
    }
    wheel.update_weights();

    let draws = (0..1000)
        .filter(|_| wheel.get_random_id(&mut rng) == 1)
        .count();
    assert!(draws > 900, "operator 1 drawn only {draws}/1000 times");
}
