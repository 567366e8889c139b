use crate::problems::{FnProblem, Rastrigin, Rosenbrock, Sphere};
use crate::{
    ExitReason, Population, Problem, Sade, SadeConfig, SadeConfigBuilder, SadeError, Translate,
    Variant,
};
use ndarray::{Array1, array};

fn engine(generations: u32, variant: u32, variant_adptv: u32, seed: u64) -> Sade {
    let config = SadeConfigBuilder::new()
        .generations(generations)
        .variant(variant)
        .variant_adptv(variant_adptv)
        .seed(seed)
        .build()
        .expect("valid configuration");
    Sade::new(config).expect("valid configuration")
}

fn sphere_5() -> FnProblem<impl Fn(&Array1<f64>) -> f64 + Send + Sync> {
    FnProblem::new(array![-5.0, -5.0], array![5.0, 5.0], |x: &Array1<f64>| {
        x.iter().map(|&xi| xi * xi).sum::<f64>()
    })
}

#[cfg(test)]
mod evolve_tests {
    use super::*;

    #[test]
    fn test_zero_generations_is_identity() {
        let pop = Population::new(Rosenbrock::new(4), 12, 3).unwrap();
        let before = pop.clone();
        let mut algo = engine(0, 2, 1, 5);
        let after = algo.evolve(pop).unwrap();

        assert_eq!(after.get_x(), before.get_x());
        assert_eq!(after.get_f(), before.get_f());
        assert_eq!(after.problem().fevals(), before.problem().fevals());
        assert!(algo.log().is_empty());
        assert!(algo.f_values().is_empty());
        assert_eq!(algo.last_exit(), Some(ExitReason::NoGenerations));
    }

    #[test]
    fn test_zero_generations_skips_size_check() {
        let pop = Population::new(Sphere::new(2), 3, 1).unwrap();
        let mut algo = engine(0, 2, 1, 5);
        assert_eq!(algo.evolve(pop).unwrap().size(), 3);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let pop = Population::new(Rastrigin::new(3), 15, 11).unwrap();
        for variant in 1..=18 {
            for adptv in 1..=2 {
                let mut a = engine(25, variant, adptv, 77);
                let mut b = engine(25, variant, adptv, 77);
                a.set_verbosity(3);
                b.set_verbosity(3);
                let pa = a.evolve(pop.clone()).unwrap();
                let pb = b.evolve(pop.clone()).unwrap();

                assert_eq!(pa.get_x(), pb.get_x(), "variant {variant}/{adptv}");
                assert_eq!(pa.get_f(), pb.get_f(), "variant {variant}/{adptv}");
                assert_eq!(a.log(), b.log(), "variant {variant}/{adptv}");
                assert_eq!(a.f_values(), b.f_values());
                assert_eq!(a.cr_values(), b.cr_values());
            }
        }
    }

    #[test]
    fn test_fitness_never_worsens_per_slot() {
        for variant in 1..=18 {
            for adptv in 1..=2 {
                let pop = Population::new(Rastrigin::new(4), 10, variant as u64).unwrap();
                let before = pop.get_f().clone();
                let mut algo = engine(15, variant, adptv, 3);
                let after = algo.evolve(pop).unwrap();
                for i in 0..10 {
                    assert!(
                        after.get_f()[[i, 0]] <= before[[i, 0]],
                        "slot {i} worsened with variant {variant}/{adptv}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_size_and_bounds_preserved() {
        let shifted = Translate::new(Sphere::new(3), array![4.0, -4.0, 0.5]).unwrap();
        let (lo, hi) = shifted.bounds();
        let pop = Population::new(shifted, 9, 21).unwrap();
        for variant in 1..=18 {
            for adptv in 1..=2 {
                let mut algo = engine(30, variant, adptv, 8);
                let out = algo.evolve(pop.clone()).unwrap();
                assert_eq!(out.size(), 9);
                for row in out.get_x().rows() {
                    for j in 0..3 {
                        assert!(row[j] >= lo[j] && row[j] <= hi[j]);
                    }
                }
                // every stored fitness matches its decision vector
                for i in 0..9 {
                    let x = out.get_x().row(i).to_owned();
                    let expected: f64 = (&x - &array![4.0, -4.0, 0.5]).mapv(|v| v * v).sum();
                    assert!((out.get_f()[[i, 0]] - expected).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_fevals_count_one_per_individual_and_generation() {
        let pop = Population::new(Sphere::new(2), 8, 4).unwrap();
        let start = pop.problem().fevals();
        let mut algo = engine(12, 7, 1, 1);
        let out = algo.evolve(pop).unwrap();
        assert_eq!(out.problem().fevals() - start, 12 * 8);
        assert_eq!(algo.last_exit(), Some(ExitReason::Generations));
    }

    #[test]
    fn test_champion_never_lost() {
        let pop = Population::new(Rosenbrock::new(2), 20, 6).unwrap();
        let initial_best = pop.champion_f().unwrap()[0];
        let mut algo = engine(50, 13, 2, 2);
        let out = algo.evolve(pop).unwrap();
        let best = out.get_f()[[out.best_idx().unwrap(), 0]];
        assert!(best <= initial_best);
        assert_eq!(out.champion_f().unwrap()[0], best);
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    struct TwoObjectives;
    impl Problem for TwoObjectives {
        fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
            array![x[0], -x[0]]
        }
        fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
            (array![-1.0], array![1.0])
        }
        fn num_objectives(&self) -> usize {
            2
        }
        fn name(&self) -> String {
            "two objectives".into()
        }
    }

    struct Constrained;
    impl Problem for Constrained {
        fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
            array![x[0] * x[0]]
        }
        fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
            (array![-1.0], array![1.0])
        }
        fn num_constraints(&self) -> usize {
            1
        }
    }

    struct Noisy;
    impl Problem for Noisy {
        fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
            array![x[0]]
        }
        fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
            (array![-1.0], array![1.0])
        }
        fn is_stochastic(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_invalid_variant_ids() {
        for variant in [0, 19] {
            let err = SadeConfigBuilder::new()
                .variant(variant)
                .build()
                .unwrap_err();
            assert!(err.is_config_error());
            assert!(matches!(err, SadeError::InvalidVariant { .. }));
        }
        let err = SadeConfigBuilder::new().variant_adptv(3).build().unwrap_err();
        assert!(matches!(err, SadeError::InvalidAdaptationVariant { variant: 3 }));

        let config = SadeConfig {
            variant_adptv: 0,
            ..SadeConfig::default()
        };
        assert!(Sade::new(config).unwrap_err().is_config_error());
    }

    #[test]
    fn test_population_too_small() {
        let pop = Population::new(Sphere::new(2), 6, 0).unwrap();
        let before = pop.get_x().clone();
        let mut algo = engine(10, 2, 1, 0);
        let err = algo.evolve(pop.clone()).unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(
            err,
            SadeError::PopulationTooSmall {
                size: 6,
                min: 7,
                ..
            }
        ));
        assert_eq!(pop.get_x(), &before);
        assert_eq!(algo.last_exit(), None);

        let pop = Population::new(Sphere::new(2), 7, 0).unwrap();
        assert!(algo.evolve(pop).is_ok());
    }

    #[test]
    fn test_unsuitable_problems() {
        let mut algo = engine(10, 2, 1, 0);

        let err = algo
            .evolve(Population::new(TwoObjectives, 10, 0).unwrap())
            .unwrap_err();
        assert!(matches!(err, SadeError::MultiObjectiveProblem { objectives: 2, .. }));
        assert!(err.is_problem_error());

        let err = algo
            .evolve(Population::new(Constrained, 10, 0).unwrap())
            .unwrap_err();
        assert!(matches!(err, SadeError::ConstrainedProblem { constraints: 1, .. }));

        let err = algo
            .evolve(Population::new(Noisy, 10, 0).unwrap())
            .unwrap_err();
        assert!(matches!(err, SadeError::StochasticProblem { .. }));
    }

    #[test]
    fn test_problem_checked_before_generations() {
        let mut algo = engine(0, 2, 1, 0);
        let err = algo
            .evolve(Population::new(Constrained, 3, 0).unwrap())
            .unwrap_err();
        assert!(err.is_problem_error());
    }
}

#[cfg(test)]
mod convergence_tests {
    use super::*;

    #[test]
    fn test_sphere_rand1exp_jde() {
        let pop = Population::new(sphere_5(), 10, 42).unwrap();
        let mut algo = engine(100, 2, 1, 42);
        let out = algo.evolve(pop).unwrap();

        let best = out.best_idx().unwrap();
        let f = out.get_f()[[best, 0]];
        assert!(f < 1e-3, "Should converge near origin: f={}", f);
        for &xi in out.get_x().row(best).iter() {
            assert!(xi.abs() < 1e-1);
        }
    }

    #[test]
    fn test_translated_sphere_ide() {
        let shifted = Translate::new(Sphere::new(2), array![1.0, -2.0]).unwrap();
        let pop = Population::new(shifted, 20, 5).unwrap();
        let mut algo = engine(150, 7, 2, 5);
        let out = algo.evolve(pop).unwrap();

        let x = out.champion_x().unwrap();
        assert!((x[0] - 1.0).abs() < 1e-1, "x = {}", x);
        assert!((x[1] + 2.0).abs() < 1e-1, "x = {}", x);
    }

    #[test]
    fn test_all_variants_make_progress() {
        for v in Variant::all() {
            let pop = Population::new(Sphere::new(2), 20, 9).unwrap();
            let start = pop.champion_f().unwrap()[0];
            let mut algo = engine(60, v.id(), 1, 9);
            let out = algo.evolve(pop).unwrap();
            assert!(
                out.champion_f().unwrap()[0] < start,
                "variant {} made no progress",
                v
            );
        }
    }

    #[test]
    fn test_memory_keeps_adapted_parameters() {
        let config = SadeConfigBuilder::new()
            .generations(5)
            .memory(true)
            .seed(13)
            .build()
            .unwrap();
        let mut with_memory = Sade::new(config.clone()).unwrap();
        let mut without = Sade::new(SadeConfig {
            memory: false,
            ..config
        })
        .unwrap();

        let pop = Population::new(Sphere::new(3), 10, 2).unwrap();
        let a1 = with_memory.evolve(pop.clone()).unwrap();
        let b1 = without.evolve(pop).unwrap();
        assert_eq!(a1.get_x(), b1.get_x());
        assert_eq!(with_memory.f_values(), without.f_values());

        // stored parameters are reused instead of being redrawn
        let a2 = with_memory.evolve(a1).unwrap();
        let b2 = without.evolve(b1).unwrap();
        assert_ne!(a2.get_x(), b2.get_x());

        // a different population size forces a fresh draw
        let pop = Population::new(Sphere::new(3), 12, 2).unwrap();
        with_memory.evolve(pop).unwrap();
        assert_eq!(with_memory.f_values().len(), 12);
    }
}

#[cfg(test)]
mod log_tests {
    use super::*;

    #[test]
    fn test_no_log_without_verbosity() {
        let pop = Population::new(Sphere::new(2), 10, 1).unwrap();
        let mut algo = engine(30, 2, 1, 1);
        algo.evolve(pop).unwrap();
        assert!(algo.log().is_empty());
    }

    #[test]
    fn test_log_cadence() {
        let pop = Population::new(Sphere::new(2), 10, 1).unwrap();

        let mut algo = engine(30, 2, 1, 1);
        algo.set_verbosity(1);
        algo.evolve(pop.clone()).unwrap();
        assert_eq!(algo.log().len(), 30);
        for (k, line) in algo.log().iter().enumerate() {
            assert_eq!(line.generation, k as u32 + 1);
            assert_eq!(line.fevals, 10 * (k as u64 + 1));
            assert!(line.dx >= 0.0 && line.df >= 0.0);
        }
        for w in algo.log().windows(2) {
            assert!(w[1].best <= w[0].best);
        }

        algo.set_verbosity(7);
        algo.evolve(pop).unwrap();
        let gens: Vec<u32> = algo.log().iter().map(|l| l.generation).collect();
        assert_eq!(gens, vec![1, 8, 15, 22, 29]);
    }

    #[test]
    fn test_log_cleared_each_call() {
        let pop = Population::new(Sphere::new(2), 10, 1).unwrap();
        let mut algo = engine(4, 2, 1, 1);
        algo.set_verbosity(1);
        let pop = algo.evolve(pop).unwrap();
        assert_eq!(algo.log().len(), 4);
        algo.evolve(pop).unwrap();
        assert_eq!(algo.log().len(), 4);
        assert_eq!(algo.log()[0].generation, 1);
    }

    #[test]
    fn test_xtol_exit_at_checkpoint() {
        let config = SadeConfigBuilder::new()
            .generations(100)
            .x_tol(1e9)
            .seed(3)
            .verbosity(1)
            .build()
            .unwrap();
        let mut algo = Sade::new(config).unwrap();
        let pop = Population::new(Sphere::new(2), 10, 3).unwrap();
        let start = pop.problem().fevals();
        let out = algo.evolve(pop).unwrap();

        assert_eq!(algo.last_exit(), Some(ExitReason::XTol));
        assert_eq!(out.problem().fevals() - start, 40 * 10);
        // the exit generation itself is not logged
        assert_eq!(algo.log().len(), 39);
        assert!(algo.log().iter().all(|l| l.generation < 40));
    }

    #[test]
    fn test_ftol_checked_after_xtol() {
        let config = SadeConfigBuilder::new()
            .generations(100)
            .x_tol(0.0)
            .f_tol(1e12)
            .seed(3)
            .build()
            .unwrap();
        let mut algo = Sade::new(config).unwrap();
        let pop = Population::new(Sphere::new(2), 10, 3).unwrap();
        algo.evolve(pop).unwrap();
        assert_eq!(algo.last_exit(), Some(ExitReason::FTol));

        let config = SadeConfigBuilder::new()
            .generations(100)
            .x_tol(1e12)
            .f_tol(1e12)
            .seed(3)
            .build()
            .unwrap();
        let mut algo = Sade::new(config).unwrap();
        let pop = Population::new(Sphere::new(2), 10, 3).unwrap();
        algo.evolve(pop).unwrap();
        assert_eq!(algo.last_exit(), Some(ExitReason::XTol));
    }

    #[test]
    fn test_log_serializes() {
        let pop = Population::new(Sphere::new(2), 10, 1).unwrap();
        let mut algo = engine(1, 2, 1, 1);
        algo.set_verbosity(1);
        algo.evolve(pop).unwrap();
        let json = serde_json::to_value(algo.log()).unwrap();
        assert_eq!(json[0]["gen"], 1);
        assert_eq!(json[0]["fevals"], 10);
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;
    use crate::crossover_binomial::binomial_crossover;
    use crate::distinct_indices::distinct_indices;
    use crate::init_random::uniform_real_from_range;
    use crate::self_adaptation::{Adaptation, jde};
    use crate::variant::{Donors, MutationFamily};
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Every evaluation scores worse than all previous ones.
    struct Worsening {
        calls: AtomicU64,
    }

    impl Problem for Worsening {
        fn fitness(&self, _x: &Array1<f64>) -> Array1<f64> {
            array![self.calls.fetch_add(1, Ordering::Relaxed) as f64]
        }
        fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
            (array![-1.0, -1.0], array![1.0, 1.0])
        }
    }

    #[test]
    fn test_equal_fitness_replaces_every_parent() {
        let flat = FnProblem::new(
            array![-1.0, -1.0, -1.0],
            array![1.0, 1.0, 1.0],
            |_x: &Array1<f64>| 0.0,
        );
        let pop = Population::new(flat, 8, 5).unwrap();
        let before = pop.get_x().clone();
        let mut algo = engine(1, 2, 1, 9);
        let after = algo.evolve(pop).unwrap();
        for i in 0..8 {
            assert_ne!(after.get_x().row(i), before.row(i), "row {i} kept its parent");
        }
    }

    #[test]
    fn test_rejected_trials_keep_stored_parameters() {
        for (adptv, scheme) in [(1, Adaptation::Jde), (2, Adaptation::Ide)] {
            let seed = 31;
            let pop = Population::new(
                Worsening {
                    calls: AtomicU64::new(0),
                },
                8,
                2,
            )
            .unwrap();
            let before = pop.get_x().clone();
            let (f0, cr0) = scheme.init(8, &mut ChaCha12Rng::seed_from_u64(seed));

            let mut algo = engine(30, 2, adptv, seed);
            let after = algo.evolve(pop).unwrap();
            assert_eq!(after.get_x(), &before);
            assert_eq!(algo.f_values(), f0.as_slice(), "scheme {scheme}");
            assert_eq!(algo.cr_values(), cr0.as_slice(), "scheme {scheme}");
        }
    }

    /// Replays best/1/bin with jDE on the sphere; `stale` selects whether the
    /// mutation reads the previous generation's champion or the running one.
    fn replay_best1_bin(
        pop: &Population,
        generations: u32,
        seed: u64,
        stale: bool,
    ) -> Array2<f64> {
        let sphere = Sphere::new(pop.problem().dimension());
        let (lb, ub) = pop.problem().bounds();
        let np = pop.size();
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let (mut f_mem, mut cr_mem) = Adaptation::Jde.init(np, &mut rng);

        let mut popold = pop.get_x().clone();
        let mut popnew = popold.clone();
        let mut fit: Vec<f64> = pop.get_f().column(0).to_vec();
        let best_idx = pop.best_idx().unwrap();
        let mut gb_x = popold.row(best_idx).to_owned();
        let mut gb_fit = fit[best_idx];
        let mut gb_iter = gb_x.clone();

        for _ in 0..generations {
            for i in 0..np {
                let r = distinct_indices(MutationFamily::Best1.donors(), np, &mut rng);
                let (f, cr) = jde(f_mem[i], cr_mem[i], &mut rng);
                let donors = Donors {
                    i,
                    r: &r,
                    pop: &popold,
                    best: if stale { &gb_iter } else { &gb_x },
                };
                let mutant = MutationFamily::Best1.mutant(&donors, f);
                let parent = popold.row(i).to_owned();
                let mut trial = binomial_crossover(&parent, &mutant, cr, &mut rng);
                for j in 0..trial.len() {
                    if trial[j] < lb[j] || trial[j] > ub[j] {
                        trial[j] = uniform_real_from_range(lb[j], ub[j], &mut rng);
                    }
                }
                let new_fit = sphere.fitness(&trial)[0];
                if new_fit <= fit[i] {
                    fit[i] = new_fit;
                    f_mem[i] = f;
                    cr_mem[i] = cr;
                    popnew.row_mut(i).assign(&trial);
                    if new_fit <= gb_fit {
                        gb_fit = new_fit;
                        gb_x = trial;
                    }
                } else {
                    popnew.row_mut(i).assign(&popold.row(i));
                }
            }
            gb_iter.assign(&gb_x);
            std::mem::swap(&mut popold, &mut popnew);
        }
        popold
    }

    #[test]
    fn test_best_reference_is_previous_generation_champion() {
        let pop = Population::new(Sphere::new(3), 10, 17).unwrap();
        let stale = replay_best1_bin(&pop, 3, 23, true);
        let running = replay_best1_bin(&pop, 3, 23, false);
        assert_ne!(stale, running);

        let mut algo = engine(3, 6, 1, 23);
        let out = algo.evolve(pop).unwrap();
        assert_eq!(out.get_x(), &stale);
    }
}

#[cfg(test)]
mod checkpoint_tests {
    use super::*;

    #[test]
    fn test_restored_engine_continues_identically() {
        for adptv in 1..=2 {
            let config = SadeConfigBuilder::new()
                .generations(15)
                .variant(12)
                .variant_adptv(adptv)
                .memory(true)
                .verbosity(4)
                .seed(99)
                .build()
                .unwrap();
            let mut algo = Sade::new(config).unwrap();
            let pop = algo
                .evolve(Population::new(Rastrigin::new(3), 12, 4).unwrap())
                .unwrap();

            let json = serde_json::to_string(&algo).unwrap();
            let mut restored: Sade = serde_json::from_str(&json).unwrap();
            assert_eq!(restored.seed(), algo.seed());
            assert_eq!(restored.variant(), algo.variant());
            assert_eq!(restored.f_values(), algo.f_values());
            assert_eq!(restored.log(), algo.log());
            assert_eq!(restored.last_exit(), algo.last_exit());

            let a = algo.evolve(pop.clone()).unwrap();
            let b = restored.evolve(pop).unwrap();
            assert_eq!(a.get_x(), b.get_x());
            assert_eq!(a.get_f(), b.get_f());
            assert_eq!(algo.cr_values(), restored.cr_values());
            assert_eq!(algo.log(), restored.log());
        }
    }

    #[test]
    fn test_restore_rejects_invalid_variant() {
        let algo = engine(5, 2, 1, 1);
        let mut json = serde_json::to_value(&algo).unwrap();
        json["config"]["variant"] = serde_json::json!(19);
        let err = serde_json::from_value::<Sade>(json).unwrap_err();
        assert!(err.to_string().contains("mutation variant must be in [1, 18]"));
    }
}
