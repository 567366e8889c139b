use math_audio_sade::problems::Rastrigin;
use math_audio_sade::{Init, ParallelConfig, Population, Sade, SadeConfigBuilder, Translate};
use ndarray::Array1;

fn main() {
    env_logger::init();

    // Shifted Rastrigin, evolved in chunks of 100 generations with iDE
    let shift = Array1::from_elem(5, 1.5);
    let problem = Translate::new(Rastrigin::new(5), shift).expect("matching dimension");

    let config = SadeConfigBuilder::new()
        .generations(100)
        .variant(12) // rand/3/bin
        .variant_adptv(2)
        .memory(true)
        .seed(7)
        .build()
        .expect("valid configuration");
    let mut algo = Sade::new(config).expect("valid configuration");

    let mut pop = Population::with_init(
        problem,
        40,
        7,
        Init::LatinHypercube,
        &ParallelConfig::default(),
    )
    .expect("valid problem");

    for call in 1..=10 {
        pop = algo.evolve(pop).expect("evolution should succeed");
        let mean_f = algo.f_values().iter().sum::<f64>() / algo.f_values().len() as f64;
        let mean_cr = algo.cr_values().iter().sum::<f64>() / algo.cr_values().len() as f64;
        println!(
            "call {:>2} | fevals {:>6} | best {:>12.6e} | mean F {:.3} | mean CR {:.3}",
            call,
            pop.problem().fevals(),
            pop.champion_f().map_or(f64::NAN, |f| f[0]),
            mean_f,
            mean_cr
        );
    }
}
