use math_audio_sade::problems::Ackley;
use math_audio_sade::{Population, Sade, SadeConfigBuilder};

fn main() {
    env_logger::init();

    // Ackley function (2D)
    let config = SadeConfigBuilder::new()
        .generations(300)
        .variant(6) // best/1/bin
        .variant_adptv(1)
        .seed(42)
        .verbosity(25)
        .build()
        .expect("valid configuration");
    let mut algo = Sade::new(config).expect("valid configuration");
    println!("{}", algo);

    let pop = Population::new(Ackley::new(2), 20, 42).expect("valid problem");
    let pop = algo.evolve(pop).expect("evolution should succeed");

    for line in algo.log() {
        println!(
            "gen {:>4} | fevals {:>6} | best {:>12.6e} | F {:.3} | CR {:.3}",
            line.generation, line.fevals, line.best, line.f, line.cr
        );
    }
    if let (Some(x), Some(f)) = (pop.champion_x(), pop.champion_f()) {
        println!("Best x: {}  f: {:.6e}", x, f[0]);
    }
    println!("Exit: {:?}", algo.last_exit());
}
