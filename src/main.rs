use gwsim::curriculum::{CorruptionMode, ShapingMode};
use gwsim::driver::CurriculumDriver;
use gwsim::features::FeatureStore;
use gwsim::monitor::MonitorFeed;
use gwsim::prng::Prng;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h" || args[1] == "help") {
        print_help();
        return;
    }
    if args.len() >= 2 && args[1] == "monitor" {
        run_monitor_demo();
        return;
    }
    if args.len() >= 2 && args[1] == "serve-demo" {
        run_serve_demo();
        return;
    }

    if args.len() >= 2 {
        eprintln!("Unknown command: {}", args[1]);
        print_help();
        std::process::exit(2);
    }

    // Minimal demo:
    // - run the curriculum loop headless from the seeded baseline
    // - inject corruption for a stretch, then recover under potential shaping
    // - print a metrics row every few ticks

    let mut driver = CurriculumDriver::new(7);
    driver.play();

    for t in 0..240 {
        if t == 80 {
            println!("-- injecting corruption (shuffle) --");
            driver.set_corruption_mode(CorruptionMode::Shuffle);
        }
        if t == 160 {
            println!("-- corruption off, potential shaping at gain 0.8 --");
            driver.set_corruption_mode(CorruptionMode::None);
            driver.set_shaping_mode(ShapingMode::Potential);
            driver.set_shaping_gain(0.8);
        }

        if let Some(step) = driver.tick() {
            if t % 20 == 0 {
                println!(
                    "step={:4} prob={:.3} kl={:.4} drop={:.3} gate={:.3} ratio={:.4}",
                    step.step,
                    step.corruption_prob,
                    step.ppo_kl,
                    step.robustness_drop,
                    step.gate_activation,
                    step.ppo_ratio
                );
            }
        }
    }

    println!(
        "history: {} steps retained (cap {})",
        driver.history_len(),
        gwsim::curriculum::HISTORY_CAP
    );
}

fn print_help() {
    println!("gwsim (gated-workspace curriculum simulator)");
    println!("usage:");
    println!("  cargo run");
    println!("  cargo run -- monitor");
    println!("  cargo run -- serve-demo");
    println!("  cargo run -- --help");
}

fn run_monitor_demo() {
    let mut feed = MonitorFeed::new(1);
    for _ in 0..30 {
        let p = feed.sample();
        println!(
            "minute={:3} acc={:.3} loss={:.3} latency={:.1}ms drift={:.3}",
            p.minute, p.accuracy, p.loss, p.latency_ms, p.drift_score
        );
    }
    println!("alerts (newest first):");
    for alert in feed.alerts() {
        println!("  {alert}");
    }
}

fn run_serve_demo() {
    let store = FeatureStore::new();
    let mut rng = Prng::new(7);
    let names = vec![
        "workspace_w_vector".to_string(),
        "gate_threshold_static".to_string(),
    ];
    let response = store.serve_online("agent_01", &names, &mut rng);
    println!("{response}");
}
