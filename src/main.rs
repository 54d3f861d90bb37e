use std::path::PathBuf;

use clap::Parser;
use montecarlo::prelude::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Die spec, e.g. `d6`, `H,T` or `1,2,3 [3=2.5]`; repeat once per die
    #[arg(short, long = "die", value_name = "SPEC", required = true)]
    dice: Vec<String>,

    /// Number of times every die is rolled
    #[arg(short, long, default_value_t = 1000)]
    rolls: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// Layout of the outcome table: wide or narrow
    #[arg(long, default_value = "wide")]
    form: String,

    /// Count permutations instead of combinations
    #[arg(long, default_value_t = false)]
    permutations: bool,

    /// Print the outcome and statistics tables
    #[arg(long, default_value_t = false)]
    show: bool,

    /// Write a JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    rolls: usize,
    dice: Vec<&'a [FaceWeight<FaceValue>]>,
    jackpots: usize,
    jackpot_rate: f64,
    expected_jackpot_probability: f64,
    outcomes: ResultView<'a, FaceValue>,
    jackpot_table: &'a OutcomeTable<FaceValue>,
    combos: &'a FrequencyTable<FaceValue>,
    face_counts: &'a FaceCountTable<FaceValue>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::info!("Starting game with args: {:?}", args);

    let form: ResultForm = args.form.parse()?;
    let dice = args
        .dice
        .iter()
        .map(|spec| parse_die(spec))
        .collect::<anyhow::Result<Vec<_>>>()?;
    for (i, die) in dice.iter().enumerate() {
        let mut buf = String::new();
        die.pretty_print(&mut buf)?;
        log::info!("Die {}: {}", i + 1, buf);
    }

    let mut roller = match args.seed {
        Some(seed) => Roller::from_seed(seed),
        None => Roller::new(),
    };

    let mut session = RollSession::new(&dice)?;
    let start = chrono::Utc::now();
    session.play(args.rolls, &mut roller)?;
    let elapsed = chrono::Utc::now() - start;
    let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
    log::info!(
        "Rolled {} dice {} times in {:.3} seconds ({:.0} rolls/sec)",
        session.num_dice(),
        args.rolls,
        seconds,
        if seconds > 0.0 {
            (args.rolls * session.num_dice()) as f64 / seconds
        } else {
            f64::INFINITY
        }
    );

    let mut analyzer = OutcomeAnalyzer::new(&session);
    let jackpots = analyzer.jackpot();
    analyzer.combo(args.permutations);
    analyzer.face_counts();

    log::info!(
        "Jackpots: {} ({:.2}% observed, {:.2}% expected)",
        jackpots,
        analyzer.jackpot_rate() * 100.0,
        analyzer.expected_jackpot_probability() * 100.0
    );
    log::info!(
        "{} distinct {}",
        analyzer.combo_table().len(),
        if args.permutations {
            "permutations"
        } else {
            "combinations"
        }
    );

    if args.show {
        let mut buf = String::new();
        session.view(form).pretty_print(&mut buf)?;
        buf.push('\n');
        analyzer.combo_table().pretty_print(&mut buf)?;
        buf.push('\n');
        analyzer.face_count_table().pretty_print(&mut buf)?;
        println!("{buf}");
    }

    if let Some(path) = &args.output {
        let report = Report {
            rolls: args.rolls,
            dice: dice.iter().map(WeightedDie::faces_and_weights).collect(),
            jackpots,
            jackpot_rate: analyzer.jackpot_rate(),
            expected_jackpot_probability: analyzer.expected_jackpot_probability(),
            outcomes: session.view(form),
            jackpot_table: analyzer.jackpot_table(),
            combos: analyzer.combo_table(),
            face_counts: analyzer.face_count_table(),
        };
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &report)?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}
