use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use ta_rs::alphabet::Alphabet;
use ta_rs::inclusion::{check_inclusion_with_stats, Direction, InclusionParams, SearchOrder};
use ta_rs::timbuk;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print debug traces of the algorithms.
    #[clap(long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reduce an automaton and print it in Timbuk format.
    Reduce {
        /// Input automaton (Timbuk format).
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the result as a Graphviz graph instead.
        #[clap(long)]
        dot: bool,
    },

    /// Check whether L(SMALLER) is included in L(BIGGER).
    Include {
        #[arg(value_name = "SMALLER")]
        smaller: PathBuf,

        #[arg(value_name = "BIGGER")]
        bigger: PathBuf,

        #[clap(long, value_enum, default_value = "upward")]
        direction: DirectionArg,

        #[clap(long, value_enum, default_value = "depth")]
        order: OrderArg,

        /// Force last-in first-out processing.
        #[clap(long)]
        recursion: bool,

        /// Memoize rule tuples in the downward search.
        #[clap(long)]
        cache: bool,

        /// Prune with simulation instead of set inclusion.
        #[clap(long)]
        simulation: bool,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum DirectionArg {
    Upward,
    Downward,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum OrderArg {
    Depth,
    Breadth,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    match args.command {
        Command::Reduce { input, dot } => {
            let text = std::fs::read_to_string(&input)?;
            let (parsed, alphabet) = timbuk::parse(&text)?;
            info!(
                "Loaded {}: {} states, {} rules",
                input.display(),
                parsed.aut.state_count(),
                parsed.aut.rule_count()
            );

            let (reduced, map) = parsed.aut.reduce_with_map();
            let dict = parsed.dict.translate(&map, reduced.state_count());
            info!("Reduced to {} states, {} rules", reduced.state_count(), reduced.rule_count());

            if dot {
                print!("{}", reduced.to_dot(&dict, &alphabet)?);
            } else {
                print!("{}", timbuk::serialize(&parsed.name, &reduced, &dict, &alphabet));
            }
        }

        Command::Include {
            smaller,
            bigger,
            direction,
            order,
            recursion,
            cache,
            simulation,
        } => {
            let mut alphabet = Alphabet::new();
            let small = timbuk::parse_into(&std::fs::read_to_string(&smaller)?, &mut alphabet)?;
            let big = timbuk::parse_into(&std::fs::read_to_string(&bigger)?, &mut alphabet)?;

            let params = InclusionParams::default()
                .with_direction(match direction {
                    DirectionArg::Upward => Direction::Upward,
                    DirectionArg::Downward => Direction::Downward,
                })
                .with_search_order(match order {
                    OrderArg::Depth => SearchOrder::Depth,
                    OrderArg::Breadth => SearchOrder::Breadth,
                })
                .with_recursion(recursion)
                .with_downward_cache(cache)
                .with_simulation(simulation);
            info!("params = {:?}", params);

            let (result, stats) = check_inclusion_with_stats(&small.aut, &big.aut, &params);
            info!("stats: {}", stats);
            println!("{}", result);

            if !result {
                if let Some(tree) = small.aut.counterexample(&big.aut) {
                    info!("counterexample: {}", tree.display(&alphabet));
                }
            }
        }
    }

    info!("All done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
