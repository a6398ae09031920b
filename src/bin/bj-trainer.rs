use basic_strategy::scenario::{
    AccuracySummary, MemoryStore, Recorder, ScenarioEntry, ScenarioStore,
};
use basic_strategy::{
    optimal_action, Action, Capabilities, Card, CardSupply, Error, Hand, HandOutcome, PayoutRatio,
    Rank, RoundConfig, RoundState, Shoe, StrategyChart,
};
use clap::{Args, Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "bj-trainer",
    about = "Basic strategy advice, charts and seeded blackjack simulations"
)]
struct Cli {
    #[command(flatten)]
    rules: RuleArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RuleArgs {
    /// JSON file holding a round config; overrides preset and rule flags
    #[arg(long, env = "BJ_CONFIG")]
    config: Option<String>,

    /// Use a preset: vegas_strip, h17, no_surrender, six_to_five
    #[arg(long, env = "BJ_PRESET")]
    preset: Option<String>,

    /// Dealer hits soft 17
    #[arg(
        long,
        env = "BJ_DEALER_HITS_SOFT_17",
        default_value_t = false,
        action = clap::ArgAction::Set
    )]
    dealer_hits_soft_17: bool,

    /// Allow surrender
    #[arg(
        long,
        env = "BJ_SURRENDER_ALLOWED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    surrender_allowed: bool,

    /// Settle naturals on the initial deal
    #[arg(
        long,
        env = "BJ_EVALUATE_NATURALS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    evaluate_naturals: bool,

    /// Stake-inclusive blackjack payout (e.g. "5:2" pays 3:2, "11:5" pays 6:5)
    #[arg(long, env = "BJ_BLACKJACK_PAYOUT", default_value = "5:2")]
    blackjack_payout: PayoutRatio,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the basic strategy chart
    Chart {
        #[arg(long)]
        no_double: bool,

        #[arg(long)]
        no_split: bool,

        #[arg(long)]
        no_surrender: bool,
    },

    /// Advise on a single hand
    Advise {
        /// Player cards, comma separated (e.g. "A,7")
        #[arg(long, value_delimiter = ',', required = true)]
        hand: Vec<Rank>,

        /// Dealer up-card
        #[arg(long)]
        dealer: Rank,

        #[arg(long)]
        no_double: bool,

        #[arg(long)]
        no_split: bool,

        #[arg(long)]
        no_surrender: bool,
    },

    /// Play seeded rounds with basic strategy and report statistics
    Simulate {
        #[arg(long, default_value = "1000")]
        rounds: u32,

        #[arg(long, env = "BJ_SEED", default_value = "42")]
        seed: u64,

        #[arg(long, default_value = "6")]
        num_decks: u8,

        #[arg(long, default_value = "1000")]
        bankroll: f64,

        #[arg(long, default_value = "10")]
        bet: f64,

        /// Chance of taking a random legal action instead of the optimal one
        #[arg(long, default_value = "0")]
        deviation_rate: f64,
    },
}

#[derive(Serialize)]
struct Snapshot {
    rounds_played: u32,
    final_bankroll: f64,
    outcomes: Vec<(HandOutcome, u32)>,
    summary: AccuracySummary,
    scenarios: Vec<ScenarioEntry>,
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli.rules).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    log::info!(
        "rules: dealer {} soft 17, surrender {}, naturals {}, blackjack pays {}:{}",
        if config.dealer_hits_soft_17 { "hits" } else { "stands on" },
        config.surrender_allowed,
        config.evaluate_naturals,
        config.blackjack_payout.numerator,
        config.blackjack_payout.denominator
    );

    match cli.command {
        Commands::Chart {
            no_double,
            no_split,
            no_surrender,
        } => {
            let capabilities = capabilities(&config, no_double, no_split, no_surrender);
            print!("{}", StrategyChart::build(capabilities).render());
        }
        Commands::Advise {
            hand,
            dealer,
            no_double,
            no_split,
            no_surrender,
        } => {
            let hand = Hand::from_ranks(&hand);
            let up_card = Card::from(dealer);
            let capabilities = capabilities(&config, no_double, no_split, no_surrender);
            let action = optimal_action(&hand.cards, Some(&up_card), capabilities);

            println!("Hand:    {hand}");
            println!("Soft:    {}", hand.is_soft());
            println!("Pair:    {}", hand.is_pair());
            println!("Dealer:  {}", up_card.rank);
            println!("Action:  {action}");
        }
        Commands::Simulate {
            rounds,
            seed,
            num_decks,
            bankroll,
            bet,
            deviation_rate,
        } => {
            let snapshot = simulate(&config, rounds, seed, num_decks, bankroll, bet, deviation_rate)
                .unwrap_or_else(|e| {
                    log::error!("simulation failed: {e}");
                    std::process::exit(1);
                });

            println!("Rounds played:  {}", snapshot.rounds_played);
            println!("Final bankroll: {:.2}", snapshot.final_bankroll);
            println!(
                "Accuracy:       {:.2}% over {} decisions",
                snapshot.summary.accuracy * 100.0,
                snapshot.summary.decisions
            );
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("failed to serialize statistics: {e}"),
            }
        }
    }
}

fn simulate(
    config: &RoundConfig,
    rounds: u32,
    seed: u64,
    num_decks: u8,
    mut bankroll: f64,
    bet: f64,
    deviation_rate: f64,
) -> Result<Snapshot, Error> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut shoe = Shoe::new(num_decks, &mut rng);
    let mut recorder = Recorder::new(MemoryStore::new());
    let mut outcomes: Vec<(HandOutcome, u32)> = Vec::new();
    let deviation_rate = if deviation_rate.is_nan() {
        0.0
    } else {
        deviation_rate.clamp(0.0, 1.0)
    };
    let mut played = 0;

    for _ in 0..rounds {
        if bankroll < bet {
            log::info!("bankroll {bankroll:.2} cannot cover a {bet:.2} bet, stopping");
            break;
        }
        if shoe.needs_reshuffle() {
            log::debug!("reshuffling with {} cards left", shoe.len());
            shoe = Shoe::new(num_decks, &mut rng);
        }

        let player = deal(&mut shoe)?;
        let dealer = deal(&mut shoe)?;
        let mut state = RoundState::open(bankroll, bet, player, dealer)?;

        while let Some(point) = state.decision_point(config) {
            let up_card = point.up_card.as_ref();
            let optimal = optimal_action(&point.hand.cards, up_card, point.capabilities);
            let action = if rng.gen_bool(deviation_rate) {
                legal_actions(point.capabilities)
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or(optimal)
            } else {
                optimal
            };

            recorder.record_decision(&point.hand.cards, up_card, point.capabilities, action);
            state = state.apply(action, config, &mut shoe)?;
        }

        let result = state.resolve(config, &mut shoe);
        for outcome in &result.outcomes {
            match outcomes.iter_mut().find(|(o, _)| *o == outcome.outcome) {
                Some((_, count)) => *count += 1,
                None => outcomes.push((outcome.outcome, 1)),
            }
        }
        bankroll = result.bankroll;
        played += 1;
    }

    Ok(Snapshot {
        rounds_played: played,
        final_bankroll: bankroll,
        outcomes,
        summary: recorder.summary(),
        scenarios: recorder.store().entries(),
    })
}

fn deal(shoe: &mut Shoe) -> Result<Hand, Error> {
    let first = shoe.draw().ok_or(Error::SupplyExhausted)?;
    let second = shoe.draw().ok_or(Error::SupplyExhausted)?;
    Ok(Hand::from_cards(vec![first, second]))
}

fn legal_actions(capabilities: Capabilities) -> Vec<Action> {
    let mut actions = vec![Action::Hit, Action::Stand];
    if capabilities.can_double {
        actions.push(Action::Double);
    }
    if capabilities.can_split {
        actions.push(Action::Split);
    }
    if capabilities.can_surrender {
        actions.push(Action::Surrender);
    }
    actions
}

fn capabilities(
    config: &RoundConfig,
    no_double: bool,
    no_split: bool,
    no_surrender: bool,
) -> Capabilities {
    Capabilities {
        can_double: !no_double,
        can_split: !no_split,
        can_surrender: config.surrender_allowed && !no_surrender,
    }
}

fn load_config(args: &RuleArgs) -> Result<RoundConfig, String> {
    if let Some(path) = &args.config {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{path}': {e}"))?;
        return serde_json::from_str(&contents)
            .map_err(|e| format!("Invalid config file '{path}': {e}"));
    }

    if let Some(preset) = &args.preset {
        return RoundConfig::preset(preset).ok_or_else(|| {
            format!(
                "Unknown preset '{preset}'. Available: vegas_strip, h17, no_surrender, six_to_five"
            )
        });
    }

    Ok(RoundConfig {
        dealer_hits_soft_17: args.dealer_hits_soft_17,
        surrender_allowed: args.surrender_allowed,
        evaluate_naturals: args.evaluate_naturals,
        blackjack_payout: args.blackjack_payout,
    })
}
