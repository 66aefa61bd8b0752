//! Batch round simulator: drives a session through many rounds with a
//! fixed wager and a cash-out-at-target strategy, then reports aggregate
//! results. Time is simulated (the clock advances a fixed step per poll),
//! so runs complete instantly and are reproducible under `--seed`.

use anyhow::{bail, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use aviator_engine::{GameError, GameSession, TickResult};
use aviator_types::format_cents;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of rounds to play.
    #[arg(long, default_value_t = 20)]
    rounds: u32,

    /// Wager per round, in cents.
    #[arg(long, default_value_t = 1_000)]
    wager: u64,

    /// Cash out when the multiplier reaches this value (0 rides every
    /// round to the crash).
    #[arg(long, default_value_t = 2.0)]
    target: f64,

    /// Starting balance, in cents.
    #[arg(long, default_value_t = 10_000)]
    balance: u64,

    /// Additional wallet deposit before play, in cents.
    #[arg(long)]
    deposit: Option<u64>,

    /// Simulated milliseconds per poll.
    #[arg(long, default_value_t = 50)]
    cadence_ms: u64,

    /// Multiplier growth rate per second.
    #[arg(long)]
    growth_rate: Option<f64>,

    /// Seed for deterministic crash points.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Default)]
struct Stats {
    played: u32,
    cashed_out: u32,
    crashed: u32,
    total_wagered: u64,
    total_paid_out: u64,
    crash_point_sum: f64,
}

impl Stats {
    fn record_cash_out(&mut self, wager: u64, payout: u64) {
        self.played += 1;
        self.cashed_out += 1;
        self.total_wagered += wager;
        self.total_paid_out += payout;
    }

    fn record_crash(&mut self, wager: u64, crash_point: f64) {
        self.played += 1;
        self.crashed += 1;
        self.total_wagered += wager;
        self.crash_point_sum += crash_point;
    }

    fn average_crash_point(&self) -> f64 {
        if self.crashed == 0 {
            0.0
        } else {
            self.crash_point_sum / self.crashed as f64
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if args.cadence_ms == 0 {
        bail!("cadence-ms must be greater than zero");
    }
    if args.wager == 0 {
        bail!("wager must be greater than zero");
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut session = GameSession::new(args.balance);
    if let Some(rate) = args.growth_rate {
        session.set_growth_rate(rate);
    }
    if let Some(deposit) = args.deposit {
        session.deposit(deposit).map_err(|err| {
            anyhow::anyhow!("deposit of {} rejected: {err}", format_cents(deposit))
        })?;
        info!(balance = %format_cents(session.balance()), "deposit applied");
    }

    let target = if args.target > 0.0 {
        Some(args.target)
    } else {
        None
    };

    let mut stats = Stats::default();
    let mut now_ms = 0u64;

    for round_idx in 0..args.rounds {
        match session.place_wager(args.wager, now_ms, &mut rng) {
            Ok(()) => {}
            Err(GameError::InsufficientFunds { balance, .. }) => {
                warn!(
                    round = round_idx,
                    balance = %format_cents(balance),
                    "bankroll exhausted, stopping"
                );
                break;
            }
            Err(err) => bail!("wager rejected: {err}"),
        }

        loop {
            now_ms += args.cadence_ms;
            match session.tick(now_ms) {
                TickResult::Running { multiplier } => {
                    if let Some(target) = target {
                        if multiplier >= target {
                            let cash_out = match session.cash_out() {
                                Ok(cash_out) => cash_out,
                                Err(err) => bail!("cash-out rejected: {err}"),
                            };
                            info!(
                                round = round_idx,
                                multiplier = cash_out.multiplier,
                                payout = %format_cents(cash_out.payout),
                                "cashed out"
                            );
                            stats.record_cash_out(args.wager, cash_out.payout);
                            break;
                        }
                    }
                }
                TickResult::Crashed { crash_point } => {
                    info!(round = round_idx, crash_point, "crashed");
                    stats.record_crash(args.wager, crash_point);
                    break;
                }
                TickResult::Idle => break,
            }
        }
    }

    let net = session.balance() as i64 - args.balance as i64
        - args.deposit.unwrap_or(0) as i64;
    println!("rounds_played,cashed_out,crashed,wagered,paid_out,net,ending_balance,avg_crash_point");
    println!(
        "{},{},{},{},{},{},{},{:.2}",
        stats.played,
        stats.cashed_out,
        stats.crashed,
        format_cents(stats.total_wagered),
        format_cents(stats.total_paid_out),
        net,
        format_cents(session.balance()),
        stats.average_crash_point()
    );

    Ok(())
}
