//! Regulated minting walkthrough
//!
//! Runs the treasury lock and the regulated coin through their canonical
//! situations:
//!
//! 1. **Quota within an epoch**: mints succeed until the per-epoch allowance
//!    is spent, then the next mint is refused
//! 2. **Epoch rollover**: the allowance restarts in a new epoch
//! 3. **Revocation**: a banned cap is refused even for a zero amount, and
//!    works again once unbanned
//! 4. **Zero-value split**: splitting nothing off a regulated coin yields an
//!    empty coin and leaves the source untouched
//! 5. **Over-quota request**: a single request above the quota is refused in
//!    any epoch
//!
//! Pass a path to a platform TOML file as the first argument to pick the
//! genesis epoch; a missing file uses the defaults.

use colored::Colorize;
use maple_token_platform::{
    Address, EpochClockConfig, Platform, PlatformConfig, Shared, TreasuryCap,
};
use maple_token_regulated::RegulatedCoin;
use maple_token_treasury::{MintCap, TreasuryError, TreasuryLock, TreasuryLockHandle};

mod rgd {
    /// Witness for the demo currency. Only this module can construct it.
    pub struct Rgd {
        _private: (),
    }

    impl maple_token_regulated::Witness for Rgd {
        const NAME: &'static str = "RGD";
    }

    pub fn witness() -> Rgd {
        Rgd { _private: () }
    }
}

use rgd::{witness, Rgd};

fn header(title: &str) {
    println!();
    println!("{}", "═".repeat(72).cyan());
    println!("  {}", title.cyan().bold());
    println!("{}", "═".repeat(72).cyan());
}

fn separator() {
    println!("{}", "━".repeat(72).dimmed());
}

fn outcome<V>(label: &str, result: &Result<V, TreasuryError>, show: impl Fn(&V) -> String) {
    match result {
        Ok(v) => println!("  {} {}: {}", "├".dimmed(), label, show(v).green()),
        Err(e) => println!("  {} {}: {}", "├".dimmed(), label, e.to_string().red()),
    }
}

fn mint(
    platform: &Platform,
    lock: &Shared<TreasuryLock<Rgd>>,
    cap: &mut MintCap<Rgd>,
    sender: Address,
    amount: u64,
) -> Result<u64, TreasuryError> {
    let ctx = platform.begin(sender);
    lock.mint_balance(cap, amount, &ctx).map(|b| b.value())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PlatformConfig::load(path)?,
        None => PlatformConfig::default(),
    };
    config.validate()?;
    let genesis = match config.epoch_clock {
        EpochClockConfig::Manual { genesis_epoch } => genesis_epoch,
        EpochClockConfig::WallClock { .. } => {
            println!(
                "  {}",
                "Wall-clock epochs cannot be stepped; using a manual clock at 0".yellow()
            );
            0
        }
    };

    println!();
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".cyan());
    println!("{}", "║    Regulated Minting: Treasury Lock and Mint Caps            ║".cyan().bold());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".cyan());

    let (platform, clock) = Platform::manual(genesis);
    let admin = Address::derive("treasury-admin");
    let minter = Address::derive("minter");

    let ctx = platform.begin(admin);
    let treasury_cap = TreasuryCap::create_currency(witness(), &ctx)?;
    let (lock, admin_cap) = TreasuryLock::new_lock(treasury_cap, &ctx)?;
    let mut cap = admin_cap.create_mint_cap(100, &ctx);
    println!("  {} Lock:      {}", "├".dimmed(), lock.id().to_string().yellow());
    println!("  {} Admin cap: {}", "├".dimmed(), admin_cap.id().to_string().yellow());
    println!("  {} Mint cap:  {} (100 per epoch)", "└".dimmed(), cap.id().to_string().yellow());

    // ── Part 1: quota within an epoch ───────────────────────────────
    header("Part 1: Quota within one epoch");
    for amount in [60, 40, 1] {
        let result = mint(&platform, &lock, &mut cap, minter, amount);
        outcome(&format!("mint {amount:>3}"), &result, |v| format!("minted {v}"));
    }
    println!(
        "  {} Minted this epoch: {}",
        "└".dimmed(),
        cap.minted_in_epoch().to_string().bold()
    );
    separator();

    // ── Part 2: epoch rollover ──────────────────────────────────────
    header("Part 2: Epoch rollover");
    let epoch = clock.advance();
    println!("  {} Epoch advanced to {}", "├".dimmed(), epoch.to_string().yellow());
    let result = mint(&platform, &lock, &mut cap, minter, 100);
    outcome("mint 100", &result, |v| format!("minted {v}"));
    println!(
        "  {} Window: epoch {} / minted {}",
        "└".dimmed(),
        cap.last_epoch(),
        cap.minted_in_epoch()
    );
    separator();

    // ── Part 3: revocation ──────────────────────────────────────────
    header("Part 3: Revocation");
    clock.advance();
    let id = *cap.id();
    lock.ban_mint_cap_id(&admin_cap, id)?;
    for amount in [10, 0] {
        let result = mint(&platform, &lock, &mut cap, minter, amount);
        outcome(&format!("banned mint {amount:>2}"), &result, |v| format!("minted {v}"));
    }
    lock.unban_mint_cap_id(&admin_cap, id)?;
    let result = mint(&platform, &lock, &mut cap, minter, 10);
    outcome("unbanned mint 10", &result, |v| format!("minted {v}"));
    println!("  {} Still banned: {}", "└".dimmed(), lock.is_banned(&id)?);
    separator();

    // ── Part 4: zero-value split ────────────────────────────────────
    header("Part 4: Zero-value split of a regulated coin");
    let ctx = platform.begin(minter);
    let balance = lock.mint_balance(&mut cap, 10, &ctx)?;
    let mut source = RegulatedCoin::from_balance(witness(), balance, minter, &ctx);
    let creator2 = Address::derive("creator-2");
    let empty = source.split(witness(), creator2, 0, &ctx)?;
    println!(
        "  {} Split 0 off a coin of 10: new coin {} holds {}",
        "├".dimmed(),
        empty.id().to_string().yellow(),
        empty.value().to_string().green()
    );
    println!(
        "  {} Source still holds {}",
        "└".dimmed(),
        source.value().to_string().green()
    );
    separator();

    // ── Part 5: over-quota request ──────────────────────────────────
    header("Part 5: Over-quota request");
    let ctx = platform.begin(admin);
    let mut small = admin_cap.create_mint_cap(50, &ctx);
    for _ in 0..2 {
        let result = mint(&platform, &lock, &mut small, minter, 51);
        outcome("mint 51 against 50", &result, |v| format!("minted {v}"));
        clock.advance();
    }
    separator();

    // ── Delivery ────────────────────────────────────────────────────
    header("Delivery as a regulated coin");
    let ctx = platform.begin(minter);
    let balance = lock.mint_balance(&mut cap, 25, &ctx)?;
    let coin = RegulatedCoin::from_balance(witness(), balance, minter, &ctx);
    println!(
        "  {} Coin {} holds {} created by {}",
        "├".dimmed(),
        coin.id().to_string().yellow(),
        coin.value().to_string().green(),
        coin.creator().short_id()
    );
    let coin_id = lock.mint_and_transfer(&mut cap, 5, minter, &ctx)?;
    println!("  {} Plain coin {} sent to minter", "├".dimmed(), coin_id.to_string().yellow());
    println!(
        "  {} Total supply: {}",
        "└".dimmed(),
        lock.total_supply()?.to_string().bold()
    );

    println!();
    Ok(())
}
