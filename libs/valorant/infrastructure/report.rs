//! Text reports for aggregated statistics

use std::fmt::Write;

use crate::domain::{PerMatchStats, PlayerStats};

fn ratio(numerator: impl Into<f64>, denominator: impl Into<f64>) -> f64 {
    numerator.into() / denominator.into()
}

/// Stats file block. Ratios add one to the denominator so an empty
/// history still renders.
pub fn render_stats_file(stats: &PlayerStats) -> String {
    let mut out = String::new();
    let games = f64::from(stats.total_games) + 1.0;
    let rounds = f64::from(stats.total_rounds) + 1.0;

    let _ = writeln!(out, "[{}]", stats.name);
    let _ = writeln!(
        out,
        "Games: {} | Wins: {} | Losses: {} | WR: {:.1}%",
        stats.total_games,
        stats.wins,
        stats.losses,
        ratio(stats.wins * 100, games)
    );
    let _ = writeln!(
        out,
        "K/D/A: {}/{}/{} | KDA: {:.2} | +/-: {}",
        stats.kills,
        stats.deaths,
        stats.assists,
        ratio(stats.kills + stats.assists, stats.deaths + 1),
        i64::from(stats.kills) - i64::from(stats.deaths)
    );
    let _ = writeln!(
        out,
        "Averages: {:.1}/{:.1}/{:.1} per game",
        ratio(stats.kills, games),
        ratio(stats.deaths, games),
        ratio(stats.assists, games)
    );
    let _ = writeln!(
        out,
        "ACS: {:.2} | ADR: {:.2}",
        stats.score as f64 / games,
        stats.damage_made as f64 / rounds
    );
    let _ = writeln!(
        out,
        "FK/FD: {}/{} ({:.1}%)",
        stats.first_kills,
        stats.first_deaths,
        ratio(stats.first_kills * 100, stats.first_kills + stats.first_deaths + 1)
    );

    let kast_pct = ratio(stats.kast_rounds * 100, rounds);
    let verdict = if kast_pct >= 60.0 { "OK" } else { "LOW" };
    let _ = writeln!(
        out,
        "KAST: {:.1}% [{}] ({} rounds)",
        kast_pct, verdict, stats.kast_rounds
    );

    let multi = &stats.multi_kills;
    let _ = writeln!(
        out,
        "Multi-Kills: 2K: {} | 3K: {} | 4K: {} | 5K: {}",
        multi.two, multi.three, multi.four, multi.five
    );
    let _ = writeln!(out, "Clutches: {}", stats.clutches);
    out
}

/// Console report: summary, combat, advanced, sides, economy, agents and
/// the `recent` most recent matches of the player.
pub fn render_console_report(stats: &PlayerStats, matches: &[PerMatchStats], recent: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n=== STATS FOR {} ===\n", stats.name);
    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "   Games played: {}", stats.total_games);
    let _ = writeln!(out, "   Wins/Losses: {}/{}", stats.wins, stats.losses);
    if stats.total_games > 0 {
        let _ = writeln!(
            out,
            "   Win rate: {:.1}%",
            ratio(stats.wins * 100, stats.total_games)
        );
    }
    let _ = writeln!(out, "   Total rounds: {}\n", stats.total_rounds);

    let _ = writeln!(out, "COMBAT");
    let _ = writeln!(out, "   Kills: {}", stats.kills);
    let _ = writeln!(out, "   Deaths: {}", stats.deaths);
    let _ = writeln!(out, "   Assists: {}", stats.assists);
    if stats.total_games > 0 {
        let _ = writeln!(out, "   K/D: {:.2}", ratio(stats.kills, stats.deaths + 1));
        let _ = writeln!(
            out,
            "   Kills per game: {:.1}",
            ratio(stats.kills, stats.total_games)
        );
    }
    let _ = writeln!(
        out,
        "   Headshots/Bodyshots/Legshots: {}/{}/{}\n",
        stats.headshots, stats.bodyshots, stats.legshots
    );

    let _ = writeln!(out, "ADVANCED");
    let _ = writeln!(out, "   First kills: {}", stats.first_kills);
    let _ = writeln!(out, "   First deaths: {}", stats.first_deaths);
    let _ = writeln!(out, "   KAST rounds: {}", stats.kast_rounds);
    let _ = writeln!(out, "   Clutches: {}", stats.clutches);
    let _ = writeln!(out, "   Multi-kills:");
    for bucket in 2..=5 {
        let _ = writeln!(out, "      {}K: {}", bucket, stats.multi_kills.get(bucket));
    }

    let _ = writeln!(out, "\nATTACK vs DEFENSE");
    let _ = writeln!(
        out,
        "   Attack  - Kills/Deaths/Damage: {}/{}/{} over {} rounds",
        stats.attack.kills, stats.attack.deaths, stats.attack.damage, stats.attack.rounds
    );
    let _ = writeln!(
        out,
        "   Defense - Kills/Deaths/Damage: {}/{}/{} over {} rounds",
        stats.defense.kills, stats.defense.deaths, stats.defense.damage, stats.defense.rounds
    );

    let _ = writeln!(out, "\nECONOMY");
    let _ = writeln!(out, "   Total score: {}", stats.score);
    let _ = writeln!(
        out,
        "   Damage dealt/received: {}/{}",
        stats.damage_made, stats.damage_received
    );

    let _ = writeln!(out, "\nMOST PLAYED AGENTS");
    for (agent, count) in stats.agents_by_usage() {
        let _ = writeln!(out, "   {}: {} games", agent, count);
    }

    let rows = recent_matches(stats, matches, recent);
    let _ = writeln!(out, "\nRECENT MATCHES: {}", rows.len());
    for played in rows {
        let Some(record) = played.player(&stats.name) else {
            continue;
        };
        let date = played
            .played_at()
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let result = if played.won { "W" } else { "L" };
        let _ = writeln!(
            out,
            "   {:<10}  {:<10}  {}  {}/{}/{}  {}",
            date, played.map, result, record.kills, record.deaths, record.assists, record.agent
        );
    }

    out
}

/// Most recent matches in which the player appears, newest first
pub fn recent_matches<'a>(
    stats: &PlayerStats,
    matches: &'a [PerMatchStats],
    limit: usize,
) -> Vec<&'a PerMatchStats> {
    let mut played: Vec<&PerMatchStats> = matches
        .iter()
        .filter(|played| played.player(&stats.name).is_some())
        .collect();
    played.sort_by(|a, b| b.game_start.cmp(&a.game_start));
    played.truncate(limit);
    played
}
