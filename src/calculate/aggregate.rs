//! Folding match lists into guild and player statistics.

use std::collections::HashMap;

use crate::models::{
    GuildStats, GuildSummary, Match, MatchResult, MatchSummary, OverallRecord, PlayerStat,
    PlayerStats, PlayerTotals, RivalBreakdown, SideTotals, TopPerformer, TopPerformers,
};
use crate::query::{compare_dates_desc, sort_players, SortField, SortOrder, SortState};

/// Player totals keyed by exact name, kept in first-seen order.
#[derive(Debug, Default)]
struct PlayerTable {
    index: HashMap<String, usize>,
    rows: Vec<PlayerTotals>,
}

impl PlayerTable {
    fn record(&mut self, line: &PlayerStat, won: bool) {
        let idx = match self.index.get(&line.name) {
            Some(&idx) => idx,
            None => {
                self.rows.push(PlayerTotals::new(line.name.clone()));
                self.index.insert(line.name.clone(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        self.rows[idx].record(line, won);
    }

    fn finish(self) -> Vec<PlayerStats> {
        self.rows.into_iter().map(PlayerStats::from_totals).collect()
    }
}

/// Replace `slot` only when `value` is strictly greater, so ties keep the first holder.
fn challenge(slot: &mut TopPerformer, value: u64, line: &PlayerStat, opponent: &str, m: &Match) {
    if value > slot.value {
        *slot = TopPerformer {
            name: line.name.clone(),
            value,
            opponent: opponent.to_string(),
            date: m.date.clone(),
            match_id: Some(m.id.clone()),
        };
    }
}

fn observe(top: &mut TopPerformers, line: &PlayerStat, opponent: &str, m: &Match) {
    challenge(&mut top.kills, line.kills, line, opponent, m);
    challenge(&mut top.deaths, line.deaths, line, opponent, m);
    challenge(&mut top.damage, line.damage, line, opponent, m);
    challenge(&mut top.debuffs, line.debuffs, line, opponent, m);
}

/// Accumulated state of one pass over a view.
#[derive(Default)]
struct ViewFold {
    victories: u32,
    defeats: u32,
    home_players: PlayerTable,
    home_top: TopPerformers,
    totals: SideTotals,
    history: Vec<MatchSummary>,
    opponent_players: PlayerTable,
    opponent_top: TopPerformers,
}

impl ViewFold {
    fn into_guild_stats(self, guild: &str) -> (GuildStats, Vec<PlayerStats>, TopPerformers) {
        let stats = GuildStats {
            guild: guild.to_string(),
            record: OverallRecord::from_counts(self.victories, self.defeats),
            players: self.home_players.finish(),
            top: self.home_top,
            totals: self.totals,
            history: self.history,
        };
        (stats, self.opponent_players.finish(), self.opponent_top)
    }
}

/// Computes statistics from the point of view of one home guild.
///
/// Only the home guild's side of each match feeds player totals; which side
/// that is gets decided per match by comparing team names exactly.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    home_guild: &'a str,
}

impl<'a> Aggregator<'a> {
    pub fn new(home_guild: &'a str) -> Self {
        Self { home_guild }
    }

    pub fn home_guild(&self) -> &str {
        self.home_guild
    }

    fn fold<F>(&self, matches: &[Match], keep: F) -> ViewFold
    where
        F: Fn(&Match, &str) -> bool,
    {
        let mut view = ViewFold::default();

        for m in matches {
            let Some(side) = m.side_of(self.home_guild) else {
                continue;
            };
            let opponent = m.team(side.other());
            if !keep(m, opponent) {
                continue;
            }

            let won = m.won_by(side);
            if won {
                view.victories += 1;
            } else {
                view.defeats += 1;
            }

            for line in m.players(side) {
                view.home_players.record(line, won);
                observe(&mut view.home_top, line, opponent, m);
            }
            for line in m.players(side.other()) {
                view.opponent_players.record(line, !won);
                observe(&mut view.opponent_top, line, self.home_guild, m);
            }

            let home = SideTotals::from_players(m.players(side));
            view.totals.add(&home);
            view.history.push(MatchSummary {
                match_id: m.id.clone(),
                date: m.date.clone(),
                opponent: opponent.to_string(),
                result: if won {
                    MatchResult::Victory
                } else {
                    MatchResult::Defeat
                },
                home,
                opponent_totals: SideTotals::from_players(m.players(side.other())),
            });
        }

        view
    }

    /// Statistics over every match the home guild played.
    pub fn overall(&self, matches: &[Match]) -> GuildStats {
        let (stats, _, _) = self.fold(matches, |_, _| true).into_guild_stats(self.home_guild);
        stats
    }

    /// Statistics over matches against one rival.
    pub fn against(&self, matches: &[Match], rival: &str) -> RivalBreakdown {
        let (home, rival_players, rival_top) = self
            .fold(matches, |_, opponent| opponent == rival)
            .into_guild_stats(self.home_guild);

        RivalBreakdown {
            rival: rival.to_string(),
            home,
            rival_players,
            rival_top,
        }
    }

    /// One independent breakdown per configured rival, in the given order.
    pub fn rivals(&self, matches: &[Match], rivals: &[String]) -> Vec<RivalBreakdown> {
        rivals
            .iter()
            .map(|rival| self.against(matches, rival))
            .collect()
    }

    /// Headline numbers: record, totals, top `top_n` killers and damage
    /// dealers by cumulative totals, and the `recent` latest victories.
    pub fn summary(&self, matches: &[Match], top_n: usize, recent: usize) -> GuildSummary {
        let stats = self.overall(matches);

        let mut top_killers = stats.players.clone();
        sort_players(
            &mut top_killers,
            SortState::new(SortField::Kills, SortOrder::Desc),
        );
        top_killers.truncate(top_n);

        let mut top_damage = stats.players.clone();
        sort_players(
            &mut top_damage,
            SortState::new(SortField::Damage, SortOrder::Desc),
        );
        top_damage.truncate(top_n);

        let mut recent_victories: Vec<MatchSummary> = stats
            .history
            .iter()
            .filter(|s| s.result == MatchResult::Victory)
            .cloned()
            .collect();
        recent_victories.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
        recent_victories.truncate(recent);

        GuildSummary {
            record: stats.record,
            total_kills: stats.totals.kills,
            total_damage: stats.totals.damage,
            top_killers,
            top_damage,
            recent_victories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchId, MatchInput};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const HOME: &str = "Manifest";

    fn make_match(id: &str, date: &str, team1: &str, team2: &str, result: MatchResult) -> Match {
        let created = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        Match::from_input(
            MatchId::from(id),
            MatchInput::new(date, team1, team2, result),
            created,
        )
    }

    fn ann_scenario() -> Vec<Match> {
        let mut a = make_match("a", "2025-08-01", HOME, "Rivals", MatchResult::Victory);
        a.team1_players
            .push(PlayerStat::new("Ann").with_kills(5).with_deaths(1).with_damage(1000));
        let mut b = make_match("b", "2025-08-02", HOME, "Rivals", MatchResult::Defeat);
        b.team1_players
            .push(PlayerStat::new("Ann").with_kills(2).with_deaths(4).with_damage(500));
        vec![a, b]
    }

    #[test]
    fn test_ann_scenario() {
        let stats = Aggregator::new(HOME).overall(&ann_scenario());
        let ann = stats.player("Ann").unwrap();

        assert_eq!(ann.totals.matches, 2);
        assert_eq!(ann.totals.kills, 7);
        assert_eq!(ann.totals.deaths, 5);
        assert!((ann.kd - 1.4).abs() < 1e-9);
        assert_eq!(ann.win_rate, 50.0);
        assert_eq!(ann.totals.damage, 1500);
        assert_eq!(ann.averages.damage, 750.0);

        assert_eq!(stats.record.total_matches, 2);
        assert_eq!(stats.record.victories, 1);
        assert_eq!(stats.record.defeats, 1);
        assert_eq!(stats.record.win_rate, 50);
    }

    #[test]
    fn test_zero_matches() {
        let stats = Aggregator::new(HOME).overall(&[]);

        assert_eq!(stats.record, OverallRecord::default());
        assert!(stats.players.is_empty());
        assert!(stats.top.kills.name.is_empty());
        assert!(stats.top.deaths.name.is_empty());
        assert!(stats.top.damage.name.is_empty());
        assert!(stats.top.debuffs.name.is_empty());
        assert_eq!(stats.top.kills.value, 0);
    }

    #[test]
    fn test_zero_kills_zero_deaths_kd() {
        let mut m = make_match("a", "2025-08-01", HOME, "X", MatchResult::Victory);
        m.team1_players.push(PlayerStat::new("Idle"));

        let stats = Aggregator::new(HOME).overall(&[m]);
        let idle = stats.player("Idle").unwrap();
        assert_eq!(idle.kd, 0.0);
        assert_eq!(idle.win_rate, 100.0);
    }

    #[test]
    fn test_only_home_side_counted() {
        let mut m = make_match("a", "2025-08-01", "Guilty", HOME, MatchResult::Victory);
        m.team1_players.push(PlayerStat::new("Ann").with_kills(50));
        m.team2_players.push(PlayerStat::new("Bo").with_kills(3));

        let stats = Aggregator::new(HOME).overall(&[m]);

        assert!(stats.player("Ann").is_none());
        let bo = stats.player("Bo").unwrap();
        assert_eq!(bo.totals.kills, 3);
        // Home guild was team2 and team1 won
        assert_eq!(bo.totals.defeats, 1);
        assert_eq!(stats.record.defeats, 1);
        assert_eq!(stats.top.kills.name, "Bo");
        assert_eq!(stats.top.kills.opponent, "Guilty");
    }

    #[test]
    fn test_home_as_team2_victory() {
        let mut m = make_match("a", "2025-08-01", "Guilty", HOME, MatchResult::Defeat);
        m.team2_players.push(PlayerStat::new("Bo"));

        let stats = Aggregator::new(HOME).overall(&[m]);
        assert_eq!(stats.record.victories, 1);
        assert_eq!(stats.player("Bo").unwrap().totals.victories, 1);
        assert_eq!(stats.history[0].result, MatchResult::Victory);
    }

    #[test]
    fn test_matches_without_home_guild_ignored() {
        let mut m = make_match("a", "2025-08-01", "Guilty", "Allyance", MatchResult::Victory);
        m.team1_players.push(PlayerStat::new("Zed").with_kills(9));

        let stats = Aggregator::new(HOME).overall(&[m]);
        assert_eq!(stats.record.total_matches, 0);
        assert!(stats.players.is_empty());
    }

    #[test]
    fn test_names_keyed_exactly() {
        let mut m = make_match("a", "2025-08-01", HOME, "X", MatchResult::Victory);
        m.team1_players.push(PlayerStat::new("Ann").with_kills(1));
        m.team1_players.push(PlayerStat::new("ann").with_kills(1));
        m.team1_players.push(PlayerStat::new("Ann ").with_kills(1));

        let stats = Aggregator::new(HOME).overall(&[m]);
        assert_eq!(stats.players.len(), 3);
    }

    #[test]
    fn test_top_performer_first_encountered_wins_ties() {
        let mut a = make_match("a", "2025-08-01", HOME, "X", MatchResult::Victory);
        a.team1_players.push(PlayerStat::new("Ann").with_kills(8));
        a.team1_players.push(PlayerStat::new("Bo").with_kills(8));
        let mut b = make_match("b", "2025-08-05", HOME, "Y", MatchResult::Victory);
        b.team1_players.push(PlayerStat::new("Cy").with_kills(8).with_damage(10));

        let stats = Aggregator::new(HOME).overall(&[a, b]);
        assert_eq!(stats.top.kills.name, "Ann");
        assert_eq!(stats.top.kills.value, 8);
        assert_eq!(stats.top.kills.opponent, "X");
        assert_eq!(stats.top.kills.date, "2025-08-01");
        assert_eq!(stats.top.kills.match_id, Some(MatchId::from("a")));
        assert_eq!(stats.top.damage.name, "Cy");
    }

    #[test]
    fn test_top_performers_are_single_match_values() {
        let mut a = make_match("a", "2025-08-01", HOME, "X", MatchResult::Victory);
        a.team1_players.push(PlayerStat::new("Ann").with_kills(4));
        a.team1_players.push(PlayerStat::new("Bo").with_kills(6));
        let mut b = make_match("b", "2025-08-02", HOME, "X", MatchResult::Victory);
        b.team1_players.push(PlayerStat::new("Ann").with_kills(4));

        let stats = Aggregator::new(HOME).overall(&[a, b]);
        // Ann has 8 cumulative kills, but Bo holds the single-match record
        assert_eq!(stats.top.kills.name, "Bo");
        assert_eq!(stats.top.kills.value, 6);
    }

    #[test]
    fn test_idempotent() {
        let matches = ann_scenario();
        let agg = Aggregator::new(HOME);
        assert_eq!(agg.overall(&matches), agg.overall(&matches));
        assert_eq!(
            agg.rivals(&matches, &["Rivals".to_string()]),
            agg.rivals(&matches, &["Rivals".to_string()])
        );
    }

    #[test]
    fn test_input_untouched() {
        let matches = ann_scenario();
        let before = matches.clone();
        let _ = Aggregator::new(HOME).overall(&matches);
        assert_eq!(matches, before);
    }

    #[test]
    fn test_derived_values_never_negative() {
        let mut m = make_match("a", "2025-08-01", HOME, "X", MatchResult::Defeat);
        m.team1_players.push(PlayerStat::new("Ann").with_deaths(3));
        m.team1_players.push(PlayerStat::new("Bo").with_kills(u32::MAX as u64));

        let stats = Aggregator::new(HOME).overall(&[m]);
        for p in &stats.players {
            assert!(p.kd >= 0.0);
            assert!((0.0..=100.0).contains(&p.win_rate));
            assert!(p.averages.kills >= 0.0);
        }
    }

    #[test]
    fn test_huge_stat_lines_saturate() {
        let mut a = make_match("a", "2025-08-01", HOME, "Guilty", MatchResult::Victory);
        a.team1_players
            .push(PlayerStat::new("Ann").with_kills(u64::MAX).with_damage(u64::MAX));
        a.team2_players.push(PlayerStat::new("Zed").with_deaths(u64::MAX));
        let mut b = make_match("b", "2025-08-02", HOME, "Guilty", MatchResult::Defeat);
        b.team1_players
            .push(PlayerStat::new("Ann").with_kills(u64::MAX).with_damage(u64::MAX));
        b.team2_players.push(PlayerStat::new("Zed").with_deaths(u64::MAX));

        let matches = [a, b];
        let aggregator = Aggregator::new(HOME);

        let stats = aggregator.overall(&matches);
        let ann = stats.player("Ann").unwrap();
        assert_eq!(ann.totals.kills, u64::MAX);
        assert_eq!(ann.totals.damage, u64::MAX);
        assert_eq!(ann.totals.matches, 2);
        assert_eq!(stats.totals.kills, u64::MAX);

        let breakdown = aggregator.against(&matches, "Guilty");
        assert_eq!(breakdown.rival_players[0].totals.deaths, u64::MAX);

        let summary = aggregator.summary(&matches, 1, 1);
        assert_eq!(summary.total_kills, u64::MAX);
    }

    #[test]
    fn test_rival_breakdown() {
        let mut a = make_match("a", "2025-08-01", HOME, "Guilty", MatchResult::Victory);
        a.team1_players.push(PlayerStat::new("Ann").with_kills(5));
        a.team2_players.push(PlayerStat::new("Zed").with_kills(2).with_debuffs(4));
        let mut b = make_match("b", "2025-08-02", HOME, "Allyance", MatchResult::Defeat);
        b.team1_players.push(PlayerStat::new("Ann").with_kills(1));
        b.team2_players.push(PlayerStat::new("Yan").with_kills(9));
        let mut c = make_match("c", "2025-08-03", "Guilty", HOME, MatchResult::Victory);
        c.team2_players.push(PlayerStat::new("Ann").with_kills(3));
        c.team1_players.push(PlayerStat::new("Zed").with_kills(6));

        let breakdowns = Aggregator::new(HOME).rivals(
            &[a, b, c],
            &["Guilty".to_string(), "Allyance".to_string()],
        );
        assert_eq!(breakdowns.len(), 2);

        let guilty = &breakdowns[0];
        assert_eq!(guilty.rival, "Guilty");
        assert_eq!(guilty.home.record.total_matches, 2);
        assert_eq!(guilty.home.record.victories, 1);
        assert_eq!(guilty.home.player("Ann").unwrap().totals.kills, 8);

        let zed = guilty.rival_players.iter().find(|p| p.name() == "Zed").unwrap();
        assert_eq!(zed.totals.kills, 8);
        assert_eq!(zed.totals.victories, 1);
        assert_eq!(zed.totals.defeats, 1);
        assert_eq!(guilty.rival_top.kills.name, "Zed");
        assert_eq!(guilty.rival_top.kills.value, 6);
        assert_eq!(guilty.rival_top.kills.opponent, HOME);

        let allyance = &breakdowns[1];
        assert_eq!(allyance.home.record.total_matches, 1);
        assert_eq!(allyance.home.record.defeats, 1);
        assert_eq!(allyance.home.history[0].opponent_totals.kills, 9);
    }

    #[test]
    fn test_unknown_rival_is_empty() {
        let breakdown = Aggregator::new(HOME).against(&ann_scenario(), "Nobody");
        assert_eq!(breakdown.home.record, OverallRecord::default());
        assert!(breakdown.rival_players.is_empty());
    }

    #[test]
    fn test_history_totals() {
        let mut a = make_match("a", "2025-08-01", HOME, "Guilty", MatchResult::Victory);
        a.team1_players
            .push(PlayerStat::new("Ann").with_kills(5).with_damage(100));
        a.team1_players
            .push(PlayerStat::new("Bo").with_kills(1).with_debuffs(2));
        a.team2_players.push(PlayerStat::new("Zed").with_deaths(6));

        let stats = Aggregator::new(HOME).overall(&[a]);
        let entry = &stats.history[0];
        assert_eq!(entry.opponent, "Guilty");
        assert_eq!(entry.home.kills, 6);
        assert_eq!(entry.home.damage, 100);
        assert_eq!(entry.home.debuffs, 2);
        assert_eq!(entry.opponent_totals.deaths, 6);
        assert_eq!(stats.totals, entry.home);
    }

    #[test]
    fn test_summary() {
        let mut a = make_match("a", "2025-08-01", HOME, "X", MatchResult::Victory);
        a.team1_players
            .push(PlayerStat::new("Ann").with_kills(5).with_damage(10));
        a.team1_players
            .push(PlayerStat::new("Bo").with_kills(1).with_damage(900));
        let b = make_match("b", "2025-08-09", HOME, "Y", MatchResult::Victory);
        let c = make_match("c", "2025-08-05", HOME, "Z", MatchResult::Defeat);

        let summary = Aggregator::new(HOME).summary(&[a, b, c], 1, 5);
        assert_eq!(summary.record.total_matches, 3);
        assert_eq!(summary.total_kills, 6);
        assert_eq!(summary.total_damage, 910);
        assert_eq!(summary.top_killers.len(), 1);
        assert_eq!(summary.top_killers[0].name(), "Ann");
        assert_eq!(summary.top_damage[0].name(), "Bo");

        let dates: Vec<_> = summary
            .recent_victories
            .iter()
            .map(|s| s.date.as_str())
            .collect();
        assert_eq!(dates, vec!["2025-08-09", "2025-08-01"]);
    }
}
