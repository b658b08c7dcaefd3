//! Static rule table for every supported sport.

/// Stat that can be recorded for a player of a given sport.
#[derive(Debug, PartialEq, Eq)]
pub struct StatType {
    /// Stable identifier, e.g. `rebounds`.
    pub id: &'static str,
    /// Display label.
    pub name: &'static str,
}

/// Rules that drive the scoreboard of a sport.
#[derive(Debug, PartialEq, Eq)]
pub struct Sport {
    /// Stable identifier used by games and teams.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Whether the scoreboard shows a shot clock.
    pub has_shot_clock: bool,
    /// Shot-clock value restored on expiry, zero for sports without one.
    pub shot_clock_seconds: u8,
    /// Label of a period, e.g. `Quarter`.
    pub period_name: &'static str,
    /// Number of periods in a game.
    pub total_periods: u8,
    /// Default step of the score buttons.
    pub score_increment: u32,
    /// Stats that can be recorded for players.
    pub stat_types: &'static [StatType],
}

const fn stat(id: &'static str, name: &'static str) -> StatType {
    StatType { id, name }
}

static SPORTS: [Sport; 8] = [
    Sport {
        id: "basketball",
        name: "Basketball",
        has_shot_clock: true,
        shot_clock_seconds: 24,
        period_name: "Quarter",
        total_periods: 4,
        score_increment: 1,
        stat_types: &[
            stat("points", "Points"),
            stat("assists", "Assists"),
            stat("rebounds", "Rebounds"),
            stat("steals", "Steals"),
            stat("fouls", "Fouls"),
        ],
    },
    Sport {
        id: "soccer",
        name: "Soccer",
        has_shot_clock: false,
        shot_clock_seconds: 0,
        period_name: "Half",
        total_periods: 2,
        score_increment: 1,
        stat_types: &[
            stat("goals", "Goals"),
            stat("assists", "Assists"),
            stat("fouls", "Fouls"),
            stat("yellowCards", "Yellow Cards"),
            stat("redCards", "Red Cards"),
        ],
    },
    Sport {
        id: "afl",
        name: "AFL",
        has_shot_clock: false,
        shot_clock_seconds: 0,
        period_name: "Quarter",
        total_periods: 4,
        score_increment: 1,
        stat_types: &[
            stat("goals", "Goals"),
            stat("marks", "Marks"),
            stat("kicks", "Kicks"),
            stat("tackles", "Tackles"),
            stat("fouls", "Fouls"),
        ],
    },
    Sport {
        id: "tennis",
        name: "Tennis",
        has_shot_clock: false,
        shot_clock_seconds: 0,
        period_name: "Set",
        total_periods: 5,
        score_increment: 1,
        stat_types: &[
            stat("setsWon", "Sets Won"),
            stat("aces", "Aces"),
            stat("doubleFaults", "Double Faults"),
            stat("fouls", "Fouls"),
        ],
    },
    Sport {
        id: "netball",
        name: "Netball",
        has_shot_clock: true,
        shot_clock_seconds: 24,
        period_name: "Quarter",
        total_periods: 4,
        score_increment: 1,
        stat_types: &[
            stat("goals", "Goals"),
            stat("goalAssists", "Goal Assists"),
            stat("intercepts", "Intercepts"),
            stat("fouls", "Fouls"),
        ],
    },
    Sport {
        id: "rugby",
        name: "Rugby",
        has_shot_clock: false,
        shot_clock_seconds: 0,
        period_name: "Half",
        total_periods: 2,
        score_increment: 1,
        stat_types: &[
            stat("tries", "Tries"),
            stat("conversions", "Conversions"),
            stat("tackles", "Tackles"),
            stat("penalties", "Penalties"),
        ],
    },
    Sport {
        id: "nfl",
        name: "NFL",
        has_shot_clock: false,
        shot_clock_seconds: 0,
        period_name: "Quarter",
        total_periods: 4,
        score_increment: 1,
        stat_types: &[
            stat("touchdowns", "Touchdowns"),
            stat("tackles", "Tackles"),
            stat("interceptions", "Interceptions"),
            stat("penalties", "Penalties"),
        ],
    },
    Sport {
        id: "baseball",
        name: "Baseball",
        has_shot_clock: false,
        shot_clock_seconds: 0,
        period_name: "Inning",
        total_periods: 9,
        score_increment: 1,
        stat_types: &[
            stat("hits", "Hits"),
            stat("runs", "Runs"),
            stat("homeRuns", "Home Runs"),
            stat("strikeouts", "Strikeouts"),
            stat("walks", "Walks"),
            stat("catches", "Catches"),
            stat("errors", "Errors"),
        ],
    },
];

/// Every sport, in display order.
pub fn all() -> &'static [Sport] {
    &SPORTS
}

/// Rules of one sport by id.
pub fn lookup(sport_id: &str) -> Option<&'static Sport> {
    SPORTS.iter().find(|sport| sport.id == sport_id)
}

impl Sport {
    /// Whether `stat_id` is one of this sport's stat types.
    pub fn has_stat_type(&self, stat_id: &str) -> bool {
        self.stat_types.iter().any(|stat| stat.id == stat_id)
    }

    /// Bring a period number back into `1..=total_periods`.
    pub fn clamp_period(&self, period: i64) -> u8 {
        period.clamp(1, i64::from(self.total_periods)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_complete_and_unique() {
        assert_eq!(all().len(), 8);
        for sport in all() {
            assert_eq!(lookup(sport.id), Some(sport));
            assert!(sport.total_periods >= 1);
            assert!(!sport.stat_types.is_empty());
            assert_eq!(sport.has_shot_clock, sport.shot_clock_seconds > 0);
        }
        assert!(lookup("hockey").is_none());
    }

    #[test]
    fn only_basketball_and_netball_have_a_shot_clock() {
        let with_clock = all()
            .iter()
            .filter(|sport| sport.has_shot_clock)
            .map(|sport| sport.id)
            .collect::<Vec<_>>();
        assert_eq!(with_clock, vec!["basketball", "netball"]);
        assert_eq!(lookup("basketball").unwrap().shot_clock_seconds, 24);
    }

    #[test]
    fn stat_types_and_period_bounds() {
        let baseball = lookup("baseball").unwrap();
        assert_eq!(baseball.total_periods, 9);
        assert!(baseball.has_stat_type("homeRuns"));
        assert!(!baseball.has_stat_type("points"));

        let soccer = lookup("soccer").unwrap();
        assert_eq!(soccer.clamp_period(0), 1);
        assert_eq!(soccer.clamp_period(3), 2);
        assert_eq!(soccer.clamp_period(2), 2);
    }
}
