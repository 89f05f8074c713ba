use super::types::ApiMatch;

/// Domestic competition codes queried directly when a range yields no
/// relevant fixtures.
pub const FALLBACK_COMPETITION_CODES: &[&str] = &["BSA"];

/// Competitions always worth offering, matched case-insensitively as substrings
/// of the provider's competition name.
const COMPETITION_ALLOW_LIST: &[&str] = &[
    // Continental / world
    "fifa world cup",
    "world cup",
    "uefa champions league",
    "european championship",
    "copa libertadores",
    "copa sudamericana",
    "copa america",
    // Domestic
    "campeonato brasileiro",
    "brasileirão",
    "copa do brasil",
    // Top European leagues
    "premier league",
    "primera division",
    "la liga",
    "serie a",
    "bundesliga",
    "ligue 1",
    "primeira liga",
    "eredivisie",
];

/// Clubs flagged as domestic. A fixture involving any of them is relevant
/// regardless of competition.
const DOMESTIC_TEAMS: &[&str] = &[
    "flamengo",
    "palmeiras",
    "corinthians",
    "são paulo",
    "sao paulo",
    "santos",
    "fluminense",
    "vasco",
    "botafogo",
    "grêmio",
    "gremio",
    "internacional",
    "atlético mineiro",
    "atletico mineiro",
    "cruzeiro",
    "bahia",
    "fortaleza",
    "athletico paranaense",
    "red bull bragantino",
    "vitória",
    "vitoria",
    "juventude",
    "sport recife",
    "ceará",
    "ceara",
    "mirassol",
    "brazil",
    "brasil",
];

pub fn is_domestic_team(name: &str) -> bool {
    let name = name.to_lowercase();
    DOMESTIC_TEAMS.iter().any(|team| name.contains(team))
}

pub fn is_allowed_competition(name: &str) -> bool {
    let name = name.to_lowercase();
    COMPETITION_ALLOW_LIST.iter().any(|c| name.contains(c))
}

/// A fixture is relevant when either side is a domestic club or the
/// competition is on the allow-list.
pub fn is_relevant(m: &ApiMatch) -> bool {
    is_domestic_team(m.home_name())
        || is_domestic_team(m.away_name())
        || is_allowed_competition(m.competition_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::football::types::{ApiCompetitionRef, ApiTeam};

    fn make_match(home: &str, away: &str, competition: &str) -> ApiMatch {
        ApiMatch {
            id: 1,
            home_team: ApiTeam {
                name: Some(home.into()),
                ..Default::default()
            },
            away_team: ApiTeam {
                name: Some(away.into()),
                ..Default::default()
            },
            utc_date: "2026-10-18T19:00:00Z".into(),
            status: Some("TIMED".into()),
            competition: Some(ApiCompetitionRef {
                name: Some(competition.into()),
                code: None,
            }),
            score: None,
        }
    }

    #[test]
    fn test_domestic_team_in_friendly_is_relevant() {
        let m = make_match("Boca Juniors", "CR Flamengo", "Club Friendlies");
        assert!(is_relevant(&m));
    }

    #[test]
    fn test_allow_listed_competition_is_relevant() {
        let m = make_match("Arsenal FC", "Chelsea FC", "Premier League");
        assert!(is_relevant(&m));
    }

    #[test]
    fn test_unknown_league_is_filtered() {
        let m = make_match("Kashima Antlers", "Urawa Reds", "J. League");
        assert!(!is_relevant(&m));
    }

    #[test]
    fn test_matching_ignores_case() {
        assert!(is_domestic_team("SC CORINTHIANS PAULISTA"));
        assert!(is_allowed_competition("UEFA CHAMPIONS LEAGUE"));
    }
}
