use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

const LIST_SEPARATOR: &str = ", ";
const DAY_MEMBERS: &str = "、メンバー「";
const DAY_END: &str = "」";
const SCENARIO_START: &str = "「";
const SCENARIO_HOST: &str = "」：GM：";
const SCENARIO_PLAYERS: &str = ", PL:";

/// The decision, as a line of text to paste in a group chat.
///
/// The names are joined with `, `. Parsing the text back gives the same
/// summary as long as no name is empty or contains `, `: empty names are
/// not rendered, and a name containing the separator reads as two names.
///
/// ```
/// use schedule_match::Summary;
///
/// let s = Summary::Day {
///     day: "4/1(月)".to_string(),
///     participants: vec!["Alice".to_string(), "Bob".to_string()],
/// };
/// assert_eq!(s.to_string(), "4/1(月)、メンバー「Alice, Bob」");
/// assert_eq!("4/1(月)、メンバー「Alice, Bob」".parse::<Summary>(), Ok(s));
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Summary {
    Day {
        day: String,
        participants: Vec<String>,
    },
    Scenario {
        scenario: String,
        host: String,
        participants: Vec<String>,
    },
}

/// The participants, as a plain list to copy. Empty names are skipped.
pub fn member_list(participants: &[String]) -> String {
    participants
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.as_str())
        .collect::<Vec<&str>>()
        .join(LIST_SEPARATOR)
}

fn split_members(s: &str) -> Vec<String> {
    if s.is_empty() {
        Vec::new()
    } else {
        s.split(LIST_SEPARATOR).map(|p| p.to_string()).collect()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Summary::Day { day, participants } => write!(
                f,
                "{}{}{}{}",
                day,
                DAY_MEMBERS,
                member_list(participants),
                DAY_END
            ),
            Summary::Scenario {
                scenario,
                host,
                participants,
            } => write!(
                f,
                "{}{}{}{}{}{}",
                SCENARIO_START,
                scenario,
                SCENARIO_HOST,
                host,
                SCENARIO_PLAYERS,
                member_list(participants)
            ),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SummaryParseError(pub String);

impl Error for SummaryParseError {}

impl Display for SummaryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a decision summary: {:?}", self.0)
    }
}

impl FromStr for Summary {
    type Err = SummaryParseError;

    fn from_str(s: &str) -> Result<Summary, SummaryParseError> {
        let err = || SummaryParseError(s.to_string());
        if let Some(rest) = s.strip_prefix(SCENARIO_START) {
            if let Some((scenario, rest)) = rest.split_once(SCENARIO_HOST) {
                let (host, players) = rest.split_once(SCENARIO_PLAYERS).ok_or_else(err)?;
                return Ok(Summary::Scenario {
                    scenario: scenario.to_string(),
                    host: host.to_string(),
                    participants: split_members(players),
                });
            }
        }
        let (day, members) = s
            .strip_suffix(DAY_END)
            .and_then(|body| body.rsplit_once(DAY_MEMBERS))
            .ok_or_else(err)?;
        Ok(Summary::Day {
            day: day.to_string(),
            participants: split_members(members),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn day_summary() {
        let s = Summary::Day {
            day: "4/1(月) 20:00〜".to_string(),
            participants: names(&["たろう", "はなこ"]),
        };
        assert_eq!(s.to_string(), "4/1(月) 20:00〜、メンバー「たろう, はなこ」");
    }

    #[test]
    fn scenario_summary() {
        let s = Summary::Scenario {
            scenario: "狂気山脈".to_string(),
            host: "たろう".to_string(),
            participants: names(&["はなこ", "じろう"]),
        };
        assert_eq!(s.to_string(), "「狂気山脈」：GM：たろう, PL:はなこ, じろう");
    }

    #[test]
    fn round_trip() {
        let summaries = vec![
            Summary::Day {
                day: "12/24(火)、夜".to_string(),
                participants: names(&["A"]),
            },
            Summary::Day {
                day: "4/1".to_string(),
                participants: vec![],
            },
            Summary::Scenario {
                scenario: "毒入りスープ 「改」".to_string(),
                host: "GM太郎".to_string(),
                participants: names(&["P1", "P2", "P3"]),
            },
            Summary::Scenario {
                scenario: "S".to_string(),
                host: "H".to_string(),
                participants: vec![],
            },
        ];
        for s in summaries {
            assert_eq!(s.to_string().parse::<Summary>(), Ok(s));
        }
    }

    #[test]
    fn member_list_for_copy() {
        assert_eq!(member_list(&names(&["A", "B", "C"])), "A, B, C");
        assert_eq!(member_list(&[]), "");
    }

    #[test]
    fn empty_names_are_not_rendered() {
        let s = Summary::Day {
            day: "4/1".to_string(),
            participants: names(&["", "A", ""]),
        };
        assert_eq!(s.to_string(), "4/1、メンバー「A」");
        assert_eq!(
            s.to_string().parse::<Summary>(),
            Ok(Summary::Day {
                day: "4/1".to_string(),
                participants: names(&["A"]),
            })
        );
        assert_eq!(member_list(&names(&[""])), "");
    }

    #[test]
    fn rejects_other_text() {
        assert!("4/1 A, B".parse::<Summary>().is_err());
        assert!("「S」：GM：H".parse::<Summary>().is_err());
    }
}
