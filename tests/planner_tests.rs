use std::path::PathBuf;

use lineup::config::AssaultConfig;
use lineup::data::boss::{load_bosses, Boss};
use lineup::data::roster::{Roster, Team};
use lineup::data::unit::{load_units, Element, Rank, Role, Synergy, Unit, UnitRecord};
use lineup::optimizer::combinations::{find_exclusive_combinations, TOP_K};
use lineup::optimizer::ranking::{rank_scored, BossTeams};
use lineup::optimizer::scoring::{score_team, ScoreOptions, Sentinel, TeamScore};
use lineup::optimizer::synergy::synergy_score;
use lineup::optimizer::team_generator::TeamGenerator;
use lineup::{plan_assault, rank_teams, score_named_team, PlannerError};

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn unit(name: &str, tags: &[&str], join: &[&str], synergy: Option<Synergy>) -> Unit {
    Unit::try_from(UnitRecord {
        id: name.to_ascii_lowercase(),
        name: name.to_string(),
        rank: Rank::S,
        limited: false,
        tier: 1.0,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        join: join.iter().map(|tag| tag.to_string()).collect(),
        synergy,
    })
    .expect("valid unit")
}

#[test]
fn mutual_stun_attack_pair_scores_positive_on_weakness() {
    let roster = Roster::new(vec![
        unit("Stunner", &["stun", "ice"], &["attack"], None),
        unit("Attacker", &["attack", "ice"], &["stun"], None),
    ])
    .expect("roster");
    let generated = TeamGenerator::new().generate(&roster);
    let pair = generated
        .pairs
        .get("Attacker / Stunner")
        .expect("mutual pair is generated");

    let boss = Boss {
        weaknesses: vec![Element::Ice],
        ..Boss::neutral()
    };
    let report = score_team(pair, &boss, ScoreOptions::strict());
    assert!(matches!(report.score, TeamScore::Scored { .. }));
    assert!(report.score.value() > 0, "{:?}", report.trace);
    assert!(report.trace.iter().any(|step| step.reason.contains("hits the weakness")));
}

#[test]
fn avoided_rupture_teammate_is_a_conflict() {
    let avoider = Synergy {
        avoid: vec!["rupture".to_string()],
        ..Synergy::default()
    };
    let roster = Roster::new(vec![
        unit("Picky", &["support"], &[], Some(avoider)),
        unit("Breaker", &["rupture", "ether"], &[], None),
        unit("Stunner", &["stun", "ether"], &[], None),
    ])
    .expect("roster");
    let team = Team::new(&roster, &[0, 1, 2]);

    let conflict = synergy_score(team.members()).unwrap_err();
    assert_eq!(conflict.value(), Sentinel::Conflict.value());

    for boss in [Boss::neutral(), Boss { weaknesses: vec![Element::Ether], ..Boss::neutral() }] {
        for options in [ScoreOptions::strict(), ScoreOptions::lenient()] {
            let report = score_team(&team, &boss, options);
            assert!(report.score.is_disqualified());
            assert!([-1, -999].contains(&report.score.value()));
        }
    }
}

fn ranked(roster: &Roster, name: &str, teams: &[&[usize]]) -> BossTeams {
    let scored = teams
        .iter()
        .enumerate()
        .map(|(position, indices)| (Team::new(roster, indices), 500 - position as i32 * 10))
        .collect();
    BossTeams {
        boss: Boss {
            name: name.to_string(),
            ..Boss::neutral()
        },
        teams: rank_scored(scored, false),
        lenient: false,
    }
}

#[test]
fn only_disjoint_assignments_survive_in_priority_order() {
    let roster = Roster::new(
        ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|name| unit(name, &["support"], &[], None))
            .collect(),
    )
    .expect("roster");
    let per_boss = vec![
        ranked(&roster, "first", &[&[0, 1], &[2, 3]]),
        ranked(&roster, "second", &[&[4, 5]]),
        ranked(&roster, "third", &[&[2, 6], &[1, 6]]),
    ];

    let combinations = find_exclusive_combinations(&per_boss, TOP_K).expect("three bosses");
    assert_eq!(combinations.len(), 2);
    assert_eq!(combinations[0].priority, 103);
    assert_eq!(combinations[1].priority, 205);
    assert_eq!(combinations[0].label, "A / B | E / F | C / G");
    for combination in &combinations {
        let masks: Vec<_> = combination
            .assignments
            .iter()
            .map(|assignment| assignment.team.team.mask())
            .collect();
        assert!(!masks[0].intersects(masks[1]));
        assert!(!masks[0].intersects(masks[2]));
        assert!(!masks[1].intersects(masks[2]));
    }
}

#[test]
fn bundled_dataset_plans_a_deterministic_assault() {
    let units = load_units(data_path("units.json")).expect("units");
    let bosses = load_bosses(data_path("bosses.json")).expect("bosses");
    let mut config = AssaultConfig::for_bosses(&["HYDRA", "Ember Wyrm", "golem"]);
    config.flex = vec!["Lumi".to_string()];

    let first = plan_assault(&units, &bosses, &config).expect("plan");
    let again = plan_assault(&units, &bosses, &config).expect("plan");
    config.workers = 2;
    let parallel = plan_assault(&units, &bosses, &config).expect("plan");

    let json = |report: &lineup::AssaultReport| serde_json::to_string(report).expect("serialize");
    assert_eq!(json(&first), json(&again));
    assert_eq!(json(&first), json(&parallel));

    assert_eq!(first.bosses.len(), 3);
    assert_eq!(first.bosses[0].boss, "Frost Hydra");
    assert!(first.combinations.len() <= config.limit);
    assert!(first.total_found >= first.combinations.len());
    assert!(first
        .combinations
        .windows(2)
        .all(|pair| pair[0].priority <= pair[1].priority));
    for combination in &first.combinations {
        let used: usize = combination
            .assignments
            .iter()
            .map(|assignment| assignment.team.team.len())
            .sum();
        assert_eq!(combination.mask().len(), used);
    }
}

#[test]
fn unknown_boss_is_a_configuration_error() {
    let units = load_units(data_path("units.json")).expect("units");
    let bosses = load_bosses(data_path("bosses.json")).expect("bosses");
    let config = AssaultConfig::for_bosses(&["hydra", "wyrm", "kraken"]);
    let err = plan_assault(&units, &bosses, &config).unwrap_err();
    assert!(matches!(err, PlannerError::UnknownBoss(name) if name == "kraken"));
}

#[test]
fn tiny_roster_yields_empty_results_not_errors() {
    let bosses = load_bosses(data_path("bosses.json")).expect("bosses");
    let units = vec![unit("Solo", &["attack", "fire"], &[], None)];
    let report = plan_assault(&units, &bosses, &AssaultConfig::for_bosses(&["hydra", "wyrm", "golem"]))
        .expect("plan");
    assert!(report.combinations.is_empty());
    assert_eq!(report.total_found, 0);
    assert!(report.bosses.iter().all(|entry| entry.viable == 0));
}

#[test]
fn team_builder_ranks_against_the_neutral_boss() {
    let units = load_units(data_path("units.json")).expect("units");
    let ranking = rank_teams(&units, &[], 5).expect("ranking");
    assert!(ranking.teams.len() <= 5);
    assert!(ranking.total_found >= ranking.teams.len());
    assert!(ranking
        .teams
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score && pair[0].rank < pair[1].rank));
    assert!(ranking.teams.iter().all(|team| team.team.len() == 3));
}

#[test]
fn named_team_audit_returns_a_trace() {
    let units = load_units(data_path("units.json")).expect("units");
    let boss = Boss::neutral();
    let names = vec!["Frostfang".to_string(), "lyca".to_string(), "Cantor".to_string()];
    let report = score_named_team(&units, &boss, &names, false).expect("score");
    assert!(!report.trace.is_empty());
    assert!(report.trace.iter().any(|step| step.rule == "tier"));

    let missing = vec!["Frostfang".to_string(), "Nobody".to_string()];
    let err = score_named_team(&units, &boss, &missing, false).unwrap_err();
    assert!(matches!(err, PlannerError::UnknownUnit(_)));
}

#[test]
fn dps_free_team_is_rejected_by_composition() {
    let roster = Roster::new(vec![
        unit("Guard", &["defense"], &[], None),
        unit("Helper", &["support"], &[], None),
    ])
    .expect("roster");
    let team = Team::new(&roster, &[0, 1]);
    let report = score_team(&team, &Boss::neutral(), ScoreOptions::strict());
    let TeamScore::Disqualified(disqualification) = report.score else {
        panic!("expected disqualification");
    };
    assert_eq!(disqualification.rule, "composition");
    assert_eq!(disqualification.sentinel, Sentinel::Rejected);
    assert_eq!(team.members()[0].role, Role::Defense);
}
