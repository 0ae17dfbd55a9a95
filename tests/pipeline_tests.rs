use std::fs;
use std::path::PathBuf;

use showdown_core::config::OptimizerConfig;
use showdown_core::io::{
    load_projections, load_salaries, merge_players, read_projections, read_salaries,
    save_upload_csv, save_view_csv, write_view_csv,
};
use showdown_core::optimize_lineups;
use showdown_core::ownership::summarize;

const SALARIES: &str = "\
Name,Roster Position,Salary,Name + ID
A,CPT,\"$9,000\",A (1)
B,CPT,8000,B (2)
Z,CPT,7000,Z (9)
C,FLEX,6000,C (3)
D,FLEX,5000,D (4)
E,FLEX,4000,E (5)
Z,FLEX,3000,Z (10)
";

// Z has no projection and must never show up in a lineup.
const PROJECTIONS: &str = "\
Name,DK OF
A,13.3333333333
B,12
C,12
D,10
E,8
Z,
";

const CONFIG: &str = "
contest:
  flex_slots: 2
  salary_cap: 23000
  max_lineups: 4
";

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("showdown-{name}-{}", std::process::id()))
}

#[test]
fn csv_inputs_to_view_csv() {
    let config = OptimizerConfig::from_yaml_str(CONFIG).unwrap();
    let salaries = read_salaries(SALARIES.as_bytes(), &config.columns).unwrap();
    let projections = read_projections(PROJECTIONS.as_bytes(), &config.columns).unwrap();
    let players = merge_players(&salaries, &projections, &config.columns);
    assert_eq!(players.len(), 7);

    let run = optimize_lineups(&players, &config, |_| {}).unwrap();
    assert_eq!(run.pool.captains().len(), 2);
    assert_eq!(run.pool.flex().len(), 3);
    assert_eq!(run.lineups.len(), 4);
    assert!(run.lineups.iter().all(|l| !l.players().any(|p| p.starts_with('Z'))));

    let mut view = Vec::new();
    write_view_csv(&mut view, &config.contest, &run.lineups).unwrap();
    let view = String::from_utf8(view).unwrap();
    let mut lines = view.lines();
    assert_eq!(lines.next(), Some("CPT,FLEX,FLEX,PROJECTION,SALARY"));
    // 19.99999999995 + 12 + 10 rounds to 42.
    assert_eq!(lines.next(), Some("A (1),C (3),D (4),42.00,20000"));
    assert_eq!(view.lines().count(), 5);
}

#[test]
fn files_on_disk_round_trip() {
    let dir = scratch_dir("pipeline");
    fs::create_dir_all(&dir).unwrap();
    let salaries_path = dir.join("DKSalaries.csv");
    let projections_path = dir.join("OFModel.csv");
    fs::write(&salaries_path, SALARIES).unwrap();
    fs::write(&projections_path, PROJECTIONS).unwrap();
    let config_path = dir.join("config.yaml");
    fs::write(&config_path, CONFIG).unwrap();

    let config = OptimizerConfig::from_yaml_file(&config_path).unwrap();
    let salaries = load_salaries(&salaries_path, &config.columns).unwrap();
    let projections = load_projections(&projections_path, &config.columns).unwrap();
    let players = merge_players(&salaries, &projections, &config.columns);
    let run = optimize_lineups(&players, &config, |_| {}).unwrap();

    let out = dir.join("output");
    save_view_csv(out.join("view.csv"), &config.contest, &run.lineups).unwrap();
    save_upload_csv(out.join("upload.csv"), &config.contest, &run.lineups).unwrap();

    let upload = fs::read_to_string(out.join("upload.csv")).unwrap();
    assert_eq!(upload.lines().next(), Some("CPT,FLEX,FLEX"));
    assert_eq!(upload.lines().count(), run.lineups.len() + 1);

    let ownership = summarize(&run.lineups);
    let captain_total: usize = ownership.captain.iter().map(|e| e.count).sum();
    assert_eq!(captain_total, run.lineups.len());

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_column_is_reported() {
    let config = OptimizerConfig::default();
    let err = read_projections("Player,DK OF\nA,1\n".as_bytes(), &config.columns).unwrap_err();
    assert_eq!(err.to_string(), "missing column `Name`");
}

#[test]
fn example_config_parses_and_validates() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("showdown.example.yaml");
    let config = OptimizerConfig::from_yaml_file(path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.contest.roster_size(), 6);
    assert_eq!(config.solver.time_limit_secs, Some(30.0));
}
