//! Salary export and projection sheet loading, and the left join between them.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::config::ColumnConfig;
use crate::error::InputError;
use crate::players::{PlayerRecord, Role};

/// One row of the platform salary export.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRow {
    pub name: String,
    pub label: String,
    pub role_tag: String,
    pub salary: u32,
}

fn column(headers: &StringRecord, name: &str) -> Result<usize, InputError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| InputError::MissingColumn(name.to_string()))
}

fn parse_salary(raw: &str, row: usize) -> Result<u32, InputError> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    match cleaned.parse::<u32>() {
        Ok(salary) if salary > 0 => Ok(salary),
        _ => Err(InputError::InvalidSalary {
            row,
            value: raw.to_string(),
        }),
    }
}

pub fn read_salaries<R: std::io::Read>(
    reader: R,
    columns: &ColumnConfig,
) -> Result<Vec<SalaryRow>, InputError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    let name = column(&headers, &columns.name)?;
    let label = column(&headers, &columns.label)?;
    let role = column(&headers, &columns.role)?;
    let salary = column(&headers, &columns.salary)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = i + 2;
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        rows.push(SalaryRow {
            name: field(name),
            label: field(label),
            role_tag: field(role),
            salary: parse_salary(record.get(salary).unwrap_or_default(), line)?,
        });
    }
    Ok(rows)
}

pub fn load_salaries(
    path: impl AsRef<Path>,
    columns: &ColumnConfig,
) -> Result<Vec<SalaryRow>, InputError> {
    let path = path.as_ref();
    let rows = read_salaries(File::open(path)?, columns)?;
    info!(path = %path.display(), rows = rows.len(), "loaded salaries");
    Ok(rows)
}

/// Name to projection. Blank cells are skipped; they mean "no projection", not zero.
pub fn read_projections<R: std::io::Read>(
    reader: R,
    columns: &ColumnConfig,
) -> Result<HashMap<String, f64>, InputError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    let name = column(&headers, &columns.name)?;
    let projection = column(&headers, &columns.projection)?;

    let mut projections = HashMap::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let raw = record.get(projection).unwrap_or_default();
        if raw.is_empty() {
            continue;
        }
        let value: f64 = raw.parse().map_err(|_| InputError::InvalidProjection {
            row: i + 2,
            value: raw.to_string(),
        })?;
        let player = record.get(name).unwrap_or_default();
        if projections.contains_key(player) {
            warn!(player, "duplicate projection, keeping the first");
            continue;
        }
        projections.insert(player.to_string(), value);
    }
    Ok(projections)
}

pub fn load_projections(
    path: impl AsRef<Path>,
    columns: &ColumnConfig,
) -> Result<HashMap<String, f64>, InputError> {
    let path = path.as_ref();
    let projections = read_projections(File::open(path)?, columns)?;
    info!(path = %path.display(), players = projections.len(), "loaded projections");
    Ok(projections)
}

/// Left join on player name. Every salary row with a known role tag survives; its projection
/// is `None` when the sheet has none.
pub fn merge_players(
    salaries: &[SalaryRow],
    projections: &HashMap<String, f64>,
    columns: &ColumnConfig,
) -> Vec<PlayerRecord> {
    salaries
        .iter()
        .filter_map(|row| {
            let role = if row.role_tag == columns.captain_tag {
                Role::Captain
            } else if row.role_tag == columns.flex_tag {
                Role::Flex
            } else {
                warn!(player = %row.name, tag = %row.role_tag, "skipping row with unknown role");
                return None;
            };
            Some(PlayerRecord::new(
                &row.name,
                &row.label,
                role,
                row.salary,
                projections.get(&row.name).copied(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALARIES: &str = "\
Position,Name + ID,Name,ID,Roster Position,Salary,Game Info,TeamAbbrev,AvgPointsPerGame
QB,Jane Doe (101),Jane Doe,101,CPT,\"$16,500\",NE@NYJ,NE,21.3
QB,Jane Doe (102),Jane Doe,102,FLEX,11000,NE@NYJ,NE,21.3
WR,Sam Roe (103),Sam Roe,103,FLEX,7000,NE@NYJ,NYJ,12.0
K,Kim Poe (104),Kim Poe,104,FLEX,4000,NE@NYJ,NYJ,7.5
";

    const PROJECTIONS: &str = "\
Name,DK OF
Jane Doe,22.4
Sam Roe,
Jane Doe,1.0
";

    #[test]
    fn reads_salary_export() {
        let rows = read_salaries(SALARIES.as_bytes(), &ColumnConfig::default()).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            SalaryRow {
                name: "Jane Doe".to_string(),
                label: "Jane Doe (101)".to_string(),
                role_tag: "CPT".to_string(),
                salary: 16_500,
            }
        );
    }

    #[test]
    fn blank_projection_is_missing_and_first_duplicate_wins() {
        let projections = read_projections(PROJECTIONS.as_bytes(), &ColumnConfig::default()).unwrap();

        assert_eq!(projections.len(), 1);
        assert_eq!(projections["Jane Doe"], 22.4);
    }

    #[test]
    fn merge_keeps_rows_without_projection() {
        let columns = ColumnConfig::default();
        let salaries = read_salaries(SALARIES.as_bytes(), &columns).unwrap();
        let projections = read_projections(PROJECTIONS.as_bytes(), &columns).unwrap();
        let players = merge_players(&salaries, &projections, &columns);

        assert_eq!(players.len(), 4);
        assert_eq!(players[0].role, Role::Captain);
        assert_eq!(players[0].projection, Some(22.4));
        assert_eq!(players[1].identity_key, players[0].identity_key);
        assert_eq!(players[2].projection, None);
        assert_eq!(players[3].projection, None);
    }

    #[test]
    fn rejects_bad_cells_and_missing_columns() {
        let columns = ColumnConfig::default();

        let bad_salary = "Name + ID,Name,Roster Position,Salary\nA (1),A,CPT,zero\n";
        assert!(matches!(
            read_salaries(bad_salary.as_bytes(), &columns),
            Err(InputError::InvalidSalary { row: 2, .. })
        ));

        let no_role = "Name + ID,Name,Salary\nA (1),A,100\n";
        assert!(matches!(
            read_salaries(no_role.as_bytes(), &columns),
            Err(InputError::MissingColumn(c)) if c == "Roster Position"
        ));

        let bad_projection = "Name,DK OF\nA,lots\n";
        assert!(matches!(
            read_projections(bad_projection.as_bytes(), &columns),
            Err(InputError::InvalidProjection { row: 2, .. })
        ));
    }

    #[test]
    fn unknown_role_tags_are_dropped() {
        let columns = ColumnConfig::default();
        let salaries = vec![SalaryRow {
            name: "A".to_string(),
            label: "A (1)".to_string(),
            role_tag: "UTIL".to_string(),
            salary: 100,
        }];
        assert!(merge_players(&salaries, &HashMap::new(), &columns).is_empty());
    }
}
