//! Lineup files: the full view, the upload sheet and an `.xlsx` workbook.

use std::fs::{self, File};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::config::ContestConfig;
use crate::error::InputError;
use crate::lineup::FinalizedLineup;
use crate::ownership::OwnershipSummary;

pub const CAPTAIN_HEADER: &str = "CPT";
pub const FLEX_HEADER: &str = "FLEX";
pub const SCORE_HEADER: &str = "PROJECTION";
pub const SALARY_HEADER: &str = "SALARY";

/// Player columns in slot order, as the contest platform expects them.
pub fn upload_header(contest: &ContestConfig) -> Vec<String> {
    std::iter::repeat_n(CAPTAIN_HEADER, contest.captain_slots)
        .chain(std::iter::repeat_n(FLEX_HEADER, contest.flex_slots))
        .map(str::to_string)
        .collect()
}

pub fn view_header(contest: &ContestConfig) -> Vec<String> {
    let mut header = upload_header(contest);
    header.push(SCORE_HEADER.to_string());
    header.push(SALARY_HEADER.to_string());
    header
}

pub fn write_view_csv<W: std::io::Write>(
    writer: W,
    contest: &ContestConfig,
    lineups: &[FinalizedLineup],
) -> Result<(), InputError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(view_header(contest))?;
    for lineup in lineups {
        writer.write_record(lineup.slots())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_upload_csv<W: std::io::Write>(
    writer: W,
    contest: &ContestConfig,
    lineups: &[FinalizedLineup],
) -> Result<(), InputError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(upload_header(contest))?;
    for lineup in lineups {
        writer.write_record(lineup.players())?;
    }
    writer.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<File, InputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

pub fn save_view_csv(
    path: impl AsRef<Path>,
    contest: &ContestConfig,
    lineups: &[FinalizedLineup],
) -> Result<(), InputError> {
    let path = path.as_ref();
    write_view_csv(create(path)?, contest, lineups)?;
    info!(path = %path.display(), lineups = lineups.len(), "saved lineup view");
    Ok(())
}

pub fn save_upload_csv(
    path: impl AsRef<Path>,
    contest: &ContestConfig,
    lineups: &[FinalizedLineup],
) -> Result<(), InputError> {
    let path = path.as_ref();
    write_upload_csv(create(path)?, contest, lineups)?;
    info!(path = %path.display(), lineups = lineups.len(), "saved lineups for upload");
    Ok(())
}

/// `Lineups` sheet with every slot, `Ownership` sheet with captain and flex exposure.
pub fn write_workbook(
    path: impl AsRef<Path>,
    contest: &ContestConfig,
    lineups: &[FinalizedLineup],
    ownership: &OwnershipSummary,
) -> Result<(), InputError> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let score_format = Format::new().set_num_format("0.00");
    let share_format = Format::new().set_num_format("0.0%");

    let sheet = workbook.add_worksheet();
    sheet.set_name("Lineups")?;
    for (col, title) in view_header(contest).iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title, &bold)?;
    }
    let score_col = contest.roster_size() as u16;
    for (i, lineup) in lineups.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, label) in lineup.players().enumerate() {
            sheet.write_string(row, col as u16, label)?;
        }
        sheet.write_number_with_format(row, score_col, lineup.total_score, &score_format)?;
        sheet.write_number(row, score_col + 1, lineup.total_salary)?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Ownership")?;
    for (col, title) in ["Captain", "Count", "Share", "", "Flex", "Count", "Share"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    for (offset, exposures) in [(0u16, &ownership.captain), (4u16, &ownership.flex)] {
        for (i, exposure) in exposures.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, offset, &exposure.label)?;
            sheet.write_number(row, offset + 1, exposure.count as u32)?;
            sheet.write_number_with_format(
                row,
                offset + 2,
                exposure.share(ownership.lineups),
                &share_format,
            )?;
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    workbook.save(path)?;
    info!(path = %path.display(), lineups = lineups.len(), "saved lineup workbook");
    Ok(())
}
