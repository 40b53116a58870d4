use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parquet::data_type::{ByteArray, ByteArrayType, Int32Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use crate::record::GameRecord;

const DRIVES_PARQUET_SCHEMA: &str = "
message drive {
    REQUIRED BYTE_ARRAY game_id (UTF8);
    REQUIRED INT32 season_year;
    REQUIRED BYTE_ARRAY season_type (UTF8);
    REQUIRED INT32 game_week;
    REQUIRED BYTE_ARRAY home_team (UTF8);
    REQUIRED BYTE_ARRAY away_team (UTF8);
    REQUIRED INT32 drive_id;
    OPTIONAL BYTE_ARRAY drive_pos_team (UTF8);
    OPTIONAL INT32 drive_start;
    OPTIONAL BYTE_ARRAY drive_start_time (UTF8);
    REQUIRED INT32 drive_num_plays;
    OPTIONAL BYTE_ARRAY drive_scoring_team (UTF8);
    REQUIRED INT32 drive_points;
}
";

pub fn season_json_path(dir: &Path, season_year: i32) -> PathBuf {
    dir.join(format!("drives_{season_year}.json"))
}

pub fn season_parquet_path(dir: &Path, season_year: i32) -> PathBuf {
    dir.join(format!("drives_{season_year}.parquet"))
}

pub fn write_json_lines(path: &Path, records: &[GameRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let tmp = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        let mut out = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut out, record).context("serialize game record")?;
            out.write_all(b"\n").context("write game record")?;
        }
        out.flush().context("flush game records")?;
    }
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

pub fn read_json_lines(path: &Path) -> Result<Vec<GameRecord>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.context("read game record line")?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str::<GameRecord>(&line)
            .with_context(|| format!("invalid game record on line {}", idx + 1))?;
        out.push(record);
    }
    Ok(out)
}

enum ColumnData {
    Int {
        values: Vec<i32>,
        def_levels: Option<Vec<i16>>,
    },
    Bytes {
        values: Vec<ByteArray>,
        def_levels: Option<Vec<i16>>,
    },
}

/// Flatten to one row per drive and write a single-row-group Parquet file.
/// Returns the number of rows written.
pub fn write_drives_parquet(path: &Path, records: &[GameRecord]) -> Result<usize> {
    let rows = records
        .iter()
        .flat_map(|g| g.drives.iter().map(move |d| (g, d)))
        .collect::<Vec<_>>();

    let columns = vec![
        required_str(rows.iter().map(|(g, _)| g.game_id.as_str())),
        required_int(rows.iter().map(|(g, _)| g.season_year)),
        required_str(rows.iter().map(|(g, _)| g.season_type.as_str())),
        required_int(rows.iter().map(|(g, _)| g.game_week as i32)),
        required_str(rows.iter().map(|(g, _)| g.home_team.as_str())),
        required_str(rows.iter().map(|(g, _)| g.away_team.as_str())),
        required_int(rows.iter().map(|(_, d)| d.drive_id as i32)),
        optional_str(rows.iter().map(|(_, d)| d.drive_pos_team.as_deref())),
        optional_int(rows.iter().map(|(_, d)| d.drive_start)),
        optional_str(rows.iter().map(|(_, d)| d.drive_start_time.as_deref())),
        required_int(rows.iter().map(|(_, d)| d.drive_num_plays as i32)),
        optional_str(rows.iter().map(|(_, d)| d.drive_scoring_team.as_deref())),
        required_int(rows.iter().map(|(_, d)| d.drive_points)),
    ];

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let schema =
        Arc::new(parse_message_type(DRIVES_PARQUET_SCHEMA).context("parse drives schema")?);
    let props = Arc::new(WriterProperties::builder().build());
    let tmp = path.with_extension("parquet.tmp");
    let file = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let mut writer =
        SerializedFileWriter::new(file, schema, props).context("open parquet writer")?;

    let mut row_group = writer.next_row_group().context("start row group")?;
    let mut columns = columns.into_iter();
    while let Some(mut column) = row_group.next_column().context("next parquet column")? {
        let data = columns
            .next()
            .ok_or_else(|| anyhow!("parquet schema has more columns than data"))?;
        match data {
            ColumnData::Int { values, def_levels } => {
                column
                    .typed::<Int32Type>()
                    .write_batch(&values, def_levels.as_deref(), None)
                    .context("write int column")?;
            }
            ColumnData::Bytes { values, def_levels } => {
                column
                    .typed::<ByteArrayType>()
                    .write_batch(&values, def_levels.as_deref(), None)
                    .context("write string column")?;
            }
        }
        column.close().context("close parquet column")?;
    }
    row_group.close().context("close row group")?;
    writer.close().context("close parquet writer")?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(rows.len())
}

fn required_int(values: impl Iterator<Item = i32>) -> ColumnData {
    ColumnData::Int {
        values: values.collect(),
        def_levels: None,
    }
}

fn required_str<'a>(values: impl Iterator<Item = &'a str>) -> ColumnData {
    ColumnData::Bytes {
        values: values.map(ByteArray::from).collect(),
        def_levels: None,
    }
}

fn optional_int(values: impl Iterator<Item = Option<i32>>) -> ColumnData {
    let mut present = Vec::new();
    let mut def_levels = Vec::new();
    for value in values {
        def_levels.push(i16::from(value.is_some()));
        present.extend(value);
    }
    ColumnData::Int {
        values: present,
        def_levels: Some(def_levels),
    }
}

fn optional_str<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ColumnData {
    let mut present = Vec::new();
    let mut def_levels = Vec::new();
    for value in values {
        def_levels.push(i16::from(value.is_some()));
        present.extend(value.map(ByteArray::from));
    }
    ColumnData::Bytes {
        values: present,
        def_levels: Some(def_levels),
    }
}
