use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::core::types::{Request, Sword, Workload};
use crate::error::{Error, Result};

const SWORD_FIELDS: usize = 11;
const REQUEST_FIELDS: usize = 5;

/// Reads and parses a workload file.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::InputMalformed` if any record does not have the expected shape.
pub fn load_workload(path: impl AsRef<Path>) -> Result<Workload> {
    let text = fs::read_to_string(path)?;
    parse_workload(&text)
}

/// Parses workload text.
///
/// The first line holds `N M`, followed by N sword lines
/// (`state, duration, total, remaining, length, throughput, speed, "name",
/// "description", "comments", "style"`) and M request lines
/// (`arrival, total, throughput, speed, "style"`). A sword state of `-1`
/// means the sword is clean. Requests must be in arrival order. Blank lines
/// are skipped.
pub fn parse_workload(text: &str) -> Result<Workload> {
    let end_line = text.lines().count() + 1;
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| Error::malformed(end_line, "missing `N M` header"))?;
    let counts: Vec<&str> = header.split_whitespace().collect();
    if counts.len() != 2 {
        return Err(Error::malformed(
            header_line,
            format!("expected `N M` header, found `{}`", header),
        ));
    }
    let sword_count: usize = parse_number(counts[0], header_line, "sword count")?;
    let request_count: usize = parse_number(counts[1], header_line, "request count")?;

    let mut workload = Workload {
        swords: Vec::with_capacity(sword_count),
        requests: Vec::with_capacity(request_count),
    };

    for index in 0..sword_count {
        let (line_no, line) = lines.next().ok_or_else(|| {
            Error::malformed(end_line, format!("expected {} swords, found {}", sword_count, index))
        })?;
        workload.swords.push(parse_sword(line, line_no)?);
    }

    let mut previous_arrival = 0;
    for index in 0..request_count {
        let (line_no, line) = lines.next().ok_or_else(|| {
            Error::malformed(
                end_line,
                format!("expected {} requests, found {}", request_count, index),
            )
        })?;
        let request = parse_request(line, line_no)?;
        if request.arrival_time < previous_arrival {
            return Err(Error::malformed(
                line_no,
                format!(
                    "request arrives at {} after one arriving at {}",
                    request.arrival_time, previous_arrival
                ),
            ));
        }
        previous_arrival = request.arrival_time;
        workload.requests.push(request);
    }

    if let Some((line_no, _)) = lines.next() {
        log::warn!("Ignoring content after the last request, starting at line {}", line_no);
    }

    log::debug!(
        "Parsed {} swords and {} requests",
        workload.swords.len(),
        workload.requests.len()
    );
    Ok(workload)
}

fn parse_sword(line: &str, line_no: usize) -> Result<Sword> {
    let fields = split_fields(line);
    expect_fields(&fields, SWORD_FIELDS, line_no, "sword")?;

    let state: i64 = parse_number(fields[0], line_no, "cleaning state")?;
    let dirty_level = match state {
        -1 => None,
        level if level >= 0 => Some(level as u64),
        other => {
            return Err(Error::malformed(
                line_no,
                format!("cleaning state must be -1 or non-negative, found {}", other),
            ))
        }
    };

    let sword = Sword {
        cleaning_duration: parse_number(fields[1], line_no, "cleaning duration")?,
        total_capacity: parse_number(fields[2], line_no, "total capacity")?,
        remaining_capacity: parse_number(fields[3], line_no, "remaining capacity")?,
        length: parse_number(fields[4], line_no, "length")?,
        throughput: parse_number(fields[5], line_no, "throughput")?,
        speed: parse_number(fields[6], line_no, "speed")?,
        name: unquote(fields[7], line_no, "name")?,
        description: unquote(fields[8], line_no, "description")?,
        comments: unquote(fields[9], line_no, "comments")?,
        style: unquote(fields[10], line_no, "style")?,
        state: Default::default(),
    };
    Ok(sword.with_dirty_level(dirty_level))
}

fn parse_request(line: &str, line_no: usize) -> Result<Request> {
    let fields = split_fields(line);
    expect_fields(&fields, REQUEST_FIELDS, line_no, "request")?;

    Ok(Request {
        arrival_time: parse_number(fields[0], line_no, "arrival time")?,
        total_capacity: parse_number(fields[1], line_no, "total capacity")?,
        throughput: parse_number(fields[2], line_no, "throughput")?,
        speed: parse_number(fields[3], line_no, "speed")?,
        style: unquote(fields[4], line_no, "style")?,
    })
}

/// Split on commas outside double quotes, trimming every field
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(line[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    fields.push(line[start..].trim());
    fields
}

fn expect_fields(fields: &[&str], expected: usize, line_no: usize, record: &str) -> Result<()> {
    if fields.len() != expected {
        return Err(Error::malformed(
            line_no,
            format!("{} needs {} fields, found {}", record, expected, fields.len()),
        ));
    }
    Ok(())
}

fn parse_number<T: FromStr>(field: &str, line_no: usize, what: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| Error::malformed(line_no, format!("{} `{}` is not a valid number", what, field)))
}

fn unquote(field: &str, line_no: usize, what: &str) -> Result<String> {
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map(str::to_string)
        .ok_or_else(|| {
            Error::malformed(line_no, format!("{} must be quoted, found `{}`", what, field))
        })
}
