use anyhow::{Context as _, Result, anyhow, bail};
use csv::{Reader, StringRecord};
use hop_analysis_core::{Channel, Quaternion, Vector3, timestamps_to_seconds};
use log::{info, warn};
use std::io::Read;

const TIME_COLUMNS: [&str; 3] = ["timestamp", "timestamps", "time"];
// order matters, see `ChannelColumns::parse`
const CHANNEL_FIELDS: [&str; 7] = ["ax", "ay", "az", "ow", "ox", "oy", "oz"];

#[derive(Debug)]
struct ChannelColumns {
    sensor: usize,
    indices: [usize; 7],
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

/// Channels `1..` present in the header, stopping at the first missing sensor number.
fn discover_channels(headers: &StringRecord) -> Result<Vec<ChannelColumns>> {
    let mut channels = Vec::new();
    for sensor in 1.. {
        let found: Vec<Option<usize>> = CHANNEL_FIELDS
            .iter()
            .map(|field| find_column(headers, &format!("{field}{sensor}")))
            .collect();
        if found.iter().all(Option::is_none) {
            break;
        }

        let mut indices = [0; 7];
        for (i, (index, field)) in found.iter().zip(CHANNEL_FIELDS).enumerate() {
            indices[i] = (*index).ok_or_else(|| anyhow!("sensor {sensor} has no {field}{sensor} column"))?;
        }
        channels.push(ChannelColumns { sensor, indices });
    }

    if channels.is_empty() {
        bail!("no sensor columns found, expected ax1, ay1, az1, ow1, ox1, oy1, oz1");
    }
    Ok(channels)
}

fn parse_cell(record: &StringRecord, index: usize, row: usize) -> Result<f64> {
    let cell = record.get(index).unwrap_or("").trim();
    if cell.is_empty() {
        warn!("row {row}: empty cell in column {index}, treated as NaN");
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .with_context(|| format!("row {row}: invalid number {cell:?}"))
}

impl ChannelColumns {
    fn parse(&self, record: &StringRecord, row: usize) -> Result<(Vector3<f64>, Quaternion<f64>)> {
        let mut values = [0.0; 7];
        for (value, &index) in values.iter_mut().zip(&self.indices) {
            *value = parse_cell(record, index, row)?;
        }
        let [ax, ay, az, w, x, y, z] = values;
        Ok((Vector3::new(ax, ay, az), Quaternion::new(w, x, y, z)))
    }
}

/// Reads one recorded session: a time column plus seven columns per sensor.
pub fn read_session<R: Read>(reader: R, time_scale: f64, names: &[String]) -> Result<Vec<Channel>> {
    let mut reader = Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let time_index = TIME_COLUMNS
        .iter()
        .find_map(|name| find_column(&headers, name))
        .ok_or_else(|| anyhow!("no timestamp column found"))?;
    let columns = discover_channels(&headers)?;

    let mut raw_time = Vec::new();
    let mut acceleration = vec![Vec::new(); columns.len()];
    let mut orientation = vec![Vec::new(); columns.len()];
    for (row, record) in reader.records().enumerate() {
        // header is line 1
        let row = row + 2;
        let record = record.with_context(|| format!("failed to read row {row}"))?;
        raw_time.push(parse_cell(&record, time_index, row)?);
        for (i, channel) in columns.iter().enumerate() {
            let (acc, quat) = channel.parse(&record, row)?;
            acceleration[i].push(acc);
            orientation[i].push(quat);
        }
    }

    let time = timestamps_to_seconds(&raw_time, time_scale);
    info!(
        "loaded {} samples for {} sensors",
        time.len(),
        columns.len()
    );

    columns
        .iter()
        .zip(acceleration)
        .zip(orientation)
        .map(|((channel, acceleration), orientation)| {
            let name = names
                .get(channel.sensor - 1)
                .cloned()
                .unwrap_or_else(|| format!("sensor{}", channel.sensor));
            Ok(Channel::new(name, time.clone(), acceleration, orientation)?)
        })
        .collect()
}
